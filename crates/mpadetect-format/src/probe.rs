//! 格式探测.
//!
//! 通过分析文件头部数据和文件扩展名判断是否为 MPEG 音频.

use crate::detector::Detector;

/// 探测置信度
///
/// 数值越高, 表示对格式判断越有信心.
pub type ProbeScore = u32;

/// 最低探测分数 (仅根据扩展名)
pub const SCORE_EXTENSION: ProbeScore = 50;

/// 最高探测分数 (帧链校验通过)
pub const SCORE_MAX: ProbeScore = 100;

/// MPEG 音频常用扩展名
const EXTENSIONS: [&str; 4] = ["mp3", "mp2", "mp1", "mpa"];

/// 格式探测器 trait
pub trait FormatProbe {
    /// 根据文件头部数据探测格式
    ///
    /// # 参数
    /// - `data`: 文件开头的若干字节
    /// - `filename`: 文件名 (可选, 用于扩展名匹配)
    ///
    /// # 返回
    /// - `Some(score)`: 探测成功, 返回置信度
    /// - `None`: 不是此格式
    fn probe(&self, data: &[u8], filename: Option<&str>) -> Option<ProbeScore>;

    /// 格式名称
    fn name(&self) -> &'static str;
}

/// MPEG 音频格式探测器
#[derive(Debug, Clone, Default)]
pub struct MpegAudioProbe {
    detector: Detector,
}

impl MpegAudioProbe {
    pub fn new(detector: Detector) -> Self {
        Self { detector }
    }
}

impl FormatProbe for MpegAudioProbe {
    fn probe(&self, data: &[u8], filename: Option<&str>) -> Option<ProbeScore> {
        let mut src = data;
        if self.detector.is_valid_stream(&mut src) {
            return Some(SCORE_MAX);
        }

        let ext = filename?.rsplit_once('.')?.1;
        EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
            .then_some(SCORE_EXTENSION)
    }

    fn name(&self) -> &'static str {
        "mpeg_audio"
    }
}
