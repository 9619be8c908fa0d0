//! 顶层探测入口.
//!
//! 所有内部错误在这里折叠为布尔结论; 只有打开文件失败会作为错误返回给调用方.

use std::path::Path;

use log::debug;
use mpadetect_core::DetectResult;

use crate::config::DetectConfig;
use crate::io::{ByteSource, IoContext};
use crate::mpeg::{FrameChain, skip_id3v2, verify_chain};

/// MPEG 音频流探测器
///
/// 不持有任何可变状态, 可在多个线程间共享; 每个数据源的读游标由调用方独占.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectConfig,
}

impl Detector {
    /// 使用指定参数创建探测器
    pub fn new(config: DetectConfig) -> DetectResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// 探测数据源, 成功时返回支撑结论的帧链
    pub fn detect<S: ByteSource + ?Sized>(&self, source: &mut S) -> DetectResult<FrameChain> {
        let start = skip_id3v2(source, 0);
        verify_chain(source, start, self.config.chain_depth, false, None, &self.config)
    }

    /// 数据源是否为可识别的 MPEG 音频帧链
    pub fn is_valid_stream<S: ByteSource + ?Sized>(&self, source: &mut S) -> bool {
        match self.detect(source) {
            Ok(chain) => {
                if let Some(first) = chain.first() {
                    debug!(
                        "探测: 偏移 {} 处为 {} {} {}Hz, 串联 {} 帧",
                        first.offset,
                        first.header.version,
                        first.header.layer,
                        first.header.sample_rate,
                        chain.len()
                    );
                }
                true
            }
            Err(e) => {
                debug!("探测: 不是 MPEG 音频流: {e}");
                false
            }
        }
    }
}

/// 使用默认参数判断数据源是否为 MPEG 音频流
pub fn is_valid_stream<S: ByteSource + ?Sized>(source: &mut S) -> bool {
    Detector::default().is_valid_stream(source)
}

/// 打开文件并判断是否为 MPEG 音频流
///
/// 无法打开文件时返回错误, 其余情况只返回布尔结论.
pub fn is_mp3_file(path: impl AsRef<Path>) -> DetectResult<bool> {
    let mut io = IoContext::open_read(path)?;
    Ok(is_valid_stream(&mut io))
}
