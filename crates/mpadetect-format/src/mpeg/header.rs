//! MPEG 音频帧头解码.
//!
//! 帧头结构 (32 位):
//! ```text
//! AAAA AAAA  AAAB BCCD  EEEE FFGH  IIJJ KLMM
//! A = 同步位 (11 bit, 全1)   B = MPEG 版本    C = 层
//! D = CRC 保护              E = 比特率索引    F = 采样率索引
//! G = 填充位                H = 私有位        I = 声道模式
//! J = 模式扩展              K = 版权         L = 原始/复制
//! M = 强调
//! ```

use std::fmt;

use mpadetect_core::{DetectError, DetectResult};

use super::tables::{
    BITRATES_KBPS, FRAME_SIZE_COEFFICIENTS, LAYER2_ALLOWED_MODES, LSF_ALLOCATION_TABLE,
    SAMPLE_RATES, SAMPLES_PER_FRAME, SLOT_SIZES,
};

/// MPEG 版本
///
/// 判别值即帧头中的 2 位原始编码, 同时作为采样率表的行索引.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MpegVersion {
    Mpeg25 = 0,
    Reserved = 1,
    Mpeg2 = 2,
    Mpeg1 = 3,
}

impl MpegVersion {
    /// 从 2 位原始编码构造
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Mpeg25,
            1 => Self::Reserved,
            2 => Self::Mpeg2,
            _ => Self::Mpeg1,
        }
    }

    /// 采样率表行索引
    pub fn index(self) -> usize {
        self as usize
    }

    /// LSF 行索引: MPEG-1 为 0, MPEG-2/2.5 为 1
    pub fn lsf(self) -> usize {
        if self == Self::Mpeg1 { 0 } else { 1 }
    }
}

impl fmt::Display for MpegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mpeg1 => "MPEG-1",
            Self::Mpeg2 => "MPEG-2",
            Self::Mpeg25 => "MPEG-2.5",
            Self::Reserved => "reserved",
        };
        f.write_str(name)
    }
}

/// MPEG 层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MpegLayer {
    Layer1 = 0,
    Layer2 = 1,
    Layer3 = 2,
    Reserved = 3,
}

impl MpegLayer {
    /// 从 2 位原始编码构造 (编码顺序与层号相反: 3 表示 Layer I, 0 为保留)
    pub fn from_bits(bits: u8) -> Self {
        match 3 - (bits & 0x03) {
            0 => Self::Layer1,
            1 => Self::Layer2,
            2 => Self::Layer3,
            _ => Self::Reserved,
        }
    }

    /// 查找表列索引
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MpegLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layer1 => "Layer I",
            Self::Layer2 => "Layer II",
            Self::Layer3 => "Layer III",
            Self::Reserved => "reserved",
        };
        f.write_str(name)
    }
}

/// 声道模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    Stereo = 0,
    JointStereo = 1,
    DualChannel = 2,
    SingleChannel = 3,
}

impl ChannelMode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Stereo,
            1 => Self::JointStereo,
            2 => Self::DualChannel,
            _ => Self::SingleChannel,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stereo => "stereo",
            Self::JointStereo => "joint stereo",
            Self::DualChannel => "dual channel",
            Self::SingleChannel => "mono",
        };
        f.write_str(name)
    }
}

/// 去加重方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    None = 0,
    /// 50/15 微秒
    Ms50_15 = 1,
    Reserved = 2,
    /// CCITT J.17
    CcittJ17 = 3,
}

impl Emphasis {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::None,
            1 => Self::Ms50_15,
            2 => Self::Reserved,
            _ => Self::CcittJ17,
        }
    }
}

/// 同一音频流中所有帧必须保持一致的帧头字段
///
/// 比特率、填充与模式扩展允许逐帧变化 (VBR 等), 不参与比较.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamIdentity {
    pub version: MpegVersion,
    pub layer: MpegLayer,
    pub sample_rate: u32,
    pub is_mono: bool,
    pub emphasis: Emphasis,
}

/// 已解码的 MPEG 音频帧头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// MPEG 版本
    pub version: MpegVersion,
    /// 层
    pub layer: MpegLayer,
    /// 是否有 CRC 校验 (保护位取反)
    pub has_crc: bool,
    /// 比特率索引 (4 bit 原始值)
    pub bitrate_index: u8,
    /// 比特率 (bps)
    pub bitrate: u32,
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 填充 slot 数 (0 或 1)
    pub padding: u32,
    /// 每帧采样数
    pub samples_per_frame: u32,
    pub private: bool,
    /// 声道模式
    pub channel_mode: ChannelMode,
    /// 模式扩展 (2 bit 原始值, 仅联合立体声有意义)
    pub mode_extension: u8,
    /// 强度立体声起始子带, 仅联合立体声时存在
    pub intensity_stereo_bound: Option<u8>,
    pub copyright: bool,
    pub original: bool,
    /// 去加重
    pub emphasis: Emphasis,
    /// Layer II 位分配表索引, 其他层为 `None`
    pub allocation_table_index: Option<u8>,
}

impl FrameHeader {
    /// 解码 4 字节帧头
    ///
    /// 保留字段、free format、MPEG-1 Layer II 不允许的比特率/声道组合都会
    /// 返回 [`DetectError::InvalidHeader`].
    pub fn decode(bytes: [u8; 4]) -> DetectResult<Self> {
        if bytes[0] != 0xFF || (bytes[1] & 0xE0) != 0xE0 {
            return Err(invalid("缺少同步码"));
        }

        // 版本 (byte1 bit 4-3)
        let version = MpegVersion::from_bits(bytes[1] >> 3);
        if version == MpegVersion::Reserved {
            return Err(invalid("保留的 MPEG 版本"));
        }
        let lsf = version.lsf();

        // 层 (byte1 bit 2-1)
        let layer = MpegLayer::from_bits(bytes[1] >> 1);
        if layer == MpegLayer::Reserved {
            return Err(invalid("保留的层"));
        }

        let has_crc = bytes[1] & 0x01 == 0;

        // 比特率 (byte2 bit 7-4), 15 为 free format 以外的非法值
        let bitrate_index = (bytes[2] >> 4) & 0x0F;
        if bitrate_index == 0x0F {
            return Err(invalid("比特率索引 15"));
        }
        let bitrate = BITRATES_KBPS[lsf][layer.index()][usize::from(bitrate_index)] * 1000;
        if bitrate == 0 {
            return Err(invalid("不支持 free format 比特率"));
        }

        // 采样率 (byte2 bit 3-2)
        let sample_rate_index = usize::from((bytes[2] >> 2) & 0x03);
        if sample_rate_index == 3 {
            return Err(invalid("保留的采样率索引"));
        }
        let sample_rate = SAMPLE_RATES[version.index()][sample_rate_index];

        let padding = u32::from((bytes[2] >> 1) & 0x01);
        let samples_per_frame = SAMPLES_PER_FRAME[lsf][layer.index()];
        let private = bytes[2] & 0x01 != 0;

        let channel_mode = ChannelMode::from_bits(bytes[3] >> 6);
        let mode_extension = (bytes[3] >> 4) & 0x03;
        let intensity_stereo_bound =
            (channel_mode == ChannelMode::JointStereo).then_some(4 + mode_extension * 4);

        let copyright = (bytes[3] >> 3) & 0x01 != 0;
        let original = (bytes[3] >> 2) & 0x01 != 0;

        let emphasis = Emphasis::from_bits(bytes[3]);
        if emphasis == Emphasis::Reserved {
            return Err(invalid("保留的去加重方式"));
        }

        let mut header = Self {
            version,
            layer,
            has_crc,
            bitrate_index,
            bitrate,
            sample_rate,
            padding,
            samples_per_frame,
            private,
            channel_mode,
            mode_extension,
            intensity_stereo_bound,
            copyright,
            original,
            emphasis,
            allocation_table_index: None,
        };

        if layer == MpegLayer::Layer2 {
            header.allocation_table_index = Some(header.layer2_allocation_table()?);
        }

        Ok(header)
    }

    /// 选择 Layer II 位分配表
    fn layer2_allocation_table(&self) -> DetectResult<u8> {
        if self.version != MpegVersion::Mpeg1 {
            return Ok(LSF_ALLOCATION_TABLE);
        }

        let mono = self.is_mono();
        if !LAYER2_ALLOWED_MODES[usize::from(self.bitrate_index)][usize::from(mono)] {
            return Err(invalid(format!(
                "MPEG-1 Layer II 不允许 {} kbps 的{}组合",
                self.bitrate / 1000,
                if mono { "单声道" } else { "多声道" }
            )));
        }

        let per_channel_kbps = self.bitrate / 1000 / if mono { 1 } else { 2 };
        let table = match per_channel_kbps {
            32 | 48 if self.sample_rate == 32000 => 3,
            32 | 48 => 2,
            56 | 64 | 80 => 0,
            96 | 112 | 128 | 160 | 192 if self.sample_rate != 48000 => 1,
            _ => 0,
        };
        Ok(table)
    }

    /// 帧总字节数 (含 4 字节帧头)
    ///
    /// `floor(系数 * 比特率 / 采样率) + 填充`, 再乘以 slot 字节数.
    pub fn frame_size(&self) -> u32 {
        let lsf = self.version.lsf();
        let layer = self.layer.index();
        (FRAME_SIZE_COEFFICIENTS[lsf][layer] * self.bitrate / self.sample_rate + self.padding)
            * SLOT_SIZES[layer]
    }

    /// slot 字节数 (Layer I 为 4, 其余为 1)
    pub fn slot_size(&self) -> u32 {
        SLOT_SIZES[self.layer.index()]
    }

    pub fn is_mono(&self) -> bool {
        self.channel_mode == ChannelMode::SingleChannel
    }

    /// 提取流标识字段
    pub fn identity(&self) -> StreamIdentity {
        StreamIdentity {
            version: self.version,
            layer: self.layer,
            sample_rate: self.sample_rate,
            is_mono: self.is_mono(),
            emphasis: self.emphasis,
        }
    }

    /// 判断两个帧头能否属于同一音频流
    pub fn matches(&self, other: &FrameHeader) -> bool {
        self.identity() == other.identity()
    }
}

fn invalid(reason: impl Into<String>) -> DetectError {
    DetectError::InvalidHeader(reason.into())
}
