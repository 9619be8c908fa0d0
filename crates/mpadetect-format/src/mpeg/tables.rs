//! MPEG 音频固定查找表.
//!
//! 所有表都按强类型枚举的索引投影访问:
//! - `lsf`: [`MpegVersion::lsf`](super::MpegVersion::lsf), MPEG-1 为 0, MPEG-2/2.5 为 1
//! - `layer`: [`MpegLayer::index`](super::MpegLayer::index), Layer I/II/III 依次为 0/1/2
//! - `version`: [`MpegVersion::index`](super::MpegVersion::index), 即帧头中的 2 位原始编码

/// 比特率表 (kbps), [lsf][layer][bitrate_index]
///
/// 索引 0 为 free format, 索引 15 不在表中 (解码时已提前拒绝).
/// MPEG-2/2.5 的 Layer II/III 数值已相对 MPEG-1 减半.
pub(crate) const BITRATES_KBPS: [[[u32; 15]; 3]; 2] = [
    // MPEG-1
    [
        [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
        [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
    ],
    // MPEG-2, MPEG-2.5
    [
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
    ],
];

/// 采样率表 (Hz), [version][sample_rate_index]
pub(crate) const SAMPLE_RATES: [[u32; 3]; 4] = [
    [11025, 12000, 8000],  // MPEG-2.5
    [0, 0, 0],             // 保留
    [22050, 24000, 16000], // MPEG-2
    [44100, 48000, 32000], // MPEG-1
];

/// 每帧采样数, [lsf][layer]
pub(crate) const SAMPLES_PER_FRAME: [[u32; 3]; 2] = [[384, 1152, 1152], [384, 1152, 576]];

/// 帧长系数, [lsf][layer]
///
/// Layer I 的系数以 slot 为单位, 需再乘以 [`SLOT_SIZES`].
pub(crate) const FRAME_SIZE_COEFFICIENTS: [[u32; 3]; 2] = [[12, 144, 144], [12, 144, 72]];

/// 每个 slot 的字节数, [layer]
pub(crate) const SLOT_SIZES: [u32; 3] = [4, 1, 1];

/// MPEG-1 Layer II 允许的比特率/声道组合, [bitrate_index][is_mono]
pub(crate) const LAYER2_ALLOWED_MODES: [[bool; 2]; 15] = [
    [true, true],  // free
    [false, true], // 32
    [false, true], // 48
    [false, true], // 56
    [true, true],  // 64
    [false, true], // 80
    [true, true],  // 96
    [true, true],  // 112
    [true, true],  // 128
    [true, true],  // 160
    [true, true],  // 192
    [true, false], // 224
    [true, false], // 256
    [true, false], // 320
    [true, false], // 384
];

/// MPEG-2/2.5 Layer II 固定使用的位分配表
pub(crate) const LSF_ALLOCATION_TABLE: u8 = 4;
