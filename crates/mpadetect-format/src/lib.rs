//! # mpadetect-format
//!
//! MPEG 音频 (MP1/MP2/MP3) 流识别: 不解码音频, 只通过定位并交叉校验帧头
//! 判断任意字节流是否为有效的 MPEG 音频.

pub mod config;
pub mod detector;
pub mod io;
pub mod mpeg;
pub mod probe;

// 重导出常用类型
pub use config::DetectConfig;
pub use detector::{Detector, is_mp3_file, is_valid_stream};
pub use io::{ByteSource, IoContext};
pub use mpeg::{FrameChain, FrameHeader, LocatedFrame};
pub use probe::{FormatProbe, MpegAudioProbe, ProbeScore};
