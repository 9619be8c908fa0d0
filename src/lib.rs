//! # mpadetect
//!
//! 纯 Rust 实现的 MPEG 音频流识别库.
//!
//! 不解码任何音频, 只通过定位 MPEG 帧头并校验相邻帧的一致性,
//! 判断一段字节流是否为有效的 MPEG-1/2/2.5 Layer I-III 音频.
//!
//! # 快速开始
//!
//! ```rust
//! // 两个连续的 MPEG-1 Layer III 128 kbps 44100 Hz 帧 (每帧 417 字节)
//! let mut frame = vec![0u8; 417];
//! frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
//! let data = frame.repeat(2);
//!
//! let mut src: &[u8] = &data;
//! assert!(mpadetect::is_valid_stream(&mut src));
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `mpadetect-core` | 统一错误类型 |
//! | `mpadetect-format` | I/O 抽象, 帧头解码, 同步扫描, 帧链校验 |

/// 核心类型
pub use mpadetect_core as core;

/// 帧头解码与流识别
pub use mpadetect_format as format;

pub use mpadetect_format::{
    DetectConfig, Detector, FrameChain, FrameHeader, is_mp3_file, is_valid_stream,
};

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
