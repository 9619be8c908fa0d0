//! # mpadetect-core
//!
//! MPEG 音频探测库的核心类型, 为 `mpadetect-format` 与命令行工具提供统一的错误定义.

pub mod error;

// 重导出常用类型
pub use error::{DetectError, DetectResult};
