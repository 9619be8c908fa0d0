//! 统一错误类型定义.
//!
//! 探测流程内部使用细分的错误种类, 到达顶层入口时全部折叠为布尔结论.

use thiserror::Error;

/// 探测流程统一错误类型
#[derive(Debug, Error)]
pub enum DetectError {
    /// 候选帧头解码失败 (保留字段, 不允许的码率组合等)
    #[error("无效帧头: {0}")]
    InvalidHeader(String),

    /// 后续帧与基准帧不属于同一音频流
    #[error("帧链不匹配: {0}")]
    ChainMismatch(String),

    /// 在允许的范围内没有找到同步码
    #[error("扫描耗尽: {0}")]
    ScanExhausted(String),

    /// 可读字节数少于请求数 (已到达数据末尾)
    #[error("已到达数据末尾")]
    Eof,

    /// 底层 I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),
}

impl DetectError {
    /// 是否属于"数据不足"类错误
    ///
    /// 扫描时这类错误只算一次失败的尝试, 不会中断整个流程.
    pub fn is_eof(&self) -> bool {
        match self {
            Self::Eof => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

/// 统一 Result 类型
pub type DetectResult<T> = Result<T, DetectError>;
