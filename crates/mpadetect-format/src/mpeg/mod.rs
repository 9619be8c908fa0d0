//! MPEG-1/2/2.5 Layer I-III 音频流识别.
//!
//! 文件结构:
//! ```text
//! [ID3v2 标签 (可选)]
//! [MPEG 音频帧 #0]
//! [MPEG 音频帧 #1]
//! ...
//! ```
//!
//! 识别流程: 跳过 ID3v2 标签 → 前向扫描第一个候选帧 → 按计算出的帧长
//! 在附近定位下一帧, 并要求其与前一帧属于同一音频流.

pub mod chain;
pub mod header;
pub mod id3;
pub mod scanner;
mod tables;

pub use chain::{FrameChain, LocatedFrame, verify_chain, verify_frame};
pub use header::{ChannelMode, Emphasis, FrameHeader, MpegLayer, MpegVersion, StreamIdentity};
pub use id3::skip_id3v2;
pub use scanner::{find_frame, is_sync_candidate};
