//! 探测结果的结构化表示与文本输出.

use serde::Serialize;

use mpadetect_core::DetectResult;
use mpadetect_format::FrameChain;

/// 单个文件的探测结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// 找到兼容的帧链
    Valid,
    /// 文件可读, 但不是 MPEG 音频流
    Invalid,
    /// 无法打开文件
    Unreadable,
}

/// 首帧信息
#[derive(Debug, Clone, Serialize)]
pub struct FrameInfo {
    pub offset: u64,
    pub version: String,
    pub layer: String,
    pub sample_rate: u32,
    pub channel_mode: String,
    pub frame_size: u32,
}

/// 单个文件的探测报告
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_frame: Option<FrameInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chained_frames: Option<usize>,
}

impl FileReport {
    /// 由帧链探测结果构造报告
    pub fn from_detection(path: &str, result: DetectResult<FrameChain>) -> Self {
        match result {
            Ok(chain) => {
                let first_frame = chain.first().map(|frame| FrameInfo {
                    offset: frame.offset,
                    version: frame.header.version.to_string(),
                    layer: frame.header.layer.to_string(),
                    sample_rate: frame.header.sample_rate,
                    channel_mode: frame.header.channel_mode.to_string(),
                    frame_size: frame.size,
                });
                Self {
                    path: path.to_string(),
                    status: Status::Valid,
                    reason: None,
                    first_frame,
                    chained_frames: Some(chain.len()),
                }
            }
            Err(e) => Self {
                path: path.to_string(),
                status: Status::Invalid,
                reason: Some(e.to_string()),
                first_frame: None,
                chained_frames: None,
            },
        }
    }

    /// 文件无法打开
    pub fn unreadable(path: &str, err: &anyhow::Error) -> Self {
        Self {
            path: path.to_string(),
            status: Status::Unreadable,
            reason: Some(format!("{err:#}")),
            first_frame: None,
            chained_frames: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == Status::Valid
    }
}

/// 批量探测的退出码: 全部有效 0, 存在无效 1, 存在无法打开的文件 2
pub fn exit_code(reports: &[FileReport]) -> i32 {
    if reports.iter().any(|r| r.status == Status::Unreadable) {
        2
    } else if reports.iter().all(FileReport::is_valid) {
        0
    } else {
        1
    }
}

/// 静默模式: 每个文件一行
pub fn quiet_line(report: &FileReport) -> String {
    let verdict = match report.status {
        Status::Valid => "mpeg",
        Status::Invalid => "no",
        Status::Unreadable => "error",
    };
    format!("{verdict}\t{}", report.path)
}

/// 以文本块形式输出一个文件的报告
pub fn print_text(report: &FileReport) {
    println!("[FILE]");
    println!("  文件名       : {}", report.path);
    let verdict = match report.status {
        Status::Valid => "MPEG 音频",
        Status::Invalid => "不是 MPEG 音频",
        Status::Unreadable => "无法打开",
    };
    println!("  结论         : {verdict}");
    if let Some(reason) = &report.reason {
        println!("  原因         : {reason}");
    }
    if let Some(frame) = &report.first_frame {
        println!("  首帧偏移     : {}", frame.offset);
        println!("  版本         : {} {}", frame.version, frame.layer);
        println!("  采样率       : {} Hz", frame.sample_rate);
        println!("  声道模式     : {}", frame.channel_mode);
        println!("  帧长度       : {} bytes", frame.frame_size);
    }
    if let Some(n) = report.chained_frames {
        println!("  已串联帧数   : {n}");
    }
    println!("[/FILE]");
}
