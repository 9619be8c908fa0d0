//! mpadetect-probe - MPEG 音频批量识别工具
//!
//! 对每个输入文件给出是否为 MPEG 音频 (MP1/MP2/MP3) 的结论, 并列出首帧参数.

mod logging;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::path::Path;
use std::process;
use tracing::{info, warn};

use mpadetect_format::{DetectConfig, Detector, IoContext};
use mpadetect_format::config::{
    DEFAULT_CHAIN_DEPTH, DEFAULT_MAX_SCAN_RANGE, DEFAULT_OFFSET_TOLERANCE,
};
use report::FileReport;

/// MPEG 音频识别工具
#[derive(Parser, Debug)]
#[command(name = "mpadetect-probe", version, about = "纯 Rust MPEG 音频流识别工具")]
struct Cli {
    /// 输入文件路径
    #[arg(required = true)]
    inputs: Vec<String>,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 静默模式 (每个文件只输出一行结论)
    #[arg(short, long)]
    quiet: bool,

    /// 首帧之后需要串联校验的帧数
    #[arg(long, default_value_t = DEFAULT_CHAIN_DEPTH)]
    chain_depth: usize,

    /// 向前扫描同步码的最大字节数
    #[arg(long, default_value_t = DEFAULT_MAX_SCAN_RANGE)]
    max_scan_range: u64,

    /// 预期偏移附近的邻近探测步数
    #[arg(long, default_value_t = DEFAULT_OFFSET_TOLERANCE)]
    offset_tolerance: u64,

    /// 日志详细程度 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn detect_config(&self) -> DetectConfig {
        DetectConfig::default()
            .with_chain_depth(self.chain_depth)
            .with_max_scan_range(self.max_scan_range)
            .with_offset_tolerance(self.offset_tolerance)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init("mpadetect-probe", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("错误: {e:#}");
            process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let detector = Detector::new(cli.detect_config()).context("探测参数无效")?;

    let reports: Vec<FileReport> = cli
        .inputs
        .par_iter()
        .map(|path| probe_file(&detector, path))
        .collect();

    let valid = reports.iter().filter(|r| r.is_valid()).count();
    info!("共探测 {} 个文件, {} 个为 MPEG 音频", reports.len(), valid);

    if cli.json {
        let json = serde_json::to_string_pretty(&reports).context("序列化探测结果失败")?;
        println!("{json}");
    } else if cli.quiet {
        for r in &reports {
            println!("{}", report::quiet_line(r));
        }
    } else {
        for r in &reports {
            report::print_text(r);
        }
    }

    Ok(report::exit_code(&reports))
}

/// 探测单个文件; 打开失败记为 `Unreadable`
fn probe_file(detector: &Detector, path: &str) -> FileReport {
    match open_input(path) {
        Ok(mut io) => FileReport::from_detection(path, detector.detect(&mut io)),
        Err(e) => {
            warn!("{e:#}");
            FileReport::unreadable(path, &e)
        }
    }
}

fn open_input(path: &str) -> Result<IoContext> {
    IoContext::open_read(Path::new(path)).with_context(|| format!("无法打开文件: {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::Status;
    use std::io::Write;

    fn stream_bytes(frames: usize) -> Vec<u8> {
        let mut frame = vec![0u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        frame.repeat(frames)
    }

    fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_命令行_默认参数() {
        let cli = Cli::try_parse_from(["mpadetect-probe", "a.mp3"]).unwrap();
        let config = cli.detect_config();
        assert_eq!(config, DetectConfig::default());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_命令行_自定义参数() {
        let cli = Cli::try_parse_from([
            "mpadetect-probe",
            "--chain-depth",
            "3",
            "--max-scan-range",
            "1024",
            "-vv",
            "a.mp3",
            "b.mp3",
        ])
        .unwrap();
        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.verbose, 2);
        let config = cli.detect_config();
        assert_eq!(config.chain_depth, 3);
        assert_eq!(config.max_scan_range, 1024);
    }

    #[test]
    fn test_命令行_缺少输入() {
        assert!(Cli::try_parse_from(["mpadetect-probe"]).is_err());
    }

    #[test]
    fn test_探测文件_有效与无效() {
        let detector = Detector::default();
        let good = write_temp(&stream_bytes(2));
        let bad = write_temp(&[0u8; 2048]);

        let report = probe_file(&detector, good.path().to_str().unwrap());
        assert_eq!(report.status, Status::Valid);
        assert_eq!(report.chained_frames, Some(2));

        let report = probe_file(&detector, bad.path().to_str().unwrap());
        assert_eq!(report.status, Status::Invalid);
    }

    #[test]
    fn test_探测文件_无法打开() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp3");
        let report = probe_file(&Detector::default(), missing.to_str().unwrap());
        assert_eq!(report.status, Status::Unreadable);
        assert!(report.reason.unwrap().contains("无法打开文件"));
    }
}
