//! 探测参数.

use mpadetect_core::{DetectError, DetectResult};
use serde::{Deserialize, Serialize};

/// 前向扫描的默认最大范围 (字节)
pub const DEFAULT_MAX_SCAN_RANGE: u64 = 16384;

/// 邻近探测的默认最大步数
pub const DEFAULT_OFFSET_TOLERANCE: u64 = 6;

/// 默认需要串联验证的后续帧数
pub const DEFAULT_CHAIN_DEPTH: usize = 1;

/// 探测参数
///
/// 扫描范围是流程内唯一的工作量上限, 保证在任意输入上都能结束.
/// 反序列化时缺失的字段取默认值.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectConfig {
    /// 首帧前向扫描的最大字节数
    pub max_scan_range: u64,
    /// 定位后续帧时的最大探测步数
    pub offset_tolerance: u64,
    /// 首帧之后还需连续找到的兼容帧数
    pub chain_depth: usize,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            max_scan_range: DEFAULT_MAX_SCAN_RANGE,
            offset_tolerance: DEFAULT_OFFSET_TOLERANCE,
            chain_depth: DEFAULT_CHAIN_DEPTH,
        }
    }
}

impl DetectConfig {
    pub fn with_max_scan_range(mut self, bytes: u64) -> Self {
        self.max_scan_range = bytes;
        self
    }

    pub fn with_offset_tolerance(mut self, steps: u64) -> Self {
        self.offset_tolerance = steps;
        self
    }

    pub fn with_chain_depth(mut self, frames: usize) -> Self {
        self.chain_depth = frames;
        self
    }

    /// 校验参数
    ///
    /// `chain_depth` 为 0 时任何一个偶然的同步码都会被接受, 因此拒绝.
    pub fn validate(&self) -> DetectResult<()> {
        if self.chain_depth == 0 {
            return Err(DetectError::InvalidArgument(
                "chain_depth 至少为 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认参数() {
        let cfg = DetectConfig::default();
        assert_eq!(cfg.max_scan_range, 16384);
        assert_eq!(cfg.offset_tolerance, 6);
        assert_eq!(cfg.chain_depth, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_链深度为零无效() {
        let cfg = DetectConfig::default().with_chain_depth(0);
        assert!(matches!(cfg.validate(), Err(DetectError::InvalidArgument(_))));
        let cfg = cfg.with_chain_depth(3).with_offset_tolerance(2).with_max_scan_range(10);
        assert!(cfg.validate().is_ok());
        assert_eq!((cfg.max_scan_range, cfg.offset_tolerance), (10, 2));
    }

    #[test]
    fn test_反序列化_缺省字段() {
        let cfg: DetectConfig = serde_json::from_str(r#"{"chain_depth": 2}"#).unwrap();
        assert_eq!(cfg.chain_depth, 2);
        assert_eq!(cfg.max_scan_range, DEFAULT_MAX_SCAN_RANGE);
        assert_eq!(cfg.offset_tolerance, DEFAULT_OFFSET_TOLERANCE);
    }
}
