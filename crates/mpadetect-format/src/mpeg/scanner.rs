//! 帧同步扫描.
//!
//! 两种重同步策略:
//! - 前向扫描 (首帧): 每次失败前进 1 字节, 最多扫描 `max_scan_range` 字节
//! - 邻近探测 (后续帧): 以计算出的偏移为中心, 按 +1, -2, +3, -4 ... 的累积步长
//!   左右交替, 最多 `offset_tolerance` 步. 用于容忍帧长取整误差与编码器填充差异

use log::trace;
use mpadetect_core::{DetectError, DetectResult};

use super::header::FrameHeader;
use crate::config::DetectConfig;
use crate::io::ByteSource;

/// 单次探测结果
enum Probe {
    /// 找到可解码的帧头
    Found(FrameHeader),
    /// 此位置不是有效帧头
    Miss,
    /// 此位置已无 4 字节可读
    End,
}

/// 判断 4 字节是否可作为候选帧头
///
/// 要求 11 bit 同步码, 且比特率索引不为 15.
pub fn is_sync_candidate(bytes: &[u8; 4]) -> bool {
    bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 && (bytes[2] & 0xF0) != 0xF0
}

/// 在 `offset` 处或其附近查找帧头, 返回帧头及其实际偏移
///
/// - `exact_offset = false`: 前向扫描
/// - `exact_offset = true`: 邻近探测
///
/// 候选帧头解码失败只算一次失败的尝试. 提供 `baseline` 时, 找到的帧头必须与之
/// 兼容, 否则立即返回 [`DetectError::ChainMismatch`] 而不再继续搜索.
pub fn find_frame<S: ByteSource + ?Sized>(
    source: &mut S,
    offset: u64,
    exact_offset: bool,
    baseline: Option<&FrameHeader>,
    config: &DetectConfig,
) -> DetectResult<(FrameHeader, u64)> {
    let positions: Box<dyn Iterator<Item = u64>> = if exact_offset {
        Box::new(nearby_offsets(offset, config.offset_tolerance))
    } else {
        Box::new(offset..=offset.saturating_add(config.max_scan_range))
    };

    for pos in positions {
        match probe_at(source, pos, baseline)? {
            Probe::Found(header) => {
                trace!("同步: 偏移 {pos} 处找到帧头");
                return Ok((header, pos));
            }
            Probe::Miss => {}
            // 前向扫描时之后的位置同样不可读
            Probe::End if !exact_offset => break,
            Probe::End => {}
        }
    }

    let reason = if exact_offset {
        format!(
            "偏移 {offset} 附近 {} 步内没有帧头",
            config.offset_tolerance
        )
    } else {
        format!(
            "偏移 {offset} 之后 {} 字节内没有帧头",
            config.max_scan_range
        )
    };
    Err(DetectError::ScanExhausted(reason))
}

/// 邻近探测的偏移序列: `offset`, 然后每步累加 `+1, -2, +3, -4 ...`
///
/// 即依次探测 o, o+1, o-1, o+2, o-2 ..., 落到 0 之前的位置直接跳过.
pub(crate) fn nearby_offsets(offset: u64, tolerance: u64) -> impl Iterator<Item = u64> {
    (0..=tolerance)
        .scan(i128::from(offset), |cursor, step| {
            if step % 2 == 1 {
                *cursor += i128::from(step);
            } else {
                *cursor -= i128::from(step);
            }
            Some(*cursor)
        })
        .filter_map(|cursor| u64::try_from(cursor).ok())
}

fn probe_at<S: ByteSource + ?Sized>(
    source: &mut S,
    pos: u64,
    baseline: Option<&FrameHeader>,
) -> DetectResult<Probe> {
    let mut bytes = [0u8; 4];
    match source.read_at(pos, &mut bytes) {
        Ok(()) => {}
        Err(e) if e.is_eof() => return Ok(Probe::End),
        Err(e) => return Err(e),
    }

    if !is_sync_candidate(&bytes) {
        return Ok(Probe::Miss);
    }

    let header = match FrameHeader::decode(bytes) {
        Ok(header) => header,
        Err(e) => {
            trace!("同步: 偏移 {pos} 处候选帧头无效: {e}");
            return Ok(Probe::Miss);
        }
    };

    if let Some(base) = baseline {
        if !header.matches(base) {
            return Err(DetectError::ChainMismatch(format!(
                "偏移 {pos} 处帧头 {:?} 与前一帧 {:?} 不属于同一音频流",
                header.identity(),
                base.identity()
            )));
        }
    }

    Ok(Probe::Found(header))
}
