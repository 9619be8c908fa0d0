//! 帧链校验.
//!
//! 偶然出现的同步码很常见, 单个帧头不足以确认音频流. 找到首帧后按计算出的帧长
//! 定位下一帧, 要求其可解码且与前一帧兼容.

use log::debug;
use mpadetect_core::DetectResult;

use super::header::FrameHeader;
use super::scanner::find_frame;
use crate::config::DetectConfig;
use crate::io::ByteSource;

/// 帧链中已定位的一帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedFrame {
    /// 帧头在数据源中的偏移
    pub offset: u64,
    pub header: FrameHeader,
    /// 帧总字节数
    pub size: u32,
}

impl LocatedFrame {
    /// 按帧长推算的下一帧偏移
    pub fn next_offset(&self) -> u64 {
        self.offset + u64::from(self.size)
    }
}

/// 连续且相互兼容的帧序列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameChain {
    pub frames: Vec<LocatedFrame>,
}

impl FrameChain {
    pub fn first(&self) -> Option<&LocatedFrame> {
        self.frames.first()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// 从 `offset` 开始定位一帧, 再依次串联 `depth` 个后续帧
///
/// 每个后续帧都在前一帧推算出的偏移附近邻近探测, 并以前一帧为兼容基准.
/// 任一环节失败即返回对应错误.
pub fn verify_chain<S: ByteSource + ?Sized>(
    source: &mut S,
    offset: u64,
    depth: usize,
    exact_offset: bool,
    compare: Option<&FrameHeader>,
    config: &DetectConfig,
) -> DetectResult<FrameChain> {
    let mut frames = Vec::with_capacity(depth + 1);
    let (header, found) = find_frame(source, offset, exact_offset, compare, config)?;
    let mut last = LocatedFrame {
        offset: found,
        header,
        size: header.frame_size(),
    };
    frames.push(last);

    for _ in 0..depth {
        let (header, found) =
            find_frame(source, last.next_offset(), true, Some(&last.header), config)?;
        last = LocatedFrame {
            offset: found,
            header,
            size: header.frame_size(),
        };
        frames.push(last);
    }

    Ok(FrameChain { frames })
}

/// 校验 `offset` 处 (或附近) 是否为有效帧
///
/// `find_sub_frames` 为真时还要求紧随其后有一个兼容帧. 使用默认扫描参数.
pub fn verify_frame<S: ByteSource + ?Sized>(
    source: &mut S,
    offset: u64,
    find_sub_frames: bool,
    exact_offset: bool,
    compare: Option<&FrameHeader>,
) -> bool {
    let depth = usize::from(find_sub_frames);
    match verify_chain(
        source,
        offset,
        depth,
        exact_offset,
        compare,
        &DetectConfig::default(),
    ) {
        Ok(_) => true,
        Err(e) => {
            debug!("帧校验失败: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpeg::testutil::{MP3_128K, build_frame, make_header};
    use mpadetect_core::DetectError;

    #[test]
    fn test_两帧串联() {
        let frame = build_frame(MP3_128K);
        let mut data = frame.clone();
        data.extend_from_slice(&frame);
        let mut src: &[u8] = &data;

        let chain = verify_chain(&mut src, 0, 1, false, None, &DetectConfig::default()).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.frames[0].offset, 0);
        assert_eq!(chain.frames[0].size, 417);
        assert_eq!(chain.frames[1].offset, 417);

        let mut src: &[u8] = &data;
        assert!(verify_frame(&mut src, 0, true, false, None));
    }

    #[test]
    fn test_单帧不足以通过() {
        let data = build_frame(MP3_128K);
        let mut src: &[u8] = &data;
        assert!(!verify_frame(&mut src, 0, true, false, None));
        // 不要求后续帧时单帧即可
        let mut src: &[u8] = &data;
        assert!(verify_frame(&mut src, 0, false, false, None));
    }

    #[test]
    fn test_帧长误差由邻近探测吸收() {
        // 第一帧实际比计算值多 2 字节
        let mut data = build_frame(MP3_128K);
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&build_frame(MP3_128K));
        let mut src: &[u8] = &data;
        let chain = verify_chain(&mut src, 0, 1, false, None, &DetectConfig::default()).unwrap();
        assert_eq!(chain.frames[1].offset, 419);
    }

    #[test]
    fn test_可变比特率仍兼容() {
        let mut data = build_frame(MP3_128K);
        data.extend_from_slice(&build_frame(make_header(3, 1, 14, 0, true, 1)));
        data.extend_from_slice(&build_frame(make_header(3, 1, 5, 0, false, 0)));
        let mut src: &[u8] = &data;
        let cfg = DetectConfig::default().with_chain_depth(2);
        let chain = verify_chain(&mut src, 0, 2, false, None, &cfg).unwrap();
        let bitrates: Vec<u32> = chain.frames.iter().map(|f| f.header.bitrate).collect();
        assert_eq!(bitrates, vec![128_000, 320_000, 64_000]);
    }

    #[test]
    fn test_后续帧不兼容() {
        let mut data = build_frame(MP3_128K);
        // 单声道帧
        data.extend_from_slice(&build_frame(make_header(3, 1, 9, 0, false, 3)));
        let mut src: &[u8] = &data;
        let result = verify_chain(&mut src, 0, 1, false, None, &DetectConfig::default());
        assert!(matches!(result, Err(DetectError::ChainMismatch(_))));
    }

    #[test]
    fn test_链深度超过帧数() {
        let frame = build_frame(MP3_128K);
        let data = frame.repeat(3);
        let mut src: &[u8] = &data;
        let cfg = DetectConfig::default().with_chain_depth(3);
        assert!(verify_chain(&mut src, 0, 3, false, None, &cfg).is_err());
        let mut src: &[u8] = &data;
        assert_eq!(verify_chain(&mut src, 0, 2, false, None, &cfg).unwrap().len(), 3);
    }
}
