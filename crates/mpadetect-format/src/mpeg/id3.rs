//! ID3v2 标签跳过.
//!
//! 标签头 10 字节: `"ID3"` + 版本 (2) + 标志 (1) + syncsafe 大小 (4).
//! 标志位 bit4 表示标签末尾另有 10 字节页脚.

use log::debug;

use crate::io::ByteSource;

/// 标签头长度
pub const ID3V2_HEADER_SIZE: u64 = 10;

/// 页脚长度
pub const ID3V2_FOOTER_SIZE: u64 = 10;

const FOOTER_PRESENT_FLAG: u8 = 0x10;

/// 解析 10 字节标签头, 返回整个标签 (头 + 内容 + 页脚) 的字节数
///
/// 不是 ID3v2 标签时返回 `None`.
pub fn id3v2_tag_size(header: &[u8; 10]) -> Option<u64> {
    if &header[0..3] != b"ID3" {
        return None;
    }

    // syncsafe 整数: 每字节只用低 7 位
    let size = u64::from(header[6]) << 21
        | u64::from(header[7]) << 14
        | u64::from(header[8]) << 7
        | u64::from(header[9]);

    let footer = if header[5] & FOOTER_PRESENT_FLAG != 0 {
        ID3V2_FOOTER_SIZE
    } else {
        0
    };
    Some(ID3V2_HEADER_SIZE + size + footer)
}

/// 跳过 `offset` 处的 ID3v2 标签, 返回音频数据的起始偏移
///
/// 没有标签或数据不足 10 字节时原样返回 `offset`.
pub fn skip_id3v2<S: ByteSource + ?Sized>(source: &mut S, offset: u64) -> u64 {
    let mut header = [0u8; 10];
    if let Err(e) = source.read_at(offset, &mut header) {
        debug!("ID3v2: 无法读取标签头 ({e}), 视为无标签");
        return offset;
    }

    match id3v2_tag_size(&header) {
        Some(tag_size) => {
            debug!("ID3v2: 跳过标签, 大小={tag_size} 字节");
            offset + tag_size
        }
        None => offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_header(flags: u8, size: u32) -> Vec<u8> {
        let mut data = b"ID3".to_vec();
        data.push(4); // version major
        data.push(0); // version minor
        data.push(flags);
        data.extend_from_slice(&[
            ((size >> 21) & 0x7F) as u8,
            ((size >> 14) & 0x7F) as u8,
            ((size >> 7) & 0x7F) as u8,
            (size & 0x7F) as u8,
        ]);
        data
    }

    #[test]
    fn test_无页脚() {
        let data = tag_header(0x00, 100);
        let mut src: &[u8] = &data;
        assert_eq!(skip_id3v2(&mut src, 0), 110);
    }

    #[test]
    fn test_有页脚() {
        let data = tag_header(0x10, 100);
        let mut src: &[u8] = &data;
        assert_eq!(skip_id3v2(&mut src, 0), 120);
    }

    #[test]
    fn test_syncsafe_多字节() {
        // 0x0A_BCDE 需要占满 4 个 7-bit 组
        let size = 0x0ABC_DE;
        let data = tag_header(0x00, size);
        assert_eq!(&data[6..10], &[0x00, 0x2A, 0x79, 0x5E]);
        let mut src: &[u8] = &data;
        assert_eq!(skip_id3v2(&mut src, 0), 10 + u64::from(size));
    }

    #[test]
    fn test_无标签() {
        let data = [0xFFu8, 0xFB, 0x90, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut src: &[u8] = &data;
        assert_eq!(skip_id3v2(&mut src, 0), 0);
        assert_eq!(id3v2_tag_size(b"OggS\0\0\0\0\0\0"), None);
    }

    #[test]
    fn test_数据不足视为无标签() {
        let data = b"ID3\x04\x00".to_vec();
        let mut src: &[u8] = &data;
        assert_eq!(skip_id3v2(&mut src, 0), 0);
        let empty: Vec<u8> = Vec::new();
        let mut src: &[u8] = &empty;
        assert_eq!(skip_id3v2(&mut src, 0), 0);
    }

    #[test]
    fn test_非零起始偏移() {
        let mut data = vec![0u8; 5];
        data.extend(tag_header(0x00, 3));
        let mut src: &[u8] = &data;
        assert_eq!(skip_id3v2(&mut src, 5), 18);
    }
}
