//! I/O 抽象层.
//!
//! 探测流程只需要"在任意偏移读取若干字节"这一种能力, 由 [`ByteSource`] 表达.
//! [`IoContext`] 在文件、内存缓冲区等后端之上提供带缓冲的实现.

use std::io::{self, Read, Seek};

use mpadetect_core::{DetectError, DetectResult};

/// 可随机访问的只读字节源
///
/// 所有探测例程都显式传入偏移, 不依赖任何隐藏的读游标.
pub trait ByteSource {
    /// 从 `offset` 处读取恰好 `buf.len()` 字节
    ///
    /// 可用字节不足时返回 [`DetectError::Eof`].
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DetectResult<()>;
}

impl ByteSource for &[u8] {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DetectResult<()> {
        let start = usize::try_from(offset).map_err(|_| DetectError::Eof)?;
        let end = start.checked_add(buf.len()).ok_or(DetectError::Eof)?;
        let window = self.get(start..end).ok_or(DetectError::Eof)?;
        buf.copy_from_slice(window);
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DetectResult<()> {
        (**self).read_at(offset, buf)
    }
}

/// I/O 上下文
///
/// 封装底层 I/O 后端, 提供带读缓冲的顺序读取与定位.
pub struct IoContext {
    /// 内部 I/O 实现
    inner: Box<dyn IoBackend>,
    /// 读缓冲区
    buffer: Vec<u8>,
    /// 缓冲区首字节在数据源中的偏移
    buf_start: u64,
    /// 缓冲区中的有效数据长度
    buf_len: usize,
    /// 缓冲区当前读取位置
    buf_pos: usize,
}

/// I/O 后端 trait
///
/// 实现此 trait 以支持不同的数据来源 (文件、内存等).
pub trait IoBackend: Send {
    /// 读取数据到缓冲区
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// 定位 (seek)
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64>;
    /// 获取总大小 (如果可知)
    fn size(&self) -> Option<u64>;
}

/// 默认缓冲区大小 (32 KB)
const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

impl IoContext {
    /// 从 I/O 后端创建上下文
    pub fn new(backend: Box<dyn IoBackend>) -> Self {
        Self {
            inner: backend,
            buffer: vec![0u8; DEFAULT_BUFFER_SIZE],
            buf_start: 0,
            buf_len: 0,
            buf_pos: 0,
        }
    }

    /// 从内存数据创建
    pub fn from_data(data: Vec<u8>) -> Self {
        Self::new(Box::new(MemoryBackend::from_data(data)))
    }

    /// 从文件路径打开 (只读)
    pub fn open_read(path: impl AsRef<std::path::Path>) -> DetectResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(Box::new(FileBackend::new(file))))
    }

    /// 读取指定字节数
    pub fn read_exact(&mut self, buf: &mut [u8]) -> DetectResult<()> {
        let mut total_read = 0;
        while total_read < buf.len() {
            let buffered = self.buf_len - self.buf_pos;
            if buffered > 0 {
                let to_copy = buffered.min(buf.len() - total_read);
                buf[total_read..total_read + to_copy]
                    .copy_from_slice(&self.buffer[self.buf_pos..self.buf_pos + to_copy]);
                self.buf_pos += to_copy;
                total_read += to_copy;
            } else {
                // 整个缓冲区已消耗, 下一块紧接其后
                self.buf_start += self.buf_len as u64;
                self.buf_pos = 0;
                self.buf_len = self.inner.read(&mut self.buffer)?;
                if self.buf_len == 0 {
                    return Err(DetectError::Eof);
                }
            }
        }
        Ok(())
    }

    /// 读取 4 字节大端整数
    pub fn read_u32_be(&mut self) -> DetectResult<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// 定位 (seek)
    ///
    /// 注意: seek 会清空读缓冲区.
    pub fn seek(&mut self, pos: io::SeekFrom) -> DetectResult<u64> {
        let new_pos = self.inner.seek(pos)?;
        self.buf_start = new_pos;
        self.buf_pos = 0;
        self.buf_len = 0;
        Ok(new_pos)
    }

    /// 获取当前位置
    pub fn position(&self) -> u64 {
        self.buf_start + self.buf_pos as u64
    }

    /// 获取总大小
    pub fn size(&self) -> Option<u64> {
        self.inner.size()
    }
}

impl ByteSource for IoContext {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DetectResult<()> {
        // 请求区间完全落在当前缓冲区内时直接复制, 避免逐字节扫描时反复 seek
        let window_end = self.buf_start + self.buf_len as u64;
        let fits = offset
            .checked_add(buf.len() as u64)
            .is_some_and(|end| offset >= self.buf_start && end <= window_end);
        if fits {
            let start = (offset - self.buf_start) as usize;
            buf.copy_from_slice(&self.buffer[start..start + buf.len()]);
            self.buf_pos = start + buf.len();
            return Ok(());
        }
        self.seek(io::SeekFrom::Start(offset))?;
        self.read_exact(buf)
    }
}

/// 文件 I/O 后端
struct FileBackend {
    file: std::fs::File,
    size: Option<u64>,
}

impl FileBackend {
    fn new(file: std::fs::File) -> Self {
        let size = file.metadata().ok().map(|m| m.len());
        Self { file, size }
    }
}

impl IoBackend for FileBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }

    fn size(&self) -> Option<u64> {
        self.size
    }
}

/// 内存缓冲区 I/O 后端
///
/// 用于测试和内存中处理.
pub struct MemoryBackend {
    /// 数据缓冲区
    data: Vec<u8>,
    /// 当前位置
    pos: usize,
}

impl MemoryBackend {
    /// 从已有数据创建
    pub fn from_data(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// 获取内部数据的引用
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl IoBackend for MemoryBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let to_read = buf.len().min(available);
        if to_read == 0 {
            return Ok(0);
        }
        buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
        self.pos += to_read;
        Ok(to_read)
    }

    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            io::SeekFrom::Start(offset) => offset as i64,
            io::SeekFrom::End(offset) => self.data.len() as i64 + offset,
            io::SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek 位置不能为负",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_切片_read_at() {
        let data = sample_data(16);
        let mut src: &[u8] = &data;
        let mut buf = [0u8; 4];
        src.read_at(3, &mut buf).unwrap();
        assert_eq!(buf, [3, 4, 5, 6]);

        // 末尾只剩 2 字节
        assert!(matches!(src.read_at(14, &mut buf), Err(DetectError::Eof)));
        assert!(matches!(src.read_at(u64::MAX, &mut buf), Err(DetectError::Eof)));
    }

    #[test]
    fn test_缓冲区内随机读取() {
        let data = sample_data(1000);
        let mut io = IoContext::from_data(data.clone());
        let mut buf = [0u8; 4];
        for offset in [0u64, 10, 5, 996, 500, 1] {
            io.read_at(offset, &mut buf).unwrap();
            let o = offset as usize;
            assert_eq!(&buf, &data[o..o + 4]);
        }
        assert!(matches!(io.read_at(997, &mut buf), Err(DetectError::Eof)));
    }

    #[test]
    fn test_跨缓冲区边界读取() {
        let len = DEFAULT_BUFFER_SIZE * 2 + 100;
        let data = sample_data(len);
        let mut io = IoContext::from_data(data.clone());
        let mut buf = [0u8; 4];
        // 逐字节前进, 跨越两个缓冲区边界
        let from = DEFAULT_BUFFER_SIZE as u64 - 8;
        for offset in from..from + 16 {
            io.read_at(offset, &mut buf).unwrap();
            let o = offset as usize;
            assert_eq!(&buf, &data[o..o + 4]);
        }
        // 回退到更早的位置
        io.read_at(2, &mut buf).unwrap();
        assert_eq!(&buf, &data[2..6]);
    }

    #[test]
    fn test_顺序读取与定位() {
        let mut io = IoContext::from_data(vec![0xFF, 0xFB, 0x90, 0x00, 0x11]);
        assert_eq!(io.size(), Some(5));
        assert_eq!(io.read_u32_be().unwrap(), 0xFFFB_9000);
        assert_eq!(io.position(), 4);
        io.seek(io::SeekFrom::Start(1)).unwrap();
        assert_eq!(io.position(), 1);
        assert_eq!(io.read_u32_be().unwrap(), 0xFB90_0011);
        assert!(matches!(io.read_u32_be(), Err(DetectError::Eof)));
    }

    #[test]
    fn test_内存后端负向_seek() {
        let mut backend = MemoryBackend::from_data(vec![1, 2, 3]);
        assert!(backend.seek(io::SeekFrom::Current(-1)).is_err());
        assert_eq!(backend.seek(io::SeekFrom::End(-1)).unwrap(), 2);
        assert_eq!(backend.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_打开不存在的文件() {
        let result = IoContext::open_read("/nonexistent/mpadetect/input.mp3");
        assert!(matches!(result, Err(DetectError::Io(_))));
    }
}
