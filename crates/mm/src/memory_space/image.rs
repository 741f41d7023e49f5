//! 进程映像
//!
//! 映像由指令区和其后的数据区组成，总大小为 `size` 字节。
//! 指令区的字节是加载时给定的，数据区初始为零。

use crate::address::{PageNum, Vpn};
use crate::page_table::{PagingError, PagingResult};
use alloc::vec::Vec;

/// 进程映像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessImage {
    size: usize,
    text: Vec<u8>,
}

impl ProcessImage {
    /// 由总大小和指令区字节创建映像
    ///
    /// # Errors
    ///
    /// 指令区比映像还大时返回 [`PagingError::InvalidImage`]。
    pub fn new(size: usize, text: Vec<u8>) -> PagingResult<Self> {
        if text.len() > size {
            return Err(PagingError::InvalidImage {
                size,
                instruction_len: text.len(),
            });
        }
        Ok(Self { size, text })
    }

    /// 映像总大小
    pub fn size(&self) -> usize {
        self.size
    }

    /// 指令区字节
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// 指令区大小
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// 映像覆盖的页数
    pub fn num_pages(&self, page_size: usize) -> usize {
        self.size.div_ceil(page_size)
    }

    /// 用第 `vpn` 页的初始内容填充 `dst`
    ///
    /// 指令区部分复制映像字节，其余清零。
    pub fn fill_page(&self, vpn: Vpn, dst: &mut [u8]) {
        dst.fill(0);
        let start = vpn.start_offset(dst.len());
        if start >= self.text.len() {
            return;
        }
        let end = self.text.len().min(start + dst.len());
        dst[..end - start].copy_from_slice(&self.text[start..end]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_rejects_oversized_text() {
        assert!(matches!(
            ProcessImage::new(8, vec![1; 9]),
            Err(PagingError::InvalidImage {
                size: 8,
                instruction_len: 9
            })
        ));
    }

    #[test]
    fn test_page_counts() {
        let image = ProcessImage::new(100, vec![0; 40]).unwrap();
        assert_eq!(image.num_pages(32), 4);
        assert_eq!(image.num_pages(25), 4);

        let text_only = ProcessImage::new(64, vec![0; 64]).unwrap();
        assert_eq!(text_only.num_pages(32), 2);
    }

    #[test]
    fn test_fill_page_copies_text_and_zeroes_rest() {
        let text: Vec<u8> = (1..=6).collect();
        let image = ProcessImage::new(16, text).unwrap();
        let mut page = [0xFFu8; 4];

        image.fill_page(Vpn(0), &mut page);
        assert_eq!(page, [1, 2, 3, 4]);
        image.fill_page(Vpn(1), &mut page);
        assert_eq!(page, [5, 6, 0, 0]);
        image.fill_page(Vpn(3), &mut page);
        assert_eq!(page, [0; 4]);
    }
}
