//! 地址空间
//!
//! 一个进程的页表、映像和后备区。地址空间本身不持有帧，
//! 帧的分配与淘汰由 [`crate::MemoryManager`] 协调。

use crate::Pid;
use crate::address::{Ppn, UsizeConvert, Vaddr, Vpn};
use crate::memory_space::{BackingStore, ProcessImage};
use crate::page_table::{PageTable, PagingError, PagingResult, Translation};

/// 进程地址空间
#[derive(Debug, Clone)]
pub struct AddressSpace {
    pid: Pid,
    page_size: usize,
    page_table: PageTable,
    image: ProcessImage,
    backing: BackingStore,
}

impl AddressSpace {
    /// 为映像创建地址空间
    ///
    /// `backing_pages` 为 `None` 时后备区容量等于映像的页数：
    /// 写指令区的页同样会使其变脏。
    pub fn new(
        pid: Pid,
        image: ProcessImage,
        page_size: usize,
        backing_pages: Option<usize>,
    ) -> Self {
        let capacity = backing_pages.unwrap_or_else(|| image.num_pages(page_size));
        Self {
            pid,
            page_size,
            page_table: PageTable::new(image.num_pages(page_size)),
            image,
            backing: BackingStore::new(capacity),
        }
    }

    /// 所属进程
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// 页表
    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    /// 映像
    pub fn image(&self) -> &ProcessImage {
        &self.image
    }

    /// 后备区
    pub fn backing(&self) -> &BackingStore {
        &self.backing
    }

    /// 翻译一次 `len` 字节的访问
    ///
    /// # Errors
    ///
    /// - [`PagingError::OutOfRange`]：页号超出页表
    /// - [`PagingError::Misaligned`]：访问跨越页边界
    pub fn translate(&self, vaddr: Vaddr, len: usize) -> PagingResult<Translation> {
        let (vpn, offset) = vaddr.split(self.page_size);
        let pages = self.page_table.len();
        let translation =
            self.page_table
                .translate(vpn, offset)
                .ok_or(PagingError::OutOfRange {
                    vaddr: vaddr.as_usize(),
                    pages,
                })?;
        if offset + len > self.page_size {
            return Err(PagingError::Misaligned {
                vaddr: vaddr.as_usize(),
                len,
            });
        }
        Ok(translation)
    }

    /// 用 `vpn` 的当前内容填充新分配的帧
    ///
    /// 后备区有该页时从后备区恢复并返回 true，否则从映像初始化。
    pub(crate) fn populate(&self, vpn: Vpn, dst: &mut [u8]) -> bool {
        if self.backing.restore(vpn, dst) {
            return true;
        }
        self.image.fill_page(vpn, dst);
        false
    }

    pub(crate) fn map(&mut self, vpn: Vpn, ppn: Ppn) -> PagingResult<()> {
        if self.page_table.map(vpn, ppn) {
            Ok(())
        } else {
            Err(PagingError::AlreadyMapped {
                pid: self.pid,
                vpn: vpn.as_usize(),
            })
        }
    }

    pub(crate) fn mark_dirty(&mut self, vpn: Vpn) {
        self.page_table.mark_dirty(vpn);
    }

    /// 淘汰驻留在 `ppn` 的 `vpn`
    ///
    /// 脏页先写回后备区，再使页表项失效；返回是否发生了写回。
    /// 出错时不修改任何状态。
    pub(crate) fn evict(
        &mut self,
        vpn: Vpn,
        ppn: Ppn,
        contents: &[u8],
        dirty: bool,
    ) -> PagingResult<bool> {
        let bound = self
            .page_table
            .entry(vpn)
            .and_then(|e| e.ppn())
            .is_some_and(|p| p == ppn);
        if !bound {
            return Err(PagingError::BindingMismatch {
                pid: self.pid,
                vpn: vpn.as_usize(),
                ppn: ppn.as_usize(),
            });
        }

        if dirty && !self.backing.store(vpn, contents) {
            return Err(PagingError::FrameExhausted {
                pid: self.pid,
                vpn: vpn.as_usize(),
            });
        }
        self.page_table.unmap(vpn);
        Ok(dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn space(backing: Option<usize>) -> AddressSpace {
        let image = ProcessImage::new(40, vec![7; 12]).unwrap();
        AddressSpace::new(1, image, 16, backing)
    }

    #[test]
    fn test_translate_checks() {
        let s = space(None);
        assert_eq!(s.page_table().len(), 3);
        assert!(matches!(
            s.translate(Vaddr(18), 4),
            Ok(Translation::Fault { vpn: Vpn(1), offset: 2 })
        ));
        assert!(matches!(
            s.translate(Vaddr(48), 4),
            Err(PagingError::OutOfRange { vaddr: 48, pages: 3 })
        ));
        assert!(matches!(
            s.translate(Vaddr(14), 4),
            Err(PagingError::Misaligned { vaddr: 14, len: 4 })
        ));
    }

    #[test]
    fn test_default_backing_covers_every_page() {
        assert_eq!(space(None).backing().capacity(), 3);
        assert_eq!(space(Some(1)).backing().capacity(), 1);
    }

    #[test]
    fn test_dirty_evict_needs_backing_room() {
        let mut s = space(Some(0));
        s.map(Vpn(2), Ppn(0)).unwrap();

        let err = s.evict(Vpn(2), Ppn(0), &[1; 16], true).unwrap_err();
        assert!(matches!(err, PagingError::FrameExhausted { pid: 1, vpn: 2 }));
        // 失败后仍然映射
        assert_eq!(s.page_table().entry(Vpn(2)).unwrap().ppn(), Some(Ppn(0)));

        assert_eq!(s.evict(Vpn(2), Ppn(0), &[1; 16], false), Ok(false));
        assert_eq!(s.page_table().resident_pages(), 0);
    }

    #[test]
    fn test_evict_and_restore() {
        let mut s = space(None);
        s.map(Vpn(1), Ppn(3)).unwrap();
        assert_eq!(s.evict(Vpn(1), Ppn(3), &[9; 16], true), Ok(true));

        let mut page = [0u8; 16];
        assert!(s.populate(Vpn(1), &mut page));
        assert_eq!(page, [9; 16]);
        assert!(!s.populate(Vpn(0), &mut page));
        assert_eq!(&page[..12], &[7; 12]);
        assert_eq!(&page[12..], &[0; 4]);
    }

    #[test]
    fn test_evict_rejects_wrong_frame() {
        let mut s = space(None);
        s.map(Vpn(0), Ppn(1)).unwrap();
        assert!(matches!(
            s.evict(Vpn(0), Ppn(2), &[0; 16], false),
            Err(PagingError::BindingMismatch { .. })
        ));
    }
}
