//! 页表项

use crate::address::Ppn;
use bitflags::bitflags;

bitflags! {
    /// 页表项标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PteFlags: u8 {
        /// 页驻留在某个帧中
        const VALID = 1 << 0;
        /// 驻留期间被写过
        const DIRTY = 1 << 1;
    }
}

/// 页表项
///
/// 只有 `VALID` 置位时帧号才有意义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageTableEntry {
    ppn: Option<Ppn>,
    flags: PteFlags,
}

impl PageTableEntry {
    /// 空的（无效）页表项
    pub const fn empty() -> Self {
        Self {
            ppn: None,
            flags: PteFlags::empty(),
        }
    }

    /// 是否有效
    pub fn is_valid(&self) -> bool {
        self.flags.contains(PteFlags::VALID)
    }

    /// 是否为脏
    pub fn is_dirty(&self) -> bool {
        self.flags.contains(PteFlags::DIRTY)
    }

    /// 有效时返回帧号
    pub fn ppn(&self) -> Option<Ppn> {
        if self.is_valid() { self.ppn } else { None }
    }

    /// 标志位
    pub fn flags(&self) -> PteFlags {
        self.flags
    }

    pub(crate) fn set(&mut self, ppn: Ppn) {
        self.ppn = Some(ppn);
        self.flags = PteFlags::VALID;
    }

    pub(crate) fn mark_dirty(&mut self) {
        if self.is_valid() {
            self.flags.insert(PteFlags::DIRTY);
        }
    }

    /// 失效并返回原帧号
    pub(crate) fn clear(&mut self) -> Option<Ppn> {
        let ppn = self.ppn();
        *self = Self::empty();
        ppn
    }
}
