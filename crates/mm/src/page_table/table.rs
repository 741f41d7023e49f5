//! 每进程页表
//!
//! 单级线性页表，页数等于进程映像覆盖的页数，创建后长度固定。

use super::PageTableEntry;
use crate::address::{Ppn, UsizeConvert, Vpn};
use alloc::vec;
use alloc::vec::Vec;

/// 翻译结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// 页已驻留
    Mapped {
        /// 所在帧
        ppn: Ppn,
        /// 页内偏移
        offset: usize,
    },
    /// 缺页
    Fault {
        /// 缺失的虚拟页
        vpn: Vpn,
        /// 页内偏移
        offset: usize,
    },
}

/// 页表
#[derive(Debug, Clone)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    /// 创建包含 `num_pages` 个无效项的页表
    pub fn new(num_pages: usize) -> Self {
        Self {
            entries: vec![PageTableEntry::empty(); num_pages],
        }
    }

    /// 页数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有任何页
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 页是否在页表范围内
    pub fn contains(&self, vpn: Vpn) -> bool {
        vpn.as_usize() < self.entries.len()
    }

    /// 查询页表项
    pub fn entry(&self, vpn: Vpn) -> Option<&PageTableEntry> {
        self.entries.get(vpn.as_usize())
    }

    /// 查询 `vpn` 的驻留情况；越界返回 `None`
    pub fn translate(&self, vpn: Vpn, offset: usize) -> Option<Translation> {
        let entry = self.entry(vpn)?;
        Some(match entry.ppn() {
            Some(ppn) => Translation::Mapped { ppn, offset },
            None => Translation::Fault { vpn, offset },
        })
    }

    /// 建立映射；越界或已映射时返回 false
    pub fn map(&mut self, vpn: Vpn, ppn: Ppn) -> bool {
        match self.entries.get_mut(vpn.as_usize()) {
            Some(entry) if !entry.is_valid() => {
                entry.set(ppn);
                true
            }
            _ => false,
        }
    }

    /// 解除映射，返回原帧号
    pub fn unmap(&mut self, vpn: Vpn) -> Option<Ppn> {
        self.entries.get_mut(vpn.as_usize())?.clear()
    }

    /// 标记已映射的页为脏
    pub fn mark_dirty(&mut self, vpn: Vpn) {
        if let Some(entry) = self.entries.get_mut(vpn.as_usize()) {
            entry.mark_dirty();
        }
    }

    /// 所有有效映射 (页, 帧)
    pub fn mapped(&self) -> impl Iterator<Item = (Vpn, Ppn)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, e)| e.ppn().map(|ppn| (Vpn::from_usize(idx), ppn)))
    }

    /// 有效映射数
    pub fn resident_pages(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }
}
