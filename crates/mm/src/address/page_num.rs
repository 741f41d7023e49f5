//! 页码抽象模块
//!
//! 此模块定义了表示页码 (Page Number) 的 Trait 和具体的页码类型 (Ppn, Vpn)。
//! 页码是地址空间中页 (Page) 的索引；物理页码同时就是帧池中的帧号。

use super::operations::{UsizeConvert, impl_usize_convert};
use super::types::Vaddr;

/// [PageNum] Trait
/// ---------------------
/// 表示一个页码的 Trait。所有页码类型 (如 Ppn 和 Vpn) 必须实现此 Trait。
pub trait PageNum: UsizeConvert + PartialEq + Eq + PartialOrd + Ord {
    /// 将页码增加 1。
    fn step(&mut self) {
        *self = Self::from_usize(self.as_usize() + 1);
    }

    /// 该页第一个字节在所属空间中的偏移
    fn start_offset(self, page_size: usize) -> usize {
        self.as_usize() * page_size
    }

    /// 该页在所属空间中的字节范围
    fn byte_range(self, page_size: usize) -> core::ops::Range<usize> {
        let start = self.start_offset(page_size);
        start..start + page_size
    }
}

/// 物理页码（帧号）
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Ppn(pub usize);

impl_usize_convert!(Ppn);
impl PageNum for Ppn {}

/// 虚拟页码
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Vpn(pub usize);

impl_usize_convert!(Vpn);
impl PageNum for Vpn {}

impl Vpn {
    /// 包含 `addr` 的页
    pub fn from_addr_floor(addr: Vaddr, page_size: usize) -> Self {
        Vpn(addr.as_usize() / page_size)
    }

    /// 该页的起始虚拟地址
    pub fn start_addr(self, page_size: usize) -> Vaddr {
        Vaddr(self.0 * page_size)
    }
}
