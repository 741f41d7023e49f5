//! 地址类型

use super::operations::{UsizeConvert, impl_usize_convert};
use super::page_num::Vpn;

/// 进程虚拟地址
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Vaddr(pub usize);

impl_usize_convert!(Vaddr);

impl Vaddr {
    /// 拆分为 (页号, 页内偏移)
    #[inline]
    pub fn split(self, page_size: usize) -> (Vpn, usize) {
        (Vpn::from_usize(self.0 / page_size), self.0 % page_size)
    }
}
