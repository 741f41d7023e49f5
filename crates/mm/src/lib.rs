//! 内存管理子系统
//!
//! 提供地址抽象、物理帧池、按进程的页表、进程映像与后备区，
//! 以及组合它们的地址空间和按需分页的内存管理器。
//!
//! # 组成
//!
//! - [`address`]: `Vaddr` / `Vpn` / `Ppn` 等地址与页号类型
//! - [`frame_allocator`]: 固定大小的物理帧池 [`FramePool`]，FIFO 淘汰
//! - [`page_table`]: 每进程一个的 [`PageTable`] 与 [`PagingError`]
//! - [`memory_space`]: [`ProcessImage`]、[`BackingStore`]、[`AddressSpace`]、[`MemoryManager`]
//!
//! # 不变量
//!
//! 任意时刻，一个有效页表项引用的帧，其占用者必须恰好是 (该进程, 该页)；
//! 反过来每个被占用的帧都有且只有一个有效页表项指向它。
//! [`MemoryManager::verify_bindings`] 检查这一点。

#![no_std]

extern crate alloc;

mod config;

pub mod address;
pub mod frame_allocator;
pub mod memory_space;
pub mod page_table;

pub use config::MmConfig;

// Re-export 常用类型
pub use address::{PageNum, Ppn, UsizeConvert, Vaddr, Vpn};
pub use frame_allocator::{EvictionHandler, FramePool, Occupant};
pub use memory_space::{
    AddressSpace, BackingStore, MemoryAccess, MemoryManager, MmStats, ProcessImage, ProcessMemory,
};
pub use page_table::{PageTable, PageTableEntry, PagingError, PagingResult, PteFlags, Translation};

/// 进程号
pub type Pid = u32;
