//! 页表模块
//!
//! 本模块提供每进程页表、页表项以及分页操作的错误类型。
mod page_table_entry;
mod table;

pub use page_table_entry::*;
pub use table::*;

use crate::Pid;
use core::fmt;

/// 分页操作中可能发生的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingError {
    /// 虚拟地址超出进程映像范围
    OutOfRange {
        /// 访问的虚拟地址
        vaddr: usize,
        /// 进程页表的页数
        pages: usize,
    },
    /// 访问跨越了页边界
    Misaligned {
        /// 访问的起始虚拟地址
        vaddr: usize,
        /// 访问长度
        len: usize,
    },
    /// 需要淘汰脏页但其所属进程的后备区已满
    FrameExhausted {
        /// 被淘汰页所属进程
        pid: Pid,
        /// 被淘汰的虚拟页号
        vpn: usize,
    },
    /// 帧池中没有可用的帧
    NoFrames,
    /// 进程没有地址空间
    NoSuchSpace(Pid),
    /// 进程已有地址空间
    SpaceExists(Pid),
    /// 虚拟页已被映射
    AlreadyMapped {
        /// 进程
        pid: Pid,
        /// 虚拟页号
        vpn: usize,
    },
    /// 虚拟页未被映射
    NotMapped {
        /// 进程
        pid: Pid,
        /// 虚拟页号
        vpn: usize,
    },
    /// 映像指令区大于映像总大小
    InvalidImage {
        /// 映像总大小
        size: usize,
        /// 指令区大小
        instruction_len: usize,
    },
    /// 页表项与帧占用者不一致
    BindingMismatch {
        /// 进程
        pid: Pid,
        /// 虚拟页号
        vpn: usize,
        /// 帧号
        ppn: usize,
    },
}

impl PagingError {
    /// 是否应当中止整个模拟
    ///
    /// 越界访问只影响当前指令，其余错误都说明内存管理无法继续。
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PagingError::OutOfRange { .. })
    }
}

impl fmt::Display for PagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagingError::OutOfRange { vaddr, pages } => {
                write!(f, "address {vaddr:#x} outside {pages}-page address space")
            }
            PagingError::Misaligned { vaddr, len } => {
                write!(f, "{len}-byte access at {vaddr:#x} crosses a page boundary")
            }
            PagingError::FrameExhausted { pid, vpn } => write!(
                f,
                "backing store of process {pid} is full, cannot evict dirty page {vpn}"
            ),
            PagingError::NoFrames => write!(f, "no physical frames available"),
            PagingError::NoSuchSpace(pid) => write!(f, "process {pid} has no address space"),
            PagingError::SpaceExists(pid) => {
                write!(f, "process {pid} already has an address space")
            }
            PagingError::AlreadyMapped { pid, vpn } => {
                write!(f, "page {vpn} of process {pid} is already mapped")
            }
            PagingError::NotMapped { pid, vpn } => {
                write!(f, "page {vpn} of process {pid} is not mapped")
            }
            PagingError::InvalidImage {
                size,
                instruction_len,
            } => write!(
                f,
                "instruction region ({instruction_len} bytes) exceeds image size ({size} bytes)"
            ),
            PagingError::BindingMismatch { pid, vpn, ppn } => write!(
                f,
                "frame {ppn} is not bound to page {vpn} of process {pid}"
            ),
        }
    }
}

impl core::error::Error for PagingError {}

/// 分页操作的结果类型
pub type PagingResult<T> = Result<T, PagingError>;
