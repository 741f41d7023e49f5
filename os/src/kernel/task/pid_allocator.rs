//! 简单的进程号分配器实现

use core::sync::atomic::{AtomicU32, Ordering};
use mm::Pid;

/// 简单的进程号分配器。
/// 每次调用 `allocate` 返回唯一的进程号，按装载顺序从 0 开始递增。
#[derive(Debug, Default)]
pub struct PidAllocator {
    next_pid: AtomicU32,
}

impl PidAllocator {
    /// 创建一个新的 PidAllocator 实例。
    pub const fn new() -> Self {
        PidAllocator {
            next_pid: AtomicU32::new(0),
        }
    }

    /// 分配一个新的进程号。
    pub fn allocate(&self) -> Pid {
        self.next_pid.fetch_add(1, Ordering::SeqCst)
    }

    /// 下一次 `allocate` 将返回的进程号
    pub fn peek(&self) -> Pid {
        self.next_pid.load(Ordering::SeqCst)
    }

    /// 已分配的进程号个数
    pub fn allocated(&self) -> usize {
        self.next_pid.load(Ordering::SeqCst) as usize
    }
}
