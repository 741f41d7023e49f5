//! 任务管理
//!
//! 进程控制块 [`Pcb`]、寄存器组 [`RegisterSet`] 与进程号分配器。

mod pcb;
mod pid_allocator;

pub use pcb::{Pcb, RegisterSet, TaskState};
pub use pid_allocator::PidAllocator;
