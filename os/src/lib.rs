//! vmsim - 按需分页与轮转调度模拟器
//!
//! 多个进程通过各自的页表共享一小块固定的物理内存，
//! 轮转调度器每轮让一个进程执行一条指令。
//!
//! # 模块
//!
//! - [`config`]：默认常量与 [`KernelConfig`](config::KernelConfig)
//! - [`loader`]：进程映像文本的解析
//! - [`isa`]：M/A/L/S 玩具指令集
//! - [`kernel`]：进程控制块、调度器、执行引擎与 [`Kernel`]
//! - [`log`]：日志上下文与输出
//! - [`error`]：[`KernelError`](error::KernelError)
//!
//! 内存管理本身位于 `mm` crate。

pub mod config;
pub mod error;
pub mod isa;
pub mod kernel;
pub mod loader;
pub mod log;

pub use error::KernelError;
pub use kernel::{Dispatch, FinishedProcess, Kernel, RunReport};
