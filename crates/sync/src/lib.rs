//! 同步原语
//!
//! 向工作区内其它 crate 提供基本的锁原语。
//!
//! 模拟器本身是单线程、协作式的，帧池与地址空间按构造串行访问，无需加锁；
//! 这里的锁只用于进程级的单例（全局日志缓冲区、日志输出注册等），
//! 这些单例可能在并行运行的测试线程之间共享。
//!
//! # 组成
//!
//! - [`RawSpinLock`]：基于原子布尔值的原始自旋锁，实现了 [`lock_api::RawMutex`]
//! - [`SpinLock`]：建立在 `lock_api::Mutex` 之上的数据自旋锁

#![no_std]

mod raw_spin_lock;
mod spin_lock;

pub use raw_spin_lock::*;
pub use spin_lock::*;
