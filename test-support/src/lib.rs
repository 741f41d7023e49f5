//! 测试支持 crate
//!
//! 提供各 crate 测试共享的工具：进程映像文本构造器、字节模式、
//! 可捕获输出的日志接收端，以及串行化访问全局状态的测试锁。
//!
//! 本 crate 不依赖工作区中的其它 crate，以免形成依赖环。

pub mod capture;
pub mod image;
pub mod pattern;

use std::sync::{Mutex, MutexGuard};

static SERIAL: Mutex<()> = Mutex::new(());

/// 串行化访问进程级全局状态（全局日志缓冲区等）的测试
///
/// 前一个测试 panic 导致的锁中毒会被忽略。
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
