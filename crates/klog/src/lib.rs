//! 模拟器日志子系统
//!
//! 该 crate 提供一个**类似 Linux 内核风格的日志系统**，每条日志都携带
//! 模拟时钟与进程号 `(clock, pid)`，并以固定格式
//! `[Clock= 3][PID=1] ...` 输出。
//!
//! # 组件
//!
//! - `buffer` - 用于日志存储的有界环形缓冲区
//! - `config` - 配置常量（缓冲区大小、消息长度限制、默认级别）
//! - `log_core` - 核心日志实现 ([`LogCore`])
//! - `entry` - 日志条目结构 ([`LogEntry`])
//! - `level` - 日志级别定义（从 Emergency 到 Debug）
//! - [`macros`] - 面向用户的日志宏 (`pr_info!`, `pr_err!`, 等)
//! - `bridge` - 将 `log` 门面转发到本日志系统
//!
//! # 设计概览
//!
//! ## 双输出策略
//!
//! 1. **即时控制台输出**：达到控制台级别阈值（默认：Info 及以上）的日志会直接写到已注册的 [`LogOutput`]。
//! 2. **环形缓冲区存储**：所有达到全局级别阈值（默认：Info 及以上）的日志都会写入环形缓冲区，
//!    缓冲区满时丢弃最旧的条目并计数。
//!
//! 日志写入失败（例如控制台不可写）不会向调用方传播：日志永远不能让模拟失败。
//!
//! # 上下文解耦
//!
//! - **LogContextProvider**：提供当前模拟时钟与正在运行的进程号
//! - **LogOutput**：提供控制台输出能力
//!
//! 使用方需要在启动时注册这些 trait 的实现；未注册时时钟为 0、无进程号，且只写缓冲区。

#![no_std]

extern crate alloc;

mod bridge;
mod buffer;
mod config;
mod entry;
mod level;
mod log_core;
pub mod macros;

#[cfg(test)]
mod tests;

pub use bridge::init_log_bridge;
pub use config::{
    DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, GLOBAL_LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH,
};
pub use entry::LogEntry;
pub use level::LogLevel;
pub use log_core::{LogCore, format_log_entry};

use sync::SpinLock;

// ========== Trait 定义 ==========

/// 日志上下文提供者 trait
///
/// 实现此 trait 以提供日志所需的上下文信息（模拟时钟、当前进程号）。
/// 使用方需要在启动时通过 [`register_context_provider`] 注册实现。
pub trait LogContextProvider: Send + Sync {
    /// 获取当前模拟时钟
    fn clock(&self) -> usize;
    /// 获取当前运行的进程号（调度器上下文中返回 `None`）
    fn pid(&self) -> Option<u32>;
}

/// 日志输出 trait
///
/// 实现此 trait 以提供日志的控制台输出能力。输出错误由实现自行吞掉。
pub trait LogOutput: Send + Sync {
    /// 输出字符串到控制台
    fn write_str(&self, s: &str);
}

// ========== 全局注册机制 ==========

static CONTEXT_PROVIDER: SpinLock<Option<&'static dyn LogContextProvider>> = SpinLock::new(None);
static LOG_OUTPUT: SpinLock<Option<&'static dyn LogOutput>> = SpinLock::new(None);

/// 注册日志上下文提供者
///
/// 重复注册时后注册者生效。
pub fn register_context_provider(provider: &'static dyn LogContextProvider) {
    *CONTEXT_PROVIDER.lock() = Some(provider);
}

/// 注册日志输出
///
/// 重复注册时后注册者生效。
pub fn register_log_output(output: &'static dyn LogOutput) {
    *LOG_OUTPUT.lock() = Some(output);
}

/// 获取已注册的上下文提供者
pub(crate) fn get_context_provider() -> Option<&'static dyn LogContextProvider> {
    *CONTEXT_PROVIDER.lock()
}

/// 获取已注册的日志输出
pub(crate) fn get_log_output() -> Option<&'static dyn LogOutput> {
    *LOG_OUTPUT.lock()
}

// ========== 全局单例 ==========

/// 全局日志系统实例
///
/// 使用 const fn 在编译时初始化。所有日志宏和公共 API 都委托给此实例。
static GLOBAL_LOG: LogCore = LogCore::default();

// ========== 公共 API (精简封装) ==========

/// 核心日志实现（由宏调用），上下文取自已注册的提供者
#[doc(hidden)]
pub fn log_impl(level: LogLevel, args: core::fmt::Arguments) {
    GLOBAL_LOG._log(level, args);
}

/// 以显式给定的 `(clock, pid)` 记录一条日志
pub fn log_with(level: LogLevel, clock: usize, pid: Option<u32>, args: core::fmt::Arguments) {
    GLOBAL_LOG._log_with(level, clock, pid, args);
}

/// 检查日志级别是否启用（由宏调用）
#[doc(hidden)]
pub fn is_level_enabled(level: LogLevel) -> bool {
    GLOBAL_LOG.is_level_enabled(level)
}

/// 从缓冲区读取下一个日志条目
pub fn read_log() -> Option<LogEntry> {
    GLOBAL_LOG._read_log()
}

/// 非破坏性读取：按索引 peek 日志条目，不移动读指针
pub fn peek_log(index: usize) -> Option<LogEntry> {
    GLOBAL_LOG._peek_log(index)
}

/// 获取当前可读取的起始索引
pub fn log_reader_index() -> usize {
    GLOBAL_LOG._log_reader_index()
}

/// 获取当前写入位置
pub fn log_writer_index() -> usize {
    GLOBAL_LOG._log_writer_index()
}

/// 返回未读日志条目的数量
pub fn log_len() -> usize {
    GLOBAL_LOG._log_len()
}

/// 返回未读日志的总字节数（格式化后）
pub fn log_unread_bytes() -> usize {
    GLOBAL_LOG._log_unread_bytes()
}

/// 返回已丢弃日志的计数
pub fn log_dropped_count() -> usize {
    GLOBAL_LOG._log_dropped_count()
}

/// 设置全局日志级别阈值
pub fn set_global_level(level: LogLevel) {
    GLOBAL_LOG._set_global_level(level);
}

/// 获取当前全局日志级别
pub fn get_global_level() -> LogLevel {
    GLOBAL_LOG._get_global_level()
}

/// 设置控制台输出级别阈值
pub fn set_console_level(level: LogLevel) {
    GLOBAL_LOG._set_console_level(level);
}

/// 获取当前控制台输出级别
pub fn get_console_level() -> LogLevel {
    GLOBAL_LOG._get_console_level()
}
