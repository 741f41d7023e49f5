//! 模拟器日志
//!
//! 该模块重新导出 klog crate 的功能，并提供模拟器侧的上下文与输出实现：
//! 时钟和当前进程号由内核在每一步开始前通过 [`set_context`] 设置，
//! 输出写到标准输出。

pub use klog::{
    DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, GLOBAL_LOG_BUFFER_SIZE, LogContextProvider,
    LogEntry, LogLevel, LogOutput, MAX_LOG_MESSAGE_LENGTH, format_log_entry, get_console_level,
    get_global_level, is_level_enabled, log_dropped_count, log_impl, log_len, log_reader_index,
    log_unread_bytes, log_with, log_writer_index, peek_log, read_log, set_console_level,
    set_global_level,
};

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::io::Write;

// ========== 重新定义宏以支持 crate:: 前缀 ==========

/// 带有级别过滤的内部实现宏
#[macro_export]
macro_rules! __log_impl_filtered {
    ($level:expr, $args:expr) => {
        if $crate::log::is_level_enabled($level) {
            $crate::log::log_impl($level, $args);
        }
    };
}

/// 以 **CRITICAL (关键)** 级别记录消息
#[macro_export]
macro_rules! pr_crit {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Critical,
            format_args!($($arg)*)
        )
    }
}

/// 以 **ERROR (错误)** 级别记录消息
#[macro_export]
macro_rules! pr_err {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Error,
            format_args!($($arg)*)
        )
    }
}

/// 以 **WARNING (警告)** 级别记录消息
#[macro_export]
macro_rules! pr_warn {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Warning,
            format_args!($($arg)*)
        )
    }
}

/// 以 **INFO (信息)** 级别记录消息
#[macro_export]
macro_rules! pr_info {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Info,
            format_args!($($arg)*)
        )
    }
}

/// 以 **DEBUG (调试)** 级别记录消息
#[macro_export]
macro_rules! pr_debug {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Debug,
            format_args!($($arg)*)
        )
    }
}

// ========== LogContextProvider 实现 ==========

const NO_PID: u32 = u32::MAX;

static SIM_CLOCK: AtomicUsize = AtomicUsize::new(0);
static SIM_PID: AtomicU32 = AtomicU32::new(NO_PID);

/// 设置后续日志使用的 (时钟, 进程号)
pub fn set_context(clock: usize, pid: Option<u32>) {
    SIM_CLOCK.store(clock, Ordering::Relaxed);
    SIM_PID.store(pid.unwrap_or(NO_PID), Ordering::Relaxed);
}

/// 模拟器的日志上下文提供者
struct OsLogContextProvider;

impl LogContextProvider for OsLogContextProvider {
    fn clock(&self) -> usize {
        SIM_CLOCK.load(Ordering::Relaxed)
    }

    fn pid(&self) -> Option<u32> {
        match SIM_PID.load(Ordering::Relaxed) {
            NO_PID => None,
            pid => Some(pid),
        }
    }
}

// ========== LogOutput 实现 ==========

/// 模拟器的日志输出
struct OsLogOutput;

impl LogOutput for OsLogOutput {
    fn write_str(&self, s: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(s.as_bytes());
        let _ = stdout.flush();
    }
}

// ========== 全局实例 ==========

static OS_LOG_CONTEXT_PROVIDER: OsLogContextProvider = OsLogContextProvider;
static OS_LOG_OUTPUT: OsLogOutput = OsLogOutput;

/// 初始化日志系统
///
/// 注册上下文与输出实现，设置缓冲与控制台级别，并接入 `log` 门面。
/// `quiet` 时控制台只打印 Emergency 级别。
pub fn init(level: LogLevel, quiet: bool) {
    klog::register_context_provider(&OS_LOG_CONTEXT_PROVIDER);
    klog::register_log_output(&OS_LOG_OUTPUT);
    set_global_level(level);
    set_console_level(if quiet { LogLevel::Emergency } else { level });
    // 重复安装只会返回错误，保持已有记录器即可
    let _ = klog::init_log_bridge(level);
}
