//! 日志系统核心实现
//!
//! 该模块将所有日志状态和逻辑封装到一个单独的 `LogCore` 结构体中，
//! 可以独立实例化用于测试，也可以作为全局单例使用。

use crate::buffer::LogBuffer;
use crate::config::{DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, GLOBAL_LOG_BUFFER_SIZE};
use crate::entry::LogEntry;
use crate::level::LogLevel;
use alloc::format;
use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};
use sync::SpinLock;

/// 核心日志系统
///
/// 封装了环形缓冲区和过滤状态。
///
/// # 线程安全性
///
/// 级别阈值使用原子变量，缓冲区由自旋锁保护；控制台输出发生在释放缓冲区锁之后，
/// 输出实现中再记录日志不会死锁。
pub struct LogCore {
    /// 用于日志存储的环形缓冲区
    buffer: SpinLock<LogBuffer>,

    /// 全局日志级别阈值（控制日志是否缓冲）
    global_level: AtomicU8,

    /// 控制台输出级别阈值（控制是否立即打印）
    console_level: AtomicU8,
}

impl LogCore {
    /// 使用默认日志级别创建新的 LogCore 实例
    ///
    /// 这是一个 `const fn`，可用于静态初始化。
    ///
    /// # 示例
    ///
    /// ```rust
    /// use klog::LogCore;
    ///
    /// static GLOBAL_LOG: LogCore = LogCore::default();
    /// let _ = &GLOBAL_LOG;
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub const fn default() -> Self {
        Self {
            buffer: SpinLock::new(LogBuffer::new(GLOBAL_LOG_BUFFER_SIZE)),
            global_level: AtomicU8::new(DEFAULT_LOG_LEVEL as u8),
            console_level: AtomicU8::new(DEFAULT_CONSOLE_LEVEL as u8),
        }
    }

    /// 使用自定义日志级别创建新的 LogCore 实例
    ///
    /// # 参数
    ///
    /// * `global_level` - 日志被缓冲的最低级别
    /// * `console_level` - 日志被打印到控制台的最低级别
    ///
    /// # 示例
    ///
    /// ```rust
    /// use klog::{LogCore, LogLevel};
    ///
    /// let _test_log = LogCore::new(LogLevel::Debug, LogLevel::Warning);
    /// ```
    pub fn new(global_level: LogLevel, console_level: LogLevel) -> Self {
        Self::with_capacity(GLOBAL_LOG_BUFFER_SIZE, global_level, console_level)
    }

    /// 使用自定义缓冲区容量创建实例
    pub fn with_capacity(capacity: usize, global_level: LogLevel, console_level: LogLevel) -> Self {
        Self {
            buffer: SpinLock::new(LogBuffer::new(capacity)),
            global_level: AtomicU8::new(global_level as u8),
            console_level: AtomicU8::new(console_level as u8),
        }
    }

    /// 核心日志记录实现，上下文取自已注册的 [`crate::LogContextProvider`]
    pub fn _log(&self, level: LogLevel, args: fmt::Arguments) {
        if !self.is_level_enabled(level) {
            return;
        }
        let (clock, pid) = match crate::get_context_provider() {
            Some(provider) => (provider.clock(), provider.pid()),
            None => (0, None),
        };
        self.record(LogEntry::from_args(level, clock, pid, args));
    }

    /// 以显式上下文记录日志
    pub fn _log_with(&self, level: LogLevel, clock: usize, pid: Option<u32>, args: fmt::Arguments) {
        if !self.is_level_enabled(level) {
            return;
        }
        self.record(LogEntry::from_args(level, clock, pid, args));
    }

    fn record(&self, entry: LogEntry) {
        let print = self.is_console_level(entry.level());
        if print {
            // 控制台输出需要条目副本，缓冲区写入会消费条目
            self.buffer.lock().write(entry.clone());
            self.direct_print_entry(&entry);
        } else {
            self.buffer.lock().write(entry);
        }
    }

    fn direct_print_entry(&self, entry: &LogEntry) {
        if let Some(output) = crate::get_log_output() {
            let mut line = format_log_entry(entry);
            line.push('\n');
            output.write_str(&line);
        }
    }

    /// 从缓冲区读取下一个日志条目
    pub fn _read_log(&self) -> Option<LogEntry> {
        self.buffer.lock().read()
    }

    /// 非破坏性读取：按索引 peek 日志条目，不移动读指针
    pub fn _peek_log(&self, index: usize) -> Option<LogEntry> {
        self.buffer.lock().peek(index)
    }

    /// 获取当前可读取的起始索引
    pub fn _log_reader_index(&self) -> usize {
        self.buffer.lock().reader_index()
    }

    /// 获取当前写入位置
    pub fn _log_writer_index(&self) -> usize {
        self.buffer.lock().writer_index()
    }

    /// 返回未读日志条目的数量
    pub fn _log_len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// 返回未读日志的总字节数（按 [`format_log_entry`] 格式化并计入换行符）
    pub fn _log_unread_bytes(&self) -> usize {
        self.buffer
            .lock()
            .iter()
            .map(|entry| format_log_entry(entry).len() + 1)
            .sum()
    }

    /// 返回已丢弃日志的计数
    pub fn _log_dropped_count(&self) -> usize {
        self.buffer.lock().dropped()
    }

    /// 设置全局日志级别阈值
    pub fn _set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前全局日志级别
    pub fn _get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Acquire))
    }

    /// 设置控制台输出级别阈值
    pub fn _set_console_level(&self, level: LogLevel) {
        self.console_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前控制台输出级别
    pub fn _get_console_level(&self) -> LogLevel {
        LogLevel::from_u8(self.console_level.load(Ordering::Acquire))
    }

    /// 级别是否达到全局阈值
    #[inline]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.global_level.load(Ordering::Acquire)
    }

    #[inline]
    fn is_console_level(&self, level: LogLevel) -> bool {
        level as u8 <= self.console_level.load(Ordering::Acquire)
    }
}

/// 将日志条目格式化为一行文本（不含换行符）
///
/// 格式：`[Clock=%2d][PID=%d] message`；内核上下文使用 `[KERNEL]` 代替进程号，
/// Warning 及更严重的级别在正文前附加 `[LEVEL]` 标签。
pub fn format_log_entry(entry: &LogEntry) -> String {
    let context = match entry.pid() {
        Some(pid) => format!("[PID={}]", pid),
        None => String::from("[KERNEL]"),
    };
    if entry.level() <= LogLevel::Warning {
        format!(
            "[Clock={:2}]{} [{}] {}",
            entry.clock(),
            context,
            entry.level(),
            entry.message()
        )
    } else {
        format!("[Clock={:2}]{} {}", entry.clock(), context, entry.message())
    }
}
