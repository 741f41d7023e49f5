//! 日志条目结构

use crate::config::MAX_LOG_MESSAGE_LENGTH;
use crate::level::LogLevel;
use alloc::string::String;
use core::fmt::{self, Write};

/// 一条日志记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// 写入序号，由缓冲区分配
    seq: usize,
    level: LogLevel,
    /// 记录时的模拟时钟
    clock: usize,
    /// 记录时正在运行的进程；`None` 表示调度器/内核上下文
    pid: Option<u32>,
    message: String,
}

impl LogEntry {
    /// 从格式化参数构造日志条目，消息超过 [`MAX_LOG_MESSAGE_LENGTH`] 时截断
    pub fn from_args(
        level: LogLevel,
        clock: usize,
        pid: Option<u32>,
        args: fmt::Arguments,
    ) -> Self {
        let mut message = String::new();
        // 截断写入器在达到上限后返回 Err，这里忽略即可
        let _ = Truncating {
            buf: &mut message,
            limit: MAX_LOG_MESSAGE_LENGTH,
        }
        .write_fmt(args);
        LogEntry {
            seq: 0,
            level,
            clock,
            pid,
            message,
        }
    }

    pub(crate) fn set_seq(&mut self, seq: usize) {
        self.seq = seq;
    }

    /// 写入序号
    pub fn seq(&self) -> usize {
        self.seq
    }

    /// 日志级别
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 模拟时钟
    pub fn clock(&self) -> usize {
        self.clock
    }

    /// 进程号
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// 消息正文
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 按字符边界截断的写入器
struct Truncating<'a> {
    buf: &'a mut String,
    limit: usize,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.buf.len() + ch.len_utf8() > self.limit {
                return Err(fmt::Error);
            }
            self.buf.push(ch);
        }
        Ok(())
    }
}
