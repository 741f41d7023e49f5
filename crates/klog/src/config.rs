//! 日志系统配置常量

use crate::level::LogLevel;

/// 全局环形缓冲区可容纳的日志条目数
pub const GLOBAL_LOG_BUFFER_SIZE: usize = 64;

/// 单条日志消息的最大字节数，超出部分被截断
pub const MAX_LOG_MESSAGE_LENGTH: usize = 256;

/// 默认全局级别：Info 及以上写入缓冲区
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// 默认控制台级别：Info 及以上立即输出（寄存器状态等模拟结果属于 Info）
pub const DEFAULT_CONSOLE_LEVEL: LogLevel = LogLevel::Info;
