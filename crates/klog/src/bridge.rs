//! `log` 门面桥接
//!
//! 其它 crate（例如 `mm`）通过 `log::debug!` 等门面宏输出诊断信息，
//! 安装桥接后这些记录与 `pr_*!` 日志进入同一个全局缓冲区，并带有相同的上下文。

use crate::level::LogLevel;

struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        crate::is_level_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            crate::log_impl(LogLevel::from(record.level()), *record.args());
        }
    }

    fn flush(&self) {}
}

/// 将 `log` 门面接入全局日志系统，并按 `level` 设置门面的最大级别
///
/// 每个进程只能安装一次 `log` 记录器；重复调用返回 [`log::SetLoggerError`]，
/// 调用方可以安全地忽略它。
pub fn init_log_bridge(level: LogLevel) -> Result<(), log::SetLoggerError> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
