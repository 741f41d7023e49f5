// Unit tests for klog.
//
// Every test works on a local `LogCore` so the global instance stays untouched.

use crate::LogLevel;
use crate::log_core::LogCore;

/// Test-only logging helper (mirrors production macro behavior, but targets a local `LogCore`).
macro_rules! test_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger._log_with($level, 0, None, format_args!($($arg)*))
    };
}

mod filter;
mod format;
mod overflow;
