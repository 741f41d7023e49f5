use super::*;
use crate::{LogEntry, format_log_entry};

#[test]
fn test_process_context_format() {
    let entry = LogEntry::from_args(LogLevel::Info, 3, Some(1), format_args!("hello"));
    assert_eq!(format_log_entry(&entry), "[Clock= 3][PID=1] hello");
}

#[test]
fn test_kernel_context_format() {
    let entry = LogEntry::from_args(LogLevel::Notice, 12, None, format_args!("idle"));
    assert_eq!(format_log_entry(&entry), "[Clock=12][KERNEL] idle");
}

#[test]
fn test_severe_levels_are_tagged() {
    let entry = LogEntry::from_args(LogLevel::Error, 5, Some(0), format_args!("boom"));
    assert_eq!(format_log_entry(&entry), "[Clock= 5][PID=0] [ERROR] boom");
}

#[test]
fn test_unread_bytes_counts_formatted_lines() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);
    log._log_with(LogLevel::Info, 3, Some(1), format_args!("hello"));

    // "[Clock= 3][PID=1] hello" + '\n'
    assert_eq!(log._log_unread_bytes(), 24);
    log._read_log();
    assert_eq!(log._log_unread_bytes(), 0);
}
