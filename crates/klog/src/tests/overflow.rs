use super::*;

#[test]
fn test_buffer_overflow() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    const TOTAL: usize = 100;
    for i in 0..TOTAL {
        test_log!(log, LogLevel::Info, "log {}", i);
    }

    let buffered = log._log_len();
    let dropped = log._log_dropped_count();

    assert!(dropped > 0);
    assert_eq!(buffered, crate::GLOBAL_LOG_BUFFER_SIZE);
    assert_eq!(buffered + dropped, TOTAL);
}

#[test]
fn test_overflow_keeps_newest_entries() {
    let log = LogCore::with_capacity(4, LogLevel::Debug, LogLevel::Emergency);

    for i in 0..10 {
        test_log!(log, LogLevel::Info, "entry {}", i);
    }

    assert_eq!(log._log_dropped_count(), 6);
    assert_eq!(log._read_log().unwrap().message(), "entry 6");
}

#[test]
fn test_write_after_overflow() {
    let log = LogCore::with_capacity(4, LogLevel::Debug, LogLevel::Emergency);

    for i in 0..10 {
        test_log!(log, LogLevel::Info, "overflow {}", i);
    }
    while log._read_log().is_some() {}

    test_log!(log, LogLevel::Info, "after overflow");

    assert_eq!(log._log_len(), 1);
    assert_eq!(log._read_log().unwrap().message(), "after overflow");
}

#[test]
fn test_zero_capacity_drops_everything() {
    let log = LogCore::with_capacity(0, LogLevel::Debug, LogLevel::Emergency);
    test_log!(log, LogLevel::Info, "gone");
    assert_eq!(log._log_len(), 0);
    assert_eq!(log._log_dropped_count(), 1);
}
