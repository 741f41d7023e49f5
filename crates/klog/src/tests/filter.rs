use super::*;

#[test]
fn test_global_level_filtering() {
    let log = LogCore::new(LogLevel::Warning, LogLevel::Emergency);

    test_log!(log, LogLevel::Emergency, "emergency");
    test_log!(log, LogLevel::Error, "error");
    test_log!(log, LogLevel::Warning, "warning");
    test_log!(log, LogLevel::Info, "info");
    test_log!(log, LogLevel::Debug, "debug");

    assert_eq!(log._log_len(), 3);
    assert_eq!(log._read_log().unwrap().message(), "emergency");
    assert_eq!(log._read_log().unwrap().message(), "error");
    assert_eq!(log._read_log().unwrap().message(), "warning");
}

#[test]
fn test_dynamic_level_change() {
    let log = LogCore::new(LogLevel::Info, LogLevel::Emergency);

    test_log!(log, LogLevel::Debug, "debug1");
    test_log!(log, LogLevel::Info, "info1");
    assert_eq!(log._log_len(), 1);

    log._set_global_level(LogLevel::Debug);
    assert_eq!(log._get_global_level(), LogLevel::Debug);

    test_log!(log, LogLevel::Debug, "debug2");

    assert_eq!(log._log_len(), 2);
    assert_eq!(log._read_log().unwrap().message(), "info1");
    assert_eq!(log._read_log().unwrap().message(), "debug2");
}

#[test]
fn test_console_level_roundtrip() {
    let log = LogCore::new(LogLevel::Info, LogLevel::Warning);
    assert_eq!(log._get_console_level(), LogLevel::Warning);
    log._set_console_level(LogLevel::Debug);
    assert_eq!(log._get_console_level(), LogLevel::Debug);
}

#[test]
fn test_log_facade_level_mapping() {
    assert_eq!(LogLevel::from(log::Level::Error), LogLevel::Error);
    assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
    assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Trace);
    assert_eq!(LogLevel::Notice.to_level_filter(), log::LevelFilter::Info);
}
