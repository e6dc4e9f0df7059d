use fstore_logger::{LevelFilter, Logger};

#[test]
fn console_only_logger_has_no_file_worker() {
    let logger = Logger::builder()
        .name("integration-console-only")
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_files());
    assert_eq!(logger.name(), "integration-console-only");
}
