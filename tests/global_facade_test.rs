// Integration test for the process-wide facade. Kept to a single test so
// installation order within this binary is deterministic.

mod common;

use common::MemoryWriter;
use teelog::logs::{JsonEncoder, LevelFilter, Sink};
use teelog::{field, global, Level, LogConfig, LogError, Logger};

#[test]
fn test_global_install_once() {
    assert!(!global::is_initialized());

    // Before installation records go nowhere and nothing panics
    global::info("dropped", &[]);
    let signal = global::panic("no logger yet", &[]);
    assert_eq!(signal.level(), Level::Panic);

    let buffer = MemoryWriter::new();
    let logger = Logger::builder()
        .sink(Sink::new(
            "all",
            LevelFilter::AtLeast(Level::Debug),
            JsonEncoder,
            buffer.clone(),
        ))
        .build();
    global::install(logger).unwrap();
    assert!(global::is_initialized());

    // A second installation is refused and adds no sinks
    let again = global::install(Logger::builder().build());
    assert!(matches!(again, Err(LogError::AlreadyInitialized)));
    let init_again = global::init(&LogConfig::default());
    assert!(matches!(init_again, Err(LogError::AlreadyInitialized)));
    assert_eq!(global::logger().unwrap().sinks().len(), 1);

    global::warn("disk nearly full", &[field("pct", 93)]);
    assert!(global::dpanic("odd", &[]).is_none());

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record["msg"], "disk nearly full");
    assert_eq!(record["pct"], 93);
    assert!(record["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/global_facade_test.rs:"));
}
