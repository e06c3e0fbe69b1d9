use std::fs;

use clipper_logging::{clipper_info, clipper_warn, initialize, LogDestination};
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn file_destination_writes_log_lines() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("clipper.log");

    initialize(LogDestination::File, LevelFilter::Info, &path);
    clipper_info!("submitted job {}", 42);
    clipper_warn!("poll failed for {}", "42");
    log::logger().flush();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("submitted job 42"));
    assert!(content.contains("poll failed for 42"));
}
