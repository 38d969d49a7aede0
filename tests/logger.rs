//! Integration tests for logger behavior.

use campus_records::logger::{
    disable_debug, enable_debug, is_debug_enabled, set_level, set_level_from_str, Level,
};
use campus_records::{debug, error, get_version, info, warn};
use tempfile::TempDir;

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("WARNING"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
}

#[cfg(feature = "log-debug")]
#[test]
fn debug_toggles_at_runtime() {
    disable_debug();
    assert!(!is_debug_enabled());
    enable_debug();
    assert!(is_debug_enabled());
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_appends_tagged_lines() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("campusrec.log");
    assert!(campus_records::logger::init_file_logging(&path));

    error!("certificate queue unavailable");
    let content = std::fs::read_to_string(&path).expect("read log");
    assert!(content.contains("[ERROR] certificate queue unavailable"));
}

#[test]
fn version_is_not_empty() {
    assert!(!get_version().trim().is_empty());
}
