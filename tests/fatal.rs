//! `fatal()` terminates the process, so the test binary runs itself again as a child process that
//! does the actual logging.

use std::process::Command;

/// Set in the child process to the directory it should log to.
const CHILD_LOG_DIR_ENV: &str = "NAMED_LOG_FATAL_CHILD_DIR";

#[test]
fn fatal_writes_regardless_of_threshold_and_exits() {
    if let Ok(dir) = std::env::var(CHILD_LOG_DIR_ENV) {
        let registry = named_log::Registry::new(named_log::Config::new(dir, "error"));
        let handle = registry.get_instance("fatal", false).unwrap();
        handle.warn("dropped warning");
        handle.fatal("boom");
    }

    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(std::env::current_exe().unwrap())
        .args([
            "fatal_writes_regardless_of_threshold_and_exits",
            "--exact",
            "--nocapture",
        ])
        .env(CHILD_LOG_DIR_ENV, dir.path())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let contents = std::fs::read_to_string(dir.path().join("fatal.log")).unwrap();
    assert!(contents.contains("[FATAL] fatal: boom"));
    assert!(!contents.contains("dropped warning"));
}
