use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn console_init_keeps_first_subscriber() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    dark_knight::logging::init(false, None);
    dark_knight::logging::init(true, Some(path.clone()));
    tracing::info!("console-only marker");

    sleep(Duration::from_millis(100));

    let contents = fs::read_to_string(&path).unwrap_or_default();
    assert!(
        !contents.contains("console-only marker"),
        "second init replaced the console subscriber"
    );
}
