#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use costing_core::{
    config::ConfigManager, core::ledger_manager::LedgerManager, storage::JsonStorage,
    WageConverter,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (LedgerManager, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let mut ledger_manager =
        LedgerManager::new(Box::new(storage), WageConverter::default(), "chantiers");
    ledger_manager.open("chantiers").expect("open ledger");
    let config_manager = ConfigManager::with_base_dir(base).expect("create config manager");

    (ledger_manager, config_manager)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
