use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use hexledger_core::{Clock, LedgerStore, RecordStorage, CORRUPT_RECORDS_KEY, RECORDS_KEY};
use hexledger_domain::{Category, NewRecord};
use hexledger_storage_json::JsonRecordStorage;
use tempfile::tempdir;

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(1_712_000_000, 0).expect("valid timestamp")
    }
}

#[test]
fn json_storage_reads_missing_keys_as_none() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path().join("data")).expect("create storage");
    assert!(storage.read(RECORDS_KEY).expect("read").is_none());
    assert!(dir.path().join("data").is_dir());
}

#[test]
fn json_storage_replaces_values_without_leaving_tmp_files() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path()).expect("create storage");

    storage.write(RECORDS_KEY, "[]").expect("first write");
    storage.write(RECORDS_KEY, "[1]").expect("second write");

    assert_eq!(storage.read(RECORDS_KEY).expect("read").as_deref(), Some("[1]"));
    let path = storage.path_for(RECORDS_KEY);
    assert_eq!(path, dir.path().join("financialrecords.json"));
    assert!(!dir.path().join("financialrecords.json.tmp").exists());
}

#[test]
fn ledger_store_survives_reopen_through_json_files() {
    let dir = tempdir().expect("tempdir");
    let clock: Arc<dyn Clock> = Arc::new(FixedClock);

    let appended = {
        let storage = JsonRecordStorage::new(dir.path()).expect("create storage");
        let mut store = LedgerStore::open(Box::new(storage), Arc::clone(&clock));
        store.append(NewRecord::new(
            "Rent",
            "1200.00".parse().expect("amount"),
            Category::Expense,
            NaiveDate::from_ymd_opt(2024, 4, 1).expect("date"),
        ))
    };

    let storage = JsonRecordStorage::new(dir.path()).expect("reopen storage");
    let store = LedgerStore::open(Box::new(storage), clock);
    assert_eq!(store.records(), &[appended]);
    assert_eq!(store.records()[0].amount.to_string(), "1200.00");
}

#[test]
fn corrupt_file_opens_as_empty_ledger() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path()).expect("create storage");
    std::fs::write(storage.path_for(RECORDS_KEY), "not json").expect("seed corrupt file");

    let corrupt_copy = storage.path_for(CORRUPT_RECORDS_KEY);
    let store = LedgerStore::open(Box::new(storage), Arc::new(FixedClock));
    assert!(store.is_empty());
    assert!(corrupt_copy.ends_with("financialrecords_corrupt.json"));
    assert_eq!(
        std::fs::read_to_string(corrupt_copy).expect("read corrupt copy"),
        "not json"
    );
}
