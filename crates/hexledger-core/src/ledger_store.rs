//! Append-only record store backed by injected key-value persistence.

use std::{collections::HashSet, sync::Arc};

use hexledger_domain::{FinancialRecord, NewRecord};
use uuid::Uuid;

use crate::{storage::RecordStorage, time::Clock, CoreError};

/// Storage key holding the JSON array of every record.
pub const RECORDS_KEY: &str = "financialRecords";

/// Where an unparseable snapshot is copied before it can be overwritten.
pub const CORRUPT_RECORDS_KEY: &str = "financialRecords.corrupt";

/// Whether the in-memory records match what was last written durably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceStatus {
    Synced,
    /// The last write failed; `unsaved` records exist only in this session.
    Unsaved { error: String, unsaved: usize },
}

impl PersistenceStatus {
    /// Records appended since the last successful write.
    pub fn unsaved(&self) -> usize {
        match self {
            PersistenceStatus::Synced => 0,
            PersistenceStatus::Unsaved { unsaved, .. } => *unsaved,
        }
    }
}

/// Reads the durable snapshot, failing soft.
///
/// Missing, unreadable or corrupt data yields an empty ledger; the problem is
/// logged, never returned. A corrupt snapshot is first copied to
/// [`CORRUPT_RECORDS_KEY`]. Duplicate ids keep their first occurrence.
pub fn load_all(storage: &dyn RecordStorage) -> Vec<FinancialRecord> {
    let raw = match storage.read(RECORDS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read stored records");
            return Vec::new();
        }
    };

    let records: Vec<FinancialRecord> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            match storage.write(CORRUPT_RECORDS_KEY, &raw) {
                Ok(()) => tracing::warn!(
                    error = %err,
                    copy = CORRUPT_RECORDS_KEY,
                    "stored records are corrupt; kept a copy and starting empty"
                ),
                Err(copy_err) => tracing::warn!(
                    error = %err,
                    copy_error = %copy_err,
                    "stored records are corrupt and could not be copied; starting empty"
                ),
            }
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let total = records.len();
    let unique: Vec<FinancialRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(
            dropped = total - unique.len(),
            "stored records contained duplicate ids"
        );
    }
    unique
}

/// Owns the ordered record sequence and its durable backing.
///
/// Insertion order is write order and ids are unique. Callers only ever get
/// shared references or clones; there is no update or delete.
pub struct LedgerStore {
    records: Vec<FinancialRecord>,
    ids: HashSet<String>,
    storage: Box<dyn RecordStorage>,
    clock: Arc<dyn Clock>,
    status: PersistenceStatus,
}

impl LedgerStore {
    /// Builds the store and populates it from durable storage.
    pub fn open(storage: Box<dyn RecordStorage>, clock: Arc<dyn Clock>) -> Self {
        let records = load_all(storage.as_ref());
        tracing::info!(count = records.len(), "ledger store opened");
        let ids = records.iter().map(|record| record.id.clone()).collect();
        Self {
            records,
            ids,
            storage,
            clock,
            status: PersistenceStatus::Synced,
        }
    }

    /// Re-reads the durable snapshot, replacing the in-memory records.
    pub fn reload(&mut self) {
        self.records = load_all(self.storage.as_ref());
        self.ids = self.records.iter().map(|record| record.id.clone()).collect();
        self.status = PersistenceStatus::Synced;
    }

    /// Appends a record, assigning its id and (if unset) its timestamp.
    ///
    /// The full sequence is rewritten afterwards. A failed write does not undo
    /// the append; see [`LedgerStore::persistence_status`].
    pub fn append(&mut self, record: NewRecord) -> FinancialRecord {
        let mut record = record;
        if record.timestamp.is_none() {
            record.timestamp = Some(self.clock.now_millis());
        }
        let id = self.fresh_id();
        let stored = FinancialRecord::assign(id.clone(), record);
        self.ids.insert(id);
        self.records.push(stored.clone());
        tracing::info!(
            id = %stored.id,
            category = %stored.category,
            confirmed = stored.is_confirmed(),
            "record appended"
        );

        match self.persist() {
            Ok(()) => self.status = PersistenceStatus::Synced,
            Err(err) => {
                let unsaved = self.status.unsaved() + 1;
                tracing::error!(error = %err, unsaved, "failed to persist records");
                self.status = PersistenceStatus::Unsaved {
                    error: err.to_string(),
                    unsaved,
                };
            }
        }
        stored
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<FinancialRecord> {
        self.records.clone()
    }

    pub fn get(&self, id: &str) -> Option<&FinancialRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn persistence_status(&self) -> &PersistenceStatus {
        &self.status
    }

    fn fresh_id(&self) -> String {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if !self.ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn persist(&self) -> Result<(), CoreError> {
        let json = serde_json::to_string(&self.records)?;
        self.storage.write(RECORDS_KEY, &json)
    }
}
