//! Financial records as stored in the ledger, plus the pre-append shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Amount, Category};

/// One user-submitted entry held by the ledger store.
///
/// Records are never edited after they enter the store. A record that carries
/// a `transaction_hash` has had its payload confirmed externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: String,
    pub description: String,
    pub amount: Amount,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Epoch milliseconds of confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl FinancialRecord {
    /// Binds a store-generated identifier to a pending record.
    pub fn assign(id: impl Into<String>, record: NewRecord) -> Self {
        Self {
            id: id.into(),
            description: record.description,
            amount: record.amount,
            category: record.category,
            date: record.date,
            notes: record.notes,
            hex_data: record.hex_data,
            transaction_hash: record.transaction_hash,
            block_number: record.block_number,
            timestamp: record.timestamp,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.transaction_hash.is_some()
    }

    pub fn canonical(&self) -> CanonicalPayload {
        CanonicalPayload {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category,
            date: self.date,
            notes: self.notes.clone(),
        }
    }
}

/// A record that has not been appended yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub description: String,
    pub amount: Amount,
    pub category: Category,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub hex_data: Option<String>,
    pub transaction_hash: Option<String>,
    pub block_number: Option<u64>,
    pub timestamp: Option<i64>,
}

impl NewRecord {
    pub fn new(
        description: impl Into<String>,
        amount: Amount,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
            date,
            notes: None,
            hex_data: None,
            transaction_hash: None,
            block_number: None,
            timestamp: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn canonical(&self) -> CanonicalPayload {
        CanonicalPayload {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category,
            date: self.date,
            notes: self.notes.clone(),
        }
    }

    /// Stores the encoded payload. The first payload wins; later calls return
    /// `false` and leave it untouched.
    pub fn attach_payload(&mut self, hex: impl Into<String>) -> bool {
        if self.hex_data.is_some() {
            return false;
        }
        self.hex_data = Some(hex.into());
        true
    }

    /// Marks the record as confirmed by the external chain.
    pub fn confirm(
        &mut self,
        transaction_hash: impl Into<String>,
        block_number: Option<u64>,
        timestamp: i64,
    ) {
        self.transaction_hash = Some(transaction_hash.into());
        self.block_number = block_number;
        self.timestamp = Some(timestamp);
    }
}

/// The semantic subset of a record that is embedded as transaction data.
///
/// Field order is fixed; identifiers and confirmation data are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    pub description: String,
    pub amount: Amount,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rent() -> NewRecord {
        NewRecord::new(
            "Rent",
            "1200.00".parse().unwrap(),
            Category::Expense,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        )
    }

    #[test]
    fn serializes_with_camel_case_keys_and_skips_absent_fields() {
        let mut pending = rent();
        pending.attach_payload("0xabc");
        pending.confirm("0xfeed", Some(7), 1_700_000_000_000);
        let record = FinancialRecord::assign("r-1", pending);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["hexData"], "0xabc");
        assert_eq!(json["transactionHash"], "0xfeed");
        assert_eq!(json["blockNumber"], 7);
        assert_eq!(json["amount"], "1200.00");
        assert_eq!(json["date"], "2024-04-01");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn payload_is_attached_only_once() {
        let mut pending = rent();
        assert!(pending.attach_payload("0x01"));
        assert!(!pending.attach_payload("0x02"));
        assert_eq!(pending.hex_data.as_deref(), Some("0x01"));
    }

    #[test]
    fn reads_records_written_by_older_clients() {
        let raw = r#"{"id":"1712000000000","description":"Salary","amount":"500",
            "category":"Income","date":"2024-04-02","timestamp":1712000000000}"#;
        let record: FinancialRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.category, Category::Income);
        assert!(!record.is_confirmed());
    }
}
