//! Tabular exports: transactions, category summary and metadata sheets.

use chrono::{DateTime, NaiveDate, Utc};
use hexledger_domain::{Category, ExportPeriod, FinancialRecord};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{format::format_percentage, summary_service::share_of, CoreError};

pub const TRANSACTION_HEADERS: [&str; 10] = [
    "Serial No.",
    "Date",
    "Description",
    "Amount (USD)",
    "Category",
    "Notes",
    "Transaction Hash",
    "Block Number",
    "Timestamp",
    "Hex Data",
];

pub const SUMMARY_HEADERS: [&str; 4] = [
    "Category",
    "Total Amount (USD)",
    "Transaction Count",
    "Percentage",
];

pub const METADATA_HEADERS: [&str; 2] = ["Property", "Value"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Values stamped into the metadata sheet.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub exported_at: DateTime<Utc>,
    pub network: String,
    pub application: String,
    pub version: String,
}

/// A named table with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &'static str, headers: &[&str]) -> Self {
        Self {
            name,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Value of `column` in `row`, looked up by header name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub total: Decimal,
    pub count: usize,
    pub percentage: String,
}

/// The three sheets of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportWorkbook {
    pub transactions: Sheet,
    pub summary: Sheet,
    pub metadata: Sheet,
    pub record_count: usize,
    pub total_amount: Decimal,
}

impl ExportWorkbook {
    pub fn sheets(&self) -> [&Sheet; 3] {
        [&self.transactions, &self.summary, &self.metadata]
    }
}

pub struct ExportService;

impl ExportService {
    /// Records dated inside the period, in ledger order.
    pub fn select(records: &[FinancialRecord], period: &ExportPeriod) -> Vec<FinancialRecord> {
        match period.range() {
            Some(range) => records
                .iter()
                .filter(|record| range.contains(record.date))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Why the export is disabled, if it is.
    pub fn disabled_reason(records: &[FinancialRecord], period: &ExportPeriod) -> Option<String> {
        if period.range().is_none() {
            return Some("Please select both start and end dates".to_string());
        }
        if Self::select(records, period).is_empty() {
            return Some("No data available for export".to_string());
        }
        None
    }

    pub fn build(
        records: &[FinancialRecord],
        period: &ExportPeriod,
        context: &ExportContext,
    ) -> Result<ExportWorkbook, CoreError> {
        if let Some(reason) = Self::disabled_reason(records, period) {
            return Err(CoreError::InvalidOperation(reason));
        }
        let selected = Self::select(records, period);
        let total_amount: Decimal = selected.iter().map(|r| r.amount.value()).sum();

        let workbook = ExportWorkbook {
            transactions: Self::transactions_sheet(&selected),
            summary: Self::summary_sheet(&selected),
            metadata: Self::metadata_sheet(selected.len(), total_amount, period, context),
            record_count: selected.len(),
            total_amount,
        };
        tracing::info!(
            records = workbook.record_count,
            period = %period.description(),
            "export built"
        );
        Ok(workbook)
    }

    /// Per-category rows in first-appearance order, then the `TOTAL` row.
    pub fn summary_rows(records: &[FinancialRecord]) -> Vec<SummaryRow> {
        let mut order: Vec<(Category, Decimal, usize)> = Vec::new();
        for record in records {
            match order.iter_mut().find(|(c, _, _)| *c == record.category) {
                Some((_, total, count)) => {
                    *total += record.amount.value();
                    *count += 1;
                }
                None => order.push((record.category, record.amount.value(), 1)),
            }
        }
        let grand: Decimal = order.iter().map(|(_, total, _)| *total).sum();

        let mut rows: Vec<SummaryRow> = order
            .into_iter()
            .map(|(category, total, count)| SummaryRow {
                label: category.label().to_string(),
                total,
                count,
                percentage: format_percentage(share_of(total, grand, 2), 2),
            })
            .collect();
        rows.push(SummaryRow {
            label: "TOTAL".to_string(),
            total: grand,
            count: records.len(),
            percentage: "100.00%".to_string(),
        });
        rows
    }

    /// `APP_FY2024-2025_2026-10-16` or `APP_2024-01-01_to_2024-03-31_2026-10-16`.
    pub fn file_stem(application: &str, period: &ExportPeriod, today: NaiveDate) -> String {
        let app = application
            .trim()
            .replace(|c: char| c.is_whitespace(), "_")
            .to_uppercase();
        format!("{}_{}_{}", app, period.file_fragment(), today.format("%Y-%m-%d"))
    }

    fn transactions_sheet(records: &[FinancialRecord]) -> Sheet {
        let mut sheet = Sheet::new("Transactions", &TRANSACTION_HEADERS);
        for (index, record) in records.iter().enumerate() {
            sheet.rows.push(vec![
                (index + 1).to_string(),
                record.date.format("%Y-%m-%d").to_string(),
                record.description.clone(),
                record.amount.to_string(),
                record.category.label().to_string(),
                record.notes.clone().unwrap_or_default(),
                record
                    .transaction_hash
                    .clone()
                    .unwrap_or_else(|| "Pending".to_string()),
                record
                    .block_number
                    .map(|block| block.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                record
                    .timestamp
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                record.hex_data.clone().unwrap_or_else(|| "N/A".to_string()),
            ]);
        }
        sheet
    }

    fn summary_sheet(records: &[FinancialRecord]) -> Sheet {
        let mut sheet = Sheet::new("Category Summary", &SUMMARY_HEADERS);
        sheet.rows = Self::summary_rows(records)
            .into_iter()
            .map(|row| {
                vec![
                    row.label,
                    row.total.to_string(),
                    row.count.to_string(),
                    row.percentage,
                ]
            })
            .collect();
        sheet
    }

    fn metadata_sheet(
        count: usize,
        total: Decimal,
        period: &ExportPeriod,
        context: &ExportContext,
    ) -> Sheet {
        let mut sheet = Sheet::new("Metadata", &METADATA_HEADERS);
        let total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let pairs = [
            ("Export Date", context.exported_at.format(TIMESTAMP_FORMAT).to_string()),
            ("Export Type", period.kind_label().to_string()),
            ("Period", period.description()),
            ("Total Records", count.to_string()),
            ("Total Amount (USD)", format!("{:.2}", total)),
            ("Blockchain Network", context.network.clone()),
            ("Application", context.application.clone()),
            ("Version", context.version.clone()),
        ];
        sheet.rows = pairs
            .into_iter()
            .map(|(property, value)| vec![property.to_string(), value])
            .collect();
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hexledger_domain::NewRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, category: Category, amount: &str, on: NaiveDate) -> FinancialRecord {
        FinancialRecord::assign(id, NewRecord::new(id, amount.parse().unwrap(), category, on))
    }

    fn context() -> ExportContext {
        ExportContext {
            exported_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            network: "Ethereum Sepolia Testnet".into(),
            application: "HEXLEDGER".into(),
            version: "0.1.0".into(),
        }
    }

    #[test]
    fn financial_year_selection_is_april_to_march() {
        let records = vec![
            record("a", Category::Income, "1", date(2024, 3, 31)),
            record("b", Category::Income, "1", date(2024, 4, 1)),
            record("c", Category::Income, "1", date(2025, 3, 31)),
        ];
        let selected = ExportService::select(&records, &ExportPeriod::FinancialYear(2024));
        let ids: Vec<_> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn incomplete_range_disables_export() {
        let records = vec![record("a", Category::Income, "1", date(2024, 5, 1))];
        let period = ExportPeriod::CustomRange {
            start: None,
            end: Some(date(2024, 12, 31)),
        };
        assert!(ExportService::select(&records, &period).is_empty());
        let err = ExportService::build(&records, &period, &context()).unwrap_err();
        assert!(err.to_string().contains("start and end"));
    }

    #[test]
    fn empty_selection_disables_export() {
        let err = ExportService::build(&[], &ExportPeriod::FinancialYear(2024), &context())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }

    #[test]
    fn transaction_rows_mark_pending_records() {
        let records = vec![record("a", Category::Asset, "10.5", date(2024, 6, 1))];
        let book =
            ExportService::build(&records, &ExportPeriod::FinancialYear(2024), &context()).unwrap();
        let sheet = &book.transactions;
        assert_eq!(sheet.cell(0, "Serial No."), Some("1"));
        assert_eq!(sheet.cell(0, "Transaction Hash"), Some("Pending"));
        assert_eq!(sheet.cell(0, "Block Number"), Some("N/A"));
        assert_eq!(sheet.cell(0, "Timestamp"), Some("N/A"));
        assert_eq!(sheet.cell(0, "Hex Data"), Some("N/A"));
        assert_eq!(sheet.cell(0, "Amount (USD)"), Some("10.5"));
    }

    #[test]
    fn summary_keeps_first_appearance_order() {
        let records = vec![
            record("a", Category::Expense, "1", date(2024, 6, 1)),
            record("b", Category::Asset, "1", date(2024, 6, 2)),
            record("c", Category::Expense, "2", date(2024, 6, 3)),
        ];
        let rows = ExportService::summary_rows(&records);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Expense", "Asset", "TOTAL"]);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].percentage, "75.00%");
        assert_eq!(rows[2].percentage, "100.00%");
    }

    #[test]
    fn zero_grand_total_reports_zero_share() {
        let records = vec![record("a", Category::Equity, "0", date(2024, 6, 1))];
        let rows = ExportService::summary_rows(&records);
        assert_eq!(rows[0].percentage, "0.00%");
    }

    #[test]
    fn metadata_describes_the_export() {
        let records = vec![record("a", Category::Income, "1200", date(2024, 1, 15))];
        let period = ExportPeriod::custom(date(2024, 1, 1), date(2024, 3, 31));
        let book = ExportService::build(&records, &period, &context()).unwrap();
        let meta = &book.metadata;
        assert_eq!(meta.rows[0], ["Export Date", "2026-10-16 09:30:00 UTC"]);
        assert_eq!(meta.rows[1][1], "Custom Range");
        assert_eq!(meta.rows[2][1], "2024-01-01 - 2024-03-31");
        assert_eq!(meta.rows[4][1], "1200.00");
        assert_eq!(meta.rows[6][1], "HEXLEDGER");
    }

    #[test]
    fn file_stems_follow_the_period() {
        let today = date(2026, 10, 16);
        assert_eq!(
            ExportService::file_stem("hexledger", &ExportPeriod::FinancialYear(2024), today),
            "HEXLEDGER_FY2024-2025_2026-10-16"
        );
        let custom = ExportPeriod::custom(date(2024, 1, 1), date(2024, 3, 31));
        assert_eq!(
            ExportService::file_stem("Virtual Ledger", &custom, today),
            "VIRTUAL_LEDGER_2024-01-01_to_2024-03-31_2026-10-16"
        );
    }
}
