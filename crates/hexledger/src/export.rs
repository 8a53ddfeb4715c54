//! Writes an export workbook to disk as one CSV file per sheet.

use std::{
    fs,
    path::{Path, PathBuf},
};

use hexledger_core::{ExportWorkbook, Sheet};

use crate::errors::CliError;

pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const SUMMARY_FILE: &str = "category_summary.csv";
pub const METADATA_FILE: &str = "metadata.csv";

/// File for each sheet, in [`ExportWorkbook::sheets`] order.
const SHEET_FILES: [&str; 3] = [TRANSACTIONS_FILE, SUMMARY_FILE, METADATA_FILE];

/// Writes `<dir>/<stem>/{transactions,category_summary,metadata}.csv` and
/// returns the workbook directory.
pub fn write_workbook(workbook: &ExportWorkbook, dir: &Path, stem: &str) -> Result<PathBuf, CliError> {
    let target = dir.join(stem);
    fs::create_dir_all(&target)?;
    for (sheet, file) in workbook.sheets().into_iter().zip(SHEET_FILES) {
        write_sheet(sheet, &target.join(file))?;
    }
    tracing::info!(path = %target.display(), records = workbook.record_count, "export written");
    Ok(target)
}

fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hexledger_core::{ExportContext, ExportService};
    use hexledger_domain::{Category, ExportPeriod, FinancialRecord, NewRecord};

    #[test]
    fn writes_three_sheets_with_headers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut pending = NewRecord::new(
            "Rent, April",
            "1200".parse().unwrap(),
            Category::Expense,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        );
        pending.attach_payload("0x7b7d");
        let records = vec![FinancialRecord::assign("r-1", pending)];
        let context = ExportContext {
            exported_at: Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap(),
            network: "Ethereum Sepolia Testnet".into(),
            application: "HEXLEDGER".into(),
            version: "0.1.0".into(),
        };
        let book = ExportService::build(&records, &ExportPeriod::FinancialYear(2024), &context)
            .expect("build");

        let path = write_workbook(&book, dir.path(), "HEXLEDGER_FY2024-2025_2026-10-16")
            .expect("write");

        let transactions = fs::read_to_string(path.join(TRANSACTIONS_FILE)).unwrap();
        let mut lines = transactions.lines();
        assert!(lines.next().unwrap().starts_with("Serial No.,Date,Description"));
        assert!(lines.next().unwrap().contains("\"Rent, April\""));

        let summary = fs::read_to_string(path.join(SUMMARY_FILE)).unwrap();
        assert!(summary.contains("TOTAL,1200,1,100.00%"));
        let metadata = fs::read_to_string(path.join(METADATA_FILE)).unwrap();
        assert!(metadata.contains("Export Type,Financial Year"));
    }
}
