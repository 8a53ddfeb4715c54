//! Reporting windows: inclusive date ranges and export periods.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const FINANCIAL_YEAR_START_MONTH: u32 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Inclusive date window. A window whose start is after its end is empty.
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// April 1st of `start_year` through March 31st of the following year.
    ///
    /// Returns `None` only for years chrono cannot represent.
    pub fn financial_year(start_year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(start_year, FINANCIAL_YEAR_START_MONTH, 1)?;
        let end_year = start_year.checked_add(1)?;
        let end = NaiveDate::from_ymd_opt(end_year, FINANCIAL_YEAR_START_MONTH, 1)?.pred_opt()?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Which slice of the ledger an export covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportPeriod {
    FinancialYear(i32),
    CustomRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl ExportPeriod {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        ExportPeriod::CustomRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Concrete window, or `None` when a custom range is missing a bound.
    pub fn range(&self) -> Option<DateRange> {
        match *self {
            ExportPeriod::FinancialYear(year) => DateRange::financial_year(year),
            ExportPeriod::CustomRange {
                start: Some(start),
                end: Some(end),
            } => Some(DateRange::new(start, end)),
            ExportPeriod::CustomRange { .. } => None,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ExportPeriod::FinancialYear(_) => "Financial Year",
            ExportPeriod::CustomRange { .. } => "Custom Range",
        }
    }

    pub fn description(&self) -> String {
        match self {
            ExportPeriod::FinancialYear(year) => format!("FY {}-{}", year, year.saturating_add(1)),
            ExportPeriod::CustomRange { start, end } => {
                format!("{} - {}", bound_label(*start, "start"), bound_label(*end, "end"))
            }
        }
    }

    /// Period fragment used in export file names.
    pub fn file_fragment(&self) -> String {
        match self {
            ExportPeriod::FinancialYear(year) => format!("FY{}-{}", year, year.saturating_add(1)),
            ExportPeriod::CustomRange { start, end } => {
                format!("{}_to_{}", bound_label(*start, "start"), bound_label(*end, "end"))
            }
        }
    }
}

fn bound_label(bound: Option<NaiveDate>, placeholder: &str) -> String {
    bound
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| placeholder.to_string())
}
