//! Newest-first paging over the ledger and short forms of long hex values.

use hexledger_domain::FinancialRecord;

pub const DEFAULT_PER_PAGE: usize = 10;
const MAX_VISIBLE_PAGES: usize = 5;

/// One page of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub rows: Vec<FinancialRecord>,
    /// 1-based page actually shown after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_records: usize,
    /// Page numbers offered for navigation.
    pub window: Vec<usize>,
}

pub struct HistoryView;

impl HistoryView {
    /// Sorts by timestamp, newest first. Missing timestamps count as zero and
    /// ties keep ledger order.
    pub fn ordered(records: &[FinancialRecord]) -> Vec<FinancialRecord> {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|record| std::cmp::Reverse(record.timestamp.unwrap_or(0)));
        sorted
    }

    pub fn page(records: &[FinancialRecord], page: usize, per_page: usize) -> HistoryPage {
        let per_page = per_page.max(1);
        let total_records = records.len();
        let total_pages = total_records.div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));

        let rows = Self::ordered(records)
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        HistoryPage {
            rows,
            page,
            total_pages,
            total_records,
            window: page_window(page, total_pages),
        }
    }
}

/// At most five page numbers around `current`, pinned to either end.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).collect();
    }
    let first = if current <= 3 {
        1
    } else if current >= total_pages - 2 {
        total_pages - (MAX_VISIBLE_PAGES - 1)
    } else {
        current - 2
    };
    (first..first + MAX_VISIBLE_PAGES).collect()
}

/// `0x12ab34...9f8e7d`; `N/A` when absent.
pub fn truncate_hash(hash: Option<&str>) -> String {
    truncate(hash, 8, 6)
}

/// First and last twenty characters of an encoded payload.
pub fn truncate_hex(hex: Option<&str>) -> String {
    truncate(hex, 20, 20)
}

fn truncate(value: Option<&str>, head: usize, tail: usize) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= head + tail {
        return value.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hexledger_domain::{Category, NewRecord};

    fn stamped(id: &str, timestamp: Option<i64>) -> FinancialRecord {
        let mut record = NewRecord::new(
            id,
            "1".parse().unwrap(),
            Category::Asset,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        record.timestamp = timestamp;
        FinancialRecord::assign(id, record)
    }

    #[test]
    fn newest_first_with_missing_timestamps_last() {
        let records = vec![stamped("a", Some(10)), stamped("b", None), stamped("c", Some(30))];
        let ids: Vec<_> = HistoryView::ordered(&records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn pages_are_clamped() {
        let records: Vec<_> = (0..23).map(|i| stamped(&i.to_string(), Some(i))).collect();
        let last = HistoryView::page(&records, 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.rows.len(), 3);

        let first = HistoryView::page(&records, 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.rows[0].id, "22");
    }

    #[test]
    fn empty_history_has_one_blank_page() {
        let page = HistoryView::page(&[], 1, DEFAULT_PER_PAGE);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
        assert!(page.window.is_empty());
    }

    #[test]
    fn window_follows_current_page() {
        assert_eq!(page_window(2, 3), [1, 2, 3]);
        assert_eq!(page_window(1, 9), [1, 2, 3, 4, 5]);
        assert_eq!(page_window(5, 9), [3, 4, 5, 6, 7]);
        assert_eq!(page_window(9, 9), [5, 6, 7, 8, 9]);
    }

    #[test]
    fn truncation_keeps_both_ends() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(truncate_hash(Some(&hash)), "0xababab...ababab");
        assert_eq!(truncate_hash(None), "N/A");
        assert_eq!(truncate_hex(Some("0x1234")), "0x1234");
    }
}
