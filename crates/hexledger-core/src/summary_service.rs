//! Dashboard aggregation over record slices. Pure functions, no I/O.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hexledger_domain::{Category, DateRange, FinancialRecord};
use rust_decimal::{Decimal, RoundingStrategy};

pub type CategoryTotals = BTreeMap<Category, Decimal>;

/// Headline figures shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KpiSnapshot {
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
    pub equity: Decimal,
    pub balance: Decimal,
    pub activity: usize,
}

/// Percentage change of each headline figure between two periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodComparison {
    pub current: KpiSnapshot,
    pub previous: KpiSnapshot,
    pub balance: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
    pub activity: Decimal,
}

/// One slice of the category allocation chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSlice {
    pub category: Category,
    pub total: Decimal,
    /// Share of the grand total, rounded to one decimal place.
    pub percentage: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    /// Keeps records dated within `[start, end]`.
    ///
    /// When either bound is absent the input is returned unfiltered.
    pub fn filter_by_range(
        records: &[FinancialRecord],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<FinancialRecord> {
        match (start, end) {
            (Some(start), Some(end)) => Self::filter_in(records, &DateRange::new(start, end)),
            _ => records.to_vec(),
        }
    }

    pub fn filter_in(records: &[FinancialRecord], range: &DateRange) -> Vec<FinancialRecord> {
        records
            .iter()
            .filter(|record| range.contains(record.date))
            .cloned()
            .collect()
    }

    /// Sums amounts per category. Categories with no records are absent.
    pub fn totals_by_category(records: &[FinancialRecord]) -> CategoryTotals {
        let mut totals = CategoryTotals::new();
        for record in records {
            *totals.entry(record.category).or_insert(Decimal::ZERO) += record.amount.value();
        }
        totals
    }

    /// `asset + income - liability - expense`.
    ///
    /// Equity appears in the totals but never in the balance.
    pub fn balance(records: &[FinancialRecord]) -> Decimal {
        Self::balance_of(&Self::totals_by_category(records))
    }

    pub fn balance_of(totals: &CategoryTotals) -> Decimal {
        let get = |category| totals.get(&category).copied().unwrap_or(Decimal::ZERO);
        get(Category::Asset) + get(Category::Income)
            - get(Category::Liability)
            - get(Category::Expense)
    }

    /// `(current / previous - 1) * 100`, i.e. `(current - previous) / previous * 100`.
    ///
    /// A zero `previous` yields 100 when `current` is positive and 0 otherwise,
    /// so the result jumps at zero instead of dividing by it. A change too
    /// large for a `Decimal` saturates at `Decimal::MAX` or `Decimal::MIN`.
    pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
        if previous.is_zero() {
            return if current > Decimal::ZERO {
                Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
        }
        current
            .checked_div(previous)
            .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
            .and_then(|change| change.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| {
                saturated(current.is_sign_negative() == previous.is_sign_negative())
            })
    }

    pub fn kpis(records: &[FinancialRecord]) -> KpiSnapshot {
        let totals = Self::totals_by_category(records);
        let get = |category| totals.get(&category).copied().unwrap_or(Decimal::ZERO);
        KpiSnapshot {
            assets: get(Category::Asset),
            liabilities: get(Category::Liability),
            income: get(Category::Income),
            expenses: get(Category::Expense),
            equity: get(Category::Equity),
            balance: Self::balance_of(&totals),
            activity: records.len(),
        }
    }

    /// Compares `current` against `previous`; records outside both are ignored.
    pub fn compare(
        records: &[FinancialRecord],
        current: &DateRange,
        previous: &DateRange,
    ) -> PeriodComparison {
        let current = Self::kpis(&Self::filter_in(records, current));
        let previous = Self::kpis(&Self::filter_in(records, previous));
        PeriodComparison {
            balance: Self::percentage_change(current.balance, previous.balance),
            income: Self::percentage_change(current.income, previous.income),
            expenses: Self::percentage_change(current.expenses, previous.expenses),
            activity: Self::percentage_change(
                Decimal::from(current.activity),
                Decimal::from(previous.activity),
            ),
            current,
            previous,
        }
    }

    pub fn category_counts(records: &[FinancialRecord]) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for record in records {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn allocation(records: &[FinancialRecord]) -> Vec<AllocationSlice> {
        let totals = Self::totals_by_category(records);
        let grand: Decimal = totals.values().copied().sum();
        totals
            .into_iter()
            .map(|(category, total)| AllocationSlice {
                category,
                total,
                percentage: share_of(total, grand, 1),
            })
            .collect()
    }
}

/// `part / whole * 100` rounded half away from zero; zero when `whole` is zero.
pub fn share_of(part: Decimal, whole: Decimal, dp: u32) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    percent(part, whole).round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator * 100`, saturating when the quotient overflows.
/// `denominator` must be non-zero.
fn percent(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            saturated(numerator.is_sign_negative() == denominator.is_sign_negative())
        })
}

fn saturated(positive: bool) -> Decimal {
    if positive {
        Decimal::MAX
    } else {
        Decimal::MIN
    }
}
