use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// US-dollar formatting with thousands separators and two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let fixed = format!("{:.2}", rounded.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{}${}.{}", sign, group_thousands(whole), fraction)
    }
}

impl DateFormatter for UsdFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%b %-d, %Y").to_string()
    }
}

/// Formats a percentage with a fixed number of decimals, e.g. `"71.43%"`.
pub fn format_percentage(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", dp as usize, rounded)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_groups_thousands() {
        let fmt = UsdFormatter;
        assert_eq!(fmt.format_amount("1200".parse().unwrap()), "$1,200.00");
        assert_eq!(fmt.format_amount("-1200".parse().unwrap()), "-$1,200.00");
        assert_eq!(fmt.format_amount("1234567.891".parse().unwrap()), "$1,234,567.89");
        assert_eq!(fmt.format_amount(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn percentages_keep_trailing_zeros() {
        assert_eq!(format_percentage(Decimal::ONE_HUNDRED, 2), "100.00%");
        assert_eq!(format_percentage("71.428571".parse().unwrap(), 2), "71.43%");
        assert_eq!(format_percentage("33.333".parse().unwrap(), 1), "33.3%");
    }

    #[test]
    fn dates_use_short_month_names() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(UsdFormatter.format_date(date), "Apr 1, 2024");
    }
}
