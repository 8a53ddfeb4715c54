use hexledger_core::{
    format_percentage, CategoryStyle, CurrencyFormatter, KpiSnapshot, SummaryService,
};
use hexledger_domain::DateRange;
use rust_decimal::Decimal;

use super::parse_date;
use crate::cli::core::{invalid, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show KPIs and category allocation",
            "summary [from YYYY-MM-DD] [to YYYY-MM-DD]",
            cmd_summary,
        ),
        CommandEntry::new(
            "compare",
            "Compare KPIs between two periods",
            "compare <from> <to> <previous-from> <previous-to>",
            cmd_compare,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (start, end) = match args {
        [] => (None, None),
        [start, end] => (Some(parse_date(start)?), Some(parse_date(end)?)),
        _ => return Err(invalid("usage: summary [from] [to]; give both dates or neither")),
    };
    let records = SummaryService::filter_by_range(context.store().records(), start, end);

    let title = match (start, end) {
        (Some(start), Some(end)) => format!("Summary {}", DateRange::new(start, end)),
        _ => "Summary (all time)".to_string(),
    };
    output::section(title);
    print_kpis(context, &SummaryService::kpis(&records));

    let allocation = SummaryService::allocation(&records);
    if allocation.is_empty() {
        output::info("No data to display");
        return Ok(());
    }
    let counts = SummaryService::category_counts(&records);
    output::section("Category Allocation");
    for slice in allocation {
        let style = CategoryStyle::of(slice.category);
        output::line(format!(
            "{}  {:>14}  {:>6}  {} record(s)",
            output::paint_hex(&format!("{:<10}", style.label), style.color),
            context.formatter.format_amount(slice.total),
            format_percentage(slice.percentage, 1),
            counts.get(&slice.category).copied().unwrap_or(0),
        ));
    }
    Ok(())
}

fn cmd_compare(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [from, to, previous_from, previous_to] = args else {
        return Err(invalid(
            "usage: compare <from> <to> <previous-from> <previous-to>",
        ));
    };
    let current = DateRange::new(parse_date(from)?, parse_date(to)?);
    let previous = DateRange::new(parse_date(previous_from)?, parse_date(previous_to)?);
    let comparison = SummaryService::compare(context.store().records(), &current, &previous);

    output::section(format!("{} vs {}", current, previous));
    let money = |value: Decimal| context.formatter.format_amount(value);
    let rows = [
        (
            "Total Balance",
            money(comparison.current.balance),
            money(comparison.previous.balance),
            comparison.balance,
        ),
        (
            "Income",
            money(comparison.current.income),
            money(comparison.previous.income),
            comparison.income,
        ),
        (
            "Expenses",
            money(comparison.current.expenses),
            money(comparison.previous.expenses),
            comparison.expenses,
        ),
        (
            "Activity",
            comparison.current.activity.to_string(),
            comparison.previous.activity.to_string(),
            comparison.activity,
        ),
    ];
    for (label, current, previous, change) in rows {
        output::line(format!(
            "{:<14} {:>14} {:>14}  {}",
            label,
            current,
            previous,
            signed_percentage(change)
        ));
    }
    Ok(())
}

fn print_kpis(context: &ShellContext, kpis: &KpiSnapshot) {
    let money = |value: Decimal| context.formatter.format_amount(value);
    output::two_column(&[
        ("Total Balance", money(kpis.balance)),
        ("Income", money(kpis.income)),
        ("Expenses", money(kpis.expenses)),
        ("Assets", money(kpis.assets)),
        ("Liabilities", money(kpis.liabilities)),
        ("Equity", money(kpis.equity)),
        ("Activity", format!("{} transaction(s)", kpis.activity)),
    ]);
}

/// `+12.5%`, `-3.0%` or `0.0%`.
fn signed_percentage(change: Decimal) -> String {
    let formatted = format_percentage(change, 1);
    if change > Decimal::ZERO {
        format!("+{}", formatted)
    } else {
        formatted
    }
}
