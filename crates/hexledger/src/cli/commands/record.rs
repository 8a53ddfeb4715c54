use hexledger_core::{
    encoding, truncate_hash, truncate_hex, CategoryStyle, CurrencyFormatter, DateFormatter,
    HistoryView, SubmitOutcome, DEFAULT_PER_PAGE,
};
use hexledger_domain::{FinancialRecord, RecordDraft};

use crate::cli::core::{invalid, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const ADD_USAGE: &str =
    "add description=<text> amount=<number> category=<asset|liability|income|expense|equity> [date=YYYY-MM-DD] [notes=<text>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Confirm a record through the wallet and store it",
            ADD_USAGE,
            cmd_add,
        ),
        CommandEntry::new("list", "Show transaction history, newest first", "list [page]", cmd_list),
        CommandEntry::new("show", "Show one record with its decoded payload", "show <id>", cmd_show),
    ]
}

/// Builds a draft from `key=value` arguments. The date defaults to today.
pub(crate) fn draft_from_args(args: &[&str], today: &str) -> Result<RecordDraft, CommandError> {
    let mut draft = RecordDraft {
        date: today.to_string(),
        ..RecordDraft::default()
    };
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| invalid(format!("expected key=value, got `{}`", arg)))?;
        let value = value.to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "description" | "desc" => draft.description = value,
            "amount" => draft.amount = value,
            "category" => draft.category = value,
            "date" => draft.date = value,
            "notes" => draft.notes = Some(value),
            other => return Err(invalid(format!("unknown field `{}`", other))),
        }
    }
    Ok(draft)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(invalid(format!("usage: {}", ADD_USAGE)));
    }
    let today = context.clock.today().format("%Y-%m-%d").to_string();
    let draft = draft_from_args(args, &today)?;

    let outcome = context.session.submit(&context.store, &draft);
    match &outcome {
        SubmitOutcome::Confirmed {
            record,
            persistence,
        } => {
            output::success(outcome.message());
            output::two_column(&[
                ("ID", record.id.clone()),
                ("Amount", context.formatter.format_amount(record.amount.value())),
                ("Hash", record.transaction_hash.clone().unwrap_or_default()),
                (
                    "Block",
                    record
                        .block_number
                        .map(|block| block.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
                ("Data", truncate_hex(record.hex_data.as_deref())),
            ]);
            context.report_persistence(persistence);
        }
        SubmitOutcome::Invalid(errors) => {
            output::error("Please fix the form:");
            for error in errors.errors() {
                output::line(format!("{}: {}", error.field, error.message));
            }
        }
        SubmitOutcome::NotConnected => {
            output::error(outcome.message());
            output::hint("Run `connect` first.");
        }
        SubmitOutcome::Busy => output::warning(outcome.message()),
        SubmitOutcome::Rejected | SubmitOutcome::Failed(_) => output::error(outcome.message()),
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let requested = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| invalid(format!("`{}` is not a page number", raw)))?,
        None => 1,
    };
    let records = context.store().snapshot();
    if records.is_empty() {
        output::info("No transactions yet. Add one with `add`.");
        return Ok(());
    }

    let page = HistoryView::page(&records, requested, DEFAULT_PER_PAGE);
    output::section(format!("Transaction History ({} records)", page.total_records));
    output::line(format!(
        "{:<36}  {:<12}  {:<24}  {:>14}  {:<10}  {}",
        "ID", "Date", "Description", "Amount", "Category", "Hash"
    ));
    for record in &page.rows {
        let style = CategoryStyle::of(record.category);
        output::line(format!(
            "{:<36}  {:<12}  {:<24}  {:>14}  {}  {}",
            record.id,
            context.formatter.format_date(record.date),
            clip(&record.description, 24),
            context.formatter.format_amount(record.amount.value()),
            output::paint_hex(&format!("{:<10}", style.label), style.color),
            truncate_hash(record.transaction_hash.as_deref()),
        ));
    }
    if page.total_pages > 1 {
        let pages: Vec<String> = page
            .window
            .iter()
            .map(|number| {
                if *number == page.page {
                    format!("[{}]", number)
                } else {
                    number.to_string()
                }
            })
            .collect();
        output::info(format!(
            "Page {} of {}  {}",
            page.page,
            page.total_pages,
            pages.join(" ")
        ));
    }
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = args.first().ok_or_else(|| invalid("usage: show <id>"))?;
    let record: FinancialRecord = context
        .store()
        .get(id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("No record with id `{}`", id)))?;

    output::section(format!("Record {}", record.id));
    let style = CategoryStyle::of(record.category);
    let mut rows = vec![
        ("Description", record.description.clone()),
        ("Amount", context.formatter.format_amount(record.amount.value())),
        ("Category", format!("{} ({} badge)", style.label, style.badge)),
        ("Date", context.formatter.format_date(record.date)),
        ("Notes", record.notes.clone().unwrap_or_else(|| "-".to_string())),
        (
            "Hash",
            record
                .transaction_hash
                .clone()
                .unwrap_or_else(|| "Pending".to_string()),
        ),
        (
            "Block",
            record
                .block_number
                .map(|block| block.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Hex data", record.hex_data.clone().unwrap_or_else(|| "N/A".to_string())),
    ];
    if let Some(hash) = &record.transaction_hash {
        rows.push(("Explorer", context.config.explorer_link(hash)));
    }
    output::two_column(&rows);

    if let Some(hex) = &record.hex_data {
        match encoding::decode(hex) {
            Ok(payload) => {
                let json = serde_json::to_string_pretty(&payload)
                    .map_err(|err| CommandError::Message(err.to_string()))?;
                output::section("Decoded payload");
                for line in json.lines() {
                    output::line(line);
                }
            }
            Err(err) => output::warning(format!("Payload does not decode: {}", err)),
        }
    }
    Ok(())
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_parse_key_value_pairs() {
        let draft = draft_from_args(
            &["description=Office rent", "AMOUNT=1200", "category=expense", "notes=April"],
            "2024-04-02",
        )
        .unwrap();
        assert_eq!(draft.description, "Office rent");
        assert_eq!(draft.amount, "1200");
        assert_eq!(draft.date, "2024-04-02");
        assert_eq!(draft.notes.as_deref(), Some("April"));
    }

    #[test]
    fn drafts_reject_unknown_or_bare_arguments() {
        assert!(draft_from_args(&["colour=red"], "2024-04-02").is_err());
        assert!(draft_from_args(&["Rent"], "2024-04-02").is_err());
    }

    #[test]
    fn long_descriptions_are_clipped() {
        assert_eq!(clip("Rent", 24), "Rent");
        assert_eq!(clip("abcdefghij", 8), "abcde...");
    }
}
