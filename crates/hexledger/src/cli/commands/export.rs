use std::path::PathBuf;

use hexledger_core::{CurrencyFormatter, ExportContext, ExportService};
use hexledger_domain::{DateRange, ExportPeriod};

use super::parse_date;
use crate::cli::core::{invalid, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::export::write_workbook;
use crate::utils::build_info::CLI_VERSION;

const USAGE: &str =
    "export fy <start-year> [dir] | export range <from> <to> [dir] | export preview <fy <start-year>|range <from> <to>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write a financial-year or date-range workbook as CSV",
        USAGE,
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        Some("preview") => {
            let (period, _) = parse_period(&args[1..])?;
            preview(context, &period);
            Ok(())
        }
        Some(_) => {
            let (period, dir) = parse_period(args)?;
            write(context, &period, dir)
        }
        None => Err(invalid(format!("usage: {}", USAGE))),
    }
}

/// Reads `fy <year> [dir]` or `range <from> <to> [dir]`.
fn parse_period(args: &[&str]) -> Result<(ExportPeriod, Option<PathBuf>), CommandError> {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        Some("fy") => {
            let raw = args
                .get(1)
                .ok_or_else(|| invalid("usage: export fy <start-year> [dir]"))?;
            let year = raw
                .parse::<i32>()
                .ok()
                .filter(|year| DateRange::financial_year(*year).is_some())
                .ok_or_else(|| invalid(format!("`{}` is not a supported year", raw)))?;
            Ok((ExportPeriod::FinancialYear(year), args.get(2).map(PathBuf::from)))
        }
        Some("range") => {
            let start = args.get(1).map(|raw| parse_date(raw)).transpose()?;
            let end = args.get(2).map(|raw| parse_date(raw)).transpose()?;
            Ok((
                ExportPeriod::CustomRange { start, end },
                args.get(3).map(PathBuf::from),
            ))
        }
        _ => Err(invalid(format!("usage: {}", USAGE))),
    }
}

fn preview(context: &ShellContext, period: &ExportPeriod) {
    let records = context.store().snapshot();
    output::section(format!("Export preview: {}", period.description()));
    if let Some(reason) = ExportService::disabled_reason(&records, period) {
        output::warning(reason);
        return;
    }
    let selected = ExportService::select(&records, period);
    output::two_column(&[
        ("Type", period.kind_label().to_string()),
        ("Records", selected.len().to_string()),
    ]);
    for row in ExportService::summary_rows(&selected) {
        output::line(format!(
            "{:<10} {:>14} {:>4}  {}",
            row.label,
            context.formatter.format_amount(row.total),
            row.count,
            row.percentage
        ));
    }
}

fn write(context: &ShellContext, period: &ExportPeriod, dir: Option<PathBuf>) -> CommandResult {
    let records = context.store().snapshot();
    if let Some(reason) = ExportService::disabled_reason(&records, period) {
        output::warning(reason);
        return Ok(());
    }
    let export_context = ExportContext {
        exported_at: context.clock.now(),
        network: context.config.network.clone(),
        application: context.config.application.clone(),
        version: CLI_VERSION.to_string(),
    };
    let workbook = ExportService::build(&records, period, &export_context)?;
    let stem = ExportService::file_stem(&context.config.application, period, context.clock.today());
    let dir = dir.unwrap_or_else(|| context.export_dir());
    let path = write_workbook(&workbook, &dir, &stem)?;

    output::success(format!(
        "Exported {} record(s) to {}",
        workbook.record_count,
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;

    #[test]
    fn periods_parse_from_arguments() {
        let (period, dir) = parse_period(&["fy", "2024", "/tmp/out"]).unwrap();
        assert_eq!(period, ExportPeriod::FinancialYear(2024));
        assert_eq!(dir, Some(PathBuf::from("/tmp/out")));

        let (period, dir) = parse_period(&["range", "2024-01-01"]).unwrap();
        assert!(period.range().is_none());
        assert!(dir.is_none());

        assert!(parse_period(&["fy", "twenty"]).is_err());
        assert!(parse_period(&["fy", "2147483647"]).is_err());
        assert!(parse_period(&["fy", "-2147483648"]).is_err());
        assert!(parse_period(&["quarter"]).is_err());
    }

    #[test]
    fn preview_of_an_unsupported_year_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = process_script(dir.path(), &[]).unwrap();
        let err = app
            .process_line("export preview fy 2147483647")
            .expect_err("unsupported year");
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(app.running);
    }
}
