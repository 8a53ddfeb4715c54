use std::path::PathBuf;

use crate::cli::core::{invalid, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const SET_USAGE: &str = "usage: config set <locale|currency|application|network|explorer_tx_url|recipient|data_dir|export_dir|ui_color_enabled> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage preferences",
        "config [show|set <key> <value>|backup [note]|backups|restore <name>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("show") => show(context),
        Some("set") => {
            if args.len() < 3 {
                return Err(invalid(SET_USAGE));
            }
            let value = args[2..].join(" ");
            set(context, args[1], value.trim())
        }
        Some("backup") => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            output::success(format!("Configuration backed up as {}", name));
            Ok(())
        }
        Some("backups") => {
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                output::info("No configuration backups yet.");
            }
            for backup in backups {
                let created = backup
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let line = format!(
                    "{}  {}  {}",
                    backup.name,
                    created,
                    backup.note.as_deref().unwrap_or("")
                );
                output::line(line.trim_end());
            }
            Ok(())
        }
        Some("restore") => {
            let name = args
                .get(1)
                .ok_or_else(|| invalid("usage: config restore <name>"))?;
            let restored = context.config_manager.restore(name)?;
            context.config_manager.save(&restored)?;
            context.config = restored;
            apply(context);
            output::success(format!("Configuration restored from {}", name));
            Ok(())
        }
        Some(other) => Err(invalid(format!("unknown config action `{}`", other))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    let data_dir = config.resolve_data_dir(context.base_dir());
    output::section("Configuration");
    output::two_column(&[
        ("Locale", config.locale.clone()),
        ("Currency", config.currency.clone()),
        ("Application", config.application.clone()),
        ("Network", config.network.clone()),
        ("Explorer", config.explorer_tx_url.clone()),
        (
            "Recipient",
            config
                .recipient
                .clone()
                .unwrap_or_else(|| "(connected account)".to_string()),
        ),
        ("Data dir", data_dir.display().to_string()),
        ("Export dir", context.export_dir().display().to_string()),
        ("Colour", on_off(config.ui_color_enabled).to_string()),
        ("Wallet mode", config.wallet.mode.to_string()),
        ("Wallet account", config.wallet.account.clone()),
        ("Config file", context.config_manager.config_path().display().to_string()),
    ]);
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let config = &mut context.config;
    let mut restart_needed = false;
    match key.to_ascii_lowercase().as_str() {
        "locale" => config.locale = value.to_string(),
        "currency" => config.currency = value.to_string(),
        "application" => config.application = value.to_string(),
        "network" => config.network = value.to_string(),
        "explorer_tx_url" => config.explorer_tx_url = value.to_string(),
        "recipient" => config.recipient = optional(value),
        "data_dir" => {
            config.data_dir = optional(value).map(PathBuf::from);
            restart_needed = true;
        }
        "export_dir" => config.export_dir = optional(value).map(PathBuf::from),
        "ui_color_enabled" => {
            config.ui_color_enabled = parse_flag(value)
                .ok_or_else(|| invalid("ui_color_enabled must be on/off or true/false"))?;
        }
        other => return Err(invalid(format!("unknown config key `{}`", other))),
    }
    context.config_manager.save(&context.config)?;
    apply(context);
    output::success(format!("Updated {}", key.to_ascii_lowercase()));
    if restart_needed {
        output::hint("The new data directory is used from the next start.");
    }
    Ok(())
}

/// Pushes config values into the live output, wallet and session.
fn apply(context: &mut ShellContext) {
    output::apply_config(&context.config);
    context.wallet.set_mode(context.config.wallet.mode);
    context.reopen_session();
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;
    use hexledger_config::WalletMode;

    #[test]
    fn set_persists_and_clears_optional_values() {
        let dir = tempfile::tempdir().unwrap();
        let app = process_script(
            dir.path(),
            &[
                "config set recipient 0xdef",
                "config set application Acme Books",
                "config set export_dir none",
            ],
        )
        .unwrap();
        let saved = app.config_manager.load().unwrap();
        assert_eq!(saved.recipient.as_deref(), Some("0xdef"));
        assert_eq!(saved.application, "Acme Books");
        assert!(saved.export_dir.is_none());
    }

    #[test]
    fn restore_brings_back_wallet_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = process_script(dir.path(), &["wallet mode reject"]).unwrap();
        let name = app
            .config_manager
            .backup(&app.config, Some("reject"))
            .unwrap();
        app.process_line("wallet mode auto-approve").unwrap();
        assert_eq!(app.wallet.mode(), WalletMode::AutoApprove);

        app.process_line(&format!("config restore {}", name)).unwrap();
        assert_eq!(app.wallet.mode(), WalletMode::Reject);
        assert_eq!(app.config.wallet.mode, WalletMode::Reject);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(optional("None"), None);
    }
}
