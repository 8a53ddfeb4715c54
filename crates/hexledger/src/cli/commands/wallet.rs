use hexledger_config::WalletMode;
use hexledger_core::{AccountChange, ConnectOutcome};

use crate::cli::core::{invalid, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("connect", "Connect the wallet", "connect", cmd_connect),
        CommandEntry::new("account", "Show the connected account", "account", cmd_account),
        CommandEntry::new(
            "wallet",
            "Inspect or drive the local wallet",
            "wallet [status|mode <auto-approve|reject|unavailable>|switch <account>|disconnect|network]",
            cmd_wallet,
        ),
    ]
}

fn cmd_connect(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.session.connect();
    match &outcome {
        ConnectOutcome::Connected(account) => {
            output::success(outcome.message());
            output::info(format!("Account: {}", account));
        }
        ConnectOutcome::AlreadyConnected(_) => output::info(outcome.message()),
        ConnectOutcome::NotInstalled { .. } => output::error(outcome.message()),
        ConnectOutcome::Busy | ConnectOutcome::Pending => output::warning(outcome.message()),
        ConnectOutcome::Rejected | ConnectOutcome::Failed(_) => output::error(outcome.message()),
    }
    Ok(())
}

fn cmd_account(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.account() {
        Some(account) => output::info(format!("Connected: {}", account)),
        None => {
            output::warning("Not connected");
            output::hint("Run `connect` to link the wallet.");
        }
    }
    Ok(())
}

fn cmd_wallet(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("status") => show_status(context),
        Some("mode") => set_mode(context, &args[1..]),
        Some("switch") => {
            let account = args
                .get(1)
                .ok_or_else(|| invalid("usage: wallet switch <account>"))?;
            let accounts = context.wallet.switch_account(account);
            report_change(context.session.handle_accounts_changed(&accounts));
            Ok(())
        }
        Some("disconnect") => {
            let accounts = context.wallet.disconnect();
            report_change(context.session.handle_accounts_changed(&accounts));
            Ok(())
        }
        Some("network") => {
            context.session.handle_chain_changed(&context.store);
            output::info(format!(
                "Network changed; reloaded {} record(s)",
                context.store().len()
            ));
            Ok(())
        }
        Some(other) => Err(invalid(format!("unknown wallet action `{}`", other))),
    }
}

fn show_status(context: &ShellContext) -> CommandResult {
    output::section("Wallet");
    let account = context
        .session
        .account()
        .unwrap_or_else(|| "not connected".to_string());
    let recipient = context
        .config
        .recipient
        .clone()
        .unwrap_or_else(|| "connected account".to_string());
    output::two_column(&[
        ("Account", account),
        ("Mode", context.wallet.mode().to_string()),
        ("Network", context.config.network.clone()),
        ("Recipient", recipient),
        ("Activity", activity(context).to_string()),
        ("Storage", storage_state(context)),
    ]);
    Ok(())
}

fn activity(context: &ShellContext) -> &'static str {
    if context.session.is_connecting() {
        "connecting"
    } else if context.session.is_submitting() {
        "submitting"
    } else {
        "idle"
    }
}

fn storage_state(context: &ShellContext) -> String {
    match context.store().persistence_status().unsaved() {
        0 => "saved".to_string(),
        unsaved => format!("{} unsaved record(s)", unsaved),
    }
}

fn set_mode(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| invalid("usage: wallet mode <auto-approve|reject|unavailable>"))?;
    let mode = WalletMode::parse(raw)
        .ok_or_else(|| invalid(format!("unknown wallet mode `{}`", raw)))?;
    context.wallet.set_mode(mode);
    context.config.wallet.mode = mode;
    context.config_manager.save(&context.config)?;
    output::success(format!("Wallet mode set to {}", mode));
    Ok(())
}

fn report_change(change: AccountChange) {
    match change {
        AccountChange::Disconnected => output::warning(change.message()),
        _ => output::info(change.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;

    #[test]
    fn status_reports_an_idle_saved_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = process_script(
            dir.path(),
            &[
                "connect",
                "add description=Rent amount=1200 category=expense date=2024-04-01",
            ],
        )
        .unwrap();
        assert_eq!(activity(&app), "idle");
        assert_eq!(storage_state(&app), "saved");
        assert!(show_status(&app).is_ok());
    }
}
