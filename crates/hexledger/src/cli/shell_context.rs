//! Shared runtime state for CLI interactions and command execution.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};

use hexledger_config::{resolve_base_dir, Config, ConfigManager};
use hexledger_core::{Clock, LedgerStore, UsdFormatter, WalletGateway, WalletSession};
use hexledger_storage_json::JsonRecordStorage;

use crate::{errors::CliError, wallet::LocalWallet};

use super::{commands, output, registry::CommandRegistry, system_clock::SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: Arc<RwLock<LedgerStore>>,
    pub session: Arc<WalletSession>,
    pub wallet: Arc<LocalWallet>,
    pub clock: Arc<dyn Clock>,
    pub formatter: UsdFormatter,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub base_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Context rooted at `$HEXLEDGER_HOME` or `~/.hexledger`.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::from_base_dir(mode, resolve_base_dir())
    }

    pub fn from_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        Self::with_clock(mode, base_dir, Arc::new(SystemClock))
    }

    /// Loads config, opens the record snapshot and rebinds an authorised
    /// wallet account if there is one.
    pub fn with_clock(
        mode: CliMode,
        base_dir: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "config unreadable; using defaults");
                output::warning(format!("Config unreadable, using defaults: {}", err));
                Config::default()
            }
        };
        output::apply_config(&config);

        let storage = JsonRecordStorage::new(config.resolve_data_dir(&base_dir))?;
        let store = LedgerStore::open(Box::new(storage), Arc::clone(&clock));

        let wallet = Arc::new(LocalWallet::from_settings(&config.wallet));
        let session = open_session(&wallet, &clock, &config);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            store: Arc::new(RwLock::new(store)),
            session,
            wallet,
            clock,
            formatter: UsdFormatter,
            config_manager,
            config,
            base_dir,
            last_command: None,
            running: true,
        })
    }

    /// Read access to the store. A poisoned lock still yields the records.
    pub fn store(&self) -> RwLockReadGuard<'_, LedgerStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.resolve_export_dir(&self.base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Rebuilds the wallet session after settings it captured have changed.
    pub fn reopen_session(&mut self) {
        self.session = open_session(&self.wallet, &self.clock, &self.config);
    }
}

fn open_session(
    wallet: &Arc<LocalWallet>,
    clock: &Arc<dyn Clock>,
    config: &Config,
) -> Arc<WalletSession> {
    let gateway: Arc<dyn WalletGateway> = wallet.clone();
    let session =
        WalletSession::new(gateway, Arc::clone(clock)).with_recipient(config.recipient.clone());
    session.restore();
    Arc::new(session)
}
