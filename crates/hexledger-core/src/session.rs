//! Wallet connection state and the confirm-then-append submission flow.

use std::sync::{Arc, PoisonError, RwLock};

use hexledger_domain::{FinancialRecord, RecordDraft, ValidationErrors};

use crate::{
    encoding,
    guard::InFlight,
    ledger_store::{LedgerStore, PersistenceStatus},
    time::Clock,
    wallet::{TransactionRequest, WalletError, WalletGateway, WALLET_INSTALL_URL},
};

const ZERO_VALUE: &str = "0x0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(String),
    AlreadyConnected(String),
    /// Another connect call is still waiting on the wallet.
    Busy,
    NotInstalled { install_url: &'static str },
    Rejected,
    Pending,
    Failed(String),
}

impl ConnectOutcome {
    pub fn message(&self) -> String {
        match self {
            ConnectOutcome::Connected(_) => "Wallet connected successfully!".to_string(),
            ConnectOutcome::AlreadyConnected(account) => format!("Already connected to {}", account),
            ConnectOutcome::Busy => "A connection request is already in progress".to_string(),
            ConnectOutcome::NotInstalled { install_url } => {
                format!("No wallet is installed. Install one from {}", install_url)
            }
            ConnectOutcome::Rejected => "Connection rejected by user".to_string(),
            ConnectOutcome::Pending => "Connection request already pending".to_string(),
            ConnectOutcome::Failed(reason) => format!("Failed to connect wallet: {}", reason),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            ConnectOutcome::Connected(_) | ConnectOutcome::AlreadyConnected(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed validation; the wallet was never contacted.
    Invalid(ValidationErrors),
    NotConnected,
    /// Another submission is still waiting on the wallet.
    Busy,
    Confirmed {
        record: FinancialRecord,
        persistence: PersistenceStatus,
    },
    Rejected,
    Failed(String),
}

impl SubmitOutcome {
    pub fn message(&self) -> String {
        match self {
            SubmitOutcome::Invalid(errors) => format!("Please fix the form: {}", errors),
            SubmitOutcome::NotConnected => "Please connect your wallet first".to_string(),
            SubmitOutcome::Busy => "A transaction is already being submitted".to_string(),
            SubmitOutcome::Confirmed { .. } => "Transaction confirmed!".to_string(),
            SubmitOutcome::Rejected => "Transaction rejected by user".to_string(),
            SubmitOutcome::Failed(reason) => format!("Transaction failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountChange {
    Disconnected,
    Switched(String),
    Unchanged,
}

impl AccountChange {
    pub fn message(&self) -> String {
        match self {
            AccountChange::Disconnected => "Wallet disconnected".to_string(),
            AccountChange::Switched(account) => format!("Account switched to {}", account),
            AccountChange::Unchanged => "Account unchanged".to_string(),
        }
    }
}

/// Tracks the connected account and serialises wallet requests.
///
/// All methods take `&self`; one session is shared by every caller. At most
/// one connect and one submit are in flight at any time, and overlapping
/// calls return `Busy` without touching the wallet.
pub struct WalletSession {
    gateway: Arc<dyn WalletGateway>,
    clock: Arc<dyn Clock>,
    recipient: Option<String>,
    account: RwLock<Option<String>>,
    connecting: InFlight,
    submitting: InFlight,
}

impl WalletSession {
    pub fn new(gateway: Arc<dyn WalletGateway>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway,
            clock,
            recipient: None,
            account: RwLock::new(None),
            connecting: InFlight::new(),
            submitting: InFlight::new(),
        }
    }

    /// Sends transactions to `recipient` instead of back to the sender.
    pub fn with_recipient(mut self, recipient: Option<String>) -> Self {
        self.recipient = recipient.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn account(&self) -> Option<String> {
        self.account
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.is_busy()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    /// Adopts an account the wallet already authorised, without prompting.
    pub fn restore(&self) -> Option<String> {
        if !self.gateway.is_available() {
            return None;
        }
        match self.gateway.accounts() {
            Ok(accounts) => {
                let first = accounts.into_iter().next()?;
                tracing::info!(account = %first, "restored wallet connection");
                self.set_account(Some(first.clone()));
                Some(first)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to check existing wallet connection");
                None
            }
        }
    }

    pub fn connect(&self) -> ConnectOutcome {
        let Some(_ticket) = self.connecting.try_begin() else {
            tracing::debug!("connect ignored; request already in flight");
            return ConnectOutcome::Busy;
        };
        if let Some(account) = self.account() {
            return ConnectOutcome::AlreadyConnected(account);
        }
        if !self.gateway.is_available() {
            tracing::warn!("no wallet available");
            return ConnectOutcome::NotInstalled {
                install_url: WALLET_INSTALL_URL,
            };
        }

        let outcome = match self.gateway.request_accounts() {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    self.set_account(Some(account.clone()));
                    ConnectOutcome::Connected(account)
                }
                None => ConnectOutcome::Failed(WalletError::NoAccounts.to_string()),
            },
            Err(WalletError::UserRejected) => ConnectOutcome::Rejected,
            Err(WalletError::RequestPending) => ConnectOutcome::Pending,
            Err(WalletError::NotInstalled) => ConnectOutcome::NotInstalled {
                install_url: WALLET_INSTALL_URL,
            },
            Err(err) => ConnectOutcome::Failed(err.to_string()),
        };
        if !outcome.is_connected() {
            self.set_account(None);
        }
        tracing::info!(outcome = ?outcome, "wallet connect finished");
        outcome
    }

    /// Validates, encodes, confirms through the wallet, then appends.
    ///
    /// The store is only locked after the wallet has answered; a record that
    /// was not confirmed is never stored.
    pub fn submit(&self, store: &RwLock<LedgerStore>, draft: &RecordDraft) -> SubmitOutcome {
        let Some(_ticket) = self.submitting.try_begin() else {
            tracing::debug!("submit ignored; transaction already in flight");
            return SubmitOutcome::Busy;
        };

        let mut record = match draft.validate() {
            Ok(record) => record,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };
        let Some(from) = self.account() else {
            return SubmitOutcome::NotConnected;
        };

        let data = match encoding::encode(&record.canonical()) {
            Ok(data) => data,
            Err(err) => return SubmitOutcome::Failed(err.to_string()),
        };
        record.attach_payload(data.clone());

        let request = TransactionRequest {
            to: self.recipient.clone().unwrap_or_else(|| from.clone()),
            from,
            value: ZERO_VALUE.to_string(),
            data,
        };
        let receipt = match self.gateway.send_transaction(&request) {
            Ok(receipt) => receipt,
            Err(WalletError::UserRejected) => {
                tracing::info!("transaction rejected by user");
                return SubmitOutcome::Rejected;
            }
            Err(err) => {
                tracing::warn!(error = %err, "transaction failed");
                return SubmitOutcome::Failed(err.to_string());
            }
        };
        record.confirm(receipt.hash, receipt.block_number, self.clock.now_millis());

        let mut store = match store.write() {
            Ok(store) => store,
            Err(_) => return SubmitOutcome::Failed("ledger store lock poisoned".to_string()),
        };
        let record = store.append(record);
        SubmitOutcome::Confirmed {
            record,
            persistence: store.persistence_status().clone(),
        }
    }

    /// Applies an `accountsChanged` notification from the wallet.
    pub fn handle_accounts_changed(&self, accounts: &[String]) -> AccountChange {
        let change = match accounts.first() {
            None => {
                self.set_account(None);
                AccountChange::Disconnected
            }
            Some(first) if self.account().as_deref() != Some(first.as_str()) => {
                self.set_account(Some(first.clone()));
                AccountChange::Switched(first.clone())
            }
            Some(_) => AccountChange::Unchanged,
        };
        tracing::info!(change = ?change, "wallet accounts changed");
        change
    }

    /// Applies a network switch by reloading the durable snapshot.
    pub fn handle_chain_changed(&self, store: &RwLock<LedgerStore>) {
        tracing::info!("wallet network changed; reloading records");
        store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reload();
    }

    fn set_account(&self, account: Option<String>) {
        *self.account.write().unwrap_or_else(PoisonError::into_inner) = account;
    }
}
