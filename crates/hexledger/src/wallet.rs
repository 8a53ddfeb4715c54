//! In-process wallet for running the shell without a browser extension.
//!
//! It answers the gateway contract from configured settings: it holds one
//! account, approves or declines requests according to its mode, and mints
//! random transaction ids in increasing blocks. Nothing is signed and nothing
//! leaves the process.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hexledger_config::{WalletMode, WalletSettings};
use hexledger_core::{TransactionReceipt, TransactionRequest, WalletError, WalletGateway};
use uuid::Uuid;

#[derive(Debug)]
struct LocalWalletState {
    mode: WalletMode,
    account: String,
    authorized: bool,
    next_block: u64,
}

#[derive(Debug)]
pub struct LocalWallet {
    state: Mutex<LocalWalletState>,
}

impl LocalWallet {
    pub fn from_settings(settings: &WalletSettings) -> Self {
        Self {
            state: Mutex::new(LocalWalletState {
                mode: settings.mode,
                account: settings.account.to_lowercase(),
                authorized: false,
                next_block: settings.first_block,
            }),
        }
    }

    pub fn mode(&self) -> WalletMode {
        self.state().mode
    }

    pub fn set_mode(&self, mode: WalletMode) {
        self.state().mode = mode;
    }

    pub fn account(&self) -> String {
        self.state().account.clone()
    }

    /// Selects a different account; returns the `accountsChanged` payload.
    pub fn switch_account(&self, account: &str) -> Vec<String> {
        let mut state = self.state();
        state.account = account.trim().to_lowercase();
        state.authorized = true;
        vec![state.account.clone()]
    }

    /// Revokes the authorisation; returns the empty `accountsChanged` payload.
    pub fn disconnect(&self) -> Vec<String> {
        self.state().authorized = false;
        Vec::new()
    }

    fn state(&self) -> MutexGuard<'_, LocalWalletState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WalletGateway for LocalWallet {
    fn is_available(&self) -> bool {
        self.state().mode != WalletMode::Unavailable
    }

    fn accounts(&self) -> Result<Vec<String>, WalletError> {
        let state = self.state();
        match state.mode {
            WalletMode::Unavailable => Err(WalletError::NotInstalled),
            _ if state.authorized => Ok(vec![state.account.clone()]),
            _ => Ok(Vec::new()),
        }
    }

    fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let mut state = self.state();
        match state.mode {
            WalletMode::Unavailable => Err(WalletError::NotInstalled),
            WalletMode::Reject => Err(WalletError::from_code(4001, "User rejected the request.")),
            WalletMode::AutoApprove => {
                state.authorized = true;
                Ok(vec![state.account.clone()])
            }
        }
    }

    fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionReceipt, WalletError> {
        let mut state = self.state();
        match state.mode {
            WalletMode::Unavailable => return Err(WalletError::NotInstalled),
            WalletMode::Reject => {
                return Err(WalletError::from_code(4001, "User denied transaction signature."))
            }
            WalletMode::AutoApprove => {}
        }
        if !state.authorized || !request.from.eq_ignore_ascii_case(&state.account) {
            return Err(WalletError::Provider {
                code: Some(4100),
                message: format!("account {} is not authorized", request.from),
            });
        }
        let block_number = state.next_block;
        state.next_block += 1;
        let hash = format!(
            "0x{:032x}{:032x}",
            Uuid::new_v4().as_u128(),
            Uuid::new_v4().as_u128()
        );
        tracing::debug!(%hash, block_number, to = %request.to, "local wallet confirmed transaction");
        Ok(TransactionReceipt {
            hash,
            block_number: Some(block_number),
        })
    }
}
