//! Contract for the external wallet that confirms record payloads.

use thiserror::Error;

/// Where users are sent when no wallet is available.
pub const WALLET_INSTALL_URL: &str = "https://metamask.io/download/";

/// Provider error code for a request the user declined.
pub const CODE_USER_REJECTED: i64 = 4001;
/// Provider error code for a request already awaiting the user.
pub const CODE_REQUEST_PENDING: i64 = -32002;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("wallet is not installed")]
    NotInstalled,
    #[error("request rejected by user")]
    UserRejected,
    #[error("a wallet request is already pending")]
    RequestPending,
    #[error("no accounts found")]
    NoAccounts,
    #[error("wallet provider error{}: {message}", code_suffix(.code))]
    Provider { code: Option<i64>, message: String },
}

impl WalletError {
    /// Maps a provider error code onto the wallet error taxonomy.
    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        match code {
            CODE_USER_REJECTED => WalletError::UserRejected,
            CODE_REQUEST_PENDING => WalletError::RequestPending,
            _ => WalletError::Provider {
                code: Some(code),
                message: message.into(),
            },
        }
    }
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|code| format!(" {}", code)).unwrap_or_default()
}

/// A zero-value transaction carrying an encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    /// Hex quantity; always `0x0` for record submissions.
    pub value: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: String,
    pub block_number: Option<u64>,
}

/// An account-holding signer. Implemented outside the core.
pub trait WalletGateway: Send + Sync {
    fn is_available(&self) -> bool;

    /// Accounts already authorised for this application. Never prompts.
    fn accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Asks the user to authorise accounts.
    fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Blocks until the transaction is confirmed or refused.
    fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionReceipt, WalletError>;
}
