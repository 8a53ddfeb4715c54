use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    env, fmt,
    path::{Path, PathBuf},
};

/// Environment variable that overrides the base directory.
pub const HOME_ENV: &str = "HEXLEDGER_HOME";

/// Stores user-configurable preferences for the ledger shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Name stamped into exports and their file names.
    #[serde(default = "Config::default_application")]
    pub application: String,
    #[serde(default = "Config::default_network")]
    pub network: String,
    #[serde(default = "Config::default_explorer_tx_url")]
    pub explorer_tx_url: String,
    /// Transaction recipient. Defaults to the connected account itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the record snapshot. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for exports. Defaults to `<base>/exports`.
    pub export_dir: Option<PathBuf>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub wallet: WalletSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            application: Self::default_application(),
            network: Self::default_network(),
            explorer_tx_url: Self::default_explorer_tx_url(),
            recipient: None,
            data_dir: None,
            export_dir: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            wallet: WalletSettings::default(),
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_application() -> String {
        "HEXLEDGER".into()
    }

    pub fn default_network() -> String {
        "Ethereum Sepolia Testnet".into()
    }

    pub fn default_explorer_tx_url() -> String {
        "https://sepolia.etherscan.io/tx/".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Record snapshot directory: the override, else `<base>/data`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    pub fn resolve_export_dir(&self, base: &Path) -> PathBuf {
        match &self.export_dir {
            Some(path) => path.clone(),
            None => base.join("exports"),
        }
    }

    /// Block explorer link for a transaction hash.
    pub fn explorer_link(&self, hash: &str) -> String {
        format!("{}{}", self.explorer_tx_url, hash)
    }
}

/// `$HEXLEDGER_HOME` when set, otherwise `~/.hexledger`.
pub fn resolve_base_dir() -> PathBuf {
    if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hexledger")
}

/// Behaviour of the local wallet used by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSettings {
    #[serde(default)]
    pub mode: WalletMode,
    #[serde(default = "WalletSettings::default_account")]
    pub account: String,
    #[serde(default = "WalletSettings::default_first_block")]
    pub first_block: u64,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            mode: WalletMode::default(),
            account: Self::default_account(),
            first_block: Self::default_first_block(),
        }
    }
}

impl WalletSettings {
    pub fn default_account() -> String {
        "0x5aeda56215b167893e80b4fe645ba6d5bab767de".into()
    }

    pub fn default_first_block() -> u64 {
        5_000_000
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletMode {
    /// Every request is approved.
    AutoApprove,
    /// Every request is declined as if by the user.
    Reject,
    /// Behaves as if no wallet is installed.
    Unavailable,
}

impl WalletMode {
    fn from_value(value: Option<String>) -> Self {
        value
            .and_then(|v| WalletMode::parse(v.trim()))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto-approve" | "approve" => Some(WalletMode::AutoApprove),
            "reject" => Some(WalletMode::Reject),
            "unavailable" | "none" => Some(WalletMode::Unavailable),
            _ => None,
        }
    }
}

impl Default for WalletMode {
    fn default() -> Self {
        WalletMode::AutoApprove
    }
}

impl fmt::Display for WalletMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WalletMode::AutoApprove => "auto-approve",
            WalletMode::Reject => "reject",
            WalletMode::Unavailable => "unavailable",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for WalletMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(WalletMode::from_value(value))
    }
}
