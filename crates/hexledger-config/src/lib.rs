//! hexledger-config
//!
//! Persistent user preferences: locale, export labels, wallet behaviour and
//! directory overrides. Owns the Config data structure plus disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{BackupEntry, ConfigManager};
pub use model::{resolve_base_dir, Config, WalletMode, WalletSettings, HOME_ENV};
