//! hexledger-core
//!
//! Ledger store, aggregation, payload encoding, exports and the wallet session.
//! Depends on hexledger-domain. No CLI, no terminal I/O; durable storage is
//! injected through [`storage::RecordStorage`].

pub mod category_style;
pub mod encoding;
pub mod error;
pub mod export_service;
pub mod format;
pub mod guard;
pub mod history;
pub mod ledger_store;
pub mod session;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod wallet;

pub use category_style::*;
pub use error::CoreError;
pub use export_service::*;
pub use format::*;
pub use guard::*;
pub use history::*;
pub use ledger_store::*;
pub use session::*;
pub use storage::{MemoryStorage, RecordStorage};
pub use summary_service::*;
pub use time::*;
pub use wallet::*;
