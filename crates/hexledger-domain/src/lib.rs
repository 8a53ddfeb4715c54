//! hexledger-domain
//!
//! Pure domain models (Category, Amount, FinancialRecord, RecordDraft, periods).
//! No I/O, no CLI, no storage. Only data types, parsing and validation.

pub mod amount;
pub mod category;
pub mod draft;
pub mod period;
pub mod record;

pub use amount::*;
pub use category::*;
pub use draft::*;
pub use period::*;
pub use record::*;
