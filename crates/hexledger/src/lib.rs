//! hexledger records financial entries whose payloads are confirmed by an
//! external wallet, and reports on them through an interactive shell.

pub mod cli;
pub mod errors;
pub mod export;
pub mod utils;
pub mod wallet;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = utils::build_info::CLI_VERSION, "hexledger starting");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
