use hexledger_config::ConfigError;
use hexledger_core::CoreError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures that end a shell session or abort a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
}
