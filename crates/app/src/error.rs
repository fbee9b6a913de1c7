use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Ledger(#[from] ledger::LedgerError),
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl From<ledger::CredentialError> for AppError {
    fn from(err: ledger::CredentialError) -> Self {
        AppError::Ledger(err.into())
    }
}
