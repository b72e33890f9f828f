use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv row {row}: {reason}")]
    CsvRow { row: usize, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
