use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShaleError {
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Empty chain — a ledger always holds at least its genesis block")]
    EmptyChain,

    #[error("Integrity violation at block {0}")]
    IntegrityViolation(u64),
}

pub type Result<T> = std::result::Result<T, ShaleError>;
