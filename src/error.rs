//! Error types for Duochain

use crate::blockchain::Party;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Block number is incorrect: expected {expected}, got {actual}")]
    InvalidBlockNumber { expected: u32, actual: u32 },
    #[error("Previous hash does not match: expected {expected}, got {actual}")]
    InvalidBlockLinkage { expected: String, actual: String },
    #[error("Insufficient funds for {party}: balance {balance}, required {required}")]
    InsufficientFunds {
        party: Party,
        balance: i64,
        required: i64,
    },
    #[error("Invalid proof of work in block {index}")]
    InvalidProofOfWork { index: u32 },
    #[error("Invalid genesis block: {0}")]
    InvalidGenesis(String),
    #[error("Invalid hex digest: {0}")]
    InvalidHex(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Miner error: {0}")]
    Miner(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
