//! Duochain - a two-party proof-of-work ledger
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the chain, balance replay and validation rules
//!
//! ## Cryptography
//! - [`crypto`] - Digests and SHA-256 hashing
//!
//! ## Consensus & Mining
//! - [`miner`] - Parallel and background proof-of-work search
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Interactive command shell

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;

pub use blockchain::{Balances, Block, Blockchain, Party};
pub use crypto::Digest;
pub use error::{ChainError, Result};
