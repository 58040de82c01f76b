//! Mined fixtures shared across integration tests.
//!
//! Each block costs millions of hashes, so they are mined once per test binary.

#![allow(dead_code)]

use duochain::blockchain::{Block, Blockchain};
use once_cell::sync::Lazy;

/// Genesis holding 300 for the first party.
pub static GENESIS: Lazy<Block> = Lazy::new(|| Block::mine(0, 300, None));

/// First party pays 150.
pub static PAY_150: Lazy<Block> =
    Lazy::new(|| Block::mine(1, -150, Some(GENESIS.digest().clone())));

/// Second party pays 100 back.
pub static REFUND_100: Lazy<Block> =
    Lazy::new(|| Block::mine(2, 100, Some(PAY_150.digest().clone())));

pub fn fresh_chain() -> Blockchain {
    Blockchain::from_genesis(GENESIS.clone()).expect("mined genesis is valid")
}
