use crate::crypto::Digest;
use crate::error::ChainError;
use std::fmt;
use tracing::{debug, info, warn};

use super::block::Block;
use super::state::Balances;
use super::validation::{check_append, check_genesis, verify_chain};

/// Append-only ledger between two parties, starting from a genesis block.
///
/// Blocks are kept in order in a `Vec`, so the block at position `i` always has index `i`.
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Blockchain {
    /// Mines a genesis block holding `initial_amount` for the first party.
    ///
    /// The amount is expected to be non-negative; callers enforce that.
    pub fn new(initial_amount: i32) -> Self {
        let genesis = Block::mine(0, initial_amount, None);
        info!(initial_amount, nonce = genesis.nonce(), "created chain");
        Blockchain {
            blocks: vec![genesis],
        }
    }

    /// Starts a chain from an already mined genesis block.
    pub fn from_genesis(genesis: Block) -> Result<Self, ChainError> {
        check_genesis(&genesis)?;
        Ok(Blockchain {
            blocks: vec![genesis],
        })
    }

    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// Index the next appended block must carry.
    pub fn next_index(&self) -> u32 {
        u32::try_from(self.blocks.len()).unwrap_or(u32::MAX)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tail(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn tail_digest(&self) -> &Digest {
        self.tail().digest()
    }

    /// Mines the block that would come next for `amount` without appending it.
    pub fn mine_candidate(&self, amount: i32) -> Block {
        Block::mine(self.next_index(), amount, Some(self.tail_digest().clone()))
    }

    /// Appends `block` if its index, link and amount fit the chain.
    ///
    /// The block's digest is trusted as given: a reconstructed block with a
    /// nonce that misses the target is accepted here and only caught by
    /// [`Blockchain::validate`]. A rejected block leaves the chain unchanged.
    pub fn append(&mut self, block: Block) -> Result<(), ChainError> {
        if let Err(e) = check_append(&self.blocks, &block) {
            warn!(index = block.index(), amount = block.amount(), "rejected block: {}", e);
            return Err(e);
        }
        info!(index = block.index(), amount = block.amount(), nonce = block.nonce(), "appended block");
        self.blocks.push(block);
        Ok(())
    }

    /// Drops the tail block. Returns false when only genesis is left.
    pub fn remove_last(&mut self) -> bool {
        if self.blocks.len() <= 1 {
            return false;
        }
        if let Some(removed) = self.blocks.pop() {
            info!(index = removed.index(), "removed block");
        }
        true
    }

    /// Full replay from genesis; see [`verify_chain`].
    pub fn verify(&self) -> Result<(), ChainError> {
        verify_chain(&self.blocks)
    }

    pub fn validate(&self) -> bool {
        match self.verify() {
            Ok(()) => true,
            Err(e) => {
                debug!("chain failed validation: {}", e);
                false
            }
        }
    }

    pub fn compute_balances(&self) -> Balances {
        Balances::replay(&self.blocks)
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}
