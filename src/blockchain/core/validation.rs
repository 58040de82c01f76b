use crate::crypto::Digest;
use crate::error::ChainError;

use super::block::Block;
use super::state::Balances;

fn describe_link(digest: Option<&Digest>) -> String {
    digest.map_or_else(|| "null".to_string(), Digest::to_hex)
}

fn check_linkage(previous: &Block, block: &Block) -> Result<(), ChainError> {
    if block.previous_digest() != Some(previous.digest()) {
        return Err(ChainError::InvalidBlockLinkage {
            expected: previous.digest().to_hex(),
            actual: describe_link(block.previous_digest()),
        });
    }
    Ok(())
}

/// Guards for appending `block` after `blocks`: numbering, then linkage, then funds.
///
/// The block's own digest is not checked here.
pub fn check_append(blocks: &[Block], block: &Block) -> Result<(), ChainError> {
    let tail = blocks
        .last()
        .ok_or_else(|| ChainError::InvalidGenesis("cannot append to an empty chain".to_string()))?;

    let expected = u32::try_from(blocks.len()).unwrap_or(u32::MAX);
    if block.index() != expected {
        return Err(ChainError::InvalidBlockNumber {
            expected,
            actual: block.index(),
        });
    }

    check_linkage(tail, block)?;

    Balances::replay(blocks).check(block.amount())
}

/// Checks that `block` can open a chain.
pub fn check_genesis(block: &Block) -> Result<(), ChainError> {
    if block.index() != 0 {
        return Err(ChainError::InvalidGenesis(format!(
            "index must be 0, got {}",
            block.index()
        )));
    }
    if let Some(prev) = block.previous_digest() {
        return Err(ChainError::InvalidGenesis(format!(
            "must not link to a previous block, links to {}",
            prev
        )));
    }
    if !block.digest().is_valid() {
        return Err(ChainError::InvalidGenesis(format!(
            "digest {} does not meet the difficulty target",
            block.digest()
        )));
    }
    Ok(())
}

/// Replays the whole chain from genesis and reports the first broken rule.
///
/// Every non-genesis block must follow its predecessor's index, link to its
/// digest, carry a valid digest of its own, and keep both balances non-negative.
pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks
        .first()
        .ok_or_else(|| ChainError::InvalidGenesis("chain is empty".to_string()))?;

    let mut balances = Balances::opening(genesis.amount());
    for pair in blocks.windows(2) {
        let (previous, block) = (&pair[0], &pair[1]);

        let expected = previous.index().saturating_add(1);
        if block.index() != expected {
            return Err(ChainError::InvalidBlockNumber {
                expected,
                actual: block.index(),
            });
        }

        check_linkage(previous, block)?;

        if !block.digest().is_valid() {
            return Err(ChainError::InvalidProofOfWork {
                index: block.index(),
            });
        }

        balances.apply_checked(block.amount())?;
    }
    Ok(())
}
