//! Integration tests for building and checking a ledger

mod common;

use common::{fresh_chain, GENESIS, PAY_150, REFUND_100};
use duochain::blockchain::{Balances, Block, Blockchain, Party};
use duochain::crypto::Digest;
use duochain::error::ChainError;

#[test]
fn test_genesis_block_is_mined() {
    assert!(GENESIS.digest().is_valid());
    assert!(GENESIS.to_string().starts_with("Block 0 (Amount: 300, Nonce: "));
    assert!(GENESIS.to_string().contains("prevHash: null"));
}

#[test]
fn test_new_chain_mines_same_genesis() {
    let chain = Blockchain::new(300);
    assert_eq!(chain.size(), 1);
    assert_eq!(chain.genesis(), &*GENESIS);
    assert!(chain.validate());
}

#[test]
fn test_recreated_block_has_same_hash() {
    let recreated = Block::reconstruct(0, 300, None, GENESIS.nonce());
    assert_eq!(recreated.digest().to_hex(), GENESIS.digest().to_hex());
}

#[test]
fn test_append_one_block() -> Result<(), ChainError> {
    let mut chain = fresh_chain();
    let block = Block::reconstruct(
        chain.next_index(),
        -150,
        Some(chain.tail_digest().clone()),
        PAY_150.nonce(),
    );
    chain.append(block)?;

    assert_eq!(chain.size(), 2);
    assert!(chain.validate());
    assert_eq!(<(i64, i64)>::from(chain.compute_balances()), (150, 150));
    Ok(())
}

#[test]
fn test_append_two_blocks() -> Result<(), ChainError> {
    let mut chain = fresh_chain();
    chain.append(PAY_150.clone())?;
    chain.append(REFUND_100.clone())?;

    assert_eq!(chain.size(), 3);
    assert!(chain.validate());
    assert_eq!(chain.compute_balances(), Balances { first: 250, second: 50 });
    assert_eq!(chain.blocks().len(), 3);
    Ok(())
}

#[test]
fn test_mine_candidate_matches_fixture() {
    let chain = fresh_chain();
    let candidate = chain.mine_candidate(-150);
    assert_eq!(candidate, *PAY_150);
    // mining does not touch the chain
    assert_eq!(chain.size(), 1);
}

#[test]
fn test_overdraft_is_rejected() {
    let mut chain = fresh_chain();
    let candidate = chain.mine_candidate(-350);
    assert!(candidate.digest().is_valid());

    let result = chain.append(candidate);
    assert!(matches!(
        result,
        Err(ChainError::InsufficientFunds {
            party: Party::First,
            balance: 300,
            required: 350
        })
    ));
    assert_eq!(chain.size(), 1);
    assert_eq!(chain.tail_digest(), GENESIS.digest());
}

#[test]
fn test_rejections_do_not_mutate() {
    let mut chain = fresh_chain();
    chain.append(PAY_150.clone()).unwrap();
    let tail = chain.tail_digest().clone();

    // stale block: index 1 again
    assert!(matches!(
        chain.append(PAY_150.clone()),
        Err(ChainError::InvalidBlockNumber { expected: 2, actual: 1 })
    ));
    // right index, wrong link
    let misplaced = Block::reconstruct(2, 100, Some(GENESIS.digest().clone()), REFUND_100.nonce());
    assert!(matches!(
        chain.append(misplaced),
        Err(ChainError::InvalidBlockLinkage { .. })
    ));
    // second party only holds 150
    let greedy = Block::reconstruct(2, 151, Some(tail.clone()), 0);
    assert!(matches!(
        chain.append(greedy),
        Err(ChainError::InsufficientFunds { party: Party::Second, .. })
    ));

    assert_eq!(chain.size(), 2);
    assert_eq!(chain.tail_digest(), &tail);
    assert!(chain.validate());
}

#[test]
fn test_remove_then_reappend() {
    let mut chain = fresh_chain();
    assert!(!chain.remove_last());
    assert_eq!(chain.size(), 1);

    chain.append(PAY_150.clone()).unwrap();
    chain.append(REFUND_100.clone()).unwrap();
    assert!(chain.remove_last());
    assert_eq!(chain.size(), 2);
    assert_eq!(chain.tail_digest(), PAY_150.digest());

    chain.append(REFUND_100.clone()).unwrap();
    assert!(chain.validate());
}

#[test]
fn test_unmined_block_is_caught_by_validate_only() {
    let mut chain = fresh_chain();
    chain.append(PAY_150.clone()).unwrap();

    let bad_nonce = REFUND_100.nonce().wrapping_add(1);
    let forged = Block::reconstruct(2, 100, Some(chain.tail_digest().clone()), bad_nonce);
    if forged.digest().is_valid() {
        // the next nonce happened to hit the target as well; nothing to show
        return;
    }
    chain.append(forged).unwrap();
    assert_eq!(chain.size(), 3);
    assert!(!chain.validate());
    assert_eq!(chain.verify(), Err(ChainError::InvalidProofOfWork { index: 2 }));
}

#[test]
fn test_chain_rendering() {
    let mut chain = fresh_chain();
    chain.append(PAY_150.clone()).unwrap();
    let expected = format!(
        "{}\nBlock 1 (Amount: -150, Nonce: {}, prevHash: {}, hash: {})",
        *GENESIS,
        PAY_150.nonce(),
        GENESIS.digest(),
        PAY_150.digest()
    );
    assert_eq!(chain.to_string(), expected);
}

#[test]
fn test_digest_hex_round_trip_for_mined_blocks() {
    for block in [&*GENESIS, &*PAY_150, &*REFUND_100] {
        let parsed = Digest::from_hex(&block.digest().to_hex()).unwrap();
        assert_eq!(&parsed, block.digest());
        assert!(parsed.to_hex().starts_with("000000"));
    }
}
