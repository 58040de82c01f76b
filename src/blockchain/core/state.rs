use crate::error::ChainError;
use std::fmt;

use super::block::Block;

/// The two fixed ledger participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    First,
    Second,
}

impl Party {
    /// The party that pays for a transfer of `amount`, if any.
    pub fn payer(amount: i32) -> Option<Party> {
        match amount {
            a if a < 0 => Some(Party::First),
            a if a > 0 => Some(Party::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::First => write!(f, "first party"),
            Party::Second => write!(f, "second party"),
        }
    }
}

/// Running balances of both parties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balances {
    pub first: i64,
    pub second: i64,
}

impl Balances {
    /// Balances right after genesis: the first party holds the genesis amount.
    pub fn opening(genesis_amount: i32) -> Self {
        Balances {
            first: i64::from(genesis_amount),
            second: 0,
        }
    }

    /// Replays every transfer after the genesis block without checking funds.
    pub fn replay(blocks: &[Block]) -> Self {
        let Some((genesis, rest)) = blocks.split_first() else {
            return Balances::default();
        };
        let mut balances = Balances::opening(genesis.amount());
        for block in rest {
            balances.apply(block.amount());
        }
        balances
    }

    pub fn of(&self, party: Party) -> i64 {
        match party {
            Party::First => self.first,
            Party::Second => self.second,
        }
    }

    /// Fails if the paying party cannot cover `amount`. Zero always passes.
    pub fn check(&self, amount: i32) -> Result<(), ChainError> {
        let Some(party) = Party::payer(amount) else {
            return Ok(());
        };
        let required = i64::from(amount).abs();
        let balance = self.of(party);
        if required > balance {
            return Err(ChainError::InsufficientFunds {
                party,
                balance,
                required,
            });
        }
        Ok(())
    }

    /// Moves `|amount|` from payer to payee.
    pub fn apply(&mut self, amount: i32) {
        let transfer = i64::from(amount).abs();
        match Party::payer(amount) {
            Some(Party::First) => {
                self.first -= transfer;
                self.second += transfer;
            }
            Some(Party::Second) => {
                self.second -= transfer;
                self.first += transfer;
            }
            None => {}
        }
    }

    pub fn apply_checked(&mut self, amount: i32) -> Result<(), ChainError> {
        self.check(amount)?;
        self.apply(amount);
        Ok(())
    }
}

impl From<Balances> for (i64, i64) {
    fn from(b: Balances) -> Self {
        (b.first, b.second)
    }
}
