use crate::crypto::{sha256, Digest};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// One transfer between the two parties, sealed with a proof-of-work nonce.
///
/// A negative `amount` moves `|amount|` from the first party to the second,
/// a positive one moves it from the second party to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    index: u32,
    amount: i32,
    previous_digest: Option<Digest>,
    nonce: u64,
    digest: Digest,
}

impl Block {
    /// Searches nonces upward from zero until the digest is valid.
    ///
    /// Blocks the caller until a nonce is found; there is no way to interrupt it.
    /// Use [`crate::miner::Miner::spawn`] to mine off the calling thread.
    pub fn mine(index: u32, amount: i32, previous_digest: Option<Digest>) -> Self {
        let started = Instant::now();
        let mut nonce: u64 = 0;
        loop {
            let digest = Self::compute_digest(index, amount, previous_digest.as_ref(), nonce);
            if digest.is_valid() {
                debug!(
                    index,
                    amount,
                    nonce,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "mined block"
                );
                return Block {
                    index,
                    amount,
                    previous_digest,
                    nonce,
                    digest,
                };
            }
            nonce = nonce.wrapping_add(1);
        }
    }

    /// Rebuilds a block from a known nonce. The digest is computed once and
    /// not checked for validity; the chain decides what to do with it.
    pub fn reconstruct(index: u32, amount: i32, previous_digest: Option<Digest>, nonce: u64) -> Self {
        let digest = Self::compute_digest(index, amount, previous_digest.as_ref(), nonce);
        Block {
            index,
            amount,
            previous_digest,
            nonce,
            digest,
        }
    }

    /// Canonical hash input: big-endian u32 index, big-endian i32 amount,
    /// the raw previous digest when present, then the big-endian u64 nonce.
    pub fn digest_input(
        index: u32,
        amount: i32,
        previous_digest: Option<&Digest>,
        nonce: u64,
    ) -> Vec<u8> {
        let prev_len = previous_digest.map_or(0, Digest::len);
        let mut bytes = Vec::with_capacity(4 + 4 + prev_len + 8);
        bytes.extend_from_slice(&index.to_be_bytes());
        bytes.extend_from_slice(&amount.to_be_bytes());
        if let Some(prev) = previous_digest {
            bytes.extend_from_slice(prev.as_bytes());
        }
        bytes.extend_from_slice(&nonce.to_be_bytes());
        bytes
    }

    pub fn compute_digest(
        index: u32,
        amount: i32,
        previous_digest: Option<&Digest>,
        nonce: u64,
    ) -> Digest {
        sha256(&Self::digest_input(index, amount, previous_digest, nonce))
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn previous_digest(&self) -> Option<&Digest> {
        self.previous_digest.as_ref()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_digest.is_none()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prev = self
            .previous_digest
            .as_ref()
            .map_or_else(|| "null".to_string(), Digest::to_hex);
        write!(
            f,
            "Block {} (Amount: {}, Nonce: {}, prevHash: {}, hash: {})",
            self.index, self.amount, self.nonce, prev, self.digest
        )
    }
}
