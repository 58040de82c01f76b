//! Cryptographic primitives for Duochain

use crate::error::ChainError;
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Number of leading zero bytes a digest needs to count as proof of work.
pub const DIFFICULTY_PREFIX_LEN: usize = 3;

/// Length in bytes of digests produced by [`sha256`].
pub const DIGEST_LEN: usize = 32;

/// An opaque hash fingerprint.
///
/// Length is not checked on construction; callers hand in hash-function output.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Digest(bytes.into())
    }

    /// Parses lowercase or uppercase hex, two digits per byte.
    pub fn from_hex(hex_str: &str) -> Result<Self, ChainError> {
        hex::decode(hex_str)
            .map(Digest)
            .map_err(|e| ChainError::InvalidHex(format!("{}: {}", hex_str, e)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the first three bytes are zero. Shorter digests are never valid.
    pub fn is_valid(&self) -> bool {
        self.0.len() >= DIFFICULTY_PREFIX_LEN
            && self.0[..DIFFICULTY_PREFIX_LEN].iter().all(|&b| b == 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> Digest {
    let hash: [u8; DIGEST_LEN] = Sha256::digest(data).into();
    hash.into()
}
