//! Error types for the ArtLedger core.

use thiserror::Error;

/// Core errors that can occur while building, encoding or decoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("unsupported metadata value at {0}")]
    UnsupportedMetadata(String),

    #[error("chain has no genesis record")]
    EmptyChain,

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// A signature did not verify.
///
/// Malformed encodings, keys on the wrong curve and genuine mismatches all
/// produce this same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("signature verification failed")]
pub struct VerificationFailure;

/// The first integrity failure found while scanning a chain.
///
/// `position` is the record's offset in the chain, not its stored `index`
/// field, since the latter may itself have been tampered with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("record at position {position} hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch {
        position: usize,
        stored: String,
        computed: String,
    },

    #[error("record at position {position} has previous_hash {found}, expected {expected}")]
    BrokenLink {
        position: usize,
        expected: String,
        found: String,
    },
}

impl IntegrityViolation {
    /// Position of the offending record.
    pub fn position(&self) -> usize {
        match self {
            IntegrityViolation::HashMismatch { position, .. }
            | IntegrityViolation::BrokenLink { position, .. } => *position,
        }
    }
}
