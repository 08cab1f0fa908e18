//! Error types for the Ledger.

use artledger_core::{CoreError, VerificationFailure};
use artledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Record could not be built (e.g. unencodable metadata).
    #[error("record error: {0}")]
    Core(#[from] CoreError),

    /// Storage error. The in-memory chain is unaffected.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The attestation on a mint request does not verify.
    #[error("attestation rejected: {0}")]
    Signature(#[from] VerificationFailure),
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
