//! # ArtLedger Core
//!
//! Pure primitives for ArtLedger: records, the hash chain, canonical encoding
//! and secp256k1 owner identities.
//!
//! This crate contains no storage and no networking. It is pure computation
//! over an in-memory chain of records.
//!
//! ## Key Types
//!
//! - [`Record`] - One minted artifact: content digest, owner, optional signature
//! - [`HashChain`] - The append-only, hash-linked sequence of records
//! - [`Keypair`] / [`OwnerKey`] - secp256k1 signing and verifying keys
//! - [`Attestation`] - The `(owner_pubkey, signature)` pair bound to a record
//! - [`Metadata`] - Closed-set key/value data carried by a record
//!
//! ## Canonicalization
//!
//! Record hashes are SHA-256 over a sorted-key JSON text. See [`canonical`].

pub mod canonical;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod record;
pub mod types;
pub mod validation;

pub use canonical::{
    canonical_record_bytes, canonical_record_text, deserialize_chain, digest, record_hash,
    serialize_chain,
};
pub use chain::{format_timestamp, now_timestamp, HashChain, GENESIS_OWNER, GENESIS_TITLE, ZERO_HASH};
pub use crypto::{
    generate_keypair, sign, verify, verify_signature, Attestation, Keypair, OwnerKey, Sha256Hash,
};
pub use error::{CoreError, IntegrityViolation, Result, VerificationFailure};
pub use record::{Record, RecordBuilder, SignatureStatus};
pub use types::{Metadata, MetadataValue};
pub use validation::{validate_chain, validate_link};
