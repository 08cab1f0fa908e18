//! # ArtLedger
//!
//! A tamper-evident, append-only provenance chain for digital artifacts.
//!
//! ## Overview
//!
//! Each minted artifact becomes a record binding the SHA-256 digest of its
//! bytes to an owner label, optionally signed with a secp256k1 key. Records
//! are hash-linked, so rewriting any of them is detectable.
//!
//! - **Records**: Immutable once appended. Never edited, never removed.
//! - **Chain**: Starts at a fixed genesis record; each record names its predecessor's hash.
//! - **Attestations**: Optional `(owner_pubkey, signature)` over the content digest.
//! - **Storage**: The whole chain is rewritten atomically after every mint.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use artledger::{Keypair, Ledger, LedgerConfig, MintRequest};
//! use artledger::store::FileStore;
//!
//! let store = FileStore::new("artledger_chain.json");
//! let mut ledger = Ledger::open(store, LedgerConfig::default()).unwrap();
//!
//! let keypair = Keypair::generate();
//! let artwork = std::fs::read("sunset.png").unwrap();
//!
//! ledger
//!     .mint(
//!         MintRequest::for_artifact(artwork.clone(), "alice")
//!             .signed_by(&keypair)
//!             .title("Sunset"),
//!     )
//!     .unwrap();
//!
//! for found in ledger.verify_artifact(&artwork) {
//!     println!("#{} by {}: {:?}", found.record.index, found.record.owner_name, found.signature);
//! }
//! assert!(ledger.is_valid());
//! ```
//!
//! ## Re-exports
//!
//! - `artledger::core` - Records, chain, canonical encoding, keys
//! - `artledger::store` - Storage backends

pub mod error;
pub mod ledger;

// Re-export component crates
pub use artledger_core as core;
pub use artledger_store as store;

// Re-export main types for convenience
pub use error::{LedgerError, Result};
pub use ledger::{Ledger, LedgerConfig, MintRequest, Provenance};

// Re-export commonly used core types
pub use artledger_core::{
    digest, Attestation, HashChain, IntegrityViolation, Keypair, Metadata, MetadataValue,
    OwnerKey, Record, SignatureStatus,
};
pub use artledger_store::{ChainStore, ChainStoreExt};
