//! # ArtLedger Testkit
//!
//! Testing utilities for ArtLedger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known records with their expected canonical text and hash
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic owners and pre-built chains
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the canonical encoding byte for byte. A chain persisted
//! by any earlier build must keep verifying, so these must never change:
//!
//! ```rust
//! use artledger_testkit::vectors::{all_vectors, record_from_vector};
//!
//! for vector in all_vectors() {
//!     let record = record_from_vector(&vector);
//!     assert_eq!(record.hash, vector.expected_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use artledger_testkit::generators::{chain_from_params, ChainParams};
//!
//! proptest! {
//!     #[test]
//!     fn generated_chains_are_valid(params: ChainParams) {
//!         prop_assert!(chain_from_params(&params).is_valid());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use artledger_testkit::fixtures::{sample_chain, TestFixture};
//!
//! let alice = TestFixture::with_seed("alice", [0x42; 32]);
//! let chain = sample_chain(4);
//! assert!(chain.is_valid());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, sample_chain, store_with_chain, TestFixture};
pub use generators::{chain_from_params, ChainParams, RecordParams};
pub use vectors::{all_vectors, record_from_vector, vector_chain, verify_all_vectors, GoldenVector};
