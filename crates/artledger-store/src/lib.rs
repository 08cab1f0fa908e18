//! # ArtLedger Store
//!
//! Storage abstraction for ArtLedger. The whole chain is persisted as one
//! serialized document that is rewritten atomically on every save.
//!
//! ## Key Types
//!
//! - [`ChainStore`] - Read and replace the persisted chain document
//! - [`ChainStoreExt`] - `load_chain` / `save_chain` on top of any store
//! - [`FileStore`] - JSON file on disk, replaced by atomic rename
//! - [`SqliteStore`] - Single-row document table in SQLite
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use artledger_store::{ChainStoreExt, FileStore};
//!
//! let store = FileStore::new("artledger_chain.json");
//!
//! // Absent storage yields a fresh genesis-only chain
//! let mut chain = store.load_chain().unwrap();
//! chain
//!     .append("abc123", "alice", None, Default::default())
//!     .unwrap();
//! store.save_chain(&chain).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-document writes**: a save replaces everything or nothing
//! - **No integrity checks on load**: a tampered chain loads fine and is
//!   reported by `HashChain::validate`
//! - **Malformed documents fail**: a record missing a required field, or an
//!   empty array, fails the whole load

pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ChainStore, ChainStoreExt};
