//! ChainStore trait: the abstract interface for chain persistence.
//!
//! Backends only move an opaque document in and out. Encoding, decoding and
//! the absent-storage fallback live in [`ChainStoreExt`], so every backend
//! shares one codec path.

use std::sync::Arc;

use artledger_core::{deserialize_chain, serialize_chain, HashChain};

use crate::error::Result;

/// Storage for one serialized chain document.
///
/// Implementations must make [`ChainStore::write`] all-or-nothing: a reader
/// sees either the previous document or the new one, never a mix.
pub trait ChainStore: Send + Sync {
    /// Read the persisted document, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the persisted document.
    fn write(&self, document: &[u8]) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

impl<S: ChainStore + ?Sized> ChainStore for Arc<S> {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&self, document: &[u8]) -> Result<()> {
        (**self).write(document)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

impl<S: ChainStore + ?Sized> ChainStore for Box<S> {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&self, document: &[u8]) -> Result<()> {
        (**self).write(document)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Extension trait for loading and saving whole chains.
pub trait ChainStoreExt: ChainStore {
    /// Load the persisted chain.
    ///
    /// Absent storage yields a fresh genesis-only chain, which is not
    /// written back until the first save. Integrity is not checked here.
    fn load_chain(&self) -> Result<HashChain>;

    /// Serialize and persist the whole chain.
    fn save_chain(&self, chain: &HashChain) -> Result<()>;
}

impl<S: ChainStore + ?Sized> ChainStoreExt for S {
    fn load_chain(&self) -> Result<HashChain> {
        let Some(document) = self.read()? else {
            tracing::debug!(location = %self.location(), "no persisted chain, starting from genesis");
            return Ok(HashChain::new());
        };

        let records = deserialize_chain(&document)?;
        let chain = HashChain::from_records(records)?;

        tracing::debug!(
            location = %self.location(),
            records = chain.len(),
            bytes = document.len(),
            "loaded chain"
        );
        Ok(chain)
    }

    fn save_chain(&self, chain: &HashChain) -> Result<()> {
        let document = serialize_chain(chain.records())?;
        self.write(&document)?;

        tracing::debug!(
            location = %self.location(),
            records = chain.len(),
            bytes = document.len(),
            "saved chain"
        );
        Ok(())
    }
}
