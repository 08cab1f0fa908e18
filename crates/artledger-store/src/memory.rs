//! In-memory implementation of the ChainStore trait.
//!
//! This is primarily for testing. It goes through the same codec path as the
//! durable backends but keeps the document in memory.

use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::traits::ChainStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a document.
    pub fn with_document(document: impl Into<Vec<u8>>) -> Self {
        Self {
            document: RwLock::new(Some(document.into())),
        }
    }
}

impl ChainStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        let document = self.document.read().map_err(|_| StoreError::Poisoned)?;
        Ok(document.clone())
    }

    fn write(&self, document: &[u8]) -> Result<()> {
        let mut slot = self.document.write().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(document.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChainStoreExt;
    use artledger_core::{Attestation, CoreError, HashChain, Keypair, Metadata};
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_store_loads_genesis() {
        let store = MemoryStore::new();
        assert!(store.read().unwrap().is_none());

        let chain = store.load_chain().unwrap();
        assert_eq!(chain.len(), 1);
        assert!(chain.genesis().is_genesis());
    }

    #[test]
    fn test_signed_and_unsigned_roundtrip() {
        let store = MemoryStore::new();
        let keypair = Keypair::from_secret_bytes(&[0x42; 32]).unwrap();

        let mut chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
        chain
            .append(
                "abc123",
                "alice",
                Some(Attestation::sign(&keypair, "abc123")),
                Metadata::new().with("title", "Signed"),
            )
            .unwrap();
        chain
            .append("def456", "bob", None, Metadata::new().with("title", "Unsigned"))
            .unwrap();
        store.save_chain(&chain).unwrap();

        let loaded = store.load_chain().unwrap();
        assert_eq!(loaded, chain);
        assert!(loaded.get(1).unwrap().signature_status().is_valid());
        assert!(loaded.get(2).unwrap().owner_pubkey.is_none());
    }

    #[test]
    fn test_tampered_document_still_loads() {
        let mut chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
        chain.append("abc123", "alice", None, Metadata::new()).unwrap();

        let store = MemoryStore::new();
        store.save_chain(&chain).unwrap();

        let document = String::from_utf8(store.read().unwrap().unwrap()).unwrap();
        let tampered = document.replace("\"alice\"", "\"bob\"");
        let store = MemoryStore::with_document(tampered);

        let loaded = store.load_chain().unwrap();
        assert!(!loaded.is_valid());
    }

    #[test]
    fn test_missing_required_field_fails_whole_load() {
        let store = MemoryStore::with_document(
            r#"[{"index": 0, "timestamp": "t", "owner_name": "Genesis", "metadata": {}, "previous_hash": "0", "hash": "x"}]"#,
        );
        assert!(matches!(
            store.load_chain(),
            Err(StoreError::Codec(CoreError::DecodingError(_)))
        ));
    }

    #[test]
    fn test_shared_handle() {
        let store = Arc::new(MemoryStore::new());
        let writer = Arc::clone(&store);

        let chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
        writer.save_chain(&chain).unwrap();

        assert_eq!(store.load_chain().unwrap(), chain);
    }

    #[test]
    fn test_empty_attestation_fields_reload_as_present() {
        let mut chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
        chain
            .append("abc123", "carol", Some(Attestation::new("", "")), Metadata::new())
            .unwrap();
        let store = MemoryStore::new();
        store.save_chain(&chain).unwrap();

        let loaded = store.load_chain().unwrap();
        let record = loaded.get(1).unwrap();
        assert_eq!(record.owner_pubkey.as_deref(), Some(""));
        assert_eq!(record.signature.as_deref(), Some(""));
        assert!(loaded.genesis().owner_pubkey.is_none());
        assert!(loaded.is_valid());
    }

    proptest! {
        #[test]
        fn test_numeric_metadata_survives_reload(
            price in any::<f64>().prop_filter("finite", |f| f.is_finite()),
            edition in any::<u64>(),
            delta in any::<i64>(),
        ) {
            let mut chain = HashChain::with_genesis_at("2025-01-14 12:00:00");
            chain
                .append(
                    "abc123",
                    "alice",
                    None,
                    Metadata::new()
                        .with("price", price)
                        .with("edition", edition)
                        .with("delta", delta),
                )
                .unwrap();
            let store = MemoryStore::new();
            store.save_chain(&chain).unwrap();

            let loaded = store.load_chain().unwrap();
            prop_assert_eq!(&loaded, &chain);
            prop_assert!(loaded.is_valid());
        }
    }
}
