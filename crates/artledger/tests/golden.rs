//! Golden test vectors for the canonical record encoding.
//!
//! Chains already on disk were hashed with this exact text. Every build
//! must reproduce:
//! - the canonical text (key order, separators, escapes, float spelling)
//! - the SHA-256 record hash
//! - the linkage between consecutive vectors

use artledger::core::{canonical_record_bytes, canonical_record_text, digest, validate_chain};
use artledger::{ChainStoreExt, HashChain, SignatureStatus};
use artledger::store::MemoryStore;
use artledger_testkit::vectors::{all_vectors, record_from_vector, vector_chain, verify_all_vectors};

#[test]
fn test_golden_vectors() {
    for vector in all_vectors() {
        let record = record_from_vector(&vector);

        assert_eq!(
            canonical_record_text(&record),
            vector.expected_text,
            "canonical text mismatch for '{}'",
            vector.name
        );
        assert_eq!(
            record.hash, vector.expected_hash,
            "hash mismatch for '{}'",
            vector.name
        );
        assert_eq!(digest(&canonical_record_bytes(&record)), vector.expected_hash);
    }
}

#[test]
fn test_verify_all_vectors_reports_matches() {
    let results = verify_all_vectors();
    assert_eq!(results.len(), all_vectors().len());
    for (name, matches, _) in results {
        assert!(matches, "vector '{}' does not match", name);
    }
}

#[test]
fn test_canonical_text_is_ascii() {
    for vector in all_vectors() {
        assert!(vector.expected_text.is_ascii(), "'{}' is not ASCII", vector.name);
    }
}

#[test]
fn test_vector_chain_survives_storage() {
    let records = vector_chain();
    assert!(validate_chain(&records).is_ok());

    let chain = HashChain::from_records(records).unwrap();
    let store = MemoryStore::new();
    store.save_chain(&chain).unwrap();

    let loaded = store.load_chain().unwrap();
    assert_eq!(loaded, chain);
    assert!(loaded.is_valid());
    for (record, vector) in loaded.iter().zip(all_vectors()) {
        assert_eq!(record.hash, vector.expected_hash);
        assert_eq!(record.compute_hash(), vector.expected_hash);
    }
}

#[test]
fn test_genesis_is_fixed() {
    let vectors = all_vectors();
    let chain = HashChain::with_genesis_at(vectors[0].timestamp);
    assert_eq!(chain.genesis().hash, vectors[0].expected_hash);
    assert_eq!(chain.genesis().signature_status(), SignatureStatus::Unsigned);
}
