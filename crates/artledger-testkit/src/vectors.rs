//! Golden test vectors for deterministic verification.
//!
//! Each vector fixes a record's canonical text and hash. The three vectors
//! link into a valid chain: genesis, a minimal unsigned record, and a record
//! exercising unicode escapes, nested metadata and float spelling.

use artledger_core::{canonical_record_text, Attestation, Metadata, Record, RecordBuilder};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub index: u64,
    pub timestamp: &'static str,
    pub content_hash: &'static str,
    pub owner_name: &'static str,
    /// `(owner_pubkey, signature)`, stored verbatim.
    pub attestation: Option<(&'static str, &'static str)>,
    /// Metadata as JSON.
    pub metadata_json: &'static str,
    pub previous_hash: &'static str,
    pub nonce: u64,
    /// Expected canonical text.
    pub expected_text: &'static str,
    /// Expected record hash (hex).
    pub expected_hash: &'static str,
}

/// Get all golden test vectors, in chain order.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis",
            index: 0,
            timestamp: "2025-01-14 12:00:00",
            content_hash: "0",
            owner_name: "Genesis",
            attestation: None,
            metadata_json: r#"{"title": "Genesis Block"}"#,
            previous_hash: "0",
            nonce: 0,
            expected_text: r#"{"content_hash": "0", "index": 0, "metadata": {"title": "Genesis Block"}, "nonce": 0, "owner_name": "Genesis", "owner_pubkey": null, "previous_hash": "0", "signature": null, "timestamp": "2025-01-14 12:00:00"}"#,
            expected_hash: "cae781700f8464898cefc18d213881b2ac43843ab38c8f6d8033fc4656d35a3f",
        },
        GoldenVector {
            name: "unsigned record with microsecond timestamp",
            index: 1,
            timestamp: "2025-01-14 12:05:30.123456",
            content_hash: "abc123",
            owner_name: "alice",
            attestation: None,
            metadata_json: r#"{"title": "Sunset"}"#,
            previous_hash: "cae781700f8464898cefc18d213881b2ac43843ab38c8f6d8033fc4656d35a3f",
            nonce: 0,
            expected_text: r#"{"content_hash": "abc123", "index": 1, "metadata": {"title": "Sunset"}, "nonce": 0, "owner_name": "alice", "owner_pubkey": null, "previous_hash": "cae781700f8464898cefc18d213881b2ac43843ab38c8f6d8033fc4656d35a3f", "signature": null, "timestamp": "2025-01-14 12:05:30.123456"}"#,
            expected_hash: "83d712aa66e3f1271ec9c0caca3efaaf9ae7872eb2d086e68aca7121d3c73bc5",
        },
        GoldenVector {
            name: "unicode, nested metadata and floats",
            index: 2,
            timestamp: "2025-01-14 12:07:00.000001",
            content_hash: "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
            owner_name: "Zo\u{eb} \u{1f3a8}",
            attestation: Some((
                "02abababababababababababababababababababababababababababababababab",
                "c2lnbmF0dXJl",
            )),
            metadata_json: r#"{"title": "Café \"Noir\"", "zeta": {"b": 2, "a": [1, 2.5, true]}, "category": "Art", "rating": 4.75, "big": 1e16, "tiny": 0.00001, "whole": 3.0, "tab": "a\tb\u007f"}"#,
            previous_hash: "83d712aa66e3f1271ec9c0caca3efaaf9ae7872eb2d086e68aca7121d3c73bc5",
            nonce: 7,
            expected_text: r#"{"content_hash": "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9", "index": 2, "metadata": {"big": 1e+16, "category": "Art", "rating": 4.75, "tab": "a\tb\u007f", "tiny": 1e-05, "title": "Caf\u00e9 \"Noir\"", "whole": 3.0, "zeta": {"a": [1, 2.5, true], "b": 2}}, "nonce": 7, "owner_name": "Zo\u00eb \ud83c\udfa8", "owner_pubkey": "02abababababababababababababababababababababababababababababababab", "previous_hash": "83d712aa66e3f1271ec9c0caca3efaaf9ae7872eb2d086e68aca7121d3c73bc5", "signature": "c2lnbmF0dXJl", "timestamp": "2025-01-14 12:07:00.000001"}"#,
            expected_hash: "5d7911ec0d4d0daac8642061639a3be3f767639ebfc8dca550f3cf6d2049d8d8",
        },
    ]
}

/// Parse a vector's metadata.
///
/// Panics on malformed JSON; vectors are fixed test data.
pub fn metadata_from_vector(vector: &GoldenVector) -> Metadata {
    serde_json::from_str(vector.metadata_json)
        .unwrap_or_else(|e| panic!("vector '{}' has malformed metadata: {}", vector.name, e))
}

/// Build and seal the record described by a vector.
pub fn record_from_vector(vector: &GoldenVector) -> Record {
    RecordBuilder::new(vector.index, vector.previous_hash)
        .timestamp(vector.timestamp)
        .content_hash(vector.content_hash)
        .owner(vector.owner_name)
        .attestation(
            vector
                .attestation
                .map(|(pubkey, signature)| Attestation::new(pubkey, signature)),
        )
        .metadata(metadata_from_vector(vector))
        .nonce(vector.nonce)
        .seal()
}

/// All vectors as one chain.
pub fn vector_chain() -> Vec<Record> {
    all_vectors().iter().map(record_from_vector).collect()
}

/// Check every vector's canonical text and hash.
///
/// Returns `(name, matches, computed_hash)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let record = record_from_vector(v);
            let matches =
                canonical_record_text(&record) == v.expected_text && record.hash == v.expected_hash;
            (v.name.to_string(), matches, record.hash)
        })
        .collect()
}
