//! The append-only hash chain.
//!
//! A [`HashChain`] always starts with a genesis record. Each appended record
//! carries the hash of its predecessor, so rewriting any record changes
//! every hash after it.

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::crypto::Attestation;
use crate::error::{CoreError, IntegrityViolation, Result};
use crate::record::{Record, RecordBuilder, SignatureStatus};
use crate::types::Metadata;
use crate::validation::validate_chain;

/// Owner label of the genesis record.
pub const GENESIS_OWNER: &str = "Genesis";

/// Title stored in the genesis record's metadata.
pub const GENESIS_TITLE: &str = "Genesis Block";

/// Placeholder digest and predecessor hash of the genesis record.
pub const ZERO_HASH: &str = "0";

/// The current local time in record timestamp form.
pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Format an instant as `YYYY-MM-DD HH:MM:SS[.ffffff]`.
///
/// The fractional part is omitted when the microsecond component is zero.
pub fn format_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let seconds = instant.format("%Y-%m-%d %H:%M:%S");
    // Leap seconds report nanoseconds past 1e9
    let micros = (instant.nanosecond() / 1_000) % 1_000_000;
    if micros == 0 {
        seconds.to_string()
    } else {
        format!("{seconds}.{micros:06}")
    }
}

/// An ordered, hash-linked sequence of records.
#[derive(Debug, Clone, PartialEq)]
pub struct HashChain {
    records: Vec<Record>,
}

impl HashChain {
    /// Create a chain holding only a genesis record stamped now.
    pub fn new() -> Self {
        Self::with_genesis_at(now_timestamp())
    }

    /// Create a chain whose genesis record carries the given timestamp.
    pub fn with_genesis_at(timestamp: impl Into<String>) -> Self {
        let genesis = RecordBuilder::new(0, ZERO_HASH)
            .timestamp(timestamp)
            .content_hash(ZERO_HASH)
            .owner(GENESIS_OWNER)
            .metadata(Metadata::new().with("title", GENESIS_TITLE))
            .seal();

        Self {
            records: vec![genesis],
        }
    }

    /// Rebuild a chain from persisted records.
    ///
    /// The records are taken as-is; call [`HashChain::validate`] to check
    /// them. Fails only if there is no genesis record at all.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(CoreError::EmptyChain);
        }
        Ok(Self { records })
    }

    /// Append a record stamped with the current local time.
    pub fn append(
        &mut self,
        content_hash: impl Into<String>,
        owner_name: impl Into<String>,
        attestation: Option<Attestation>,
        metadata: Metadata,
    ) -> Result<&Record> {
        self.append_at(now_timestamp(), content_hash, owner_name, attestation, metadata)
    }

    /// Append a record with a caller-supplied timestamp.
    ///
    /// Neither the digest format nor the attestation is checked. Metadata
    /// holding a non-finite float is rejected, since it has no canonical
    /// encoding.
    pub fn append_at(
        &mut self,
        timestamp: impl Into<String>,
        content_hash: impl Into<String>,
        owner_name: impl Into<String>,
        attestation: Option<Attestation>,
        metadata: Metadata,
    ) -> Result<&Record> {
        metadata.check_encodable()?;

        let record = RecordBuilder::new(self.records.len() as u64, self.head().hash.clone())
            .timestamp(timestamp)
            .content_hash(content_hash)
            .owner(owner_name)
            .attestation(attestation)
            .metadata(metadata)
            .seal();

        self.records.push(record);
        Ok(self.head())
    }

    /// Whether every record hashes correctly and links to its predecessor.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Like [`HashChain::is_valid`], but names the first failure.
    pub fn validate(&self) -> std::result::Result<(), IntegrityViolation> {
        validate_chain(&self.records)
    }

    /// Records minted with the given content digest, in chain order.
    pub fn find_by_content_hash<'a: 'h, 'h>(
        &'a self,
        content_hash: &'h str,
    ) -> impl Iterator<Item = &'a Record> + 'h {
        self.records
            .iter()
            .filter(move |r| r.content_hash == content_hash)
    }

    /// Records minted under the given owner label, in chain order.
    pub fn find_by_owner<'a>(&'a self, owner_name: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |r| r.owner_name == owner_name)
    }

    /// Signature status of every record, in chain order.
    pub fn verify_signatures(&self) -> impl Iterator<Item = (&Record, SignatureStatus)> {
        self.records.iter().map(|r| (r, r.signature_status()))
    }

    /// The genesis record.
    pub fn genesis(&self) -> &Record {
        &self.records[0]
    }

    /// The most recently appended record.
    pub fn head(&self) -> &Record {
        &self.records[self.records.len() - 1]
    }

    /// Number of records, genesis included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// All records in chain order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate records in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Every record after genesis.
    pub fn minted(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().skip(1)
    }

    /// Consume the chain, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl Default for HashChain {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a HashChain {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::digest;
    use crate::crypto::Keypair;
    use chrono::NaiveDate;

    const TS: &str = "2025-01-14 12:00:00";

    fn art(title: &str) -> Metadata {
        Metadata::new().with("title", title)
    }

    #[test]
    fn test_genesis_invariant() {
        let chain = HashChain::with_genesis_at(TS);
        let genesis = chain.genesis();

        assert_eq!(chain.len(), 1);
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.owner_name, GENESIS_OWNER);
        assert_eq!(genesis.content_hash, ZERO_HASH);
        assert_eq!(genesis.previous_hash, ZERO_HASH);
        assert_eq!(genesis.title(), Some(GENESIS_TITLE));
        assert_eq!(genesis.nonce, 0);
        assert!(!genesis.is_signed());
        assert!(chain.is_valid());
        assert_eq!(chain.minted().count(), 0);
    }

    #[test]
    fn test_append_links_records() {
        let mut chain = HashChain::with_genesis_at(TS);
        for i in 0..5 {
            chain
                .append(digest(format!("art {i}").as_bytes()), "alice", None, art("x"))
                .unwrap();
        }

        assert_eq!(chain.len(), 6);
        for (i, pair) in chain.records().windows(2).enumerate() {
            assert_eq!(pair[1].index, i as u64 + 1);
            assert_eq!(pair[1].previous_hash, pair[0].hash);
            assert_eq!(pair[1].hash, pair[1].compute_hash());
        }
        assert!(chain.is_valid());
    }

    #[test]
    fn test_append_returns_head() {
        let mut chain = HashChain::with_genesis_at(TS);
        let hash = chain
            .append_at("2025-01-14 12:05:30.123456", "abc123", "alice", None, art("Sunset"))
            .unwrap()
            .hash
            .clone();
        assert_eq!(chain.head().hash, hash);
        assert_eq!(chain.head().timestamp, "2025-01-14 12:05:30.123456");
    }

    #[test]
    fn test_append_rejects_non_finite_metadata() {
        let mut chain = HashChain::with_genesis_at(TS);
        let result = chain.append("abc123", "alice", None, art("x").with("score", f64::INFINITY));

        assert!(matches!(result, Err(CoreError::UnsupportedMetadata(_))));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_append_does_not_check_attestation() {
        let mut chain = HashChain::with_genesis_at(TS);
        let bogus = Attestation::new("not-a-key", "not-a-signature");
        let record = chain.append("abc123", "alice", Some(bogus), art("x")).unwrap();

        assert_eq!(record.signature_status(), SignatureStatus::Invalid);
        assert!(chain.is_valid());
    }

    #[test]
    fn test_tamper_detection() {
        let mut chain = HashChain::with_genesis_at(TS);
        chain.append("aaa", "alice", None, art("one")).unwrap();
        chain.append("bbb", "alice", None, art("two")).unwrap();

        let mut records = chain.into_records();
        records[1].owner_name = "bob".into();
        let tampered = HashChain::from_records(records).unwrap();

        assert!(!tampered.is_valid());
        assert!(matches!(
            tampered.validate(),
            Err(IntegrityViolation::HashMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn test_link_break_detection() {
        let mut chain = HashChain::with_genesis_at(TS);
        chain.append("aaa", "alice", None, art("one")).unwrap();
        chain.append("bbb", "alice", None, art("two")).unwrap();

        let mut records = chain.into_records();
        records[2].previous_hash = digest(b"elsewhere");
        records[2].hash = records[2].compute_hash();
        let broken = HashChain::from_records(records).unwrap();

        assert!(matches!(
            broken.validate(),
            Err(IntegrityViolation::BrokenLink { position: 2, .. })
        ));
    }

    #[test]
    fn test_lookup() {
        let mut chain = HashChain::with_genesis_at(TS);
        let h = digest(b"same bytes");
        chain.append(h.clone(), "alice", None, art("first")).unwrap();
        chain.append("other", "bob", None, art("other")).unwrap();
        chain.append(h.clone(), "carol", None, art("second")).unwrap();

        let found: Vec<_> = chain.find_by_content_hash(&h).map(|r| r.index).collect();
        assert_eq!(found, vec![1, 3]);

        // Restartable
        assert_eq!(chain.find_by_content_hash(&h).count(), 2);
        assert_eq!(chain.find_by_content_hash("missing").count(), 0);

        let bob: Vec<_> = chain.find_by_owner("bob").collect();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].content_hash, "other");
    }

    #[test]
    fn test_alice_signed_bob_unsigned() {
        let alice = Keypair::from_secret_bytes(&[0x42; 32]).unwrap();
        let alice_digest = digest(b"alice artwork");
        let bob_digest = digest(b"bob artwork");

        let mut chain = HashChain::with_genesis_at(TS);
        chain
            .append(
                alice_digest.clone(),
                "alice",
                Some(Attestation::sign(&alice, &alice_digest)),
                art("Sunset"),
            )
            .unwrap();
        chain.append(bob_digest, "bob", None, art("Sketch")).unwrap();

        let statuses: Vec<_> = chain.verify_signatures().map(|(_, s)| s).collect();
        assert_eq!(
            statuses,
            vec![
                SignatureStatus::Unsigned,
                SignatureStatus::Valid,
                SignatureStatus::Unsigned
            ]
        );
        assert!(chain.is_valid());
    }

    #[test]
    fn test_from_records_rejects_empty() {
        assert!(matches!(
            HashChain::from_records(Vec::new()),
            Err(CoreError::EmptyChain)
        ));
    }

    #[test]
    fn test_timestamp_format() {
        let whole = NaiveDate::from_ymd_opt(2025, 1, 14)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&whole), "2025-01-14 12:00:00");

        let fractional = NaiveDate::from_ymd_opt(2025, 1, 14)
            .unwrap()
            .and_hms_micro_opt(12, 7, 0, 1)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&fractional), "2025-01-14 12:07:00.000001");

        let now = now_timestamp();
        assert!(now.len() == 19 || now.len() == 26);
    }
}
