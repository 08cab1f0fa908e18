//! Proptest generators for property-based testing.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

use artledger_core::{Attestation, HashChain, Keypair, Metadata, MetadataValue};

use crate::fixtures::FIXTURE_GENESIS_TIME;

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_filter_map("not a valid secret scalar", |seed| {
        Keypair::from_secret_bytes(&seed).ok()
    })
}

/// Generate a hex SHA-256 digest.
pub fn content_hash() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(hex::encode)
}

/// Generate an owner label, including non-ASCII text.
pub fn owner_name() -> impl Strategy<Value = String> {
    "\\PC{0,24}"
}

/// Generate a record timestamp, with or without microseconds.
pub fn timestamp() -> impl Strategy<Value = String> {
    (
        2000u32..2100,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        prop_oneof![Just(0u32), 1u32..1_000_000],
    )
        .prop_map(|(y, mo, d, h, mi, s, micros)| {
            let seconds = format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", y, mo, d, h, mi, s);
            if micros == 0 {
                seconds
            } else {
                format!("{}.{:06}", seconds, micros)
            }
        })
}

/// Generate any finite float, subnormals included.
pub fn finite_float() -> impl Strategy<Value = f64> {
    use proptest::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

/// Generate a metadata value, nesting lists and maps up to three levels.
pub fn metadata_value() -> impl Strategy<Value = MetadataValue> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(MetadataValue::Bool),
        any::<i64>().prop_map(MetadataValue::Integer),
        ((i64::MAX as u64 + 1)..=u64::MAX).prop_map(MetadataValue::Unsigned),
        finite_float().prop_map(MetadataValue::Float),
        "\\PC{0,16}".prop_map(MetadataValue::Text),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(MetadataValue::List),
            btree_map("[a-z_]{1,6}", inner, 0..4)
                .prop_map(|m| MetadataValue::Map(m.into_iter().collect())),
        ]
    })
}

/// Generate record metadata.
pub fn metadata() -> impl Strategy<Value = Metadata> {
    btree_map("[a-zA-Z_]{1,10}", metadata_value(), 0..5).prop_map(|m| m.into_iter().collect())
}

/// Parameters for appending one record.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub timestamp: String,
    pub content_hash: String,
    pub owner_name: String,
    /// Signs the content digest when present.
    pub signer: Option<Keypair>,
    pub metadata: Metadata,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            timestamp(),
            content_hash(),
            owner_name(),
            proptest::option::of(keypair()),
            metadata(),
        )
            .prop_map(|(timestamp, content_hash, owner_name, signer, metadata)| RecordParams {
                timestamp,
                content_hash,
                owner_name,
                signer,
                metadata,
            })
            .boxed()
    }
}

impl RecordParams {
    /// The attestation this record will carry.
    pub fn attestation(&self) -> Option<Attestation> {
        self.signer
            .as_ref()
            .map(|keypair| Attestation::sign(keypair, &self.content_hash))
    }

    /// Append to a chain.
    pub fn append_to(&self, chain: &mut HashChain) {
        chain
            .append_at(
                self.timestamp.clone(),
                self.content_hash.clone(),
                self.owner_name.clone(),
                self.attestation(),
                self.metadata.clone(),
            )
            .unwrap_or_else(|e| panic!("generated record rejected: {}", e));
    }
}

/// Parameters for a whole chain: the records appended after genesis.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub records: Vec<RecordParams>,
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        vec(any::<RecordParams>(), 0..8)
            .prop_map(|records| ChainParams { records })
            .boxed()
    }
}

/// Build a chain from parameters.
pub fn chain_from_params(params: &ChainParams) -> HashChain {
    let mut chain = HashChain::with_genesis_at(FIXTURE_GENESIS_TIME);
    for record in &params.records {
        record.append_to(&mut chain);
    }
    chain
}
