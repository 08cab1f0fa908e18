//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use artledger_core::{digest, Attestation, HashChain, Keypair, Metadata, Record};
use artledger_store::{ChainStoreExt, MemoryStore};

/// Timestamp of the genesis record in fixture chains.
pub const FIXTURE_GENESIS_TIME: &str = "2025-01-14 12:00:00";

/// An owner with a keypair.
pub struct TestFixture {
    pub owner_name: String,
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair.
    ///
    /// Panics if `seed` is not a valid secret scalar.
    pub fn with_seed(owner_name: impl Into<String>, seed: [u8; 32]) -> Self {
        let keypair = Keypair::from_secret_bytes(&seed)
            .unwrap_or_else(|_| panic!("fixture seed {} is not a valid scalar", hex::encode(seed)));
        Self {
            owner_name: owner_name.into(),
            keypair,
        }
    }

    /// Compressed SEC1 hex of the fixture's public key.
    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// Sign a content digest.
    pub fn attest(&self, content_hash: &str) -> Attestation {
        Attestation::sign(&self.keypair, content_hash)
    }

    /// Append a signed record for the given artifact bytes.
    pub fn mint_signed(&self, chain: &mut HashChain, artifact: &[u8], title: &str) -> Record {
        let content_hash = digest(artifact);
        let attestation = self.attest(&content_hash);
        self.append(chain, content_hash, Some(attestation), title)
    }

    /// Append an unsigned record for the given artifact bytes.
    pub fn mint_unsigned(&self, chain: &mut HashChain, artifact: &[u8], title: &str) -> Record {
        self.append(chain, digest(artifact), None, title)
    }

    fn append(
        &self,
        chain: &mut HashChain,
        content_hash: String,
        attestation: Option<Attestation>,
        title: &str,
    ) -> Record {
        let timestamp = format!("2025-01-14 13:{:02}:00", chain.len() % 60);
        chain
            .append_at(
                timestamp,
                content_hash,
                self.owner_name.clone(),
                attestation,
                Metadata::new().with("title", title),
            )
            .unwrap_or_else(|e| panic!("fixture append failed: {}", e))
            .clone()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0x11u8; 32];
            seed[0] = i as u8 + 1;
            TestFixture::with_seed(format!("party-{}", i), seed)
        })
        .collect()
}

/// A deterministic valid chain with `minted` records after genesis.
///
/// Even positions are signed by one party, odd positions are unsigned
/// records from another.
pub fn sample_chain(minted: usize) -> HashChain {
    let parties = multi_party_fixtures(2);
    let mut chain = HashChain::with_genesis_at(FIXTURE_GENESIS_TIME);

    for i in 0..minted {
        let artifact = format!("artifact {}", i);
        let title = format!("Work #{}", i);
        if i % 2 == 0 {
            parties[0].mint_signed(&mut chain, artifact.as_bytes(), &title);
        } else {
            parties[1].mint_unsigned(&mut chain, artifact.as_bytes(), &title);
        }
    }
    chain
}

/// A memory store already holding `chain`.
pub fn store_with_chain(chain: &HashChain) -> MemoryStore {
    let store = MemoryStore::new();
    store
        .save_chain(chain)
        .unwrap_or_else(|e| panic!("fixture save failed: {}", e));
    store
}
