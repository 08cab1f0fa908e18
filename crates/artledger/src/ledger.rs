//! The Ledger: one session over a persisted hash chain.
//!
//! The Ledger owns the in-memory chain and the store it came from. Each mint
//! digests the artifact, optionally signs the digest, appends a record and
//! rewrites the persisted chain.

use artledger_core::{
    digest, Attestation, HashChain, IntegrityViolation, Keypair, Metadata, Record,
    SignatureStatus, VerificationFailure,
};
use artledger_store::{ChainStore, ChainStoreExt};

use crate::error::Result;

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Rewrite the store after every successful mint.
    pub persist_on_append: bool,
    /// Reject mints whose attestation does not verify against the digest.
    pub verify_signatures_on_mint: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            persist_on_append: true,
            verify_signatures_on_mint: false,
        }
    }
}

/// Where the content digest of a mint comes from.
#[derive(Debug, Clone)]
enum Artifact {
    Bytes(Vec<u8>),
    Digest(String),
}

/// How a mint is signed.
#[derive(Debug, Clone)]
enum Signing {
    Unsigned,
    Keypair(Keypair),
    Attestation(Attestation),
}

/// A request to mint one artifact.
#[derive(Debug, Clone)]
pub struct MintRequest {
    artifact: Artifact,
    owner_name: String,
    signing: Signing,
    metadata: Metadata,
}

impl MintRequest {
    /// Mint the given artifact bytes; the ledger digests them.
    pub fn for_artifact(bytes: impl Into<Vec<u8>>, owner_name: impl Into<String>) -> Self {
        Self::new(Artifact::Bytes(bytes.into()), owner_name.into())
    }

    /// Mint a precomputed content digest.
    pub fn for_digest(content_hash: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self::new(Artifact::Digest(content_hash.into()), owner_name.into())
    }

    fn new(artifact: Artifact, owner_name: String) -> Self {
        Self {
            artifact,
            owner_name,
            signing: Signing::Unsigned,
            metadata: Metadata::new(),
        }
    }

    /// Sign the content digest with this keypair at mint time.
    pub fn signed_by(mut self, keypair: &Keypair) -> Self {
        self.signing = Signing::Keypair(keypair.clone());
        self
    }

    /// Attach an attestation produced elsewhere.
    pub fn attested(mut self, attestation: Attestation) -> Self {
        self.signing = Signing::Attestation(attestation);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the `title` metadata entry.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.metadata.insert("title", title.into());
        self
    }

    /// The content digest this request will record.
    pub fn content_hash(&self) -> String {
        match &self.artifact {
            Artifact::Bytes(bytes) => digest(bytes),
            Artifact::Digest(hash) => hash.clone(),
        }
    }
}

/// A record matching a verified artifact, with its signature status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Provenance<'a> {
    pub record: &'a Record,
    pub signature: SignatureStatus,
}

impl<'a> Provenance<'a> {
    fn of(record: &'a Record) -> Self {
        Self {
            record,
            signature: record.signature_status(),
        }
    }
}

/// The main Ledger struct.
pub struct Ledger<S: ChainStore> {
    /// The storage backend.
    store: S,
    /// The chain as last loaded or appended.
    chain: HashChain,
    /// Configuration.
    config: LedgerConfig,
}

impl<S: ChainStore> Ledger<S> {
    /// Open a ledger over a store.
    ///
    /// Absent storage starts a genesis-only chain. A chain that fails
    /// integrity checks still opens; it is reported, never repaired.
    pub fn open(store: S, config: LedgerConfig) -> Result<Self> {
        let chain = store.load_chain()?;
        tracing::info!(
            location = %store.location(),
            records = chain.len(),
            "opened ledger"
        );

        let ledger = Self {
            store,
            chain,
            config,
        };
        ledger.log_integrity();
        Ok(ledger)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn chain(&self) -> &HashChain {
        &self.chain
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Minting
    // ─────────────────────────────────────────────────────────────────────────

    /// Mint an artifact: digest, sign, append, persist.
    ///
    /// If persisting fails the record stays appended in memory and the
    /// storage error is returned; [`Ledger::persist`] can retry.
    pub fn mint(&mut self, request: MintRequest) -> Result<&Record> {
        let content_hash = request.content_hash();
        let attestation = match request.signing {
            Signing::Unsigned => None,
            Signing::Keypair(keypair) => Some(Attestation::sign(&keypair, &content_hash)),
            Signing::Attestation(attestation) => Some(attestation),
        };

        if self.config.verify_signatures_on_mint {
            if let Some(attestation) = &attestation {
                if !attestation.verify(&content_hash) {
                    tracing::warn!(content_hash = %content_hash, "rejected mint with invalid attestation");
                    return Err(VerificationFailure.into());
                }
            }
        }

        let signed = attestation.is_some();
        self.chain
            .append(content_hash, request.owner_name, attestation, request.metadata)?;

        let head = self.chain.head();
        tracing::info!(
            index = head.index,
            content_hash = %head.content_hash,
            owner = %head.owner_name,
            signed,
            "minted record"
        );

        if self.config.persist_on_append {
            self.persist()?;
        }
        Ok(self.chain.head())
    }

    /// Write the whole chain to the store.
    pub fn persist(&self) -> Result<()> {
        self.store.save_chain(&self.chain)?;
        Ok(())
    }

    /// Discard in-memory state and re-read the chain from the store.
    pub fn reload(&mut self) -> Result<()> {
        self.chain = self.store.load_chain()?;
        tracing::debug!(records = self.chain.len(), "reloaded ledger");
        self.log_integrity();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Every record minted for these artifact bytes, oldest first.
    ///
    /// Empty when the artifact was never minted.
    pub fn verify_artifact(&self, bytes: &[u8]) -> Vec<Provenance<'_>> {
        self.verify_digest(&digest(bytes))
    }

    /// Every record minted with this content digest, oldest first.
    pub fn verify_digest(&self, content_hash: &str) -> Vec<Provenance<'_>> {
        let found: Vec<_> = self
            .chain
            .find_by_content_hash(content_hash)
            .map(Provenance::of)
            .collect();
        tracing::debug!(content_hash, matches = found.len(), "verified artifact");
        found
    }

    /// Check every hash and link in the chain.
    pub fn integrity(&self) -> std::result::Result<(), IntegrityViolation> {
        let result = self.chain.validate();
        if let Err(violation) = &result {
            tracing::warn!(position = violation.position(), %violation, "chain integrity violation");
        }
        result
    }

    pub fn is_valid(&self) -> bool {
        self.chain.is_valid()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Every record after genesis, oldest first.
    pub fn minted(&self) -> impl Iterator<Item = &Record> {
        self.chain.minted()
    }

    /// Records minted under an owner label, oldest first.
    pub fn records_by_owner<'a>(&'a self, owner_name: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.chain.find_by_owner(owner_name)
    }

    fn log_integrity(&self) {
        if let Err(violation) = self.chain.validate() {
            tracing::warn!(
                position = violation.position(),
                %violation,
                "loaded chain fails integrity check"
            );
        }
    }
}

impl<S: ChainStore + std::fmt::Debug> std::fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("store", &self.store)
            .field("records", &self.chain.len())
            .field("config", &self.config)
            .finish()
    }
}
