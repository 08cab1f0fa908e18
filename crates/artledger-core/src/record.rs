//! Record: one link in the hash chain.
//!
//! A record binds the content digest of one minted artifact to an owner
//! label, optionally authenticated by an [`Attestation`]. Its `hash` is the
//! SHA-256 of the canonical encoding of every other field.

use serde::{Deserialize, Serialize};

use crate::canonical::record_hash;
use crate::crypto::Attestation;
use crate::types::Metadata;

/// A record in the chain.
///
/// Field order here is the order fields are written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the chain, starting at 0.
    pub index: u64,
    /// Creation instant, `YYYY-MM-DD HH:MM:SS[.ffffff]`.
    pub timestamp: String,
    /// Hex digest of the artifact bytes. `"0"` for genesis.
    pub content_hash: String,
    /// Free-text owner label.
    pub owner_name: String,
    /// Compressed SEC1 hex public key. Present iff `signature` is.
    #[serde(default)]
    pub owner_pubkey: Option<String>,
    /// Base64 signature over `content_hash`.
    #[serde(default)]
    pub signature: Option<String>,
    /// Opaque metadata (title, description, category, thumbnail, ...).
    pub metadata: Metadata,
    /// Hash of the preceding record. `"0"` for genesis.
    pub previous_hash: String,
    /// Stored for format compatibility; never driven by any mining step.
    #[serde(default)]
    pub nonce: u64,
    /// Cached hash of the canonical encoding of all other fields.
    pub hash: String,
}

impl Record {
    /// Recompute the hash from the current field values.
    pub fn compute_hash(&self) -> String {
        record_hash(self)
    }

    /// Whether the stored hash matches the current field values.
    pub fn verify_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Both the owner key and signature are present.
    pub fn is_signed(&self) -> bool {
        self.owner_pubkey.is_some() && self.signature.is_some()
    }

    /// The attestation, if the record carries a complete one.
    pub fn attestation(&self) -> Option<Attestation> {
        match (&self.owner_pubkey, &self.signature) {
            (Some(pk), Some(sig)) => Some(Attestation::new(pk.clone(), sig.clone())),
            _ => None,
        }
    }

    /// Check the record's signature over its content digest.
    pub fn signature_status(&self) -> SignatureStatus {
        match (&self.owner_pubkey, &self.signature) {
            (None, None) => SignatureStatus::Unsigned,
            (Some(pk), Some(sig)) => {
                if crate::crypto::verify(pk, self.content_hash.as_bytes(), sig) {
                    SignatureStatus::Valid
                } else {
                    SignatureStatus::Invalid
                }
            }
            // Half an attestation cannot authenticate anything.
            _ => SignatureStatus::Invalid,
        }
    }

    /// The `title` metadata entry, if it is text.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get_str("title")
    }
}

/// Outcome of checking a record's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// No owner key and no signature.
    Unsigned,
    /// The signature verifies against the owner key.
    Valid,
    /// Verification failed, or the encoding was malformed, or only one of
    /// key/signature is present.
    Invalid,
}

impl SignatureStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureStatus::Valid)
    }
}

/// Builder for sealing new records.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    index: u64,
    timestamp: String,
    content_hash: String,
    owner_name: String,
    attestation: Option<Attestation>,
    metadata: Metadata,
    previous_hash: String,
    nonce: u64,
}

impl RecordBuilder {
    /// Start a record at `index` linked to `previous_hash`.
    pub fn new(index: u64, previous_hash: impl Into<String>) -> Self {
        Self {
            index,
            timestamp: String::new(),
            content_hash: String::new(),
            owner_name: String::new(),
            attestation: None,
            metadata: Metadata::new(),
            previous_hash: previous_hash.into(),
            nonce: 0,
        }
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn content_hash(mut self, content_hash: impl Into<String>) -> Self {
        self.content_hash = content_hash.into();
        self
    }

    pub fn owner(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = owner_name.into();
        self
    }

    pub fn attestation(mut self, attestation: Option<Attestation>) -> Self {
        self.attestation = attestation;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Build the record and compute its hash.
    pub fn seal(self) -> Record {
        let (owner_pubkey, signature) = match self.attestation {
            Some(a) => (Some(a.owner_pubkey), Some(a.signature)),
            None => (None, None),
        };

        let mut record = Record {
            index: self.index,
            timestamp: self.timestamp,
            content_hash: self.content_hash,
            owner_name: self.owner_name,
            owner_pubkey,
            signature,
            metadata: self.metadata,
            previous_hash: self.previous_hash,
            nonce: self.nonce,
            hash: String::new(),
        };
        record.hash = record.compute_hash();
        record
    }
}
