//! Cryptographic primitives: secp256k1 ECDSA owner keys and SHA-256 hashing.
//!
//! Signatures are always taken over the UTF-8 text of a record's hex content
//! digest, never over the artifact bytes. They are stored as base64 of the
//! fixed 64-byte `r || s` encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{CoreError, Result, VerificationFailure};

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A secp256k1 public key identifying a record owner.
#[derive(Clone, PartialEq, Eq)]
pub struct OwnerKey(VerifyingKey);

impl OwnerKey {
    /// Parse a SEC1-encoded point.
    ///
    /// Accepts compressed (33 bytes) and uncompressed (65 bytes) SEC1, and the
    /// bare 64-byte `x || y` form without the `0x04` tag.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let key = if bytes.len() == 64 {
            let mut tagged = Vec::with_capacity(65);
            tagged.push(0x04);
            tagged.extend_from_slice(bytes);
            VerifyingKey::from_sec1_bytes(&tagged)
        } else {
            VerifyingKey::from_sec1_bytes(bytes)
        };
        key.map(Self).map_err(|_| CoreError::InvalidPublicKey)
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|_| CoreError::InvalidPublicKey)?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Compressed SEC1 encoding as hex. This is the form stored in records.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_sec1_bytes())
    }

    /// Verify a base64 signature over a message.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &str,
    ) -> std::result::Result<(), VerificationFailure> {
        let raw = STANDARD
            .decode(signature.trim())
            .map_err(|_| VerificationFailure)?;
        let signature = Signature::from_slice(&raw).map_err(|_| VerificationFailure)?;
        self.0
            .verify(message, &signature)
            .map_err(|_| VerificationFailure)
    }
}

impl fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerKey({}...)", &self.to_hex()[..10])
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A secp256k1 keypair for signing content digests.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::random(&mut rng),
        }
    }

    /// Create from a 32-byte secret scalar.
    ///
    /// Fails if the scalar is zero or not below the curve order.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self> {
        let signing_key =
            SigningKey::from_slice(secret).map_err(|_| CoreError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Parse the secret scalar from hex.
    pub fn from_secret_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|_| CoreError::InvalidSecretKey)?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidSecretKey)?;
        Self::from_secret_bytes(&secret)
    }

    /// Export the secret scalar as hex.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Get the public key.
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey(self.signing_key.verifying_key().clone())
    }

    /// Public key as compressed SEC1 hex.
    pub fn public_key_hex(&self) -> String {
        self.owner_key().to_hex()
    }

    /// Sign a message, returning base64 of the 64-byte signature.
    ///
    /// Nonces are RFC 6979 deterministic, so the same key and message always
    /// produce the same signature.
    pub fn sign(&self, message: &[u8]) -> String {
        let signature: Signature = self.signing_key.sign(message);
        STANDARD.encode(signature.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.owner_key())
    }
}

/// Generate a new owner keypair.
pub fn generate_keypair() -> Keypair {
    Keypair::generate()
}

/// Sign a message with a keypair.
pub fn sign(keypair: &Keypair, message: &[u8]) -> String {
    keypair.sign(message)
}

/// Verify a base64 signature against a hex public key.
pub fn verify_signature(
    public_key_hex: &str,
    message: &[u8],
    signature: &str,
) -> std::result::Result<(), VerificationFailure> {
    let key = OwnerKey::from_hex(public_key_hex).map_err(|_| VerificationFailure)?;
    key.verify(message, signature)
}

/// Boolean form of [`verify_signature`].
pub fn verify(public_key_hex: &str, message: &[u8], signature: &str) -> bool {
    verify_signature(public_key_hex, message, signature).is_ok()
}

/// The owner key and signature that authenticate a record's content digest.
///
/// Records carry either both halves or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    /// Compressed SEC1 hex public key.
    pub owner_pubkey: String,
    /// Base64 signature over the content digest text.
    pub signature: String,
}

impl Attestation {
    pub fn new(owner_pubkey: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            owner_pubkey: owner_pubkey.into(),
            signature: signature.into(),
        }
    }

    /// Sign a content digest.
    pub fn sign(keypair: &Keypair, content_hash: &str) -> Self {
        Self {
            owner_pubkey: keypair.public_key_hex(),
            signature: keypair.sign(content_hash.as_bytes()),
        }
    }

    /// Check the signature against a content digest.
    pub fn verify(&self, content_hash: &str) -> bool {
        verify(&self.owner_pubkey, content_hash.as_bytes(), &self.signature)
    }
}
