//! Canonical text encoding for deterministic record hashing.
//!
//! A record hash is the SHA-256 of a JSON text built with these rules:
//! - Object keys sorted by code point, at every nesting level
//! - `", "` between items and `": "` between key and value
//! - Every character outside printable ASCII escaped as `\uXXXX`
//!   (UTF-16 surrogate pairs above U+FFFF)
//! - Floats in shortest round-trip form, exponent as `e+XX` / `e-XX`
//! - The record's own `hash` field is excluded
//!
//! Existing chains were hashed with exactly this text, so any deviation
//! (separator, escape, float spelling) breaks verification of stored data.
//!
//! Persistence uses ordinary pretty-printed JSON via serde; only hashing
//! depends on the canonical text.

use std::fmt::Write as _;

use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};
use crate::record::Record;
use crate::types::{Metadata, MetadataValue};

/// Record field names as they appear in both the canonical text and storage.
mod keys {
    pub const INDEX: &str = "index";
    pub const TIMESTAMP: &str = "timestamp";
    pub const CONTENT_HASH: &str = "content_hash";
    pub const OWNER_NAME: &str = "owner_name";
    pub const OWNER_PUBKEY: &str = "owner_pubkey";
    pub const SIGNATURE: &str = "signature";
    pub const METADATA: &str = "metadata";
    pub const PREVIOUS_HASH: &str = "previous_hash";
    pub const NONCE: &str = "nonce";
}

/// A borrowed value on its way into the canonical text.
enum Canon<'a> {
    Null,
    Unsigned(u64),
    Text(&'a str),
    Value(&'a MetadataValue),
    Map(&'a Metadata),
}

impl<'a> From<&'a Option<String>> for Canon<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            Some(s) => Canon::Text(s),
            None => Canon::Null,
        }
    }
}

/// Canonical text of a record with its `hash` field excluded.
pub fn canonical_record_text(record: &Record) -> String {
    let entries = record_to_canon(record);
    let mut buf = String::with_capacity(512);
    encode_map(&mut buf, entries);
    buf
}

/// UTF-8 bytes of [`canonical_record_text`].
pub fn canonical_record_bytes(record: &Record) -> Vec<u8> {
    canonical_record_text(record).into_bytes()
}

/// Lowercase hex SHA-256 of the record's canonical text.
pub fn record_hash(record: &Record) -> String {
    digest(canonical_record_text(record).as_bytes())
}

/// Lowercase hex SHA-256 of arbitrary bytes.
///
/// This is how artifact content digests are produced.
pub fn digest(bytes: &[u8]) -> String {
    Sha256Hash::hash(bytes).to_hex()
}

/// Serialize a chain to its persisted form: a pretty-printed JSON array.
pub fn serialize_chain(records: &[Record]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(records).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Parse a persisted chain.
///
/// Only the shape is checked here; integrity is the caller's concern.
pub fn deserialize_chain(bytes: &[u8]) -> Result<Vec<Record>> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Every field except `hash`, in declaration order.
fn record_to_canon(record: &Record) -> Vec<(&'static str, Canon<'_>)> {
    vec![
        (keys::INDEX, Canon::Unsigned(record.index)),
        (keys::TIMESTAMP, Canon::Text(&record.timestamp)),
        (keys::CONTENT_HASH, Canon::Text(&record.content_hash)),
        (keys::OWNER_NAME, Canon::Text(&record.owner_name)),
        (keys::OWNER_PUBKEY, Canon::from(&record.owner_pubkey)),
        (keys::SIGNATURE, Canon::from(&record.signature)),
        (keys::METADATA, Canon::Map(&record.metadata)),
        (keys::PREVIOUS_HASH, Canon::Text(&record.previous_hash)),
        (keys::NONCE, Canon::Unsigned(record.nonce)),
    ]
}

fn metadata_to_canon(metadata: &Metadata) -> Vec<(&str, Canon<'_>)> {
    metadata
        .iter()
        .map(|(k, v)| (k.as_str(), Canon::Value(v)))
        .collect()
}

fn encode_canon(buf: &mut String, value: &Canon<'_>) {
    match value {
        Canon::Null => buf.push_str("null"),
        Canon::Unsigned(n) => {
            let _ = write!(buf, "{n}");
        }
        Canon::Text(s) => encode_text(buf, s),
        Canon::Value(v) => encode_value(buf, v),
        Canon::Map(m) => encode_map(buf, metadata_to_canon(m)),
    }
}

fn encode_value(buf: &mut String, value: &MetadataValue) {
    match value {
        MetadataValue::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        MetadataValue::Integer(n) => {
            let _ = write!(buf, "{n}");
        }
        MetadataValue::Unsigned(n) => {
            let _ = write!(buf, "{n}");
        }
        MetadataValue::Float(f) => encode_float(buf, *f),
        MetadataValue::Text(s) => encode_text(buf, s),
        MetadataValue::List(items) => encode_list(buf, items),
        MetadataValue::Map(m) => encode_map(buf, metadata_to_canon(m)),
    }
}

/// Encode a string literal with ASCII-only output.
fn encode_text(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0c}' => buf.push_str("\\f"),
            ' '..='~' => buf.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(buf, "\\u{:04x}", unit);
                }
            }
        }
    }
    buf.push('"');
}

/// Encode a float in shortest round-trip form.
///
/// Fixed notation for `1e-4 <= |f| < 1e16` (always with a fractional
/// part), otherwise `d[.ddd]e±XX` with at least two exponent digits.
fn encode_float(buf: &mut String, f: f64) {
    if f.is_nan() {
        buf.push_str("NaN");
        return;
    }
    if f.is_infinite() {
        buf.push_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
        return;
    }

    let repr = format!("{f:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            let _ = write!(buf, "{mantissa}e{sign}{digits:0>2}");
        }
        None => buf.push_str(&repr),
    }
}

fn encode_list(buf: &mut String, items: &[MetadataValue]) {
    buf.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        encode_value(buf, item);
    }
    buf.push(']');
}

/// Encode an object with keys sorted by code point.
fn encode_map(buf: &mut String, mut entries: Vec<(&str, Canon<'_>)>) {
    // Byte order of UTF-8 equals code point order
    entries.sort_by(|a, b| a.0.cmp(b.0));

    buf.push('{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        encode_text(buf, key);
        buf.push_str(": ");
        encode_canon(buf, value);
    }
    buf.push('}');
}
