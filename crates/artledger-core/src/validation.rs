//! Chain integrity checks.
//!
//! These checks re-derive every hash from record contents. They never look
//! at signatures, and they never repair anything.

use crate::error::IntegrityViolation;
use crate::record::Record;

/// Validate a whole chain, returning the first violation found.
///
/// Scanning starts at position 1: the genesis record has no predecessor,
/// and its own hash is not re-derived.
pub fn validate_chain(records: &[Record]) -> Result<(), IntegrityViolation> {
    for (offset, pair) in records.windows(2).enumerate() {
        validate_link(offset + 1, &pair[0], &pair[1])?;
    }
    Ok(())
}

/// Validate a record against its predecessor.
///
/// The record's own hash is checked before its link.
pub fn validate_link(
    position: usize,
    previous: &Record,
    current: &Record,
) -> Result<(), IntegrityViolation> {
    let computed = current.compute_hash();
    if computed != current.hash {
        return Err(IntegrityViolation::HashMismatch {
            position,
            stored: current.hash.clone(),
            computed,
        });
    }

    if current.previous_hash != previous.hash {
        return Err(IntegrityViolation::BrokenLink {
            position,
            expected: previous.hash.clone(),
            found: current.previous_hash.clone(),
        });
    }

    Ok(())
}
