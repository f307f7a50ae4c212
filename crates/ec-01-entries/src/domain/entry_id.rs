//! # Entry IDs
//!
//! ```text
//! entry_id(e) = SHA3-256( "entryid:" || type_tag || ":" || SHA3-256(body) )
//! ```
//!
//! The type tag separates structurally identical bodies of different kinds.
//! IDs depend on the body alone, so identical entries anywhere collide to
//! the same ID.

use shared_types::{sha3_256, Hash, Sha3Hasher, WriteForHash};

use super::entries::Entry;
use super::errors::EntryResult;
use super::value_objects::ENTRY_ID_PREFIX;

/// ID of an entry.
pub fn entry_id(entry: &Entry) -> EntryResult<Hash> {
    tagged_id(entry.type_tag(), entry)
}

/// ID of an optional entry; an absent entry has the zero ID.
pub fn optional_entry_id(entry: Option<&Entry>) -> EntryResult<Hash> {
    match entry {
        Some(entry) => entry_id(entry),
        None => Ok(Hash::ZERO),
    }
}

/// ID of a body under the given type tag.
///
/// Lets callers hash a body before wrapping it in an `Entry`.
pub fn tagged_id<T: WriteForHash + ?Sized>(type_tag: &str, body: &T) -> EntryResult<Hash> {
    let mut inner = Sha3Hasher::new();
    body.write_for_hash(&mut inner)?;
    let body_hash = inner.finalize();

    let mut outer = Sha3Hasher::new();
    outer
        .update(ENTRY_ID_PREFIX)
        .update(type_tag.as_bytes())
        .update(b":")
        .update(body_hash.as_bytes());
    Ok(outer.finalize())
}

/// Hash of free-form reference data.
pub fn hash_data(data: &[u8]) -> Hash {
    sha3_256(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entries::*;
    use crate::domain::value_objects::*;

    #[test]
    fn test_absent_entry_is_zero() {
        assert_eq!(optional_entry_id(None).unwrap(), Hash::ZERO);
    }

    #[test]
    fn test_id_formula() {
        let tr = TimeRange {
            min_time_ms: 1,
            max_time_ms: 2,
            ext_hash: Hash::ZERO,
        };
        let mut body = Vec::new();
        tr.write_for_hash(&mut body).unwrap();
        let mut preimage = b"entryid:timerange1:".to_vec();
        preimage.extend_from_slice(sha3_256(&body).as_bytes());

        assert_eq!(entry_id(&Entry::TimeRange(tr)).unwrap(), sha3_256(&preimage));
    }

    #[test]
    fn test_type_tag_separates_identical_bodies() {
        let body = TimeRange::default();
        let as_time_range = tagged_id(TYPE_TIME_RANGE, &body).unwrap();
        let as_other = tagged_id(TYPE_NONCE, &body).unwrap();
        assert_ne!(as_time_range, as_other);
    }

    #[test]
    fn test_identical_bodies_collide() {
        let a = Entry::Output(Output {
            ordinal: 0,
            ..Default::default()
        });
        let b = Entry::Output(Output {
            ordinal: 7,
            ..Default::default()
        });
        assert_eq!(entry_id(&a).unwrap(), entry_id(&b).unwrap());
    }

    #[test]
    fn test_tagged_id_matches_entry_id() {
        let mux = Mux {
            program: Program::new(1, vec![0x51]),
            ..Default::default()
        };
        assert_eq!(
            tagged_id(TYPE_MUX, &mux).unwrap(),
            entry_id(&Entry::Mux(mux)).unwrap()
        );
    }

    #[test]
    fn test_unencodable_body_is_an_error() {
        let header = TxHeader {
            version: u64::MAX,
            ..Default::default()
        };
        assert!(entry_id(&Entry::TxHeader(header)).is_err());
    }

    #[test]
    fn test_hash_data_of_empty() {
        assert_eq!(
            hash_data(&[]).to_hex(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }
}
