//! # Write-For-Hash
//!
//! Type-directed encoder producing the byte stream that entry IDs and asset
//! IDs are computed over.
//!
//! | Value | Encoding |
//! |-------|----------|
//! | `u8` | the raw byte |
//! | `u64` | varint63 |
//! | byte string | varstr31 |
//! | `Hash`, `AssetId` | raw 32 bytes |
//! | list | varint31 count, then each element |
//! | struct | each field in declaration order, untagged |
//!
//! Struct field order is part of the consensus format. Each hashed type
//! implements this trait by hand so that the order is spelled out and cannot
//! drift when a struct is refactored.

use crate::encoding::{write_varint31, write_varint63, write_varstr31, ByteSink};
use crate::errors::EncodingResult;
use crate::hash::{AssetId, Hash};

/// Canonical hash-input encoding of a value.
pub trait WriteForHash {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()>;
}

/// Encode a list: varint31 element count followed by each element.
pub fn write_slice_for_hash<T, W>(w: &mut W, items: &[T]) -> EncodingResult<()>
where
    T: WriteForHash,
    W: ByteSink + ?Sized,
{
    write_varint31(w, items.len() as u64)?;
    for item in items {
        item.write_for_hash(w)?;
    }
    Ok(())
}

impl WriteForHash for u8 {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        w.put(&[*self]);
        Ok(())
    }
}

impl WriteForHash for u64 {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        write_varint63(w, *self)?;
        Ok(())
    }
}

impl WriteForHash for [u8] {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        write_varstr31(w, self)?;
        Ok(())
    }
}

impl WriteForHash for Vec<u8> {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.as_slice().write_for_hash(w)
    }
}

impl WriteForHash for str {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.as_bytes().write_for_hash(w)
    }
}

impl WriteForHash for Vec<Vec<u8>> {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        write_slice_for_hash(w, self)
    }
}

impl WriteForHash for Vec<Hash> {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        write_slice_for_hash(w, self)
    }
}

impl WriteForHash for Hash {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.write_to(w);
        Ok(())
    }
}

impl WriteForHash for AssetId {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.write_to(w);
        Ok(())
    }
}

impl<T: WriteForHash + ?Sized> WriteForHash for &T {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        (**self).write_for_hash(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded<T: WriteForHash + ?Sized>(value: &T) -> Vec<u8> {
        let mut buf = Vec::new();
        value.write_for_hash(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encoded(&7u8), vec![7]);
        assert_eq!(encoded(&300u64), vec![0xac, 0x02]);
    }

    #[test]
    fn test_byte_string_is_length_prefixed() {
        assert_eq!(encoded(&vec![1u8, 2]), vec![2, 1, 2]);
        assert_eq!(encoded("hi"), vec![2, b'h', b'i']);
    }

    #[test]
    fn test_hash_is_raw() {
        assert_eq!(encoded(&Hash::new([9; 32])), vec![9; 32]);
    }

    #[test]
    fn test_lists_are_count_prefixed() {
        let list = vec![Hash::new([1; 32]), Hash::new([2; 32])];
        let bytes = encoded(&list);
        assert_eq!(bytes.len(), 1 + 64);
        assert_eq!(bytes[0], 2);

        let args: Vec<Vec<u8>> = vec![vec![0xaa], vec![]];
        assert_eq!(encoded(&args), vec![2, 1, 0xaa, 0]);
    }

    #[test]
    fn test_u64_out_of_range_is_an_error() {
        let mut buf = Vec::new();
        assert!(u64::MAX.write_for_hash(&mut buf).is_err());
    }
}
