//! # Blocks
//!
//! ```text
//! BlockHeader = serflags
//!               varint63 version  varint63 height
//!               previous_block_id  varint63 timestamp_ms
//!               extensible(transactions_root assets_root varstr(consensus_program))
//!               extensible(varstr_list(witness))            if SER_BLOCK_WITNESS
//!
//! Block       = BlockHeader
//!               varint31 n  TxData * n                      if SER_BLOCK_TRANSACTIONS
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_types::encoding::{
    write_extensible_string, write_varint31, write_varint63, write_varstr31, write_varstr_list,
};
use shared_types::{ByteSink, Hash, Reader};

use super::errors::{LegacyError, LegacyResult};
use super::map::map_block_header;
use super::tx_data::TxData;
use super::value_objects::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockCommitment {
    pub transactions_root: Hash,
    pub assets_root: Hash,
    pub consensus_program: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockWitness {
    pub witness: Vec<Vec<u8>>,
}

// =============================================================================
// BLOCK HEADER
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u64,
    pub height: u64,
    pub previous_block_id: Hash,
    pub timestamp_ms: u64,
    pub commitment: BlockCommitment,
    pub commitment_suffix: Vec<u8>,
    pub witness: BlockWitness,
    pub witness_suffix: Vec<u8>,
}

impl BlockHeader {
    /// The block ID: entry ID of the mapped header.
    pub fn hash(&self) -> LegacyResult<Hash> {
        Ok(map_block_header(self)?.0)
    }

    /// Header encoding with its witness.
    pub fn to_bytes(&self) -> LegacyResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, SER_BLOCK_HEADER)?;
        Ok(buf)
    }

    pub fn write_to<W: ByteSink + ?Sized>(&self, w: &mut W, serflags: u8) -> LegacyResult<()> {
        w.put(&[serflags]);
        write_varint63(w, self.version)?;
        write_varint63(w, self.height)?;
        self.previous_block_id.write_to(w);
        write_varint63(w, self.timestamp_ms)?;
        write_extensible_string(w, &self.commitment_suffix, |w| {
            self.commitment.transactions_root.write_to(w);
            self.commitment.assets_root.write_to(w);
            write_varstr31(w, &self.commitment.consensus_program)?;
            Ok::<_, LegacyError>(())
        })?;
        if serflags & SER_BLOCK_WITNESS != 0 {
            write_extensible_string(w, &self.witness_suffix, |w| {
                write_varstr_list(w, &self.witness.witness)?;
                Ok::<_, LegacyError>(())
            })?;
        }
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> LegacyResult<Self> {
        let mut r = Reader::new(bytes);
        let (header, _) = Self::read_from(&mut r, &DecodeLimits::default())?;
        r.finish()?;
        Ok(header)
    }

    /// Decode a header; returns it with the serialization flags it carried.
    pub(crate) fn read_from(
        r: &mut Reader<'_>,
        limits: &DecodeLimits,
    ) -> LegacyResult<(Self, u8)> {
        let serflags = r.read_byte()?;
        match serflags {
            SER_BLOCK_SIG_HASH | SER_BLOCK_HEADER | SER_BLOCK_FULL => {}
            other => return Err(LegacyError::InvalidBlockSerFlags(other)),
        }

        let version = r.read_varint63()?.0;
        let height = r.read_varint63()?.0;
        let previous_block_id = Hash::read_from(r)?;
        let timestamp_ms = r.read_varint63()?.0;

        let mut commitment = BlockCommitment::default();
        let commitment_suffix = r.read_extensible_string(|r| {
            commitment.transactions_root = Hash::read_from(r)?;
            commitment.assets_root = Hash::read_from(r)?;
            commitment.consensus_program = r.read_varstr31()?;
            limits.check_len("consensus program", &commitment.consensus_program)?;
            Ok::<_, LegacyError>(())
        })?;

        let mut witness = BlockWitness::default();
        let mut witness_suffix = Vec::new();
        if serflags & SER_BLOCK_WITNESS != 0 {
            witness_suffix = r.read_extensible_string(|r| {
                witness.witness = r.read_varstr_list()?;
                limits.check_list("block witness", &witness.witness)?;
                Ok::<_, LegacyError>(())
            })?;
        }

        Ok((
            Self {
                version,
                height,
                previous_block_id,
                timestamp_ms,
                commitment,
                commitment_suffix,
                witness,
                witness_suffix,
            },
            serflags,
        ))
    }

    pub fn to_hex(&self) -> LegacyResult<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    pub fn from_hex(text: &str) -> LegacyResult<Self> {
        Self::from_bytes(&decode_hex(text)?)
    }
}

// =============================================================================
// BLOCK
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<TxData>,
}

impl Block {
    /// Full encoding: header, witness and transactions.
    pub fn to_bytes(&self) -> LegacyResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, SER_BLOCK_FULL)?;
        Ok(buf)
    }

    pub fn write_to<W: ByteSink + ?Sized>(&self, w: &mut W, serflags: u8) -> LegacyResult<()> {
        self.header.write_to(w, serflags)?;
        if serflags & SER_BLOCK_TRANSACTIONS != 0 {
            write_varint31(w, self.transactions.len() as u64)?;
            for tx in &self.transactions {
                tx.write_to(w, SER_VALID)?;
            }
        }
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> LegacyResult<Self> {
        Self::from_bytes_with_limits(bytes, &DecodeLimits::default())
    }

    pub fn from_bytes_with_limits(bytes: &[u8], limits: &DecodeLimits) -> LegacyResult<Self> {
        let mut r = Reader::new(bytes);
        let (header, serflags) = BlockHeader::read_from(&mut r, limits)?;
        let mut transactions = Vec::new();
        if serflags & SER_BLOCK_TRANSACTIONS != 0 {
            let n = limits.check_transactions(r.read_varint31()?.0)?;
            transactions.reserve(n.min(r.remaining()));
            for _ in 0..n {
                transactions.push(TxData::read_from(&mut r, limits)?);
            }
        }
        r.finish()?;
        Ok(Self {
            header,
            transactions,
        })
    }

    pub fn to_hex(&self) -> LegacyResult<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    pub fn from_hex(text: &str) -> LegacyResult<Self> {
        Self::from_bytes(&decode_hex(text)?)
    }
}

fn decode_hex(text: &str) -> LegacyResult<Vec<u8>> {
    hex::decode(text.trim()).map_err(|e| LegacyError::InvalidHex(e.to_string()))
}

macro_rules! impl_hex_text {
    ($name:ident) => {
        impl FromStr for $name {
            type Err = LegacyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let text = self.to_hex().map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let text = self.to_hex().map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&text)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::from_hex(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_hex_text!(BlockHeader);
impl_hex_text!(Block);

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::EncodingError;

    fn header() -> BlockHeader {
        BlockHeader {
            version: 1,
            height: 2,
            previous_block_id: Hash::new([1; 32]),
            timestamp_ms: 1000,
            commitment: BlockCommitment {
                transactions_root: Hash::new([2; 32]),
                assets_root: Hash::new([3; 32]),
                consensus_program: vec![0x51],
            },
            witness: BlockWitness {
                witness: vec![vec![0xaa; 4]],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_header_roundtrip() {
        let h = header();
        assert_eq!(BlockHeader::from_bytes(&h.to_bytes().unwrap()).unwrap(), h);
    }

    #[test]
    fn test_sig_hash_form_omits_witness() {
        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf, SER_BLOCK_SIG_HASH).unwrap();
        let decoded = BlockHeader::from_bytes(&buf).unwrap();
        assert!(decoded.witness.witness.is_empty());
        assert_eq!(decoded.commitment, h.commitment);
    }

    #[test]
    fn test_unknown_block_flags() {
        let mut bytes = header().to_bytes().unwrap();
        bytes[0] = 0x04;
        assert_eq!(
            BlockHeader::from_bytes(&bytes),
            Err(LegacyError::InvalidBlockSerFlags(0x04))
        );
    }

    #[test]
    fn test_block_roundtrip() {
        let block = Block {
            header: header(),
            transactions: vec![
                TxData {
                    version: 1,
                    ..Default::default()
                },
                TxData {
                    version: 1,
                    reference_data: b"second".to_vec(),
                    ..Default::default()
                },
            ],
        };
        let bytes = block.to_bytes().unwrap();
        assert_eq!(bytes[0], SER_BLOCK_FULL);
        assert_eq!(Block::from_bytes(&bytes).unwrap(), block);
    }

    #[test]
    fn test_block_header_only_has_no_transactions() {
        let bytes = header().to_bytes().unwrap();
        let block = Block::from_bytes(&bytes).unwrap();
        assert_eq!(block.header, header());
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn test_block_trailing_garbage() {
        let mut bytes = Block::default().to_bytes().unwrap();
        bytes.push(1);
        assert_eq!(
            Block::from_bytes(&bytes),
            Err(LegacyError::Encoding(EncodingError::TrailingGarbage(1)))
        );
    }

    #[test]
    fn test_commitment_suffix_preserved() {
        let mut h = header();
        h.commitment_suffix = vec![9, 8, 7];
        h.witness_suffix = vec![6];
        let bytes = h.to_bytes().unwrap();
        let decoded = BlockHeader::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, h);
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_header_hash_ignores_witness() {
        let h = header();
        let mut other = h.clone();
        other.witness.witness = vec![vec![0xbb]];
        assert_eq!(h.hash().unwrap(), other.hash().unwrap());
    }

    #[test]
    fn test_hex_text() {
        let h = header();
        let text = h.to_string();
        assert_eq!(text.parse::<BlockHeader>().unwrap(), h);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{text}\""));
    }
}
