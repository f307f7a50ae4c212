//! # Transaction Data
//!
//! ```text
//! TxData = serflags
//!          varint63 version
//!          extensible(varint63 min_time_ms  varint63 max_time_ms)
//!          extensible(<common witness, empty>)
//!          varint31 n  TxInput * n
//!          varint31 n  TxOutput * n
//!          reference data
//! ```
//!
//! Reference data is a varstr31 of the raw bytes when `SER_METADATA` is set,
//! otherwise a varstr31 of its SHA3 hash (empty data stays empty).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_types::encoding::{write_extensible_string, write_varint31, write_varint63, write_varstr31};
use shared_types::{sha3_256, ByteSink, Reader};

use super::errors::{LegacyError, LegacyResult};
use super::tx_input::TxInput;
use super::tx_output::TxOutput;
use super::value_objects::*;

/// A transaction in the legacy wire model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxData {
    pub version: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub min_time_ms: u64,
    pub max_time_ms: u64,
    pub reference_data: Vec<u8>,
    pub common_fields_suffix: Vec<u8>,
    pub common_witness_suffix: Vec<u8>,
}

impl TxData {
    /// Canonical encoding with every section present.
    pub fn to_bytes(&self) -> LegacyResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, SER_VALID)?;
        Ok(buf)
    }

    /// Encode with an explicit flag combination.
    pub fn write_to<W: ByteSink + ?Sized>(&self, w: &mut W, serflags: u8) -> LegacyResult<()> {
        w.put(&[serflags]);
        write_varint63(w, self.version)?;
        write_extensible_string(w, &self.common_fields_suffix, |w| {
            write_varint63(w, self.min_time_ms)?;
            write_varint63(w, self.max_time_ms)?;
            Ok::<_, LegacyError>(())
        })?;
        write_extensible_string(w, &self.common_witness_suffix, |_| {
            Ok::<_, LegacyError>(())
        })?;
        write_varint31(w, self.inputs.len() as u64)?;
        for input in &self.inputs {
            input.write_to(w, serflags)?;
        }
        write_varint31(w, self.outputs.len() as u64)?;
        for output in &self.outputs {
            output.write_to(w, serflags)?;
        }
        write_ref_data(w, &self.reference_data, serflags)
    }

    /// Decode a complete transaction; trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> LegacyResult<Self> {
        Self::from_bytes_with_limits(bytes, &DecodeLimits::default())
    }

    pub fn from_bytes_with_limits(bytes: &[u8], limits: &DecodeLimits) -> LegacyResult<Self> {
        let mut r = Reader::new(bytes);
        let tx = Self::read_from(&mut r, limits)?;
        r.finish()?;
        Ok(tx)
    }

    pub(crate) fn read_from(r: &mut Reader<'_>, limits: &DecodeLimits) -> LegacyResult<Self> {
        let serflags = r.read_byte()?;
        if serflags != SER_VALID {
            return Err(LegacyError::InvalidSerFlags(serflags));
        }
        let version = r.read_varint63()?.0;

        let mut min_time_ms = 0;
        let mut max_time_ms = 0;
        let common_fields_suffix = r.read_extensible_string(|r| {
            min_time_ms = r.read_varint63()?.0;
            max_time_ms = r.read_varint63()?.0;
            Ok::<_, LegacyError>(())
        })?;
        let common_witness_suffix = r.read_extensible_string(|_| Ok::<_, LegacyError>(()))?;

        let n = limits.check_inputs(r.read_varint31()?.0)?;
        let mut inputs = Vec::with_capacity(n.min(r.remaining()));
        for _ in 0..n {
            inputs.push(TxInput::read_from(r, limits)?);
        }

        let n = limits.check_outputs(r.read_varint31()?.0)?;
        let mut outputs = Vec::with_capacity(n.min(r.remaining()));
        for _ in 0..n {
            outputs.push(TxOutput::read_from(r, limits)?);
        }

        let reference_data = read_ref_data(r, limits, "reference data")?;

        Ok(Self {
            version,
            inputs,
            outputs,
            min_time_ms,
            max_time_ms,
            reference_data,
            common_fields_suffix,
            common_witness_suffix,
        })
    }

    /// Lowercase hex of the canonical encoding.
    pub fn to_hex(&self) -> LegacyResult<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    pub fn from_hex(text: &str) -> LegacyResult<Self> {
        let bytes = hex::decode(text.trim()).map_err(|e| LegacyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl FromStr for TxData {
    type Err = LegacyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for TxData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_hex().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for TxData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_hex().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for TxData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// REFERENCE DATA
// =============================================================================

pub(crate) fn write_ref_data<W: ByteSink + ?Sized>(
    w: &mut W,
    data: &[u8],
    serflags: u8,
) -> LegacyResult<()> {
    if serflags & SER_METADATA != 0 {
        write_varstr31(w, data)?;
    } else if data.is_empty() {
        write_varstr31(w, &[])?;
    } else {
        write_varstr31(w, sha3_256(data).as_bytes())?;
    }
    Ok(())
}

pub(crate) fn read_ref_data(
    r: &mut Reader<'_>,
    limits: &DecodeLimits,
    field: &'static str,
) -> LegacyResult<Vec<u8>> {
    let data = r.read_varstr31()?;
    limits.check_len(field, &data)?;
    Ok(data)
}
