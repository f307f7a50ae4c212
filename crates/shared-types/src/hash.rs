//! # Hash Primitives
//!
//! 32-byte identifiers and the SHA3-256 hasher that produces them.
//!
//! A `Hash` is only ever produced by hashing canonically encoded bytes. It is
//! used both as a content identifier (entry ID, transaction ID, block ID) and
//! as a reference field inside other entries. Text form is fixed-length
//! lowercase hex.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::encoding::{ByteSink, Reader};
use crate::errors::{EncodingResult, HashError};

macro_rules! hash_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; 32]);

            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse exactly 64 hex digits.
            pub fn from_hex(text: &str) -> Result<Self, HashError> {
                if text.len() != 64 {
                    return Err(HashError::InvalidLength(text.len()));
                }
                let mut out = [0u8; 32];
                hex::decode_to_slice(text, &mut out)
                    .map_err(|e| HashError::InvalidHex(e.to_string()))?;
                Ok(Self(out))
            }

            /// Write the raw 32 bytes. No length prefix: the width is implicit.
            pub fn write_to<W: ByteSink + ?Sized>(&self, w: &mut W) -> usize {
                w.put(&self.0);
                32
            }

            pub fn read_from(r: &mut Reader<'_>) -> EncodingResult<Self> {
                Ok(Self(r.read_array::<32>()?))
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; 32] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        // Storage adapter: column values are raw 32-byte blobs.
        impl TryFrom<&[u8]> for $name {
            type Error = HashError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let arr: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| HashError::InvalidByteLength(bytes.len()))?;
                Ok(Self(arr))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = HashError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
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

hash_newtype!(
    /// A 256-bit content hash.
    Hash
);

hash_newtype!(
    /// A 256-bit asset identifier, derived from an asset definition.
    AssetId
);

// =============================================================================
// HASHER
// =============================================================================

/// Stateful SHA3-256 hasher.
#[derive(Clone, Default)]
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    pub fn new() -> Self {
        Self {
            inner: Sha3_256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> Hash {
        Hash(self.inner.finalize().into())
    }
}

impl ByteSink for Sha3Hasher {
    fn put(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }
}

/// Hash data with SHA3-256 (one-shot).
pub fn sha3_256(data: &[u8]) -> Hash {
    Hash(Sha3_256::digest(data).into())
}
