// =============================================================================
// BIT KEYS: One-bit path representation
// =============================================================================

/// Bit path for tree traversal.
///
/// Each key byte expands to eight entries of `0` or `1`, most significant
/// bit first. A 32-byte output ID becomes 256 bits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitKey(pub Vec<u8>);

impl BitKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for byte in bytes {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1);
            }
        }
        BitKey(bits)
    }

    /// First `len` bits.
    pub fn prefix(&self, len: usize) -> Self {
        BitKey(self.0[..len].to_vec())
    }

    pub fn common_prefix_len(&self, other: &BitKey) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn starts_with(&self, prefix: &BitKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bit at index, as a child slot.
    pub fn at(&self, index: usize) -> usize {
        self.0[index] as usize
    }
}
