//! # Canonical Encoding
//!
//! Deterministic binary primitives used by every hashed or serialized
//! structure in the protocol.
//!
//! ## Primitives
//!
//! - **varint**: unsigned LEB128, 1–10 bytes. Two bounded flavours exist:
//!   `varint31` (lengths and counts) and `varint63` (amounts, versions, times).
//! - **varstr31**: `varint31(len) || bytes`.
//! - **varstr list**: `varint31(count) || varstr31*`.
//! - **extensible string**: a varstr31 whose payload is produced by a
//!   caller-supplied writer. Unread trailing bytes of the payload are kept as
//!   a *suffix* and written back verbatim, so fields appended by newer
//!   protocol versions survive a decode/encode cycle untouched.
//! - **fixed width**: little-endian `u32` / `u64`.

use crate::errors::{EncodingError, EncodingResult};

/// Largest value encodable as a `varint31`.
pub const MAX_VARINT31: u64 = 0x7fff_ffff;

/// Largest value encodable as a `varint63`.
pub const MAX_VARINT63: u64 = 0x7fff_ffff_ffff_ffff;

/// Longest possible LEB128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

// =============================================================================
// SINK: where encoded bytes go
// =============================================================================

/// Destination for encoded bytes.
///
/// Encoding never fails because of the sink itself; only range checks on the
/// values being written can fail. Implemented for byte buffers and for the
/// SHA3 hasher so the same writers serve serialization and hashing.
pub trait ByteSink {
    fn put(&mut self, bytes: &[u8]);
}

impl ByteSink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn put(&mut self, bytes: &[u8]) {
        (**self).put(bytes);
    }
}

// =============================================================================
// WRITERS
// =============================================================================

fn put_uvarint<W: ByteSink + ?Sized>(w: &mut W, mut value: u64) -> usize {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut n = 0;
    while value >= 0x80 {
        buf[n] = (value as u8) | 0x80;
        value >>= 7;
        n += 1;
    }
    buf[n] = value as u8;
    n += 1;
    w.put(&buf[..n]);
    n
}

/// Write a varint bounded to 31 bits. Returns the number of bytes written.
pub fn write_varint31<W: ByteSink + ?Sized>(w: &mut W, value: u64) -> EncodingResult<usize> {
    if value > MAX_VARINT31 {
        return Err(EncodingError::Range { value, bits: 31 });
    }
    Ok(put_uvarint(w, value))
}

/// Write a varint bounded to 63 bits. Returns the number of bytes written.
pub fn write_varint63<W: ByteSink + ?Sized>(w: &mut W, value: u64) -> EncodingResult<usize> {
    if value > MAX_VARINT63 {
        return Err(EncodingError::Range { value, bits: 63 });
    }
    Ok(put_uvarint(w, value))
}

/// Write a length-prefixed byte string.
pub fn write_varstr31<W: ByteSink + ?Sized>(w: &mut W, data: &[u8]) -> EncodingResult<usize> {
    let n = write_varint31(w, data.len() as u64)?;
    w.put(data);
    Ok(n + data.len())
}

/// Write a count-prefixed list of length-prefixed byte strings.
pub fn write_varstr_list<W, T>(w: &mut W, items: &[T]) -> EncodingResult<usize>
where
    W: ByteSink + ?Sized,
    T: AsRef<[u8]>,
{
    let mut n = write_varint31(w, items.len() as u64)?;
    for item in items {
        n += write_varstr31(w, item.as_ref())?;
    }
    Ok(n)
}

/// Write an extensible string.
///
/// `f` writes the known fields; `suffix` (bytes a previous decode did not
/// understand) is appended after them, and the whole payload is emitted as a
/// varstr31.
pub fn write_extensible_string<W, F, E>(w: &mut W, suffix: &[u8], f: F) -> Result<usize, E>
where
    W: ByteSink + ?Sized,
    F: FnOnce(&mut Vec<u8>) -> Result<(), E>,
    E: From<EncodingError>,
{
    let mut payload = Vec::new();
    f(&mut payload)?;
    payload.extend_from_slice(suffix);
    Ok(write_varstr31(w, &payload)?)
}

/// Write a little-endian `u32`.
pub fn write_u32_le<W: ByteSink + ?Sized>(w: &mut W, value: u32) -> usize {
    w.put(&value.to_le_bytes());
    4
}

/// Write a little-endian `u64`.
pub fn write_u64_le<W: ByteSink + ?Sized>(w: &mut W, value: u64) -> usize {
    w.put(&value.to_le_bytes());
    8
}

/// Encode a value as a standalone varint63 buffer.
pub fn varint63_bytes(value: u64) -> EncodingResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(MAX_VARINT_LEN);
    write_varint63(&mut buf, value)?;
    Ok(buf)
}

// =============================================================================
// READER
// =============================================================================

/// Cursor over an immutable byte slice.
///
/// All reads are bounds-checked; lengths read from the input are compared
/// against the remaining bytes before anything is allocated.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Fail with `TrailingGarbage` if any bytes are left.
    pub fn finish(&self) -> EncodingResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(EncodingError::TrailingGarbage(n)),
        }
    }

    pub fn read_byte(&mut self) -> EncodingResult<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> EncodingResult<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(EncodingError::UnexpectedEof {
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> EncodingResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_uvarint(&mut self) -> EncodingResult<(u64, usize)> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        for i in 0..MAX_VARINT_LEN {
            let b = self.read_byte()?;
            if b < 0x80 {
                if i == MAX_VARINT_LEN - 1 && b > 1 {
                    return Err(EncodingError::VarintOverflow);
                }
                return Ok((value | (u64::from(b) << shift), i + 1));
            }
            value |= u64::from(b & 0x7f) << shift;
            shift += 7;
        }
        Err(EncodingError::VarintOverflow)
    }

    /// Read a varint bounded to 31 bits. Returns the value and its width.
    pub fn read_varint31(&mut self) -> EncodingResult<(u64, usize)> {
        let (value, n) = self.read_uvarint()?;
        if value > MAX_VARINT31 {
            return Err(EncodingError::Range { value, bits: 31 });
        }
        Ok((value, n))
    }

    /// Read a varint bounded to 63 bits. Returns the value and its width.
    pub fn read_varint63(&mut self) -> EncodingResult<(u64, usize)> {
        let (value, n) = self.read_uvarint()?;
        if value > MAX_VARINT63 {
            return Err(EncodingError::Range { value, bits: 63 });
        }
        Ok((value, n))
    }

    /// Read a length-prefixed byte string.
    pub fn read_varstr31(&mut self) -> EncodingResult<Vec<u8>> {
        let (len, _) = self.read_varint31()?;
        Ok(self.read_bytes(len as usize)?.to_vec())
    }

    /// Read a count-prefixed list of length-prefixed byte strings.
    pub fn read_varstr_list(&mut self) -> EncodingResult<Vec<Vec<u8>>> {
        let (count, _) = self.read_varint31()?;
        // Every element takes at least one byte.
        if count as usize > self.remaining() {
            return Err(EncodingError::UnexpectedEof {
                needed: count as usize,
                remaining: self.remaining(),
            });
        }
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(self.read_varstr31()?);
        }
        Ok(items)
    }

    /// Read an extensible string.
    ///
    /// `f` decodes the known fields from a sub-reader over the payload;
    /// whatever it leaves unread is returned as the suffix.
    pub fn read_extensible_string<F, E>(&mut self, f: F) -> Result<Vec<u8>, E>
    where
        F: FnOnce(&mut Reader<'a>) -> Result<(), E>,
        E: From<EncodingError>,
    {
        let (len, _) = self.read_varint31()?;
        let payload = self.read_bytes(len as usize)?;
        let mut inner = Reader::new(payload);
        f(&mut inner)?;
        Ok(inner.rest().to_vec())
    }

    pub fn read_u32_le(&mut self) -> EncodingResult<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_u64_le(&mut self) -> EncodingResult<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }
}
