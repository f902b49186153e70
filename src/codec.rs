// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! Canonical binary encoding for protocol messages.
//!
//! Every message type has exactly one canonical byte encoding: fields are
//! concatenated in declaration order, variable-length fields are prefixed
//! with a big-endian `u32` length, and decoders reject both malformed
//! lengths and trailing bytes. This is deliberately hand-rolled rather than
//! derived from `serde`, since the round-trip law requires byte-exact
//! control that a generic serializer does not guarantee.

use std::convert::TryInto;

use crate::Error;

/// A type with a canonical, self-delimiting binary encoding.
pub trait Codec: Sized {
    /// Encode `self` to its canonical byte representation.
    fn encode(&self) -> Vec<u8>;

    /// Decode a value from its canonical byte representation.
    ///
    /// Implementations must reject trailing bytes: `bytes` must be
    /// consumed exactly.
    fn decode(bytes: &[u8]) -> Result<Self, Error>;
}

/// Append a length-prefixed byte string: a big-endian `u32` length followed
/// by the bytes themselves.
pub fn put_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    let len: u32 = data
        .len()
        .try_into()
        .expect("encoded field exceeds u32::MAX bytes");
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(data);
}

/// Append a fixed-width byte array without a length prefix.
pub fn put_fixed(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(data);
}

/// Append a `u32` in big-endian order.
pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Append a `u64` in big-endian order.
pub fn put_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// A cursor over a byte slice used while decoding. Tracks how many bytes
/// have been consumed so callers can reject trailing data.
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Wrap `bytes` for sequential decoding.
    pub fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    /// Read exactly `n` bytes, advancing the cursor.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n).ok_or(Error::MalformedMessage)?;
        let slice = self.bytes.get(self.pos..end).ok_or(Error::MalformedMessage)?;
        self.pos = end;
        Ok(slice)
    }

    /// Read a fixed-size array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let slice = self.take(N)?;
        slice.try_into().map_err(|_| Error::MalformedMessage)
    }

    /// Read a big-endian `u32`.
    pub fn take_u32(&mut self) -> Result<u32, Error> {
        let arr = self.take_array::<4>()?;
        Ok(u32::from_be_bytes(arr))
    }

    /// Read a big-endian `u64`.
    pub fn take_u64(&mut self) -> Result<u64, Error> {
        let arr = self.take_array::<8>()?;
        Ok(u64::from_be_bytes(arr))
    }

    /// Read a length-prefixed byte string.
    pub fn take_bytes(&mut self) -> Result<&'a [u8], Error> {
        let len = self.take_u32()? as usize;
        self.take(len)
    }

    /// Confirm every byte was consumed; otherwise `MalformedMessage`
    /// (trailing bytes, per the round-trip/rejection rule).
    pub fn finish(self) -> Result<(), Error> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(Error::MalformedMessage)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_rejects_trailing_bytes() {
        let mut buf = Vec::new();
        put_u32(&mut buf, 7);
        buf.push(0xff);

        let mut cur = Cursor::new(&buf);
        assert_eq!(cur.take_u32().unwrap(), 7);
        assert!(cur.finish().is_err());
    }

    #[test]
    fn length_prefixed_round_trips() {
        let mut buf = Vec::new();
        put_bytes(&mut buf, b"hello");
        let mut cur = Cursor::new(&buf);
        assert_eq!(cur.take_bytes().unwrap(), b"hello");
        assert!(cur.finish().is_ok());
    }
}
