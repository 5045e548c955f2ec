// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Provides a "cursor" over a mutable byte buffer.
//!
//! [`Cursor`] tracks how much of a buffer has been written, which lets an
//! encoder hand back exactly the populated prefix of a scratch buffer:
//! ```
//! # use ipmilan::io::*;
//! # use ipmilan::protocol::asf;
//! # use ipmilan::protocol::wire::ToWire;
//! let ping = asf::Packet::ping(7);
//! let mut buf = [0; 64];
//!
//! let mut cursor = Cursor::new(&mut buf);
//! ping.to_wire(&mut cursor).unwrap();
//! assert_eq!(cursor.consumed_len(), 8);
//! ```
//!
//! It also supports going back to patch bytes that can only be computed once
//! later fields are in place, such as IPMB checksums.

use core::mem;

use crate::io;
use crate::io::Write;

/// A cursor over a buffer of memory.
///
/// See the [module documentation](index.html) for more information.
pub struct Cursor<'a> {
    buf: &'a mut [u8],
    // Invariant: cursor <= buf.len().
    cursor: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new `Cursor` for the given buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, cursor: 0 }
    }

    /// Consumes `n` bytes from the underlying buffer.
    ///
    /// If `n` bytes are unavailable, `BufferExhausted` is returned.
    pub fn consume(&mut self, n: usize) -> Result<&mut [u8], io::Error> {
        let end = self
            .cursor
            .checked_add(n)
            .ok_or(io::Error::BufferExhausted)?;
        if self.buf.len() < end {
            return Err(io::Error::BufferExhausted);
        }
        let output = &mut self.buf[self.cursor..end];
        self.cursor = end;

        Ok(output)
    }

    /// Returns the number of bytes consumed thus far.
    pub fn consumed_len(&self) -> usize {
        self.cursor
    }

    /// Returns the portion of the buffer which has been consumed thus far.
    pub fn consumed_bytes(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }

    /// Returns the consumed bytes starting at offset `start`.
    ///
    /// Returns an empty slice if `start` is past the cursor.
    pub fn consumed_since(&self, start: usize) -> &[u8] {
        self.buf.get(start..self.cursor).unwrap_or(&[])
    }

    /// Takes the portion of the buffer which has been consumed so far,
    /// resetting the cursor value back to zero.
    ///
    /// Because this function returns a `'a` reference, it is not bound to the
    /// `Cursor` that originally contained it.
    pub fn take_consumed_bytes(&mut self) -> &'a mut [u8] {
        let (output, rest) = mem::take(&mut self.buf).split_at_mut(self.cursor);
        self.cursor = 0;
        self.buf = rest;
        output
    }
}

impl Write for Cursor<'_> {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), io::Error> {
        let dest = self.consume(buf.len())?;
        dest.copy_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cursor() {
        let mut buf = [0; 8];
        let mut cursor = Cursor::new(&mut buf);

        cursor.write_le::<u32>(0x12345678).unwrap();
        cursor.write_le::<u8>(0x81).unwrap();
        assert_eq!(cursor.consumed_len(), 5);
        assert_eq!(cursor.consumed_since(3), &[0x12, 0x81]);
        assert!(cursor.consumed_since(9).is_empty());

        let bytes = cursor.take_consumed_bytes();
        assert_eq!(bytes, &[0x78, 0x56, 0x34, 0x12, 0x81]);
        assert_eq!(cursor.consumed_len(), 0);

        assert!(cursor.write_bytes(&[0x55; 4]).is_err());
        cursor.write_bytes(&[0x55; 3]).unwrap();
    }
}
