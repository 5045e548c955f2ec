// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Provides the [`Write`] trait, analogous to [`std::io::Write`].
//!
//! [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html

use core::mem;

use crate::io;
use crate::io::endian::BeInt;
use crate::io::endian::LeInt;

/// Represents a place that bytes can be written to, such as a `&mut [u8]`.
pub trait Write {
    /// Attempt to write `buf` exactly to `self`.
    ///
    /// This function does not perform partial writes: it will either write
    /// all of `buf` or return an error.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), io::Error>;

    /// Writes a little-endian integer.
    #[inline]
    fn write_le<I: LeInt>(&mut self, val: I) -> Result<(), io::Error>
    where
        Self: Sized,
    {
        val.write_to(self)
    }

    /// Writes a big-endian integer.
    #[inline]
    fn write_be<I: BeInt>(&mut self, val: I) -> Result<(), io::Error>
    where
        Self: Sized,
    {
        val.write_be_to(self)
    }

    /// Writes `n` zero bytes.
    fn write_zeros(&mut self, n: usize) -> Result<(), io::Error> {
        const ZEROS: [u8; 16] = [0; 16];
        let mut left = n;
        while left > 0 {
            let chunk = left.min(ZEROS.len());
            self.write_bytes(&ZEROS[..chunk])?;
            left -= chunk;
        }
        Ok(())
    }
}
impl dyn Write {} // Ensure object-safety.

impl<W: Write + ?Sized> Write for &'_ mut W {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), io::Error> {
        W::write_bytes(*self, buf)
    }
}

impl Write for &'_ mut [u8] {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), io::Error> {
        let n = buf.len();
        if self.len() < n {
            return Err(io::Error::BufferExhausted);
        }

        let (dest, rest) = mem::take(self).split_at_mut(n);
        dest.copy_from_slice(buf);
        *self = rest;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::Read;

    #[test]
    fn read_and_write_bytes() {
        let mut buf = [0; 9];
        let mut bytes = &mut buf[..];
        bytes.write_bytes(&[0x06, 0x00]).unwrap();
        bytes.write_le::<u8>(0xff).unwrap();
        bytes.write_be::<u32>(4542).unwrap();
        assert_eq!(bytes.len(), 2);
        assert!(bytes.write_zeros(3).is_err());
        bytes.write_zeros(2).unwrap();
        assert_eq!(bytes.len(), 0);
        assert_eq!(&buf, &[0x06, 0x00, 0xff, 0x00, 0x00, 0x11, 0xbe, 0, 0]);

        let mut bytes = &buf[3..];
        assert_eq!(bytes.read_be::<u32>().unwrap(), 4542);
    }
}
