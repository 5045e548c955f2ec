// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Provides the [`Read`] trait, a zero-copy analogue of [`std::io::Read`].
//!
//! [`std::io::Read`]: https://doc.rust-lang.org/std/io/trait.Read.html

use crate::io;
use crate::io::endian::BeInt;
use crate::io::endian::LeInt;

/// Represents a place that bytes can be read from, such as a `&[u8]`.
///
/// Unlike [`std::io::Read`], this trait is intended for performing exact reads
/// out of a buffer with a fixed lifetime; hence, the additional lifetime
/// argument. Byte ranges are handed out as borrows of the underlying buffer,
/// rather than being copied out.
///
/// [`std::io::Read`]: https://doc.rust-lang.org/std/io/trait.Read.html
pub trait Read<'a> {
    /// Reads exactly `n` bytes from `self`.
    ///
    /// This function does not perform partial reads: it will either return
    /// exactly `n` bytes or an error.
    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], io::Error>;

    /// Returns the number of bytes still available to read.
    fn remaining_data(&self) -> usize;

    /// Reads a little-endian integer.
    #[inline]
    fn read_le<I: LeInt>(&mut self) -> Result<I, io::Error> {
        I::read_from(self)
    }

    /// Reads a big-endian integer.
    #[inline]
    fn read_be<I: BeInt>(&mut self) -> Result<I, io::Error> {
        I::read_be_from(self)
    }

    /// Reads every remaining byte.
    #[inline]
    fn read_rest(&mut self) -> Result<&'a [u8], io::Error> {
        let n = self.remaining_data();
        self.read_bytes(n)
    }
}

impl<'a, R: Read<'a> + ?Sized> Read<'a> for &'_ mut R {
    #[inline]
    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], io::Error> {
        R::read_bytes(*self, n)
    }

    #[inline]
    fn remaining_data(&self) -> usize {
        R::remaining_data(*self)
    }
}

impl<'a> Read<'a> for &'a [u8] {
    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], io::Error> {
        if self.len() < n {
            return Err(io::Error::BufferExhausted);
        }

        let (result, rest) = self.split_at(n);
        *self = rest;
        Ok(result)
    }

    fn remaining_data(&self) -> usize {
        self.len()
    }
}
