// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic random numbers.

use core::fmt;

use crate::Result;

/// An error returned by a CSRNG.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    /// Indicates an unspecified, internal error.
    Unspecified,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("entropy source failure")
    }
}

/// A cryptographically-secure random number generator.
///
/// IPMI 1.5 uses randomness only for the sequence number a client proposes
/// when activating a session, which has no security role; a CSRNG is used
/// anyway so that callers need not supply two kinds of generator.
///
/// `Csrng`s must already be seeded with sufficient entropy; creating new
/// random number generators is beyond the scope of this trait.
pub trait Csrng {
    /// Fills `buf` with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), Error>;
}
impl dyn Csrng {} // Ensure object-safe.

/// Helpers for drawing integers from a [`Csrng`].
#[extend::ext(name = CsrngExt)]
pub impl<C: Csrng + ?Sized> C {
    /// Draws a uniformly random `u32`.
    fn next_u32(&mut self) -> Result<u32, Error> {
        let mut bytes = [0; 4];
        self.fill(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }
}
