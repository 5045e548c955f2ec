// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Provides [`Measure`], a [`Write`] that only counts.
//!
//! Encoders in this crate are run twice: once against a `Measure`, to learn
//! how large a buffer they need, and once against that buffer. Because the
//! first pass runs the same validation as the second, an invalid value is
//! rejected before any buffer is allocated for it.
//!
//! [`Write`]: ../trait.Write.html

use crate::io;
use crate::io::Write;

/// A [`Write`] which discards its input, recording only its length.
///
/// [`Write`]: ../trait.Write.html
#[derive(Copy, Clone, Debug, Default)]
pub struct Measure {
    len: usize,
}

impl Measure {
    /// Creates a new, empty `Measure`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Write for Measure {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), io::Error> {
        self.len = self
            .len
            .checked_add(buf.len())
            .ok_or(io::Error::BufferExhausted)?;
        Ok(())
    }
}
