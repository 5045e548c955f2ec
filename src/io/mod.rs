// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! I/O interfaces, in lieu of [`std::io`].
//!
//! These traits are intended for manipulating the byte buffers that carry
//! individual datagrams: every IPMI message fits in a single UDP datagram,
//! so there is never any need for streaming or partial I/O.
//!
//! [`std::io`]: https://doc.rust-lang.org/std/io/index.html

pub mod cursor;
pub mod endian;
pub mod measure;
pub mod read;
pub mod write;

pub use cursor::Cursor;
pub use measure::Measure;
pub use read::Read;
pub use write::Write;

/// A generic, low-level I/O error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that some underlying buffer has been completely used up,
    /// either for reading from or writing to.
    ///
    /// When decoding, this is how a truncated datagram shows up.
    BufferExhausted,

    /// Indicates that an unspecified, internal failure occurred.
    Internal,
}
