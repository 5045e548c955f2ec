// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Implementations of crypto traits, using the [`ring`] crate.
//!
//! `ring` does not implement MD5, so only the entropy source lives here; see
//! [`crypto::md5`] for the digest. Everything in this module requires the
//! `std` feature flag, since it pulls entropy from the operating system.
//!
//! The [`ring` warranty disclaimer] applies to this module as well.
//!
//! [`crypto::md5`]: ../md5/index.html
//! [`ring` warranty disclaimer]: https://github.com/briansmith/ring/blob/main/README.md

#[cfg(feature = "std")]
pub mod csrng;
