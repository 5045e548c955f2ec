// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Pluggable cryptography traits.
//!
//! IPMI 1.5 needs very little cryptography: a digest for computing
//! AuthCodes, and a source of random numbers for proposing a session
//! sequence number. This module provides object-safe traits that abstract
//! over both, so that callers can swap in their own implementations.
//!
//! It is recommended to not import the traits in this module directly, since
//! a lot of them have the same name. Instead, use imports like
//! `use ipmilan::crypto::hash;` and partially-qualified names like
//! `hash::Engine`.
//!
//! A software MD5 engine, based on the [`md-5`] crate, is always available
//! under [`md5`]. An OS-backed random number generator is provided under the
//! [`ring` module], controlled by the `ring` and `std` feature flags.
//!
//! [`md-5`]: https://docs.rs/md-5
//! [`md5`]: md5/index.html
//! [`ring` module]: ring/index.html

pub mod authcode;
pub mod csrng;
pub mod hash;
pub mod md5;

#[cfg(feature = "ring")]
pub mod ring;
