// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `ipmilan` is a client-side implementation of IPMI 1.5 over LAN.
//!
//! The crate is organized in the same layers as the protocol itself:
//! - [`protocol::rmcp`], the outermost UDP framing.
//! - [`protocol::asf`], the ping/pong discovery messages carried by RMCP.
//! - [`protocol::ipmi`], the IPMI 1.5 session header.
//! - [`protocol::ipmb`], the request/response frame carried inside a session
//!   message, together with the catalog of commands it can carry.
//!
//! All of the above are pure codecs, built on the [`FromWire`] and [`ToWire`]
//! traits, and work without the standard library. With the `std` feature, the
//! crate additionally provides an [`inflight`] registry for correlating
//! responses with requests, a UDP [`net`] transport, and a [`client`] that
//! drives the session-establishment handshake.
//!
//! IPMI 2.0 (RMCP+) is recognized on the wire but deliberately unsupported;
//! attempting to use it fails with a descriptive error rather than a generic
//! decoding failure.
//!
//! [`FromWire`]: protocol/wire/trait.FromWire.html
//! [`ToWire`]: protocol/wire/trait.ToWire.html
//! [`inflight`]: inflight/index.html
//! [`net`]: net/index.html
//! [`client`]: client/index.html

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![deny(warnings)]
#![deny(unused)]
#![deny(unsafe_code)]

#[macro_use]
mod debug;
pub use debug::Error;
pub use debug::HexDump;

/// An `ipmilan` result, which wraps an [`Error`] around `E`.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[cfg(feature = "serde")]
mod serde;

pub mod io;

#[macro_use]
pub mod protocol;

pub mod crypto;

#[cfg(feature = "std")]
pub mod inflight;

#[cfg(feature = "std")]
pub mod net;

#[cfg(feature = "std")]
pub mod client;
