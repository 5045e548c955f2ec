// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Datagram transports.
//!
//! The client does not care how datagrams reach the BMC; it only needs to
//! send one, and to wait a bounded amount of time for one to come back. This
//! module provides that abstraction as the [`Transport`] trait, together
//! with the UDP implementation used in practice ([`udp::UdpTransport`]) and
//! a scripted in-memory one for testing ([`mem::InMemTransport`]).
//!
//! [`Transport`]: trait.Transport.html
//! [`udp::UdpTransport`]: udp/struct.UdpTransport.html
//! [`mem::InMemTransport`]: mem/struct.InMemTransport.html

use core::fmt;
use std::time::Duration;

use crate::io;

pub mod mem;
pub mod udp;

/// The largest datagram a transport needs to be able to receive.
///
/// The largest IPMI 1.5 message is well under this, but a BMC may pad.
pub const MAX_DATAGRAM: usize = 1024;

/// A networking error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Indicates an underlying I/O error.
    Io(io::Error),
    /// Indicates an error from the operating system's socket layer.
    Socket(std::io::ErrorKind),
    /// Indicates that the other end of the transport has gone away.
    Disconnected,
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Socket(e.kind())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {:?}", e),
            Self::Socket(kind) => write!(f, "socket error: {:?}", kind),
            Self::Disconnected => f.write_str("transport disconnected"),
        }
    }
}

/// A datagram transport to a single BMC.
///
/// Implementations must only deliver datagrams that came from the BMC they
/// were created for; anything else is discarded before it reaches the
/// caller.
pub trait Transport {
    /// Sends one datagram.
    fn send(&mut self, datagram: &[u8]) -> Result<(), Error>;

    /// Waits up to `timeout` for a datagram, copying it into `buf`.
    ///
    /// Returns the length of the datagram, or `None` if nothing arrived in
    /// time. A datagram longer than `buf` is truncated.
    fn recv(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<usize>, Error>;
}
impl dyn Transport {} // Ensure object-safety.

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, datagram: &[u8]) -> Result<(), Error> {
        T::send(*self, datagram)
    }

    fn recv(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<usize>, Error> {
        T::recv(*self, buf, timeout)
    }
}
