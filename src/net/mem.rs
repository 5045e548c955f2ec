// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! A scripted, in-memory [`Transport`].
//!
//! [`Transport`]: ../trait.Transport.html

use std::collections::VecDeque;
use std::time::Duration;

use crate::net::Error;
use crate::net::Transport;

/// A function that plays the part of a BMC: given a datagram sent to it, it
/// returns the datagrams it sends back.
pub type Responder<'a> = Box<dyn FnMut(&[u8]) -> Vec<Vec<u8>> + 'a>;

/// An in-memory [`Transport`].
///
/// Every sent datagram is recorded, and passed to an optional responder
/// whose replies are queued for receiving. Receiving from an empty queue
/// returns immediately with nothing, as though the timeout had elapsed.
///
/// ```
/// # use std::time::Duration;
/// # use ipmilan::net::Transport;
/// # use ipmilan::net::mem::InMemTransport;
/// let mut t = InMemTransport::with_responder(|d| vec![d.to_vec()]);
/// t.send(&[1, 2, 3])?;
///
/// let mut buf = [0; 8];
/// assert_eq!(t.recv(&mut buf, Duration::from_secs(1))?, Some(3));
/// assert_eq!(t.recv(&mut buf, Duration::from_secs(1))?, None);
/// assert_eq!(t.sent(), &[vec![1, 2, 3]]);
/// # Ok::<(), ipmilan::net::Error>(())
/// ```
///
/// [`Transport`]: ../trait.Transport.html
#[derive(Default)]
pub struct InMemTransport<'a> {
    sent: Vec<Vec<u8>>,
    inbox: VecDeque<Vec<u8>>,
    responder: Option<Responder<'a>>,
}

impl<'a> InMemTransport<'a> {
    /// Creates a transport with no responder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that answers with `responder`.
    pub fn with_responder(
        responder: impl FnMut(&[u8]) -> Vec<Vec<u8>> + 'a,
    ) -> Self {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    /// Queues a datagram for receiving.
    pub fn push(&mut self, datagram: &[u8]) {
        self.inbox.push_back(datagram.to_vec());
    }

    /// Returns every datagram sent so far.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl Transport for InMemTransport<'_> {
    fn send(&mut self, datagram: &[u8]) -> Result<(), Error> {
        self.sent.push(datagram.to_vec());
        if let Some(responder) = &mut self.responder {
            self.inbox.extend(responder(datagram));
        }
        Ok(())
    }

    fn recv(
        &mut self,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<Option<usize>, Error> {
        let datagram = match self.inbox.pop_front() {
            Some(d) => d,
            None => return Ok(None),
        };
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok(Some(len))
    }
}
