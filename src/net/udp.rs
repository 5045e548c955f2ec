// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! A [`Transport`] over UDP.
//!
//! [`Transport`]: ../trait.Transport.html

use std::io::ErrorKind;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::net::SocketAddr;
use std::net::UdpSocket;
use std::time::Duration;
use std::time::Instant;

use crate::net::Error;
use crate::net::Transport;

/// A UDP socket talking to one BMC.
///
/// The socket is not connected; datagrams from any address other than the
/// BMC's are read and discarded, so that they never reach protocol decoding.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Binds an ephemeral local port for talking to `peer`.
    pub fn new(peer: SocketAddr) -> Result<Self, Error> {
        let local: IpAddr = match peer {
            SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
            SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
        };
        let socket = UdpSocket::bind((local, 0))?;
        info!("bound {:?} for BMC at {}", socket.local_addr(), peer);
        Ok(Self { socket, peer })
    }

    /// Returns the address of the BMC.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Returns the local address of the socket.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.socket.local_addr()?)
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, datagram: &[u8]) -> Result<(), Error> {
        self.socket.send_to(datagram, self.peer)?;
        Ok(())
    }

    fn recv(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<usize>, Error> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left == Duration::from_secs(0) {
                return Ok(None);
            }
            self.socket.set_read_timeout(Some(left))?;
            let (len, from) = match self.socket.recv_from(buf) {
                Ok(x) => x,
                Err(e)
                    if e.kind() == ErrorKind::WouldBlock
                        || e.kind() == ErrorKind::TimedOut =>
                {
                    return Ok(None)
                }
                Err(e) => return Err(e.into()),
            };
            if from.ip() != self.peer.ip() {
                warn!("DROP datagram from unexpected source {}", from);
                continue;
            }
            return Ok(Some(len));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    #[cfg_attr(miri, ignore)]
    fn loopback() {
        let bmc = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut t = UdpTransport::new(bmc.local_addr().unwrap()).unwrap();
        let client_port = t.local_addr().unwrap().port();

        t.send(&[0x06, 0x00, 0xff, 0x06]).unwrap();
        let mut buf = [0; 16];
        let (len, from) = bmc.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[0x06, 0x00, 0xff, 0x06]);
        assert_eq!(from.port(), client_port);

        bmc.send_to(&[1, 2, 3], from).unwrap();
        let len = t.recv(&mut buf, Duration::from_secs(5)).unwrap();
        assert_eq!(len, Some(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn times_out() {
        let bmc = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut t = UdpTransport::new(bmc.local_addr().unwrap()).unwrap();
        let mut buf = [0; 16];
        assert_eq!(t.recv(&mut buf, Duration::from_millis(20)).unwrap(), None);
    }
}
