// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `close_session` request and response.

use crate::io::Read;
use crate::io::Write;
use crate::protocol::ipmb::NetFn;
use crate::protocol::wire;
use crate::protocol::wire::FromWire;
use crate::protocol::wire::ToWire;
use crate::protocol::Command;
use crate::protocol::Descriptor;
use crate::protocol::Length;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A command for closing a session.
pub enum CloseSession {}

/// The descriptor for [`CloseSession`].
///
/// [`CloseSession`]: enum.CloseSession.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "close_session",
    netfn: NetFn::App,
    code: 0x3c,
    description: "Close Session",
    completion_codes: &[
        (0x87, "invalid session ID in request"),
        (0x88, "invalid session handle in request"),
    ],
    response_len: Length::Exactly(0),
};

impl Command<'_> for CloseSession {
    type Req = CloseSessionRequest;
    type Resp = CloseSessionResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

/// The [`CloseSession`] request.
///
/// [`CloseSession`]: enum.CloseSession.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CloseSessionRequest {
    /// The session to close, which may not be zero.
    pub session_id: u32,
}

impl<'wire> FromWire<'wire> for CloseSessionRequest {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let session_id = r.read_le::<u32>()?;
        if session_id == 0 {
            return Err(wire::Error::OutOfRange);
        }
        Ok(Self { session_id })
    }
}

impl ToWire for CloseSessionRequest {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        if self.session_id == 0 {
            return Err(wire::Error::OutOfRange);
        }
        w.write_le(self.session_id)?;
        Ok(())
    }
}

wire_record! {
    /// The [`CloseSession`] response, which is empty.
    ///
    /// [`CloseSession`]: enum.CloseSession.html
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct CloseSessionResponse {}
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        request_round_trip: {
            bytes: &[0x00, 0x02, 0x00, 0x00],
            value: CloseSessionRequest { session_id: 0x200 },
        },
        response_round_trip: {
            bytes: &[],
            value: CloseSessionResponse {},
        },
    }

    #[test]
    fn session_zero_is_rejected() {
        let req = CloseSessionRequest { session_id: 0 };
        assert_eq!(req.wire_len(), Err(wire::Error::OutOfRange));
        assert_eq!(
            wire::decode_exact::<CloseSessionRequest>(&[0; 4]),
            Err(wire::Error::OutOfRange)
        );
    }
}
