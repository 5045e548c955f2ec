// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_session_info` request and response.

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

/// A command for querying the state of a session.
pub enum GetSessionInfo {}

/// The descriptor for [`GetSessionInfo`].
///
/// [`GetSessionInfo`]: enum.GetSessionInfo.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_session_info",
    netfn: NetFn::App,
    code: 0x3d,
    description: "Get Session Info",
    completion_codes: &[],
    response_len: Length::Any,
};

impl Command<'_> for GetSessionInfo {
    type Req = GetSessionInfoRequest;
    type Resp = GetSessionInfoResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

const BY_HANDLE: u8 = 0xfe;
const BY_ID: u8 = 0xff;

/// Which session a [`GetSessionInfo`] request asks about.
///
/// [`GetSessionInfo`]: enum.GetSessionInfo.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SessionSelector {
    /// The session the request is sent in.
    Current,
    /// The session in the given slot, starting at one.
    Slot(u8),
    /// The session with the given handle.
    Handle(u8),
    /// The session with the given ID.
    Id(u32),
}

/// The [`GetSessionInfo`] request.
///
/// [`GetSessionInfo`]: enum.GetSessionInfo.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GetSessionInfoRequest {
    /// The session to describe.
    pub selector: SessionSelector,
}

impl<'wire> FromWire<'wire> for GetSessionInfoRequest {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let selector = match r.read_le::<u8>()? {
            0 => SessionSelector::Current,
            BY_HANDLE => SessionSelector::Handle(r.read_le()?),
            BY_ID => SessionSelector::Id(r.read_le()?),
            slot => SessionSelector::Slot(slot),
        };
        Ok(Self { selector })
    }
}

impl ToWire for GetSessionInfoRequest {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        match self.selector {
            SessionSelector::Current => w.write_le::<u8>(0)?,
            SessionSelector::Slot(n) => {
                if n == 0 || n >= BY_HANDLE {
                    return Err(wire::Error::OutOfRange);
                }
                w.write_le::<u8>(n)?
            }
            SessionSelector::Handle(h) => {
                w.write_le::<u8>(BY_HANDLE)?;
                w.write_le::<u8>(h)?;
            }
            SessionSelector::Id(id) => {
                w.write_le::<u8>(BY_ID)?;
                w.write_le::<u32>(id)?;
            }
        }
        Ok(())
    }
}

/// The [`GetSessionInfo`] response.
///
/// Only the session counts are decoded; the per-user details that follow
/// them vary with the channel type and are ignored.
///
/// [`GetSessionInfo`]: enum.GetSessionInfo.html
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GetSessionInfoResponse {
    /// The handle of the described session, or zero if there is none.
    pub handle: Option<u8>,
    /// The number of session slots the channel has.
    pub max_sessions: Option<u8>,
    /// The number of sessions currently active on the channel.
    pub active_sessions: Option<u8>,
}

impl<'wire> FromWire<'wire> for GetSessionInfoResponse {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let mut bytes = r.read_rest()?.iter().copied();
        Ok(Self {
            handle: bytes.next(),
            max_sessions: bytes.next().map(|b| b & 0x3f),
            active_sessions: bytes.next().map(|b| b & 0x3f),
        })
    }
}

impl ToWire for GetSessionInfoResponse {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        let fields = [self.handle, self.max_sessions, self.active_sessions];
        // Fields may only be omitted from the end.
        let present = fields.iter().take_while(|f| f.is_some()).count();
        if fields[present..].iter().any(Option::is_some) {
            return Err(wire::Error::FieldPresence);
        }
        for field in fields.iter().flatten() {
            w.write_le::<u8>(*field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        current_session: {
            bytes: &[0x00],
            value: GetSessionInfoRequest {
                selector: SessionSelector::Current,
            },
        },
        by_id: {
            bytes: &[0xff, 0x00, 0x02, 0x00, 0x00],
            value: GetSessionInfoRequest {
                selector: SessionSelector::Id(0x200),
            },
        },
        by_handle: {
            bytes: &[0xfe, 0x03],
            value: GetSessionInfoRequest {
                selector: SessionSelector::Handle(3),
            },
        },
        response_round_trip: {
            bytes: &[0x01, 0x04, 0x01],
            value: GetSessionInfoResponse {
                handle: Some(1),
                max_sessions: Some(4),
                active_sessions: Some(1),
            },
        },
        empty_response: {
            bytes: &[],
            value: GetSessionInfoResponse {
                handle: None,
                max_sessions: None,
                active_sessions: None,
            },
        },
    }

    #[test]
    fn details_are_skipped() {
        let resp = wire::decode_exact::<GetSessionInfoResponse>(&[
            0x01, 0xc4, 0x81, 0x02, 0x04, 0x01,
        ])
        .unwrap();
        assert_eq!(resp.max_sessions, Some(4));
        assert_eq!(resp.active_sessions, Some(1));
    }

    #[test]
    fn bad_selectors() {
        let req = GetSessionInfoRequest {
            selector: SessionSelector::Slot(0),
        };
        assert_eq!(req.wire_len(), Err(wire::Error::OutOfRange));

        let resp = GetSessionInfoResponse {
            handle: None,
            max_sessions: Some(1),
            active_sessions: None,
        };
        assert_eq!(resp.wire_len(), Err(wire::Error::FieldPresence));
    }
}
