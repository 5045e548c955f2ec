// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `set_session_priv_level` request and response.

use crate::io::Read;
use crate::io::Write;
use crate::protocol::ipmb::NetFn;
use crate::protocol::ipmi::PrivilegeLevel;
use crate::protocol::wire;
use crate::protocol::wire::FromWire;
use crate::protocol::wire::ToWire;
use crate::protocol::wire::WireEnum as _;
use crate::protocol::Command;
use crate::protocol::Descriptor;
use crate::protocol::Length;

#[cfg(feature = "arbitrary-derive")]
use libfuzzer_sys::arbitrary::{self, Arbitrary};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A command for raising (or lowering) the privilege level of the current
/// session.
///
/// Only [`User`], [`Operator`], [`Administrator`], and [`Oem`] can be
/// requested; the wire format has no way to express the others here.
///
/// [`User`]: ../ipmi/enum.PrivilegeLevel.html#variant.User
/// [`Operator`]: ../ipmi/enum.PrivilegeLevel.html#variant.Operator
/// [`Administrator`]: ../ipmi/enum.PrivilegeLevel.html#variant.Administrator
/// [`Oem`]: ../ipmi/enum.PrivilegeLevel.html#variant.Oem
pub enum SetSessionPrivLevel {}

/// The descriptor for [`SetSessionPrivLevel`].
///
/// [`SetSessionPrivLevel`]: enum.SetSessionPrivLevel.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "set_session_priv_level",
    netfn: NetFn::App,
    code: 0x3b,
    description: "Set Session Privilege Level",
    completion_codes: &[
        (0x80, "requested level not available for this user"),
        (
            0x81,
            "requested level exceeds channel and/or user privilege limit",
        ),
        (0x82, "cannot disable user level authentication"),
    ],
    response_len: Length::Exactly(1),
};

impl Command<'_> for SetSessionPrivLevel {
    type Req = SetSessionPrivLevelRequest;
    type Resp = SetSessionPrivLevelResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

/// The [`SetSessionPrivLevel`] request.
///
/// [`SetSessionPrivLevel`]: enum.SetSessionPrivLevel.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "arbitrary-derive", derive(Arbitrary))]
pub struct SetSessionPrivLevelRequest {
    /// The requested privilege level.
    pub privilege: PrivilegeLevel,
}

fn settable(level: PrivilegeLevel) -> bool {
    (2..=5).contains(&level.to_wire_value())
}

impl<'wire> FromWire<'wire> for SetSessionPrivLevelRequest {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let privilege = wire::lookup_value(r.read_le::<u8>()? & 0x0f)?;
        if !settable(privilege) {
            return Err(wire::Error::OutOfRange);
        }
        Ok(Self { privilege })
    }
}

impl ToWire for SetSessionPrivLevelRequest {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        if !settable(self.privilege) {
            return Err(wire::Error::OutOfRange);
        }
        w.write_le::<u8>(self.privilege.to_wire_value())?;
        Ok(())
    }
}

wire_record! {
    /// The [`SetSessionPrivLevel`] response.
    ///
    /// [`SetSessionPrivLevel`]: enum.SetSessionPrivLevel.html
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct SetSessionPrivLevelResponse {
        /// The new privilege level.
        pub privilege: PrivilegeLevel => lookup(0x0f),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        request_round_trip: {
            bytes: &[0x04],
            value: SetSessionPrivLevelRequest {
                privilege: PrivilegeLevel::Administrator,
            },
        },
        response_round_trip: {
            bytes: &[0x02],
            value: SetSessionPrivLevelResponse {
                privilege: PrivilegeLevel::User,
            },
        },
    }

    #[test]
    fn unsettable_levels() {
        for &privilege in &[PrivilegeLevel::None, PrivilegeLevel::Callback] {
            let req = SetSessionPrivLevelRequest { privilege };
            assert_eq!(req.wire_len(), Err(wire::Error::OutOfRange));
        }
        for &privilege in &[
            PrivilegeLevel::User,
            PrivilegeLevel::Operator,
            PrivilegeLevel::Administrator,
            PrivilegeLevel::Oem,
        ] {
            let req = SetSessionPrivLevelRequest { privilege };
            assert_eq!(req.wire_len(), Ok(1));
        }
    }
}
