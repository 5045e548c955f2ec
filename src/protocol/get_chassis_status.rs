// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_chassis_status` request and response.

use enumflags2::bitflags;
use enumflags2::BitFlags;

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

/// A command for requesting the power state of the chassis.
pub enum GetChassisStatus {}

/// The descriptor for [`GetChassisStatus`].
///
/// [`GetChassisStatus`]: enum.GetChassisStatus.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_chassis_status",
    netfn: NetFn::Chassis,
    code: 0x01,
    description: "Get Chassis Status",
    completion_codes: &[],
    response_len: Length::OneOf(&[3, 4]),
};

impl Command<'_> for GetChassisStatus {
    type Req = GetChassisStatusRequest;
    type Resp = GetChassisStatusResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

wire_record! {
    /// The [`GetChassisStatus`] request.
    ///
    /// [`GetChassisStatus`]: enum.GetChassisStatus.html
    pub struct GetChassisStatusRequest {}
}

/// A bit of the current power state.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PowerState {
    /// System power is on.
    On = 0x01,
    /// Power was shut down because of an overload.
    Overload = 0x02,
    /// A power interlock is active.
    Interlock = 0x04,
    /// A fault was detected in main power.
    Fault = 0x08,
    /// The power control subsystem has failed.
    ControlFault = 0x10,
}

/// A possible cause of the last power event.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PowerEvent {
    /// Power was turned on by an IPMI command.
    IpmiCommand = 0x10,
    /// Power went down because of a fault.
    Fault = 0x08,
    /// Power went down because of an interlock.
    Interlock = 0x04,
    /// Power went down because of an overload.
    Overload = 0x02,
    /// AC power was lost.
    AcFailed = 0x01,
}

const RESTORE_POLICY_SHIFT: u8 = 5;
const RESTORE_POLICY_MASK: u8 = 0x03;

/// The [`GetChassisStatus`] response.
///
/// [`GetChassisStatus`]: enum.GetChassisStatus.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GetChassisStatusResponse {
    /// The current power state.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::serde::flag_names")
    )]
    pub power: BitFlags<PowerState>,
    /// The power restore policy, as a two-bit field.
    pub restore_policy: u8,
    /// The causes of the last power event.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::serde::flag_names")
    )]
    pub last_power_event: BitFlags<PowerEvent>,
    /// The miscellaneous chassis state byte, undecoded.
    pub misc: u8,
    /// The front panel button capabilities, if the BMC reports them.
    pub front_panel: Option<u8>,
}

impl<'wire> FromWire<'wire> for GetChassisStatusResponse {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let power = r.read_le::<u8>()?;
        let last_power_event = r.read_le::<u8>()?;
        let misc = r.read_le::<u8>()?;
        let front_panel = if r.remaining_data() > 0 {
            Some(r.read_le::<u8>()?)
        } else {
            None
        };
        Ok(Self {
            power: BitFlags::from_bits_truncate(power),
            restore_policy: (power >> RESTORE_POLICY_SHIFT)
                & RESTORE_POLICY_MASK,
            last_power_event: BitFlags::from_bits_truncate(last_power_event),
            misc,
            front_panel,
        })
    }
}

impl ToWire for GetChassisStatusResponse {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        if self.restore_policy > RESTORE_POLICY_MASK {
            return Err(wire::Error::OutOfRange);
        }
        w.write_le::<u8>(
            self.power.bits() | self.restore_policy << RESTORE_POLICY_SHIFT,
        )?;
        w.write_le::<u8>(self.last_power_event.bits())?;
        w.write_le::<u8>(self.misc)?;
        if let Some(fp) = self.front_panel {
            w.write_le::<u8>(fp)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        request_round_trip: {
            bytes: &[],
            value: GetChassisStatusRequest {},
        },
        powered_on: {
            bytes: &[0x41, 0x10, 0x00],
            value: GetChassisStatusResponse {
                power: PowerState::On.into(),
                restore_policy: 2,
                last_power_event: PowerEvent::IpmiCommand.into(),
                misc: 0,
                front_panel: None,
            },
        },
        with_front_panel: {
            bytes: &[0x0a, 0x03, 0x01, 0x70],
            value: GetChassisStatusResponse {
                power: PowerState::Overload | PowerState::Fault,
                restore_policy: 0,
                last_power_event: PowerEvent::AcFailed | PowerEvent::Overload,
                misc: 1,
                front_panel: Some(0x70),
            },
        },
    }

    #[test]
    fn bad_restore_policy() {
        let resp = GetChassisStatusResponse {
            power: BitFlags::empty(),
            restore_policy: 4,
            last_power_event: BitFlags::empty(),
            misc: 0,
            front_panel: None,
        };
        assert_eq!(resp.wire_len(), Err(wire::Error::OutOfRange));
    }
}
