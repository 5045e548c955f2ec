// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_chassis_cap` request and response.

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

/// A command for requesting the capabilities of the chassis.
pub enum GetChassisCap {}

/// The descriptor for [`GetChassisCap`].
///
/// [`GetChassisCap`]: enum.GetChassisCap.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_chassis_cap",
    netfn: NetFn::Chassis,
    code: 0x00,
    description: "Get Chassis Capabilities",
    completion_codes: &[],
    response_len: Length::OneOf(&[5, 6]),
};

impl Command<'_> for GetChassisCap {
    type Req = GetChassisCapRequest;
    type Resp = GetChassisCapResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

wire_record! {
    /// The [`GetChassisCap`] request.
    ///
    /// [`GetChassisCap`]: enum.GetChassisCap.html
    pub struct GetChassisCapRequest {}
}

/// A chassis capability.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ChassisCapability {
    /// Provides a power interlock.
    Power = 0x08,
    /// Provides a diagnostic interrupt.
    Diag = 0x04,
    /// Provides a front panel lockout.
    Lockout = 0x02,
    /// Provides an intrusion sensor.
    Intrusion = 0x01,
}

/// The [`GetChassisCap`] response.
///
/// [`GetChassisCap`]: enum.GetChassisCap.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GetChassisCapResponse {
    /// The capabilities of the chassis.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::serde::flag_names")
    )]
    pub capabilities: BitFlags<ChassisCapability>,
    /// The address of the FRU info device.
    pub fru_addr: u8,
    /// The address of the SDR device.
    pub sdr_addr: u8,
    /// The address of the SEL device.
    pub sel_addr: u8,
    /// The address of the system management device.
    pub sysmgmt_addr: u8,
    /// The address of the bridge device, if the BMC reports one.
    pub bridge_addr: Option<u8>,
}

impl<'wire> FromWire<'wire> for GetChassisCapResponse {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let capabilities = BitFlags::from_bits_truncate(r.read_le::<u8>()?);
        let fru_addr = r.read_le::<u8>()?;
        let sdr_addr = r.read_le::<u8>()?;
        let sel_addr = r.read_le::<u8>()?;
        let sysmgmt_addr = r.read_le::<u8>()?;
        let bridge_addr = if r.remaining_data() > 0 {
            Some(r.read_le::<u8>()?)
        } else {
            None
        };
        Ok(Self {
            capabilities,
            fru_addr,
            sdr_addr,
            sel_addr,
            sysmgmt_addr,
            bridge_addr,
        })
    }
}

impl ToWire for GetChassisCapResponse {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        w.write_le::<u8>(self.capabilities.bits())?;
        w.write_le::<u8>(self.fru_addr)?;
        w.write_le::<u8>(self.sdr_addr)?;
        w.write_le::<u8>(self.sel_addr)?;
        w.write_le::<u8>(self.sysmgmt_addr)?;
        if let Some(addr) = self.bridge_addr {
            w.write_le::<u8>(addr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    round_trip_test! {
        request_round_trip: {
            bytes: &[],
            value: GetChassisCapRequest {},
        },
        without_bridge: {
            bytes: &[0x09, 0x20, 0x20, 0x20, 0x20],
            value: GetChassisCapResponse {
                capabilities: ChassisCapability::Power
                    | ChassisCapability::Intrusion,
                fru_addr: 0x20,
                sdr_addr: 0x20,
                sel_addr: 0x20,
                sysmgmt_addr: 0x20,
                bridge_addr: None,
            },
        },
        with_bridge: {
            bytes: &[0x00, 0x20, 0x20, 0x20, 0x20, 0x22],
            value: GetChassisCapResponse {
                capabilities: BitFlags::empty(),
                fru_addr: 0x20,
                sdr_addr: 0x20,
                sel_addr: 0x20,
                sysmgmt_addr: 0x20,
                bridge_addr: Some(0x22),
            },
        },
    }
}
