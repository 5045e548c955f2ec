// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_device_id` request and response.
//!
//! This command identifies the BMC: its device ID and revision, firmware
//! version, IPMI version, and the optional functions it implements.

use enumflags2::bitflags;
use enumflags2::BitFlags;

use crate::io::endian;
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

/// A command for requesting the identity of the BMC.
pub enum GetDeviceId {}

/// The descriptor for [`GetDeviceId`].
///
/// [`GetDeviceId`]: enum.GetDeviceId.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_device_id",
    netfn: NetFn::App,
    code: 0x01,
    description: "Get Device ID",
    completion_codes: &[],
    response_len: Length::AtLeast(6),
};

impl Command<'_> for GetDeviceId {
    type Req = GetDeviceIdRequest;
    type Resp = GetDeviceIdResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

wire_record! {
    /// The [`GetDeviceId`] request.
    ///
    /// [`GetDeviceId`]: enum.GetDeviceId.html
    pub struct GetDeviceIdRequest {}
}

/// An optional device function.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DeviceSupport {
    /// Chassis device.
    Chassis = 0x80,
    /// ICMB bridge.
    Bridge = 0x40,
    /// IPMB event generator.
    EventSend = 0x20,
    /// IPMB event receiver.
    EventRecv = 0x10,
    /// FRU inventory device.
    Fru = 0x08,
    /// SEL device.
    Sel = 0x04,
    /// SDR repository device.
    Sdr = 0x02,
    /// Sensor device.
    Sensor = 0x01,
}

/// The [`GetDeviceId`] response.
///
/// [`GetDeviceId`]: enum.GetDeviceId.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GetDeviceIdResponse {
    /// The device ID.
    pub device_id: u8,
    /// Whether the device provides device SDRs.
    pub provides_sdrs: bool,
    /// The device revision.
    pub revision: u8,
    /// Whether a firmware update is in progress.
    pub update_in_progress: bool,
    /// The major firmware revision.
    pub firmware_major: u8,
    /// The minor firmware revision, in BCD.
    pub firmware_minor: u8,
    /// The major IPMI version.
    pub ipmi_major: u8,
    /// The minor IPMI version.
    pub ipmi_minor: u8,
    /// The optional functions this device implements.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::serde::flag_names")
    )]
    pub support: BitFlags<DeviceSupport>,
    /// The IANA number of the manufacturer, if reported.
    pub manufacturer_id: Option<u32>,
    /// The manufacturer's product ID, if reported.
    pub product_id: Option<u16>,
}

impl<'wire> FromWire<'wire> for GetDeviceIdResponse {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let device_id = r.read_le::<u8>()?;
        let revision = r.read_le::<u8>()?;
        let firmware_major = r.read_le::<u8>()?;
        let firmware_minor = r.read_le::<u8>()?;
        let ipmi_version = r.read_le::<u8>()?;
        let support = r.read_le::<u8>()?;

        let (manufacturer_id, product_id) = if r.remaining_data() >= 5 {
            let m = endian::read_u24_le(r)?;
            let p = r.read_le::<u16>()?;
            (Some(m), Some(p))
        } else {
            (None, None)
        };
        // Auxiliary firmware revision, which is vendor-specific.
        let _ = r.read_rest()?;

        Ok(Self {
            device_id,
            provides_sdrs: revision & 0x80 != 0,
            revision: revision & 0x0f,
            update_in_progress: firmware_major & 0x80 != 0,
            firmware_major: firmware_major & 0x7f,
            firmware_minor,
            ipmi_major: ipmi_version & 0x0f,
            ipmi_minor: ipmi_version >> 4,
            support: BitFlags::from_bits_truncate(support),
            manufacturer_id,
            product_id,
        })
    }
}

impl ToWire for GetDeviceIdResponse {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        if self.revision > 0x0f
            || self.firmware_major > 0x7f
            || self.ipmi_major > 0x0f
            || self.ipmi_minor > 0x0f
        {
            return Err(wire::Error::OutOfRange);
        }
        let sdrs = if self.provides_sdrs { 0x80 } else { 0 };
        let updating = if self.update_in_progress { 0x80 } else { 0 };

        w.write_le::<u8>(self.device_id)?;
        w.write_le::<u8>(sdrs | self.revision)?;
        w.write_le::<u8>(updating | self.firmware_major)?;
        w.write_le::<u8>(self.firmware_minor)?;
        w.write_le::<u8>(self.ipmi_minor << 4 | self.ipmi_major)?;
        w.write_le::<u8>(self.support.bits())?;
        match (self.manufacturer_id, self.product_id) {
            (Some(m), Some(p)) => {
                if m > 0xff_ffff {
                    return Err(wire::Error::OutOfRange);
                }
                endian::write_u24_le(m, &mut w)?;
                w.write_le::<u16>(p)?;
            }
            (None, None) => {}
            _ => return Err(wire::Error::FieldPresence),
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
            value: GetDeviceIdRequest {},
        },
        minimal_response: {
            bytes: &[0x20, 0x81, 0x03, 0x14, 0x51, 0xbf],
            value: GetDeviceIdResponse {
                device_id: 0x20,
                provides_sdrs: true,
                revision: 1,
                update_in_progress: false,
                firmware_major: 3,
                firmware_minor: 0x14,
                ipmi_major: 1,
                ipmi_minor: 5,
                support: DeviceSupport::Chassis
                    | DeviceSupport::Fru
                    | DeviceSupport::Sel
                    | DeviceSupport::Sdr
                    | DeviceSupport::Sensor
                    | DeviceSupport::EventRecv
                    | DeviceSupport::EventSend,
                manufacturer_id: None,
                product_id: None,
            },
        },
        full_response: {
            bytes: &[
                0x20, 0x01, 0x83, 0x02, 0x02, 0x01,
                0x57, 0x01, 0x00,
                0x34, 0x12,
            ],
            value: GetDeviceIdResponse {
                device_id: 0x20,
                provides_sdrs: false,
                revision: 1,
                update_in_progress: true,
                firmware_major: 3,
                firmware_minor: 2,
                ipmi_major: 2,
                ipmi_minor: 0,
                support: DeviceSupport::Sensor.into(),
                manufacturer_id: Some(0x157),
                product_id: Some(0x1234),
            },
        },
    }

    #[test]
    fn auxiliary_revision_is_skipped() {
        let resp = wire::decode_exact::<GetDeviceIdResponse>(&[
            0x20, 0x01, 0x03, 0x02, 0x51, 0x00, 0x57, 0x01, 0x00, 0x34, 0x12,
            0xaa, 0xbb, 0xcc, 0xdd,
        ])
        .unwrap();
        assert_eq!(resp.manufacturer_id, Some(0x157));
        assert_eq!(resp.product_id, Some(0x1234));
        assert!(resp.support.is_empty());
    }
}
