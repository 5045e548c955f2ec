// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_chan_auth_cap` request and response.
//!
//! This command asks the BMC which authentication types a channel supports
//! at a given privilege level. It is the first IPMI message of a session
//! handshake, sent outside of any session.

use enumflags2::bitflags;
use enumflags2::BitFlags;

use crate::io::Read;
use crate::io::Write;
use crate::protocol::ipmb::NetFn;
use crate::protocol::ipmi::AuthType;
use crate::protocol::ipmi::PrivilegeLevel;
use crate::protocol::wire;
use crate::protocol::wire::FromWire;
use crate::protocol::wire::ToWire;
use crate::protocol::Command;
use crate::protocol::Descriptor;
use crate::protocol::Length;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A command for querying the authentication capabilities of a channel.
pub enum GetChanAuthCap {}

/// The descriptor for [`GetChanAuthCap`].
///
/// [`GetChanAuthCap`]: enum.GetChanAuthCap.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_chan_auth_cap",
    netfn: NetFn::App,
    code: 0x38,
    description: "Get Channel Authentication Capabilities",
    completion_codes: &[],
    response_len: Length::AtLeast(3),
};

impl Command<'_> for GetChanAuthCap {
    type Req = GetChanAuthCapRequest;
    type Resp = GetChanAuthCapResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

/// The channel number meaning "the channel this request arrived on".
pub const THIS_CHANNEL: u8 = 0x0e;

wire_record! {
    /// The [`GetChanAuthCap`] request.
    ///
    /// [`GetChanAuthCap`]: enum.GetChanAuthCap.html
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct GetChanAuthCapRequest {
        /// The channel to query.
        pub channel: u8 => u8,
        /// The privilege level the session will request.
        pub privilege: PrivilegeLevel => lookup(0x0f),
    }
}

impl GetChanAuthCapRequest {
    /// Creates a request for the current channel.
    pub fn this_channel(privilege: PrivilegeLevel) -> Self {
        Self {
            channel: THIS_CHANNEL,
            privilege,
        }
    }
}

/// An authentication mode, as advertised by a channel.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AuthMode {
    /// Unauthenticated sessions.
    None = 0x01,
    /// MD2 AuthCodes.
    Md2 = 0x02,
    /// MD5 AuthCodes.
    Md5 = 0x04,
    /// Cleartext passwords.
    Password = 0x10,
    /// Vendor-defined authentication.
    Oem = 0x20,
}

impl AuthMode {
    /// Returns the mode that advertises `auth_type`, if there is one.
    pub fn for_type(auth_type: AuthType) -> Option<Self> {
        match auth_type {
            AuthType::None => Some(Self::None),
            AuthType::Md2 => Some(Self::Md2),
            AuthType::Md5 => Some(Self::Md5),
            AuthType::Password => Some(Self::Password),
            AuthType::Oem => Some(Self::Oem),
            AuthType::RmcpPlus => None,
        }
    }
}

const IPMI_V2: u8 = 0x80;

/// The [`GetChanAuthCap`] response.
///
/// [`GetChanAuthCap`]: enum.GetChanAuthCap.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GetChanAuthCapResponse {
    /// The channel that was queried.
    pub channel: u8,
    /// Whether the channel supports IPMI 2.0 extended capabilities.
    pub ipmi_v2: bool,
    /// The authentication modes the channel accepts.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::serde::flag_names")
    )]
    pub auth_modes: BitFlags<AuthMode>,
    /// Whether per-message authentication is disabled.
    pub per_message_auth: bool,
    /// Whether user-level authentication is disabled.
    pub no_user_level_auth: bool,
    /// Whether non-null usernames are enabled.
    pub usernames_exist: bool,
    /// Whether null usernames are enabled.
    pub null_users: bool,
    /// Whether anonymous login is enabled.
    pub anonymous: bool,
}

impl<'wire> FromWire<'wire> for GetChanAuthCapResponse {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        let channel = r.read_le::<u8>()?;
        let auth = r.read_le::<u8>()?;
        let status = r.read_le::<u8>()?;
        // OEM ID and auxiliary data, which we have no use for.
        let _ = r.read_rest()?;

        Ok(Self {
            channel,
            ipmi_v2: auth & IPMI_V2 != 0,
            auth_modes: BitFlags::from_bits_truncate(auth),
            per_message_auth: status & 0x10 != 0,
            no_user_level_auth: status & 0x08 != 0,
            usernames_exist: status & 0x04 != 0,
            null_users: status & 0x02 != 0,
            anonymous: status & 0x01 != 0,
        })
    }
}

impl ToWire for GetChanAuthCapResponse {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        let v2 = if self.ipmi_v2 { IPMI_V2 } else { 0 };
        let status = [
            (self.per_message_auth, 0x10),
            (self.no_user_level_auth, 0x08),
            (self.usernames_exist, 0x04),
            (self.null_users, 0x02),
            (self.anonymous, 0x01),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit);

        w.write_le::<u8>(self.channel)?;
        w.write_le::<u8>(v2 | self.auth_modes.bits())?;
        w.write_le::<u8>(status)?;
        // Reserved, then a three-byte OEM ID and an OEM auxiliary byte.
        w.write_zeros(5)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        request_round_trip: {
            bytes: &[0x0e, 0x04],
            value: GetChanAuthCapRequest {
                channel: THIS_CHANNEL,
                privilege: PrivilegeLevel::Administrator,
            },
        },
        response_round_trip: {
            bytes: &[0x01, 0x15, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00],
            value: GetChanAuthCapResponse {
                channel: 1,
                ipmi_v2: false,
                auth_modes: AuthMode::None | AuthMode::Md5 | AuthMode::Password,
                per_message_auth: false,
                no_user_level_auth: false,
                usernames_exist: true,
                null_users: false,
                anonymous: false,
            },
        },
    }

    #[test]
    fn short_response() {
        let resp = wire::decode_exact::<GetChanAuthCapResponse>(&[
            0x01, 0x96, 0x1b,
        ])
        .unwrap();
        assert!(resp.ipmi_v2);
        assert_eq!(
            resp.auth_modes,
            AuthMode::Md2 | AuthMode::Md5 | AuthMode::Password
        );
        assert!(resp.per_message_auth);
        assert!(resp.no_user_level_auth);
        assert!(!resp.usernames_exist);
        assert!(resp.null_users);
        assert!(resp.anonymous);
    }

    #[test]
    fn modes_for_types() {
        assert_eq!(AuthMode::for_type(AuthType::Md5), Some(AuthMode::Md5));
        assert_eq!(AuthMode::for_type(AuthType::RmcpPlus), None);
    }
}
