// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! The IPMI 1.5 session header.
//!
//! Every IPMI message sent over LAN is wrapped in a session header that
//! names the session, carries the sender's sequence number and, once a
//! session is authenticated, a 16-byte AuthCode over the IPMB frame it
//! wraps. See [`crypto::authcode`].
//!
//! IPMI 2.0 (RMCP+) uses a different header, which is signalled by an auth
//! type byte of `0x06`. It is recognized, and rejected as unsupported.
//!
//! [`crypto::authcode`]: ../../crypto/authcode/index.html

#[cfg(feature = "arbitrary-derive")]
use libfuzzer_sys::arbitrary::{self, Arbitrary};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

wire_enum! {
    /// A session authentication type.
    #[cfg_attr(feature = "arbitrary-derive", derive(Arbitrary))]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    pub enum AuthType: u8 {
        /// No authentication.
        None = 0x00,
        /// MD2 digests.
        Md2 = 0x01,
        /// MD5 digests.
        Md5 = 0x02,
        /// The password, in the clear.
        Password = 0x04,
        /// A vendor-defined scheme.
        Oem = 0x05,
        /// The IPMI 2.0 session format.
        RmcpPlus = 0x06 => unsupported "IPMI 2.0 not yet implemented",
    }
}

wire_enum! {
    /// A session privilege level.
    #[cfg_attr(feature = "arbitrary-derive", derive(Arbitrary))]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    pub enum PrivilegeLevel: u8 {
        /// No access.
        None = 0x00,
        /// Callback level.
        Callback = 0x01,
        /// User level.
        User = 0x02,
        /// Operator level.
        Operator = 0x03,
        /// Administrator level.
        Administrator = 0x04,
        /// Vendor-defined level.
        Oem = 0x05,
    }
}

/// The length of an AuthCode.
pub const AUTH_CODE_LEN: usize = 16;

wire_record! {
    /// An IPMI 1.5 session message.
    pub struct Packet<'wire> {
        /// The authentication type of this message.
        pub auth_type: AuthType => lookup,
        /// The sender's session sequence number.
        pub sequence: u32 => u32le,
        /// The session ID; zero outside of a session.
        pub session_id: u32 => u32le,
        /// The AuthCode; present unless `auth_type` is `None`.
        pub auth_code: Option<[u8; AUTH_CODE_LEN]> =>
            array if auth_type != AuthType::None,
        /// The wrapped IPMB frame.
        pub payload: &'wire [u8] => prefixed,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::wire;
    use crate::protocol::wire::FromWire;
    use crate::protocol::wire::ToWire;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        unauthenticated: {
            bytes: &[
                0x00,
                0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00,
                0x03, 0x20, 0x18, 0xc8,
            ],
            value: Packet {
                auth_type: AuthType::None,
                sequence: 0,
                session_id: 0,
                auth_code: None,
                payload: &[0x20, 0x18, 0xc8],
            },
        },
        authenticated: {
            bytes: &[
                0x02,
                0x07, 0x00, 0x00, 0x00,
                0x78, 0x56, 0x34, 0x12,
                0x24, 0x03, 0x27, 0x52, 0xa3, 0x66, 0xfb, 0xe1,
                0x5a, 0xae, 0xf5, 0x6b, 0x62, 0x84, 0xf2, 0x2a,
                0x01, 0xaa,
            ],
            value: Packet {
                auth_type: AuthType::Md5,
                sequence: 7,
                session_id: 0x12345678,
                auth_code: Some([
                    0x24, 0x03, 0x27, 0x52, 0xa3, 0x66, 0xfb, 0xe1,
                    0x5a, 0xae, 0xf5, 0x6b, 0x62, 0x84, 0xf2, 0x2a,
                ]),
                payload: &[0xaa],
            },
        },
    }

    #[test]
    fn rmcp_plus_is_unsupported() {
        let mut bytes: &[u8] = &[0x06, 0, 0, 0, 0, 0, 0, 0, 0, 0x00];
        assert_eq!(
            Packet::from_wire(&mut bytes),
            Err(wire::Error::Unsupported("IPMI 2.0 not yet implemented"))
        );

        let packet = Packet {
            auth_type: AuthType::RmcpPlus,
            sequence: 0,
            session_id: 0,
            auth_code: Some([0; 16]),
            payload: &[],
        };
        assert_eq!(
            packet.wire_len(),
            Err(wire::Error::Unsupported("IPMI 2.0 not yet implemented"))
        );
    }

    #[test]
    fn auth_code_presence() {
        let packet = Packet {
            auth_type: AuthType::Password,
            sequence: 0,
            session_id: 0,
            auth_code: None,
            payload: &[],
        };
        assert_eq!(packet.wire_len(), Err(wire::Error::FieldPresence));

        // The declared payload length runs past the end of the message.
        let mut bytes: &[u8] = &[0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0x04, 0x20];
        assert!(Packet::from_wire(&mut bytes).is_err());
    }

    #[test]
    fn privilege_names() {
        assert_eq!(
            "administrator".parse::<PrivilegeLevel>(),
            Ok(PrivilegeLevel::Administrator)
        );
        assert_eq!(AuthType::Md5.to_string(), "Md5");
    }
}
