// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_session_challenge` request and response.
//!
//! The BMC answers this command with a temporary session ID and a random
//! challenge, which the client echoes back in [`activate_session`].
//!
//! [`activate_session`]: ../activate_session/index.html

use crate::protocol::ipmb::NetFn;
use crate::protocol::ipmi::AuthType;
use crate::protocol::Command;
use crate::protocol::Descriptor;
use crate::protocol::Length;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A command for requesting a session challenge.
pub enum GetSessionChallenge {}

/// The descriptor for [`GetSessionChallenge`].
///
/// [`GetSessionChallenge`]: enum.GetSessionChallenge.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_session_challenge",
    netfn: NetFn::App,
    code: 0x39,
    description: "Get Session Challenge",
    completion_codes: &[
        (0x81, "invalid user name"),
        (0x82, "null user name (user 1) not enabled"),
    ],
    response_len: Length::Exactly(20),
};

impl<'wire> Command<'wire> for GetSessionChallenge {
    type Req = GetSessionChallengeRequest<'wire>;
    type Resp = GetSessionChallengeResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

/// The size of the username field. A username must be strictly shorter.
pub const USERNAME_LEN: usize = 16;

wire_record! {
    /// The [`GetSessionChallenge`] request.
    ///
    /// [`GetSessionChallenge`]: enum.GetSessionChallenge.html
    pub struct GetSessionChallengeRequest<'wire> {
        /// The authentication type the session will use.
        pub auth_type: AuthType => lookup,
        /// The username to authenticate as; empty for the null user.
        pub username: &'wire [u8] => padded(USERNAME_LEN),
    }
}

wire_record! {
    /// The [`GetSessionChallenge`] response.
    ///
    /// [`GetSessionChallenge`]: enum.GetSessionChallenge.html
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct GetSessionChallengeResponse {
        /// A temporary session ID, used only for activation.
        pub session_id: u32 => u32le,
        /// The challenge string.
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde::hex"))]
        pub challenge: [u8; 16] => array,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::wire;
    use crate::protocol::wire::ToWire;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        request_round_trip: {
            bytes: &[
                0x02,
                b'A', b'D', b'M', b'I', b'N', 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            ],
            value: GetSessionChallengeRequest {
                auth_type: AuthType::Md5,
                username: b"ADMIN",
            },
        },
        response_round_trip: {
            bytes: &[
                0x78, 0x56, 0x34, 0x12,
                0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
                0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
            ],
            value: GetSessionChallengeResponse {
                session_id: 0x12345678,
                challenge: [
                    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
                    0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
                ],
            },
        },
    }

    #[test]
    fn username_too_long() {
        let req = GetSessionChallengeRequest {
            auth_type: AuthType::Md5,
            username: b"0123456789abcdef",
        };
        assert_eq!(req.wire_len(), Err(wire::Error::TooLong));

        let req = GetSessionChallengeRequest {
            auth_type: AuthType::Md5,
            username: b"0123456789abcde",
        };
        assert_eq!(req.wire_len(), Ok(17));
    }
}
