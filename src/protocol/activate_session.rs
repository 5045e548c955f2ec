// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `activate_session` request and response.

use crate::protocol::ipmb::NetFn;
use crate::protocol::ipmi::AuthType;
use crate::protocol::ipmi::PrivilegeLevel;
use crate::protocol::Command;
use crate::protocol::Descriptor;
use crate::protocol::Length;

#[cfg(feature = "arbitrary-derive")]
use libfuzzer_sys::arbitrary::{self, Arbitrary};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A command for activating a session, using a challenge obtained with
/// [`get_session_challenge`].
///
/// This message, and every one after it, must carry an AuthCode unless the
/// session is unauthenticated. The temporary session ID from the challenge
/// goes in the session header, with a sequence number of zero.
///
/// [`get_session_challenge`]: ../get_session_challenge/index.html
pub enum ActivateSession {}

/// The descriptor for [`ActivateSession`].
///
/// [`ActivateSession`]: enum.ActivateSession.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "activate_session",
    netfn: NetFn::App,
    code: 0x3a,
    description: "Activate Session",
    completion_codes: &[
        (0x81, "no session slot available"),
        (0x82, "no slot available for given user"),
        (
            0x83,
            "no slot available to support user due to maximum privilege \
             capability",
        ),
        (0x84, "session sequence number out-of-range"),
        (0x85, "invalid session ID in request"),
        (
            0x86,
            "requested maximum privilege level exceeds user and/or channel \
             privilege limit",
        ),
    ],
    response_len: Length::Exactly(10),
};

impl Command<'_> for ActivateSession {
    type Req = ActivateSessionRequest;
    type Resp = ActivateSessionResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

wire_record! {
    /// The [`ActivateSession`] request.
    ///
    /// [`ActivateSession`]: enum.ActivateSession.html
    #[cfg_attr(feature = "arbitrary-derive", derive(Arbitrary))]
    pub struct ActivateSessionRequest {
        /// The authentication type for the session.
        pub auth_type: AuthType => lookup,
        /// The maximum privilege level the session may be raised to.
        pub privilege: PrivilegeLevel => lookup,
        /// The challenge from `get_session_challenge`.
        pub challenge: [u8; 16] => array,
        /// The first sequence number the client will send.
        pub sequence: u32 => u32le,
    }
}

wire_record! {
    /// The [`ActivateSession`] response.
    ///
    /// [`ActivateSession`]: enum.ActivateSession.html
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct ActivateSessionResponse {
        /// The authentication type for the rest of the session.
        pub auth_type: AuthType => lookup(0x0f),
        /// The session ID.
        pub session_id: u32 => u32le,
        /// The sequence number the BMC expects next.
        pub sequence: u32 => u32le,
        /// The maximum privilege level allowed for the session.
        pub max_privilege: PrivilegeLevel => lookup(0x0f),
    }
}
