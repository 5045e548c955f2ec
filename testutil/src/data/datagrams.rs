// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Whole datagrams, as a BMC sends them.

/// An ASF pong with message tag 7, advertising IPMI support.
#[rustfmt::skip]
pub const PONG: &[u8] = &[
    // RMCP: version, reserved, no-ACK sequence, ASF class.
    0x06, 0x00, 0xff, 0x06,
    // ASF: IANA 4542, pong, tag 7, reserved, 16 bytes of data.
    0x00, 0x00, 0x11, 0xbe, 0x40, 0x07, 0x00, 0x10,
    0x00, 0x00, 0x11, 0xbe, 0x00, 0x00, 0x00, 0x00,
    0x81, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The IPMB sequence number [`AUTH_CAP_RESPONSE`] answers.
pub const AUTH_CAP_SEQ: u8 = 1;

/// A sessionless `get_chan_auth_cap` response on channel 1, advertising
/// the none, md5 and password auth types.
#[rustfmt::skip]
pub const AUTH_CAP_RESPONSE: &[u8] = &[
    // RMCP: IPMI class.
    0x06, 0x00, 0xff, 0x07,
    // Session header: no auth, sequence 0, session 0, 16-byte frame.
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
    // IPMB: to 0x81, app response, checksum.
    0x81, 0x1c, 0x63,
    // From 0x20, sequence 1, command 0x38, success.
    0x20, 0x04, 0x38, 0x00,
    0x01, 0x15, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x8a,
];
