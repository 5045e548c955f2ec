// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Golden MD5 AuthCode vectors.

/// The password the vectors are computed with.
pub const PASSWORD: &[u8] = b"ADMIN";

/// The session ID the vectors are computed with.
pub const SESSION_ID: u32 = 0x12345678;

/// The IPMB frame the vectors are computed over: the first four bytes of a
/// `get_device_id` request.
pub const PAYLOAD: &[u8] = &[0x20, 0x18, 0xc8, 0x81];

/// The sequence number used for [`MD5_WITH_SEQUENCE`].
pub const SEQUENCE: u32 = 7;

/// The AuthCode over the inputs above, with [`SEQUENCE`] included.
#[rustfmt::skip]
pub const MD5_WITH_SEQUENCE: &[u8; 16] = &[
    0x24, 0x03, 0x27, 0x52, 0xa3, 0x66, 0xfb, 0xe1,
    0x5a, 0xae, 0xf5, 0x6b, 0x62, 0x84, 0xf2, 0x2a,
];

/// The AuthCode over the inputs above with no sequence number, as sent
/// when activating a session.
#[rustfmt::skip]
pub const MD5_WITHOUT_SEQUENCE: &[u8; 16] = &[
    0xb9, 0xe1, 0x3e, 0x47, 0x4e, 0xaa, 0x35, 0x5c,
    0x0a, 0xd5, 0x65, 0x0b, 0x1f, 0x9e, 0x7a, 0x7c,
];
