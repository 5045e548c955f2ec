// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Fuzz tests for the IPMB frame decoders.

#![no_main]

use libfuzzer_sys::fuzz_target;

use ipmilan::protocol::ipmb;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = ipmb::decode_inner(data) {
        // A reply is only decoded out of a successful response.
        assert_eq!(frame.reply.is_some(), frame.completion.is_success());
    }
    let _ = ipmb::decode_request(data);
});
