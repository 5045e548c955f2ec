// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

#![no_main]

use libfuzzer_sys::fuzz_target;

use ipmilan::protocol::set_session_priv_level::SetSessionPrivLevelRequest;
use ipmilan::protocol::wire::ToWire;

fuzz_target!(|req: SetSessionPrivLevelRequest| {
    // Levels outside 2..=5 must be rejected, not truncated.
    let mut out = [0u8; 8];
    let _ = req.to_wire(&mut &mut out[..]);
});
