// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

#![no_main]

use libfuzzer_sys::fuzz_target;

use ipmilan::protocol::activate_session::ActivateSessionRequest;
use ipmilan::protocol::wire::ToWire;

fuzz_target!(|req: ActivateSessionRequest| {
    let mut out = [0u8; 64];
    let _ = req.to_wire(&mut &mut out[..]);
});
