// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Fuzz tests for the client's inbound path: RMCP, then ASF or the IPMI
//! session header, then IPMB.

#![no_main]

use std::net::Ipv4Addr;
use std::time::Instant;

use libfuzzer_sys::fuzz_target;

use ipmilan::client::Client;
use ipmilan::client::Options;
use ipmilan::crypto::csrng;
use ipmilan::crypto::md5;
use ipmilan::net::mem::InMemTransport;

/// A `Csrng` that is never asked for anything, since nothing is sent.
struct NoRng;

impl csrng::Csrng for NoRng {
    fn fill(&mut self, _: &mut [u8]) -> ipmilan::Result<(), csrng::Error> {
        unimplemented!("the code under test should never call this function")
    }
}

fuzz_target!(|data: &[u8]| {
    let mut client = Client::new(
        Options::new(Ipv4Addr::LOCALHOST),
        InMemTransport::new(),
        md5::Engine::new(),
        NoRng,
    );
    client.handle_message(data);

    // Whatever arrived, nothing was waiting for it.
    assert!(client.inflight().is_empty());
    assert_eq!(client.inflight().next_deadline(), None::<Instant>);
});
