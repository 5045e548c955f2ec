// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `ipmilan-tool` is a simple command-line tool for talking to a BMC over
//! IPMI 1.5 LAN.
//!
//! Every subcommand prints its result as JSON. Set `RUST_LOG=trace` to see
//! every datagram exchanged.

#![deny(missing_docs)]
#![deny(warnings)]
#![deny(unused)]
#![deny(unsafe_code)]

use structopt::StructOpt as _;

#[macro_use]
mod util;

mod bmc;

/// A command-line tool for talking to IPMI BMCs.
#[allow(missing_docs)]
#[derive(structopt::StructOpt)]
#[structopt(author)]
enum CliCommand {
    #[structopt(flatten)]
    Bmc(bmc::Bmc),
    /// Lists every command this tool knows how to send.
    Commands {
        /// Whether to pretty-print JSON output.
        #[structopt(long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    match CliCommand::from_args() {
        CliCommand::Bmc(b) => b.run(),
        CliCommand::Commands { pretty } => bmc::list_commands(pretty),
    }
}
