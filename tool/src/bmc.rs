// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Subcommands that talk to a BMC.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use ipmilan::client;
use ipmilan::client::Client;
use ipmilan::client::Options;
use ipmilan::crypto::md5;
use ipmilan::crypto::ring::csrng::Csrng;
use ipmilan::net::udp::UdpTransport;
use ipmilan::protocol;
use ipmilan::protocol::get_session_info::SessionSelector;
use ipmilan::protocol::ipmi::AuthType;
use ipmilan::protocol::ipmi::PrivilegeLevel;

use crate::util;

type UdpClient = Client<UdpTransport, md5::Engine, Csrng>;

/// How to reach and authenticate to a BMC.
#[derive(structopt::StructOpt)]
pub struct Connection {
    /// A JSON file of client options; flags override its contents.
    #[structopt(short = "c", long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// The address of the BMC.
    #[structopt(short = "H", long, required_unless = "config")]
    host: Option<IpAddr>,

    /// The UDP port of the BMC.
    #[structopt(short = "p", long)]
    port: Option<u16>,

    /// The username to log in as.
    #[structopt(short = "U", long)]
    user: Option<String>,

    /// The password to log in with.
    #[structopt(short = "P", long)]
    password: Option<String>,

    /// The session auth type: none, md5 or password.
    #[structopt(short = "A", long)]
    auth_type: Option<AuthType>,

    /// The session privilege level.
    #[structopt(short = "L", long)]
    privilege: Option<PrivilegeLevel>,

    /// How long to wait for a pong, in milliseconds.
    #[structopt(long)]
    ping_timeout: Option<u64>,

    /// How long to wait for each command, in milliseconds.
    #[structopt(long)]
    timeout: Option<u64>,

    /// Whether to pretty-print JSON output.
    #[structopt(long)]
    pretty: bool,
}

impl Connection {
    fn options(&self) -> Options {
        let mut opts = match (&self.config, self.host) {
            (Some(path), _) => util::load_json::<Options>(path),
            (None, Some(host)) => Options::new(host),
            (None, None) => unreachable!("structopt requires one of these"),
        };
        if let Some(host) = self.host {
            opts.host = host;
        }
        if let Some(port) = self.port {
            opts.port = port;
        }
        if let Some(user) = &self.user {
            opts.user = user.clone();
        }
        if let Some(password) = &self.password {
            opts.password = password.clone();
        }
        if let Some(auth_type) = self.auth_type {
            opts.auth_type = auth_type;
        }
        if let Some(privilege) = self.privilege {
            opts.privilege = privilege;
        }
        if let Some(ms) = self.ping_timeout {
            opts.ping_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.timeout {
            opts.command_timeout = Duration::from_millis(ms);
        }
        opts
    }

    /// Connects, optionally establishes a session, runs `f`, and prints
    /// its result.
    fn run<T: Serialize>(
        &self,
        session: bool,
        f: impl FnOnce(&mut UdpClient) -> ipmilan::Result<T, client::Error>,
    ) {
        let opts = self.options();
        let addr = opts.addr();
        let mut client =
            check!(UdpClient::connect(opts), "could not reach {}", addr);
        if session {
            check!(client.start_session(), "could not log in to {}", addr);
        }

        let result = f(&mut client);
        if session {
            check!(client.close_session(), "could not log out of {}", addr);
        }
        util::print_json(&check!(result, "request failed"), self.pretty);
    }
}

/// Queries to send to a BMC.
#[derive(structopt::StructOpt)]
pub enum Bmc {
    /// Pings the BMC.
    Ping {
        #[structopt(flatten)]
        conn: Connection,
    },

    /// Logs in, prints the session, and logs out again.
    Session {
        #[structopt(flatten)]
        conn: Connection,
    },

    /// Queries the chassis power state.
    ChassisStatus {
        #[structopt(flatten)]
        conn: Connection,
        /// Send the query outside of any session.
        #[structopt(long)]
        no_session: bool,
    },

    /// Queries the chassis capabilities.
    ChassisCap {
        #[structopt(flatten)]
        conn: Connection,
        /// Send the query outside of any session.
        #[structopt(long)]
        no_session: bool,
    },

    /// Queries the BMC's device ID.
    DeviceId {
        #[structopt(flatten)]
        conn: Connection,
        /// Send the query outside of any session.
        #[structopt(long)]
        no_session: bool,
    },

    /// Queries the managed system's GUID.
    Guid {
        #[structopt(flatten)]
        conn: Connection,
        /// Send the query outside of any session.
        #[structopt(long)]
        no_session: bool,
    },

    /// Queries the state of a session; by default, the tool's own.
    SessionInfo {
        #[structopt(flatten)]
        conn: Connection,
        /// Select the session in this slot.
        #[structopt(long, conflicts_with_all = &["handle", "id"])]
        slot: Option<u8>,
        /// Select the session with this handle.
        #[structopt(long, conflicts_with = "id")]
        handle: Option<u8>,
        /// Select the session with this ID.
        #[structopt(long)]
        id: Option<u32>,
    },
}

impl Bmc {
    /// Runs the subcommand.
    pub fn run(self) {
        match self {
            Self::Ping { conn } => conn.run(false, |c| c.ping()),
            Self::Session { conn } => {
                conn.run(true, |c| Ok(c.session().clone()))
            }
            Self::ChassisStatus { conn, no_session } => {
                conn.run(!no_session, |c| c.get_chassis_status())
            }
            Self::ChassisCap { conn, no_session } => {
                conn.run(!no_session, |c| c.get_chassis_cap())
            }
            Self::DeviceId { conn, no_session } => {
                conn.run(!no_session, |c| c.get_device_id())
            }
            Self::Guid { conn, no_session } => {
                conn.run(!no_session, |c| c.get_system_guid())
            }
            Self::SessionInfo {
                conn,
                slot,
                handle,
                id,
            } => {
                let selector = match (slot, handle, id) {
                    (Some(slot), _, _) => SessionSelector::Slot(slot),
                    (_, Some(handle), _) => SessionSelector::Handle(handle),
                    (_, _, Some(id)) => SessionSelector::Id(id),
                    _ => SessionSelector::Current,
                };
                conn.run(true, |c| c.get_session_info(selector))
            }
        }
    }
}

/// A catalogued command, as listed by `commands`.
#[derive(Serialize)]
struct CommandInfo {
    name: &'static str,
    netfn: protocol::ipmb::NetFn,
    code: u8,
    description: &'static str,
}

/// Prints every catalogued command.
pub fn list_commands(pretty: bool) {
    let commands = protocol::COMMANDS
        .iter()
        .map(|d| CommandInfo {
            name: d.name,
            netfn: d.netfn,
            code: d.code,
            description: d.description,
        })
        .collect::<Vec<_>>();
    util::print_json(&commands, pretty);
}
