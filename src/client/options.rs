// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Client configuration.

use std::net::IpAddr;
use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::ipmi::AuthType;
use crate::protocol::ipmi::PrivilegeLevel;
use crate::protocol::rmcp;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Options for a [`Client`].
///
/// With the `serde` feature, this can be loaded from a JSON object; every
/// field other than `host` is optional, and timeouts are given in
/// milliseconds:
/// ```
/// # use ipmilan::client::Options;
/// # use ipmilan::protocol::ipmi::AuthType;
/// let opts: Options = serde_json::from_str(r#"{
///     "host": "10.0.0.7",
///     "user": "ADMIN",
///     "password": "ADMIN",
///     "auth_type": "password",
///     "command_timeout": 1000
/// }"#).unwrap();
/// assert_eq!(opts.auth_type, AuthType::Password);
/// assert_eq!(opts.port, 623);
/// ```
///
/// [`Client`]: struct.Client.html
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Options {
    /// The address of the BMC.
    pub host: IpAddr,
    /// The UDP port of the BMC.
    #[cfg_attr(feature = "serde", serde(default = "default_port"))]
    pub port: u16,
    /// The username to authenticate as; empty for the null user.
    #[cfg_attr(feature = "serde", serde(default))]
    pub user: String,
    /// The password to authenticate with.
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: String,
    /// The session authentication type to request.
    #[cfg_attr(feature = "serde", serde(default = "default_auth_type"))]
    pub auth_type: AuthType,
    /// The session privilege level to request.
    #[cfg_attr(feature = "serde", serde(default = "default_privilege"))]
    pub privilege: PrivilegeLevel,
    /// How long to wait for a pong.
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_ping_timeout",
            deserialize_with = "crate::serde::millis"
        )
    )]
    pub ping_timeout: Duration,
    /// How long to wait for a command's response.
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_command_timeout",
            deserialize_with = "crate::serde::millis"
        )
    )]
    pub command_timeout: Duration,
}

fn default_port() -> u16 {
    rmcp::PRIMARY_PORT
}

fn default_auth_type() -> AuthType {
    AuthType::Md5
}

fn default_privilege() -> PrivilegeLevel {
    PrivilegeLevel::Administrator
}

fn default_ping_timeout() -> Duration {
    Duration::from_millis(2000)
}

fn default_command_timeout() -> Duration {
    Duration::from_millis(5000)
}

impl Options {
    /// Creates options for talking to `host`, with every other option at
    /// its default.
    pub fn new(host: impl Into<IpAddr>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            user: String::new(),
            password: String::new(),
            auth_type: default_auth_type(),
            privilege: default_privilege(),
            ping_timeout: default_ping_timeout(),
            command_timeout: default_command_timeout(),
        }
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the username and password.
    pub fn credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Sets the authentication type.
    pub fn auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    /// Sets the privilege level.
    pub fn privilege(mut self, privilege: PrivilegeLevel) -> Self {
        self.privilege = privilege;
        self
    }

    /// Sets the ping timeout.
    pub fn ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    /// Sets the command timeout.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Returns the socket address of the BMC.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::net::Ipv4Addr;

    #[test]
    fn builder() {
        let opts = Options::new(Ipv4Addr::LOCALHOST)
            .port(rmcp::SECONDARY_PORT)
            .credentials("ADMIN", "hunter2")
            .privilege(PrivilegeLevel::Operator);
        assert_eq!(opts.addr(), "127.0.0.1:664".parse().unwrap());
        assert_eq!(opts.user, "ADMIN");
        assert_eq!(opts.auth_type, AuthType::Md5);
        assert_eq!(opts.ping_timeout, Duration::from_secs(2));
        assert_eq!(opts.command_timeout, Duration::from_secs(5));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn from_json() {
        let opts: Options = serde_json::from_str(
            r#"{
                "host": "192.168.1.20",
                "user": "root",
                "privilege": "operator",
                "ping_timeout": 250
            }"#,
        )
        .unwrap();
        assert_eq!(
            opts,
            Options::new(Ipv4Addr::new(192, 168, 1, 20))
                .credentials("root", "")
                .privilege(PrivilegeLevel::Operator)
                .ping_timeout(Duration::from_millis(250))
        );

        assert!(serde_json::from_str::<Options>(r#"{"user": "x"}"#).is_err());
        assert!(serde_json::from_str::<Options>(
            r#"{"host": "::1", "auth_type": "sha1"}"#
        )
        .is_err());
    }
}
