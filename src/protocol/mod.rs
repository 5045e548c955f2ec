// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! IPMI-over-LAN protocol messages.
//!
//! An IPMI LAN datagram is a stack of envelopes:
//! - [`rmcp`], the outermost header, which says whether the payload is an
//!   ASF or an IPMI message.
//! - [`asf`], carrying the presence ping and pong used for discovery.
//! - [`ipmi`], the session header, carrying session ID, sequence number, and
//!   AuthCode.
//! - [`ipmb`], the request or response frame inside the session message,
//!   which names a *command* by its network function and command code.
//!
//! Each command has a request type and a response type, tied together by an
//! uninhabited type implementing [`Command`], and is described by a static
//! [`Descriptor`]. The set of known commands is fixed at compile time; see
//! [`COMMANDS`].
//!
//! In addition to providing (de)serialization to and from the wire format
//! (via the [`wire` module]), the `serde` feature will provide `Serialize`
//! implementations for responses, for printing them in human-readable
//! formats like JSON.
//!
//! [`rmcp`]: rmcp/index.html
//! [`asf`]: asf/index.html
//! [`ipmi`]: ipmi/index.html
//! [`ipmb`]: ipmb/index.html
//! [`Command`]: trait.Command.html
//! [`Descriptor`]: struct.Descriptor.html
//! [`COMMANDS`]: constant.COMMANDS.html
//! [`wire` module]: wire/index.html

use crate::io::Write;
use crate::protocol::ipmb::NetFn;
use crate::protocol::wire::FromWire;
use crate::protocol::wire::ToWire;

#[cfg(feature = "serde")]
use serde::Serialize;

#[macro_use]
mod macros;

#[macro_use]
pub mod wire;

#[macro_use]
pub mod record;

pub mod completion;
pub use completion::Completion;
pub use completion::CompletionCode;

pub mod asf;
pub mod ipmb;
pub mod ipmi;
pub mod rmcp;

pub mod activate_session;
pub use activate_session::ActivateSession;

pub mod close_session;
pub use close_session::CloseSession;

pub mod get_chan_auth_cap;
pub use get_chan_auth_cap::GetChanAuthCap;

pub mod get_chassis_cap;
pub use get_chassis_cap::GetChassisCap;

pub mod get_chassis_status;
pub use get_chassis_status::GetChassisStatus;

pub mod get_device_id;
pub use get_device_id::GetDeviceId;

pub mod get_session_challenge;
pub use get_session_challenge::GetSessionChallenge;

pub mod get_session_info;
pub use get_session_info::GetSessionInfo;

pub mod get_system_guid;
pub use get_system_guid::GetSystemGuid;

pub mod set_session_priv_level;
pub use set_session_priv_level::SetSessionPrivLevel;

/// An IPMI command.
///
/// An IPMI command is identified by a [`Descriptor`], and consists of a
/// request type and a response type.
///
/// This trait is not implemented by any of the request or response types, but
/// is intead implemented by uninhabited types that represent pairs of requests
/// and responses, for use in generic programming.
///
/// Responses never borrow from the buffer they were parsed from, so that they
/// can outlive the datagram that carried them.
///
/// [`Descriptor`]: struct.Descriptor.html
pub trait Command<'req> {
    /// The request type for this `Command`.
    type Req: FromWire<'req> + ToWire;
    /// The response type for this `Command`.
    type Resp: for<'wire> FromWire<'wire> + ToWire;

    /// The static description of this `Command`.
    const DESCRIPTOR: &'static Descriptor;
}

/// The acceptable data lengths of a successful response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Length {
    /// Any length.
    Any,
    /// Exactly this many bytes.
    Exactly(usize),
    /// One of these lengths.
    OneOf(&'static [usize]),
    /// At least this many bytes.
    AtLeast(usize),
}

impl Length {
    /// Returns whether `len` is acceptable.
    pub fn admits(self, len: usize) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(n) => len == n,
            Self::OneOf(ns) => ns.contains(&len),
            Self::AtLeast(n) => len >= n,
        }
    }
}

/// A static description of a command.
///
/// Descriptors are registered once, in [`COMMANDS`], and are unique both by
/// `(netfn, code)` and by `name`.
///
/// [`COMMANDS`]: constant.COMMANDS.html
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// The name of this command, in `snake_case`.
    pub name: &'static str,
    /// The network function family this command belongs to.
    pub netfn: NetFn,
    /// The command code.
    pub code: u8,
    /// A human-readable description.
    pub description: &'static str,
    /// Command-specific completion codes, which take precedence over the
    /// global table.
    pub completion_codes: &'static [(u8, &'static str)],
    /// The acceptable lengths of a successful response.
    pub response_len: Length,
}

/// Looks up a command by network function and command code.
pub fn lookup_code(netfn: NetFn, code: u8) -> Option<&'static Descriptor> {
    COMMANDS
        .iter()
        .copied()
        .find(|d| d.netfn == netfn && d.code == code)
}

/// Looks up a command by name.
pub fn lookup_name(name: &str) -> Option<&'static Descriptor> {
    COMMANDS.iter().copied().find(|d| d.name == name)
}

macro_rules! catalog {
    ($($module:ident,)*) => {paste::paste! {
        /// Every command known to this crate.
        pub const COMMANDS: &[&Descriptor] = &[$(&$module::DESCRIPTOR,)*];

        /// A decoded response to any known command.
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        #[allow(missing_docs)]
        pub enum Reply {$(
            [<$module:camel>](
                <$module::[<$module:camel>] as Command<'static>>::Resp
            ),
        )*}

        impl Reply {
            /// Decodes the response data for `descriptor`, requiring it to
            /// be consumed exactly.
            pub fn decode(
                descriptor: &Descriptor,
                data: &[u8],
            ) -> Result<Self, wire::Error> {
                $(
                    if descriptor.name == $module::DESCRIPTOR.name {
                        return Ok(Self::[<$module:camel>](
                            wire::decode_exact(data)?
                        ));
                    }
                )*
                Err(unknown(descriptor))
            }

            /// Returns the descriptor of the command this replies to.
            pub fn descriptor(&self) -> &'static Descriptor {
                match self {$(
                    Self::[<$module:camel>](_) => &$module::DESCRIPTOR,
                )*}
            }
        }

        impl ToWire for Reply {
            fn to_wire<W: Write>(&self, w: W) -> Result<(), wire::Error> {
                match self {$(
                    Self::[<$module:camel>](r) => r.to_wire(w),
                )*}
            }
        }

        $(
            impl From<<$module::[<$module:camel>] as Command<'static>>::Resp>
                for Reply
            {
                fn from(
                    r: <$module::[<$module:camel>] as Command<'static>>::Resp,
                ) -> Self {
                    Self::[<$module:camel>](r)
                }
            }
        )*

        /// A request for any known command.
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        pub enum Call<'wire> {$(
            [<$module:camel>](
                <$module::[<$module:camel>] as Command<'wire>>::Req
            ),
        )*}

        impl<'wire> Call<'wire> {
            /// Decodes the request data for `descriptor`, requiring it to be
            /// consumed exactly.
            pub fn decode(
                descriptor: &Descriptor,
                data: &'wire [u8],
            ) -> Result<Self, wire::Error> {
                $(
                    if descriptor.name == $module::DESCRIPTOR.name {
                        return Ok(Self::[<$module:camel>](
                            wire::decode_exact(data)?
                        ));
                    }
                )*
                Err(unknown(descriptor))
            }

            /// Returns the descriptor of the command being called.
            pub fn descriptor(&self) -> &'static Descriptor {
                match self {$(
                    Self::[<$module:camel>](_) => &$module::DESCRIPTOR,
                )*}
            }
        }

        impl ToWire for Call<'_> {
            fn to_wire<W: Write>(&self, w: W) -> Result<(), wire::Error> {
                match self {$(
                    Self::[<$module:camel>](r) => r.to_wire(w),
                )*}
            }
        }

        $(
            impl<'wire> From<<$module::[<$module:camel>] as Command<'wire>>::Req>
                for Call<'wire>
            {
                fn from(
                    r: <$module::[<$module:camel>] as Command<'wire>>::Req,
                ) -> Self {
                    Self::[<$module:camel>](r)
                }
            }
        )*
    }};
}

catalog! {
    activate_session,
    close_session,
    get_chan_auth_cap,
    get_chassis_cap,
    get_chassis_status,
    get_device_id,
    get_session_challenge,
    get_session_info,
    get_system_guid,
    set_session_priv_level,
}

fn unknown(descriptor: &Descriptor) -> wire::Error {
    use crate::protocol::wire::WireEnum as _;
    wire::Error::UnknownCommand {
        netfn: descriptor.netfn.to_wire_value(),
        code: descriptor.code,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_is_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert!(
                    (a.netfn, a.code) != (b.netfn, b.code),
                    "{} and {} share a code",
                    a.name,
                    b.name
                );
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn lookups() {
        let d = lookup_code(NetFn::App, 0x3a).unwrap();
        assert_eq!(d.name, "activate_session");
        assert_eq!(lookup_name("activate_session"), Some(d));
        assert_eq!(lookup_code(NetFn::Chassis, 0x3a), None);
        assert_eq!(lookup_name("cold_reset"), None);
    }

    #[test]
    fn dispatch_by_descriptor() {
        let reply = Reply::decode(&get_system_guid::DESCRIPTOR, &[0x11; 16])
            .unwrap();
        assert_eq!(reply.descriptor().name, "get_system_guid");

        let call =
            Call::from(close_session::CloseSessionRequest { session_id: 9 });
        assert_eq!(call.descriptor(), &close_session::DESCRIPTOR);
        assert_eq!(call.wire_len(), Ok(4));
    }

    #[test]
    fn lengths() {
        assert!(Length::OneOf(&[3, 4]).admits(4));
        assert!(!Length::OneOf(&[3, 4]).admits(5));
        assert!(Length::AtLeast(6).admits(15));
        assert!(!Length::Exactly(20).admits(19));
    }
}
