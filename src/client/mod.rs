// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! An IPMI 1.5 LAN client.
//!
//! A [`Client`] owns a [`Transport`] to a single BMC, and drives every
//! exchange with it synchronously: each operation registers an
//! [`inflight`] identifier, sends one datagram, and then reads datagrams
//! until the matching response arrives or the request's deadline passes.
//! Datagrams that fail to decode at any layer, or that answer nothing the
//! client is waiting for, are logged and dropped.
//!
//! Establishing a session is a fixed sequence of exchanges, which
//! [`Client::start_session()`] walks through:
//! 1. An ASF ping, to check the BMC is there at all.
//! 2. `get_chan_auth_cap`, to check the BMC supports the configured auth
//!    type.
//! 3. `get_session_challenge`, which yields a temporary session ID and a
//!    challenge.
//! 4. `activate_session`, the first authenticated message, which yields the
//!    real session ID and initial sequence number.
//! 5. `set_session_priv_level`, to raise the session to the configured
//!    privilege.
//!
//! [`Client`]: struct.Client.html
//! [`Transport`]: ../net/trait.Transport.html
//! [`inflight`]: ../inflight/index.html
//! [`Client::start_session()`]: struct.Client.html#method.start_session

use core::fmt;
use std::time::Instant;

use enumflags2::BitFlags;

use crate::crypto::authcode;
use crate::crypto::csrng;
use crate::crypto::csrng::CsrngExt as _;
use crate::crypto::hash;
use crate::inflight;
use crate::inflight::Event;
use crate::inflight::Registry;
use crate::net;
use crate::net::Transport;
use crate::protocol::activate_session::ActivateSessionRequest;
use crate::protocol::asf;
use crate::protocol::close_session::CloseSessionRequest;
use crate::protocol::get_chan_auth_cap::AuthMode;
use crate::protocol::get_chan_auth_cap::GetChanAuthCapRequest;
use crate::protocol::get_chan_auth_cap::GetChanAuthCapResponse;
use crate::protocol::get_chassis_cap::GetChassisCapRequest;
use crate::protocol::get_chassis_cap::GetChassisCapResponse;
use crate::protocol::get_chassis_status::GetChassisStatusRequest;
use crate::protocol::get_chassis_status::GetChassisStatusResponse;
use crate::protocol::get_device_id::GetDeviceIdRequest;
use crate::protocol::get_device_id::GetDeviceIdResponse;
use crate::protocol::get_session_challenge::GetSessionChallengeRequest;
use crate::protocol::get_session_info::GetSessionInfoRequest;
use crate::protocol::get_session_info::GetSessionInfoResponse;
use crate::protocol::get_session_info::SessionSelector;
use crate::protocol::get_system_guid::GetSystemGuidRequest;
use crate::protocol::get_system_guid::GetSystemGuidResponse;
use crate::protocol::ipmb;
use crate::protocol::ipmi;
use crate::protocol::ipmi::AuthType;
use crate::protocol::ipmi::PrivilegeLevel;
use crate::protocol::rmcp;
use crate::protocol::set_session_priv_level::SetSessionPrivLevelRequest;
use crate::protocol::set_session_priv_level::SetSessionPrivLevelResponse;
use crate::protocol::wire;
use crate::protocol::Call;
use crate::protocol::Completion;
use crate::protocol::Descriptor;
use crate::protocol::Reply;
use crate::HexDump;
use crate::Result;

mod options;
mod session;

pub use options::Options;
pub use session::Session;
pub use session::State;

use session::Header;

/// An error returned by a [`Client`].
///
/// [`Client`]: struct.Client.html
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    /// An outgoing message could not be encoded.
    Wire(wire::Error),
    /// The transport failed.
    Net(net::Error),
    /// Nothing answered the named request in time.
    Timeout(&'static str),
    /// The BMC answered the named command with a failure.
    Completion {
        /// The command that failed.
        command: &'static str,
        /// The completion code the BMC returned.
        completion: Completion,
    },
    /// Every request identifier is in use.
    Exhausted,
    /// The request registry was used incorrectly.
    Inflight(inflight::Error),
    /// The BMC does not support the configured auth type.
    AuthUnsupported {
        /// The configured auth type.
        wanted: AuthType,
        /// The auth types the BMC does support.
        offered: BitFlags<AuthMode>,
    },
    /// A session is already established, or being established.
    SessionActive,
    /// An AuthCode could not be computed.
    AuthCode(authcode::Error),
    /// The entropy source failed.
    Entropy(csrng::Error),
    /// The BMC answered with a response of the wrong shape.
    UnexpectedResponse,
}

impl From<wire::Error> for Error {
    fn from(e: wire::Error) -> Self {
        Self::Wire(e)
    }
}

impl From<net::Error> for Error {
    fn from(e: net::Error) -> Self {
        Self::Net(e)
    }
}

impl From<inflight::Error> for Error {
    fn from(e: inflight::Error) -> Self {
        match e {
            inflight::Error::Exhausted => Self::Exhausted,
            e => Self::Inflight(e),
        }
    }
}

impl From<authcode::Error> for Error {
    fn from(e: authcode::Error) -> Self {
        Self::AuthCode(e)
    }
}

impl From<csrng::Error> for Error {
    fn from(e: csrng::Error) -> Self {
        Self::Entropy(e)
    }
}

debug_from!(Error => inflight::Error, authcode::Error, csrng::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "encoding failed: {}", e),
            Self::Net(e) => write!(f, "{}", e),
            Self::Timeout(what) => write!(f, "{} timed out", what),
            Self::Completion {
                command,
                completion,
            } => write!(f, "{} failed: {}", command, completion),
            Self::Exhausted => f.write_str("too many requests in flight"),
            Self::Inflight(e) => write!(f, "{}", e),
            Self::AuthUnsupported { wanted, offered } => {
                write!(f, "no {:?} auth support (only: ", wanted)?;
                for (i, mode) in offered.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", mode)?;
                }
                f.write_str(")")
            }
            Self::SessionActive => f.write_str("session already active"),
            Self::AuthCode(e) => write!(f, "{}", e),
            Self::Entropy(e) => write!(f, "{}", e),
            Self::UnexpectedResponse => f.write_str("unexpected response"),
        }
    }
}

/// What an outstanding request is waiting for.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Pending {
    /// A pong.
    Ping,
    /// A response to the given command.
    Command(&'static Descriptor),
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ping => f.write_str("ping"),
            Self::Command(d) => f.write_str(d.name),
        }
    }
}

/// A correlated answer to an outstanding request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Answer {
    /// A pong.
    Pong(asf::Pong),
    /// A command response.
    Reply {
        /// The completion code.
        completion: Completion,
        /// The decoded response; present only on success.
        reply: Option<Reply>,
    },
}

/// An IPMI 1.5 LAN client.
///
/// `T` carries datagrams; `H` computes MD5 AuthCodes; `R` proposes the
/// session's initial outbound sequence number.
pub struct Client<T, H, R> {
    opts: Options,
    transport: T,
    hash: H,
    rng: R,
    session: Session,
    inflight: Registry<Pending, Answer>,
}

#[cfg(feature = "ring")]
impl
    Client<
        net::udp::UdpTransport,
        crate::crypto::md5::Engine,
        crate::crypto::ring::csrng::Csrng,
    >
{
    /// Creates a client talking UDP to the BMC described by `opts`.
    pub fn connect(opts: Options) -> Result<Self, Error> {
        let transport = net::udp::UdpTransport::new(opts.addr())
            .map_err(|e| fail!(Error::Net(e)))?;
        Ok(Self::new(
            opts,
            transport,
            crate::crypto::md5::Engine::new(),
            crate::crypto::ring::csrng::Csrng::new(),
        ))
    }
}

impl<T, H, R> Client<T, H, R>
where
    T: Transport,
    H: hash::Engine,
    R: csrng::Csrng,
{
    /// Creates a new client.
    pub fn new(opts: Options, transport: T, hash: H, rng: R) -> Self {
        Self {
            opts,
            transport,
            hash,
            rng,
            session: Session::default(),
            inflight: Registry::new(),
        }
    }

    /// Returns the client's options.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Returns the client's session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the client's outstanding requests.
    pub fn inflight(&self) -> &Registry<Pending, Answer> {
        &self.inflight
    }

    /// Returns the client's transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pings the BMC, returning its pong.
    pub fn ping(&mut self) -> Result<asf::Pong, Error> {
        let id = self.inflight.register(Pending::Ping, Instant::now())?;
        let result = self.ping_with(id);
        self.inflight.complete(id)?;
        match result? {
            Answer::Pong(pong) => Ok(pong),
            Answer::Reply { .. } => Err(fail!(Error::UnexpectedResponse)),
        }
    }

    fn ping_with(&mut self, id: inflight::Id) -> Result<Answer, Error> {
        let asf = wire::to_vec(&asf::Packet::ping(id))
            .map_err(|e| fail!(Error::Wire(e)))?;
        let datagram = wire::to_vec(&rmcp::Packet::data(rmcp::Class::Asf, &asf))
            .map_err(|e| fail!(Error::Wire(e)))?;
        self.send_packet(&datagram)?;
        self.inflight
            .start_timeout(id, self.opts.ping_timeout, Instant::now())?;
        self.wait(id, "ping")
    }

    /// Establishes an authenticated session, returning its ID.
    ///
    /// On failure, the client is left in [`State::Failed`] with no session,
    /// and the handshake may be retried.
    ///
    /// [`State::Failed`]: enum.State.html#variant.Failed
    pub fn start_session(&mut self) -> Result<u32, Error> {
        check!(
            matches!(self.session.state, State::Idle | State::Failed),
            Error::SessionActive
        );
        self.session.reset(State::Idle);
        match self.handshake() {
            Ok(id) => {
                info!("session {:#010x} established", id);
                Ok(id)
            }
            Err(e) => {
                warn!(
                    "handshake failed in {:?}: {}",
                    self.session.state,
                    e.as_ref()
                );
                self.session.reset(State::Failed);
                Err(e)
            }
        }
    }

    fn handshake(&mut self) -> Result<u32, Error> {
        self.session.advance(State::Pinging);
        self.ping()?;

        self.session.advance(State::QueryingAuthCaps);
        let caps = self.get_chan_auth_cap(self.opts.privilege)?;
        let wanted = self.opts.auth_type;
        let supported = AuthMode::for_type(wanted)
            .map_or(false, |mode| caps.auth_modes.contains(mode));
        check!(
            supported,
            Error::AuthUnsupported {
                wanted,
                offered: caps.auth_modes,
            }
        );

        self.session.advance(State::Challenging);
        let user = self.opts.user.clone();
        let challenge = self.call_as(
            GetSessionChallengeRequest {
                auth_type: wanted,
                username: user.as_bytes(),
            }
            .into(),
            |r| match r {
                Reply::GetSessionChallenge(r) => Some(r),
                _ => None,
            },
        )?;

        // Everything from activation onwards is authenticated.
        self.session.advance(State::Activating);
        self.session.authenticated = true;
        let proposed = self.rng.next_u32()?;
        let activated = self.send_as(
            ActivateSessionRequest {
                auth_type: wanted,
                privilege: self.opts.privilege,
                challenge: challenge.challenge,
                sequence: proposed,
            }
            .into(),
            Session::activation_header(challenge.session_id),
            |r| match r {
                Reply::ActivateSession(r) => Some(r),
                _ => None,
            },
        )?;

        check!(
            self.session.id == 0 && self.session.sequence == 0,
            Error::SessionActive
        );
        check!(activated.session_id != 0, Error::UnexpectedResponse);
        self.session.id = activated.session_id;
        self.session.sequence = activated.sequence;
        if activated.auth_type == AuthType::None {
            self.session.authenticated = false;
        }

        self.session.advance(State::RaisingPrivilege);
        let raised = self.set_session_priv_level(self.opts.privilege)?;
        self.session.privilege = Some(raised.privilege);

        self.session.advance(State::Active);
        Ok(self.session.id)
    }

    /// Closes the session, if there is one.
    pub fn close_session(&mut self) -> Result<(), Error> {
        if self.session.id == 0 {
            return Ok(());
        }
        let session_id = self.session.id;
        self.call_as(CloseSessionRequest { session_id }.into(), |r| match r {
            Reply::CloseSession(r) => Some(r),
            _ => None,
        })?;
        info!("session {:#010x} closed", session_id);
        self.session.reset(State::Idle);
        Ok(())
    }

    /// Sends any catalogued command, returning the decoded response.
    ///
    /// The command goes in the current session, or outside of any session if
    /// there is none.
    pub fn call(&mut self, call: Call) -> Result<Reply, Error> {
        let header = self.session.next_header();
        self.send(call, header)
    }

    fn call_as<Resp>(
        &mut self,
        call: Call,
        pick: fn(Reply) -> Option<Resp>,
    ) -> Result<Resp, Error> {
        let header = self.session.next_header();
        self.send_as(call, header, pick)
    }

    fn send_as<Resp>(
        &mut self,
        call: Call,
        header: Header,
        pick: fn(Reply) -> Option<Resp>,
    ) -> Result<Resp, Error> {
        let reply = self.send(call, header)?;
        pick(reply).ok_or_else(|| fail!(Error::UnexpectedResponse))
    }

    /// Queries the channel's authentication capabilities.
    pub fn get_chan_auth_cap(
        &mut self,
        privilege: PrivilegeLevel,
    ) -> Result<GetChanAuthCapResponse, Error> {
        self.call_as(
            GetChanAuthCapRequest::this_channel(privilege).into(),
            |r| match r {
                Reply::GetChanAuthCap(r) => Some(r),
                _ => None,
            },
        )
    }

    /// Sets the session privilege level.
    pub fn set_session_priv_level(
        &mut self,
        privilege: PrivilegeLevel,
    ) -> Result<SetSessionPrivLevelResponse, Error> {
        self.call_as(
            SetSessionPrivLevelRequest { privilege }.into(),
            |r| match r {
                Reply::SetSessionPrivLevel(r) => Some(r),
                _ => None,
            },
        )
    }

    /// Queries the state of a session.
    pub fn get_session_info(
        &mut self,
        selector: SessionSelector,
    ) -> Result<GetSessionInfoResponse, Error> {
        self.call_as(GetSessionInfoRequest { selector }.into(), |r| match r {
            Reply::GetSessionInfo(r) => Some(r),
            _ => None,
        })
    }

    /// Queries the identity of the BMC.
    pub fn get_device_id(&mut self) -> Result<GetDeviceIdResponse, Error> {
        self.call_as(GetDeviceIdRequest {}.into(), |r| match r {
            Reply::GetDeviceId(r) => Some(r),
            _ => None,
        })
    }

    /// Queries the GUID of the managed system.
    pub fn get_system_guid(&mut self) -> Result<GetSystemGuidResponse, Error> {
        self.call_as(GetSystemGuidRequest {}.into(), |r| match r {
            Reply::GetSystemGuid(r) => Some(r),
            _ => None,
        })
    }

    /// Queries the power state of the chassis.
    pub fn get_chassis_status(
        &mut self,
    ) -> Result<GetChassisStatusResponse, Error> {
        self.call_as(GetChassisStatusRequest {}.into(), |r| match r {
            Reply::GetChassisStatus(r) => Some(r),
            _ => None,
        })
    }

    /// Queries the capabilities of the chassis.
    pub fn get_chassis_cap(&mut self) -> Result<GetChassisCapResponse, Error> {
        self.call_as(GetChassisCapRequest {}.into(), |r| match r {
            Reply::GetChassisCap(r) => Some(r),
            _ => None,
        })
    }

    /// Sends `call` with the given session header, and waits for its
    /// response.
    fn send(&mut self, call: Call, header: Header) -> Result<Reply, Error> {
        let command = call.descriptor();
        let id = self
            .inflight
            .register(Pending::Command(command), Instant::now())?;
        let result = self.send_with(id, &call, header);
        self.inflight.complete(id)?;

        match result? {
            Answer::Reply {
                completion,
                reply: Some(reply),
            } if completion.is_success() => Ok(reply),
            Answer::Reply { completion, .. } if !completion.is_success() => {
                Err(fail!(Error::Completion {
                    command: command.name,
                    completion,
                }))
            }
            _ => Err(fail!(Error::UnexpectedResponse)),
        }
    }

    fn send_with(
        &mut self,
        id: inflight::Id,
        call: &Call,
        header: Header,
    ) -> Result<Answer, Error> {
        let command = call.descriptor();
        let frame = ipmb::construct(&ipmb::Route::to_bmc(id), call)
            .map_err(|e| fail!(Error::Wire(e)))?;

        let (auth_type, auth_code) = if self.session.authenticated {
            let code = authcode::compute(
                &mut self.hash,
                self.opts.auth_type,
                self.opts.password.as_bytes(),
                header.session_id,
                &frame,
                header.auth_sequence,
            )?;
            (self.opts.auth_type, Some(code))
        } else {
            (AuthType::None, None)
        };

        let packet = ipmi::Packet {
            auth_type,
            sequence: header.sequence,
            session_id: header.session_id,
            auth_code,
            payload: &frame,
        };
        let session =
            wire::to_vec(&packet).map_err(|e| fail!(Error::Wire(e)))?;
        let datagram =
            wire::to_vec(&rmcp::Packet::data(rmcp::Class::Ipmi, &session))
                .map_err(|e| fail!(Error::Wire(e)))?;

        trace!(
            "sending {} as request {} (session {:#010x}, sequence {})",
            command.name,
            id,
            header.session_id,
            header.sequence
        );
        self.send_packet(&datagram)?;
        self.inflight
            .start_timeout(id, self.opts.command_timeout, Instant::now())?;
        self.wait(id, command.name)
    }

    fn send_packet(&mut self, datagram: &[u8]) -> Result<(), Error> {
        trace!("send_packet {:?}", HexDump(datagram));
        self.transport
            .send(datagram)
            .map_err(|e| fail!(Error::Net(e)))
    }

    /// Reads datagrams until request `id` is answered or times out.
    fn wait(
        &mut self,
        id: inflight::Id,
        what: &'static str,
    ) -> Result<Answer, Error> {
        let mut buf = [0; net::MAX_DATAGRAM];
        loop {
            let now = Instant::now();
            self.inflight.fire_timeouts(now);
            match self.inflight.take_event(id) {
                Some(Event::Resolved(answer)) => return Ok(answer),
                Some(Event::TimedOut(_)) => {
                    return Err(fail!(Error::Timeout(what)))
                }
                None => {}
            }

            let timeout = self
                .inflight
                .next_deadline()
                .map(|d| d.saturating_duration_since(now))
                .unwrap_or(self.opts.command_timeout);
            let received = self
                .transport
                .recv(&mut buf, timeout)
                .map_err(|e| fail!(Error::Net(e)))?;
            if let Some(len) = received {
                self.handle_message(&buf[..len]);
            }
        }
    }

    /// Processes one datagram from the BMC.
    ///
    /// If the datagram answers an outstanding request, the answer is parked
    /// in the request registry. Anything else is logged and dropped.
    pub fn handle_message(&mut self, datagram: &[u8]) {
        trace!("recv_packet {:?}", HexDump(datagram));

        let envelope = match wire::decode_exact::<rmcp::Packet>(datagram) {
            Ok(p) => p,
            Err(e) => {
                warn!("DROP RMCP: {}", e);
                return;
            }
        };
        if envelope.message_type == rmcp::MessageType::Ack {
            trace!("DROP RMCP: ACK");
            return;
        }

        match envelope.class {
            rmcp::Class::Asf => self.handle_asf(envelope.payload),
            rmcp::Class::Ipmi => self.handle_ipmi(envelope.payload),
            rmcp::Class::Oem => {
                warn!("DROP RMCP: OEM class");
            }
        }
    }

    fn handle_asf(&mut self, payload: &[u8]) {
        let packet = match wire::decode_exact::<asf::Packet>(payload) {
            Ok(p) => p,
            Err(e) => {
                warn!("DROP ASF: {}", e);
                return;
            }
        };
        let pong = match packet.message {
            asf::Message::Pong(pong) => pong,
            asf::Message::Ping => {
                warn!("DROP ASF: unsolicited ping");
                return;
            }
        };
        if self.inflight.lookup(packet.tag) != Some(&Pending::Ping) {
            warn!("DROP ASF: no ping in flight with tag {}", packet.tag);
            return;
        }
        if self.inflight.has_event(packet.tag) {
            trace!("DROP ASF: duplicate pong for tag {}", packet.tag);
            return;
        }
        if self.inflight.resolve(packet.tag, Answer::Pong(pong)).is_ok() {
            trace!("pong for tag {}", packet.tag);
        }
    }

    fn handle_ipmi(&mut self, payload: &[u8]) {
        let packet = match wire::decode_exact::<ipmi::Packet>(payload) {
            Ok(p) => p,
            Err(e) => {
                warn!("DROP IPMI: {}", e);
                return;
            }
        };
        let frame = match ipmb::decode_inner(packet.payload) {
            Ok(f) => f,
            Err(e) => {
                warn!("DROP IPMB: {}", e);
                return;
            }
        };
        if frame.req_addr != ipmb::CLIENT_ADDR {
            warn!("DROP IPMB (WRONG DST ADDR {:#04x})", frame.req_addr);
            return;
        }
        if frame.direction != ipmb::Direction::Response {
            warn!("DROP IPMB: not a response");
            return;
        }

        match self.inflight.lookup(frame.seq) {
            Some(Pending::Command(d)) if *d == frame.command => {}
            _ => {
                warn!(
                    "DROP IPMB: no {} in flight with sequence {}",
                    frame.command.name,
                    frame.seq
                );
                return;
            }
        }
        if self.inflight.has_event(frame.seq) {
            trace!(
                "DROP IPMB: duplicate {} for sequence {}",
                frame.command.name,
                frame.seq
            );
            return;
        }
        let answer = Answer::Reply {
            completion: frame.completion,
            reply: frame.reply,
        };
        if self.inflight.resolve(frame.seq, answer).is_ok() {
            trace!("{} for sequence {}", frame.command.name, frame.seq);
        }
    }
}
