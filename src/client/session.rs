// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Session state.

use crate::protocol::ipmi::PrivilegeLevel;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A step of session establishment.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum State {
    /// No session, and no handshake under way.
    Idle,
    /// Waiting for a pong.
    Pinging,
    /// Asking which auth types the channel supports.
    QueryingAuthCaps,
    /// Requesting a challenge.
    Challenging,
    /// Activating the session.
    Activating,
    /// Raising the session privilege level.
    RaisingPrivilege,
    /// The session is established.
    Active,
    /// The last handshake failed. A new one may be started.
    Failed,
}

/// The session header values for one outgoing message.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Header {
    pub session_id: u32,
    pub sequence: u32,
    /// The sequence number to fold into the AuthCode, if any.
    pub auth_sequence: Option<u32>,
}

/// The client's view of its session with the BMC.
///
/// The session ID and sequence number are both zero until activation
/// succeeds, and messages sent while they are zero are sessionless.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Session {
    pub(crate) state: State,
    pub(crate) id: u32,
    pub(crate) sequence: u32,
    pub(crate) authenticated: bool,
    pub(crate) privilege: Option<PrivilegeLevel>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: State::Idle,
            id: 0,
            sequence: 0,
            authenticated: false,
            privilege: None,
        }
    }
}

impl Session {
    /// Returns the current handshake state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the session ID, once the session is fully established.
    pub fn id(&self) -> Option<u32> {
        match self.state {
            State::Active => Some(self.id),
            _ => None,
        }
    }

    /// Returns the sequence number the next message will carry.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns whether outgoing messages carry an AuthCode.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the privilege level the BMC granted, once raised.
    pub fn privilege(&self) -> Option<PrivilegeLevel> {
        self.privilege
    }

    pub(crate) fn advance(&mut self, to: State) {
        info!("session: {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    /// Forgets everything about the session, ending in `state`.
    pub(crate) fn reset(&mut self, state: State) {
        *self = Self::default();
        self.state = state;
    }

    /// Returns the header for the next ordinary message, consuming a
    /// sequence number if there is a session.
    pub(crate) fn next_header(&mut self) -> Header {
        if self.id == 0 {
            return Header {
                session_id: 0,
                sequence: 0,
                auth_sequence: Some(0),
            };
        }
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        Header {
            session_id: self.id,
            sequence,
            auth_sequence: Some(sequence),
        }
    }

    /// Returns the header for the activation message, which is sent to the
    /// temporary session with sequence number zero.
    pub(crate) fn activation_header(temp_id: u32) -> Header {
        Header {
            session_id: temp_id,
            sequence: 0,
            auth_sequence: None,
        }
    }
}
