// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! RMCP, the outermost envelope of every IPMI-over-LAN datagram.
//!
//! An RMCP header is four bytes: a version, a reserved byte, a sequence
//! number, and a class byte whose high bit marks an ACK. This crate never
//! asks for RMCP-level ACKs, so it always sends the "no ACK" sequence number.

use crate::io::Read;
use crate::io::Write;
use crate::protocol::wire;
use crate::protocol::wire::FromWire;
use crate::protocol::wire::ToWire;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The RMCP version byte for RMCP 1.0.
pub const VERSION: u8 = 0x06;

/// The sequence number that disables RMCP ACKs.
pub const NO_ACK_SEQUENCE: u8 = 0xff;

/// The primary RMCP port.
pub const PRIMARY_PORT: u16 = 623;

/// The secondary (secure) RMCP port.
pub const SECONDARY_PORT: u16 = 664;

const HEADER_LEN: usize = 4;
const ACK_BIT: u8 = 0x80;
const CLASS_MASK: u8 = 0x1f;

wire_enum! {
    /// The class of message carried by an RMCP packet.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum Class: u8 {
        /// An ASF message.
        Asf = 0x06,
        /// An IPMI session message.
        Ipmi = 0x07,
        /// A vendor-defined message.
        Oem = 0x08,
    }
}

/// Whether an RMCP packet carries data or acknowledges it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageType {
    /// A data message.
    Data,
    /// An acknowledgement of a data message.
    Ack,
}

/// An RMCP packet.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Packet<'wire> {
    /// Whether this is data or an ACK.
    pub message_type: MessageType,
    /// The class of the payload.
    pub class: Class,
    /// The payload, which is empty for ACKs.
    pub payload: &'wire [u8],
}

impl<'wire> Packet<'wire> {
    /// Creates a data packet.
    pub fn data(class: Class, payload: &'wire [u8]) -> Self {
        Self {
            message_type: MessageType::Data,
            class,
            payload,
        }
    }

    fn class_byte(&self) -> Result<u8, wire::Error> {
        let class = wire::lookup_wire(self.class)?;
        match self.message_type {
            MessageType::Data => Ok(class),
            MessageType::Ack => {
                if self.class != Class::Asf || !self.payload.is_empty() {
                    return Err(wire::Error::BadAck);
                }
                Ok(class | ACK_BIT)
            }
        }
    }
}

impl<'wire> FromWire<'wire> for Packet<'wire> {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        if r.remaining_data() < HEADER_LEN {
            return Err(wire::Error::TooShort);
        }
        let header = r.read_bytes(HEADER_LEN)?;
        if header[0] != VERSION {
            return Err(wire::Error::BadVersion);
        }

        let class = wire::lookup_value::<Class>(header[3] & CLASS_MASK)?;
        let message_type = if header[3] & ACK_BIT != 0 {
            MessageType::Ack
        } else {
            MessageType::Data
        };

        let payload = r.read_rest()?;
        if message_type == MessageType::Ack
            && (class != Class::Asf || !payload.is_empty())
        {
            return Err(wire::Error::BadAck);
        }

        Ok(Self {
            message_type,
            class,
            payload,
        })
    }
}

impl ToWire for Packet<'_> {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        let class = self.class_byte()?;
        w.write_bytes(&[VERSION, 0, NO_ACK_SEQUENCE, class])?;
        w.write_bytes(self.payload)?;
        Ok(())
    }
}
