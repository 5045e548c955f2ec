// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! ASF presence ping and pong.
//!
//! Before opening a session, a client pings the BMC over the ASF class of
//! RMCP. The pong that comes back says whether the device speaks IPMI at
//! all. Pings and pongs are correlated by their message tag.

use crate::io::Read;
use crate::io::Write;
use crate::protocol::wire;
use crate::protocol::wire::FromWire;
use crate::protocol::wire::ToWire;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The IANA enterprise number assigned to ASF.
pub const IANA: u32 = 4542;

const HEADER_LEN: usize = 8;
const PONG_LEN: usize = 16;

wire_enum! {
    /// An ASF message type.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum MessageType: u8 {
        /// A presence pong.
        Pong = 0x40,
        /// A presence ping.
        Ping = 0x80,
    }
}

/// An ASF message.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Packet {
    /// The message tag, which a pong echoes from its ping.
    pub tag: u8,
    /// The message body.
    pub message: Message,
}

/// The body of an ASF message.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Message {
    /// A presence ping, which has no body.
    Ping,
    /// A presence pong.
    Pong(Pong),
}

impl Message {
    /// Returns the message type of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Ping => MessageType::Ping,
            Self::Pong(_) => MessageType::Pong,
        }
    }
}

impl Packet {
    /// Creates a ping with the given tag.
    pub fn ping(tag: u8) -> Self {
        Self {
            tag,
            message: Message::Ping,
        }
    }
}

impl<'wire> FromWire<'wire> for Packet {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        if r.remaining_data() < HEADER_LEN {
            return Err(wire::Error::TooShort);
        }
        if r.read_be::<u32>()? != IANA {
            return Err(wire::Error::BadEnterprise);
        }
        let message_type = MessageType::from_wire(r)?;
        let tag = r.read_le::<u8>()?;
        let _reserved = r.read_le::<u8>()?;
        let len = r.read_le::<u8>()?;

        let mut data = r.read_rest()?;
        if data.len() != len as usize {
            return Err(wire::Error::LengthMismatch);
        }

        let message = match message_type {
            MessageType::Ping => Message::Ping,
            MessageType::Pong => Message::Pong(Pong::from_wire(&mut data)?),
        };
        Ok(Self { tag, message })
    }
}

impl ToWire for Packet {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        w.write_be::<u32>(IANA)?;
        self.message.message_type().to_wire(&mut w)?;
        w.write_le::<u8>(self.tag)?;
        w.write_le::<u8>(0)?;
        match &self.message {
            Message::Ping => w.write_le::<u8>(0)?,
            Message::Pong(pong) => {
                w.write_le::<u8>(PONG_LEN as u8)?;
                pong.to_wire(&mut w)?;
            }
        }
        Ok(())
    }
}

/// The body of a presence pong.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pong {
    /// The IANA number of the entity that defined `oem`; usually [`IANA`].
    ///
    /// [`IANA`]: constant.IANA.html
    pub iana: u32,
    /// A vendor-defined value.
    pub oem: u32,
    /// Whether the device supports IPMI.
    pub ipmi_supported: bool,
    /// The supported ASF version.
    pub asf_version: u8,
    /// The supported interactions byte, uninterpreted.
    pub interactions: u8,
}

impl<'wire> FromWire<'wire> for Pong {
    fn from_wire<R: Read<'wire> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, wire::Error> {
        if r.remaining_data() < PONG_LEN {
            return Err(wire::Error::TooShort);
        }
        let iana = r.read_be::<u32>()?;
        let oem = r.read_be::<u32>()?;
        let entities = r.read_le::<u8>()?;
        let interactions = r.read_le::<u8>()?;
        let _reserved = r.read_rest()?;

        Ok(Self {
            iana,
            oem,
            ipmi_supported: entities & 0x80 != 0,
            asf_version: entities & 0xf,
            interactions,
        })
    }
}

impl ToWire for Pong {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), wire::Error> {
        if self.asf_version > 0xf {
            return Err(wire::Error::OutOfRange);
        }
        let ipmi = if self.ipmi_supported { 0x80 } else { 0x00 };
        w.write_be::<u32>(self.iana)?;
        w.write_be::<u32>(self.oem)?;
        w.write_le::<u8>(ipmi | self.asf_version)?;
        w.write_le::<u8>(self.interactions)?;
        w.write_zeros(6)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    round_trip_test! {
        ping: {
            bytes: &[0x00, 0x00, 0x11, 0xbe, 0x80, 0x07, 0x00, 0x00],
            value: Packet {
                tag: 7,
                message: Message::Ping,
            },
        },
        pong: {
            bytes: &[
                0x00, 0x00, 0x11, 0xbe, 0x40, 0x07, 0x00, 0x10,
                0x00, 0x00, 0x11, 0xbe,
                0x00, 0x00, 0x00, 0x00,
                0x81, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            ],
            value: Packet {
                tag: 7,
                message: Message::Pong(Pong {
                    iana: IANA,
                    oem: 0,
                    ipmi_supported: true,
                    asf_version: 1,
                    interactions: 0,
                }),
            },
        },
    }

    fn decode(bytes: &[u8]) -> Result<Packet, wire::Error> {
        wire::decode_exact(bytes)
    }

    #[test]
    fn truncated_pong() {
        let bytes = &[
            0x00, 0x00, 0x11, 0xbe, 0x40, 0x07, 0x00, 0x0a, //
            0x00, 0x00, 0x11, 0xbe, 0x00, 0x00, 0x00, 0x00, 0x81, 0x00,
        ];
        assert_eq!(decode(bytes), Err(wire::Error::TooShort));
    }

    #[test]
    fn length_mismatch() {
        // Claims sixteen bytes of body, but carries fifteen.
        let bytes = &[
            0x00, 0x00, 0x11, 0xbe, 0x40, 0x07, 0x00, 0x10, //
            0x00, 0x00, 0x11, 0xbe, 0x00, 0x00, 0x00, 0x00, 0x81, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(decode(bytes), Err(wire::Error::LengthMismatch));

        let padded = &[0x00, 0x00, 0x11, 0xbe, 0x80, 0x07, 0x00, 0x00, 0x00];
        assert_eq!(decode(padded), Err(wire::Error::LengthMismatch));
    }

    #[test]
    fn malformed_header() {
        assert_eq!(
            decode(&[0x00, 0x00, 0x11, 0xbe, 0x80, 0x07, 0x00]),
            Err(wire::Error::TooShort)
        );
        assert_eq!(
            decode(&[0x00, 0x00, 0x11, 0xbf, 0x80, 0x07, 0x00, 0x00]),
            Err(wire::Error::BadEnterprise)
        );
        assert_eq!(
            decode(&[0x00, 0x00, 0x11, 0xbe, 0x81, 0x07, 0x00, 0x00]),
            Err(wire::Error::OutOfRange)
        );
    }
}
