// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! IPMB request and response frames.
//!
//! An IPMB frame is the innermost envelope of an IPMI LAN message. A request
//! looks like this:
//! ```text
//! +------+-------------+------+------+-------------+-----+------+------+
//! | rsSA | netFn/rsLUN | chk1 | rqSA | rqSeq/rqLUN | cmd | data | chk2 |
//! +------+-------------+------+------+-------------+-----+------+------+
//! ```
//! A response swaps the two addresses and carries a completion code between
//! the command byte and the data.
//!
//! Both checksums are the two's complement of the sum of the bytes they
//! cover: the first covers the two bytes before it, and the second covers
//! everything from the fourth byte up to, but not including, itself.

use crate::io::Cursor;
use crate::io::Write as _;
use crate::protocol;
use crate::protocol::wire;
use crate::protocol::wire::ToWire;
use crate::protocol::wire::WireEnum as _;
use crate::protocol::Call;
use crate::protocol::Completion;
use crate::protocol::Descriptor;
use crate::protocol::Reply;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The IPMB slave address of the BMC.
pub const BMC_ADDR: u8 = 0x20;

/// The software ID used by this client as its requester address.
pub const CLIENT_ADDR: u8 = 0x81;

/// The number of header and trailer bytes around the data of a request.
pub const REQUEST_OVERHEAD: usize = 7;

/// The number of header and trailer bytes around the data of a response.
pub const RESPONSE_OVERHEAD: usize = 8;

wire_enum! {
    /// A network function family, as its request code.
    ///
    /// The matching response code is one greater; see [`Direction`].
    ///
    /// [`Direction`]: enum.Direction.html
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum NetFn: u8 {
        /// Chassis device requests.
        Chassis = 0x00,
        /// Bridge requests.
        Bridge = 0x02,
        /// Sensor and event requests.
        Sensor = 0x04,
        /// Application requests.
        App = 0x06,
        /// Firmware transfer requests.
        Firmware = 0x08,
    }
}

wire_enum! {
    /// Whether a frame is a request or a response, which IPMB encodes in the
    /// low bit of the network function code.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum Direction: u8 {
        /// A request.
        Request = 0x00,
        /// A response.
        Response = 0x01,
    }
}

/// Computes an IPMB checksum: the value which, added to the sum of `bytes`,
/// yields zero modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, &b| sum.wrapping_add(b))
        .wrapping_neg()
}

/// Packs a six-bit value into the high bits of a byte, with a two-bit LUN in
/// the low bits.
///
/// Both the netFn/LUN and sequence/LUN bytes use this layout.
pub fn pack(code: u8, lun: u8) -> u8 {
    ((code & 0x3f) << 2) | (lun & 0x3)
}

/// Reverses [`pack()`].
///
/// [`pack()`]: fn.pack.html
pub fn unpack(byte: u8) -> (u8, u8) {
    (byte >> 2, byte & 0x3)
}

/// Encodes a netFn/LUN byte.
pub fn encode_netfn(direction: Direction, netfn: NetFn, lun: u8) -> u8 {
    pack(netfn.to_wire_value() | direction.to_wire_value(), lun)
}

/// Decodes a netFn/LUN byte into its direction, family, and LUN.
pub fn decode_netfn(byte: u8) -> Result<(Direction, NetFn, u8), wire::Error> {
    let (code, lun) = unpack(byte);
    let netfn = wire::lookup_value::<NetFn>(code & !1)?;
    let direction = wire::lookup_value::<Direction>(code & 1)?;
    Ok((direction, netfn, lun))
}

/// The addressing of a request, from the requester's point of view.
///
/// A response to a request carries the same route; only the order in which
/// the addresses appear on the wire changes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Route {
    /// The responder's slave address.
    pub res_addr: u8,
    /// The responder's LUN.
    pub res_lun: u8,
    /// The requester's address.
    pub req_addr: u8,
    /// The requester's LUN.
    pub req_lun: u8,
    /// The six-bit IPMB sequence number.
    pub seq: u8,
}

impl Route {
    /// The route for a request from this client to the BMC.
    pub fn to_bmc(seq: u8) -> Self {
        Self {
            res_addr: BMC_ADDR,
            res_lun: 0,
            req_addr: CLIENT_ADDR,
            req_lun: 0,
            seq: seq & 0x3f,
        }
    }
}

/// Returns the length of a request frame carrying `payload`.
///
/// This runs the payload's encoder, so an unencodable payload fails here.
pub fn frame_len<T: ToWire + ?Sized>(payload: &T) -> Result<usize, wire::Error> {
    Ok(REQUEST_OVERHEAD + payload.wire_len()?)
}

/// Writes a request frame for `descriptor` into `buf`, returning the number
/// of bytes written.
pub fn construct_into<T: ToWire + ?Sized>(
    route: &Route,
    descriptor: &Descriptor,
    payload: &T,
    buf: &mut [u8],
) -> Result<usize, wire::Error> {
    let mut cursor = Cursor::new(buf);
    let header = [
        route.res_addr,
        encode_netfn(Direction::Request, descriptor.netfn, route.res_lun),
    ];
    cursor.write_bytes(&header)?;
    cursor.write_le(checksum(&header))?;
    cursor.write_bytes(&[
        route.req_addr,
        pack(route.seq, route.req_lun),
        descriptor.code,
    ])?;
    payload.to_wire(&mut cursor)?;
    let chk2 = checksum(cursor.consumed_since(3));
    cursor.write_le(chk2)?;
    Ok(cursor.consumed_len())
}

/// Writes a response frame for `descriptor` into `buf`, returning the number
/// of bytes written.
///
/// This is what a BMC sends; the client only needs it for testing.
pub fn construct_response_into<T: ToWire + ?Sized>(
    route: &Route,
    descriptor: &Descriptor,
    completion: Completion,
    payload: &T,
    buf: &mut [u8],
) -> Result<usize, wire::Error> {
    let mut cursor = Cursor::new(buf);
    let header = [
        route.req_addr,
        encode_netfn(Direction::Response, descriptor.netfn, route.req_lun),
    ];
    cursor.write_bytes(&header)?;
    cursor.write_le(checksum(&header))?;
    cursor.write_bytes(&[
        route.res_addr,
        pack(route.seq, route.res_lun),
        descriptor.code,
        completion.code(),
    ])?;
    payload.to_wire(&mut cursor)?;
    let chk2 = checksum(cursor.consumed_since(3));
    cursor.write_le(chk2)?;
    Ok(cursor.consumed_len())
}

/// Builds a request frame, sizing it with a measuring pass first.
///
/// The frame is allocated only once `payload` has been validated.
#[cfg(feature = "std")]
pub fn construct_with<T: ToWire + ?Sized>(
    route: &Route,
    descriptor: &Descriptor,
    payload: &T,
) -> Result<Vec<u8>, wire::Error> {
    let mut buf = vec![0; frame_len(payload)?];
    let len = construct_into(route, descriptor, payload, &mut buf)?;
    check_len(len, buf.len())?;
    Ok(buf)
}

/// Builds a request frame for a catalogued command.
#[cfg(feature = "std")]
pub fn construct(route: &Route, call: &Call) -> Result<Vec<u8>, wire::Error> {
    construct_with(route, call.descriptor(), call)
}

/// Builds a response frame.
#[cfg(feature = "std")]
pub fn construct_response<T: ToWire + ?Sized>(
    route: &Route,
    descriptor: &Descriptor,
    completion: Completion,
    payload: &T,
) -> Result<Vec<u8>, wire::Error> {
    let mut buf = vec![0; RESPONSE_OVERHEAD + payload.wire_len()?];
    let len =
        construct_response_into(route, descriptor, completion, payload, &mut buf)?;
    check_len(len, buf.len())?;
    Ok(buf)
}

#[cfg(feature = "std")]
fn check_len(written: usize, expected: usize) -> Result<(), wire::Error> {
    if written != expected {
        return Err(wire::Error::Io(crate::io::Error::Internal));
    }
    Ok(())
}

/// A decoded response frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Response<'wire> {
    /// The network function family.
    pub netfn: NetFn,
    /// The direction bit; a well-formed response has `Direction::Response`.
    pub direction: Direction,
    /// The requester's address, i.e., who this response is for.
    pub req_addr: u8,
    /// The requester's LUN.
    pub req_lun: u8,
    /// The responder's address.
    pub res_addr: u8,
    /// The responder's LUN.
    pub res_lun: u8,
    /// The sequence number of the request being answered.
    pub seq: u8,
    /// The command being answered.
    pub command: &'static Descriptor,
    /// The completion code.
    pub completion: Completion,
    /// The raw response data.
    pub data: &'wire [u8],
    /// The decoded response data; present only on success.
    pub reply: Option<Reply>,
}

/// Decodes a response frame.
///
/// Checks are performed in wire order, so the first defect in a frame
/// determines the error. The payload is only decoded if the completion code
/// is a success.
pub fn decode_inner(bytes: &[u8]) -> Result<Response<'_>, wire::Error> {
    if bytes.len() < RESPONSE_OVERHEAD {
        return Err(wire::Error::TooShort);
    }
    let last = bytes.len() - 1;

    let req_addr = bytes[0];
    let (direction, netfn, req_lun) = decode_netfn(bytes[1])?;
    if checksum(&bytes[..2]) != bytes[2] {
        return Err(wire::Error::Checksum1);
    }

    let res_addr = bytes[3];
    let (seq, res_lun) = unpack(bytes[4]);

    let command = protocol::lookup_code(netfn, bytes[5]).ok_or(
        wire::Error::UnknownCommand {
            netfn: netfn.to_wire_value(),
            code: bytes[5],
        },
    )?;
    let completion = Completion::resolve(bytes[6], command.completion_codes)?;

    let data = &bytes[7..last];
    if checksum(&bytes[3..last]) != bytes[last] {
        return Err(wire::Error::Checksum2);
    }

    let reply = if completion.is_success() {
        if !command.response_len.admits(data.len()) {
            return Err(wire::Error::LengthMismatch);
        }
        Some(Reply::decode(command, data)?)
    } else {
        None
    };

    Ok(Response {
        netfn,
        direction,
        req_addr,
        req_lun,
        res_addr,
        res_lun,
        seq,
        command,
        completion,
        data,
        reply,
    })
}

/// A decoded request frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Request<'wire> {
    /// The addressing of the request.
    pub route: Route,
    /// The direction bit; a well-formed request has `Direction::Request`.
    pub direction: Direction,
    /// The command being requested.
    pub command: &'static Descriptor,
    /// The decoded request data.
    pub call: Call<'wire>,
}

/// Decodes a request frame.
///
/// This is the BMC's half of the exchange; the client uses it to script fake
/// BMCs in tests.
pub fn decode_request(bytes: &[u8]) -> Result<Request<'_>, wire::Error> {
    if bytes.len() < REQUEST_OVERHEAD {
        return Err(wire::Error::TooShort);
    }
    let last = bytes.len() - 1;

    let res_addr = bytes[0];
    let (direction, netfn, res_lun) = decode_netfn(bytes[1])?;
    if checksum(&bytes[..2]) != bytes[2] {
        return Err(wire::Error::Checksum1);
    }

    let req_addr = bytes[3];
    let (seq, req_lun) = unpack(bytes[4]);
    let command = protocol::lookup_code(netfn, bytes[5]).ok_or(
        wire::Error::UnknownCommand {
            netfn: netfn.to_wire_value(),
            code: bytes[5],
        },
    )?;

    let data = &bytes[6..last];
    if checksum(&bytes[3..last]) != bytes[last] {
        return Err(wire::Error::Checksum2);
    }
    let call = Call::decode(command, data)?;

    Ok(Request {
        route: Route {
            res_addr,
            res_lun,
            req_addr,
            req_lun,
            seq,
        },
        direction,
        command,
        call,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::get_device_id;
    use crate::protocol::get_device_id::GetDeviceIdRequest;
    use crate::protocol::get_session_challenge;
    use crate::protocol::set_session_priv_level::SetSessionPrivLevelResponse;
    use crate::protocol::set_session_priv_level;
    use crate::protocol::CompletionCode;
    use crate::protocol::ipmi::PrivilegeLevel;
    use pretty_assertions::assert_eq;

    #[test]
    fn netfn_packing() {
        for code in 0..64 {
            for lun in 0..4 {
                assert_eq!(unpack(pack(code, lun)), (code, lun));
            }
        }

        for &netfn in &[
            NetFn::Chassis,
            NetFn::Bridge,
            NetFn::Sensor,
            NetFn::App,
            NetFn::Firmware,
        ] {
            for &dir in &[Direction::Request, Direction::Response] {
                for lun in 0..4 {
                    let byte = encode_netfn(dir, netfn, lun);
                    assert_eq!(decode_netfn(byte), Ok((dir, netfn, lun)));
                }
            }
        }

        assert_eq!(encode_netfn(Direction::Request, NetFn::App, 0), 0x18);
        assert_eq!(encode_netfn(Direction::Response, NetFn::App, 0), 0x1c);
        assert_eq!(decode_netfn(0x0a << 2), Err(wire::Error::OutOfRange));
    }

    #[test]
    fn request_frame() {
        let frame = construct_with(
            &Route::to_bmc(0),
            &get_device_id::DESCRIPTOR,
            &GetDeviceIdRequest {},
        )
        .unwrap();
        assert_eq!(frame, vec![0x20, 0x18, 0xc8, 0x81, 0x00, 0x01, 0x7e]);

        let req = decode_request(&frame).unwrap();
        assert_eq!(req.route, Route::to_bmc(0));
        assert_eq!(req.direction, Direction::Request);
        assert_eq!(req.command.name, "get_device_id");
        assert_eq!(req.call, Call::GetDeviceId(GetDeviceIdRequest {}));
    }

    #[test]
    fn checksums_cancel() {
        let frame = construct(
            &Route::to_bmc(0x2a),
            &Call::from(get_session_challenge::GetSessionChallengeRequest {
                auth_type: crate::protocol::ipmi::AuthType::Md5,
                username: b"ADMIN",
            }),
        )
        .unwrap();
        let sum = |bytes: &[u8]| {
            bytes.iter().fold(0u8, |s, &b| s.wrapping_add(b))
        };
        assert_eq!(sum(&frame[..3]), 0);
        assert_eq!(sum(&frame[3..]), 0);

        for i in 0..frame.len() {
            let mut bad = frame.clone();
            bad[i] ^= 0x40;
            let result = decode_request(&bad).map(|_| ());
            match i {
                // rsSA and the first checksum.
                0 | 2 => assert_eq!(result, Err(wire::Error::Checksum1)),
                // netFn and cmd may fail to decode before either check.
                1 | 5 => assert!(result.is_err(), "byte {} flipped", i),
                _ => assert_eq!(
                    result,
                    Err(wire::Error::Checksum2),
                    "byte {} flipped",
                    i
                ),
            }
        }

        let frame = priv_response(0x00, &[0x04]);
        assert_eq!(sum(&frame[..3]), 0);
        assert_eq!(sum(&frame[3..]), 0);
        for &i in &[0, 2] {
            let mut bad = frame.clone();
            bad[i] ^= 0x40;
            assert_eq!(
                decode_inner(&bad).map(|_| ()),
                Err(wire::Error::Checksum1)
            );
        }
        // rqSA, rqSeq, the payload and the second checksum itself.
        for &i in &[3, 4, 7, 8] {
            let mut bad = frame.clone();
            bad[i] ^= 0x40;
            assert_eq!(
                decode_inner(&bad).map(|_| ()),
                Err(wire::Error::Checksum2),
                "byte {} flipped",
                i
            );
        }
    }

    fn priv_response(cc: u8, data: &[u8]) -> Vec<u8> {
        let mut frame = vec![0x81, 0x1c, 0x63, 0x20, 0x05 << 2, 0x3b, cc];
        frame.extend_from_slice(data);
        frame.push(checksum(&frame[3..]));
        frame
    }

    #[test]
    fn response_frame() {
        let frame = priv_response(0x00, &[0x04]);
        let resp = decode_inner(&frame).unwrap();
        assert_eq!(resp.netfn, NetFn::App);
        assert_eq!(resp.direction, Direction::Response);
        assert_eq!(resp.req_addr, CLIENT_ADDR);
        assert_eq!(resp.res_addr, BMC_ADDR);
        assert_eq!(resp.seq, 5);
        assert_eq!(resp.command.name, "set_session_priv_level");
        assert!(resp.completion.is_success());
        assert_eq!(resp.data, &[0x04]);
        assert_eq!(
            resp.reply,
            Some(Reply::SetSessionPrivLevel(SetSessionPrivLevelResponse {
                privilege: PrivilegeLevel::Administrator,
            }))
        );

        let built = construct_response(
            &Route::to_bmc(5),
            &set_session_priv_level::DESCRIPTOR,
            Completion::SUCCESS,
            &SetSessionPrivLevelResponse {
                privilege: PrivilegeLevel::Administrator,
            },
        )
        .unwrap();
        assert_eq!(built, frame);
    }

    #[test]
    fn specific_completion_codes() {
        let frame = priv_response(0x81, &[]);
        let resp = decode_inner(&frame).unwrap();
        assert_eq!(
            resp.completion.description(),
            "requested level exceeds channel and/or user privilege limit"
        );
        assert_eq!(resp.reply, None);

        let frame = priv_response(0xc1, &[]);
        let resp = decode_inner(&frame).unwrap();
        assert_eq!(
            resp.completion,
            Completion::Standard(CompletionCode::InvalidCommand)
        );

        assert_eq!(
            decode_inner(&priv_response(0x90, &[])),
            Err(wire::Error::OutOfRange)
        );
    }

    #[test]
    fn malformed_responses() {
        assert_eq!(
            decode_inner(&[0x81, 0x1c, 0x63, 0x20, 0x00, 0x3b, 0x00]),
            Err(wire::Error::TooShort)
        );

        let mut frame = priv_response(0x00, &[0x04]);
        frame[2] ^= 1;
        assert_eq!(decode_inner(&frame), Err(wire::Error::Checksum1));

        let mut frame = priv_response(0x00, &[0x04]);
        frame[7] = 0x03;
        assert_eq!(decode_inner(&frame), Err(wire::Error::Checksum2));

        let frame = priv_response(0x00, &[0x04, 0x00]);
        assert_eq!(decode_inner(&frame), Err(wire::Error::LengthMismatch));

        let mut frame = priv_response(0x00, &[]);
        frame[5] = 0x7f;
        let last = frame.len() - 1;
        frame[last] = checksum(&frame[3..last]);
        assert_eq!(
            decode_inner(&frame),
            Err(wire::Error::UnknownCommand {
                netfn: 0x06,
                code: 0x7f
            })
        );
    }
}
