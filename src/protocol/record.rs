// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Declarative fixed-layout wire records.
//!
//! Most IPMI structures are a flat sequence of fields: fixed-width integers,
//! enumerated codes, raw byte ranges, and the occasional length prefix or
//! conditionally present field. [`wire_record!`] turns a schema of such
//! fields into a struct together with its [`FromWire`] and [`ToWire`]
//! implementations.
//!
//! Fields are decoded strictly left to right, so a field's presence
//! condition may refer to any field declared before it. Length prefixes are
//! not exposed as struct fields; they are derived from the byte range they
//! govern.
//!
//! [`FromWire`]: ../wire/trait.FromWire.html
//! [`ToWire`]: ../wire/trait.ToWire.html

use crate::io::Read;
use crate::io::Write;
use crate::protocol::wire::Error;

/// Reads a fixed-size byte array.
pub fn read_array<'wire, R, const N: usize>(r: &mut R) -> Result<[u8; N], Error>
where
    R: Read<'wire> + ?Sized,
{
    let mut out = [0; N];
    out.copy_from_slice(r.read_bytes(N)?);
    Ok(out)
}

/// Reads a byte range prefixed by a one-byte length.
pub fn read_prefixed<'wire, R>(r: &mut R) -> Result<&'wire [u8], Error>
where
    R: Read<'wire> + ?Sized,
{
    let len = r.read_bytes(1)?[0];
    Ok(r.read_bytes(len as usize)?)
}

/// Writes a byte range prefixed by a one-byte length.
pub fn write_prefixed<W: Write>(mut w: W, bytes: &[u8]) -> Result<(), Error> {
    if bytes.len() > u8::MAX as usize {
        return Err(Error::TooLong);
    }
    w.write_bytes(&[bytes.len() as u8])?;
    w.write_bytes(bytes)?;
    Ok(())
}

/// Reads a zero-padded string occupying exactly `len` bytes, returning the
/// portion before the padding.
pub fn read_padded<'wire, R>(r: &mut R, len: usize) -> Result<&'wire [u8], Error>
where
    R: Read<'wire> + ?Sized,
{
    let bytes = r.read_bytes(len)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Ok(&bytes[..end])
}

/// Writes `bytes` zero-padded to exactly `len` bytes.
///
/// `bytes` must be strictly shorter than `len`, so that the field is always
/// terminated by at least one zero byte.
pub fn write_padded<W: Write>(
    mut w: W,
    bytes: &[u8],
    len: usize,
) -> Result<(), Error> {
    if bytes.len() >= len {
        return Err(Error::TooLong);
    }
    w.write_bytes(bytes)?;
    w.write_zeros(len - bytes.len())?;
    Ok(())
}

/// Generates a struct, along with wire (de)serialization, from a schema of
/// typed fields.
///
/// Syntax:
/// ```text
/// wire_record! {
///     /// A record.
///     pub struct Packet<'wire> {
///         /// An enumerated code, stored as one byte.
///         pub auth_type: AuthType => lookup,
///         /// An enumerated code in the low nibble of a byte.
///         pub privilege: PrivilegeLevel => lookup(0x0f),
///         /// A little-endian `u32`.
///         pub sequence: u32 => u32le,
///         /// A byte array, only present when the condition holds.
///         pub auth_code: Option<[u8; 16]> => array if auth_type != AuthType::None,
///         /// A byte range with a one-byte length prefix.
///         pub payload: &'wire [u8] => prefixed,
///     }
/// }
/// ```
///
/// The available field kinds are `u8`, `u32le`, `lookup`, `lookup(mask)`,
/// `array`, `prefixed` and `padded(len)`.
///
/// A conditional field has type `Option<T>`. When encoding, whether it is
/// `Some` must agree with its condition; otherwise encoding fails with
/// [`Error::FieldPresence`].
///
/// [`Error::FieldPresence`]: ../wire/enum.Error.html#variant.FieldPresence
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(<$lt:lifetime>)? {$(
            $(#[$fmeta:meta])*
            $fvis:vis $field:ident: $fty:ty =>
                $kind:ident $(($($args:tt)*))? $(if $cond:expr)?,
        )*}
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Debug)]
        $vis struct $name $(<$lt>)? {$(
            $(#[$fmeta])*
            $fvis $field: $fty,
        )*}

        wire_record!(@from_wire $name [$($lt)?] r {
            $(
                let $field: $fty = wire_record!(
                    @opt r [$kind $(($($args)*))?] $(if $cond)?
                );
            )*
            Ok(Self { $($field,)* })
        });

        impl $(<$lt>)? $crate::protocol::wire::ToWire for $name $(<$lt>)? {
            #[allow(unused_mut, unused_variables)]
            fn to_wire<W: $crate::io::Write>(
                &self,
                mut w: W,
            ) -> Result<(), $crate::protocol::wire::Error> {
                #[allow(unused_imports)]
                use $crate::io::Write as _;

                $(let $field = self.$field;)*
                $(
                    wire_record!(
                        @put w, $field, [$kind $(($($args)*))?] $(if $cond)?
                    );
                )*
                Ok(())
            }
        }
    };

    (@from_wire $name:ident [] $r:ident { $($body:tt)* }) => {
        impl<'wire> $crate::protocol::wire::FromWire<'wire> for $name {
            #[allow(unused_variables)]
            fn from_wire<R: $crate::io::Read<'wire> + ?Sized>(
                $r: &mut R,
            ) -> Result<Self, $crate::protocol::wire::Error> {
                #[allow(unused_imports)]
                use $crate::io::Read as _;
                $($body)*
            }
        }
    };
    (@from_wire $name:ident [$lt:lifetime] $r:ident { $($body:tt)* }) => {
        impl<$lt> $crate::protocol::wire::FromWire<$lt> for $name<$lt> {
            #[allow(unused_variables)]
            fn from_wire<R: $crate::io::Read<$lt> + ?Sized>(
                $r: &mut R,
            ) -> Result<Self, $crate::protocol::wire::Error> {
                #[allow(unused_imports)]
                use $crate::io::Read as _;
                $($body)*
            }
        }
    };

    (@opt $r:ident [$($kind:tt)*]) => {
        wire_record!(@read $r [$($kind)*])
    };
    (@opt $r:ident [$($kind:tt)*] if $cond:expr) => {
        if $cond {
            Some(wire_record!(@read $r [$($kind)*]))
        } else {
            None
        }
    };

    (@put $w:ident, $v:ident, [$($kind:tt)*]) => {
        wire_record!(@write $w, $v, [$($kind)*])
    };
    (@put $w:ident, $v:ident, [$($kind:tt)*] if $cond:expr) => {
        match ($cond, $v) {
            (true, Some($v)) => wire_record!(@write $w, $v, [$($kind)*]),
            (false, None) => {}
            _ => return Err($crate::protocol::wire::Error::FieldPresence),
        }
    };

    (@read $r:ident [u8]) => { $r.read_le::<u8>()? };
    (@read $r:ident [u32le]) => { $r.read_le::<u32>()? };
    (@read $r:ident [lookup]) => {
        $crate::protocol::wire::lookup_value($r.read_le::<u8>()?)?
    };
    (@read $r:ident [lookup($mask:expr)]) => {
        $crate::protocol::wire::lookup_value($r.read_le::<u8>()? & $mask)?
    };
    (@read $r:ident [array]) => { $crate::protocol::record::read_array($r)? };
    (@read $r:ident [prefixed]) => {
        $crate::protocol::record::read_prefixed($r)?
    };
    (@read $r:ident [padded($len:expr)]) => {
        $crate::protocol::record::read_padded($r, $len)?
    };

    (@write $w:ident, $v:ident, [u8]) => { $w.write_le::<u8>($v)? };
    (@write $w:ident, $v:ident, [u32le]) => { $w.write_le::<u32>($v)? };
    (@write $w:ident, $v:ident, [lookup]) => {
        $w.write_le::<u8>($crate::protocol::wire::lookup_wire($v)?)?
    };
    (@write $w:ident, $v:ident, [lookup($mask:expr)]) => {
        $w.write_le::<u8>($crate::protocol::wire::lookup_wire($v)? & $mask)?
    };
    (@write $w:ident, $v:ident, [array]) => { $w.write_bytes(&$v[..])? };
    (@write $w:ident, $v:ident, [prefixed]) => {
        $crate::protocol::record::write_prefixed(&mut $w, $v)?
    };
    (@write $w:ident, $v:ident, [padded($len:expr)]) => {
        $crate::protocol::record::write_padded(&mut $w, $v, $len)?
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::wire;
    use crate::protocol::wire::FromWire;
    use crate::protocol::wire::ToWire;
    use pretty_assertions::assert_eq;

    wire_enum! {
        /// A kind of message.
        pub enum Kind: u8 {
            /// Carries no tag.
            Plain = 0x00,
            /// Carries a tag.
            Tagged = 0x01,
        }
    }

    wire_record! {
        /// A record exercising every field kind.
        pub struct Demo<'wire> {
            /// Kind.
            pub kind: Kind => lookup(0x0f),
            /// Counter.
            pub counter: u32 => u32le,
            /// Tag, present for tagged messages.
            pub tag: Option<[u8; 2]> => array if kind == Kind::Tagged,
            /// Name.
            pub name: &'wire [u8] => padded(4),
            /// Body.
            pub body: &'wire [u8] => prefixed,
        }
    }

    round_trip_test! {
        plain_round_trip: {
            bytes: &[
                0x00, 0x07, 0x00, 0x00, 0x00,
                b'a', b'b', 0x00, 0x00,
                0x01, 0xaa,
            ],
            value: Demo {
                kind: Kind::Plain,
                counter: 7,
                tag: None,
                name: b"ab",
                body: &[0xaa],
            },
        },
        tagged_round_trip: {
            bytes: &[
                0x01, 0x00, 0x01, 0x00, 0x00,
                0x12, 0x34,
                0x00, 0x00, 0x00, 0x00,
                0x00,
            ],
            value: Demo {
                kind: Kind::Tagged,
                counter: 0x100,
                tag: Some([0x12, 0x34]),
                name: b"",
                body: &[],
            },
        },
    }

    #[test]
    fn presence_must_match_condition() {
        let demo = Demo {
            kind: Kind::Plain,
            counter: 0,
            tag: Some([1, 2]),
            name: b"",
            body: b"",
        };
        assert_eq!(demo.wire_len(), Err(wire::Error::FieldPresence));
    }

    #[test]
    fn padded_needs_room_for_terminator() {
        let demo = Demo {
            kind: Kind::Plain,
            counter: 0,
            tag: None,
            name: b"abcd",
            body: b"",
        };
        assert_eq!(demo.wire_len(), Err(wire::Error::TooLong));
    }

    #[test]
    fn truncated_prefix() {
        let mut bytes: &[u8] = &[0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0x05, 0xaa];
        assert!(Demo::from_wire(&mut bytes).is_err());
    }

    #[test]
    fn masked_lookup_ignores_high_bits() {
        let mut bytes: &[u8] = &[0xf0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00];
        let demo = Demo::from_wire(&mut bytes).unwrap();
        assert_eq!(demo.kind, Kind::Plain);
        assert_eq!(read_prefixed(&mut &[0x01u8, 0x02][..]), Ok(&[0x02u8][..]));
    }
}
