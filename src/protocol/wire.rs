// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Wire format traits.
//!
//! This module provides [`FromWire`] and [`ToWire`], a pair of traits similar
//! to the core traits in the [`serde`] library. Rather than representing a
//! generically serializeable type, they represent types that can be converted
//! to and from the IPMI-over-LAN wire format, a stack of fixed-layout
//! envelopes with a handful of length prefixes and conditional fields.
//!
//! [`serde`]: https://serde.rs

use core::fmt;

use crate::io;
use crate::io::endian::LeInt;
use crate::io::Measure;
use crate::io::Read;
use crate::io::Write;

/// A type which can be deserialized from the IPMI wire format.
///
/// The lifetime `'wire` indicates that the type can be deserialized from a
/// buffer of lifetime `'wire`; byte ranges may be borrowed from it.
pub trait FromWire<'wire>: Sized {
    /// Deserializes a `Self` out of `r`.
    fn from_wire<R: Read<'wire> + ?Sized>(r: &mut R) -> Result<Self, Error>;
}

/// A type which can be serialized into the IPMI wire format.
pub trait ToWire {
    /// Serializes `self` into `w`.
    fn to_wire<W: Write>(&self, w: W) -> Result<(), Error>;

    /// Returns the number of bytes [`to_wire()`] would write.
    ///
    /// This runs the full encoder against a [`Measure`], so every validation
    /// `to_wire()` performs also happens here. Callers use this to size a
    /// buffer before the real encoding pass.
    ///
    /// [`to_wire()`]: #tymethod.to_wire
    /// [`Measure`]: ../../io/measure/struct.Measure.html
    fn wire_len(&self) -> Result<usize, Error> {
        let mut measure = Measure::new();
        self.to_wire(&mut measure)?;
        Ok(measure.len())
    }
}

/// A marshalling error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Indicates that something went wrong in an `io` operation.
    ///
    /// When decoding, this almost always means the input was truncated.
    Io(io::Error),

    /// Indicates that some field was outside of its valid range, such as an
    /// enumerated code with no corresponding variant.
    OutOfRange,

    /// Indicates that a field held a recognized value that this crate does
    /// not implement, such as the RMCP+ authentication type.
    Unsupported(&'static str),

    /// Indicates that an RMCP header carried the wrong version byte.
    BadVersion,

    /// Indicates that an RMCP ACK violated the ACK framing rules.
    BadAck,

    /// Indicates that an ASF message carried an enterprise number other than
    /// the ASF IANA number.
    BadEnterprise,

    /// Indicates that a declared length did not match the number of bytes
    /// actually present.
    LengthMismatch,

    /// Indicates that a message was shorter than its minimum length.
    TooShort,

    /// Indicates that a message had bytes left over after decoding, or was
    /// too long for its length prefix.
    TooLong,

    /// Indicates that the IPMB header checksum did not verify.
    Checksum1,

    /// Indicates that the IPMB body checksum did not verify.
    Checksum2,

    /// Indicates that an IPMB frame named a command that is not in the
    /// command catalog.
    UnknownCommand {
        /// The network function code, without the direction bit.
        netfn: u8,
        /// The command code.
        code: u8,
    },

    /// Indicates that an optional field's presence disagreed with the field
    /// that governs it, e.g. an auth code on an unauthenticated message.
    FieldPresence,
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

debug_from!(Error => io::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(io::Error::BufferExhausted) => {
                write!(f, "buffer exhausted (truncated message)")
            }
            Self::Io(e) => write!(f, "i/o error: {:?}", e),
            Self::OutOfRange => write!(f, "value out of range"),
            Self::Unsupported(why) => write!(f, "unsupported: {}", why),
            Self::BadVersion => write!(f, "bad RMCP version"),
            Self::BadAck => write!(f, "malformed RMCP ACK"),
            Self::BadEnterprise => write!(f, "unexpected ASF enterprise number"),
            Self::LengthMismatch => write!(f, "declared length mismatch"),
            Self::TooShort => write!(f, "message too short"),
            Self::TooLong => write!(f, "message too long"),
            Self::Checksum1 => write!(f, "IPMB header checksum mismatch"),
            Self::Checksum2 => write!(f, "IPMB body checksum mismatch"),
            Self::UnknownCommand { netfn, code } => write!(
                f,
                "unknown command: netfn {:#04x}, code {:#04x}",
                netfn, code
            ),
            Self::FieldPresence => write!(f, "optional field presence mismatch"),
        }
    }
}

/// Decodes a `T` out of `bytes`, requiring that every byte be consumed.
pub fn decode_exact<'wire, T: FromWire<'wire>>(
    mut bytes: &'wire [u8],
) -> Result<T, Error> {
    let val = T::from_wire(&mut bytes)?;
    if !bytes.is_empty() {
        return Err(Error::TooLong);
    }
    Ok(val)
}

/// Encodes `val` into a freshly allocated buffer of exactly the right size.
///
/// The buffer is only allocated after [`ToWire::wire_len()`] succeeds, so an
/// invalid value never allocates.
///
/// [`ToWire::wire_len()`]: trait.ToWire.html#method.wire_len
#[cfg(feature = "std")]
pub fn to_vec<T: ToWire + ?Sized>(val: &T) -> Result<Vec<u8>, Error> {
    let len = val.wire_len()?;
    let mut buf = vec![0; len];
    val.to_wire(&mut buf[..])?;
    Ok(buf)
}

/// Raw bytes are written verbatim.
impl ToWire for [u8] {
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), Error> {
        w.write_bytes(self)?;
        Ok(())
    }
}

/// Represents a C-like enum that can be converted to and from a wire
/// representation as well as to and from a string representation.
///
/// An implementation of this trait can be thought of as an unsigned
/// integer with a limited range: every enum variant can be converted
/// to the wire format and back, though not every value of the wire
/// representation can be converted into an enum variant.
///
/// In particular the following identity must hold for all types T:
/// ```
/// # use ipmilan::protocol::wire::WireEnum;
/// # fn test<T: WireEnum + Copy + PartialEq + std::fmt::Debug>(x: T) {
/// assert_eq!(T::from_wire_value(T::to_wire_value(x)), Some(x));
/// # }
/// ```
///
/// Also, the following identity must hold for all types T:
/// ```
/// # use ipmilan::protocol::wire::WireEnum;
/// # fn test<T: WireEnum + Copy + PartialEq + std::fmt::Debug>(x: T) {
/// assert_eq!(T::from_name(T::name(x)), Some(x));
/// # }
/// ```
///
/// A variant may be marked as *unsupported*: it is a known protocol value,
/// so it round-trips through the functions above, but the wire codecs refuse
/// to produce or accept it, reporting [`Error::Unsupported`] rather than
/// [`Error::OutOfRange`].
///
/// [`Error::Unsupported`]: enum.Error.html#variant.Unsupported
/// [`Error::OutOfRange`]: enum.Error.html#variant.OutOfRange
pub trait WireEnum: Sized + Copy {
    /// The unrelying "wire type". This is almost always some kind of
    /// unsigned integer.
    type Wire;

    /// Converts `self` into its underlying wire representation.
    fn to_wire_value(self) -> Self::Wire;

    /// Attempts to parse a value of `Self` from the underlying wire
    /// representation.
    fn from_wire_value(wire: Self::Wire) -> Option<Self>;

    /// Converts `self` into a string representation.
    fn name(self) -> &'static str;

    /// Attempts to convert a value of `Self` from a string representation.
    ///
    /// Matching is ASCII case-insensitive.
    fn from_name(str: &str) -> Option<Self>;

    /// Returns why `self` is unsupported, if it is.
    fn unsupported(self) -> Option<&'static str> {
        None
    }
}

/// Translates a wire value into an enum, failing for unmapped or unsupported
/// values.
///
/// This is the building block for enum fields that share a byte with other
/// data, which are masked before lookup.
pub fn lookup_value<E>(wire: E::Wire) -> Result<E, Error>
where
    E: WireEnum,
{
    let val = E::from_wire_value(wire).ok_or(Error::OutOfRange)?;
    match val.unsupported() {
        Some(why) => Err(Error::Unsupported(why)),
        None => Ok(val),
    }
}

/// Translates an enum into its wire value, failing for unsupported values.
pub fn lookup_wire<E: WireEnum>(val: E) -> Result<E::Wire, Error> {
    match val.unsupported() {
        Some(why) => Err(Error::Unsupported(why)),
        None => Ok(val.to_wire_value()),
    }
}

impl<'wire, E> FromWire<'wire> for E
where
    E: WireEnum,
    E::Wire: LeInt,
{
    fn from_wire<R: Read<'wire> + ?Sized>(r: &mut R) -> Result<Self, Error> {
        let wire = <Self as WireEnum>::Wire::read_from(r)?;
        lookup_value(wire)
    }
}

impl<E> ToWire for E
where
    E: WireEnum,
    E::Wire: LeInt,
{
    fn to_wire<W: Write>(&self, mut w: W) -> Result<(), Error> {
        lookup_wire(*self)?.write_to(&mut w)?;
        Ok(())
    }
}

/// A deserialization-from-string error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WireEnumFromStrError;

impl fmt::Display for WireEnumFromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown variant")
    }
}

/// A conveinence macro for generating `WireEnum`-implementing enums.
///
/// Syntax is as follows:
/// ```text
/// wire_enum! {
///     /// This is my enum.
///     pub enum MyEnum : u8 {
///         /// Variant `A`.
///         A = 0x00,
///         /// Variant `B`, which we recognize but do not implement.
///         B = 0x01 => unsupported "B is not implemented",
///     }
/// }
/// ```
/// This macro will generate an implementation of `WireEnum<Wire=u8>` for
/// the above enum.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident : $wire:ident {
        $(
            $(#[$meta_variant:meta])*
            $variant:ident = $value:tt $(=> unsupported $why:literal)?,
        )*
    }) => {
        $(#[$meta])*
        #[repr($wire)]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        $vis enum $name {
           $(
               $(#[$meta_variant])*
               $variant = $value,
           )*
        }

        impl $crate::protocol::wire::WireEnum for $name {
            type Wire = $wire;
            fn to_wire_value(self) -> Self::Wire {
                match self {
                    $(
                        Self::$variant => $value,
                    )*
                }
            }
            fn from_wire_value(wire: Self::Wire) -> Option<Self> {
                match wire {
                    $(
                        $value => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => stringify!($variant),
                    )*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                $(
                    if name.eq_ignore_ascii_case(stringify!($variant)) {
                        return Some(Self::$variant);
                    }
                )*
                None
            }

            #[allow(unreachable_patterns)]
            fn unsupported(self) -> Option<&'static str> {
                match self {
                    $($(
                        Self::$variant => Some($why),
                    )?)*
                    _ => None,
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                use $crate::protocol::wire::WireEnum;

                write!(f, "{}", self.name())
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::protocol::wire::WireEnumFromStrError;

            fn from_str(
                s: &str
            ) -> core::result::Result<
                Self,
                $crate::protocol::wire::WireEnumFromStrError
            > {
                use $crate::protocol::wire::WireEnum;

                match $name::from_name(s) {
                    Some(val) => Ok(val),
                    None => Err($crate::protocol::wire::WireEnumFromStrError),
                }
            }
        }
    }
}
