// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Traits for converting integers to and from byte representations.
//!
//! IPMI uses both byte orders: the ASF layer inherits network order from the
//! DMTF specification, while everything from the session header inwards is
//! little-endian.

use core::mem;

use byteorder::ByteOrder as _;
use byteorder::BE;
use byteorder::LE;

use crate::io;
use crate::io::Read;
use crate::io::Write;

/// A little-endian integer, which can be read and written.
pub trait LeInt: Sized + Copy {
    /// Reads a value of type `Self`, in little-endian order.
    fn read_from<'a, R: Read<'a> + ?Sized>(r: &mut R) -> Result<Self, io::Error>;

    /// Writes a value of type `Self`, in little-endian order.
    fn write_to<W: Write + ?Sized>(self, w: &mut W) -> Result<(), io::Error>;
}

/// A big-endian integer, which can be read and written.
pub trait BeInt: Sized + Copy {
    /// Reads a value of type `Self`, in big-endian order.
    fn read_be_from<'a, R: Read<'a> + ?Sized>(
        r: &mut R,
    ) -> Result<Self, io::Error>;

    /// Writes a value of type `Self`, in big-endian order.
    fn write_be_to<W: Write + ?Sized>(self, w: &mut W) -> Result<(), io::Error>;
}

impl LeInt for u8 {
    #[inline]
    fn read_from<'a, R: Read<'a> + ?Sized>(r: &mut R) -> Result<Self, io::Error> {
        Ok(r.read_bytes(1)?[0])
    }

    #[inline]
    fn write_to<W: Write + ?Sized>(self, w: &mut W) -> Result<(), io::Error> {
        w.write_bytes(&[self])
    }
}

macro_rules! int_impls {
    ($($ty:ident: $read:ident, $write:ident;)*) => {$(
        impl LeInt for $ty {
            #[inline]
            fn read_from<'a, R: Read<'a> + ?Sized>(
                r: &mut R,
            ) -> Result<Self, io::Error> {
                let bytes = r.read_bytes(mem::size_of::<Self>())?;
                Ok(LE::$read(bytes))
            }

            #[inline]
            fn write_to<W: Write + ?Sized>(
                self,
                w: &mut W,
            ) -> Result<(), io::Error> {
                let mut bytes = [0; mem::size_of::<Self>()];
                LE::$write(&mut bytes, self);
                w.write_bytes(&bytes)
            }
        }

        impl BeInt for $ty {
            #[inline]
            fn read_be_from<'a, R: Read<'a> + ?Sized>(
                r: &mut R,
            ) -> Result<Self, io::Error> {
                let bytes = r.read_bytes(mem::size_of::<Self>())?;
                Ok(BE::$read(bytes))
            }

            #[inline]
            fn write_be_to<W: Write + ?Sized>(
                self,
                w: &mut W,
            ) -> Result<(), io::Error> {
                let mut bytes = [0; mem::size_of::<Self>()];
                BE::$write(&mut bytes, self);
                w.write_bytes(&bytes)
            }
        }
    )*};
}

int_impls! {
    u16: read_u16, write_u16;
    u32: read_u32, write_u32;
    u64: read_u64, write_u64;
}

/// Reads a three-byte little-endian integer, such as an IANA enterprise
/// number embedded in an IPMI response.
pub fn read_u24_le<'a, R: Read<'a> + ?Sized>(
    r: &mut R,
) -> Result<u32, io::Error> {
    Ok(LE::read_u24(r.read_bytes(3)?))
}

/// Writes the low three bytes of `val` in little-endian order.
pub fn write_u24_le<W: Write + ?Sized>(
    val: u32,
    w: &mut W,
) -> Result<(), io::Error> {
    let mut bytes = [0; 3];
    LE::write_u24(&mut bytes, val & 0xff_ffff);
    w.write_bytes(&bytes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_orders() {
        let mut bytes: &[u8] = &[0x78, 0x56, 0x34, 0x12, 0x00, 0x00, 0x11, 0xbe];
        assert_eq!(u32::read_from(&mut bytes).unwrap(), 0x12345678);
        assert_eq!(u32::read_be_from(&mut bytes).unwrap(), 4542);

        let mut buf = [0; 4];
        let mut w = &mut buf[..];
        0x12345678u32.write_to(&mut w).unwrap();
        assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn u24() {
        let mut bytes: &[u8] = &[0x57, 0x01, 0x00, 0xff];
        assert_eq!(read_u24_le(&mut bytes).unwrap(), 0x157);
        assert_eq!(bytes, &[0xff]);

        let mut buf = [0; 3];
        write_u24_le(0xaa_000157, &mut &mut buf[..]).unwrap();
        assert_eq!(buf, [0x57, 0x01, 0x00]);
    }
}
