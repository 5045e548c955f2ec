// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Internal `serde` helpers.

// Some configurations may not use every helper defined here.
#![allow(unused)]

use core::fmt;
use core::time::Duration;

use enumflags2::BitFlag;
use enumflags2::BitFlags;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Serializes a value through its `Debug` representation.
struct DebugStr<T>(T);

impl<T: fmt::Debug> Serialize for DebugStr<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&format_args!("{:?}", self.0))
    }
}

/// Serializes a set of flags as the list of the names of the flags that are
/// set, rather than as a raw bitmask.
///
/// Use as `#[serde(serialize_with = "crate::serde::flag_names")]`.
pub fn flag_names<T, S>(flags: &BitFlags<T>, s: S) -> Result<S::Ok, S::Error>
where
    T: BitFlag + fmt::Debug,
    S: Serializer,
{
    s.collect_seq(flags.iter().map(DebugStr))
}

/// Serializes a byte slice as a lowercase hex string.
///
/// Use as `#[serde(serialize_with = "crate::serde::hex")]`.
pub fn hex<B, S>(bytes: &B, s: S) -> Result<S::Ok, S::Error>
where
    B: AsRef<[u8]> + ?Sized,
    S: Serializer,
{
    struct Hex<'a>(&'a [u8]);
    impl fmt::Display for Hex<'_> {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            for b in self.0 {
                write!(f, "{:02x}", b)?;
            }
            Ok(())
        }
    }
    s.collect_str(&Hex(bytes.as_ref()))
}

/// Deserializes a [`Duration`] from a whole number of milliseconds.
///
/// Use as `#[serde(deserialize_with = "crate::serde::millis")]`.
///
/// [`Duration`]: https://doc.rust-lang.org/core/time/struct.Duration.html
pub fn millis<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(d).map(Duration::from_millis)
}
