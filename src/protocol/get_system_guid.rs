// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `get_system_guid` request and response.

use core::fmt;

use crate::protocol::ipmb::NetFn;
use crate::protocol::Command;
use crate::protocol::Descriptor;
use crate::protocol::Length;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A command for requesting the GUID of the managed system.
pub enum GetSystemGuid {}

/// The descriptor for [`GetSystemGuid`].
///
/// [`GetSystemGuid`]: enum.GetSystemGuid.html
pub const DESCRIPTOR: Descriptor = Descriptor {
    name: "get_system_guid",
    netfn: NetFn::App,
    code: 0x37,
    description: "Get System GUID",
    completion_codes: &[],
    response_len: Length::Exactly(16),
};

impl Command<'_> for GetSystemGuid {
    type Req = GetSystemGuidRequest;
    type Resp = GetSystemGuidResponse;
    const DESCRIPTOR: &'static Descriptor = &self::DESCRIPTOR;
}

wire_record! {
    /// The [`GetSystemGuid`] request.
    ///
    /// [`GetSystemGuid`]: enum.GetSystemGuid.html
    pub struct GetSystemGuidRequest {}
}

wire_record! {
    /// The [`GetSystemGuid`] response.
    ///
    /// The GUID is kept in the byte order the BMC sent it in; its `Display`
    /// form is the usual `8-4-4-4-12` hex grouping of those bytes.
    ///
    /// [`GetSystemGuid`]: enum.GetSystemGuid.html
    pub struct GetSystemGuidResponse {
        /// The raw GUID.
        pub guid: [u8; 16] => array,
    }
}

impl fmt::Display for GetSystemGuidResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, b) in self.guid.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl Serialize for GetSystemGuidResponse {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct as _;
        let mut st = s.serialize_struct("GetSystemGuidResponse", 1)?;
        st.serialize_field("guid", &format_args!("{}", self))?;
        st.end()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const GUID: [u8; 16] = [
        0x44, 0x45, 0x4c, 0x4c, 0x38, 0x00, 0x10, 0x4e, 0x80, 0x48, 0xb4,
        0xc0, 0x4f, 0x50, 0x34, 0x32,
    ];

    round_trip_test! {
        request_round_trip: {
            bytes: &[],
            value: GetSystemGuidRequest {},
        },
        response_round_trip: {
            bytes: &GUID,
            value: GetSystemGuidResponse { guid: GUID },
        },
    }

    #[test]
    fn display_groups() {
        assert_eq!(
            GetSystemGuidResponse { guid: GUID }.to_string(),
            "44454c4c-3800-104e-8048-b4c04f503432"
        );
    }
}
