// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! IPMI completion codes.
//!
//! Every IPMB response carries a one-byte completion code immediately after
//! its command byte. Codes `0x00` and `0xc0..=0xff` have a global meaning;
//! codes in `0x01..=0x7e` and `0x80..=0xbe` are command-specific, and are
//! described by a per-command override table (see [`Descriptor`]).
//!
//! [`Descriptor`]: ../struct.Descriptor.html

use core::fmt;

use crate::protocol::wire;
use crate::protocol::wire::WireEnum;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

wire_enum! {
    /// A globally-defined IPMI completion code.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum CompletionCode: u8 {
        /// Command completed normally.
        Success = 0x00,
        /// Node busy.
        Busy = 0xc0,
        /// Invalid command.
        InvalidCommand = 0xc1,
        /// Command invalid for the given LUN.
        InvalidForLun = 0xc2,
        /// Timeout while processing command.
        ProcessingTimeout = 0xc3,
        /// Out of space.
        OutOfSpace = 0xc4,
        /// Reservation canceled or invalid reservation ID.
        ReservationCancelled = 0xc5,
        /// Request data truncated.
        RequestTruncated = 0xc6,
        /// Request data length invalid.
        RequestLengthInvalid = 0xc7,
        /// Request data field length limit exceeded.
        RequestFieldTooLong = 0xc8,
        /// Parameter out of range.
        ParameterOutOfRange = 0xc9,
        /// Cannot return the number of requested data bytes.
        CannotReturnBytes = 0xca,
        /// Requested sensor, data, or record not present.
        NotPresent = 0xcb,
        /// Invalid data field in request.
        InvalidDataField = 0xcc,
        /// Command illegal for specified sensor or record type.
        IllegalForType = 0xcd,
        /// Command response could not be provided.
        NoResponse = 0xce,
        /// Cannot execute duplicated request.
        DuplicateRequest = 0xcf,
        /// SDR repository in update mode.
        SdrUpdateMode = 0xd0,
        /// Device in firmware update mode.
        FirmwareUpdateMode = 0xd1,
        /// BMC initialization in progress.
        BmcInitializing = 0xd2,
        /// Destination unavailable.
        DestinationUnavailable = 0xd3,
        /// Insufficient privilege level or other security-based restriction.
        InsufficientPrivilege = 0xd4,
        /// Command not supported in present state.
        NotSupportedInState = 0xd5,
        /// Parameter is illegal because a sub-function is unavailable.
        SubFunctionDisabled = 0xd6,
        /// Unspecified error.
        Unspecified = 0xff,
    }
}

impl CompletionCode {
    /// Returns the human-readable description of this code.
    pub fn description(self) -> &'static str {
        use CompletionCode::*;
        match self {
            Success => "success",
            Busy => "busy",
            InvalidCommand => "invalid command",
            InvalidForLun => "command invalid for LUN",
            ProcessingTimeout => "command processing timeout",
            OutOfSpace => "out of space",
            ReservationCancelled => "reservation cancelled or ID invalid",
            RequestTruncated => "request data truncated",
            RequestLengthInvalid => "request data length invalid",
            RequestFieldTooLong => "request data field length limited exceeded",
            ParameterOutOfRange => "parameter out of range",
            CannotReturnBytes => "cannot return number of requested data bytes",
            NotPresent => "requested sensor/data/record not present",
            InvalidDataField => "invalid data field in request",
            IllegalForType => "illegal command for sensor/record type",
            NoResponse => "command response could not be provided",
            DuplicateRequest => "cannot execute duplicated request",
            SdrUpdateMode => {
                "command response could not be provided: \
                 SDR repository in update mode"
            }
            FirmwareUpdateMode => {
                "command response could not be provided: \
                 device in firmware update mode"
            }
            BmcInitializing => {
                "command response could not be provided: \
                 BMC initialisation in progress"
            }
            DestinationUnavailable => "destination unavailable",
            InsufficientPrivilege => {
                "insufficient privilege or other security issue"
            }
            NotSupportedInState => {
                "cannot execute command; not supported in present state"
            }
            SubFunctionDisabled => {
                "cannot execute command; parameter is illegal because \
                 sub-function disabled or unavailable"
            }
            Unspecified => "unspecified",
        }
    }
}

/// A decoded completion code: either a global one, or one defined by the
/// command that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Completion {
    /// A globally-defined code.
    Standard(CompletionCode),
    /// A command-specific code.
    Specific {
        /// The raw code.
        code: u8,
        /// The command's description of the code.
        description: &'static str,
    },
}

impl Completion {
    /// The successful completion.
    pub const SUCCESS: Self = Self::Standard(CompletionCode::Success);

    /// Resolves a raw completion code.
    ///
    /// The command-specific `overrides` are consulted first; only if none
    /// match is the global table used. A code found in neither is an error.
    pub fn resolve(
        code: u8,
        overrides: &[(u8, &'static str)],
    ) -> Result<Self, wire::Error> {
        if let Some(&(_, description)) =
            overrides.iter().find(|&&(c, _)| c == code)
        {
            return Ok(Self::Specific { code, description });
        }
        CompletionCode::from_wire_value(code)
            .map(Self::Standard)
            .ok_or(wire::Error::OutOfRange)
    }

    /// Returns the raw wire value of this code.
    pub fn code(self) -> u8 {
        match self {
            Self::Standard(c) => c.to_wire_value(),
            Self::Specific { code, .. } => code,
        }
    }

    /// Returns the description of this code.
    pub fn description(self) -> &'static str {
        match self {
            Self::Standard(c) => c.description(),
            Self::Specific { description, .. } => description,
        }
    }

    /// Returns whether this code indicates success.
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl From<CompletionCode> for Completion {
    fn from(c: CompletionCode) -> Self {
        Self::Standard(c)
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.description(), self.code())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const OVERRIDES: &[(u8, &str)] = &[(0x81, "invalid user name")];

    #[test]
    fn overrides_take_precedence() {
        assert_eq!(
            Completion::resolve(0x81, OVERRIDES),
            Ok(Completion::Specific {
                code: 0x81,
                description: "invalid user name",
            })
        );
        assert_eq!(
            Completion::resolve(0xd4, OVERRIDES),
            Ok(Completion::Standard(CompletionCode::InsufficientPrivilege))
        );
        assert!(Completion::resolve(0x00, &[]).unwrap().is_success());
    }

    #[test]
    fn unmapped_code_fails() {
        assert_eq!(Completion::resolve(0x81, &[]), Err(wire::Error::OutOfRange));
        assert_eq!(Completion::resolve(0xd7, OVERRIDES), Err(wire::Error::OutOfRange));
    }

    #[test]
    fn display() {
        assert_eq!(
            Completion::Standard(CompletionCode::Busy).to_string(),
            "busy (0xc0)"
        );
    }
}
