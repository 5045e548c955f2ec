// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! IPMI 1.5 session AuthCodes.
//!
//! Once a session is being activated, every message carries a 16-byte
//! AuthCode in its session header, proving that the sender knows the shared
//! password. Two schemes are implemented:
//! - `password`, where the AuthCode is simply the zero-padded password.
//! - `md5`, where the AuthCode is an MD5 digest over the padded password,
//!   the session ID, the IPMB frame, the sequence number and the padded
//!   password again.
//!
//! The sequence number is left out of the digest for the session activation
//! message, which is sent with a sequence number of zero.

use core::fmt;

use crate::crypto::hash;
use crate::crypto::hash::EngineExt as _;
use crate::protocol::ipmi::AuthType;
use crate::protocol::ipmi::AUTH_CODE_LEN;
use crate::Result;

/// The length a password is padded to; longer passwords are rejected.
pub const PASSWORD_LEN: usize = 16;

/// An error returned when computing an AuthCode.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    /// The auth type cannot be used for a multi-session AuthCode.
    NotMultiSession(AuthType),
    /// The password is longer than [`PASSWORD_LEN`].
    PasswordTooLong,
    /// The hash engine failed.
    Hash(hash::Error),
}

impl From<hash::Error> for Error {
    fn from(e: hash::Error) -> Self {
        Self::Hash(e)
    }
}

debug_from!(Error => hash::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotMultiSession(t) => {
                write!(f, "{:?} is not a multi-session auth type", t)
            }
            Self::PasswordTooLong => {
                write!(f, "password exceeds {} bytes", PASSWORD_LEN)
            }
            Self::Hash(e) => write!(f, "hash failure: {}", e),
        }
    }
}

/// Zero-pads `password` to [`PASSWORD_LEN`] bytes.
pub fn pad_password(password: &[u8]) -> Result<[u8; PASSWORD_LEN], Error> {
    check!(password.len() <= PASSWORD_LEN, Error::PasswordTooLong);
    let mut padded = [0; PASSWORD_LEN];
    padded[..password.len()].copy_from_slice(password);
    Ok(padded)
}

/// Computes the AuthCode for a message.
///
/// `payload` is the full IPMB frame the session header wraps. `sequence` is
/// the header's sequence number, or `None` for the activation message.
pub fn compute<E: hash::Engine + ?Sized>(
    engine: &mut E,
    auth_type: AuthType,
    password: &[u8],
    session_id: u32,
    payload: &[u8],
    sequence: Option<u32>,
) -> Result<[u8; AUTH_CODE_LEN], Error> {
    match auth_type {
        AuthType::Password => pad_password(password),
        AuthType::Md5 => {
            let password = pad_password(password)?;
            let mut code = [0; AUTH_CODE_LEN];
            let mut h = engine.new_hash(hash::Algo::Md5)?;
            h.write(&password)?;
            h.write(&session_id.to_le_bytes())?;
            h.write(payload)?;
            if let Some(seq) = sequence {
                h.write(&seq.to_le_bytes())?;
            }
            h.write(&password)?;
            h.finish(&mut code)?;
            Ok(code)
        }
        t => Err(fail!(Error::NotMultiSession(t))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::md5;
    use pretty_assertions::assert_eq;
    use testutil::data::authcode as golden;

    #[test]
    fn md5_with_sequence() {
        let code = compute(
            &mut md5::Engine::new(),
            AuthType::Md5,
            golden::PASSWORD,
            golden::SESSION_ID,
            golden::PAYLOAD,
            Some(golden::SEQUENCE),
        )
        .unwrap();
        assert_eq!(&code, golden::MD5_WITH_SEQUENCE);
    }

    #[test]
    fn md5_activation() {
        let code = compute(
            &mut md5::Engine::new(),
            AuthType::Md5,
            golden::PASSWORD,
            golden::SESSION_ID,
            golden::PAYLOAD,
            None,
        )
        .unwrap();
        assert_eq!(&code, golden::MD5_WITHOUT_SEQUENCE);
    }

    #[test]
    fn straight_password() {
        let code = compute(
            &mut md5::Engine::new(),
            AuthType::Password,
            b"ADMIN",
            1,
            &[],
            Some(1),
        )
        .unwrap();
        assert_eq!(&code[..5], b"ADMIN");
        assert!(code[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn password_length() {
        assert!(pad_password(&[b'x'; PASSWORD_LEN]).is_ok());
        assert_eq!(
            pad_password(&[b'x'; PASSWORD_LEN + 1])
                .unwrap_err()
                .into_inner(),
            Error::PasswordTooLong
        );
    }

    #[test]
    fn other_auth_types() {
        for &t in &[AuthType::None, AuthType::Md2, AuthType::Oem] {
            let err = compute(&mut md5::Engine::new(), t, b"", 0, &[], None)
                .unwrap_err();
            assert_eq!(err.into_inner(), Error::NotMultiSession(t));
        }

        // The auth type is rejected before the password is looked at.
        let long = [b'x'; PASSWORD_LEN + 1];
        let err =
            compute(&mut md5::Engine::new(), AuthType::None, &long, 0, &[], None)
                .unwrap_err();
        assert_eq!(err.into_inner(), Error::NotMultiSession(AuthType::None));
        for &t in &[AuthType::Password, AuthType::Md5] {
            let err = compute(&mut md5::Engine::new(), t, &long, 0, &[], None)
                .unwrap_err();
            assert_eq!(err.into_inner(), Error::PasswordTooLong);
        }
    }
}
