// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! An implementation of [`crypto::hash`] based on the `md-5` crate.
//!
//! MD5 is long broken as a general-purpose digest; it is provided only
//! because IPMI 1.5 authenticates session messages with it.
//!
//! [`crypto::hash`]: ../hash/index.html

use core::mem;

use ::md5::Digest as _;
use ::md5::Md5;

use crate::crypto::hash;
use crate::Result;

/// A software MD5 [`hash::Engine`].
///
/// [`hash::Engine`]: ../hash/trait.Engine.html
#[derive(Default)]
pub struct Engine {
    inner: Option<Md5>,
}

impl Engine {
    /// Creates a new `Engine`.
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn take(&mut self, out_len: usize) -> Result<Md5, hash::Error> {
        let ctx = mem::take(&mut self.inner)
            .ok_or_else(|| fail!(hash::Error::Idle))?;
        check!(
            out_len == hash::Algo::Md5.bytes(),
            hash::Error::WrongSize
        );
        Ok(ctx)
    }
}

impl hash::Engine for Engine {
    fn start_raw(&mut self, algo: hash::Algo) -> Result<(), hash::Error> {
        match algo {
            hash::Algo::Md5 => self.inner = Some(Md5::new()),
        }
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), hash::Error> {
        match &mut self.inner {
            Some(ctx) => ctx.update(data),
            None => return Err(fail!(hash::Error::Idle)),
        }
        Ok(())
    }

    fn finish_raw(&mut self, out: &mut [u8]) -> Result<(), hash::Error> {
        let ctx = self.take(out.len())?;
        out.copy_from_slice(&ctx.finalize());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::hash::Algo::Md5;
    use crate::crypto::hash::EngineExt as _;
    use pretty_assertions::assert_eq;

    // RFC 1321, appendix A.5.
    const ABC_MD5: [u8; 16] = [
        0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f,
        0x7d, 0x28, 0xe1, 0x7f, 0x72,
    ];

    #[test]
    fn md5() {
        let mut e = Engine::new();
        let mut digest = [0; Md5.bytes()];

        let mut ctx = e.new_hash(Md5).unwrap();
        ctx.write(b"abc").unwrap();
        ctx.finish(&mut digest).unwrap();
        assert_eq!(digest, ABC_MD5);

        // Starting over discards the previous state.
        let mut ctx = e.new_hash(Md5).unwrap();
        ctx.write(b"xyz").unwrap();
        let mut ctx = e.new_hash(Md5).unwrap();
        ctx.write(b"a").unwrap();
        ctx.write(b"bc").unwrap();
        ctx.finish(&mut digest).unwrap();
        assert_eq!(digest, ABC_MD5);
    }

    #[test]
    fn misuse() {
        let mut e = Engine::new();
        let mut short = [0; 8];
        let mut ctx = e.new_hash(Md5).unwrap();
        ctx.write(b"abc").unwrap();
        assert_eq!(
            ctx.finish(&mut short).unwrap_err().into_inner(),
            hash::Error::WrongSize
        );

        let mut digest = [0; Md5.bytes()];
        assert_eq!(
            hash::Engine::finish_raw(&mut e, &mut digest)
                .unwrap_err()
                .into_inner(),
            hash::Error::Idle
        );
        assert_eq!(
            hash::Engine::write_raw(&mut e, b"abc")
                .unwrap_err()
                .into_inner(),
            hash::Error::Idle
        );
    }
}
