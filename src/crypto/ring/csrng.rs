// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! An OS-backed [`csrng::Csrng`], based on `ring`.
//!
//! [`csrng::Csrng`]: ../../csrng/trait.Csrng.html

use ring::rand::SecureRandom as _;
use ring::rand::SystemRandom;

use crate::crypto::csrng;
use crate::Result;

/// A [`csrng::Csrng`] backed by OS-supplied entropy.
///
/// [`csrng::Csrng`]: ../../csrng/trait.Csrng.html
#[derive(Clone)]
pub struct Csrng {
    inner: SystemRandom,
}

impl Csrng {
    /// Creates a new entropy source.
    pub fn new() -> Self {
        Self {
            inner: SystemRandom::new(),
        }
    }
}

impl Default for Csrng {
    fn default() -> Self {
        Self::new()
    }
}

impl csrng::Csrng for Csrng {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), csrng::Error> {
        self.inner
            .fill(buf)
            .map_err(|_| fail!(csrng::Error::Unspecified))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::csrng::CsrngExt as _;

    #[test]
    #[cfg_attr(miri, ignore)]
    fn draws_differ() {
        let mut rng = Csrng::new();
        let draws = (0..4).map(|_| rng.next_u32().unwrap()).collect::<Vec<_>>();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }
}
