// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Debug-logging functionality.
//!
//! This module is still present when the `log` feature is disabled, but all
//! logging operations are redacted. Redaction completely compiles out log
//! statements: not even the format strings remain in the final binary.
//!
//! `ipmilan` code *should not* call into the [`log`] crate directly outside of
//! this module.

use core::fmt;

#[cfg(doc)]
use __raw_log as log;

/// A wrapped `ipmilan` error.
///
/// This type should always be referred to as `ipmilan::Error`. It represents
/// an error with extra (potentially redacted) information attached. This type
/// cannot be directly created by users of the library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Error<E> {
    inner: E,
}

impl<E> Error<E> {
    /// Creates a new `Error`. This function is an implementation detail,
    /// and should not be called by users.
    #[doc(hidden)]
    pub fn __new(inner: E) -> Self {
        Self { inner }
    }

    /// Transforms the wrapper error by way of an [`Into`] conversion.
    ///
    /// Generally, this function should not be necessary, because
    /// `ipmilan`-defined error types manually implement the relevant [`From`]
    /// implementations for `ipmilan::Error`, which in turn call `cast()`.
    pub fn cast<F: From<E>>(self) -> Error<F> {
        Error {
            inner: self.inner.into(),
        }
    }

    /// Gets the wrapped error.
    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E> AsRef<E> for Error<E> {
    fn as_ref(&self) -> &E {
        &self.inner
    }
}

impl<E> AsMut<E> for Error<E> {
    fn as_mut(&mut self) -> &mut E {
        &mut self.inner
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.inner.fmt(f)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}

/// Generates `From` implementations for `ipmilan::Error`.
///
/// We would like to write this `impl`:
/// ```compile_fail
/// # use ipmilan::Error;
/// impl<E1, E2> From<Error<E1>> for Error<E2> where E2: From<E1> {
///     fn from(e: Error<E1>) -> Error<E2> {
///         e.cast()
///     }
/// }
/// ```
///
/// Unfortunately, the trait coherence rules mean that for `E1 == E2`,
/// this conflicts with the standard library's `impl<T> From<T> for T`
/// impl. We work around this by calling this macro for every `ipmilan`
/// error definition that has `From` impls.
macro_rules! debug_from {
    ($e:ty => $($f:ty),+ $(,)?) => {$(
        impl From<$crate::Error<$f>> for $crate::Error<$e> {
            fn from(e: $crate::Error<$f>) -> Self {
                e.cast()
            }
        }
    )*};
}

/// Checks a condition, logging if it fails.
///
/// If the condition does not hold, constructs the given error, logs it, and
/// returns out of the current function with it.
macro_rules! check {
    ($cond:expr, $error:expr) => {
        if !$cond {
            let error = $error;
            return Err(fail!(
                error,
                "check failure: `{}`; returned {:?}",
                stringify!($cond),
                error,
            )
            .into());
        }
    };
}

/// Logs a newly-created error value and wraps it in an [`Error`].
///
/// This macro is the main way to generate [`Error`] values.
///
/// For example, instead of writing `foo.ok_or(MyError)`, instead write
/// `foo.ok_or_else(|| fail!(MyError))`.
macro_rules! fail {
    ($error:expr, $($format:tt)+) => {{
        error!($($format)+);
        $crate::debug::Error::__new($error)
    }};
    ($error:expr) => {{
        let error = $error;
        error!("generated error: `{:?}`", error);
        $crate::debug::Error::__new(error)
    }};
}

/// Redactable version of [`log::trace!()`].
macro_rules! trace {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::trace!($($args)*);
    }
}

/// Redactable version of [`log::info!()`].
macro_rules! info {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::info!($($args)*);
    }
}

/// Redactable version of [`log::warn!()`].
macro_rules! warn {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::warn!($($args)*);
    }
}

/// Redactable version of [`log::error!()`].
macro_rules! error {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::error!($($args)*);
    }
}

/// Formats a byte buffer as rows of sixteen hex bytes, for packet dumps.
///
/// ```
/// # use ipmilan::HexDump;
/// assert_eq!(HexDump(&[0x06, 0x00, 0xff, 0x07]).to_string(), " 06 00 ff 07");
/// ```
#[derive(Copy, Clone)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 && i % 16 == 0 {
                f.write_str("\n")?;
            }
            write!(f, " {:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} bytes)\n{}", self.0.len(), self)
    }
}

/// Set up some life-before-main code that initializes a basic logger for the
/// test binary.
///
/// This needs to happen here, since the test binary's main() cannot be
/// overridden.
#[cfg(test)]
#[ctor::ctor]
fn init_test_logger() {
    env_logger::builder()
        .is_test(true)
        .filter_level(__raw_log::LevelFilter::Trace)
        .format(move |_, record| {
            let thread = std::thread::current();
            let name = thread.name().unwrap_or("<unknown>");
            for line in record.args().to_string().trim().lines() {
                // NOTE: we explicitly print to stderr, since this allows the
                // Rust test harness to suppress log statements originating from
                // passing tests.
                eprintln!(
                    "[{level}({thread}) {file}:{line}] {msg}",
                    level = record.level(),
                    thread = name,
                    file = record.file().unwrap_or("<unknown>"),
                    line = record.line().unwrap_or(0),
                    msg = line,
                )
            }
            Ok(())
        })
        .init();
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_dump_wraps_rows() {
        let bytes = (0u8..18).collect::<Vec<_>>();
        assert_eq!(
            HexDump(&bytes).to_string(),
            " 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f\n 10 11"
        );
        assert_eq!(HexDump(&[]).to_string(), "");
    }

    #[test]
    fn check_returns_wrapped_error() {
        fn positive(x: i32) -> crate::Result<i32, &'static str> {
            check!(x > 0, "not positive");
            Ok(x)
        }
        assert_eq!(positive(3), Ok(3));
        assert_eq!(positive(-1).unwrap_err().into_inner(), "not positive");
    }
}
