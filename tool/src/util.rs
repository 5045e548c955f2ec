// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! I/O utilities.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Like `?`, but crashes the binary with a nice error message.
macro_rules! check {
    ($result:expr, $fmt:literal $(, $args:expr)* $(,)?) => {
        match $result {
            Ok(x) => x,
            Err(e) => {
                eprintln!("error: {}: {}", format_args!($fmt, $($args,)*), e);
                std::process::exit(2)
            }
        }
    }
}

/// Loads a JSON value from the file at `path`.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> T {
    let path = path.as_ref();
    let file = check!(File::open(path), "failed to open {}", path.display());
    check!(
        serde_json::from_reader(BufReader::new(file)),
        "failed to parse {}",
        path.display()
    )
}

/// Prints `value` to stdout as JSON, followed by a newline.
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if pretty {
        serde_json::to_writer_pretty(&mut out, value)
    } else {
        serde_json::to_writer(&mut out, value)
    };
    check!(result, "failed to write output");
    check!(writeln!(out), "failed to write output");
}
