// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Test data: golden AuthCode vectors and captured BMC datagrams.

pub mod authcode;
pub mod datagrams;
