// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv4 addresses and networks.

mod address;
mod network;
mod tokenizer;

use crate::GroupBuffer;

pub use address::Ipv4;
pub use network::{Ipv4Network, NetworkClass};
pub(crate) use tokenizer::tokenize;

/// Four 8-bit limbs, most significant first.
pub type V4Groups = GroupBuffer<u8, 4>;
