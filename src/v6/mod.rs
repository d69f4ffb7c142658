// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv6 addresses and networks.

mod address;
mod network;
mod tokenizer;

use crate::GroupBuffer;

pub use address::Ipv6;
pub use network::Ipv6Network;
pub(crate) use tokenizer::tokenize;

/// Eight 16-bit limbs, most significant first.
pub type V6Groups = GroupBuffer<u16, 8>;
