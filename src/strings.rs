// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) const SLASH: char = '/';
pub(crate) const BACKSLASH: char = '\\';
pub(crate) const DOT: char = '.';
pub(crate) const COLON: char = ':';
pub(crate) static LOCALHOST: &str = "localhost";
pub(crate) static LOOPBACK_NAMES: [&str; 4] = ["localhost", "lo", "loopback", "eth0"];

// shared
pub(crate) static ERR_BITMASK_NAN: &str = "bitmask is not a number";
pub(crate) static ERR_BITMASK_V4: &str = "bitmask must be within 0..=32";
pub(crate) static ERR_BITMASK_V6: &str = "bitmask must be within 0..=128";
pub(crate) static ERR_ELEMENT_NAN: &str = "address element is not a number";
pub(crate) static ERR_NET_INPUT: &str = "a network is not an address";

// v4/tokenizer.rs
pub(crate) static ERR_V4_OCTET: &str = "IPv4 octet must be within 0..=255";
pub(crate) static ERR_V4_CHAR: &str = "IPv4 address contains a non-digit non-dot character";
pub(crate) static ERR_V4_EMPTY: &str = "IPv4 address contains an empty octet";
pub(crate) static ERR_V4_COUNT: &str = "IPv4 address must have exactly 4 octets";
pub(crate) static ERR_V4_MAPPED: &str = "IPv6 address is not within ::ffff:0:0/96";

// v6/tokenizer.rs
pub(crate) static ERR_V6_HEXTET: &str = "IPv6 group must be within 0..=ffff";
pub(crate) static ERR_V6_BYTE: &str = "embedded IPv4 octet must be within 0..=255";
pub(crate) static ERR_V6_CHAR: &str = "IPv6 address contains a non-hex non-separator character";
pub(crate) static ERR_V6_DOUBLE: &str = "IPv6 address contains more than one '::'";
pub(crate) static ERR_V6_COLON: &str = "IPv6 address contains a misplaced ':'";
pub(crate) static ERR_V6_EMPTY: &str = "IPv6 address contains an empty group";
pub(crate) static ERR_V6_COUNT: &str = "IPv6 address must have exactly 8 groups";
pub(crate) static ERR_V6_EMBED: &str = "embedded IPv4 must occupy the last two groups";
pub(crate) static ERR_V6_EMBED_COUNT: &str = "embedded IPv4 must have exactly 4 octets";

// v4/network.rs, v6/network.rs
pub(crate) static ERR_WRONG_NET: &str = "cannot build a network from a network of the other family";
