// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
IPv4/IPv6 addresses as fixed-width limb sequences, with CIDR networks.

Almost anything address-like can be decoded: dotted-decimal and colon-hex
strings (compressed `::` and hybrid `x:x:x:x:x:x:d.d.d.d` forms included),
32-bit integers, element lists, bitmask shorthands (`/24`, `\24`) and the
other address family. Decoded addresses support per-limb bitwise operations
and fixed-width (wrapping) addition and subtraction, on top of which the
network types derive their masks, boundaries and containment tests.

```ignore
use iparith::{Ipv4, Ipv4Network};

let net = Ipv4Network::new("192.168.1.10/24", None)?;
assert_eq!(net.network_address().to_string(), "192.168.1.0");
assert!(net.contains(&Ipv4::new("192.168.1.77")?));
```
*/

mod count;
mod groups;
mod input;
mod strings;
pub mod v4;
pub mod v6;

use std::{error, fmt};

pub use count::CountPolicy;
pub use groups::{GroupBuffer, Limb};
pub use input::{Element, ElementList, IpInput};
pub use v4::{Ipv4, Ipv4Network, NetworkClass};
pub use v6::{Ipv6, Ipv6Network};

pub(crate) const IPV4_BITS: u32 = 32;
pub(crate) const IPV6_BITS: u32 = 128;

/// Errors raised while decoding addresses or building networks.
///
/// Every variant carries a rendering of the offending input.
#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IpError {
    /// the overall shape/type of the input is not a recognized form
    IllegalArgument { input: String, msg: &'static str },
    /// a numeric token is out of its component's range
    IllegalValue    { input: String, msg: &'static str },
    /// a derived quantity (bitmask, v4-in-v6 range) is out of bounds
    IllegalRange    { input: String, msg: &'static str },
    /// structural corruption: element count, separators, `::` markers
    Malformed       { input: String, msg: &'static str },
}

impl IpError {
    pub(crate) fn argument(input: impl ToString, msg: &'static str) -> Self {
        IpError::IllegalArgument { input: input.to_string(), msg }
    }

    pub(crate) fn value(input: impl ToString, msg: &'static str) -> Self {
        IpError::IllegalValue { input: input.to_string(), msg }
    }

    pub(crate) fn range(input: impl ToString, msg: &'static str) -> Self {
        IpError::IllegalRange { input: input.to_string(), msg }
    }

    pub(crate) fn malformed(input: impl ToString, msg: &'static str) -> Self {
        IpError::Malformed { input: input.to_string(), msg }
    }

    /// The rendering of the input which caused this error.
    pub fn input(&self) -> &str {
        match self {
            IpError::IllegalArgument { input, .. }
            | IpError::IllegalValue { input, .. }
            | IpError::IllegalRange { input, .. }
            | IpError::Malformed { input, .. } => input,
        }
    }
}

impl fmt::Display for IpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpError::IllegalArgument { input, msg }
            | IpError::IllegalValue { input, msg }
            | IpError::IllegalRange { input, msg }
            | IpError::Malformed { input, msg } => write!(f, "{msg}: '{input}'"),
        }
    }
}

impl error::Error for IpError {}

/* -------------------------------------------------------------------------- */
