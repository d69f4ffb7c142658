// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Ipv6, V6Groups};
use crate::{
    input::{check_bits, split_mask, IpInput},
    strings::*,
    CountPolicy, IpError, IPV6_BITS,
};
use ipnet::{Ipv6Net, PrefixLenError};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use tracing::{debug, trace};

/// Full and hybrid element list lengths.
const ADDRESS_LENS: [usize; 2] = [8, 10];

/**
An IPv6 network: a start address and a mask bit count.

Without any mask in the input, a network spans the single address it was
built from (`/128`).
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Ipv6Network {
    start: Ipv6,
    /// `0..=128`
    mask_bits: u8,
}

impl Ipv6Network {
    /// [CountPolicy] applied by [Self::address_count]. Network and
    /// broadcast addresses are excluded for IPv6, unlike for IPv4.
    pub const DEFAULT_COUNT_POLICY: CountPolicy = CountPolicy::Usable;
    pub const DEFAULT_MASK_BITS: u8 = 128;

    /**
    Build a network from anything network-like.

    Mask precedence: `mask_bits`, then a CIDR string (`x::y/N`), then an
    element list's named `mask` or ninth/eleventh element, then the mask of a
    cloned [Ipv6Network], and finally [Self::DEFAULT_MASK_BITS].
    */
    pub fn new(input: impl Into<IpInput>, mask_bits: Option<u8>) -> Result<Self, IpError> {
        let (address, embedded): (IpInput, Option<u32>) = match input.into() {
            IpInput::Net6(net) => (IpInput::V6(net.start), Some(net.mask_bits as u32)),
            other @ IpInput::Net4(_) => return Err(IpError::argument(other, ERR_WRONG_NET)),
            other => split_mask(other, &ADDRESS_LENS, IPV6_BITS, ERR_BITMASK_V6)?,
        };
        let address: Ipv6 = Ipv6::new(address)?;

        let bits: u32 = match (mask_bits, embedded) {
            (Some(bits), _) => {
                trace!(bits, "using explicit mask");
                check_bits(&bits.to_string(), Some(bits.into()), IPV6_BITS, ERR_BITMASK_V6)?
            }
            (None, Some(bits)) => {
                trace!(bits, "using embedded mask");
                bits
            }
            (None, None) => {
                debug!(%address, bits = Self::DEFAULT_MASK_BITS, "no mask given, using default");
                Self::DEFAULT_MASK_BITS as u32
            }
        };
        Ok(Self::masked(address, bits))
    }

    /// Network of `address` with exactly `mask_bits` (`0..=128`).
    pub fn from_address(address: Ipv6, mask_bits: u8) -> Result<Self, IpError> {
        let bits: u32 = check_bits(
            &mask_bits.to_string(),
            Some(mask_bits.into()),
            IPV6_BITS,
            ERR_BITMASK_V6,
        )?;
        Ok(Self::masked(address, bits))
    }

    #[inline]
    fn masked(address: Ipv6, bits: u32) -> Self {
        Self {
            start: Ipv6::from_groups(address.groups().and(&V6Groups::netmask(bits))),
            mask_bits: bits as u8,
        }
    }

    #[inline]
    pub fn mask_bits(&self) -> u8 {
        self.mask_bits
    }

    #[inline]
    pub fn start_address(&self) -> Ipv6 {
        self.start
    }

    #[inline]
    pub fn network_address(&self) -> Ipv6 {
        self.start
    }

    pub fn end_address(&self) -> Ipv6 {
        self.start.or(&self.wildmask())
    }

    pub fn netmask(&self) -> Ipv6 {
        Ipv6::from_groups(V6Groups::netmask(self.mask_bits as u32))
    }

    pub fn wildmask(&self) -> Ipv6 {
        Ipv6::from_groups(V6Groups::wildmask(self.mask_bits as u32))
    }

    pub fn gateway_address(&self) -> Ipv6 {
        self.start.wrapping_add(&Ipv6::from_groups(V6Groups::one()))
    }

    /// The last address of the network. IPv6 has no broadcast as such.
    pub fn broadcast_address(&self) -> Ipv6 {
        self.end_address()
    }

    /// `end - 1`
    pub fn last_host_address(&self) -> Ipv6 {
        self.end_address().wrapping_sub(&Ipv6::from_groups(V6Groups::one()))
    }

    pub fn contains(&self, address: &Ipv6) -> bool {
        address.and(&self.netmask()) == self.start
    }

    pub fn contains_network(&self, other: &Ipv6Network) -> bool {
        self.mask_bits <= other.mask_bits
            && self.contains(&other.start_address())
            && self.contains(&other.end_address())
    }

    pub fn total_addresses(&self) -> BigUint {
        CountPolicy::Total.count(self.host_bits())
    }

    pub fn usable_addresses(&self) -> BigUint {
        CountPolicy::Usable.count(self.host_bits())
    }

    /// Number of addresses under [Self::DEFAULT_COUNT_POLICY].
    pub fn address_count(&self) -> BigUint {
        self.address_count_with(Self::DEFAULT_COUNT_POLICY)
    }

    pub fn address_count_with(&self, policy: CountPolicy) -> BigUint {
        policy.count(self.host_bits())
    }

    #[inline]
    fn host_bits(&self) -> u32 {
        IPV6_BITS - self.mask_bits as u32
    }

    /// `<short address>/N`
    pub fn canonical(&self) -> String {
        format!("{}{SLASH}{}", self.start.short(), self.mask_bits)
    }
}

/* ---------------------------------- */

impl fmt::Display for Ipv6Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Ipv6Network {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s, None)
    }
}

impl From<Ipv6Net> for Ipv6Network {
    fn from(net: Ipv6Net) -> Self {
        Self::masked(net.addr().into(), net.prefix_len() as u32)
    }
}

impl TryFrom<Ipv6Network> for Ipv6Net {
    type Error = PrefixLenError;

    fn try_from(net: Ipv6Network) -> Result<Self, Self::Error> {
        Ipv6Net::new(net.start.into(), net.mask_bits)
    }
}

impl Serialize for Ipv6Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv6Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/* -------------------------------------------------------------------------- */
