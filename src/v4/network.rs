// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Ipv4, V4Groups};
use crate::{
    input::{check_bits, split_mask, IpInput},
    strings::*,
    CountPolicy, IpError, IPV4_BITS,
};
use ipnet::{Ipv4Net, PrefixLenError};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use tracing::{debug, trace};

/**
Legacy classful network class of an IPv4 address.

Only used to pick a default mask when none is given; this is not
internet-standard routing.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NetworkClass {
    /// first octet `0xxxxxxx`
    A,
    /// first octet `10xxxxxx`
    B,
    /// first octet `110xxxxx`
    C,
    /// first octet `1110xxxx`
    D,
    /// everything else
    E,
}

impl NetworkClass {
    pub fn of(address: &Ipv4) -> Self {
        let first: u8 = address.octets()[0];
        if first & 0b1000_0000 == 0 {
            NetworkClass::A
        } else if first & 0b1100_0000 == 0b1000_0000 {
            NetworkClass::B
        } else if first & 0b1110_0000 == 0b1100_0000 {
            NetworkClass::C
        } else if first & 0b1111_0000 == 0b1110_0000 {
            NetworkClass::D
        } else {
            NetworkClass::E
        }
    }

    pub fn default_mask_bits(self) -> u8 {
        match self {
            NetworkClass::A => 8,
            NetworkClass::B => 16,
            NetworkClass::C => 24,
            NetworkClass::D => 28,
            NetworkClass::E => 32,
        }
    }
}

/* ---------------------------------- */

/**
An IPv4 network: a start address and a mask bit count.

The start address always has its host bits cleared, whatever address the
network was built from.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Ipv4Network {
    start: Ipv4,
    /// `0..=32`
    mask_bits: u8,
}

impl Ipv4Network {
    /// [CountPolicy] applied by [Self::address_count].
    pub const DEFAULT_COUNT_POLICY: CountPolicy = CountPolicy::Total;

    /**
    Build a network from anything network-like.

    The mask is taken from, in order of precedence:
    1. `mask_bits`
    2. a CIDR string, `a.b.c.d/N`
    3. an element list: its named `mask`, or a fifth element
    4. a cloned [Ipv4Network]
    5. the [NetworkClass] of the address
    */
    pub fn new(input: impl Into<IpInput>, mask_bits: Option<u8>) -> Result<Self, IpError> {
        let (address, embedded): (IpInput, Option<u32>) = match input.into() {
            IpInput::Net4(net) => (IpInput::V4(net.start), Some(net.mask_bits as u32)),
            other @ IpInput::Net6(_) => return Err(IpError::argument(other, ERR_WRONG_NET)),
            other => split_mask(other, &[4], IPV4_BITS, ERR_BITMASK_V4)?,
        };
        let address: Ipv4 = Ipv4::new(address)?;

        let bits: u32 = match (mask_bits, embedded) {
            (Some(bits), _) => {
                trace!(bits, "using explicit mask");
                check_bits(&bits.to_string(), Some(bits.into()), IPV4_BITS, ERR_BITMASK_V4)?
            }
            (None, Some(bits)) => {
                trace!(bits, "using embedded mask");
                bits
            }
            (None, None) => {
                let class: NetworkClass = NetworkClass::of(&address);
                let bits: u8 = class.default_mask_bits();
                debug!(%address, ?class, bits, "no mask given, inferring from network class");
                bits as u32
            }
        };
        Ok(Self::masked(address, bits))
    }

    /// Network of `address` with exactly `mask_bits` (`0..=32`).
    pub fn from_address(address: Ipv4, mask_bits: u8) -> Result<Self, IpError> {
        let bits: u32 = check_bits(
            &mask_bits.to_string(),
            Some(mask_bits.into()),
            IPV4_BITS,
            ERR_BITMASK_V4,
        )?;
        Ok(Self::masked(address, bits))
    }

    /// `bits` must already be validated.
    #[inline]
    fn masked(address: Ipv4, bits: u32) -> Self {
        Self {
            start: Ipv4::from_groups(address.groups().and(&V4Groups::netmask(bits))),
            mask_bits: bits as u8,
        }
    }

    #[inline]
    pub fn mask_bits(&self) -> u8 {
        self.mask_bits
    }

    #[inline]
    pub fn start_address(&self) -> Ipv4 {
        self.start
    }

    /// Same as [Self::start_address].
    #[inline]
    pub fn network_address(&self) -> Ipv4 {
        self.start
    }

    /// `start | wildmask`
    pub fn end_address(&self) -> Ipv4 {
        self.start.or(&self.wildmask())
    }

    pub fn netmask(&self) -> Ipv4 {
        Ipv4::from_groups(V4Groups::netmask(self.mask_bits as u32))
    }

    pub fn wildmask(&self) -> Ipv4 {
        Ipv4::from_groups(V4Groups::wildmask(self.mask_bits as u32))
    }

    /// `start + 1`
    pub fn gateway_address(&self) -> Ipv4 {
        self.start.wrapping_add(&Ipv4::from_groups(V4Groups::one()))
    }

    /// The last address of the network, same as [Self::end_address].
    pub fn broadcast_address(&self) -> Ipv4 {
        self.end_address()
    }

    /// `end - 1`: the highest address below the broadcast address.
    pub fn last_host_address(&self) -> Ipv4 {
        self.end_address().wrapping_sub(&Ipv4::from_groups(V4Groups::one()))
    }

    pub fn network_class(&self) -> NetworkClass {
        NetworkClass::of(&self.start)
    }

    /// `(address & netmask) == network_address`
    pub fn contains(&self, address: &Ipv4) -> bool {
        address.and(&self.netmask()) == self.start
    }

    /// Whether `other` lies entirely within this network.
    pub fn contains_network(&self, other: &Ipv4Network) -> bool {
        self.mask_bits <= other.mask_bits
            && self.contains(&other.start_address())
            && self.contains(&other.end_address())
    }

    /// `2^(32 - mask_bits)`
    pub fn total_addresses(&self) -> BigUint {
        CountPolicy::Total.count(self.host_bits())
    }

    /// Total minus the network and broadcast addresses, floored at 0.
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
        IPV4_BITS - self.mask_bits as u32
    }

    /// `a.b.c.d/N`
    pub fn canonical(&self) -> String {
        format!("{}{SLASH}{}", self.start.canonical(), self.mask_bits)
    }
}

/* ---------------------------------- */

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Ipv4Network {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s, None)
    }
}

impl From<Ipv4Net> for Ipv4Network {
    fn from(net: Ipv4Net) -> Self {
        Self::masked(net.addr().into(), net.prefix_len() as u32)
    }
}

impl TryFrom<Ipv4Network> for Ipv4Net {
    type Error = PrefixLenError;

    fn try_from(net: Ipv4Network) -> Result<Self, Self::Error> {
        Ipv4Net::new(net.start.into(), net.mask_bits)
    }
}

impl Serialize for Ipv4Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementList, Ipv6Network};

    fn ip(s: &str) -> Ipv4 {
        s.parse().unwrap()
    }

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    #[test]
    fn test_cidr_string() {
        let n = net("192.168.1.10/24");
        assert_eq!(n.mask_bits(), 24);
        assert_eq!(n.network_address().to_string(), "192.168.1.0");
        assert_eq!(n.broadcast_address().to_string(), "192.168.1.255");
        assert_eq!(n.last_host_address().to_string(), "192.168.1.254");
        assert_eq!(n.gateway_address().to_string(), "192.168.1.1");
        assert_eq!(n.netmask().to_string(), "255.255.255.0");
        assert_eq!(n.wildmask().to_string(), "0.0.0.255");
        assert_eq!(n.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_start_is_masked() {
        for (addr, bits) in [("10.1.2.3", 8u8), ("172.16.99.1", 12), ("255.255.255.255", 0)] {
            let n = Ipv4Network::new(addr, Some(bits)).unwrap();
            let masked: Ipv4 = n.start_address().and(&n.netmask());
            assert_eq!(n.start_address(), masked, "Failed: {addr}/{bits}");
        }
        assert_eq!(Ipv4Network::new("255.255.255.255", Some(0)).unwrap().to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_mask_precedence() {
        // explicit beats CIDR
        assert_eq!(Ipv4Network::new("10.1.2.3/24", Some(8)).unwrap().to_string(), "10.0.0.0/8");

        // named list mask beats trailing element count
        let list = ElementList::new(vec![10.into(), 1.into(), 2.into(), 3.into()]).with_mask(16);
        assert_eq!(Ipv4Network::new(list, None).unwrap().to_string(), "10.1.0.0/16");
        assert_eq!(Ipv4Network::new([10, 1, 2, 3, 24], None).unwrap().to_string(), "10.1.2.0/24");

        // cloned network keeps its mask unless overridden
        let n = net("10.1.2.3/24");
        assert_eq!(Ipv4Network::new(n, None).unwrap(), n);
        assert_eq!(Ipv4Network::new(n, Some(8)).unwrap().to_string(), "10.0.0.0/8");
    }

    #[rustfmt::skip]
    #[test]
    fn test_default_class_masks() {
        let tests: Vec<(&str, NetworkClass, &str)> = vec![
            ("10.1.2.3",    NetworkClass::A, "10.0.0.0/8"),
            ("172.16.5.4",  NetworkClass::B, "172.16.0.0/16"),
            ("192.168.1.7", NetworkClass::C, "192.168.1.0/24"),
            ("224.0.0.251", NetworkClass::D, "224.0.0.240/28"),
            ("240.1.2.3",   NetworkClass::E, "240.1.2.3/32"),
        ];
        for (addr, class, expected) in tests {
            assert_eq!(NetworkClass::of(&ip(addr)), class, "Failed: {addr}");
            assert_eq!(net(addr).to_string(), expected, "Failed: {addr}");
        }
    }

    #[test]
    fn test_contains() {
        let n = Ipv4Network::new("10.0.0.0", Some(8)).unwrap();
        assert!(n.contains(&ip("10.1.2.3")));
        assert!(n.contains(&ip("10.255.255.255")));
        assert!(!n.contains(&ip("11.0.0.1")));
        assert!(!n.contains(&ip("9.255.255.255")));
    }

    #[test]
    fn test_contains_network() {
        let big = net("10.0.0.0/8");
        let small = net("10.20.0.0/16");
        assert!(big.contains_network(&small));
        assert!(!small.contains_network(&big));
        assert!(big.contains_network(&big));
        assert!(!big.contains_network(&net("11.0.0.0/16")));
    }

    #[test]
    fn test_address_counts() {
        assert_eq!(net("10.0.0.0/24").total_addresses(), BigUint::from(256u32));
        assert_eq!(net("10.0.0.0/24").usable_addresses(), BigUint::from(254u32));
        assert_eq!(net("10.0.0.0/24").address_count(), BigUint::from(256u32));
        assert_eq!(net("0.0.0.0/0").address_count(), BigUint::from(1u64 << 32));
        assert_eq!(net("10.0.0.1/32").address_count(), BigUint::from(1u32));
        assert_eq!(net("10.0.0.1/32").address_count_with(CountPolicy::Usable), BigUint::from(0u32));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Ipv4Network::new("10.0.0.0/33", None), Err(IpError::IllegalRange { .. })));
        assert!(matches!(Ipv4Network::new("10.0.0.0/x", None), Err(IpError::IllegalValue { .. })));
        assert!(matches!(
            Ipv4Network::new("10.0.0.0", Some(40)),
            Err(IpError::IllegalRange { .. })
        ));
        assert!(matches!(Ipv4Network::new("10.0.0/8", None), Err(IpError::Malformed { .. })));
        assert!(matches!(Ipv4Network::new(" 10.0.0.0/8", None), Err(IpError::Malformed { .. })));
        assert!(matches!(Ipv4Network::new("10.0.0.0/ 8", None), Err(IpError::IllegalValue { .. })));
        assert!(matches!(Ipv4Network::new("10.0.0.0/8 ", None), Err(IpError::IllegalValue { .. })));
        assert!(matches!(
            Ipv4Network::from_address(ip("10.0.0.0"), 33),
            Err(IpError::IllegalRange { .. })
        ));

        let v6 = Ipv6Network::new("::/64", None).unwrap();
        assert!(matches!(Ipv4Network::new(v6, None), Err(IpError::IllegalArgument { .. })));
    }

    #[test]
    fn test_ipnet_interop() {
        let n = net("192.168.1.0/24");
        let ipn: Ipv4Net = n.try_into().unwrap();
        assert_eq!(ipn.to_string(), "192.168.1.0/24");
        let back: Ipv4Network = "192.168.1.77/24".parse::<Ipv4Net>().unwrap().into();
        assert_eq!(back, n);
    }

    #[test]
    fn test_serde() {
        let n = net("172.16.0.0/12");
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"172.16.0.0/12\"");
        assert_eq!(serde_json::from_str::<Ipv4Network>(&json).unwrap(), n);
    }
}
