// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{tokenize, Ipv6Network, V6Groups};
use crate::{input::IpInput, strings::*, IpError, Ipv4, IPV6_BITS};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt,
    net::Ipv6Addr,
    ops::{Add, BitAnd, BitOr, Not, Sub},
    str::FromStr,
};

/// `::ffff:0:0`, the prefix of IPv4-mapped addresses.
const V4_MAPPED: V6Groups = V6Groups::new([0, 0, 0, 0, 0, 0xffff, 0, 0]);
const V4_MAPPED_BITS: u32 = 96;

/**
An IPv6 address: eight 16-bit groups, most significant first.

Values are immutable; every operation returns a new address. Addition and
subtraction wrap around modulo 2^128.
*/
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Ipv6 {
    groups: V6Groups,
}

impl Ipv6 {
    pub const UNSPECIFIED: Self = Self::from_segments([0; 8]);
    pub const LOCALHOST: Self = Self::from_segments([0, 0, 0, 0, 0, 0, 0, 1]);

    /**
    Decode an address from anything address-like.

    See [IpInput] for the accepted inputs. IPv4 addresses and 32-bit
    integers are mapped into `::ffff:0:0/96`.
    */
    pub fn new(input: impl Into<IpInput>) -> Result<Self, IpError> {
        tokenize(&input.into()).map(Self::from_groups)
    }

    pub const fn from_segments(segments: [u16; 8]) -> Self {
        Self::from_groups(V6Groups::new(segments))
    }

    #[inline]
    pub(crate) const fn from_groups(groups: V6Groups) -> Self {
        Self { groups }
    }

    /// Netmask with the top `bits` bits set.
    pub fn netmask(bits: u8) -> Result<Self, IpError> {
        check_mask(bits).map(|bits| Self::from_groups(V6Groups::netmask(bits)))
    }

    /// Wildcard mask with the low `128 - bits` bits set.
    pub fn wildmask(bits: u8) -> Result<Self, IpError> {
        check_mask(bits).map(|bits| Self::from_groups(V6Groups::wildmask(bits)))
    }

    #[inline]
    pub fn groups(&self) -> &V6Groups {
        &self.groups
    }

    #[inline]
    pub fn segments(&self) -> [u16; 8] {
        self.groups.into_limbs()
    }

    /// Group at `idx` (0 is the most significant).
    #[inline]
    pub fn group(&self, idx: usize) -> Option<u16> {
        self.groups.get(idx)
    }

    /// The sixteen bytes of the address, big-endian.
    pub fn octets(&self) -> [u8; 16] {
        self.to_u128().to_be_bytes()
    }

    pub fn to_u128(&self) -> u128 {
        self.segments()
            .iter()
            .fold(0u128, |acc, group| (acc << 16) | *group as u128)
    }

    pub fn is_localhost(&self) -> bool {
        *self == Self::LOCALHOST
    }

    /// Whether the address lies within `::ffff:0:0/96`.
    pub fn is_v4_mapped(&self) -> bool {
        self.groups.and(&V6Groups::netmask(V4_MAPPED_BITS)) == V4_MAPPED
    }

    /// Eight zero-padded 4-digit hex groups, no compression.
    pub fn canonical(&self) -> String {
        self.segments()
            .iter()
            .map(|group| format!("{group:04x}"))
            .collect::<Vec<String>>()
            .join(":")
    }

    /**
    Compressed form: unpadded hex groups, with the longest run of zero
    groups collapsed to `::`.

    Only one run is collapsed. Of several runs of the same length, the
    first one wins.
    */
    pub fn short(&self) -> String {
        let segments: [u16; 8] = self.segments();
        let hex = |groups: &[u16]| -> String {
            groups
                .iter()
                .map(|group| format!("{group:x}"))
                .collect::<Vec<String>>()
                .join(":")
        };
        match longest_zero_run(&segments) {
            Some((start, end)) => format!("{}::{}", hex(&segments[..start]), hex(&segments[end..])),
            None => hex(&segments),
        }
    }

    pub fn and(&self, other: &Ipv6) -> Ipv6 {
        Self::from_groups(self.groups.and(&other.groups))
    }

    pub fn or(&self, other: &Ipv6) -> Ipv6 {
        Self::from_groups(self.groups.or(&other.groups))
    }

    pub fn not(&self) -> Ipv6 {
        Self::from_groups(self.groups.not())
    }

    /// Addition modulo 2^128.
    pub fn wrapping_add(&self, other: &Ipv6) -> Ipv6 {
        Self::from_groups(self.groups.wrapping_add(&other.groups))
    }

    /// Subtraction modulo 2^128, as `self + !other + 1`.
    pub fn wrapping_sub(&self, other: &Ipv6) -> Ipv6 {
        Self::from_groups(self.groups.wrapping_sub(&other.groups))
    }

    /// Whether this address belongs to the network built from `network` and `mask_bits`.
    pub fn is_in_range(
        &self,
        network: impl Into<IpInput>,
        mask_bits: Option<u8>,
    ) -> Result<bool, IpError> {
        Ok(Ipv6Network::new(network, mask_bits)?.contains(self))
    }
}

#[inline]
fn check_mask(bits: u8) -> Result<u32, IpError> {
    match bits as u32 {
        b if b <= IPV6_BITS => Ok(b),
        _ => Err(IpError::range(bits, ERR_BITMASK_V6)),
    }
}

/// Half-open `[start, end)` of the first longest run of zero groups.
fn longest_zero_run(segments: &[u16]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;

    for idx in 0..=segments.len() {
        let zero: bool = segments.get(idx) == Some(&0);
        match (zero, run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                let longer: bool = match best {
                    Some((b_start, b_end)) => idx - start > b_end - b_start,
                    None => true,
                };
                if longer {
                    best = Some((start, idx));
                }
                run_start = None;
            }
            _ => {}
        }
    }
    best
}

/* ---------------------------------- */

/// Same as [Ipv6::short].
impl fmt::Display for Ipv6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

impl FromStr for Ipv6 {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl BitAnd for Ipv6 {
    type Output = Ipv6;

    fn bitand(self, rhs: Ipv6) -> Ipv6 {
        Ipv6::and(&self, &rhs)
    }
}

impl BitOr for Ipv6 {
    type Output = Ipv6;

    fn bitor(self, rhs: Ipv6) -> Ipv6 {
        Ipv6::or(&self, &rhs)
    }
}

impl Not for Ipv6 {
    type Output = Ipv6;

    fn not(self) -> Ipv6 {
        Ipv6::not(&self)
    }
}

impl Add for Ipv6 {
    type Output = Ipv6;

    fn add(self, rhs: Ipv6) -> Ipv6 {
        self.wrapping_add(&rhs)
    }
}

impl Sub for Ipv6 {
    type Output = Ipv6;

    fn sub(self, rhs: Ipv6) -> Ipv6 {
        self.wrapping_sub(&rhs)
    }
}

impl From<[u16; 8]> for Ipv6 {
    fn from(segments: [u16; 8]) -> Self {
        Self::from_segments(segments)
    }
}

impl From<Ipv6Addr> for Ipv6 {
    fn from(addr: Ipv6Addr) -> Self {
        Self::from_segments(addr.segments())
    }
}

impl From<Ipv6> for Ipv6Addr {
    fn from(ip: Ipv6) -> Self {
        Ipv6Addr::from(ip.segments())
    }
}

impl From<Ipv6> for u128 {
    fn from(ip: Ipv6) -> Self {
        ip.to_u128()
    }
}

/// Maps into `::ffff:0:0/96`.
impl From<Ipv4> for Ipv6 {
    fn from(ip: Ipv4) -> Self {
        let [a, b, c, d] = ip.octets();
        Self::from_groups(V4_MAPPED.or(&V6Groups::new([
            0,
            0,
            0,
            0,
            0,
            0,
            u16::from_be_bytes([a, b]),
            u16::from_be_bytes([c, d]),
        ])))
    }
}

impl Serialize for Ipv6 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv6 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ipv6 {
        s.parse().unwrap()
    }

    #[test]
    fn test_embedded_v4_end_to_end() {
        let a = ip("::ffff:192.0.2.1");
        assert_eq!(a.segments(), [0, 0, 0, 0, 0, 0xffff, 0xc000, 0x0201]);
        assert_eq!(a.short(), "::ffff:c000:201");
        assert!(a.is_v4_mapped());
        assert!(!ip("::1").is_v4_mapped());
        assert!(!ip("0:0:0:0:1:ffff:c000:201").is_v4_mapped());
    }

    #[test]
    fn test_accessors() {
        let a = ip("2001:db8::ff00:42:8329");
        assert_eq!(a.group(0), Some(0x2001));
        assert_eq!(a.group(7), Some(0x8329));
        assert_eq!(a.group(8), None);
        assert_eq!(a.to_u128(), 0x2001_0db8_0000_0000_0000_ff00_0042_8329);
        assert_eq!(a.octets()[..4], [0x20, 0x01, 0x0d, 0xb8]);
    }

    #[test]
    fn test_canonical() {
        assert_eq!(ip("2001:db8::1").canonical(), "2001:0db8:0000:0000:0000:0000:0000:0001");
        assert_eq!(Ipv6::UNSPECIFIED.canonical(), "0000:0000:0000:0000:0000:0000:0000:0000");
    }

    #[rustfmt::skip]
    #[test]
    fn test_short() {
        let tests: Vec<([u16; 8], &str)> = vec![
            ([0; 8],                                "::"),
            ([0, 0, 0, 0, 0, 0, 0, 1],              "::1"),
            ([1, 0, 0, 0, 0, 0, 0, 0],              "1::"),
            ([0x2001, 0xdb8, 0, 0, 0, 0, 0, 1],     "2001:db8::1"),
            ([1, 2, 3, 4, 5, 6, 7, 8],              "1:2:3:4:5:6:7:8"),
            ([1, 0, 2, 3, 4, 5, 6, 7],              "1::2:3:4:5:6:7"),
            // longest run wins
            ([1, 0, 0, 2, 0, 0, 0, 3],              "1:0:0:2::3"),
            ([1, 0, 2, 0, 0, 0, 3, 0],              "1:0:2::3:0"),
            // first of equal runs wins
            ([1, 0, 0, 2, 3, 0, 0, 4],              "1::2:3:0:0:4"),
            ([0, 1, 0, 2, 0, 3, 0, 4],              "::1:0:2:0:3:0:4"),
            ([0xabcd, 0xef, 0, 0, 0, 0, 0xa, 0],    "abcd:ef::a:0"),
        ];
        for (segments, expected) in tests {
            assert_eq!(Ipv6::from_segments(segments).short(), expected, "Failed: {segments:x?}");
        }
    }

    #[test]
    fn test_short_roundtrip() {
        let samples = [
            "::",
            "::1",
            "2001:db8::ff00:42:8329",
            "fe80::1:0:0:2",
            "1:0:0:2:0:0:0:3",
            "0:0:1:0:0:0:0:0",
            "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
        ];
        for s in samples {
            let a = ip(s);
            assert_eq!(ip(&a.short()), a, "Failed: '{s}'");
            assert_eq!(ip(&a.canonical()), a, "Failed: '{s}'");
            assert!(a.short().matches("::").count() <= 1, "Failed: '{s}'");
        }
    }

    #[test]
    fn test_bitwise() {
        let a = ip("2001:db8::ff00:42:8329");
        let m = Ipv6::netmask(32).unwrap();
        assert_eq!(a.and(&m), ip("2001:db8::"));
        assert_eq!(a.or(&m.not()), ip("2001:db8:ffff:ffff:ffff:ffff:ffff:ffff"));
        assert_eq!(a.not().not(), a);
        assert_eq!(a & m, a.and(&m));
        assert_eq!(a | !m, a.or(&m.not()));
    }

    #[test]
    fn test_arithmetic() {
        let one = ip("::1");
        assert_eq!(ip("::ffff").wrapping_add(&one), ip("::1:0"));
        let all_ones = ip("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(all_ones.wrapping_add(&one), Ipv6::UNSPECIFIED);
        assert_eq!(Ipv6::UNSPECIFIED.wrapping_sub(&one), all_ones);
        assert_eq!(ip("1::") - one, ip("0:ffff:ffff:ffff:ffff:ffff:ffff:ffff"));
        assert_eq!(ip("1::") + one, ip("1::1"));

        let samples = [Ipv6::UNSPECIFIED, ip("::1"), ip("8000::"), ip("2001:db8::ff00:42:8329")];
        for x in samples {
            for y in samples {
                assert_eq!(x.wrapping_add(&y).wrapping_sub(&y), x, "{x} {y}");
                assert_eq!(x.wrapping_add(&y).to_u128(), x.to_u128().wrapping_add(y.to_u128()));
            }
        }
    }

    #[test]
    fn test_masks() {
        assert_eq!(Ipv6::netmask(64).unwrap(), ip("/64"));
        assert_eq!(Ipv6::wildmask(64).unwrap(), ip("\\64"));
        assert!(matches!(Ipv6::netmask(129), Err(IpError::IllegalRange { .. })));
    }

    #[test]
    fn test_is_in_range() {
        let a = ip("2001:db8::1");
        assert!(a.is_in_range("2001:db8::/32", None).unwrap());
        assert!(!a.is_in_range("2001:db9::", Some(32)).unwrap());
        assert!(a.is_in_range("2001:db8::1", None).unwrap());
    }

    #[test]
    fn test_conversions() {
        let std: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let a = Ipv6::from(std);
        assert_eq!(a, ip("2001:db8::1"));
        assert_eq!(Ipv6Addr::from(a), std);
        assert_eq!(a.to_string(), std.to_string());
        assert_eq!(u128::from(a), u128::from(std));

        let v4 = Ipv4::from_octets([192, 0, 2, 1]);
        assert_eq!(Ipv6::from(v4), ip("::ffff:192.0.2.1"));
        assert_eq!(Ipv6::new(v4).unwrap(), Ipv6::from(v4));
    }

    #[test]
    fn test_serde() {
        let a = ip("2001:db8::1");
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"2001:db8::1\"");
        assert_eq!(serde_json::from_str::<Ipv6>(&json).unwrap(), a);
        assert!(serde_json::from_str::<Ipv6>("\"1::2::3\"").is_err());
    }
}
