// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{tokenize, Ipv4Network, V4Groups};
use crate::{input::IpInput, strings::*, IpError, Ipv6, IPV4_BITS};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt,
    net::Ipv4Addr,
    ops::{Add, BitAnd, BitOr, Not, Sub},
    str::FromStr,
};

/**
An IPv4 address: four octets, most significant first.

Values are immutable; every operation returns a new address. Addition and
subtraction wrap around modulo 2^32.
*/
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Ipv4 {
    groups: V4Groups,
}

impl Ipv4 {
    pub const UNSPECIFIED: Self = Self::from_octets([0, 0, 0, 0]);
    pub const LOCALHOST: Self = Self::from_octets([127, 0, 0, 1]);
    pub const BROADCAST: Self = Self::from_octets([255, 255, 255, 255]);

    /**
    Decode an address from anything address-like.

    See [IpInput] for the accepted inputs. Strings may be dotted-decimal,
    one of the loopback names, or a bitmask shorthand (`/24` is
    `255.255.255.0`, `\24` is `0.0.0.255`).
    */
    pub fn new(input: impl Into<IpInput>) -> Result<Self, IpError> {
        tokenize(&input.into()).map(|groups| Self { groups })
    }

    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self::from_groups(V4Groups::new(octets))
    }

    #[inline]
    pub(crate) const fn from_groups(groups: V4Groups) -> Self {
        Self { groups }
    }

    /// Netmask with the top `bits` bits set.
    pub fn netmask(bits: u8) -> Result<Self, IpError> {
        Ok(Self {
            groups: V4Groups::netmask(check_mask(bits)?),
        })
    }

    /// Wildcard mask with the low `32 - bits` bits set.
    pub fn wildmask(bits: u8) -> Result<Self, IpError> {
        Ok(Self {
            groups: V4Groups::wildmask(check_mask(bits)?),
        })
    }

    #[inline]
    pub fn groups(&self) -> &V4Groups {
        &self.groups
    }

    #[inline]
    pub fn octets(&self) -> [u8; 4] {
        self.groups.into_limbs()
    }

    /// Octet at `idx` (0 is the most significant).
    #[inline]
    pub fn octet(&self, idx: usize) -> Option<u8> {
        self.groups.get(idx)
    }

    #[inline]
    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes(self.octets())
    }

    pub fn is_localhost(&self) -> bool {
        *self == Self::LOCALHOST
    }

    /// `d.d.d.d`
    pub fn canonical(&self) -> String {
        let [a, b, c, d] = self.octets();
        format!("{a}.{b}.{c}.{d}")
    }

    /// Canonical form, except that `127.0.0.1` is rendered as `localhost`.
    pub fn short(&self) -> String {
        match self.is_localhost() {
            true => LOCALHOST.to_string(),
            false => self.canonical(),
        }
    }

    pub fn and(&self, other: &Ipv4) -> Ipv4 {
        Self {
            groups: self.groups.and(&other.groups),
        }
    }

    pub fn or(&self, other: &Ipv4) -> Ipv4 {
        Self {
            groups: self.groups.or(&other.groups),
        }
    }

    pub fn not(&self) -> Ipv4 {
        Self {
            groups: self.groups.not(),
        }
    }

    /// Addition modulo 2^32: `255.255.255.255 + 0.0.0.1 == 0.0.0.0`.
    pub fn wrapping_add(&self, other: &Ipv4) -> Ipv4 {
        Self {
            groups: self.groups.wrapping_add(&other.groups),
        }
    }

    /// Subtraction modulo 2^32, as `self + !other + 1`.
    pub fn wrapping_sub(&self, other: &Ipv4) -> Ipv4 {
        Self {
            groups: self.groups.wrapping_sub(&other.groups),
        }
    }

    /// Whether this address belongs to the network built from `network` and `mask_bits`.
    pub fn is_in_range(
        &self,
        network: impl Into<IpInput>,
        mask_bits: Option<u8>,
    ) -> Result<bool, IpError> {
        Ok(Ipv4Network::new(network, mask_bits)?.contains(self))
    }
}

#[inline]
fn check_mask(bits: u8) -> Result<u32, IpError> {
    match bits as u32 {
        b if b <= IPV4_BITS => Ok(b),
        _ => Err(IpError::range(bits, ERR_BITMASK_V4)),
    }
}

/* ---------------------------------- */

impl fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Ipv4 {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl BitAnd for Ipv4 {
    type Output = Ipv4;

    fn bitand(self, rhs: Ipv4) -> Ipv4 {
        Ipv4::and(&self, &rhs)
    }
}

impl BitOr for Ipv4 {
    type Output = Ipv4;

    fn bitor(self, rhs: Ipv4) -> Ipv4 {
        Ipv4::or(&self, &rhs)
    }
}

impl Not for Ipv4 {
    type Output = Ipv4;

    fn not(self) -> Ipv4 {
        Ipv4::not(&self)
    }
}

impl Add for Ipv4 {
    type Output = Ipv4;

    fn add(self, rhs: Ipv4) -> Ipv4 {
        self.wrapping_add(&rhs)
    }
}

impl Sub for Ipv4 {
    type Output = Ipv4;

    fn sub(self, rhs: Ipv4) -> Ipv4 {
        self.wrapping_sub(&rhs)
    }
}

impl From<[u8; 4]> for Ipv4 {
    fn from(octets: [u8; 4]) -> Self {
        Self::from_octets(octets)
    }
}

impl From<Ipv4Addr> for Ipv4 {
    fn from(addr: Ipv4Addr) -> Self {
        Self::from_octets(addr.octets())
    }
}

impl From<Ipv4> for Ipv4Addr {
    fn from(ip: Ipv4) -> Self {
        Ipv4Addr::from(ip.octets())
    }
}

impl From<Ipv4> for u32 {
    fn from(ip: Ipv4) -> Self {
        ip.to_u32()
    }
}

/// Only addresses within `::ffff:0:0/96` convert.
impl TryFrom<Ipv6> for Ipv4 {
    type Error = IpError;

    fn try_from(ip: Ipv6) -> Result<Self, Self::Error> {
        Self::new(ip)
    }
}

impl Serialize for Ipv4 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/* -------------------------------------------------------------------------- */
