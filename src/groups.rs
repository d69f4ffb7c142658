// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, hash::Hash};

/// One fixed-width unsigned component of an address.
pub trait Limb: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const BITS: u32;
    const ZERO: Self;
    const MAX: Self;

    fn to_u32(self) -> u32;
    /// Keeps only the low [Limb::BITS] bits of `v`.
    fn from_u32_masked(v: u32) -> Self;
}

impl Limb for u8 {
    const BITS: u32 = u8::BITS;
    const ZERO: Self = 0;
    const MAX: Self = u8::MAX;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32_masked(v: u32) -> Self {
        (v & 0xff) as u8
    }
}

impl Limb for u16 {
    const BITS: u32 = u16::BITS;
    const ZERO: Self = 0;
    const MAX: Self = u16::MAX;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32_masked(v: u32) -> Self {
        (v & 0xffff) as u16
    }
}

/* ---------------------------------- */

/**
Exactly `N` limbs, most significant first.

Limb width is enforced by the limb type itself, so a [GroupBuffer] can
never hold an out-of-range component. IPv4 uses `GroupBuffer<u8, 4>` and
IPv6 uses `GroupBuffer<u16, 8>`.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct GroupBuffer<T: Limb, const N: usize> {
    limbs: [T; N],
}

impl<T: Limb, const N: usize> GroupBuffer<T, N> {
    /// Total width of the buffer in bits.
    pub const WIDTH: u32 = T::BITS * N as u32;

    pub const fn new(limbs: [T; N]) -> Self {
        Self { limbs }
    }

    pub const fn zero() -> Self {
        Self { limbs: [T::ZERO; N] }
    }

    pub const fn ones() -> Self {
        Self { limbs: [T::MAX; N] }
    }

    /// The value `1`: every limb zero except the least significant one.
    pub fn one() -> Self {
        let mut limbs: [T; N] = [T::ZERO; N];
        if let Some(last) = limbs.last_mut() {
            *last = T::from_u32_masked(1);
        }
        Self { limbs }
    }

    /// Bounds-checked limb access.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<T> {
        self.limbs.get(idx).copied()
    }

    #[inline]
    pub fn limbs(&self) -> &[T; N] {
        &self.limbs
    }

    #[inline]
    pub fn into_limbs(self) -> [T; N] {
        self.limbs
    }

    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn not(&self) -> Self {
        let mut limbs: [T; N] = self.limbs;
        for limb in limbs.iter_mut() {
            *limb = T::from_u32_masked(!limb.to_u32());
        }
        Self { limbs }
    }

    /**
    Addition modulo `2^WIDTH`.

    The carry is propagated from the least significant limb upwards, and a
    carry out of the most significant limb is dropped: adding one to the
    all-ones value yields zero.
    */
    pub fn wrapping_add(&self, other: &Self) -> Self {
        let mut limbs: [T; N] = [T::ZERO; N];
        let mut carry: u32 = 0;
        for idx in (0..N).rev() {
            let sum: u32 = self.limbs[idx].to_u32() + other.limbs[idx].to_u32() + carry;
            limbs[idx] = T::from_u32_masked(sum);
            carry = sum >> T::BITS;
        }
        Self { limbs }
    }

    /// Subtraction modulo `2^WIDTH`, computed as `self + !other + 1`.
    pub fn wrapping_sub(&self, other: &Self) -> Self {
        self.wrapping_add(&other.not()).wrapping_add(&Self::one())
    }

    /**
    Netmask with the top `bits` bits set and the rest cleared.

    Each limb is computed independently from how many of its bits fall
    inside the masked region. `bits` above [Self::WIDTH] saturate to the
    all-ones value; callers validate the range beforehand.
    */
    pub fn netmask(bits: u32) -> Self {
        let mut limbs: [T; N] = [T::ZERO; N];
        for (idx, limb) in limbs.iter_mut().enumerate() {
            let lo: u32 = idx as u32 * T::BITS;
            let covered: u32 = bits.saturating_sub(lo).min(T::BITS);
            if covered > 0 {
                let ones: u32 = (1u32 << covered) - 1;
                *limb = T::from_u32_masked(ones << (T::BITS - covered));
            }
        }
        Self { limbs }
    }

    /// Wildcard mask: the complement of [Self::netmask] for the same `bits`.
    pub fn wildmask(bits: u32) -> Self {
        Self::netmask(bits).not()
    }

    #[inline]
    fn zip_with(&self, other: &Self, f: impl Fn(u32, u32) -> u32) -> Self {
        let mut limbs: [T; N] = self.limbs;
        for (limb, rhs) in limbs.iter_mut().zip(other.limbs.iter()) {
            *limb = T::from_u32_masked(f(limb.to_u32(), rhs.to_u32()));
        }
        Self { limbs }
    }
}

impl<T: Limb, const N: usize> Default for GroupBuffer<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Limb, const N: usize> From<[T; N]> for GroupBuffer<T, N> {
    fn from(limbs: [T; N]) -> Self {
        Self::new(limbs)
    }
}

/* -------------------------------------------------------------------------- */
