// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::V6Groups;
use crate::{
    input::{check_bits, parse_numeric, truncate, ElementList, IpInput},
    strings::*,
    IpError, IPV6_BITS,
};
use tracing::trace;

const LOOPBACK: V6Groups = V6Groups::new([0, 0, 0, 0, 0, 0, 0, 1]);
const GROUPS: usize = 8;
/// First group of a trailing embedded IPv4 address.
const EMBED_AT: usize = 6;

/**
Decode any supported input into the eight groups of an IPv6 address.

- absent, `false` and the empty string: `::`
- `true` and the names `localhost`, `lo`, `loopback`, `eth0`: `::1`
- an [crate::Ipv4], an integer or a (truncated) float: embedded into
  `::ffff:0:0/96`
- an [crate::Ipv6]: its groups
- `/N`: netmask with the top N bits set, `\N`: its complement (wildcard)
- colon-hex strings, full or compressed with a single `::`, optionally
  ending with an embedded dotted-decimal IPv4 address
- lists of 8 groups, or hybrid lists of 6 groups followed by 4 octets

Strings are scanned as given: surrounding whitespace is malformed.
*/
pub(crate) fn tokenize(input: &IpInput) -> Result<V6Groups, IpError> {
    trace!(kind = input.kind(), "decoding IPv6 input");
    match input {
        IpInput::Absent | IpInput::Boolean(false) => Ok(V6Groups::zero()),
        IpInput::Boolean(true) => Ok(LOOPBACK),
        IpInput::V4(ip) => Ok(embed_v4(ip.octets())),
        IpInput::V6(ip) => Ok(*ip.groups()),
        IpInput::Float(f) => Ok(embed_v4((truncate(*f) as u32).to_be_bytes())),
        IpInput::Integer(v) => Ok(embed_v4((*v as u32).to_be_bytes())),
        IpInput::Text(s) => tokenize_text(s),
        IpInput::Elements(list) => tokenize_elements(input, list),
        IpInput::Net4(_) | IpInput::Net6(_) => Err(IpError::argument(input, ERR_NET_INPUT)),
    }
}

/// `::ffff:a.b.c.d`
#[inline]
fn embed_v4([a, b, c, d]: [u8; 4]) -> V6Groups {
    V6Groups::new([
        0,
        0,
        0,
        0,
        0,
        0xffff,
        u16::from_be_bytes([a, b]),
        u16::from_be_bytes([c, d]),
    ])
}

fn tokenize_text(text: &str) -> Result<V6Groups, IpError> {
    if text.is_empty() {
        return Ok(V6Groups::zero());
    }
    if LOOPBACK_NAMES.iter().any(|name| *name == text) {
        return Ok(LOOPBACK);
    }
    if let Some(rest) = text.strip_prefix(SLASH) {
        let bits: u32 = check_bits(text, parse_numeric(rest), IPV6_BITS, ERR_BITMASK_V6)?;
        return Ok(V6Groups::netmask(bits));
    }
    if let Some(rest) = text.strip_prefix(BACKSLASH) {
        let bits: u32 = check_bits(text, parse_numeric(rest), IPV6_BITS, ERR_BITMASK_V6)?;
        return Ok(V6Groups::wildmask(bits));
    }
    Scanner::new(text).scan()
}

fn tokenize_elements(input: &IpInput, list: &ElementList) -> Result<V6Groups, IpError> {
    let hybrid: bool = match list.items.len() {
        GROUPS => false,
        10 => true,
        _ => return Err(IpError::malformed(input, ERR_V6_COUNT)),
    };

    let mut values: Vec<i64> = Vec::with_capacity(list.items.len());
    for item in list.items.iter() {
        let v: i64 = item
            .as_int()
            .ok_or_else(|| IpError::value(input, ERR_ELEMENT_NAN))?;
        values.push(v);
    }

    let mut groups: [u16; GROUPS] = [0; GROUPS];
    let hextets: usize = if hybrid { EMBED_AT } else { GROUPS };
    for (group, v) in groups.iter_mut().zip(values[..hextets].iter()) {
        *group = u16::try_from(*v).map_err(|_| IpError::value(input, ERR_V6_HEXTET))?;
    }
    if hybrid {
        let mut bytes: [u8; 4] = [0; 4];
        for (byte, v) in bytes.iter_mut().zip(values[EMBED_AT..].iter()) {
            *byte = u8::try_from(*v).map_err(|_| IpError::value(input, ERR_V6_BYTE))?;
        }
        groups[EMBED_AT] = u16::from_be_bytes([bytes[0], bytes[1]]);
        groups[EMBED_AT + 1] = u16::from_be_bytes([bytes[2], bytes[3]]);
    }
    Ok(V6Groups::new(groups))
}

/* ---------------------------------- */

/// Octets of an embedded dotted-decimal IPv4 address, in scan order.
#[derive(Default)]
struct Quad {
    bytes: [u8; 4],
    count: usize,
}

impl Quad {
    fn push(&mut self, text: &str, token: &str) -> Result<(), IpError> {
        if self.count == self.bytes.len() {
            return Err(IpError::malformed(text, ERR_V6_EMBED_COUNT));
        }
        if token.is_empty() {
            return Err(IpError::malformed(text, ERR_V6_EMPTY));
        }
        self.bytes[self.count] = token
            .parse::<u8>()
            .map_err(|_| IpError::value(text, ERR_V6_BYTE))?;
        self.count += 1;
        Ok(())
    }

    /// The two 16-bit groups, high byte first. `reversed` if scanned backwards.
    fn groups(mut self, text: &str, reversed: bool) -> Result<[u16; 2], IpError> {
        if self.count != self.bytes.len() {
            return Err(IpError::malformed(text, ERR_V6_EMBED_COUNT));
        }
        if reversed {
            self.bytes.reverse();
        }
        let [a, b, c, d] = self.bytes;
        Ok([u16::from_be_bytes([a, b]), u16::from_be_bytes([c, d])])
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/**
Two-pass scanner for colon-hex strings.

The forward pass fills groups from the front until it either reaches the
end of the string (which must then supply all 8 groups) or finds the `::`
marker. In the latter case the backward pass fills groups from the back,
scanning from the end of the string toward the marker. The groups between
the two runs stay zero.
*/
struct Scanner<'a> {
    text: &'a str,
    slots: [u16; GROUPS],
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            slots: [0; GROUPS],
        }
    }

    fn scan(mut self) -> Result<V6Groups, IpError> {
        if let Some((head, tail_start)) = self.forward()? {
            self.backward(head, tail_start)?;
        }
        Ok(V6Groups::new(self.slots))
    }

    /**
    Fill groups from the front.

    Returns `Some((head, tail_start))` when the `::` marker was found, where
    `head` is the number of groups filled so far and `tail_start` is the
    byte offset right after the marker.
    */
    fn forward(&mut self) -> Result<Option<(usize, usize)>, IpError> {
        let text: &str = self.text;
        let mut slot: usize = 0;
        let mut start: usize = 0;
        let mut quad: Quad = Quad::default();

        for (pos, c) in text.char_indices() {
            match c {
                COLON => {
                    if !quad.is_empty() {
                        return Err(IpError::malformed(text, ERR_V6_EMBED));
                    }
                    let token: &str = &text[start..pos];
                    if token.is_empty() {
                        if pos == 0 && !text[1..].starts_with(COLON) {
                            return Err(IpError::malformed(text, ERR_V6_COLON));
                        }
                        // the marker is "::" at [0, 1] or [pos - 1, pos]
                        let tail_start: usize = if pos == 0 { 2 } else { pos + 1 };
                        return Ok(Some((slot, tail_start)));
                    }
                    self.put_hextet(token, slot)?;
                    slot += 1;
                    start = pos + 1;
                }
                DOT => {
                    if quad.is_empty() && slot != EMBED_AT {
                        return Err(IpError::malformed(text, ERR_V6_EMBED));
                    }
                    quad.push(text, &text[start..pos])?;
                    start = pos + 1;
                }
                c if c.is_ascii_hexdigit() => {}
                _ => return Err(IpError::malformed(text, ERR_V6_CHAR)),
            }
        }

        let token: &str = &text[start..];
        if !quad.is_empty() {
            quad.push(text, token)?;
            let [hi, lo] = quad.groups(text, false)?;
            self.slots[EMBED_AT] = hi;
            self.slots[EMBED_AT + 1] = lo;
            slot = GROUPS;
        } else {
            if token.is_empty() {
                return Err(IpError::malformed(text, ERR_V6_COLON));
            }
            self.put_hextet(token, slot)?;
            slot += 1;
        }

        if slot != GROUPS {
            return Err(IpError::malformed(text, ERR_V6_COUNT));
        }
        Ok(None)
    }

    /// Fill groups from the back, stopping at the `::` marker.
    fn backward(&mut self, head: usize, tail_start: usize) -> Result<(), IpError> {
        let text: &str = self.text;
        let tail: &str = &text[tail_start..];
        if head >= GROUPS {
            return Err(IpError::malformed(text, ERR_V6_COUNT));
        }
        if tail.starts_with(COLON) {
            return Err(IpError::malformed(text, ERR_V6_DOUBLE));
        }

        // groups below `slot` are still free
        let mut slot: usize = GROUPS;
        let mut end: usize = tail.len();
        let mut quad: Quad = Quad::default();

        for (pos, c) in tail.char_indices().rev() {
            match c {
                COLON => {
                    let token: &str = &tail[pos + 1..end];
                    if token.is_empty() {
                        let msg: &str = match end == tail.len() {
                            true => ERR_V6_COLON,
                            false => ERR_V6_DOUBLE,
                        };
                        return Err(IpError::malformed(text, msg));
                    }
                    if quad.is_empty() {
                        slot = self.put_tail_hextet(token, slot, head)?;
                    } else {
                        quad.push(text, token)?;
                        slot = self.put_tail_quad(std::mem::take(&mut quad), slot, head)?;
                    }
                    end = pos;
                }
                DOT => {
                    if slot != GROUPS {
                        return Err(IpError::malformed(text, ERR_V6_EMBED));
                    }
                    quad.push(text, &tail[pos + 1..end])?;
                    end = pos;
                }
                c if c.is_ascii_hexdigit() => {}
                _ => return Err(IpError::malformed(text, ERR_V6_CHAR)),
            }
        }

        let token: &str = &tail[..end];
        if !quad.is_empty() {
            quad.push(text, token)?;
            self.put_tail_quad(quad, slot, head)?;
        } else if !token.is_empty() {
            self.put_tail_hextet(token, slot, head)?;
        }
        Ok(())
    }

    fn put_hextet(&mut self, token: &str, slot: usize) -> Result<(), IpError> {
        if slot >= GROUPS {
            return Err(IpError::malformed(self.text, ERR_V6_COUNT));
        }
        self.slots[slot] = u16::from_str_radix(token, 16)
            .map_err(|_| IpError::value(self.text, ERR_V6_HEXTET))?;
        Ok(())
    }

    /// Put a group right below `slot`. The marker must keep at least one group.
    fn put_tail_hextet(&mut self, token: &str, slot: usize, head: usize) -> Result<usize, IpError> {
        if slot < head + 2 {
            return Err(IpError::malformed(self.text, ERR_V6_COUNT));
        }
        self.put_hextet(token, slot - 1)?;
        Ok(slot - 1)
    }

    fn put_tail_quad(&mut self, quad: Quad, slot: usize, head: usize) -> Result<usize, IpError> {
        if slot != GROUPS {
            return Err(IpError::malformed(self.text, ERR_V6_EMBED));
        }
        if head > EMBED_AT - 1 {
            return Err(IpError::malformed(self.text, ERR_V6_COUNT));
        }
        let [hi, lo] = quad.groups(self.text, true)?;
        self.slots[EMBED_AT] = hi;
        self.slots[EMBED_AT + 1] = lo;
        Ok(EMBED_AT)
    }
}

/* -------------------------------------------------------------------------- */
