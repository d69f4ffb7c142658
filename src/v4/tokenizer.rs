// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::V4Groups;
use crate::{
    input::{check_bits, parse_numeric, truncate, ElementList, IpInput},
    strings::*,
    IpError, Ipv6, IPV4_BITS,
};
use tracing::trace;

const LOOPBACK: V4Groups = V4Groups::new([127, 0, 0, 1]);

/**
Decode any supported input into the four octets of an IPv4 address.

- absent, `false` and the empty string: `0.0.0.0`
- `true` and the names `localhost`, `lo`, `loopback`, `eth0`: `127.0.0.1`
- an [crate::Ipv4]: its octets
- an [Ipv6]: its last 32 bits, only if it lies within `::ffff:0:0/96`
- integers: the low 32 bits, big-endian. Floats are truncated first.
- `/N`: netmask with the top N bits set, `\N`: its complement (wildcard)
- dotted-decimal `d.d.d.d` strings
- lists of exactly 4 numeric elements within `0..=255`

Strings are scanned as given: surrounding whitespace is malformed.
Nothing is committed unless the whole input is valid.
*/
pub(crate) fn tokenize(input: &IpInput) -> Result<V4Groups, IpError> {
    trace!(kind = input.kind(), "decoding IPv4 input");
    match input {
        IpInput::Absent | IpInput::Boolean(false) => Ok(V4Groups::zero()),
        IpInput::Boolean(true) => Ok(LOOPBACK),
        IpInput::V4(ip) => Ok(*ip.groups()),
        IpInput::V6(ip) => from_v6(ip),
        IpInput::Float(f) => Ok(from_int(truncate(*f))),
        IpInput::Integer(v) => Ok(from_int(*v)),
        IpInput::Text(s) => tokenize_text(s),
        IpInput::Elements(list) => tokenize_elements(input, list),
        IpInput::Net4(_) | IpInput::Net6(_) => Err(IpError::argument(input, ERR_NET_INPUT)),
    }
}

/// Big-endian decomposition of the low 32 bits.
#[inline]
fn from_int(v: i64) -> V4Groups {
    V4Groups::new((v as u32).to_be_bytes())
}

fn from_v6(ip: &Ipv6) -> Result<V4Groups, IpError> {
    if !ip.is_v4_mapped() {
        return Err(IpError::range(ip, ERR_V4_MAPPED));
    }
    let [.., hi, lo] = ip.segments();
    let [a, b] = hi.to_be_bytes();
    let [c, d] = lo.to_be_bytes();
    Ok(V4Groups::new([a, b, c, d]))
}

fn tokenize_text(text: &str) -> Result<V4Groups, IpError> {
    if text.is_empty() {
        return Ok(V4Groups::zero());
    }
    if LOOPBACK_NAMES.iter().any(|name| *name == text) {
        return Ok(LOOPBACK);
    }
    if let Some(rest) = text.strip_prefix(SLASH) {
        let bits: u32 = check_bits(text, parse_numeric(rest), IPV4_BITS, ERR_BITMASK_V4)?;
        return Ok(V4Groups::netmask(bits));
    }
    if let Some(rest) = text.strip_prefix(BACKSLASH) {
        let bits: u32 = check_bits(text, parse_numeric(rest), IPV4_BITS, ERR_BITMASK_V4)?;
        return Ok(V4Groups::wildmask(bits));
    }
    tokenize_dotted(text)
}

/**
Left-to-right scan of a dotted-decimal string.

Digits accumulate into the current token, each `.` closes it as the next
octet. The token left over at the end of the string is the last octet.
*/
fn tokenize_dotted(text: &str) -> Result<V4Groups, IpError> {
    let mut octets: [u8; 4] = [0; 4];
    let mut count: usize = 0;
    let mut start: usize = 0;

    for (pos, c) in text.char_indices() {
        match c {
            '0'..='9' => {}
            DOT => {
                close_octet(text, &text[start..pos], &mut octets, &mut count)?;
                start = pos + 1;
            }
            _ => return Err(IpError::malformed(text, ERR_V4_CHAR)),
        }
    }
    close_octet(text, &text[start..], &mut octets, &mut count)?;

    if count != octets.len() {
        return Err(IpError::malformed(text, ERR_V4_COUNT));
    }
    Ok(V4Groups::new(octets))
}

#[inline]
fn close_octet(
    text: &str,
    token: &str,
    octets: &mut [u8; 4],
    count: &mut usize,
) -> Result<(), IpError> {
    if *count == octets.len() {
        return Err(IpError::malformed(text, ERR_V4_COUNT));
    }
    if token.is_empty() {
        return Err(IpError::malformed(text, ERR_V4_EMPTY));
    }
    octets[*count] = token
        .parse::<u8>()
        .map_err(|_| IpError::value(text, ERR_V4_OCTET))?;
    *count += 1;
    Ok(())
}

fn tokenize_elements(input: &IpInput, list: &ElementList) -> Result<V4Groups, IpError> {
    if list.items.len() != 4 {
        return Err(IpError::malformed(input, ERR_V4_COUNT));
    }
    let mut octets: [u8; 4] = [0; 4];
    for (octet, item) in octets.iter_mut().zip(list.items.iter()) {
        let v: i64 = item
            .as_int()
            .ok_or_else(|| IpError::value(input, ERR_ELEMENT_NAN))?;
        *octet = u8::try_from(v).map_err(|_| IpError::value(input, ERR_V4_OCTET))?;
    }
    Ok(V4Groups::new(octets))
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ipv4, Ipv4Network};

    fn groups(input: impl Into<IpInput>) -> Result<[u8; 4], IpError> {
        tokenize(&input.into()).map(V4Groups::into_limbs)
    }

    #[rustfmt::skip]
    #[test]
    fn test_special_inputs() {
        assert_eq!(groups(()).unwrap(),            [0, 0, 0, 0]);
        assert_eq!(groups(false).unwrap(),         [0, 0, 0, 0]);
        assert_eq!(groups("").unwrap(),            [0, 0, 0, 0]);
        assert_eq!(groups(true).unwrap(),          [127, 0, 0, 1]);
        for name in LOOPBACK_NAMES {
            assert_eq!(groups(name).unwrap(),      [127, 0, 0, 1], "Failed: '{name}'");
        }
    }

    #[rustfmt::skip]
    #[test]
    fn test_integers() {
        assert_eq!(groups(167772285u32).unwrap(),  [10, 0, 0, 125]);
        assert_eq!(groups(167772285.9).unwrap(),   [10, 0, 0, 125]);
        assert_eq!(groups(-1).unwrap(),            [255, 255, 255, 255]);
        assert_eq!(groups(0x1_0000_0001i64).unwrap(), [0, 0, 0, 1]);
    }

    #[rustfmt::skip]
    #[test]
    fn test_dotted() {
        let tests: Vec<(&str, [u8; 4])> = vec![
            ("192.168.1.10",        [192, 168, 1, 10]),
            ("0.0.0.0",             [0, 0, 0, 0]),
            ("255.255.255.255",     [255, 255, 255, 255]),
            ("010.000.000.001",     [10, 0, 0, 1]),
        ];
        for (input, expected) in tests {
            assert_eq!(groups(input).unwrap(), expected, "Failed: '{input}'");
        }
    }

    #[rustfmt::skip]
    #[test]
    fn test_dotted_errors() {
        assert!(matches!(groups("1.2.3.256"),   Err(IpError::IllegalValue { .. })));
        assert!(matches!(groups("1.2.99999.4"), Err(IpError::IllegalValue { .. })));
        assert!(matches!(groups("1.2.3"),       Err(IpError::Malformed { .. })));
        assert!(matches!(groups("1.2.3.4.5"),   Err(IpError::Malformed { .. })));
        assert!(matches!(groups("1.2.3.4."),    Err(IpError::Malformed { .. })));
        assert!(matches!(groups("1..3.4"),      Err(IpError::Malformed { .. })));
        assert!(matches!(groups("1.2.3.x"),     Err(IpError::Malformed { .. })));
        assert!(matches!(groups("1.2.3.-4"),    Err(IpError::Malformed { .. })));
    }

    #[rustfmt::skip]
    #[test]
    fn test_whitespace_is_malformed() {
        let tests: [&str; 6] = [" 10.0.0.1 ", "10.0.0.1\n", "\t10.0.0.1", "10.0. 0.1", " /24", " "];
        for input in tests {
            assert!(matches!(groups(input), Err(IpError::Malformed { .. })), "Failed: '{input}'");
        }
        assert!(matches!(groups("/ 24"),        Err(IpError::IllegalValue { .. })));
        assert!(matches!(groups(" localhost"),  Err(IpError::Malformed { .. })));
    }

    #[rustfmt::skip]
    #[test]
    fn test_bitmasks() {
        assert_eq!(groups("/0").unwrap(),   [0, 0, 0, 0]);
        assert_eq!(groups("/24").unwrap(),  [255, 255, 255, 0]);
        assert_eq!(groups("/32").unwrap(),  [255, 255, 255, 255]);
        assert_eq!(groups("\\24").unwrap(), [0, 0, 0, 255]);
        assert_eq!(groups("\\0").unwrap(),  [255, 255, 255, 255]);
        assert!(matches!(groups("/33"),     Err(IpError::IllegalRange { .. })));
        assert!(matches!(groups("/-1"),     Err(IpError::IllegalRange { .. })));
        assert!(matches!(groups("\\x"),     Err(IpError::IllegalValue { .. })));
    }

    #[test]
    fn test_bitmask_pairs_disjoint() {
        for bits in 0..=IPV4_BITS {
            let net = tokenize(&format!("/{bits}").into()).unwrap();
            let wild = tokenize(&format!("\\{bits}").into()).unwrap();
            assert_eq!(net.and(&wild), V4Groups::zero(), "Failed: {bits}");
        }
    }

    #[test]
    fn test_elements() {
        assert_eq!(groups([10, 0, 0, 1]).unwrap(), [10, 0, 0, 1]);
        assert_eq!(groups(vec!["10", "0", "0", "1"]).unwrap(), [10, 0, 0, 1]);
        assert!(matches!(groups([10, 0, 0, 256]), Err(IpError::IllegalValue { .. })));
        assert!(matches!(groups(["10", "x", "0", "1"]), Err(IpError::IllegalValue { .. })));
        assert!(matches!(groups([10, 0, 0]), Err(IpError::Malformed { .. })));
        assert!(matches!(groups([10, 0, 0, 1, 5]), Err(IpError::Malformed { .. })));
    }

    #[test]
    fn test_other_addresses() {
        let v4 = Ipv4::new("10.1.2.3").unwrap();
        assert_eq!(groups(v4).unwrap(), [10, 1, 2, 3]);

        let mapped = Ipv6::new("::ffff:192.0.2.1").unwrap();
        assert_eq!(groups(mapped).unwrap(), [192, 0, 2, 1]);

        let plain = Ipv6::new("2001:db8::1").unwrap();
        assert!(matches!(groups(plain), Err(IpError::IllegalRange { .. })));
    }

    #[test]
    fn test_network_is_not_an_address() {
        let net = Ipv4Network::new("10.0.0.0/8", None).unwrap();
        assert!(matches!(groups(net), Err(IpError::IllegalArgument { .. })));
    }
}
