// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    strings::{ERR_BITMASK_NAN, SLASH},
    IpError, Ipv4, Ipv4Network, Ipv6, Ipv6Network,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// Decimal numbers with optional sign, fraction and exponent. No whitespace.
    static ref NUMERIC: Regex =
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap();
}

/**
Parse a numeric string into an integer, truncating any fraction.

Returns None for anything that is not a decimal number.
*/
pub(crate) fn parse_numeric(s: &str) -> Option<i64> {
    if !NUMERIC.is_match(s) {
        return None;
    }
    match s.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => s.parse::<f64>().ok().map(truncate),
    }
}

/// Truncate toward zero. NaN becomes 0, infinities saturate.
#[inline]
pub(crate) fn truncate(f: f64) -> i64 {
    f.trunc() as i64
}

/**
Validate a mask bit count taken from `input`.

A missing value (not a number) is an [IpError::IllegalValue], a value
outside `0..=max_bits` is an [IpError::IllegalRange].
*/
pub(crate) fn check_bits(
    input: &str,
    value: Option<i64>,
    max_bits: u32,
    range_msg: &'static str,
) -> Result<u32, IpError> {
    let value: i64 = value.ok_or_else(|| IpError::value(input, ERR_BITMASK_NAN))?;
    match u32::try_from(value) {
        Ok(bits) if bits <= max_bits => Ok(bits),
        _ => Err(IpError::range(input, range_msg)),
    }
}

/**
Separate the mask bits embedded in a network-like input from its address.

- `a.b.c.d/N` strings: the part after the first `/` (a leading `/` is a
  bitmask shorthand, not a CIDR separator)
- element lists: the named `mask`, else one element more than any of
  `address_lens` makes the last element the mask

Anything else carries no mask.
*/
pub(crate) fn split_mask(
    input: IpInput,
    address_lens: &[usize],
    max_bits: u32,
    range_msg: &'static str,
) -> Result<(IpInput, Option<u32>), IpError> {
    match input {
        IpInput::Text(s) => match s.find(SLASH) {
            Some(pos) if pos > 0 => {
                let value: Option<i64> = parse_numeric(&s[pos + 1..]);
                let bits: u32 = check_bits(&s, value, max_bits, range_msg)?;
                Ok((IpInput::Text(s[..pos].to_string()), Some(bits)))
            }
            _ => Ok((IpInput::Text(s), None)),
        },
        IpInput::Elements(mut list) => {
            let rendered: String = list.to_string();
            if let Some(mask) = list.mask.take() {
                let bits: u32 = check_bits(&rendered, mask.as_int(), max_bits, range_msg)?;
                return Ok((IpInput::Elements(list), Some(bits)));
            }
            if address_lens.iter().any(|len| len + 1 == list.items.len()) {
                let mask: Option<i64> = list.items.pop().and_then(|e| e.as_int());
                let bits: u32 = check_bits(&rendered, mask, max_bits, range_msg)?;
                return Ok((IpInput::Elements(list), Some(bits)));
            }
            Ok((IpInput::Elements(list), None))
        }
        other => Ok((other, None)),
    }
}

/* ---------------------------------- */

/// One item of an [ElementList].
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Element {
    /// Numeric value of the element, if it has one. Floats are truncated.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Element::Int(v) => Some(*v),
            Element::Float(f) => Some(truncate(*f)),
            Element::Text(s) => parse_numeric(s),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Int(v) => write!(f, "{v}"),
            Element::Float(v) => write!(f, "{v}"),
            Element::Text(s) => write!(f, "{s}"),
        }
    }
}

macro_rules! element_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Element {
            fn from(v: $t) -> Self {
                Element::Int(v as i64)
            }
        }
    )*};
}

element_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<f64> for Element {
    fn from(v: f64) -> Self {
        Element::Float(v)
    }
}

impl From<&str> for Element {
    fn from(v: &str) -> Self {
        Element::Text(v.to_string())
    }
}

impl From<String> for Element {
    fn from(v: String) -> Self {
        Element::Text(v)
    }
}

/* ---------------------------------- */

/**
Ordered address components, optionally with a named network mask.

The named `mask` is only meaningful when building a network; address
decoding ignores it.
*/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementList {
    pub items: Vec<Element>,
    pub mask: Option<Element>,
}

impl ElementList {
    pub fn new(items: Vec<Element>) -> Self {
        Self { items, mask: None }
    }

    /// Attach a named network mask to the list.
    pub fn with_mask(mut self, mask: impl Into<Element>) -> Self {
        self.mask = Some(mask.into());
        self
    }
}

impl fmt::Display for ElementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.items.iter().map(|e| e.to_string()).collect();
        if let Some(mask) = &self.mask {
            parts.push(format!("mask => {mask}"));
        }
        write!(f, "array({})", parts.join(", "))
    }
}

/* ---------------------------------- */

/**
Everything an address or network can be built from.

Decoders dispatch exhaustively over these variants. Most callers never
name them directly: `From` conversions exist for `()`, [Option], [bool],
the primitive integers, [f64], strings, arrays/vectors of element values,
the address and network types, and [std::net] addresses.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum IpInput {
    Absent,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Elements(ElementList),
    V4(Ipv4),
    V6(Ipv6),
    Net4(Ipv4Network),
    Net6(Ipv6Network),
}

impl IpInput {
    /// Short name of the variant, for tracing.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            IpInput::Absent => "absent",
            IpInput::Boolean(_) => "boolean",
            IpInput::Integer(_) => "integer",
            IpInput::Float(_) => "float",
            IpInput::Text(_) => "text",
            IpInput::Elements(_) => "elements",
            IpInput::V4(_) => "ipv4",
            IpInput::V6(_) => "ipv6",
            IpInput::Net4(_) => "ipv4 network",
            IpInput::Net6(_) => "ipv6 network",
        }
    }
}

/// Diagnostic rendering used in error messages.
impl fmt::Display for IpInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpInput::Absent => write!(f, "null"),
            IpInput::Boolean(b) => write!(f, "{b}"),
            IpInput::Integer(v) => write!(f, "{v}"),
            IpInput::Float(v) => write!(f, "{v}"),
            IpInput::Text(s) => write!(f, "{s}"),
            IpInput::Elements(list) => write!(f, "{list}"),
            IpInput::V4(_) => write!(f, "object(Ipv4)"),
            IpInput::V6(_) => write!(f, "object(Ipv6)"),
            IpInput::Net4(_) => write!(f, "object(Ipv4Network)"),
            IpInput::Net6(_) => write!(f, "object(Ipv6Network)"),
        }
    }
}

impl From<()> for IpInput {
    fn from(_: ()) -> Self {
        IpInput::Absent
    }
}

impl<T: Into<IpInput>> From<Option<T>> for IpInput {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => IpInput::Absent,
        }
    }
}

impl From<bool> for IpInput {
    fn from(v: bool) -> Self {
        IpInput::Boolean(v)
    }
}

macro_rules! input_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for IpInput {
            fn from(v: $t) -> Self {
                IpInput::Integer(v as i64)
            }
        }
    )*};
}

input_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<f64> for IpInput {
    fn from(v: f64) -> Self {
        IpInput::Float(v)
    }
}

impl From<&str> for IpInput {
    fn from(v: &str) -> Self {
        IpInput::Text(v.to_string())
    }
}

impl From<String> for IpInput {
    fn from(v: String) -> Self {
        IpInput::Text(v)
    }
}

impl From<&String> for IpInput {
    fn from(v: &String) -> Self {
        IpInput::Text(v.clone())
    }
}

impl From<ElementList> for IpInput {
    fn from(v: ElementList) -> Self {
        IpInput::Elements(v)
    }
}

impl<T: Into<Element>> From<Vec<T>> for IpInput {
    fn from(v: Vec<T>) -> Self {
        IpInput::Elements(ElementList::new(v.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Element>, const N: usize> From<[T; N]> for IpInput {
    fn from(v: [T; N]) -> Self {
        IpInput::Elements(ElementList::new(v.into_iter().map(Into::into).collect()))
    }
}

impl From<Ipv4> for IpInput {
    fn from(v: Ipv4) -> Self {
        IpInput::V4(v)
    }
}

impl From<&Ipv4> for IpInput {
    fn from(v: &Ipv4) -> Self {
        IpInput::V4(*v)
    }
}

impl From<Ipv6> for IpInput {
    fn from(v: Ipv6) -> Self {
        IpInput::V6(v)
    }
}

impl From<&Ipv6> for IpInput {
    fn from(v: &Ipv6) -> Self {
        IpInput::V6(*v)
    }
}

impl From<Ipv4Network> for IpInput {
    fn from(v: Ipv4Network) -> Self {
        IpInput::Net4(v)
    }
}

impl From<&Ipv4Network> for IpInput {
    fn from(v: &Ipv4Network) -> Self {
        IpInput::Net4(*v)
    }
}

impl From<Ipv6Network> for IpInput {
    fn from(v: Ipv6Network) -> Self {
        IpInput::Net6(v)
    }
}

impl From<&Ipv6Network> for IpInput {
    fn from(v: &Ipv6Network) -> Self {
        IpInput::Net6(*v)
    }
}

impl From<std::net::Ipv4Addr> for IpInput {
    fn from(v: std::net::Ipv4Addr) -> Self {
        IpInput::V4(v.into())
    }
}

impl From<std::net::Ipv6Addr> for IpInput {
    fn from(v: std::net::Ipv6Addr) -> Self {
        IpInput::V6(v.into())
    }
}

/* -------------------------------------------------------------------------- */
