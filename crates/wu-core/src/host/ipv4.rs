//! IPv4 host parsing
//!
//! Accepts one to four dot-separated parts, each decimal, octal (`0` prefix)
//! or hex (`0x` prefix). The last part fills every remaining byte.

use std::net::Ipv4Addr;

use crate::error::{ParseError, Result};

/// Parse one IPv4 part. Returns `None` for anything that is not a number
/// in its radix. Values past `u32::MAX` saturate and are rejected by the
/// caller's range check.
pub(crate) fn parse_number(input: &str) -> Option<u64> {
    if input.is_empty() {
        return None;
    }

    let (digits, radix) = if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        (hex, 16)
    } else if input.len() > 1 && input.starts_with('0') {
        (&input[1..], 8)
    } else {
        (input, 10)
    };

    if digits.is_empty() {
        return Some(0);
    }

    let mut value: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        value = value
            .saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit));
    }
    Some(value)
}

/// Whether the last label of `input` looks numeric, which makes the whole
/// host an IPv4 candidate.
pub fn ends_in_a_number(input: &str) -> bool {
    let mut parts: Vec<&str> = input.split('.').collect();
    if parts.last() == Some(&"") {
        if parts.len() == 1 {
            return false;
        }
        parts.pop();
    }

    let Some(last) = parts.last() else {
        return false;
    };
    if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    parse_number(last).is_some()
}

/// Parse an IPv4 host.
pub fn parse(input: &str) -> Result<Ipv4Addr> {
    let mut parts: Vec<&str> = input.split('.').collect();
    if parts.last() == Some(&"") && parts.len() > 1 {
        parts.pop();
    }
    if parts.len() > 4 {
        log::debug!("ipv4 host {input:?} has more than four parts");
        return Err(ParseError::InvalidHost);
    }

    let mut numbers = Vec::with_capacity(parts.len());
    for part in &parts {
        numbers.push(parse_number(part).ok_or(ParseError::InvalidHost)?);
    }

    let Some((&last, init)) = numbers.split_last() else {
        return Err(ParseError::InvalidHost);
    };
    if init.iter().any(|&n| n > 255) {
        return Err(ParseError::InvalidHost);
    }
    if last >= 256u64.pow(5 - numbers.len() as u32) {
        return Err(ParseError::InvalidHost);
    }

    let mut address = last;
    for (i, &n) in init.iter().enumerate() {
        address += n << (8 * (3 - i));
    }
    let address = u32::try_from(address).map_err(|_| ParseError::InvalidHost)?;
    Ok(Ipv4Addr::from(address))
}
