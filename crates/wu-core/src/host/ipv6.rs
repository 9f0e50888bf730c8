//! IPv6 host parsing and serialization
//!
//! Handles `::` compression and an embedded dotted IPv4 tail. Serialization
//! compresses the first longest run of two or more zero pieces.

use std::fmt::{self, Write};

use crate::error::{ParseError, Result};

/// Parse the text between the brackets of an IPv6 host.
pub fn parse(input: &str) -> Result<[u16; 8]> {
    let fail = |reason: &str| {
        log::debug!("ipv6 host {input:?} rejected: {reason}");
        ParseError::InvalidHost
    };

    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut address = [0u16; 8];
    let mut piece_index = 0usize;
    let mut compress: Option<usize> = None;
    let mut i = 0usize;

    if bytes.first() == Some(&b':') {
        if bytes.get(1) != Some(&b':') {
            return Err(fail("leading single colon"));
        }
        i = 2;
        piece_index = 1;
        compress = Some(piece_index);
    }

    while i < len {
        if piece_index == 8 {
            return Err(fail("too many pieces"));
        }

        if bytes[i] == b':' {
            if compress.is_some() {
                return Err(fail("multiple compressions"));
            }
            i += 1;
            piece_index += 1;
            compress = Some(piece_index);
            continue;
        }

        let mut value: u16 = 0;
        let mut length = 0;
        while length < 4 && i < len && bytes[i].is_ascii_hexdigit() {
            value = value * 0x10 + hex_value(bytes[i]);
            i += 1;
            length += 1;
        }

        match bytes.get(i) {
            Some(b'.') => {
                if length == 0 {
                    return Err(fail("empty piece before IPv4 tail"));
                }
                i -= length;
                if piece_index > 6 {
                    return Err(fail("IPv4 tail does not fit"));
                }
                parse_ipv4_tail(&bytes[i..], &mut address, &mut piece_index)
                    .ok_or_else(|| fail("malformed IPv4 tail"))?;
                break;
            }
            Some(b':') => {
                i += 1;
                if i == len {
                    return Err(fail("trailing single colon"));
                }
            }
            Some(_) => return Err(fail("unexpected code point")),
            None => {}
        }

        address[piece_index] = value;
        piece_index += 1;
    }

    match compress {
        Some(compress) => {
            let mut swaps = piece_index - compress;
            piece_index = 7;
            while piece_index != 0 && swaps > 0 {
                address.swap(piece_index, compress + swaps - 1);
                piece_index -= 1;
                swaps -= 1;
            }
        }
        None if piece_index != 8 => return Err(fail("too few pieces")),
        None => {}
    }

    Ok(address)
}

/// Parse `a.b.c.d` into the next two pieces of `address`.
fn parse_ipv4_tail(tail: &[u8], address: &mut [u16; 8], piece_index: &mut usize) -> Option<()> {
    let mut numbers_seen = 0;
    let mut i = 0;

    while i < tail.len() {
        if numbers_seen > 0 {
            if tail[i] == b'.' && numbers_seen < 4 {
                i += 1;
            } else {
                return None;
            }
        }

        if !tail.get(i)?.is_ascii_digit() {
            return None;
        }

        let mut piece: Option<u16> = None;
        while let Some(&b) = tail.get(i).filter(|b| b.is_ascii_digit()) {
            let digit = u16::from(b - b'0');
            piece = match piece {
                None => Some(digit),
                // No leading zeros
                Some(0) => return None,
                Some(p) => Some(p * 10 + digit),
            };
            if piece? > 255 {
                return None;
            }
            i += 1;
        }

        address[*piece_index] = address[*piece_index] * 0x100 + piece?;
        numbers_seen += 1;
        if numbers_seen == 2 || numbers_seen == 4 {
            *piece_index += 1;
        }
    }

    (numbers_seen == 4).then_some(())
}

#[inline]
fn hex_value(b: u8) -> u16 {
    match b {
        b'0'..=b'9' => u16::from(b - b'0'),
        b'a'..=b'f' => u16::from(b - b'a' + 10),
        b'A'..=b'F' => u16::from(b - b'A' + 10),
        _ => 0,
    }
}

/// Start of the first longest run of at least two zero pieces.
fn compressed_run(address: &[u16; 8]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < 8 {
        if address[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < 8 && address[i] == 0 {
            i += 1;
        }
        let run = i - start;
        if run > 1 && best.map_or(true, |(_, len)| run > len) {
            best = Some((start, run));
        }
    }
    best.map(|(start, _)| start)
}

/// Write `address` without brackets.
pub fn serialize(address: &[u16; 8], out: &mut impl Write) -> fmt::Result {
    let compress = compressed_run(address);
    let mut ignore_zero = false;

    for (i, &piece) in address.iter().enumerate() {
        if ignore_zero {
            if piece == 0 {
                continue;
            }
            ignore_zero = false;
        }
        if compress == Some(i) {
            out.write_str(if i == 0 { "::" } else { ":" })?;
            ignore_zero = true;
            continue;
        }
        write!(out, "{piece:x}")?;
        if i != 7 {
            out.write_char(':')?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &str) -> String {
        let mut out = String::new();
        serialize(&parse(input).unwrap(), &mut out).unwrap();
        out
    }

    #[test]
    fn test_parse_full() {
        assert_eq!(
            parse("2001:db8:3333:4444:5555:6666:7777:8888").unwrap(),
            [0x2001, 0xdb8, 0x3333, 0x4444, 0x5555, 0x6666, 0x7777, 0x8888]
        );
    }

    #[test]
    fn test_parse_compressed() {
        assert_eq!(parse("::").unwrap(), [0; 8]);
        assert_eq!(parse("::1").unwrap(), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(parse("2001:db8::").unwrap(), [0x2001, 0xdb8, 0, 0, 0, 0, 0, 0]);
        assert_eq!(parse("1::2:3").unwrap(), [1, 0, 0, 0, 0, 0, 2, 3]);
    }

    #[test]
    fn test_parse_ipv4_tail() {
        assert_eq!(
            parse("::ffff:192.168.0.1").unwrap(),
            [0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x0001]
        );
        assert!(parse("::1.2.3").is_err());
        assert!(parse("::1.2.3.4.5").is_err());
        assert!(parse("::01.2.3.4").is_err());
        assert!(parse("::256.2.3.4").is_err());
        assert!(parse("1:2:3:4:5:6:7:1.2.3.4").is_err());
    }

    #[test]
    fn test_parse_failures() {
        for input in [
            ":", ":1", "1:", "1:::2", "1::2::3", "12345::", "1:2:3:4:5:6:7", "g::",
            "1:2:3:4:5:6:7:8:9", "",
        ] {
            assert!(parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_serialize_compression() {
        assert_eq!(round_trip("2001:db8:0:0:1:0:0:1"), "2001:db8::1:0:0:1");
        assert_eq!(round_trip("2001:0db8:0000:0000:0000:0000:0000:0000"), "2001:db8::");
        assert_eq!(round_trip("0:0:0:0:0:0:0:0"), "::");
        assert_eq!(round_trip("1:0:2:3:4:5:6:7"), "1:0:2:3:4:5:6:7");
        assert_eq!(round_trip("::ffff:192.168.0.1"), "::ffff:c0a8:1");
        assert_eq!(round_trip("0:0:1:0:0:0:2:3"), "0:0:1::2:3");
    }
}
