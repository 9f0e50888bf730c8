//! Punycode (RFC 3492) encoder and decoder
//!
//! Operates on single labels without the `xn--` prefix. All arithmetic is
//! checked; overflow is reported as an error instead of wrapping.

use crate::Error;

// =============================================================================
// Bootstring Parameters
// =============================================================================

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: char = '-';

/// Longest label (in code points) we are willing to decode. Guards the
/// quadratic insertion loop against hostile input.
pub const MAX_DECODE_INPUT: usize = 2000;

/// Longest label (in code points) we are willing to encode.
pub const MAX_ENCODE_INPUT: usize = 1000;

#[inline]
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

#[inline]
fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        T_MIN
    } else if k >= bias + T_MAX {
        T_MAX
    } else {
        k - bias
    }
}

/// Map a digit value (0..36) to its lowercase basic code point.
#[inline]
fn encode_digit(d: u32) -> char {
    let byte = if d < 26 { b'a' + d as u8 } else { b'0' + (d - 26) as u8 };
    char::from(byte)
}

#[inline]
fn decode_digit(b: u8) -> Option<u32> {
    match b {
        b'a'..=b'z' => Some(u32::from(b - b'a')),
        b'A'..=b'Z' => Some(u32::from(b - b'A')),
        b'0'..=b'9' => Some(u32::from(b - b'0') + 26),
        _ => None,
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a Punycode label (without the `xn--` prefix) into code points.
pub fn decode(input: &str) -> Result<Vec<char>, Error> {
    if !input.is_ascii() || input.len() > MAX_DECODE_INPUT {
        return Err(Error::PunycodeDecode);
    }

    // Everything before the last delimiter is copied verbatim.
    let (basic, extended) = match input.rfind(DELIMITER) {
        Some(pos) => (&input[..pos], &input.as_bytes()[pos + 1..]),
        None => ("", input.as_bytes()),
    };

    let mut output: Vec<char> = basic.chars().collect();
    let mut n = INITIAL_N;
    let mut i: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut pos = 0;

    while pos < extended.len() {
        let old_i = i;
        let mut weight: u32 = 1;
        let mut k = BASE;
        loop {
            let byte = *extended.get(pos).ok_or(Error::PunycodeDecode)?;
            pos += 1;
            let digit = decode_digit(byte).ok_or(Error::PunycodeDecode)?;
            i = digit
                .checked_mul(weight)
                .and_then(|step| i.checked_add(step))
                .ok_or(Error::PunycodeDecode)?;
            let t = threshold(k, bias);
            if digit < t {
                break;
            }
            weight = weight.checked_mul(BASE - t).ok_or(Error::PunycodeDecode)?;
            k += BASE;
        }

        let len = output.len() as u32 + 1;
        bias = adapt(i - old_i, len, old_i == 0);
        n = n.checked_add(i / len).ok_or(Error::PunycodeDecode)?;
        i %= len;

        // A delta may never produce a basic code point.
        if n < INITIAL_N {
            return Err(Error::PunycodeDecode);
        }
        let c = char::from_u32(n).ok_or(Error::PunycodeDecode)?;
        output.insert(i as usize, c);
        i += 1;
    }

    Ok(output)
}

/// Decode a Punycode label into a `String`.
pub fn decode_to_string(input: &str) -> Result<String, Error> {
    decode(input).map(|chars| chars.into_iter().collect())
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode code points as Punycode, appending to `output`.
pub fn encode_into(input: &[char], output: &mut String) -> Result<(), Error> {
    if input.len() > MAX_ENCODE_INPUT {
        return Err(Error::PunycodeEncode);
    }

    let mut basic_count: u32 = 0;
    for &c in input {
        if c.is_ascii() {
            output.push(c);
            basic_count += 1;
        }
    }
    if basic_count > 0 {
        output.push(DELIMITER);
    }

    let total = input.len() as u32;
    let mut handled = basic_count;
    let mut n = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;

    while handled < total {
        // Smallest code point not yet handled.
        let m = input
            .iter()
            .map(|&c| c as u32)
            .filter(|&c| c >= n)
            .min()
            .ok_or(Error::PunycodeEncode)?;

        delta = (m - n)
            .checked_mul(handled + 1)
            .and_then(|step| delta.checked_add(step))
            .ok_or(Error::PunycodeEncode)?;
        n = m;

        for &c in input {
            let c = c as u32;
            if c < n {
                delta = delta.checked_add(1).ok_or(Error::PunycodeEncode)?;
            }
            if c == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    output.push(encode_digit(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(encode_digit(q));
                bias = adapt(delta, handled + 1, handled == basic_count);
                delta = 0;
                handled += 1;
            }
        }

        delta = delta.checked_add(1).ok_or(Error::PunycodeEncode)?;
        n += 1;
    }

    Ok(())
}

/// Encode a label as Punycode.
pub fn encode(input: &[char]) -> Result<String, Error> {
    let mut output = String::with_capacity(input.len() * 2);
    encode_into(input, &mut output)?;
    Ok(output)
}

/// Encode a `&str` label as Punycode.
pub fn encode_str(input: &str) -> Result<String, Error> {
    let chars: Vec<char> = input.chars().collect();
    encode(&chars)
}
