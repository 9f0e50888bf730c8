//! Percent-encoding and decoding
//!
//! Encoding works on the UTF-8 bytes of the input against one of the
//! context sets in [`crate::chars`]. Decoding never fails: malformed `%`
//! triplets are passed through literally.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::chars::{in_encode_set, CodePointClass};

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn push_escaped(b: u8, out: &mut String) {
    out.push('%');
    out.push(char::from(HEX_UPPER[usize::from(b >> 4)]));
    out.push(char::from(HEX_UPPER[usize::from(b & 0x0F)]));
}

// =============================================================================
// Encoding
// =============================================================================

/// Percent-encode `input` against `set`, appending to `out`.
pub fn encode_into(input: &str, set: CodePointClass, out: &mut String) {
    for &b in input.as_bytes() {
        if in_encode_set(b, set) {
            push_escaped(b, out);
        } else {
            out.push(char::from(b));
        }
    }
}

/// Percent-encode a single code point against `set`.
#[inline]
pub fn encode_char_into(c: char, set: CodePointClass, out: &mut String) {
    let mut buf = [0u8; 4];
    encode_into(c.encode_utf8(&mut buf), set, out);
}

/// Percent-encode `input` against `set`, borrowing when nothing changes.
pub fn encode(input: &str, set: CodePointClass) -> Cow<'_, str> {
    match input.bytes().position(|b| in_encode_set(b, set)) {
        None => Cow::Borrowed(input),
        Some(first) => {
            let mut out = String::with_capacity(input.len() + 8);
            out.push_str(&input[..first]);
            encode_into(&input[first..], set, &mut out);
            Cow::Owned(out)
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode `%XX` triplets into raw bytes.
pub fn decode(input: &str) -> Cow<'_, [u8]> {
    percent_decode_str(input).into()
}

/// Decode `%XX` triplets, replacing invalid UTF-8 with U+FFFD.
pub fn decode_utf8_lossy(input: &str) -> Cow<'_, str> {
    percent_decode_str(input).decode_utf8_lossy()
}

// =============================================================================
// application/x-www-form-urlencoded
// =============================================================================

/// Form-encode one name or value: space becomes `+`.
pub fn form_encode_into(input: &str, out: &mut String) {
    for &b in input.as_bytes() {
        if b == b' ' {
            out.push('+');
        } else if in_encode_set(b, CodePointClass::FORM_SET) {
            push_escaped(b, out);
        } else {
            out.push(char::from(b));
        }
    }
}

/// Form-decode one name or value: `+` becomes space, then percent-decode.
pub fn form_decode(input: &str) -> String {
    if input.contains('+') {
        let replaced = input.replace('+', " ");
        decode_utf8_lossy(&replaced).into_owned()
    } else {
        decode_utf8_lossy(input).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_borrows_when_clean() {
        assert!(matches!(
            encode("abc/def", CodePointClass::PATH_SET),
            Cow::Borrowed("abc/def")
        ));
    }

    #[test]
    fn test_encode_sets() {
        assert_eq!(encode("a b", CodePointClass::PATH_SET), "a%20b");
        assert_eq!(encode("a b", CodePointClass::C0_CONTROL_SET), "a b");
        assert_eq!(encode("ü", CodePointClass::C0_CONTROL_SET), "%C3%BC");
        assert_eq!(encode("us:er@", CodePointClass::USERINFO_SET), "us%3Aer%40");
        assert_eq!(encode("it's", CodePointClass::QUERY_SET), "it's");
        assert_eq!(encode("it's", CodePointClass::SPECIAL_QUERY_SET), "it%27s");
        assert_eq!(encode("`x`", CodePointClass::FRAGMENT_SET), "%60x%60");
    }

    #[test]
    fn test_encode_char() {
        let mut out = String::new();
        encode_char_into('€', CodePointClass::PATH_SET, &mut out);
        encode_char_into('/', CodePointClass::PATH_SET, &mut out);
        assert_eq!(out, "%E2%82%AC/");
    }

    #[test]
    fn test_decode() {
        assert_eq!(&*decode("%41%42c"), b"ABc");
        assert_eq!(&*decode("%zz%4"), b"%zz%4");
        assert_eq!(decode_utf8_lossy("%C3%BC"), "ü");
        assert_eq!(decode_utf8_lossy("%FF"), "\u{FFFD}");
    }

    #[test]
    fn test_form_codec() {
        let mut out = String::new();
        form_encode_into("a b&c=d~*", &mut out);
        assert_eq!(out, "a+b%26c%3Dd%7E*");
        assert_eq!(form_decode("a+b%26c%3Dd%7E*"), "a b&c=d~*");
        assert_eq!(form_decode("%2B"), "+");
    }
}
