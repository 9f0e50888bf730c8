//! Code-point classification
//!
//! One lookup table covers every ASCII byte: which percent-encode sets it
//! belongs to and whether it is forbidden in hosts or domains. Non-ASCII
//! code points belong to every encode set and to no forbidden set.

// =============================================================================
// Class Flags
// =============================================================================

bitflags::bitflags! {
    /// Membership flags for a single ASCII byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CodePointClass: u16 {
        /// C0 control percent-encode set
        const C0_CONTROL_SET = 1 << 0;
        const FRAGMENT_SET = 1 << 1;
        const QUERY_SET = 1 << 2;
        const SPECIAL_QUERY_SET = 1 << 3;
        const PATH_SET = 1 << 4;
        const USERINFO_SET = 1 << 5;
        const COMPONENT_SET = 1 << 6;
        /// application/x-www-form-urlencoded set (space handled separately)
        const FORM_SET = 1 << 7;
        const FORBIDDEN_HOST = 1 << 8;
        const FORBIDDEN_DOMAIN = 1 << 9;
    }
}

const fn classify(b: u8) -> u16 {
    let mut bits = 0;

    let c0 = b <= 0x1F || b == 0x7F;
    if c0 {
        bits |= CodePointClass::C0_CONTROL_SET.bits();
    }

    let fragment = c0 || matches!(b, b' ' | b'"' | b'<' | b'>' | b'`');
    if fragment {
        bits |= CodePointClass::FRAGMENT_SET.bits();
    }

    let query = c0 || matches!(b, b' ' | b'"' | b'#' | b'<' | b'>');
    if query {
        bits |= CodePointClass::QUERY_SET.bits();
    }
    if query || b == b'\'' {
        bits |= CodePointClass::SPECIAL_QUERY_SET.bits();
    }

    let path = query || matches!(b, b'?' | b'`' | b'{' | b'}');
    if path {
        bits |= CodePointClass::PATH_SET.bits();
    }

    let userinfo = path
        || matches!(
            b,
            b'/' | b':' | b';' | b'=' | b'@' | b'[' | b'\\' | b']' | b'^' | b'|'
        );
    if userinfo {
        bits |= CodePointClass::USERINFO_SET.bits();
    }

    let component = userinfo || matches!(b, b'$' | b'%' | b'&' | b'+' | b',');
    if component {
        bits |= CodePointClass::COMPONENT_SET.bits();
    }

    if component || matches!(b, b'!' | b'\'' | b'(' | b')' | b'~') {
        bits |= CodePointClass::FORM_SET.bits();
    }

    let forbidden_host = matches!(
        b,
        0x00 | b'\t'
            | b'\n'
            | b'\r'
            | b' '
            | b'#'
            | b'/'
            | b':'
            | b'<'
            | b'>'
            | b'?'
            | b'@'
            | b'['
            | b'\\'
            | b']'
            | b'^'
            | b'|'
    );
    if forbidden_host {
        bits |= CodePointClass::FORBIDDEN_HOST.bits();
    }
    if forbidden_host || c0 || b == b'%' {
        bits |= CodePointClass::FORBIDDEN_DOMAIN.bits();
    }

    bits
}

static CLASS_TABLE: [u16; 128] = {
    let mut table = [0u16; 128];
    let mut i = 0;
    while i < 128 {
        table[i] = classify(i as u8);
        i += 1;
    }
    table
};

/// Flags for an ASCII byte. Non-ASCII bytes report every encode set.
#[inline]
pub fn class_of(b: u8) -> CodePointClass {
    match CLASS_TABLE.get(usize::from(b)) {
        Some(&bits) => CodePointClass::from_bits_retain(bits),
        None => ALWAYS_ENCODED,
    }
}

const ALWAYS_ENCODED: CodePointClass = CodePointClass::C0_CONTROL_SET
    .union(CodePointClass::FRAGMENT_SET)
    .union(CodePointClass::QUERY_SET)
    .union(CodePointClass::SPECIAL_QUERY_SET)
    .union(CodePointClass::PATH_SET)
    .union(CodePointClass::USERINFO_SET)
    .union(CodePointClass::COMPONENT_SET)
    .union(CodePointClass::FORM_SET);

/// Whether `b` must be escaped in the context described by `set`.
#[inline]
pub fn in_encode_set(b: u8, set: CodePointClass) -> bool {
    class_of(b).contains(set)
}

// =============================================================================
// Predicates
// =============================================================================

#[inline]
pub fn is_forbidden_host_code_point(c: char) -> bool {
    c.is_ascii() && class_of(c as u8).contains(CodePointClass::FORBIDDEN_HOST)
}

#[inline]
pub fn is_forbidden_domain_code_point(c: char) -> bool {
    c.is_ascii() && class_of(c as u8).contains(CodePointClass::FORBIDDEN_DOMAIN)
}

#[inline]
pub fn is_c0_control_or_space(c: char) -> bool {
    c <= ' '
}

#[inline]
pub fn is_ascii_tab_or_newline(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// Two code points: an ASCII alpha followed by `:` or `|`.
pub fn is_windows_drive_letter(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 2 && b[0].is_ascii_alphabetic() && matches!(b[1], b':' | b'|')
}

/// A Windows drive letter whose second code point is `:`.
pub fn is_normalized_windows_drive_letter(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 2 && b[0].is_ascii_alphabetic() && b[1] == b':'
}

/// Whether `rest` begins with a drive letter that is followed by nothing
/// or by one of `/`, `\`, `?`, `#`.
pub fn starts_with_windows_drive_letter(rest: &[char]) -> bool {
    match rest {
        [letter, sep, tail @ ..] if letter.is_ascii_alphabetic() && matches!(*sep, ':' | '|') => {
            matches!(tail.first().copied(), None | Some('/' | '\\' | '?' | '#'))
        }
        _ => false,
    }
}
