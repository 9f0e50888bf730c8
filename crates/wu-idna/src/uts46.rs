//! UTS #46 processing
//!
//! Mapping, normalization and the per-label validity criteria of Unicode
//! Technical Standard #46, followed by the ToASCII / ToUnicode conversions.
//! Unicode property data (the mapping table, NFC, bidi classes, joining types,
//! virama and mark properties) comes from `idna_adapter`; the processing steps
//! themselves live here.

use std::borrow::Cow;

use idna_adapter::*;

use crate::punycode;
use crate::Error;

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

// =============================================================================
// Configuration
// =============================================================================

/// UTS #46 processing flags.
///
/// `Config::default()` is the standalone profile: DNS lengths are verified.
/// `Config::url()` is the profile the WHATWG URL Standard uses when parsing
/// hosts, which does not verify lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    check_hyphens: bool,
    check_bidi: bool,
    check_joiners: bool,
    use_std3_ascii_rules: bool,
    transitional_processing: bool,
    verify_dns_length: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verify_dns_length: true,
            ..Self::url()
        }
    }
}

impl Config {
    /// Host-parsing profile of the WHATWG URL Standard (`beStrict = false`).
    pub const fn url() -> Self {
        Self {
            check_hyphens: false,
            check_bidi: true,
            check_joiners: true,
            use_std3_ascii_rules: false,
            transitional_processing: false,
            verify_dns_length: false,
        }
    }

    /// _CheckHyphens_: reject hyphens in the first, third+fourth and last positions.
    pub fn with_check_hyphens(mut self, value: bool) -> Self {
        self.check_hyphens = value;
        self
    }

    /// _CheckBidi_: apply the RFC 5893 rules to bidi domain names.
    pub fn with_check_bidi(mut self, value: bool) -> Self {
        self.check_bidi = value;
        self
    }

    /// _CheckJoiners_: apply the RFC 5892 ContextJ rules.
    pub fn with_check_joiners(mut self, value: bool) -> Self {
        self.check_joiners = value;
        self
    }

    /// _UseSTD3ASCIIRules_: only letters, digits and hyphens are allowed in ASCII.
    pub fn with_std3_ascii_rules(mut self, value: bool) -> Self {
        self.use_std3_ascii_rules = value;
        self
    }

    /// _Transitional_Processing_: map the deviation characters away.
    pub fn with_transitional_processing(mut self, value: bool) -> Self {
        self.transitional_processing = value;
        self
    }

    /// _VerifyDnsLength_: labels of 1 to 63 octets, at most 253 in total.
    /// A single trailing root dot is always tolerated.
    pub fn with_verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }

    /// UTS #46 ToASCII.
    pub fn to_ascii(&self, domain: &str) -> Result<String, Error> {
        let result = Processor::new(*self).to_ascii(domain);
        if let Err(err) = &result {
            log::debug!("uts46 to_ascii rejected {:?}: {}", domain, err);
        }
        result
    }

    /// UTS #46 processing without the final Punycode step.
    ///
    /// Returns the mapped, validated Unicode form of `domain`.
    pub fn to_unicode_strict(&self, domain: &str) -> Result<String, Error> {
        let labels = Processor::new(*self).process(domain)?;
        let mut out = String::with_capacity(domain.len());
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.extend(label.iter());
        }
        Ok(out)
    }
}

// =============================================================================
// Lenient ToUnicode
// =============================================================================

/// Return the Punycode payload of `label` if it carries the lowercase ACE
/// prefix followed by at least one code point.
fn punycode_payload(label: &str) -> Option<&str> {
    label
        .strip_prefix("xn--")
        .filter(|payload| !payload.is_empty() && payload.is_ascii())
}

/// Decode every `xn--` label of `domain`; all other labels are kept as-is.
///
/// Never fails: a label whose Punycode does not decode is passed through
/// literally.
pub fn to_unicode(domain: &str) -> String {
    let mut out = String::with_capacity(domain.len());
    for (i, label) in domain.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        match punycode_payload(label).map(punycode::decode_to_string) {
            Some(Ok(decoded)) => out.push_str(&decoded),
            _ => out.push_str(label),
        }
    }
    out
}

// =============================================================================
// Processor
// =============================================================================

struct Processor {
    config: Config,
    data: Adapter,
}

impl Processor {
    fn new(config: Config) -> Self {
        Self {
            config,
            data: Adapter::new(),
        }
    }

    fn to_ascii(&self, domain: &str) -> Result<String, Error> {
        let labels = self.process(domain)?;

        let mut out = String::with_capacity(domain.len() + 8);
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if label.iter().all(char::is_ascii) {
                out.extend(label.iter());
            } else {
                out.push_str("xn--");
                punycode::encode_into(label, &mut out)?;
            }
        }

        if self.config.verify_dns_length && !verify_dns_length(&out) {
            return Err(Error::DnsLength);
        }
        Ok(out)
    }

    /// Map, normalize, split and validate. Returns the Unicode labels.
    fn process(&self, domain: &str) -> Result<Vec<Vec<char>>, Error> {
        let input: Cow<'_, str> = if self.config.transitional_processing {
            Cow::Owned(transitional_premap(domain))
        } else {
            Cow::Borrowed(domain)
        };

        let mut mapped = Vec::with_capacity(input.len());
        for c in self.data.map_normalize(input.chars()) {
            if c == '\u{FFFD}' || self.denied_ascii(c) {
                return Err(Error::DisallowedCodePoint);
            }
            mapped.push(c);
        }

        let mut labels = Vec::new();
        for label in mapped.split(|c| *c == '.') {
            if label.starts_with(&['x', 'n', '-', '-']) {
                let decoded = self.decode_punycode_label(&label[4..])?;
                self.check_label(&decoded)?;
                labels.push(decoded);
            } else {
                self.check_label(label)?;
                labels.push(label.to_vec());
            }
        }

        if self.config.check_bidi && self.is_bidi_domain(&labels) {
            for label in &labels {
                self.check_bidi_label(label)?;
            }
        }

        Ok(labels)
    }

    fn denied_ascii(&self, c: char) -> bool {
        self.config.use_std3_ascii_rules
            && c.is_ascii()
            && !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    }

    fn decode_punycode_label(&self, payload: &[char]) -> Result<Vec<char>, Error> {
        if !payload.iter().all(char::is_ascii) {
            return Err(Error::PunycodeDecode);
        }
        let payload: String = payload.iter().collect();
        let decoded = punycode::decode(&payload)?;
        if decoded.iter().all(char::is_ascii) {
            return Err(Error::AsciiPunycodeLabel);
        }

        // The decoded label must already be mapped and in NFC.
        let stable = self
            .data
            .normalize_validate(decoded.iter().copied())
            .eq(decoded.iter().copied());
        if !stable || decoded.iter().any(|&c| c == '.' || self.denied_ascii(c)) {
            return Err(Error::DisallowedCodePoint);
        }
        Ok(decoded)
    }

    fn check_label(&self, label: &[char]) -> Result<(), Error> {
        let Some(&first) = label.first() else {
            return Ok(());
        };

        if self.config.check_hyphens {
            if first == '-' || label.last() == Some(&'-') {
                return Err(Error::Hyphens);
            }
            if label.len() >= 4 && label[2] == '-' && label[3] == '-' {
                return Err(Error::Hyphens);
            }
        } else if label.starts_with(&['x', 'n', '-', '-']) {
            return Err(Error::PunycodePrefixInLabel);
        }

        if self.data.is_mark(first) {
            return Err(Error::LeadingCombiningMark);
        }

        if self.config.check_joiners {
            self.check_context_j(label)?;
        }
        Ok(())
    }

    /// RFC 5892 appendix A.1 / A.2.
    fn check_context_j(&self, label: &[char]) -> Result<(), Error> {
        for (i, &c) in label.iter().enumerate() {
            if c != ZWNJ && c != ZWJ {
                continue;
            }
            let Some(&previous) = i.checked_sub(1).and_then(|p| label.get(p)) else {
                return Err(Error::ContextJ);
            };
            if self.data.is_virama(previous) {
                continue;
            }
            if c == ZWJ {
                return Err(Error::ContextJ);
            }
            let joins_left = self
                .has_joining_neighbour(label[..i].iter().rev().copied(), LEFT_OR_DUAL_JOINING_MASK);
            let joins_right = self
                .has_joining_neighbour(label[i + 1..].iter().copied(), RIGHT_OR_DUAL_JOINING_MASK);
            if !(joins_left && joins_right) {
                return Err(Error::ContextJ);
            }
        }
        Ok(())
    }

    fn has_joining_neighbour<I: Iterator<Item = char>>(
        &self,
        iter: I,
        required: JoiningTypeMask,
    ) -> bool {
        for c in iter {
            let jt = self.data.joining_type(c);
            if jt.to_mask().intersects(required) {
                return true;
            }
            if !jt.is_transparent() {
                return false;
            }
        }
        false
    }

    fn is_bidi_domain(&self, labels: &[Vec<char>]) -> bool {
        labels
            .iter()
            .flatten()
            .filter(|c| !c.is_ascii())
            .any(|&c| RTL_MASK.intersects(self.data.bidi_class(c).to_mask()))
    }

    /// RFC 5893 section 2, rules 1 to 6.
    fn check_bidi_label(&self, label: &[char]) -> Result<(), Error> {
        let Some((&first, rest)) = label.split_first() else {
            return Ok(());
        };
        let first_bc = self.data.bidi_class(first);
        if !FIRST_BC_MASK.intersects(first_bc.to_mask()) {
            return Err(Error::Bidi);
        }
        let is_ltr = first_bc.is_ltr();

        // Trailing non-spacing marks are ignored for the end-of-label rule.
        let mut end = rest.len();
        while end > 0 && self.data.bidi_class(rest[end - 1]).is_nonspacing_mark() {
            end -= 1;
        }
        let Some((&last, middle)) = rest[..end].split_last() else {
            return Ok(());
        };

        let last_bc = self.data.bidi_class(last);
        let last_mask = if is_ltr { LAST_LTR_MASK } else { LAST_RTL_MASK };
        if !last_mask.intersects(last_bc.to_mask()) {
            return Err(Error::Bidi);
        }

        if is_ltr {
            for &c in middle {
                if !MIDDLE_LTR_MASK.intersects(self.data.bidi_class(c).to_mask()) {
                    return Err(Error::Bidi);
                }
            }
            return Ok(());
        }

        let mut european = last_bc.is_european_number();
        let mut arabic = last_bc.is_arabic_number();
        for &c in middle {
            let bc = self.data.bidi_class(c);
            if !MIDDLE_RTL_MASK.intersects(bc.to_mask()) {
                return Err(Error::Bidi);
            }
            european |= bc.is_european_number();
            arabic |= bc.is_arabic_number();
        }
        if european && arabic {
            return Err(Error::Bidi);
        }
        Ok(())
    }
}

/// Deviation characters under transitional processing.
fn transitional_premap(domain: &str) -> String {
    let mut out = String::with_capacity(domain.len());
    for c in domain.chars() {
        match c {
            'ß' | '\u{1E9E}' => out.push_str("ss"),
            'ς' => out.push('σ'),
            ZWNJ | ZWJ => {}
            _ => out.push(c),
        }
    }
    out
}

/// _VerifyDnsLength_ over an ASCII domain, tolerating one trailing root dot.
pub fn verify_dns_length(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }
    domain
        .split('.')
        .all(|label| !label.is_empty() && label.len() <= 63)
}
