//! whaturl IDNA Library
//!
//! Internationalized domain name processing for the whaturl URL engine:
//! UTS #46 mapping and validation plus the Punycode codec it relies on.
//!
//! # Modules
//!
//! - `punycode`: RFC 3492 Bootstring encoder/decoder for single labels
//! - `uts46`: mapping, normalization, label validation, ToASCII / ToUnicode
//!
//! # Examples
//!
//! ```
//! assert_eq!(wu_idna::to_ascii("meßagefactory.ca").unwrap(), "xn--meagefactory-m9a.ca");
//! assert_eq!(wu_idna::to_unicode("xn--meagefactory-m9a.ca"), "meßagefactory.ca");
//! ```

pub mod punycode;
pub mod uts46;

pub use uts46::{to_unicode, verify_dns_length, Config};

/// Error type for IDNA processing.
///
/// ToASCII fails closed with the first violation found; ToUnicode never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Disallowed code point")]
    DisallowedCodePoint,
    #[error("Invalid Punycode")]
    PunycodeDecode,
    #[error("Label too long for Punycode encoding")]
    PunycodeEncode,
    #[error("Punycode label decodes to ASCII only")]
    AsciiPunycodeLabel,
    #[error("Decoded label starts with the ACE prefix")]
    PunycodePrefixInLabel,
    #[error("Label starts with a combining mark")]
    LeadingCombiningMark,
    #[error("Hyphen in a restricted position")]
    Hyphens,
    #[error("Joiner outside a permitted context")]
    ContextJ,
    #[error("Bidi rule violation")]
    Bidi,
    #[error("Domain name or label length out of range")]
    DnsLength,
}

/// ToASCII with the standalone profile (`Config::default()`).
pub fn to_ascii(domain: &str) -> Result<String, Error> {
    Config::default().to_ascii(domain)
}

/// ToASCII with the WHATWG host-parsing profile (`Config::url()`).
pub fn domain_to_ascii(domain: &str) -> Result<String, Error> {
    Config::url().to_ascii(domain)
}
