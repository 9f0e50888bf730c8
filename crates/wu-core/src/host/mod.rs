//! Host parsing
//!
//! Classifies a host string as a domain, IPv4 address, IPv6 address,
//! opaque host or empty host, and serializes each variant canonically.
//!
//! # Structure
//!
//! - `ipv4`: dotted / numeric IPv4 forms and the ends-in-a-number check
//! - `ipv6`: bracketed IPv6 with compression and IPv4 tails

pub mod ipv4;
pub mod ipv6;

use std::fmt;
use std::net::Ipv4Addr;

use crate::chars::{is_forbidden_domain_code_point, is_forbidden_host_code_point, CodePointClass};
use crate::error::{ParseError, Result};
use crate::percent;
use crate::types::HostType;

/// A parsed host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// ASCII domain after IDNA processing
    Domain(String),
    Ipv4(Ipv4Addr),
    Ipv6([u16; 8]),
    /// Host of a non-special URL, percent-encoded as written
    Opaque(String),
    Empty,
}

impl Host {
    /// Parse `input` as a host. `is_opaque` selects opaque-host rules, used
    /// for URLs with a non-special scheme.
    pub fn parse(input: &str, is_opaque: bool) -> Result<Host> {
        if let Some(inner) = input.strip_prefix('[') {
            let Some(inner) = inner.strip_suffix(']') else {
                log::debug!("host {input:?} has an unterminated IPv6 literal");
                return Err(ParseError::InvalidHost);
            };
            return ipv6::parse(inner).map(Host::Ipv6);
        }

        if is_opaque {
            return parse_opaque(input);
        }

        let domain = percent::decode_utf8_lossy(input);
        let ascii_domain = domain_to_ascii(&domain)?;

        if ipv4::ends_in_a_number(&ascii_domain) {
            return ipv4::parse(&ascii_domain).map(Host::Ipv4);
        }

        Ok(Host::Domain(ascii_domain))
    }

    pub fn host_type(&self) -> HostType {
        match self {
            Host::Ipv4(_) => HostType::Ipv4,
            Host::Ipv6(_) => HostType::Ipv6,
            Host::Domain(_) | Host::Opaque(_) | Host::Empty => HostType::Default,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Host::Empty)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(s) | Host::Opaque(s) => f.write_str(s),
            Host::Ipv4(addr) => write!(f, "{addr}"),
            Host::Ipv6(pieces) => {
                f.write_str("[")?;
                ipv6::serialize(pieces, f)?;
                f.write_str("]")
            }
            Host::Empty => Ok(()),
        }
    }
}

fn parse_opaque(input: &str) -> Result<Host> {
    if input.is_empty() {
        return Ok(Host::Empty);
    }
    if let Some(c) = input.chars().find(|&c| is_forbidden_host_code_point(c)) {
        log::debug!("opaque host {input:?} contains forbidden code point {c:?}");
        return Err(ParseError::InvalidHost);
    }
    let encoded = percent::encode(input, CodePointClass::C0_CONTROL_SET);
    Ok(Host::Opaque(encoded.into_owned()))
}

/// Domain to ASCII as used by the host parser: plain ASCII domains without
/// an `xn--` label are only lowercased, everything else goes through UTS #46.
pub fn domain_to_ascii(domain: &str) -> Result<String> {
    let needs_idna = !domain.is_ascii()
        || domain.split('.').any(|label| {
            label
                .get(..4)
                .map_or(false, |prefix| prefix.eq_ignore_ascii_case("xn--"))
        });

    let ascii = if needs_idna {
        wu_idna::domain_to_ascii(domain).map_err(|err| {
            log::debug!("domain {domain:?} failed IDNA processing: {err}");
            ParseError::InvalidHost
        })?
    } else {
        domain.to_ascii_lowercase()
    };

    if ascii.is_empty() {
        log::debug!("domain {domain:?} is empty after IDNA processing");
        return Err(ParseError::InvalidHost);
    }
    if let Some(c) = ascii.chars().find(|&c| is_forbidden_domain_code_point(c)) {
        log::debug!("domain {domain:?} contains forbidden code point {c:?}");
        return Err(ParseError::InvalidHost);
    }

    Ok(ascii)
}
