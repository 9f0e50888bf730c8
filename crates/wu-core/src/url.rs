//! The URL record
//!
//! A `Url` is always valid: it is produced by the parser and changed only
//! through setters that re-validate. Every getter serializes on demand.

use std::fmt::{self, Write};

use crate::error::{ParseError, Result};
use crate::host::Host;
use crate::parser;
use crate::path::UrlPath;
use crate::types::{Attribute, HostType, SchemeType};

/// A parsed URL.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Url {
    pub(crate) scheme: String,
    pub(crate) scheme_type: SchemeType,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) host: Option<Host>,
    pub(crate) port: Option<u16>,
    pub(crate) path: UrlPath,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
}

impl Default for Url {
    fn default() -> Self {
        Self {
            scheme: String::new(),
            scheme_type: SchemeType::NotSpecial,
            username: String::new(),
            password: String::new(),
            host: None,
            port: None,
            path: UrlPath::default(),
            query: None,
            fragment: None,
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

impl Url {
    /// Parse an absolute URL.
    pub fn parse(input: &str) -> Result<Url> {
        parser::parse(input, None)
    }

    /// Parse `input` relative to `base`.
    pub fn parse_with_base(input: &str, base: &Url) -> Result<Url> {
        parser::parse(input, Some(base))
    }

    /// Parse `input` relative to the URL in `base`.
    pub fn parse_with_base_str(input: &str, base: &str) -> Result<Url> {
        let base = Url::parse(base).map_err(|_| ParseError::InvalidBase)?;
        Url::parse_with_base(input, &base)
    }

    /// Parse raw bytes, which must be UTF-8.
    pub fn parse_bytes(input: &[u8]) -> Result<Url> {
        let input = std::str::from_utf8(input).map_err(|_| ParseError::InvalidInputEncoding)?;
        Url::parse(input)
    }

    /// Whether `input` parses, optionally against `base`.
    pub fn can_parse(input: &str, base: Option<&str>) -> bool {
        match base {
            Some(base) => Url::parse_with_base_str(input, base).is_ok(),
            None => Url::parse(input).is_ok(),
        }
    }

    pub(crate) fn set_scheme(&mut self, scheme: String) {
        self.scheme_type = SchemeType::from_scheme(&scheme);
        self.scheme = scheme;
    }
}

// =============================================================================
// Getters
// =============================================================================

impl Url {
    /// The full serialization.
    pub fn href(&self) -> String {
        let mut out = String::new();
        self.write_href(&mut out, false)
            .map(|()| out)
            .unwrap_or_default()
    }

    /// The scheme followed by `:`.
    pub fn protocol(&self) -> String {
        format!("{}:", self.scheme)
    }

    /// The scheme without the trailing `:`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Hostname plus `:port` when a non-default port is set.
    pub fn host(&self) -> String {
        match (&self.host, self.port) {
            (None, _) => String::new(),
            (Some(host), None) => host.to_string(),
            (Some(host), Some(port)) => format!("{host}:{port}"),
        }
    }

    pub fn hostname(&self) -> String {
        self.host.as_ref().map(Host::to_string).unwrap_or_default()
    }

    /// The explicit port as a string, or empty.
    pub fn port(&self) -> String {
        self.port.map(|port| port.to_string()).unwrap_or_default()
    }

    pub fn port_number(&self) -> Option<u16> {
        self.port
    }

    /// Explicit port, falling back to the scheme default.
    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or_else(|| self.scheme_type.default_port())
    }

    pub fn pathname(&self) -> String {
        self.path.to_string()
    }

    /// `?query`, or empty when the query is absent or empty.
    pub fn search(&self) -> String {
        match self.query.as_deref() {
            None | Some("") => String::new(),
            Some(query) => format!("?{query}"),
        }
    }

    /// `#fragment`, or empty when the fragment is absent or empty.
    pub fn hash(&self) -> String {
        match self.fragment.as_deref() {
            None | Some("") => String::new(),
            Some(fragment) => format!("#{fragment}"),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn host_value(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    pub fn path(&self) -> &UrlPath {
        &self.path
    }

    /// The ASCII serialization of the origin, `null` for opaque origins.
    pub fn origin(&self) -> String {
        match self.scheme_type {
            SchemeType::Http
            | SchemeType::Https
            | SchemeType::Ws
            | SchemeType::Wss
            | SchemeType::Ftp => format!("{}://{}", self.scheme, self.host()),
            SchemeType::NotSpecial if self.scheme == "blob" => {
                match Url::parse(&self.pathname()) {
                    Ok(inner) if matches!(inner.scheme_type, SchemeType::Http | SchemeType::Https) => {
                        inner.origin()
                    }
                    _ => "null".to_string(),
                }
            }
            SchemeType::File | SchemeType::NotSpecial => "null".to_string(),
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host.as_ref().map_or(HostType::Default, Host::host_type)
    }

    pub fn scheme_type(&self) -> SchemeType {
        self.scheme_type
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.scheme_type.is_special()
    }

    #[inline]
    pub fn has_opaque_path(&self) -> bool {
        self.path.is_opaque()
    }

    #[inline]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }

    /// Whether username, password and port can be set. Requires a non-empty
    /// host and a scheme other than `file`.
    pub fn cannot_have_credentials_or_port(&self) -> bool {
        matches!(self.host, None | Some(Host::Empty)) || self.scheme_type == SchemeType::File
    }

    /// Check the record's cross-field invariants.
    pub fn is_valid(&self) -> bool {
        if self.scheme.is_empty() {
            return false;
        }
        if self.scheme_type.is_special() {
            match (&self.host, self.scheme_type) {
                (None, _) => return false,
                (Some(Host::Empty), t) if t != SchemeType::File => return false,
                _ => {}
            }
            if self.path.is_opaque() {
                return false;
            }
        }
        if self.port.is_some() && self.port == self.scheme_type.default_port() {
            return false;
        }
        if self.host.is_none() && (self.has_credentials() || self.port.is_some()) {
            return false;
        }
        true
    }

    /// Read one attribute by name.
    pub fn get(&self, attribute: Attribute) -> String {
        match attribute {
            Attribute::Href => self.href(),
            Attribute::Username => self.username.clone(),
            Attribute::Password => self.password.clone(),
            Attribute::Protocol => self.protocol(),
            Attribute::Port => self.port(),
            Attribute::Hostname => self.hostname(),
            Attribute::Host => self.host(),
            Attribute::Pathname => self.pathname(),
            Attribute::Search => self.search(),
            Attribute::Hash => self.hash(),
            Attribute::Origin => self.origin(),
        }
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Url {
    fn write_href(&self, out: &mut impl Write, redact_password: bool) -> fmt::Result {
        out.write_str(&self.scheme)?;
        out.write_char(':')?;

        if let Some(host) = &self.host {
            out.write_str("//")?;
            let show_password = !redact_password && !self.password.is_empty();
            if !self.username.is_empty() || show_password {
                out.write_str(&self.username)?;
                if show_password {
                    out.write_char(':')?;
                    out.write_str(&self.password)?;
                }
                out.write_char('@')?;
            }
            write!(out, "{host}")?;
            if let Some(port) = self.port {
                write!(out, ":{port}")?;
            }
        } else if !self.path.is_opaque()
            && self.path.segments().len() > 1
            && self.path.segments()[0].is_empty()
        {
            // Keep "//" in the path from reading as an authority.
            out.write_str("/.")?;
        }

        write!(out, "{}", self.path)?;

        if let Some(query) = &self.query {
            out.write_char('?')?;
            out.write_str(query)?;
        }
        if let Some(fragment) = &self.fragment {
            out.write_char('#')?;
            out.write_str(fragment)?;
        }
        Ok(())
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_href(f, false)
    }
}

/// Prints the href with the password left out.
impl fmt::Debug for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut redacted = String::new();
        self.write_href(&mut redacted, true)?;
        f.debug_tuple("Url").field(&redacted).finish()
    }
}

impl std::str::FromStr for Url {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Url::parse(s)
    }
}

impl TryFrom<&str> for Url {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self> {
        Url::parse(value)
    }
}
