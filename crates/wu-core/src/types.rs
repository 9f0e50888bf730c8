//! Core type definitions for whaturl
//!
//! Small enums shared by the parser, the serializer and the public API.
//! The numeric values are stable and exposed to bindings.

// =============================================================================
// Scheme Types
// =============================================================================

/// Classification of a URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u8"))]
#[repr(u8)]
pub enum SchemeType {
    Http = 0,
    /// Any scheme outside the special set
    NotSpecial = 1,
    Https = 2,
    Ws = 3,
    Ftp = 4,
    Wss = 5,
    File = 6,
}

impl SchemeType {
    /// Classify an already-lowercased scheme (without the trailing `:`).
    pub fn from_scheme(scheme: &str) -> Self {
        match scheme {
            "http" => Self::Http,
            "https" => Self::Https,
            "ws" => Self::Ws,
            "wss" => Self::Wss,
            "ftp" => Self::Ftp,
            "file" => Self::File,
            _ => Self::NotSpecial,
        }
    }

    #[inline]
    pub fn is_special(self) -> bool {
        self != Self::NotSpecial
    }

    /// Default port of a special scheme. `file` has none.
    #[inline]
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Http | Self::Ws => Some(80),
            Self::Https | Self::Wss => Some(443),
            Self::Ftp => Some(21),
            Self::File | Self::NotSpecial => None,
        }
    }
}

impl TryFrom<u8> for SchemeType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Http),
            1 => Ok(Self::NotSpecial),
            2 => Ok(Self::Https),
            3 => Ok(Self::Ws),
            4 => Ok(Self::Ftp),
            5 => Ok(Self::Wss),
            6 => Ok(Self::File),
            _ => Err(()),
        }
    }
}

impl From<SchemeType> for u8 {
    fn from(value: SchemeType) -> Self {
        value as u8
    }
}

// =============================================================================
// Host Types
// =============================================================================

/// Classification of a parsed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u8"))]
#[repr(u8)]
pub enum HostType {
    /// Domain, opaque host, empty host or no host
    Default = 0,
    Ipv4 = 1,
    Ipv6 = 2,
}

impl TryFrom<u8> for HostType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Ipv4),
            2 => Ok(Self::Ipv6),
            _ => Err(()),
        }
    }
}

impl From<HostType> for u8 {
    fn from(value: HostType) -> Self {
        value as u8
    }
}

// =============================================================================
// URL Attributes
// =============================================================================

/// Named URL attributes, in the order batch changes are applied.
///
/// `Origin` is read-only and sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Attribute {
    Href = 0,
    Username = 1,
    Password = 2,
    Protocol = 3,
    Port = 4,
    Hostname = 5,
    Host = 6,
    Pathname = 7,
    Search = 8,
    Hash = 9,
    Origin = 10,
}

impl Attribute {
    /// Every attribute, in application order.
    pub const ALL: [Attribute; 11] = [
        Self::Href,
        Self::Username,
        Self::Password,
        Self::Protocol,
        Self::Port,
        Self::Hostname,
        Self::Host,
        Self::Pathname,
        Self::Search,
        Self::Hash,
        Self::Origin,
    ];

    /// Look up an attribute by its lowercase name. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Href => "href",
            Self::Username => "username",
            Self::Password => "password",
            Self::Protocol => "protocol",
            Self::Port => "port",
            Self::Hostname => "hostname",
            Self::Host => "host",
            Self::Pathname => "pathname",
            Self::Search => "search",
            Self::Hash => "hash",
            Self::Origin => "origin",
        }
    }

    /// Whether a setter exists for this attribute.
    #[inline]
    pub fn is_settable(self) -> bool {
        self != Self::Origin
    }
}

impl TryFrom<u8> for Attribute {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(usize::from(value)).copied().ok_or(())
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_type_values() {
        assert_eq!(SchemeType::from_scheme("http") as u8, 0);
        assert_eq!(SchemeType::from_scheme("git") as u8, 1);
        assert_eq!(SchemeType::from_scheme("https") as u8, 2);
        assert_eq!(SchemeType::from_scheme("ws") as u8, 3);
        assert_eq!(SchemeType::from_scheme("ftp") as u8, 4);
        assert_eq!(SchemeType::from_scheme("wss") as u8, 5);
        assert_eq!(SchemeType::from_scheme("file") as u8, 6);
        for value in 0..7u8 {
            assert_eq!(SchemeType::try_from(value).map(u8::from), Ok(value));
        }
        assert!(SchemeType::try_from(7).is_err());
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(SchemeType::Http.default_port(), Some(80));
        assert_eq!(SchemeType::Wss.default_port(), Some(443));
        assert_eq!(SchemeType::Ftp.default_port(), Some(21));
        assert_eq!(SchemeType::File.default_port(), None);
        assert!(!SchemeType::NotSpecial.is_special());
        assert!(SchemeType::File.is_special());
    }

    #[test]
    fn test_host_type_try_from() {
        assert_eq!(HostType::try_from(2), Ok(HostType::Ipv6));
        assert!(HostType::try_from(3).is_err());
    }

    #[test]
    fn test_attribute_names() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
            assert_eq!(Attribute::try_from(attr as u8), Ok(attr));
        }
        assert_eq!(Attribute::from_name("bogus"), None);
        assert_eq!(Attribute::from_name("HREF"), None);
        assert!(Attribute::Hostname < Attribute::Host);
        assert!(!Attribute::Origin.is_settable());
    }
}
