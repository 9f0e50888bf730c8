//! Snapshot of every URL getter

use crate::types::{HostType, SchemeType};
use crate::url::Url;

/// All getter values of a URL at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UrlComponents {
    pub href: String,
    pub username: String,
    pub password: String,
    pub protocol: String,
    pub host: String,
    pub port: String,
    pub hostname: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub origin: String,
    pub host_type: HostType,
    pub scheme_type: SchemeType,
}

impl From<&Url> for UrlComponents {
    fn from(url: &Url) -> Self {
        Self {
            href: url.href(),
            username: url.username().to_string(),
            password: url.password().to_string(),
            protocol: url.protocol(),
            host: url.host(),
            port: url.port(),
            hostname: url.hostname(),
            pathname: url.pathname(),
            search: url.search(),
            hash: url.hash(),
            origin: url.origin(),
            host_type: url.host_type(),
            scheme_type: url.scheme_type(),
        }
    }
}
