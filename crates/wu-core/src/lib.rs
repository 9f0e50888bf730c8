//! whaturl Core Library
//!
//! A WHATWG URL engine: parsing with optional base resolution, canonical
//! serialization, attribute setters and `application/x-www-form-urlencoded`
//! search parameters. Internationalized hosts go through `wu-idna`.
//!
//! # Architecture
//!
//! The parser is a single-pass state machine producing a structured `Url`
//! record. Getters serialize on demand; setters re-enter the state machine
//! on a copy of the record and commit only when the new value is accepted.
//!
//! # Modules
//!
//! - `chars`: code point classes and percent-encode sets
//! - `percent`: percent-encoding and form encoding
//! - `host`: host parsing (domain, IPv4, IPv6, opaque)
//! - `path`: path segments and dot-segment handling
//! - `url`: the `Url` record and its getters
//! - `setters`: attribute setters and batch changes
//! - `search_params`: ordered name/value pairs
//! - `components`: snapshot of every getter
//! - `api`: one-shot convenience functions
//! - `types`: shared enums

pub mod api;
pub mod chars;
pub mod components;
pub mod error;
pub mod host;
pub(crate) mod parser;
pub mod path;
pub mod percent;
pub mod search_params;
pub mod setters;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use api::{
    check_url, idna_to_ascii, idna_to_unicode, join_url, normalize_url, parse_search_params,
    parse_url, parse_url_attributes, replace_search_params, replace_url, VERSION,
};
pub use components::UrlComponents;
pub use error::{ParseError, Result};
pub use host::Host;
pub use path::UrlPath;
pub use search_params::SearchParams;
pub use setters::UrlChanges;
pub use types::{Attribute, HostType, SchemeType};
pub use url::Url;

/// Parse an absolute URL.
pub fn parse(input: &str) -> Result<Url> {
    Url::parse(input)
}

/// Parse `input` relative to the URL in `base`.
pub fn parse_with_base(input: &str, base: &str) -> Result<Url> {
    Url::parse_with_base_str(input, base)
}

/// Whether `input` parses, optionally against `base`.
pub fn can_parse(input: &str, base: Option<&str>) -> bool {
    Url::can_parse(input, base)
}
