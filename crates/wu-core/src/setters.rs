//! Attribute setters
//!
//! Each setter re-runs the relevant part of the parser on a copy of the
//! record and commits only on success, so a rejected value leaves the URL
//! untouched.

use std::collections::BTreeMap;

use crate::chars::CodePointClass;
use crate::error::{ParseError, Result};
use crate::parser::{self, State};
use crate::path::UrlPath;
use crate::percent;
use crate::types::Attribute;
use crate::url::Url;

impl Url {
    /// Replace the whole URL by parsing `input`.
    pub fn set_href(&mut self, input: &str) -> Result<()> {
        *self = Url::parse(input)?;
        log::trace!("href set to {}", self);
        Ok(())
    }

    /// Change the scheme. A trailing `:` is optional. Switching between a
    /// special and a non-special scheme is rejected.
    pub fn set_protocol(&mut self, input: &str) -> Result<()> {
        let mut value = String::with_capacity(input.len() + 1);
        value.push_str(input);
        value.push(':');
        *self = parser::parse_override(&value, self, State::SchemeStart)?;
        log::trace!("protocol set to {}", self.protocol());
        Ok(())
    }

    pub fn set_username(&mut self, input: &str) -> Result<()> {
        if self.cannot_have_credentials_or_port() {
            return Err(ParseError::NoCredentials);
        }
        self.username = percent::encode(input, CodePointClass::USERINFO_SET).into_owned();
        log::trace!("username set on {}", self.hostname());
        Ok(())
    }

    pub fn set_password(&mut self, input: &str) -> Result<()> {
        if self.cannot_have_credentials_or_port() {
            return Err(ParseError::NoCredentials);
        }
        self.password = percent::encode(input, CodePointClass::USERINFO_SET).into_owned();
        log::trace!("password set on {}", self.hostname());
        Ok(())
    }

    /// Set `hostname[:port]`. A missing port keeps the current one.
    pub fn set_host(&mut self, input: &str) -> Result<()> {
        if self.has_opaque_path() {
            return Err(ParseError::OpaquePath);
        }
        *self = parser::parse_override(input, self, State::Host)?;
        log::trace!("host set to {}", self.host());
        Ok(())
    }

    /// Set the host alone. Input carrying a port is rejected.
    pub fn set_hostname(&mut self, input: &str) -> Result<()> {
        if self.has_opaque_path() {
            return Err(ParseError::OpaquePath);
        }
        *self = parser::parse_override(input, self, State::Hostname)?;
        log::trace!("hostname set to {}", self.hostname());
        Ok(())
    }

    /// Set the port from its decimal text. Trailing non-digits are ignored;
    /// an empty string clears the port.
    pub fn set_port(&mut self, input: &str) -> Result<()> {
        if self.cannot_have_credentials_or_port() {
            return Err(ParseError::NoCredentials);
        }
        if input.is_empty() {
            self.port = None;
        } else {
            *self = parser::parse_override(input, self, State::Port)?;
        }
        log::trace!("port set to {:?}", self.port);
        Ok(())
    }

    pub fn set_pathname(&mut self, input: &str) -> Result<()> {
        if self.has_opaque_path() {
            return Err(ParseError::OpaquePath);
        }
        let mut draft = self.clone();
        draft.path = UrlPath::default();
        *self = parser::parse_override(input, &draft, State::PathStart)?;
        log::trace!("pathname set to {}", self.path);
        Ok(())
    }

    /// Set the query. A leading `?` is optional; an empty string clears it.
    pub fn set_search(&mut self, input: &str) -> Result<()> {
        if input.is_empty() {
            self.clear_search();
            return Ok(());
        }
        let input = input.strip_prefix('?').unwrap_or(input);
        let mut draft = self.clone();
        draft.query = Some(String::new());
        *self = parser::parse_override(input, &draft, State::Query)?;
        log::trace!("search set to {:?}", self.query);
        Ok(())
    }

    /// Set the fragment. A leading `#` is optional; an empty string clears it.
    pub fn set_hash(&mut self, input: &str) -> Result<()> {
        if input.is_empty() {
            self.clear_hash();
            return Ok(());
        }
        let input = input.strip_prefix('#').unwrap_or(input);
        let mut draft = self.clone();
        draft.fragment = Some(String::new());
        *self = parser::parse_override(input, &draft, State::Fragment)?;
        log::trace!("hash set to {:?}", self.fragment);
        Ok(())
    }

    // =========================================================================
    // Clearing
    // =========================================================================

    pub fn clear_port(&mut self) {
        self.port = None;
    }

    pub fn clear_search(&mut self) {
        self.query = None;
        self.strip_trailing_spaces_from_opaque_path();
    }

    pub fn clear_hash(&mut self) {
        self.fragment = None;
        self.strip_trailing_spaces_from_opaque_path();
    }

    fn strip_trailing_spaces_from_opaque_path(&mut self) {
        if self.fragment.is_none() && self.query.is_none() {
            self.path.strip_trailing_spaces();
        }
    }

    // =========================================================================
    // By attribute
    // =========================================================================

    /// Set one attribute by name. `Origin` is read-only.
    pub fn set(&mut self, attribute: Attribute, value: &str) -> Result<()> {
        match attribute {
            Attribute::Href => self.set_href(value),
            Attribute::Username => self.set_username(value),
            Attribute::Password => self.set_password(value),
            Attribute::Protocol => self.set_protocol(value),
            Attribute::Port => self.set_port(value),
            Attribute::Hostname => self.set_hostname(value),
            Attribute::Host => self.set_host(value),
            Attribute::Pathname => self.set_pathname(value),
            Attribute::Search => self.set_search(value),
            Attribute::Hash => self.set_hash(value),
            Attribute::Origin => Err(ParseError::ReadOnlyAttribute),
        }
    }

    /// Remove an attribute: port, search and hash are cleared; username,
    /// password, pathname, host and hostname are set to the empty string,
    /// which the setter itself may reject. Href, protocol and origin cannot
    /// be removed.
    pub fn unset(&mut self, attribute: Attribute) -> Result<()> {
        match attribute {
            Attribute::Port => {
                self.clear_port();
                Ok(())
            }
            Attribute::Search => {
                self.clear_search();
                Ok(())
            }
            Attribute::Hash => {
                self.clear_hash();
                Ok(())
            }
            Attribute::Username
            | Attribute::Password
            | Attribute::Pathname
            | Attribute::Host
            | Attribute::Hostname => self.set(attribute, ""),
            Attribute::Href | Attribute::Protocol | Attribute::Origin => {
                Err(ParseError::ReadOnlyAttribute)
            }
        }
    }
}

// =============================================================================
// Batch Changes
// =============================================================================

/// A set of attribute changes applied in a fixed order: href, username,
/// password, protocol, port, hostname, host, pathname, search, hash.
///
/// An empty value removes the attribute (see [`Url::unset`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlChanges {
    values: BTreeMap<Attribute, String>,
}

impl UrlChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change, replacing an earlier value for the same attribute.
    /// `Origin` is ignored.
    pub fn insert(&mut self, attribute: Attribute, value: impl Into<String>) {
        if attribute.is_settable() {
            self.values.insert(attribute, value.into());
        }
    }

    /// Builder form of [`UrlChanges::insert`].
    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Record a change by attribute name. Returns `false` for unknown names.
    pub fn insert_named(&mut self, name: &str, value: impl Into<String>) -> bool {
        match Attribute::from_name(name).filter(|attr| attr.is_settable()) {
            Some(attribute) => {
                self.insert(attribute, value);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.values.iter().map(|(&attr, value)| (attr, value.as_str()))
    }

    /// Apply every change to `url`. On failure `url` is left as it was.
    pub fn apply(&self, url: &mut Url) -> Result<()> {
        let mut draft = url.clone();
        for (attribute, value) in self.iter() {
            let applied = if value.is_empty() {
                draft.unset(attribute)
            } else {
                draft.set(attribute, value)
            };
            applied.map_err(|err| {
                log::debug!("change to {attribute} rejected: {err}");
                err
            })?;
        }
        *url = draft;
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(Attribute, S)> for UrlChanges {
    fn from_iter<I: IntoIterator<Item = (Attribute, S)>>(iter: I) -> Self {
        let mut changes = UrlChanges::new();
        for (attribute, value) in iter {
            changes.insert(attribute, value);
        }
        changes
    }
}
