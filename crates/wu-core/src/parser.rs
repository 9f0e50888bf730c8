//! Basic URL parser
//!
//! A code-point-at-a-time state machine. The same machine serves setters:
//! given a state override it starts in that state, edits a copy of an
//! existing record and stops once the overridden component is done.
//!
//! Syntax violations are normalized silently. Structural violations stop
//! the machine with a [`ParseError`].

use crate::chars::{
    is_ascii_tab_or_newline, is_c0_control_or_space, is_normalized_windows_drive_letter,
    is_windows_drive_letter, starts_with_windows_drive_letter, CodePointClass,
};
use crate::error::{ParseError, Result};
use crate::host::Host;
use crate::path::{is_double_dot_segment, is_single_dot_segment, UrlPath};
use crate::percent;
use crate::types::SchemeType;
use crate::url::Url;

// =============================================================================
// States
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
}

/// How a single step ended.
enum Step {
    Continue,
    /// State override finished its component.
    Done,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Parse `input` into a new record, optionally against `base`.
pub(crate) fn parse(input: &str, base: Option<&Url>) -> Result<Url> {
    let trimmed = input.trim_matches(is_c0_control_or_space);
    let parser = Parser::new(trimmed, base, Url::default(), State::SchemeStart, None);
    let url = parser.run().map_err(|err| {
        log::debug!("failed to parse {input:?}: {err}");
        err
    })?;
    Ok(url)
}

/// Run the machine over `input` starting at `state_override`, editing a
/// copy of `url`. The copy is returned only if the component was accepted.
pub(crate) fn parse_override(input: &str, url: &Url, state_override: State) -> Result<Url> {
    let parser = Parser::new(input, None, url.clone(), state_override, Some(state_override));
    parser.run()
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    input: Vec<char>,
    base: Option<&'a Url>,
    url: Url,
    state: State,
    state_override: Option<State>,
    buffer: String,
    at_sign_seen: bool,
    inside_brackets: bool,
    password_token_seen: bool,
    /// May sit one before the start after a "decrease pointer" step.
    pointer: isize,
}

impl<'a> Parser<'a> {
    fn new(
        input: &str,
        base: Option<&'a Url>,
        url: Url,
        state: State,
        state_override: Option<State>,
    ) -> Self {
        Self {
            input: input.chars().filter(|&c| !is_ascii_tab_or_newline(c)).collect(),
            base,
            url,
            state,
            state_override,
            buffer: String::new(),
            at_sign_seen: false,
            inside_brackets: false,
            password_token_seen: false,
            pointer: 0,
        }
    }

    /// Code point at the pointer; `None` is end of input.
    #[inline]
    fn c(&self) -> Option<char> {
        usize::try_from(self.pointer)
            .ok()
            .and_then(|i| self.input.get(i).copied())
    }

    /// Code points after the pointer.
    fn remaining(&self) -> &[char] {
        let start = usize::try_from(self.pointer + 1).unwrap_or(0);
        self.input.get(start..).unwrap_or(&[])
    }

    /// Code points from the pointer to the end.
    fn rest(&self) -> &[char] {
        let start = usize::try_from(self.pointer).unwrap_or(0);
        self.input.get(start..).unwrap_or(&[])
    }

    #[inline]
    fn is_special(&self) -> bool {
        self.url.scheme_type.is_special()
    }

    /// `/`, `?`, `#`, end of input, or `\` for special URLs.
    #[inline]
    fn is_authority_end(&self, c: Option<char>) -> bool {
        match c {
            None | Some('/' | '?' | '#') => true,
            Some('\\') => self.is_special(),
            Some(_) => false,
        }
    }

    fn run(mut self) -> Result<Url> {
        let len = self.input.len() as isize;
        loop {
            let c = self.c();
            if let Step::Done = self.step(c)? {
                break;
            }
            if self.pointer >= len {
                break;
            }
            self.pointer += 1;
        }
        Ok(self.url)
    }

    fn step(&mut self, c: Option<char>) -> Result<Step> {
        match self.state {
            State::SchemeStart => self.scheme_start(c),
            State::Scheme => self.scheme(c),
            State::NoScheme => self.no_scheme(c),
            State::SpecialRelativeOrAuthority => {
                if c == Some('/') && self.remaining().first() == Some(&'/') {
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    self.pointer += 1;
                } else {
                    self.state = State::Relative;
                    self.pointer -= 1;
                }
                Ok(Step::Continue)
            }
            State::PathOrAuthority => {
                if c == Some('/') {
                    self.state = State::Authority;
                } else {
                    self.state = State::Path;
                    self.pointer -= 1;
                }
                Ok(Step::Continue)
            }
            State::Relative => self.relative(c),
            State::RelativeSlash => self.relative_slash(c),
            State::SpecialAuthoritySlashes => {
                self.state = State::SpecialAuthorityIgnoreSlashes;
                if c == Some('/') && self.remaining().first() == Some(&'/') {
                    self.pointer += 1;
                } else {
                    self.pointer -= 1;
                }
                Ok(Step::Continue)
            }
            State::SpecialAuthorityIgnoreSlashes => {
                if !matches!(c, Some('/' | '\\')) {
                    self.state = State::Authority;
                    self.pointer -= 1;
                }
                Ok(Step::Continue)
            }
            State::Authority => self.authority(c),
            State::Host | State::Hostname => self.host(c),
            State::Port => self.port(c),
            State::File => self.file(c),
            State::FileSlash => self.file_slash(c),
            State::FileHost => self.file_host(c),
            State::PathStart => self.path_start(c),
            State::Path => self.path(c),
            State::OpaquePath => self.opaque_path(c),
            State::Query => self.query(c),
            State::Fragment => {
                if let (Some(c), Some(fragment)) = (c, self.url.fragment.as_mut()) {
                    percent::encode_char_into(c, CodePointClass::FRAGMENT_SET, fragment);
                }
                Ok(Step::Continue)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scheme
    // -------------------------------------------------------------------------

    fn scheme_start(&mut self, c: Option<char>) -> Result<Step> {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.buffer.push(c.to_ascii_lowercase());
                self.state = State::Scheme;
            }
            _ if self.state_override.is_none() => {
                self.state = State::NoScheme;
                self.pointer -= 1;
            }
            _ => return Err(ParseError::InvalidScheme),
        }
        Ok(Step::Continue)
    }

    fn scheme(&mut self, c: Option<char>) -> Result<Step> {
        match c {
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {
                self.buffer.push(c.to_ascii_lowercase());
                Ok(Step::Continue)
            }
            Some(':') => self.scheme_end(),
            _ if self.state_override.is_none() => {
                self.buffer.clear();
                self.state = State::NoScheme;
                self.pointer = -1;
                Ok(Step::Continue)
            }
            _ => Err(ParseError::InvalidScheme),
        }
    }

    fn scheme_end(&mut self) -> Result<Step> {
        let new_type = SchemeType::from_scheme(&self.buffer);

        if self.state_override.is_some() {
            if self.url.scheme_type.is_special() != new_type.is_special() {
                log::debug!(
                    "cannot switch scheme {:?} to {:?} across the special boundary",
                    self.url.scheme,
                    self.buffer
                );
                return Err(ParseError::InvalidScheme);
            }
            if new_type == SchemeType::File
                && (self.url.has_credentials() || self.url.port.is_some())
            {
                return Err(ParseError::NoCredentials);
            }
            if self.url.scheme_type == SchemeType::File
                && matches!(self.url.host, Some(Host::Empty))
            {
                return Err(ParseError::InvalidScheme);
            }
        }

        let scheme = std::mem::take(&mut self.buffer);
        self.url.set_scheme(scheme);

        if self.state_override.is_some() {
            if self.url.port.is_some() && self.url.port == self.url.scheme_type.default_port() {
                self.url.port = None;
            }
            return Ok(Step::Done);
        }

        if self.url.scheme_type == SchemeType::File {
            self.state = State::File;
        } else if self.is_special()
            && self.base.is_some_and(|base| base.scheme == self.url.scheme)
        {
            self.state = State::SpecialRelativeOrAuthority;
        } else if self.is_special() {
            self.state = State::SpecialAuthoritySlashes;
        } else if self.remaining().first() == Some(&'/') {
            self.state = State::PathOrAuthority;
            self.pointer += 1;
        } else {
            self.url.path = UrlPath::Opaque(String::new());
            self.state = State::OpaquePath;
        }
        Ok(Step::Continue)
    }

    fn no_scheme(&mut self, c: Option<char>) -> Result<Step> {
        let Some(base) = self.base else {
            return Err(ParseError::RelativeUrlWithoutBase);
        };

        if base.has_opaque_path() {
            if c != Some('#') {
                return Err(ParseError::RelativeUrlWithoutBase);
            }
            self.url.set_scheme(base.scheme.clone());
            self.url.path = base.path.clone();
            self.url.query = base.query.clone();
            self.url.fragment = Some(String::new());
            self.state = State::Fragment;
        } else if base.scheme_type != SchemeType::File {
            self.state = State::Relative;
            self.pointer -= 1;
        } else {
            self.state = State::File;
            self.pointer -= 1;
        }
        Ok(Step::Continue)
    }

    // -------------------------------------------------------------------------
    // Relative references
    // -------------------------------------------------------------------------

    fn relative(&mut self, c: Option<char>) -> Result<Step> {
        let Some(base) = self.base else {
            return Err(ParseError::RelativeUrlWithoutBase);
        };
        self.url.set_scheme(base.scheme.clone());

        if c == Some('/') || (self.is_special() && c == Some('\\')) {
            self.state = State::RelativeSlash;
            return Ok(Step::Continue);
        }

        self.copy_authority_from(base);
        self.url.path = base.path.clone();
        self.url.query = base.query.clone();

        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(_) => {
                self.url.query = None;
                self.url.path.shorten(self.url.scheme_type);
                self.state = State::Path;
                self.pointer -= 1;
            }
            None => {}
        }
        Ok(Step::Continue)
    }

    fn relative_slash(&mut self, c: Option<char>) -> Result<Step> {
        if self.is_special() && matches!(c, Some('/' | '\\')) {
            self.state = State::SpecialAuthorityIgnoreSlashes;
        } else if c == Some('/') {
            self.state = State::Authority;
        } else {
            if let Some(base) = self.base {
                self.copy_authority_from(base);
            }
            self.state = State::Path;
            self.pointer -= 1;
        }
        Ok(Step::Continue)
    }

    fn copy_authority_from(&mut self, base: &Url) {
        self.url.username = base.username.clone();
        self.url.password = base.password.clone();
        self.url.host = base.host.clone();
        self.url.port = base.port;
    }

    // -------------------------------------------------------------------------
    // Authority
    // -------------------------------------------------------------------------

    fn authority(&mut self, c: Option<char>) -> Result<Step> {
        if c == Some('@') {
            if self.at_sign_seen {
                self.buffer.insert_str(0, "%40");
            }
            self.at_sign_seen = true;

            let buffer = std::mem::take(&mut self.buffer);
            for cp in buffer.chars() {
                if cp == ':' && !self.password_token_seen {
                    self.password_token_seen = true;
                    continue;
                }
                let target = if self.password_token_seen {
                    &mut self.url.password
                } else {
                    &mut self.url.username
                };
                percent::encode_char_into(cp, CodePointClass::USERINFO_SET, target);
            }
        } else if self.is_authority_end(c) {
            if self.at_sign_seen && self.buffer.is_empty() {
                log::debug!("credentials without a host");
                return Err(ParseError::MissingHost);
            }
            self.pointer -= self.buffer.chars().count() as isize + 1;
            self.buffer.clear();
            self.state = State::Host;
        } else if let Some(c) = c {
            self.buffer.push(c);
        }
        Ok(Step::Continue)
    }

    fn host(&mut self, c: Option<char>) -> Result<Step> {
        if self.state_override.is_some() && self.url.scheme_type == SchemeType::File {
            self.pointer -= 1;
            self.state = State::FileHost;
            return Ok(Step::Continue);
        }

        if c == Some(':') && !self.inside_brackets {
            if self.buffer.is_empty() {
                return Err(ParseError::MissingHost);
            }
            if self.state_override == Some(State::Hostname) {
                log::debug!("hostname {:?} carries a port", self.buffer);
                return Err(ParseError::InvalidHost);
            }
            let host = Host::parse(&self.buffer, !self.is_special())?;
            self.url.host = Some(host);
            self.buffer.clear();
            self.state = State::Port;
        } else if self.is_authority_end(c) {
            self.pointer -= 1;
            if self.is_special() && self.buffer.is_empty() {
                return Err(ParseError::MissingHost);
            }
            if self.state_override.is_some()
                && self.buffer.is_empty()
                && (self.url.has_credentials() || self.url.port.is_some())
            {
                return Err(ParseError::MissingHost);
            }
            let host = Host::parse(&self.buffer, !self.is_special())?;
            self.url.host = Some(host);
            self.buffer.clear();
            self.state = State::PathStart;
            if self.state_override.is_some() {
                return Ok(Step::Done);
            }
        } else if let Some(c) = c {
            match c {
                '[' => self.inside_brackets = true,
                ']' => self.inside_brackets = false,
                _ => {}
            }
            self.buffer.push(c);
        }
        Ok(Step::Continue)
    }

    fn port(&mut self, c: Option<char>) -> Result<Step> {
        match c {
            Some(d) if d.is_ascii_digit() => {
                self.buffer.push(d);
                Ok(Step::Continue)
            }
            _ if self.is_authority_end(c) || self.state_override.is_some() => {
                if !self.buffer.is_empty() {
                    let port = parse_port(&self.buffer)?;
                    self.url.port = if Some(port) == self.url.scheme_type.default_port() {
                        None
                    } else {
                        Some(port)
                    };
                    self.buffer.clear();
                    if self.state_override.is_some() {
                        return Ok(Step::Done);
                    }
                }
                if self.state_override.is_some() {
                    return Err(ParseError::InvalidPort);
                }
                self.state = State::PathStart;
                self.pointer -= 1;
                Ok(Step::Continue)
            }
            _ => {
                log::debug!("invalid code point {c:?} in port");
                Err(ParseError::InvalidPort)
            }
        }
    }

    // -------------------------------------------------------------------------
    // File URLs
    // -------------------------------------------------------------------------

    fn file(&mut self, c: Option<char>) -> Result<Step> {
        self.url.set_scheme("file".to_string());
        self.url.host = Some(Host::Empty);

        if matches!(c, Some('/' | '\\')) {
            self.state = State::FileSlash;
            return Ok(Step::Continue);
        }

        match self.base.filter(|base| base.scheme_type == SchemeType::File) {
            Some(base) => {
                self.url.host = base.host.clone();
                self.url.path = base.path.clone();
                self.url.query = base.query.clone();
                match c {
                    Some('?') => {
                        self.url.query = Some(String::new());
                        self.state = State::Query;
                    }
                    Some('#') => {
                        self.url.fragment = Some(String::new());
                        self.state = State::Fragment;
                    }
                    Some(_) => {
                        self.url.query = None;
                        if starts_with_windows_drive_letter(self.rest()) {
                            self.url.path = UrlPath::default();
                        } else {
                            self.url.path.shorten(self.url.scheme_type);
                        }
                        self.state = State::Path;
                        self.pointer -= 1;
                    }
                    None => {}
                }
            }
            None => {
                self.state = State::Path;
                self.pointer -= 1;
            }
        }
        Ok(Step::Continue)
    }

    fn file_slash(&mut self, c: Option<char>) -> Result<Step> {
        if matches!(c, Some('/' | '\\')) {
            self.state = State::FileHost;
            return Ok(Step::Continue);
        }

        if let Some(base) = self.base.filter(|base| base.scheme_type == SchemeType::File) {
            self.url.host = base.host.clone();
            if !starts_with_windows_drive_letter(self.rest()) {
                if let Some(first) = base.path.segments().first() {
                    if is_normalized_windows_drive_letter(first) {
                        self.url.path.push(first.clone());
                    }
                }
            }
        }
        self.state = State::Path;
        self.pointer -= 1;
        Ok(Step::Continue)
    }

    fn file_host(&mut self, c: Option<char>) -> Result<Step> {
        if let Some(c) = c.filter(|&c| !matches!(c, '/' | '\\' | '?' | '#')) {
            self.buffer.push(c);
            return Ok(Step::Continue);
        }

        self.pointer -= 1;
        if self.state_override.is_none() && is_windows_drive_letter(&self.buffer) {
            // The buffer is reused as the first path segment.
            self.state = State::Path;
        } else if self.buffer.is_empty() {
            self.url.host = Some(Host::Empty);
            if self.state_override.is_some() {
                return Ok(Step::Done);
            }
            self.state = State::PathStart;
        } else {
            let mut host = Host::parse(&self.buffer, !self.is_special())?;
            if host == Host::Domain("localhost".to_string()) {
                host = Host::Empty;
            }
            self.url.host = Some(host);
            if self.state_override.is_some() {
                return Ok(Step::Done);
            }
            self.buffer.clear();
            self.state = State::PathStart;
        }
        Ok(Step::Continue)
    }

    // -------------------------------------------------------------------------
    // Path, query and fragment
    // -------------------------------------------------------------------------

    fn path_start(&mut self, c: Option<char>) -> Result<Step> {
        if self.is_special() {
            self.state = State::Path;
            if !matches!(c, Some('/' | '\\')) {
                self.pointer -= 1;
            }
        } else if self.state_override.is_none() && c == Some('?') {
            self.url.query = Some(String::new());
            self.state = State::Query;
        } else if self.state_override.is_none() && c == Some('#') {
            self.url.fragment = Some(String::new());
            self.state = State::Fragment;
        } else if c.is_some() {
            self.state = State::Path;
            if c != Some('/') {
                self.pointer -= 1;
            }
        } else if self.state_override.is_some() && self.url.host.is_none() {
            self.url.path.push(String::new());
        }
        Ok(Step::Continue)
    }

    fn path(&mut self, c: Option<char>) -> Result<Step> {
        let slash = c == Some('/') || (self.is_special() && c == Some('\\'));
        let ends_segment = c.is_none()
            || slash
            || (self.state_override.is_none() && matches!(c, Some('?' | '#')));

        if !ends_segment {
            if let Some(c) = c {
                percent::encode_char_into(c, CodePointClass::PATH_SET, &mut self.buffer);
            }
            return Ok(Step::Continue);
        }

        if is_double_dot_segment(&self.buffer) {
            self.url.path.shorten(self.url.scheme_type);
            if !slash {
                self.url.path.push(String::new());
            }
        } else if is_single_dot_segment(&self.buffer) {
            if !slash {
                self.url.path.push(String::new());
            }
        } else {
            let mut segment = std::mem::take(&mut self.buffer);
            if self.url.scheme_type == SchemeType::File
                && self.url.path.segments().is_empty()
                && is_windows_drive_letter(&segment)
            {
                segment.replace_range(1..2, ":");
            }
            self.url.path.push(segment);
        }
        self.buffer.clear();

        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            _ => {}
        }
        Ok(Step::Continue)
    }

    fn opaque_path(&mut self, c: Option<char>) -> Result<Step> {
        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(c) => {
                if let UrlPath::Opaque(path) = &mut self.url.path {
                    percent::encode_char_into(c, CodePointClass::C0_CONTROL_SET, path);
                }
            }
            None => {}
        }
        Ok(Step::Continue)
    }

    fn query(&mut self, c: Option<char>) -> Result<Step> {
        let hash = self.state_override.is_none() && c == Some('#');
        if hash || c.is_none() {
            let set = if self.is_special() {
                CodePointClass::SPECIAL_QUERY_SET
            } else {
                CodePointClass::QUERY_SET
            };
            let query = self.url.query.get_or_insert_with(String::new);
            percent::encode_into(&self.buffer, set, query);
            self.buffer.clear();
            if hash {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
        } else if let Some(c) = c {
            self.buffer.push(c);
        }
        Ok(Step::Continue)
    }
}

/// Decimal port, at most 65535. Long runs of leading zeros are fine.
fn parse_port(digits: &str) -> Result<u16> {
    let mut value: u32 = 0;
    for d in digits.bytes() {
        value = value * 10 + u32::from(d - b'0');
        if value > u32::from(u16::MAX) {
            log::debug!("port {digits:?} out of range");
            return Err(ParseError::InvalidPort);
        }
    }
    Ok(value as u16)
}
