//! URL paths
//!
//! A path is either a list of segments (hierarchical URLs) or a single
//! opaque string (`mailto:`, `data:` and other cannot-be-a-base URLs).

use std::fmt;

use crate::chars::is_normalized_windows_drive_letter;
use crate::types::SchemeType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlPath {
    List(Vec<String>),
    Opaque(String),
}

impl Default for UrlPath {
    fn default() -> Self {
        UrlPath::List(Vec::new())
    }
}

impl UrlPath {
    #[inline]
    pub fn is_opaque(&self) -> bool {
        matches!(self, UrlPath::Opaque(_))
    }

    /// Segments of a list path; empty for an opaque path.
    pub fn segments(&self) -> &[String] {
        match self {
            UrlPath::List(segments) => segments,
            UrlPath::Opaque(_) => &[],
        }
    }

    pub(crate) fn push(&mut self, segment: String) {
        if let UrlPath::List(segments) = self {
            segments.push(segment);
        }
    }

    /// Remove the last segment. A lone normalized drive letter in a `file`
    /// path is kept.
    pub fn shorten(&mut self, scheme_type: SchemeType) {
        let UrlPath::List(segments) = self else {
            return;
        };
        if scheme_type == SchemeType::File
            && segments.len() == 1
            && is_normalized_windows_drive_letter(&segments[0])
        {
            return;
        }
        segments.pop();
    }

    /// Drop trailing spaces from an opaque path.
    pub(crate) fn strip_trailing_spaces(&mut self) {
        if let UrlPath::Opaque(path) = self {
            let trimmed = path.trim_end_matches(' ').len();
            path.truncate(trimmed);
        }
    }
}

impl fmt::Display for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPath::Opaque(path) => f.write_str(path),
            UrlPath::List(segments) => {
                for segment in segments {
                    f.write_str("/")?;
                    f.write_str(segment)?;
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// Dot Segments
// =============================================================================

/// `.` or `%2e`, case-insensitive.
pub fn is_single_dot_segment(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

/// `..`, `.%2e`, `%2e.` or `%2e%2e`, case-insensitive.
pub fn is_double_dot_segment(segment: &str) -> bool {
    match segment.len() {
        2 => segment == "..",
        4 => segment.eq_ignore_ascii_case(".%2e") || segment.eq_ignore_ascii_case("%2e."),
        6 => segment.eq_ignore_ascii_case("%2e%2e"),
        _ => false,
    }
}
