//! Search parameters
//!
//! An ordered list of name/value pairs read from and written to the
//! `application/x-www-form-urlencoded` format. Duplicate names are kept.

use std::fmt;

use crate::percent;
use crate::url::Url;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. One leading `?` is ignored.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let pairs = input
            .split('&')
            .filter(|sequence| !sequence.is_empty())
            .map(|sequence| {
                let (name, value) = sequence.split_once('=').unwrap_or((sequence, ""));
                (percent::form_decode(name), percent::form_decode(value))
            })
            .collect();
        Self { pairs }
    }

    /// The pairs in the query of `url`.
    pub fn from_url(url: &Url) -> Self {
        url.query().map(Self::parse).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Remove every pair named `name`, or only those also matching `value`.
    pub fn delete(&mut self, name: &str, value: Option<&str>) {
        self.pairs
            .retain(|(n, v)| !(n == name && value.map_or(true, |value| v == value)));
    }

    /// First value for `name`, or the empty string.
    pub fn get(&self, name: &str) -> &str {
        self.find(name).unwrap_or("")
    }

    /// First value for `name`, if any.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn has(&self, name: &str, value: Option<&str>) -> bool {
        self.pairs
            .iter()
            .any(|(n, v)| n == name && value.map_or(true, |value| v == value))
    }

    /// Replace the first value for `name` and drop the rest; append if absent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(n, _)| n == name) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(n, _)| {
                    let keep = index <= first || n != name;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((name.to_string(), value)),
        }
    }

    /// Stable sort by name in code-point order.
    pub fn sort(&mut self) {
        self.pairs.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Borrowing iterator over the current pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Snapshot of the pairs at call time. Clone the iterator to restart it.
    pub fn items(&self) -> Items {
        Items {
            inner: self.pairs.clone().into_iter(),
        }
    }

    pub fn keys(&self) -> Keys {
        Keys(self.items())
    }

    pub fn values(&self) -> Values {
        Values(self.items())
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            percent::form_encode_into(name, &mut out);
            out.push('=');
            percent::form_encode_into(value, &mut out);
        }
        f.write_str(&out)
    }
}

impl fmt::Debug for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SearchParams").field(&self.to_string()).finish()
    }
}

impl std::str::FromStr for SearchParams {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SearchParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.pairs
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Owned snapshot of name/value pairs.
#[derive(Debug, Clone)]
pub struct Items {
    inner: std::vec::IntoIter<(String, String)>,
}

impl Iterator for Items {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Items {}

#[derive(Debug, Clone)]
pub struct Keys(Items);

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.0.next().map(|(name, _)| name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Keys {}

#[derive(Debug, Clone)]
pub struct Values(Items);

impl Iterator for Values {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Values {}
