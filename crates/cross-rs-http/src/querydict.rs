//! Query string dictionary.
//!
//! [`QueryDict`] parses `key=value&...` strings into an insertion-ordered
//! [`MultiValueDict`] and encodes pairs back into
//! `application/x-www-form-urlencoded` form. Link building uses it to turn
//! caller-supplied query strings into ordered pairs.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use cross_rs_core::utils::MultiValueDict;

/// Bytes left unescaped by form encoding, besides ASCII alphanumerics.
///
/// Space is kept here so it can be rewritten to `+` afterwards.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b' ');

/// An insertion-ordered dictionary for query string data.
///
/// # Examples
///
/// ```
/// use cross_rs_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&size=large&color=blue");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(qd.values().collect::<Vec<_>>(), vec!["blue", "large"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    data: MultiValueDict<String, String>,
}

impl QueryDict {
    /// Creates a new, empty `QueryDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string (e.g. `"key1=val1&key2=val2"`).
    ///
    /// `+` decodes to a space and percent sequences are decoded. Empty
    /// segments are skipped; a segment without `=` yields an empty value.
    pub fn parse(query_string: &str) -> Self {
        let mut data = MultiValueDict::new();

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                continue;
            }
            data.append(percent_decode(key), percent_decode(value));
        }

        Self { data }
    }

    /// Builds a `QueryDict` from ordered pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = MultiValueDict::new();
        for (key, value) in pairs {
            data.append(key.into(), value.into());
        }
        Self { data }
    }

    /// Returns the last value for the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(&key.to_string()).map(String::as_str)
    }

    /// Returns all values for the given key.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get_list(&key.to_string())
    }

    /// Sets a single value for the given key, replacing any existing values.
    pub fn set(&mut self, key: &str, value: &str) {
        self.data.set(key.to_string(), value.to_string());
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: &str, value: &str) {
        self.data.append(key.to_string(), value.to_string());
    }

    /// Returns the last value of every key, in key order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.data.last_values().map(String::as_str)
    }

    /// Returns `(key, last value)` for every key, in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .filter_map(|(k, v)| v.last().map(|last| (k.as_str(), last.as_str())))
    }

    /// Encodes this `QueryDict` as a form-encoded query string.
    ///
    /// Every value of every key is emitted, in insertion order.
    pub fn urlencode(&self) -> String {
        let mut parts = Vec::new();
        for (key, values) in &self.data {
            for value in values {
                parts.push(format!("{}={}", form_encode(key), form_encode(value)));
            }
        }
        parts.join("&")
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(&key.to_string())
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

/// Decodes a form-encoded string.
fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Form-encodes a string: spaces become `+`, unsafe bytes are percent-escaped.
pub fn form_encode(input: &str) -> String {
    utf8_percent_encode(input, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}
