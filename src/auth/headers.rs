//! Ordered header multimap shared by the bridge and the provider.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Header conversion failures between [`HeaderList`] and [`HeaderMap`].
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// Outbound header name cannot be carried by HTTP.
    #[error("invalid header name `{0}`")]
    Name(String),

    /// Outbound header value cannot be carried by HTTP.
    #[error("invalid value for header `{0}`")]
    Value(String),
}

/// Ordered list of `(name, value)` pairs.
///
/// Repeated names are kept as separate entries in insertion order, so
/// `set-cookie` and friends survive a round trip. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry without touching existing entries of the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Drop every entry stored under `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every non-empty header out of an axum [`HeaderMap`].
    ///
    /// Each value of a multi-valued header becomes its own entry. Bytes
    /// outside ASCII (obs-text) are read as latin-1, so no value is rejected.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        map.iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.as_str(), latin1(value)))
            .collect()
    }

    /// Build an axum [`HeaderMap`] by appending every entry in order.
    pub fn to_header_map(&self) -> Result<HeaderMap, HeaderError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HeaderError::Name(name.clone()))?;
            let header_value = HeaderValue::from_bytes(&to_latin1(value))
                .map_err(|_| HeaderError::Value(name.clone()))?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }
}

fn latin1(value: &HeaderValue) -> String {
    match value.to_str() {
        Ok(text) => text.to_string(),
        Err(_) => value.as_bytes().iter().copied().map(char::from).collect(),
    }
}

/// Inverse of [`latin1`]: chars up to U+00FF become single bytes, anything
/// wider is sent as UTF-8.
fn to_latin1(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(u8::try_from)
        .collect::<Result<Vec<u8>, _>>()
        .unwrap_or_else(|_| value.as_bytes().to_vec())
}

impl<N, V> FromIterator<(N, V)> for HeaderList
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (name, value) in iter {
            list.append(name, value);
        }
        list
    }
}
