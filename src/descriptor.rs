use http::{HeaderMap, HeaderName, HeaderValue, Method};
use uuid::Uuid;

use crate::{error::HeaderError, mode::Transport, scope::FileId};

/// Insertion-ordered map of rendered string values.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedMap {
    entries: Vec<(String, String)>,
}

impl RenderedMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RenderedMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Everything a transport needs to send one file upload.
///
/// Built fresh for every upload attempt. Parameters appear in exactly one of
/// `url`, `fields` or `headers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// File this request uploads.
    pub file_id: FileId,
    /// Unique id assigned to the file when it was queued.
    pub uuid: Uuid,
    /// HTTP method.
    pub method: Method,
    /// Target URL, including any query-string parameters.
    pub url: String,
    /// Body fields sent next to the file.
    pub fields: RenderedMap,
    /// Request headers.
    pub headers: RenderedMap,
    /// Body shape.
    pub transport: Transport,
    /// Multipart part name carrying the file.
    pub input_name: String,
}

impl RequestDescriptor {
    /// Returns `true` when the body is multipart-encoded.
    pub fn is_multipart(&self) -> bool {
        self.transport.is_multipart()
    }

    /// Returns the query-string portion of `url`, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Converts the rendered headers into an [`HeaderMap`].
    pub fn header_map(&self) -> Result<HeaderMap, HeaderError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (key, value) in self.headers.iter() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                HeaderError::InvalidName {
                    name: key.to_owned(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| HeaderError::InvalidValue {
                name: key.to_owned(),
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}
