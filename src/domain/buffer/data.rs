//! Buffer data value objects

use std::collections::BTreeMap;

/// Plain text format
pub const MIME_TEXT: &str = "text/plain";

/// HTML format
pub const MIME_HTML: &str = "text/html";

/// Present when the data was placed in the buffer by this application
pub const MIME_OWNER: &str = "application/x-clipwatch-owner";

/// Title of the window that owned the buffer when the data was captured
pub const MIME_WINDOW_TITLE: &str = "application/x-clipwatch-owner-window-title";

/// Content of a buffer keyed by format identifier.
///
/// Ordered so that two snapshots holding the same formats and bytes compare
/// equal regardless of the order the owner offered them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferData {
    formats: BTreeMap<String, Vec<u8>>,
}

impl BufferData {
    /// Create empty buffer data
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffer data holding only plain text
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut data = Self::new();
        data.insert(MIME_TEXT, text.into().into_bytes());
        data
    }

    /// Insert (or replace) the bytes for a format
    pub fn insert(&mut self, format: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.formats.insert(format.into(), bytes.into());
    }

    /// Builder-style insert
    pub fn with(mut self, format: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(format, bytes);
        self
    }

    /// Get the bytes stored for a format
    pub fn get(&self, format: &str) -> Option<&[u8]> {
        self.formats.get(format).map(Vec::as_slice)
    }

    /// Check if a format is present
    pub fn contains(&self, format: &str) -> bool {
        self.formats.contains_key(format)
    }

    /// Plain text content, if present and valid UTF-8
    pub fn text(&self) -> Option<&str> {
        self.get(MIME_TEXT).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// HTML content, if present and valid UTF-8
    pub fn html(&self) -> Option<&str> {
        self.get(MIME_HTML).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Iterate over the stored format identifiers
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Iterate over format/bytes pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.formats
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of stored formats
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Check if no format is stored
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Copy of this data restricted to the given formats
    pub fn clone_formats(&self, formats: &[String]) -> Self {
        let formats = formats
            .iter()
            .filter_map(|f| self.formats.get_key_value(f))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { formats }
    }

    /// Total payload size in bytes
    pub fn size(&self) -> usize {
        self.formats.values().map(Vec::len).sum()
    }
}

/// Result of a successful buffer read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferContent {
    /// Fetched data
    pub data: BufferData,
    /// Opaque freshness marker set by the buffer owner (e.g. X11 TIMESTAMP)
    pub timestamp: Option<Vec<u8>>,
}

impl BufferContent {
    /// Content without a freshness marker
    pub fn new(data: BufferData) -> Self {
        Self {
            data,
            timestamp: None,
        }
    }

    /// Content with a freshness marker
    pub fn with_timestamp(data: BufferData, timestamp: impl Into<Vec<u8>>) -> Self {
        Self {
            data,
            timestamp: Some(timestamp.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_stores_plain_text() {
        let data = BufferData::from_text("hi");
        assert_eq!(data.text(), Some("hi"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = BufferData::new().with(MIME_TEXT, "x").with(MIME_HTML, "<b>x</b>");
        let b = BufferData::new().with(MIME_HTML, "<b>x</b>").with(MIME_TEXT, "x");
        assert_eq!(a, b);
    }

    #[test]
    fn clone_formats_drops_unlisted() {
        let data = BufferData::new()
            .with(MIME_TEXT, "x")
            .with(MIME_HTML, "<b>x</b>")
            .with("image/png", vec![1u8, 2, 3]);

        let restricted = data.clone_formats(&[MIME_TEXT.to_string(), "text/uri-list".to_string()]);
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted.text(), Some("x"));
        assert!(!restricted.contains("image/png"));
    }

    #[test]
    fn invalid_utf8_text_is_none() {
        let data = BufferData::new().with(MIME_TEXT, vec![0xffu8, 0xfe]);
        assert!(data.text().is_none());
        assert_eq!(data.size(), 2);
    }
}
