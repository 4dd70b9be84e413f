//! Body encoding and decoding errors.

use thiserror::Error;

/// Errors while encoding a body or decoding one into a typed value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML decoding failed.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),

    /// XML encoding failed.
    #[error("XML encode error: {0}")]
    XmlEncode(#[from] quick_xml::SeError),

    /// Body was not valid UTF-8 where text was expected.
    #[error("invalid UTF-8 in body: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Body content type doesn't match the operation's format.
    #[error("Unexpected content type: expected {expected}, got {actual}")]
    ContentTypeMismatch {
        /// The expected content type.
        expected: String,
        /// The actual content type received.
        actual: String,
    },

    /// Empty body when content was expected.
    #[error("Empty body")]
    EmptyBody,
}

impl CodecError {
    /// Returns `true` if this is a parsing error.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::XmlParse(_) | Self::InvalidUtf8(_))
    }
}
