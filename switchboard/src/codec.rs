//! Body codecs.
//!
//! The [`Codec`] trait turns typed values into wire bytes and back. Each
//! operation declares a [`BodyFormat`] for its request and response bodies,
//! and both the client pipeline and the fake dispatcher go through the same
//! codec so a payload survives the trip byte for byte.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strum::Display;

use crate::error::CodecError;

/// Encoding strategy for a body format.
pub trait Codec {
    /// The Content-Type this codec produces.
    fn content_type() -> &'static str;

    /// Serializes `value` into a body.
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CodecError>;

    /// Deserializes a body into `T`.
    fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError>;
}

/// JSON bodies via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type() -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError> {
        if body.is_empty() {
            return Err(CodecError::EmptyBody);
        }
        Ok(serde_json::from_slice(body)?)
    }
}

/// XML bodies via `quick-xml`'s serde support.
///
/// The root element takes the serialized type's name, so model types
/// rename themselves to the element name the service expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn content_type() -> &'static str {
        "application/xml"
    }

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(quick_xml::se::to_string(value)?))
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError> {
        if body.is_empty() {
            return Err(CodecError::EmptyBody);
        }
        Ok(quick_xml::de::from_reader(body)?)
    }
}

/// The body format an operation declares for a request or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BodyFormat {
    /// No body.
    None,
    Json,
    Xml,
}

impl BodyFormat {
    /// Returns the Content-Type, or `None` for bodiless formats.
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json => Some(JsonCodec::content_type()),
            Self::Xml => Some(XmlCodec::content_type()),
        }
    }

    /// Encodes `value`, returning `None` for [`BodyFormat::None`].
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Option<Bytes>, CodecError> {
        match self {
            Self::None => Ok(None),
            Self::Json => JsonCodec::encode(value).map(Some),
            Self::Xml => XmlCodec::encode(value).map(Some),
        }
    }

    /// Decodes a body.
    ///
    /// ## Errors
    ///
    /// [`BodyFormat::None`] has nothing to decode and always fails with
    /// [`CodecError::EmptyBody`].
    pub fn decode<T: DeserializeOwned>(self, body: &[u8]) -> Result<T, CodecError> {
        match self {
            Self::None => Err(CodecError::EmptyBody),
            Self::Json => JsonCodec::decode(body),
            Self::Xml => XmlCodec::decode(body),
        }
    }

    /// Checks a Content-Type header against this format.
    ///
    /// A missing header is accepted; parameters such as `charset` are
    /// ignored.
    pub fn check_content_type(self, actual: Option<&str>) -> Result<(), CodecError> {
        let (Some(expected), Some(actual)) = (self.content_type(), actual) else {
            return Ok(());
        };
        let essence = actual.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(CodecError::ContentTypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}
