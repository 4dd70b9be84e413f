//! HTTP verbs used by generated operations.

use strum::{Display, EnumIter, EnumString};

/// The HTTP verb an [`OperationSpec`](crate::OperationSpec) is issued with.
///
/// ## Examples
///
/// ```rust
/// use switchboard::RestMethod;
///
/// let method: RestMethod = "PUT".parse().unwrap();
/// assert_eq!(method, RestMethod::Put);
/// assert!(method.has_body());
/// assert!(!RestMethod::Head.returns_body());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl RestMethod {
    /// Returns `true` if requests with this verb usually carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` if responses to this verb may carry a body.
    ///
    /// `HEAD` responses never do, so the fake dispatcher strips any
    /// payload a responder produced for a `HEAD` operation.
    pub fn returns_body(&self) -> bool {
        !matches!(self, Self::Head)
    }

    /// Returns `true` if repeating the request has no additional effect.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::Post | Self::Patch)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Trace => reqwest::Method::TRACE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}

impl TryFrom<&reqwest::Method> for RestMethod {
    type Error = strum::ParseError;

    fn try_from(method: &reqwest::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}
