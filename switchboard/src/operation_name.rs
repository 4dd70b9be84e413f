use std::borrow::Cow;
use std::fmt;

/// A validated operation identifier of the form `Client.Method`.
///
/// Rules:
/// 1. Exactly one `.` separates the client name from the method name.
/// 2. Each half must start with an ASCII letter.
/// 3. Remaining characters must be ASCII alphanumeric or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationName(Cow<'static, str>);

#[derive(Debug, PartialEq, Eq)]
pub enum OperationNameError {
    Empty,
    MissingSeparator,
    EmptyClient,
    EmptyMethod,
    InvalidStartCharacter(char),
    InvalidCharacter(char),
}

impl fmt::Display for OperationNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "operation name cannot be empty"),
            Self::MissingSeparator => {
                write!(f, "operation name must have the form Client.Method")
            }
            Self::EmptyClient => write!(f, "operation name has an empty client part"),
            Self::EmptyMethod => write!(f, "operation name has an empty method part"),
            Self::InvalidStartCharacter(c) => {
                write!(f, "operation name part must start with a letter, found '{c}'")
            }
            Self::InvalidCharacter(c) => {
                write!(f, "operation name contains invalid character: '{c}'")
            }
        }
    }
}

impl std::error::Error for OperationNameError {}

impl OperationName {
    /// Creates a validated operation name.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, OperationNameError> {
        let s = name.into();
        Self::validate(&s)?;
        Ok(Self(Cow::Owned(s)))
    }

    /// Wraps a static name without validating it.
    ///
    /// Used for the `const` operation tables of generated clients.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    fn validate(s: &str) -> Result<(), OperationNameError> {
        if s.is_empty() {
            return Err(OperationNameError::Empty);
        }

        let mut parts = s.split('.');
        let (Some(client), Some(method), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(OperationNameError::MissingSeparator);
        };

        Self::validate_part(client).map_err(|e| match e {
            OperationNameError::Empty => OperationNameError::EmptyClient,
            other => other,
        })?;
        Self::validate_part(method).map_err(|e| match e {
            OperationNameError::Empty => OperationNameError::EmptyMethod,
            other => other,
        })
    }

    fn validate_part(part: &str) -> Result<(), OperationNameError> {
        let mut chars = part.chars();

        match chars.next() {
            None => return Err(OperationNameError::Empty),
            Some(c) if !c.is_ascii_alphabetic() => {
                return Err(OperationNameError::InvalidStartCharacter(c))
            }
            _ => {}
        }

        match chars.find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            Some(c) => Err(OperationNameError::InvalidCharacter(c)),
            None => Ok(()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The client half, e.g. `DatetimeClient`.
    pub fn client(&self) -> &str {
        self.0.split_once('.').map_or(&self.0, |(client, _)| client)
    }

    /// The method half, e.g. `GetUTCMinDateTime`.
    pub fn method(&self) -> &str {
        self.0.split_once('.').map_or(&self.0, |(_, method)| method)
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OperationName> for String {
    fn from(name: OperationName) -> Self {
        name.0.into_owned()
    }
}

impl TryFrom<String> for OperationName {
    type Error = OperationNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for OperationName {
    type Error = OperationNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
