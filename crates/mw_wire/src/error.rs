use alloc::string::String;

use thiserror::Error;

use crate::ConverterQuery;

// -----------------------------------------------------------------------------
// Error

/// No registration matches the requested type.
///
/// Raised while resolving converters, usually a programming error such as a
/// field type nobody registered a converter for.
#[derive(Debug, Error, Clone)]
#[error("no converter registered for `{type_path}`{}", describe_property(.property))]
pub struct UnresolvedConverterError {
    /// Type path of the value type that failed to resolve.
    pub type_path: &'static str,
    /// Name of the property being mapped, if any.
    pub property: Option<&'static str>,
}

impl UnresolvedConverterError {
    pub(crate) fn of(query: &ConverterQuery) -> Self {
        Self {
            type_path: query.value.type_path(),
            property: query.field.map(|field| field.name()),
        }
    }
}

fn describe_property(property: &Option<&'static str>) -> String {
    match property {
        Some(name) => alloc::format!(" (property `{name}`)"),
        None => String::new(),
    }
}

/// The token stream does not match the shape a converter expects.
///
/// The whole document is rejected, no partial result is produced.
#[derive(Debug, Error, Clone)]
#[error("malformed input: {message}")]
pub struct MalformedInputError {
    pub message: String,
}

/// Errors returned by [`Serializer`](crate::Serializer) and converters.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum SerialError {
    #[error(transparent)]
    Unresolved(#[from] UnresolvedConverterError),

    #[error(transparent)]
    Malformed(#[from] MalformedInputError),

    #[error("invalid value for `{type_path}`: {reason}")]
    InvalidValue {
        type_path: &'static str,
        reason: String,
    },
}

impl SerialError {
    /// Creates a [`SerialError::Malformed`] with the given message.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(MalformedInputError {
            message: message.into(),
        })
    }

    /// Creates a [`SerialError::InvalidValue`].
    #[inline]
    pub fn invalid_value(type_path: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            type_path,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`SerialError::Malformed`].
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Returns `true` for [`SerialError::Unresolved`].
    #[inline]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }
}

impl From<serde_json::Error> for SerialError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(alloc::format!("{err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{SerialError, UnresolvedConverterError};

    #[test]
    fn unresolved_message_names_property() {
        let err = UnresolvedConverterError {
            type_path: "demo::Shape",
            property: Some("outline"),
        };
        assert_eq!(
            err.to_string(),
            "no converter registered for `demo::Shape` (property `outline`)"
        );

        let err = SerialError::from(UnresolvedConverterError {
            type_path: "u128",
            property: None,
        });
        assert!(err.is_unresolved());
        assert_eq!(err.to_string(), "no converter registered for `u128`");
    }

    #[test]
    fn malformed_message() {
        let err = SerialError::malformed("expected StartArray, found Number");
        assert!(err.is_malformed());
        assert_eq!(
            err.to_string(),
            "malformed input: expected StartArray, found Number"
        );
    }
}
