use crate::{
    config::ConfigError,
    key::{InvalidKeySelector, KeyInfoError},
    model::tuple::KeyTupleTypeError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured error with a stable classification, returned from the index
/// definition surface. Module-level errors convert into it via `From`.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a key-origin invariant violation.
    pub(crate) fn key_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Key,
            message.into(),
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }

    /// The key error carried in `detail`, if this error came from key services.
    #[must_use]
    pub const fn key_detail(&self) -> Option<&KeyInfoError> {
        match &self.detail {
            Some(ErrorDetail::Key(err)) => Some(err),
            _ => None,
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Key(KeyInfoError),
    #[error("{0}")]
    Config(ConfigError),
}

impl From<KeyInfoError> for InternalError {
    fn from(err: KeyInfoError) -> Self {
        let (class, origin) = match &err {
            KeyInfoError::NotATupleType { .. } | KeyInfoError::Tuple(_) => {
                (ErrorClass::Unsupported, ErrorOrigin::Model)
            }
            KeyInfoError::InvalidKeySelector(_) => {
                (ErrorClass::Unsupported, ErrorOrigin::Selector)
            }
            KeyInfoError::ArityMismatch { .. }
            | KeyInfoError::ComponentTypeMismatch { .. }
            | KeyInfoError::TypeMismatch { .. }
            | KeyInfoError::IndexOutOfRange { .. } => {
                (ErrorClass::InvariantViolation, ErrorOrigin::Key)
            }
        };

        Self {
            class,
            origin,
            message: err.to_string(),
            detail: Some(ErrorDetail::Key(err)),
        }
    }
}

impl From<InvalidKeySelector> for InternalError {
    fn from(err: InvalidKeySelector) -> Self {
        KeyInfoError::from(err).into()
    }
}

impl From<KeyTupleTypeError> for InternalError {
    fn from(err: KeyTupleTypeError) -> Self {
        KeyInfoError::from(err).into()
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Model,
    Key,
    Selector,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Model => "model",
            Self::Key => "key",
            Self::Selector => "selector",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::KeyInfoConfig,
        expr::ExprKind,
        key::SelectorViolation,
        model::types::DataType,
    };

    #[test]
    fn selector_rejections_classify_as_unsupported_selector() {
        let err: InternalError = InvalidKeySelector::new(
            SelectorViolation::UnsupportedExpressionShape {
                kind: ExprKind::Parameter,
            },
        )
        .into();

        assert_eq!(err.class, ErrorClass::Unsupported);
        assert_eq!(err.origin, ErrorOrigin::Selector);
        assert!(matches!(
            err.key_detail(),
            Some(KeyInfoError::InvalidKeySelector(_))
        ));
        assert!(
            err.display_with_class()
                .starts_with("selector:unsupported: invalid key selector")
        );
    }

    #[test]
    fn synthesis_failures_classify_as_key_invariants() {
        let err: InternalError = KeyInfoError::ArityMismatch {
            expected: 2,
            found: 3,
        }
        .into();

        assert_eq!(err.class, ErrorClass::InvariantViolation);
        assert_eq!(err.origin, ErrorOrigin::Key);
    }

    #[test]
    fn non_tuple_types_classify_as_model_errors() {
        let err: InternalError = KeyInfoError::NotATupleType {
            found: DataType::Text,
        }
        .into();

        assert_eq!(err.origin, ErrorOrigin::Model);
        assert_eq!(err.message, "type 'text' is not a key tuple type");
    }

    #[test]
    fn config_errors_keep_detail() {
        let config_err = KeyInfoConfig::from_toml_str("max_arity = 0").unwrap_err();
        let err: InternalError = config_err.into();

        assert_eq!(err.origin, ErrorOrigin::Config);
        assert!(matches!(err.detail, Some(ErrorDetail::Config(_))));
        assert!(err.key_detail().is_none());
    }

    #[test]
    fn key_invariant_has_no_detail() {
        let err = InternalError::key_invariant("stored field list is empty");

        assert_eq!(err.class, ErrorClass::InvariantViolation);
        assert_eq!(err.origin, ErrorOrigin::Key);
        assert!(err.detail.is_none());
    }
}
