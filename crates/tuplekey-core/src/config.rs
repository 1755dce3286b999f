//! Key services configuration.
//!
//! Configuration is plain data: it is loaded once (usually from a TOML
//! fragment shipped with the index definitions), validated, and then handed
//! to `TupleKeyServices`. Nothing here is read at parse time.

use crate::{MAX_KEY_ARITY, expr::FactoryRef};
use serde::Deserialize;
use thiserror::Error as ThisError;

/// Declaring type of the well-known tuple factory.
pub const DEFAULT_FACTORY_TYPE: &str = "KeyTuple";

/// Canonical creation method on the tuple factory.
pub const DEFAULT_FACTORY_METHOD: &str = "create";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid key config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_arity {max_arity} is out of range (1..={limit})")]
    MaxArityOutOfRange { max_arity: usize, limit: usize },

    #[error("tuple_factory.{field} must not be empty")]
    EmptyFactoryIdentifier { field: &'static str },
}

///
/// FactorySignature
///
/// The one static factory accepted as a key-constructing selector.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FactorySignature {
    pub declaring_type: String,
    pub method: String,
}

impl FactorySignature {
    #[must_use]
    pub fn matches(&self, factory: &FactoryRef) -> bool {
        self.declaring_type == factory.declaring_type && self.method == factory.method
    }

    /// Factory reference naming this signature, for building calls.
    #[must_use]
    pub fn to_factory_ref(&self) -> FactoryRef {
        FactoryRef::new(self.declaring_type.clone(), self.method.clone())
    }
}

impl Default for FactorySignature {
    fn default() -> Self {
        Self {
            declaring_type: DEFAULT_FACTORY_TYPE.to_string(),
            method: DEFAULT_FACTORY_METHOD.to_string(),
        }
    }
}

///
/// KeyInfoConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KeyInfoConfig {
    /// Largest key tuple the services will accept.
    pub max_arity: usize,
    pub tuple_factory: FactorySignature,
}

impl KeyInfoConfig {
    /// Parse and validate a TOML config fragment. Every key is optional.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_arity == 0 || self.max_arity > MAX_KEY_ARITY {
            return Err(ConfigError::MaxArityOutOfRange {
                max_arity: self.max_arity,
                limit: MAX_KEY_ARITY,
            });
        }
        if self.tuple_factory.declaring_type.trim().is_empty() {
            return Err(ConfigError::EmptyFactoryIdentifier {
                field: "declaring_type",
            });
        }
        if self.tuple_factory.method.trim().is_empty() {
            return Err(ConfigError::EmptyFactoryIdentifier { field: "method" });
        }

        Ok(())
    }
}

impl Default for KeyInfoConfig {
    fn default() -> Self {
        Self {
            max_arity: MAX_KEY_ARITY,
            tuple_factory: FactorySignature::default(),
        }
    }
}
