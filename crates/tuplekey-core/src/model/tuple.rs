use crate::{COMPONENT_ACCESSOR_NAMES, MAX_KEY_ARITY, model::types::DataType};
use thiserror::Error as ThisError;

///
/// KeyTupleTypeError
///
/// Structural failures while declaring a compound key tuple.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyTupleTypeError {
    #[error("key tuple must declare at least one component")]
    Empty,

    #[error("key tuple declares {arity} components (maximum {max})")]
    TooManyComponents { arity: usize, max: usize },
}

///
/// ComponentAccessor
///
/// Positional read of one key component. Accessor `i` reads the value that
/// constructor parameter `i` placed into the tuple.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentAccessor {
    pub index: usize,
    pub name: &'static str,
    pub ty: DataType,
}

///
/// KeyConstructor
///
/// Constructor signature of a key tuple: one parameter per component,
/// aligned with the accessor at the same position.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyConstructor {
    pub params: Vec<DataType>,
}

///
/// KeyTupleType
///
/// Declared structure of a compound key type, built once when the key type
/// is registered and immutable afterwards.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyTupleType {
    data_type: DataType,
    constructor: KeyConstructor,
    accessors: Vec<ComponentAccessor>,
}

impl KeyTupleType {
    /// Declare a key tuple with the given ordered component types.
    pub fn new(components: Vec<DataType>) -> Result<Self, KeyTupleTypeError> {
        Self::with_max_arity(components, MAX_KEY_ARITY)
    }

    /// Declare a key tuple, enforcing a tighter arity limit than the global one.
    pub fn with_max_arity(
        components: Vec<DataType>,
        max_arity: usize,
    ) -> Result<Self, KeyTupleTypeError> {
        let max = max_arity.min(MAX_KEY_ARITY);

        if components.is_empty() {
            return Err(KeyTupleTypeError::Empty);
        }
        if components.len() > max {
            return Err(KeyTupleTypeError::TooManyComponents {
                arity: components.len(),
                max,
            });
        }

        let accessors = components
            .iter()
            .zip(COMPONENT_ACCESSOR_NAMES)
            .enumerate()
            .map(|(index, (ty, name))| ComponentAccessor {
                index,
                name,
                ty: ty.clone(),
            })
            .collect();

        Ok(Self {
            data_type: DataType::Tuple(components.clone()),
            constructor: KeyConstructor { params: components },
            accessors,
        })
    }

    /// The tuple's own static type, used for exact type comparisons.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    #[must_use]
    pub const fn constructor(&self) -> &KeyConstructor {
        &self.constructor
    }

    #[must_use]
    pub fn component_types(&self) -> &[DataType] {
        &self.constructor.params
    }

    #[must_use]
    pub fn accessors(&self) -> &[ComponentAccessor] {
        &self.accessors
    }

    #[must_use]
    pub fn accessor(&self, index: usize) -> Option<&ComponentAccessor> {
        self.accessors.get(index)
    }
}
