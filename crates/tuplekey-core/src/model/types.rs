use std::fmt::{self, Display};

///
/// DataType
///
/// Static type of an expression node, record field, or key component.
/// Type identity is structural and exact: two types are the same type only
/// when they compare equal. No widening is implied by this enum.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DataType {
    // Scalar primitives
    Blob,
    Bool,
    Float64,
    Int32,
    Int,
    Text,
    Uint,
    Ulid,

    /// Nullable wrapper around another type.
    Optional(Box<Self>),

    /// Named record type, identified by its path.
    Record(&'static str),

    /// Fixed-arity ordered compound type.
    Tuple(Vec<Self>),
}

impl DataType {
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Component types when this is a tuple type.
    #[must_use]
    pub fn tuple_components(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(components) => Some(components),
            _ => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob => f.write_str("blob"),
            Self::Bool => f.write_str("bool"),
            Self::Float64 => f.write_str("float64"),
            Self::Int32 => f.write_str("int32"),
            Self::Int => f.write_str("int"),
            Self::Text => f.write_str("text"),
            Self::Uint => f.write_str("uint"),
            Self::Ulid => f.write_str("ulid"),
            Self::Optional(inner) => write!(f, "{inner}?"),
            Self::Record(path) => f.write_str(path),
            Self::Tuple(components) => {
                f.write_str("(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{component}")?;
                }
                f.write_str(")")
            }
        }
    }
}
