//! Core runtime for tuplekey: compound key descriptors, the selector
//! expression tree, key-selector recognition, and key expression synthesis.
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod expr;
pub mod key;
pub mod model;
pub mod obs;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum number of components a compound key tuple may declare.
///
/// Every positional accessor name must exist in `COMPONENT_ACCESSOR_NAMES`,
/// so this bounds both the descriptor and the accessor naming table.
pub const MAX_KEY_ARITY: usize = 8;

/// Positional accessor names, one per key component.
pub const COMPONENT_ACCESSOR_NAMES: [&str; MAX_KEY_ARITY] = [
    "item1", "item2", "item3", "item4", "item5", "item6", "item7", "item8",
];

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config loaders are re-exported here.
///

pub mod prelude {
    pub use crate::{
        expr::{Expr, FactoryRef, MemberRef},
        key::{
            FieldReference, KeyExprServices, ParsedKeySelector, SelectorMode, TupleKeyServices,
        },
        model::{
            index::IndexModel,
            record::{FieldModel, RecordModel},
            tuple::KeyTupleType,
            types::DataType,
        },
    };
}
