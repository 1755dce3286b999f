//! Module: key::selector
//! Responsibility: recognize key-selector expressions and extract the ordered
//! source fields of a compound key.
//! Does not own: metrics/logging (see `key`), index storage of the result.

use crate::{
    config::FactorySignature,
    expr::{Expr, ExprKind, FactoryRef, MemberRef},
    model::{tuple::KeyTupleType, types::DataType},
};
use derive_more::Deref;
use std::fmt;
use thiserror::Error as ThisError;

///
/// SelectorMode
///
/// Strict selectors must read fields directly. Lenient selectors may wrap a
/// field read in one conversion node, as typed query builders do when they
/// coerce a field to the key component type.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SelectorMode {
    Strict,
    Lenient,
}

impl SelectorMode {
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

///
/// SelectorShape
///
/// Which of the two accepted selector forms was recognized.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectorShape {
    DirectConstruct,
    FactoryCall,
}

///
/// FieldReference
///
/// Resolved handle to the record field feeding one key component.
/// Only produced by selector recognition.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldReference {
    member: MemberRef,
}

impl FieldReference {
    pub(crate) const fn from_member(member: MemberRef) -> Self {
        Self { member }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.member.name
    }

    /// Record type the field is declared on.
    #[must_use]
    pub const fn owner(&self) -> &DataType {
        &self.member.owner
    }

    #[must_use]
    pub const fn ty(&self) -> &DataType {
        &self.member.ty
    }

    #[must_use]
    pub const fn member(&self) -> &MemberRef {
        &self.member
    }
}

impl fmt::Display for FieldReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.member)
    }
}

///
/// ParsedKeySelector
///
/// Ordered source fields of a compound key; position `i` feeds component `i`.
/// Fields may repeat and need not follow record declaration order.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct ParsedKeySelector(Vec<FieldReference>);

impl ParsedKeySelector {
    #[must_use]
    pub fn fields(&self) -> &[FieldReference] {
        &self.0
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(FieldReference::name).collect()
    }
}

impl fmt::Display for ParsedKeySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.names().join(", "))
    }
}

///
/// SelectorViolation
///
/// First rule a rejected selector broke. Arguments are checked left to
/// right, so `position` is always the leftmost offending argument.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SelectorViolation {
    #[error("selector type '{found}' does not match key type '{expected}'")]
    TypeMismatch { expected: DataType, found: DataType },

    #[error("selector passes {found} arguments but the key has {expected} components")]
    ArityMismatch { expected: usize, found: usize },

    #[error("selector must construct the key or call the tuple factory, found {kind}")]
    UnsupportedExpressionShape { kind: ExprKind },

    #[error("'{factory}' is not the tuple factory")]
    UnsupportedFactory { factory: FactoryRef },

    #[error("argument {position} is a {kind}, not a member access")]
    ArgumentNotAMemberAccess { position: usize, kind: ExprKind },

    #[error("argument {position} reads '{member}' off a {base}, not directly off the parameter")]
    NonDirectFieldAccess {
        position: usize,
        member: &'static str,
        base: ExprKind,
    },

    #[error("argument {position} has type '{found}', key component expects '{expected}'")]
    ArgumentTypeMismatch {
        position: usize,
        expected: DataType,
        found: DataType,
    },
}

impl SelectorViolation {
    /// Argument position the violation points at, for per-argument rules.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::ArgumentNotAMemberAccess { position, .. }
            | Self::NonDirectFieldAccess { position, .. }
            | Self::ArgumentTypeMismatch { position, .. } => Some(*position),
            _ => None,
        }
    }
}

///
/// InvalidKeySelector
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("invalid key selector: {violation}")]
pub struct InvalidKeySelector {
    pub violation: SelectorViolation,
}

impl InvalidKeySelector {
    #[must_use]
    pub const fn new(violation: SelectorViolation) -> Self {
        Self { violation }
    }
}

/// Recognize `selector` as a key selector for `tuple`.
///
/// Both the throwing and the optional parse forms are thin wrappers over
/// this function.
pub(crate) fn recognize(
    tuple: &KeyTupleType,
    factory: &FactorySignature,
    selector: &Expr,
    mode: SelectorMode,
) -> Result<(SelectorShape, ParsedKeySelector), SelectorViolation> {
    if selector.ty() != tuple.data_type() {
        return Err(SelectorViolation::TypeMismatch {
            expected: tuple.data_type().clone(),
            found: selector.ty().clone(),
        });
    }

    let (shape, args) = match selector {
        Expr::Construct { args, .. } => (SelectorShape::DirectConstruct, args),
        Expr::FactoryCall {
            factory: called,
            args,
            ..
        } => {
            if !factory.matches(called) {
                return Err(SelectorViolation::UnsupportedFactory {
                    factory: called.clone(),
                });
            }

            (SelectorShape::FactoryCall, args)
        }
        other => {
            return Err(SelectorViolation::UnsupportedExpressionShape { kind: other.kind() });
        }
    };

    let arity = tuple.accessors().len();
    if args.len() != arity {
        return Err(SelectorViolation::ArityMismatch {
            expected: arity,
            found: args.len(),
        });
    }

    let fields = args
        .iter()
        .zip(tuple.component_types())
        .enumerate()
        .map(|(position, (arg, expected))| field_from_argument(position, arg, expected, mode))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((shape, ParsedKeySelector(fields)))
}

// A key argument must be `parameter.field`, optionally under one conversion
// in lenient mode, and its outermost type must be the component type.
fn field_from_argument(
    position: usize,
    arg: &Expr,
    expected: &DataType,
    mode: SelectorMode,
) -> Result<FieldReference, SelectorViolation> {
    let read = match mode {
        SelectorMode::Strict => arg,
        SelectorMode::Lenient => arg.skip_conversion(),
    };

    let Expr::MemberAccess { base, member } = read else {
        return Err(SelectorViolation::ArgumentNotAMemberAccess {
            position,
            kind: read.kind(),
        });
    };

    if !matches!(**base, Expr::Parameter { .. }) {
        return Err(SelectorViolation::NonDirectFieldAccess {
            position,
            member: member.name,
            base: base.kind(),
        });
    }

    if arg.ty() != expected {
        return Err(SelectorViolation::ArgumentTypeMismatch {
            position,
            expected: expected.clone(),
            found: arg.ty().clone(),
        });
    }

    Ok(FieldReference::from_member(member.clone()))
}
