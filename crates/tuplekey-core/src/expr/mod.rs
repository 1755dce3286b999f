//! Selector expression tree.
//!
//! Pure, evaluation-free representation of the expressions a query or index
//! front end hands to key recognition, and of the fragments key synthesis
//! builds. Every node carries its static type; no node is ever rewritten in
//! place.


use crate::model::types::DataType;
use derive_more::Display;
use std::fmt;

///
/// ExprKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ExprKind {
    Parameter,
    MemberAccess,
    Conversion,
    Construct,
    FactoryCall,
}

///
/// MemberRef
///
/// A readable member on some owner type: a record field or a tuple
/// component accessor.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MemberRef {
    pub owner: DataType,
    pub name: &'static str,
    pub ty: DataType,
}

impl MemberRef {
    #[must_use]
    pub const fn new(owner: DataType, name: &'static str, ty: DataType) -> Self {
        Self { owner, name, ty }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

///
/// FactoryRef
///
/// Identity of a static factory method: declaring type plus method name.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FactoryRef {
    pub declaring_type: String,
    pub method: String,
}

impl FactoryRef {
    #[must_use]
    pub fn new(declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for FactoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.method)
    }
}

///
/// Expr
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    /// The row being projected.
    Parameter { name: &'static str, ty: DataType },

    /// Reads `member` off `base`.
    MemberAccess { base: Box<Self>, member: MemberRef },

    /// Type coercion wrapper inserted around `inner`.
    Conversion { inner: Box<Self>, target: DataType },

    /// Invokes the constructor of `ty`.
    Construct { ty: DataType, args: Vec<Self> },

    /// Invokes a named static factory returning `ty`.
    FactoryCall {
        factory: FactoryRef,
        args: Vec<Self>,
        ty: DataType,
    },
}

impl Expr {
    #[must_use]
    pub const fn parameter(name: &'static str, ty: DataType) -> Self {
        Self::Parameter { name, ty }
    }

    #[must_use]
    pub fn member(base: Self, member: MemberRef) -> Self {
        Self::MemberAccess {
            base: Box::new(base),
            member,
        }
    }

    #[must_use]
    pub fn convert(inner: Self, target: DataType) -> Self {
        Self::Conversion {
            inner: Box::new(inner),
            target,
        }
    }

    #[must_use]
    pub const fn construct(ty: DataType, args: Vec<Self>) -> Self {
        Self::Construct { ty, args }
    }

    #[must_use]
    pub const fn factory_call(factory: FactoryRef, args: Vec<Self>, ty: DataType) -> Self {
        Self::FactoryCall { factory, args, ty }
    }

    /// Static type of the value this node produces.
    #[must_use]
    pub const fn ty(&self) -> &DataType {
        match self {
            Self::Parameter { ty, .. }
            | Self::Construct { ty, .. }
            | Self::FactoryCall { ty, .. } => ty,
            Self::MemberAccess { member, .. } => &member.ty,
            Self::Conversion { target, .. } => target,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ExprKind {
        match self {
            Self::Parameter { .. } => ExprKind::Parameter,
            Self::MemberAccess { .. } => ExprKind::MemberAccess,
            Self::Conversion { .. } => ExprKind::Conversion,
            Self::Construct { .. } => ExprKind::Construct,
            Self::FactoryCall { .. } => ExprKind::FactoryCall,
        }
    }

    /// Strip one top-level conversion node, if any.
    ///
    /// Nested conversions below the first are left in place.
    #[must_use]
    pub fn skip_conversion(&self) -> &Self {
        match self {
            Self::Conversion { inner, .. } => inner,
            other => other,
        }
    }
}
