mod selector;

use crate::{
    config::{FactorySignature, KeyInfoConfig},
    expr::{Expr, MemberRef},
    model::{
        tuple::{KeyTupleType, KeyTupleTypeError},
        types::DataType,
    },
    obs::{
        MetricsEvent, SynthesisKind,
        log::{log_debug, log_trace},
        sink::record,
    },
};
use thiserror::Error as ThisError;

// re-exports
pub use selector::{
    FieldReference, InvalidKeySelector, ParsedKeySelector, SelectorMode, SelectorShape,
    SelectorViolation,
};

///
/// KeyInfoError
///
/// Failures of the key services. All are caller-input validation failures
/// raised where the index or query was declared; none are transient.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyInfoError {
    #[error("type '{found}' is not a key tuple type")]
    NotATupleType { found: DataType },

    #[error("{0}")]
    Tuple(#[from] KeyTupleTypeError),

    #[error("key constructor expects {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("key component {position} expects type '{expected}', argument has type '{found}'")]
    ComponentTypeMismatch {
        position: usize,
        expected: DataType,
        found: DataType,
    },

    #[error("source type '{found}' does not match key type '{expected}'")]
    TypeMismatch { expected: DataType, found: DataType },

    #[error("key component index {index} is out of range for arity {arity}")]
    IndexOutOfRange { index: usize, arity: usize },

    #[error(transparent)]
    InvalidKeySelector(#[from] InvalidKeySelector),
}

///
/// KeyExprServices
///
/// Expression services for one compound key type: arity, key construction,
/// component reads, and key-selector recognition.
///

pub trait KeyExprServices {
    /// Static type of key values.
    fn key_type(&self) -> &DataType;

    /// Number of key components.
    fn arity(&self) -> usize;

    fn component_type(&self, index: usize) -> Option<&DataType>;

    /// Build an expression constructing a key from one typed argument per
    /// component. Argument types must match component types exactly.
    fn build_constructor(&self, args: Vec<Expr>) -> Result<Expr, KeyInfoError>;

    /// Build an expression reading component `index` off a key-typed source.
    fn build_accessor(&self, source: Expr, index: usize) -> Result<Expr, KeyInfoError>;

    /// Recognize a key selector and extract its ordered source fields.
    fn parse(
        &self,
        selector: &Expr,
        mode: SelectorMode,
    ) -> Result<ParsedKeySelector, InvalidKeySelector>;

    /// Same recognition as `parse`, reporting rejection as `None`.
    fn try_parse(&self, selector: &Expr, mode: SelectorMode) -> Option<ParsedKeySelector> {
        self.parse(selector, mode).ok()
    }
}

///
/// TupleKeyServices
///
/// Key services for a declared key tuple type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TupleKeyServices {
    tuple: KeyTupleType,
    factory: FactorySignature,
}

impl TupleKeyServices {
    /// Services for `ty` under the default configuration.
    pub fn new(ty: &DataType) -> Result<Self, KeyInfoError> {
        Self::with_config(ty, &KeyInfoConfig::default())
    }

    pub fn with_config(ty: &DataType, config: &KeyInfoConfig) -> Result<Self, KeyInfoError> {
        let Some(components) = ty.tuple_components() else {
            return Err(KeyInfoError::NotATupleType { found: ty.clone() });
        };
        let tuple = KeyTupleType::with_max_arity(components.to_vec(), config.max_arity)?;

        Ok(Self {
            tuple,
            factory: config.tuple_factory.clone(),
        })
    }

    fn check_constructor_args(&self, args: &[Expr]) -> Result<(), KeyInfoError> {
        let params = &self.tuple.constructor().params;

        if args.len() != params.len() {
            return Err(KeyInfoError::ArityMismatch {
                expected: params.len(),
                found: args.len(),
            });
        }

        for (position, (arg, expected)) in args.iter().zip(params).enumerate() {
            if arg.ty() != expected {
                return Err(KeyInfoError::ComponentTypeMismatch {
                    position,
                    expected: expected.clone(),
                    found: arg.ty().clone(),
                });
            }
        }

        Ok(())
    }

    fn accessor_member(&self, source: &Expr, index: usize) -> Result<MemberRef, KeyInfoError> {
        if source.ty() != self.key_type() {
            return Err(KeyInfoError::TypeMismatch {
                expected: self.key_type().clone(),
                found: source.ty().clone(),
            });
        }

        let accessor = self
            .tuple
            .accessor(index)
            .ok_or(KeyInfoError::IndexOutOfRange {
                index,
                arity: self.arity(),
            })?;

        Ok(MemberRef::new(
            self.key_type().clone(),
            accessor.name,
            accessor.ty.clone(),
        ))
    }

    fn recognize(
        &self,
        selector: &Expr,
        mode: SelectorMode,
    ) -> Result<ParsedKeySelector, SelectorViolation> {
        let (shape, parsed) = selector::recognize(&self.tuple, &self.factory, selector, mode)?;

        record(MetricsEvent::SelectorAccepted { shape, mode });
        log_trace!(
            component = "selector",
            event = "selector_accepted",
            shape = ?shape,
            mode = ?mode,
            fields = %parsed,
        );

        Ok(parsed)
    }

    fn record_synthesis(&self, kind: SynthesisKind, result: &Result<Expr, KeyInfoError>) {
        match result {
            Ok(expr) => {
                record(MetricsEvent::Synthesized { kind });
                log_trace!(
                    component = "synthesis",
                    event = "synthesized",
                    kind = ?kind,
                    key_type = %self.key_type(),
                    node = ?expr.kind(),
                );
            }
            Err(err) => {
                record(MetricsEvent::SynthesisRejected { kind });
                log_debug!(
                    component = "synthesis",
                    event = "synthesis_rejected",
                    kind = ?kind,
                    key_type = %self.key_type(),
                    error = %err,
                );
            }
        }
    }
}

impl KeyExprServices for TupleKeyServices {
    fn key_type(&self) -> &DataType {
        self.tuple.data_type()
    }

    fn arity(&self) -> usize {
        self.tuple.accessors().len()
    }

    fn component_type(&self, index: usize) -> Option<&DataType> {
        self.tuple.component_types().get(index)
    }

    fn build_constructor(&self, args: Vec<Expr>) -> Result<Expr, KeyInfoError> {
        let result = self
            .check_constructor_args(&args)
            .map(|()| Expr::construct(self.key_type().clone(), args));
        self.record_synthesis(SynthesisKind::Constructor, &result);

        result
    }

    fn build_accessor(&self, source: Expr, index: usize) -> Result<Expr, KeyInfoError> {
        let result = self
            .accessor_member(&source, index)
            .map(|member| Expr::member(source, member));
        self.record_synthesis(SynthesisKind::Accessor, &result);

        result
    }

    fn parse(
        &self,
        selector: &Expr,
        mode: SelectorMode,
    ) -> Result<ParsedKeySelector, InvalidKeySelector> {
        self.recognize(selector, mode).map_err(|violation| {
            record(MetricsEvent::SelectorRejected { mode });
            log_debug!(
                component = "selector",
                event = "selector_rejected",
                mode = ?mode,
                key_type = %self.key_type(),
                violation = %violation,
            );

            InvalidKeySelector::new(violation)
        })
    }

    // Misses are counted apart from rejections and only traced.
    fn try_parse(&self, selector: &Expr, mode: SelectorMode) -> Option<ParsedKeySelector> {
        match self.recognize(selector, mode) {
            Ok(parsed) => Some(parsed),
            Err(violation) => {
                record(MetricsEvent::SelectorUnmatched { mode });
                log_trace!(
                    component = "selector",
                    event = "selector_unmatched",
                    mode = ?mode,
                    key_type = %self.key_type(),
                    violation = %violation,
                );

                None
            }
        }
    }
}
