use crate::{
    error::InternalError,
    expr::Expr,
    key::{FieldReference, KeyExprServices, ParsedKeySelector, SelectorMode},
    model::types::DataType,
    obs::{MetricsEvent, log::log_debug, sink::record},
};
use std::fmt::{self, Display};

///
/// IndexModel
/// Runtime descriptor for a compound-key index: the key type and the
/// ordered source fields extracted from its key selector.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexModel {
    pub name: &'static str,
    pub key_type: DataType,
    pub key: ParsedKeySelector,
    pub unique: bool,
}

impl IndexModel {
    /// Define an index from a key selector.
    ///
    /// Strict recognition is tried first; selectors that only pass once a
    /// top-level conversion is stripped are accepted leniently.
    pub fn define<S>(
        name: &'static str,
        services: &S,
        selector: &Expr,
        unique: bool,
    ) -> Result<Self, InternalError>
    where
        S: KeyExprServices + ?Sized,
    {
        let (key, mode) = match services.try_parse(selector, SelectorMode::Strict) {
            Some(key) => (key, SelectorMode::Strict),
            None => (
                services.parse(selector, SelectorMode::Lenient)?,
                SelectorMode::Lenient,
            ),
        };

        record(MetricsEvent::IndexDefined { mode });
        log_debug!(
            component = "index",
            event = "index_defined",
            index = name,
            mode = ?mode,
            fields = %key,
        );

        Ok(Self {
            name,
            key_type: services.key_type().clone(),
            key,
            unique,
        })
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldReference] {
        self.key.fields()
    }

    #[must_use]
    /// Whether this index's field prefix matches the start of another index.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.key.len() < other.key.len() && other.fields().starts_with(self.fields())
    }

    /// Build the key-construction expression for `row`, reading each stored
    /// field off it. Fields whose type differs from their key component are
    /// wrapped in a conversion to the component type.
    pub fn key_factory<S>(&self, services: &S, row: &Expr) -> Result<Expr, InternalError>
    where
        S: KeyExprServices + ?Sized,
    {
        self.check_services(services)?;

        let mut args = Vec::with_capacity(self.key.len());
        for (i, field) in self.fields().iter().enumerate() {
            if row.ty() != field.owner() {
                return Err(InternalError::key_invariant(format!(
                    "index '{}' reads '{field}' but the row has type '{}'",
                    self.name,
                    row.ty()
                )));
            }

            let read = Expr::member(row.clone(), field.member().clone());
            let arg = match services.component_type(i) {
                Some(component) if component != field.ty() => {
                    Expr::convert(read, component.clone())
                }
                _ => read,
            };
            args.push(arg);
        }

        Ok(services.build_constructor(args)?)
    }

    /// Build an expression reading key component `index` off `key`.
    pub fn component_reader<S>(
        &self,
        services: &S,
        key: Expr,
        index: usize,
    ) -> Result<Expr, InternalError>
    where
        S: KeyExprServices + ?Sized,
    {
        self.check_services(services)?;

        Ok(services.build_accessor(key, index)?)
    }

    fn check_services<S>(&self, services: &S) -> Result<(), InternalError>
    where
        S: KeyExprServices + ?Sized,
    {
        if services.key_type() != &self.key_type {
            return Err(InternalError::key_invariant(format!(
                "index '{}' was defined for key type '{}', services declare '{}'",
                self.name,
                self.key_type,
                services.key_type()
            )));
        }

        Ok(())
    }
}

impl Display for IndexModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.key.names().join(", ");

        if self.unique {
            write!(f, "UNIQUE {}({})", self.name, fields)
        } else {
            write!(f, "{}({})", self.name, fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ErrorClass, ErrorOrigin},
        key::{KeyInfoError, SelectorViolation},
        obs::{metrics_report, metrics_reset_all},
        test_support::{
            eval::{Value, eval},
            fixtures::{field, key_type, nested_city, row, services, tuple_create},
        },
    };
    use std::collections::BTreeMap;

    const NAME_SCORE: [DataType; 2] = [DataType::Text, DataType::Int];

    fn by_name() -> IndexModel {
        let services = services(&[DataType::Text]);
        let selector = Expr::construct(key_type(&[DataType::Text]), vec![field("name")]);

        IndexModel::define("by_name", &services, &selector, false).expect("index")
    }

    #[test]
    fn define_prefers_strict_recognition() {
        metrics_reset_all();
        let services = services(&NAME_SCORE);
        let selector = tuple_create(&NAME_SCORE, vec![field("name"), field("score")]);

        let index = IndexModel::define("by_name_score", &services, &selector, true).unwrap();

        assert_eq!(index.key.names(), vec!["name", "score"]);
        assert_eq!(index.to_string(), "UNIQUE by_name_score(name, score)");
        assert_eq!(metrics_report().ops.indexes_strict, 1);
        assert_eq!(metrics_report().ops.lenient_parses, 0);
    }

    #[test]
    fn define_falls_back_to_lenient_recognition() {
        metrics_reset_all();
        let services = services(&NAME_SCORE);
        let selector = Expr::construct(
            key_type(&NAME_SCORE),
            vec![field("name"), Expr::convert(field("age"), DataType::Int)],
        );

        let index = IndexModel::define("by_name_age", &services, &selector, false).unwrap();

        assert_eq!(index.key.names(), vec!["name", "age"]);
        assert_eq!(index.to_string(), "by_name_age(name, age)");

        let ops = metrics_report().ops;
        assert_eq!(ops.indexes_lenient, 1);
        assert_eq!(ops.strict_parses, 1);
        assert_eq!(ops.lenient_parses, 1);
        assert_eq!(ops.selectors_unmatched, 1);
        assert_eq!(ops.selectors_rejected, 0);
    }

    #[test]
    fn define_reports_lenient_violation() {
        let services = services(&NAME_SCORE);
        let selector = Expr::construct(key_type(&NAME_SCORE), vec![field("name"), nested_city()]);

        let err = IndexModel::define("bad", &services, &selector, false).unwrap_err();

        assert_eq!(err.class, ErrorClass::Unsupported);
        assert_eq!(err.origin, ErrorOrigin::Selector);
        match err.key_detail() {
            Some(KeyInfoError::InvalidKeySelector(inner)) => {
                assert!(matches!(
                    inner.violation,
                    SelectorViolation::NonDirectFieldAccess { position: 1, .. }
                ));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn prefix_relation_compares_field_lists() {
        let services = services(&NAME_SCORE);
        let wide = IndexModel::define(
            "by_name_score",
            &services,
            &Expr::construct(key_type(&NAME_SCORE), vec![field("name"), field("score")]),
            false,
        )
        .unwrap();
        let narrow = by_name();

        assert!(narrow.is_prefix_of(&wide));
        assert!(!wide.is_prefix_of(&narrow));
        assert!(!narrow.is_prefix_of(&narrow));
    }

    #[test]
    fn key_factory_converts_mismatched_fields() {
        let services = services(&NAME_SCORE);
        let selector = Expr::construct(
            key_type(&NAME_SCORE),
            vec![field("name"), Expr::convert(field("age"), DataType::Int)],
        );
        let index = IndexModel::define("by_name_age", &services, &selector, false).unwrap();

        let key = index.key_factory(&services, &row()).unwrap();
        let age = index.component_reader(&services, key.clone(), 1).unwrap();
        let row_value = Value::Record(BTreeMap::from([
            ("name", Value::Text("ada".to_string())),
            ("age", Value::Int32(36)),
        ]));

        assert_eq!(
            eval(&key, &row_value),
            Ok(Value::Tuple(vec![Value::Text("ada".to_string()), Value::Int(36)]))
        );
        assert_eq!(eval(&age, &row_value), Ok(Value::Int(36)));
    }

    #[test]
    fn key_factory_rejects_foreign_services_and_rows() {
        let index = by_name();
        let other = services(&[DataType::Uint]);

        let err = index.key_factory(&other, &row()).unwrap_err();
        assert_eq!(err.class, ErrorClass::InvariantViolation);
        assert_eq!(err.origin, ErrorOrigin::Key);

        let services = services(&[DataType::Text]);
        let wrong_row = Expr::parameter("a", DataType::Record("test_fixtures::Address"));
        let err = index.key_factory(&services, &wrong_row).unwrap_err();
        assert!(err.message.contains("test_fixtures::Address"));
    }

    #[test]
    fn component_reader_surfaces_synthesis_errors() {
        let index = by_name();
        let services = services(&[DataType::Text]);
        let key = index.key_factory(&services, &row()).unwrap();

        let err = index.component_reader(&services, key, 1).unwrap_err();
        assert!(matches!(
            err.key_detail(),
            Some(KeyInfoError::IndexOutOfRange { index: 1, arity: 1 })
        ));
    }

    #[test]
    fn define_works_through_trait_objects() {
        let services = services(&[DataType::Text]);
        let dyn_services: &dyn KeyExprServices = &services;
        let selector = Expr::construct(key_type(&[DataType::Text]), vec![field("name")]);

        let index = IndexModel::define("by_name", dyn_services, &selector, false).unwrap();
        assert_eq!(index, by_name());
    }
}
