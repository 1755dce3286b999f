//! Test-only evaluator for synthesized key expressions.
//!
//! The library never evaluates expressions; this exists so tests can check
//! that synthesized constructors and accessors agree at runtime.

use crate::{expr::Expr, model::types::DataType};
use std::collections::BTreeMap;

///
/// Value
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float64(f64),
    Int32(i32),
    Int(i64),
    Record(BTreeMap<&'static str, Self>),
    Text(String),
    Tuple(Vec<Self>),
    Uint(u64),
    Ulid(u128),
}

/// Evaluate `expr`, binding every parameter node to `row`.
pub(crate) fn eval(expr: &Expr, row: &Value) -> Result<Value, String> {
    match expr {
        Expr::Parameter { .. } => Ok(row.clone()),
        Expr::MemberAccess { base, member } => match eval(base, row)? {
            Value::Record(fields) => fields
                .get(member.name)
                .cloned()
                .ok_or_else(|| format!("record has no field '{}'", member.name)),
            Value::Tuple(items) => {
                let index = member
                    .name
                    .strip_prefix("item")
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .ok_or_else(|| format!("'{}' is not a component accessor", member.name))?;

                items
                    .get(index)
                    .cloned()
                    .ok_or_else(|| format!("tuple has no component {index}"))
            }
            other => Err(format!("cannot read '{}' off {other:?}", member.name)),
        },
        Expr::Conversion { inner, target } => convert(eval(inner, row)?, target),
        Expr::Construct { args, .. } | Expr::FactoryCall { args, .. } => args
            .iter()
            .map(|arg| eval(arg, row))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Tuple),
    }
}

fn convert(value: Value, target: &DataType) -> Result<Value, String> {
    match (value, target) {
        (Value::Int32(v), DataType::Int) => Ok(Value::Int(i64::from(v))),
        (value, DataType::Optional(_)) => Ok(value),
        (value, target) => Err(format!("no conversion from {value:?} to {target}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::{field, nested_city};

    fn person_row() -> Value {
        Value::Record(BTreeMap::from([
            ("name", Value::Text("ada".to_string())),
            ("age", Value::Int32(36)),
            (
                "address",
                Value::Record(BTreeMap::from([("city", Value::Text("London".to_string()))])),
            ),
        ]))
    }

    #[test]
    fn evaluates_member_paths_and_conversions() {
        let row = person_row();

        assert_eq!(
            eval(&field("name"), &row),
            Ok(Value::Text("ada".to_string()))
        );
        assert_eq!(
            eval(&nested_city(), &row),
            Ok(Value::Text("London".to_string()))
        );
        assert_eq!(
            eval(&Expr::convert(field("age"), DataType::Int), &row),
            Ok(Value::Int(36))
        );
        assert_eq!(
            eval(&Expr::convert(field("name"), DataType::optional(DataType::Text)), &row),
            Ok(Value::Text("ada".to_string()))
        );
        assert!(eval(&Expr::convert(field("name"), DataType::Int), &row).is_err());
    }
}
