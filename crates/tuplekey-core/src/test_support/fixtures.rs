use crate::{
    expr::{Expr, FactoryRef},
    key::TupleKeyServices,
    model::{
        record::{FieldModel, RecordModel},
        types::DataType,
    },
};

pub(crate) const PERSON: &str = "test_fixtures::Person";
pub(crate) const ADDRESS: &str = "test_fixtures::Address";

/// Person record: scalar fields plus a nested address record.
pub(crate) fn person() -> RecordModel {
    RecordModel::new(
        PERSON,
        vec![
            FieldModel::new("id", DataType::Uint),
            FieldModel::new("name", DataType::Text),
            FieldModel::new("age", DataType::Int32),
            FieldModel::new("score", DataType::Int),
            FieldModel::new("nickname", DataType::optional(DataType::Text)),
            FieldModel::new("address", DataType::Record(ADDRESS)),
        ],
    )
}

pub(crate) fn address() -> RecordModel {
    RecordModel::new(ADDRESS, vec![FieldModel::new("city", DataType::Text)])
}

/// The row parameter `p` of type Person.
pub(crate) fn row() -> Expr {
    person().parameter("p")
}

/// `p.<name>` off the Person parameter.
pub(crate) fn field(name: &str) -> Expr {
    person()
        .project(&row(), name)
        .unwrap_or_else(|| panic!("unknown Person field '{name}'"))
}

/// `p.address.city`: a two-hop member path.
pub(crate) fn nested_city() -> Expr {
    address()
        .project(&field("address"), "city")
        .expect("Address.city exists")
}

pub(crate) fn key_type(components: &[DataType]) -> DataType {
    DataType::Tuple(components.to_vec())
}

pub(crate) fn services(components: &[DataType]) -> TupleKeyServices {
    TupleKeyServices::new(&key_type(components)).expect("tuple key type")
}

/// `KeyTuple::create(args...)` typed as the tuple of `components`.
pub(crate) fn tuple_create(components: &[DataType], args: Vec<Expr>) -> Expr {
    Expr::factory_call(
        FactoryRef::new("KeyTuple", "create"),
        args,
        key_type(components),
    )
}
