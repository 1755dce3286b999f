use crate::{
    expr::{Expr, MemberRef},
    model::types::DataType,
};

///
/// FieldModel
/// Runtime field metadata for one record field.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldModel {
    /// Field name as used in selectors and index definitions.
    pub name: &'static str,
    pub ty: DataType,
}

impl FieldModel {
    #[must_use]
    pub const fn new(name: &'static str, ty: DataType) -> Self {
        Self { name, ty }
    }
}

///
/// RecordModel
/// Ordered field layout of a stored record type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordModel {
    /// Fully-qualified type path; also the record's type identity.
    pub path: &'static str,
    pub fields: Vec<FieldModel>,
}

impl RecordModel {
    #[must_use]
    pub const fn new(path: &'static str, fields: Vec<FieldModel>) -> Self {
        Self { path, fields }
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        DataType::Record(self.path)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Member handle for a named field, owned by this record type.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<MemberRef> {
        self.field(name)
            .map(|field| MemberRef::new(self.data_type(), field.name, field.ty.clone()))
    }

    /// The parameter node standing for one row of this record type.
    #[must_use]
    pub const fn parameter(&self, name: &'static str) -> Expr {
        Expr::parameter(name, self.data_type())
    }

    /// `parameter.field`, typed from the record layout.
    #[must_use]
    pub fn project(&self, parameter: &Expr, name: &str) -> Option<Expr> {
        self.member(name)
            .map(|member| Expr::member(parameter.clone(), member))
    }
}
