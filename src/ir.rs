// Analysis records. Built once per schema, read on every submission.

use std::fmt;

use indexmap::IndexMap;

use crate::value::{FormObject, FormValue};

/// Value kinds the coercer understands, plus the schema-level tags it
/// recognizes but never coerces into (`Null` folds into nullability, the
/// rest are rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    BigInt,
    Array,
    Null,
    Object,
    Symbol,
    Undefined,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Date => "Date",
            Kind::BigInt => "bigint",
            Kind::Array => "array",
            Kind::Null => "null",
            Kind::Object => "object",
            Kind::Symbol => "symbol",
            Kind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of one declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// `None` for the transient records built for array and union members.
    pub name: Option<String>,
    pub kind: Kind,
    /// Element kind, set only when `kind` is [`Kind::Array`].
    pub member_kind: Option<Kind>,
    pub is_nullable: bool,
    pub is_optional: bool,
    /// Declared default, already materialized for `kind`.
    pub default_value: Option<FormValue>,
}

impl FieldInfo {
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Value the field takes when nothing usable was submitted, `None` meaning
    /// "leave the key out".
    pub fn absent_value(&self) -> Option<FormValue> {
        match &self.default_value {
            Some(value) => Some(value.clone()),
            None if self.is_nullable => Some(FormValue::Null),
            None => None,
        }
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("[array member]")
    }
}

/// Analysis result for one schema.
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    /// Declaration order.
    pub field_names: Vec<String>,
    pub fields: IndexMap<String, FieldInfo>,
    /// What each field resolves to when entirely absent; fields with no
    /// implicit value are missing from the map.
    pub default_object: FormObject,
}

impl SchemaInfo {
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }
}
