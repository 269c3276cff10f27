//! Schema shape analysis.
//!
//! Walk an [`ObjectSchema`] once, classify every field (kind, element kind,
//! nullable, optional, default) and reject shapes the coercer can't serve.
//! Union and array members get transient [`FieldInfo`] records that only
//! live for the duration of the walk.
//!
//! Rules enforced here:
//! - a field is never both nullable and optional;
//! - a field with a default is neither nullable nor optional;
//! - array elements are plain (not arrays, not nullable, not optional);
//! - non-null union members agree on one kind, and on one element kind
//!   when they are arrays.
pub mod arr;
pub mod defaults;
pub mod union;

use indexmap::IndexMap;

use crate::error::ShapeError;
use crate::ir::{FieldInfo, Kind, SchemaInfo};
use crate::schema::{Literal, NodeKind, ObjectSchema, SchemaNode};
use crate::value::FormObject;

/// Analyze `schema` without touching any cache.
pub fn analyze_schema(schema: &ObjectSchema) -> Result<SchemaInfo, ShapeError> {
    let mut fields = IndexMap::with_capacity(schema.len());
    for (name, node) in schema.properties() {
        let info = field_info(Some(name.as_str()), name, node, false)?;
        tracing::trace!(field = %name, kind = %info.kind, "analyzed field");
        fields.insert(name.clone(), info);
    }

    let default_object: FormObject = fields
        .iter()
        .filter_map(|(name, info)| info.absent_value().map(|v| (name.clone(), v)))
        .collect();

    Ok(SchemaInfo {
        field_names: fields.keys().cloned().collect(),
        fields,
        default_object,
    })
}

// ------------------------------ Field walk -------------------------------- //

/// Classify one node. `name` is `None` for array/union members; `field` is
/// always the declared field the node sits under, for error messages.
pub(crate) fn field_info(
    name: Option<&str>,
    field: &str,
    node: &SchemaNode,
    within_array: bool,
) -> Result<FieldInfo, ShapeError> {
    let mut member_kind = None;
    let mut is_nullable = false;
    let is_optional = node.optional;

    let kind = match &node.kind {
        NodeKind::String => Kind::String,
        NodeKind::Integer => Kind::Integer,
        NodeKind::Number => Kind::Number,
        NodeKind::Boolean => Kind::Boolean,
        NodeKind::Date => Kind::Date,
        NodeKind::BigInt => Kind::BigInt,
        NodeKind::Null => {
            is_nullable = true;
            Kind::Null
        }
        NodeKind::Literal { value } => literal_kind(value),
        NodeKind::Array { items } => {
            if within_array {
                return Err(ShapeError::NestedArray { field: field.to_owned() });
            }
            member_kind = Some(arr::member_kind(field, items)?);
            Kind::Array
        }
        NodeKind::Union { any_of } => {
            let shape = union::union_shape(field, any_of, within_array)?;
            is_nullable = shape.nullable;
            member_kind = shape.member_kind;
            shape.kind
        }
        other @ (NodeKind::Object { .. }
        | NodeKind::Tuple { .. }
        | NodeKind::Record { .. }
        | NodeKind::Symbol
        | NodeKind::Undefined) => {
            return Err(ShapeError::UnsupportedKind {
                field: field.to_owned(),
                kind: other.name(),
            });
        }
    };

    if is_nullable || is_optional {
        if node.default.is_some() {
            return Err(ShapeError::DefaultOnOptionalOrNullable { field: field.to_owned() });
        }
        if is_nullable && is_optional {
            return Err(ShapeError::OptionalAndNullable { field: field.to_owned() });
        }
    }

    let default_value = match &node.default {
        Some(raw) => Some(defaults::materialize(field, kind, member_kind, raw)?),
        None => None,
    };

    Ok(FieldInfo {
        name: name.map(str::to_owned),
        kind,
        member_kind,
        is_nullable,
        is_optional,
        default_value,
    })
}

fn literal_kind(value: &Literal) -> Kind {
    match value {
        Literal::String(_) => Kind::String,
        Literal::Number(_) => Kind::Number,
        Literal::Boolean(_) => Kind::Boolean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FormValue;
    use serde_json::json;

    fn info_of(node: SchemaNode) -> Result<FieldInfo, ShapeError> {
        field_info(Some("f"), "f", &node, false)
    }

    #[test]
    fn classifies_plain_fields() {
        let info = info_of(SchemaNode::integer().optional()).unwrap();
        assert_eq!(info.name.as_deref(), Some("f"));
        assert_eq!(info.kind, Kind::Integer);
        assert_eq!(info.member_kind, None);
        assert!(info.is_optional && !info.is_nullable && !info.has_default());
    }

    #[test]
    fn literals_take_their_value_kind() {
        assert_eq!(info_of(SchemaNode::literal("a")).unwrap().kind, Kind::String);
        assert_eq!(info_of(SchemaNode::literal(3)).unwrap().kind, Kind::Number);
        assert_eq!(info_of(SchemaNode::literal(true)).unwrap().kind, Kind::Boolean);
    }

    #[test]
    fn bare_null_is_nullable() {
        let info = info_of(SchemaNode::null()).unwrap();
        assert_eq!(info.kind, Kind::Null);
        assert!(info.is_nullable);
        assert_eq!(info.absent_value(), Some(FormValue::Null));
    }

    #[test]
    fn nested_objects_are_rejected_by_name() {
        let err = info_of(SchemaNode::object([("s", SchemaNode::string())])).unwrap_err();
        assert_eq!(
            err,
            ShapeError::UnsupportedKind { field: "f".into(), kind: "Object" },
        );
        assert!(err.to_string().contains("unsupported type 'Object'"));
    }

    #[test]
    fn default_checks_run_before_materializing() {
        // the default is the wrong type too, but the marker rule wins
        let node = SchemaNode::string().optional().with_default(json!(1));
        assert!(matches!(info_of(node), Err(ShapeError::DefaultOnOptionalOrNullable { .. })));
    }

    #[test]
    fn default_object_skips_fields_without_implicit_value() {
        let schema = ObjectSchema::new([
            ("name", SchemaNode::string().with_default("Jane")),
            ("nickname", SchemaNode::string().optional()),
            ("email", SchemaNode::union([SchemaNode::string(), SchemaNode::null()])),
            ("age", SchemaNode::number()),
        ]);
        let info = analyze_schema(&schema).unwrap();
        assert_eq!(info.field_names, ["name", "nickname", "email", "age"]);
        assert_eq!(info.default_object.len(), 2);
        assert_eq!(info.default_object["name"], FormValue::from("Jane"));
        assert_eq!(info.default_object["email"], FormValue::Null);
    }
}
