use crate::error::ShapeError;
use crate::ir::Kind;
use crate::schema::SchemaNode;

/// Element kind of an array field. Elements must be plain: not arrays
/// themselves, not nullable, not optional.
pub(super) fn member_kind(field: &str, items: &SchemaNode) -> Result<Kind, ShapeError> {
    let member = super::field_info(None, field, items, true)?;
    if member.is_nullable || member.is_optional {
        return Err(ShapeError::NullableArrayMember { field: field.to_owned() });
    }
    Ok(member.kind)
}
