use crate::error::ShapeError;
use crate::ir::Kind;
use crate::schema::SchemaNode;

/// What a union collapses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionShape {
    pub kind: Kind,
    pub nullable: bool,
    /// Shared element kind when the non-null members are arrays.
    pub member_kind: Option<Kind>,
}

/// Collapse the members of a union. Null members (including nested unions
/// that contain null) only contribute nullability; all others must agree.
pub(super) fn union_shape(
    field: &str,
    any_of: &[SchemaNode],
    within_array: bool,
) -> Result<UnionShape, ShapeError> {
    let mut kind: Option<Kind> = None;
    let mut nullable = false;
    let mut member_kind: Option<Kind> = None;

    for member in any_of {
        let info = super::field_info(None, field, member, within_array)?;
        if info.is_nullable {
            nullable = true;
            continue;
        }

        match kind {
            None => kind = Some(info.kind),
            Some(k) if k != info.kind => {
                // inside an array the union *is* the element type
                return Err(if within_array {
                    ShapeError::UnionArrayMemberMismatch { field: field.to_owned() }
                } else {
                    ShapeError::UnionKindMismatch { field: field.to_owned() }
                });
            }
            Some(_) => {}
        }

        if info.kind == Kind::Array {
            match member_kind {
                None => member_kind = info.member_kind,
                Some(mk) if Some(mk) != info.member_kind => {
                    return Err(ShapeError::UnionArrayMemberMismatch { field: field.to_owned() });
                }
                Some(_) => {}
            }
        }
    }

    let kind = kind.ok_or_else(|| ShapeError::EmptyUnion { field: field.to_owned() })?;
    Ok(UnionShape { kind, nullable, member_kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(xs: &[&str]) -> SchemaNode {
        SchemaNode::union(xs.iter().map(|x| SchemaNode::literal(*x)))
    }

    #[test]
    fn null_member_sets_nullable() {
        let shape = union_shape("f", &[SchemaNode::string(), SchemaNode::null()], false).unwrap();
        assert_eq!(shape, UnionShape { kind: Kind::String, nullable: true, member_kind: None });
    }

    #[test]
    fn nested_union_with_null_makes_outer_nullable() {
        let inner = SchemaNode::union([SchemaNode::literal("foo"), SchemaNode::null()]);
        let shape = union_shape("f", &[inner, lits(&["boo", "baz"])], false).unwrap();
        assert!(shape.nullable);
        assert_eq!(shape.kind, Kind::String);
    }

    #[test]
    fn arrays_of_compatible_members_agree() {
        let any_of = [
            SchemaNode::array(lits(&["foo", "bar"])),
            SchemaNode::array(lits(&["boo", "baz"])),
            SchemaNode::null(),
        ];
        let shape = union_shape("f", &any_of, false).unwrap();
        assert_eq!(
            shape,
            UnionShape { kind: Kind::Array, nullable: true, member_kind: Some(Kind::String) },
        );
    }

    #[test]
    fn mismatched_kinds_fail() {
        let err = union_shape("f", &[SchemaNode::string(), SchemaNode::number()], false).unwrap_err();
        assert_eq!(err, ShapeError::UnionKindMismatch { field: "f".into() });
    }

    #[test]
    fn mismatched_element_kinds_fail() {
        let any_of = [
            SchemaNode::array(SchemaNode::string()),
            SchemaNode::array(SchemaNode::number()),
        ];
        let err = union_shape("f", &any_of, false).unwrap_err();
        assert_eq!(err, ShapeError::UnionArrayMemberMismatch { field: "f".into() });
    }

    #[test]
    fn only_null_is_empty() {
        let err = union_shape("f", &[SchemaNode::null()], false).unwrap_err();
        assert_eq!(err, ShapeError::EmptyUnion { field: "f".into() });
    }
}
