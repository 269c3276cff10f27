use thiserror::Error;

use crate::ir::Kind;

/// Structural problems found while analyzing a schema.
///
/// These surface once per schema, on first use, and mean the schema itself
/// has to change. Each variant's message carries a stable fragment that
/// callers can match on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("unsupported type '{kind}' in field '{field}'")]
    UnsupportedKind { field: String, kind: &'static str },

    #[error("field '{field}': arrays cannot contain arrays")]
    NestedArray { field: String },

    #[error("field '{field}': array elements cannot be nullable or optional")]
    NullableArrayMember { field: String },

    #[error("field '{field}': all non-null members of a union must share the same primitive kind")]
    UnionKindMismatch { field: String },

    #[error("field '{field}': all array members within a union must share the same element kind")]
    UnionArrayMemberMismatch { field: String },

    #[error("field '{field}': union must have at least one non-null member")]
    EmptyUnion { field: String },

    #[error("field '{field}' cannot be both optional and nullable")]
    OptionalAndNullable { field: String },

    #[error("field '{field}' is optional or nullable and so cannot have a default value")]
    DefaultOnOptionalOrNullable { field: String },

    #[error("field '{field}': default value does not match kind '{kind}': {reason}")]
    DefaultMismatch {
        field: String,
        kind: Kind,
        reason: String,
    },
}

/// Request-time failure. Only reachable with field metadata that did not come
/// out of analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("unsupported field type '{kind}' in {field}")]
    UnsupportedKind { field: String, kind: Kind },
}

/// Failure to read a schema document.
#[derive(Debug, Error)]
#[error("at JSON path {path} → {source}")]
pub struct SchemaLoadError {
    pub path: String,
    #[source]
    pub source: serde_json::Error,
}
