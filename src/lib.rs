//! Typed coercion of form submissions and query strings.
//!
//! Every submitted value is a string (or several, for repeated keys). Given
//! an [`ObjectSchema`], the analyzer classifies each field once and caches
//! the result by schema identity; the coercer then turns each submission into
//! a [`FormObject`] of typed [`FormValue`]s.
//!
//! ```
//! use form_shape::{analyze, coerce, FormData, FormValue, ObjectSchema, SchemaNode};
//!
//! let schema = ObjectSchema::new([
//!     ("name", SchemaNode::string()),
//!     ("age", SchemaNode::integer().optional()),
//!     ("agree", SchemaNode::boolean()),
//! ]);
//! let info = analyze(&schema).unwrap();
//! let form = FormData::from_urlencoded("name=Jane&agree=off");
//! let out = coerce(&form, &info).unwrap();
//!
//! assert_eq!(out["name"], FormValue::from("Jane"));
//! assert_eq!(out["agree"], FormValue::Boolean(false));
//! assert!(!out.contains_key("age"));
//! ```
pub mod analysis;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod error;
pub mod ir;
pub mod schema;
pub mod source;
pub mod value;

mod path_de;

pub use analysis::analyze_schema;
pub use cache::{analyze, reset_analysis_cache, SchemaCache};
pub use coerce::{coerce, coerce_with};
pub use config::{CoerceOptions, UncheckedBoolean};
pub use error::{CoerceError, SchemaLoadError, ShapeError};
pub use ir::{FieldInfo, Kind, SchemaInfo};
pub use schema::{Literal, NodeKind, ObjectSchema, SchemaId, SchemaNode};
pub use source::{Entry, FieldSource, FormData};
pub use value::{FormObject, FormValue};
