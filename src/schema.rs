//! Declarative object schemas.
//!
//! A schema is a flat map of named fields, each described by a [`SchemaNode`].
//! Nodes form a closed set of kinds; arrays and unions nest further nodes.
//! Each [`ObjectSchema`] carries a [`SchemaId`] handed out at construction so
//! analysis results can be cached by identity instead of by content.

use std::sync::atomic::{AtomicU64, Ordering};

use std::fmt;

use indexmap::IndexMap;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaLoadError;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Identity handle of an [`ObjectSchema`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

impl SchemaId {
    fn fresh() -> Self {
        SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NODES
// ————————————————————————————————————————————————————————————————————————————

/// One node of a schema: a kind plus the optional/default markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeDoc")]
pub struct SchemaNode {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    BigInt,
    Null,
    Literal {
        #[serde(rename = "const")]
        value: Literal,
    },
    Array {
        items: Box<SchemaNode>,
    },
    Union {
        #[serde(rename = "anyOf")]
        any_of: Vec<SchemaNode>,
    },
    Object {
        properties: IndexMap<String, SchemaNode>,
    },
    Tuple {
        items: Vec<SchemaNode>,
    },
    Record {
        values: Box<SchemaNode>,
    },
    Symbol,
    Undefined,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::String => "String",
            NodeKind::Integer => "Integer",
            NodeKind::Number => "Number",
            NodeKind::Boolean => "Boolean",
            NodeKind::Date => "Date",
            NodeKind::BigInt => "BigInt",
            NodeKind::Null => "Null",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Array { .. } => "Array",
            NodeKind::Union { .. } => "Union",
            NodeKind::Object { .. } => "Object",
            NodeKind::Tuple { .. } => "Tuple",
            NodeKind::Record { .. } => "Record",
            NodeKind::Symbol => "Symbol",
            NodeKind::Undefined => "Undefined",
        }
    }
}

/// Constant value of a literal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        SchemaNode { kind, optional: false, default: None }
    }

    pub fn string() -> Self {
        Self::new(NodeKind::String)
    }

    pub fn integer() -> Self {
        Self::new(NodeKind::Integer)
    }

    pub fn number() -> Self {
        Self::new(NodeKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(NodeKind::Boolean)
    }

    pub fn date() -> Self {
        Self::new(NodeKind::Date)
    }

    pub fn bigint() -> Self {
        Self::new(NodeKind::BigInt)
    }

    pub fn null() -> Self {
        Self::new(NodeKind::Null)
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::new(NodeKind::Literal { value: value.into() })
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::new(NodeKind::Array { items: Box::new(items) })
    }

    pub fn union(any_of: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::new(NodeKind::Union { any_of: any_of.into_iter().collect() })
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, SchemaNode)>) -> Self {
        let properties = properties.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(NodeKind::Object { properties })
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_owned())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(n as f64)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

// Nodes are read through a plain struct so every nested key stays on the
// JSON path reported by `path_de`.
#[derive(Deserialize)]
struct NodeDoc {
    kind: NodeTag,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    items: Option<Items>,
    #[serde(default, rename = "anyOf")]
    any_of: Option<Vec<SchemaNode>>,
    #[serde(default, rename = "const")]
    value: Option<Literal>,
    #[serde(default)]
    properties: Option<IndexMap<String, SchemaNode>>,
    #[serde(default)]
    values: Option<Box<SchemaNode>>,
}

#[derive(Deserialize)]
enum NodeTag {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    BigInt,
    Null,
    Literal,
    Array,
    Union,
    Object,
    Tuple,
    Record,
    Symbol,
    Undefined,
}

/// `items` is one node for `Array` and a list for `Tuple`.
enum Items {
    One(Box<SchemaNode>),
    Many(Vec<SchemaNode>),
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct ItemsVisitor;

        impl<'de> Visitor<'de> for ItemsVisitor {
            type Value = Items;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a schema node or a list of schema nodes")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Items, A::Error> {
                SchemaNode::deserialize(MapAccessDeserializer::new(map)).map(|node| Items::One(Box::new(node)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Items, A::Error> {
                Vec::deserialize(SeqAccessDeserializer::new(seq)).map(Items::Many)
            }
        }

        de.deserialize_any(ItemsVisitor)
    }
}

impl TryFrom<NodeDoc> for SchemaNode {
    type Error = String;

    fn try_from(doc: NodeDoc) -> Result<Self, String> {
        let missing = |key: &str| format!("missing field `{key}`");
        let kind = match doc.kind {
            NodeTag::String => NodeKind::String,
            NodeTag::Integer => NodeKind::Integer,
            NodeTag::Number => NodeKind::Number,
            NodeTag::Boolean => NodeKind::Boolean,
            NodeTag::Date => NodeKind::Date,
            NodeTag::BigInt => NodeKind::BigInt,
            NodeTag::Null => NodeKind::Null,
            NodeTag::Symbol => NodeKind::Symbol,
            NodeTag::Undefined => NodeKind::Undefined,
            NodeTag::Literal => NodeKind::Literal {
                value: doc.value.ok_or_else(|| missing("const"))?,
            },
            NodeTag::Array => match doc.items {
                Some(Items::One(items)) => NodeKind::Array { items },
                Some(Items::Many(_)) => return Err("`items` of an Array must be a single node".into()),
                None => return Err(missing("items")),
            },
            NodeTag::Tuple => match doc.items {
                Some(Items::Many(items)) => NodeKind::Tuple { items },
                Some(Items::One(_)) => return Err("`items` of a Tuple must be a list of nodes".into()),
                None => return Err(missing("items")),
            },
            NodeTag::Union => NodeKind::Union {
                any_of: doc.any_of.ok_or_else(|| missing("anyOf"))?,
            },
            NodeTag::Object => NodeKind::Object {
                properties: doc.properties.ok_or_else(|| missing("properties"))?,
            },
            NodeTag::Record => NodeKind::Record {
                values: doc.values.ok_or_else(|| missing("values"))?,
            },
        };
        Ok(SchemaNode { kind, optional: doc.optional, default: doc.default })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OBJECT SCHEMA
// ————————————————————————————————————————————————————————————————————————————

/// Top-level schema: named fields in declaration order.
///
/// Fields can't be changed after construction, so a clone shares the
/// original's identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ObjectSchemaDoc")]
pub struct ObjectSchema {
    id: SchemaId,
    properties: IndexMap<String, SchemaNode>,
}

#[derive(Deserialize)]
struct ObjectSchemaDoc {
    properties: IndexMap<String, SchemaNode>,
}

impl From<ObjectSchemaDoc> for ObjectSchema {
    fn from(doc: ObjectSchemaDoc) -> Self {
        ObjectSchema { id: SchemaId::fresh(), properties: doc.properties }
    }
}

impl ObjectSchema {
    pub fn new<K: Into<String>>(properties: impl IntoIterator<Item = (K, SchemaNode)>) -> Self {
        ObjectSchema {
            id: SchemaId::fresh(),
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn from_json_str(src: &str) -> Result<Self, SchemaLoadError> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SchemaLoadError> {
        crate::path_de::from_slice_with_path(bytes)
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn properties(&self) -> &IndexMap<String, SchemaNode> {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
