use form_shape::{analyze_schema, ObjectSchema, SchemaNode, ShapeError};
use serde_json::json;

struct Case {
    description: &'static str,
    schema: ObjectSchema,
    error: &'static str,
}

fn field(node: SchemaNode) -> ObjectSchema {
    ObjectSchema::new([("f", node)])
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            description: "nullable with default",
            schema: field(SchemaNode::union([SchemaNode::string(), SchemaNode::null()]).with_default("foo")),
            error: "cannot have a default value",
        },
        Case {
            description: "optional with default",
            schema: field(SchemaNode::string().with_default("foo").optional()),
            error: "cannot have a default value",
        },
        Case {
            description: "optional and nullable",
            schema: field(SchemaNode::union([SchemaNode::string(), SchemaNode::null()]).optional()),
            error: "cannot be both optional and nullable",
        },
        Case {
            description: "union of different kinds",
            schema: field(SchemaNode::union([SchemaNode::string(), SchemaNode::number()])),
            error: "all non-null members of a union must share the same primitive kind",
        },
        Case {
            description: "union of arrays of different kinds",
            schema: field(SchemaNode::union([
                SchemaNode::array(SchemaNode::string()),
                SchemaNode::array(SchemaNode::number()),
            ])),
            error: "all array members within a union must share the same element kind",
        },
        Case {
            description: "array of a mixed union",
            schema: field(SchemaNode::array(SchemaNode::union([SchemaNode::string(), SchemaNode::number()]))),
            error: "all array members within a union must share the same element kind",
        },
        Case {
            description: "array of arrays",
            schema: field(SchemaNode::array(SchemaNode::array(SchemaNode::string()))),
            error: "arrays cannot contain arrays",
        },
        Case {
            description: "array of a union holding an array",
            schema: field(SchemaNode::array(SchemaNode::union([
                SchemaNode::array(SchemaNode::string()),
                SchemaNode::null(),
            ]))),
            error: "arrays cannot contain arrays",
        },
        Case {
            description: "array with nullable members",
            schema: field(SchemaNode::array(SchemaNode::union([SchemaNode::string(), SchemaNode::null()]))),
            error: "array elements cannot be nullable or optional",
        },
        Case {
            description: "array with optional members",
            schema: field(SchemaNode::array(SchemaNode::string().optional())),
            error: "array elements cannot be nullable or optional",
        },
        Case {
            description: "union of only null",
            schema: field(SchemaNode::union([SchemaNode::null()])),
            error: "union must have at least one non-null member",
        },
        Case {
            description: "nested object",
            schema: ObjectSchema::new([
                ("name", SchemaNode::string()),
                ("obj", SchemaNode::object([("str", SchemaNode::string())])),
            ]),
            error: "unsupported type 'Object' in field 'obj'",
        },
        Case {
            description: "tuple",
            schema: field(SchemaNode::new(form_shape::NodeKind::Tuple {
                items: vec![SchemaNode::string(), SchemaNode::integer()],
            })),
            error: "unsupported type 'Tuple'",
        },
        Case {
            description: "default of the wrong kind",
            schema: field(SchemaNode::integer().with_default(json!("ten"))),
            error: "default value does not match",
        },
    ]
}

#[test]
fn disallowed_schemas_fail_with_their_rule() {
    for case in cases() {
        match analyze_schema(&case.schema) {
            Ok(_) => panic!("{}: expected failure", case.description),
            Err(err) => assert!(
                err.to_string().contains(case.error),
                "{}: {err} does not mention {:?}",
                case.description,
                case.error,
            ),
        }
    }
}

#[test]
fn errors_name_the_declared_field() {
    let schema = ObjectSchema::new([
        ("ok", SchemaNode::string()),
        ("list", SchemaNode::array(SchemaNode::array(SchemaNode::string()))),
    ]);
    assert_eq!(
        analyze_schema(&schema).unwrap_err(),
        ShapeError::NestedArray { field: "list".into() },
    );
}

#[test]
fn schemas_loaded_from_json_are_checked_the_same_way() -> anyhow::Result<()> {
    let schema = ObjectSchema::from_json_str(
        &json!({
            "properties": {
                "flag": { "kind": "Boolean", "optional": true, "default": true }
            }
        })
        .to_string(),
    )?;
    let err = analyze_schema(&schema).unwrap_err();
    assert_eq!(err, ShapeError::DefaultOnOptionalOrNullable { field: "flag".into() });
    Ok(())
}
