//! Structural decoding of a value tree against a schema template.

use indexmap::IndexMap;

use crate::{
    encode::{field_path, node_error, scalar_matches},
    ClassValue, CodecError,
    CodecErrorKind::*,
    CodecValue, Registry, Schema,
};

/// Validate a decoded value tree against `schema`, resolving class nodes by
/// their embedded type tag.
///
/// The rules mirror the encode walk, with two decode-side relaxations: a
/// sequence is accepted where a tuple is expected, since a JSON document has
/// no tuple type, and a class node's tag may name the expected class or
/// exactly one registered descendant of it.
pub fn decode(
    value: &CodecValue,
    schema: &Schema,
    registry: &Registry,
) -> Result<CodecValue, CodecError> {
    decode_node(value, schema, registry, "", 0)
}

fn decode_node(
    value: &CodecValue,
    schema: &Schema,
    registry: &Registry,
    path: &str,
    depth: usize,
) -> Result<CodecValue, CodecError> {
    match schema {
        Schema::Int | Schema::Float | Schema::Bool | Schema::Str => {
            if scalar_matches(value, schema) {
                Ok(value.clone())
            } else {
                Err(node_error(
                    path,
                    depth,
                    SchemaMismatch {
                        expected: format!("{}", schema).into(),
                        actual: value.shape_name().into(),
                    },
                ))
            }
        }
        Schema::Seq(inner) => {
            let elements = match value {
                CodecValue::Seq(elements) => elements,
                _ => {
                    return Err(node_error(
                        path,
                        depth,
                        SchemaMismatch {
                            expected: "seq".into(),
                            actual: value.shape_name().into(),
                        },
                    ))
                }
            };
            let mut result = Vec::with_capacity(elements.len());
            for (i, element) in elements.iter().enumerate() {
                let child = format!("{}[{}]", path, i);
                result.push(decode_node(element, inner, registry, &child, depth + 1)?);
            }
            Ok(CodecValue::Seq(result))
        }
        Schema::Tuple(items) => {
            let elements = match value {
                CodecValue::Tuple(elements) | CodecValue::Seq(elements) => elements,
                _ => {
                    return Err(node_error(
                        path,
                        depth,
                        SchemaMismatch {
                            expected: "tuple".into(),
                            actual: value.shape_name().into(),
                        },
                    ))
                }
            };
            if elements.len() != items.len() {
                return Err(node_error(
                    path,
                    depth,
                    TupleLenMismatch {
                        expected: items.len(),
                        actual: elements.len(),
                    },
                ));
            }
            let mut result = Vec::with_capacity(elements.len());
            for (i, (element, item)) in elements.iter().zip(items).enumerate() {
                let child = format!("{}[{}]", path, i);
                result.push(decode_node(element, item, registry, &child, depth + 1)?);
            }
            Ok(CodecValue::Tuple(result))
        }
        Schema::Class(expected) => {
            let object = match value {
                CodecValue::Object(object) => object,
                _ => {
                    return Err(node_error(
                        path,
                        depth,
                        SchemaMismatch {
                            expected: format!("class {}", expected).into(),
                            actual: value.shape_name().into(),
                        },
                    ))
                }
            };
            let matches = registry.matching_descendants(expected, &object.class_id);
            let def = match matches.len() {
                0 => {
                    return Err(node_error(
                        path,
                        depth,
                        UnresolvedClassTag {
                            expected: expected.to_string(),
                            tag: object.class_id.clone(),
                        },
                    ))
                }
                1 => matches[0],
                _ => {
                    return Err(node_error(
                        path,
                        depth,
                        AmbiguousClassTag {
                            tag: object.class_id.clone(),
                        },
                    ))
                }
            };
            let merged = registry
                .merged_fields(def.id)
                .map_err(|error| node_error(path, depth, UnknownClass { id: error.id }))?;
            let mut fields = IndexMap::new();
            for (name, field_schema) in merged {
                let child = field_path(path, name);
                let field = object.fields.get(name).ok_or_else(|| {
                    node_error(
                        path,
                        depth,
                        MissingField {
                            name: name.to_string(),
                        },
                    )
                })?;
                fields.insert(
                    name.to_string(),
                    decode_node(field, field_schema, registry, &child, depth + 1)?,
                );
            }
            Ok(CodecValue::Object(Box::new(ClassValue {
                class_id: def.id.to_string(),
                fields,
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, ClassDef};

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register(ClassDef {
            id: "test.Shape",
            base: None,
            fields: vec![("label", Schema::Str)],
        });
        reg.register(ClassDef {
            id: "test.Circle",
            base: Some("test.Shape"),
            fields: vec![("radius", Schema::Float)],
        });
        reg.register(ClassDef {
            id: "test.Rect",
            base: Some("test.Shape"),
            fields: vec![("size", Schema::Tuple(vec![Schema::Float, Schema::Float]))],
        });
        reg
    }

    #[test]
    fn a_seq_is_accepted_where_a_tuple_is_expected() {
        let reg = Registry::new();
        let schema = Schema::Tuple(vec![Schema::Int, Schema::Str]);
        let value = CodecValue::Seq(vec![CodecValue::Int(1), CodecValue::Str("x".into())]);
        let decoded = decode(&value, &schema, &reg).unwrap();
        assert!(matches!(decoded, CodecValue::Tuple(_)));
    }

    #[test]
    fn tags_resolve_to_registered_descendants() {
        let reg = registry();
        let value = CodecValue::object(
            "test.Rect",
            [
                ("label", CodecValue::Str("r".into())),
                ("size", CodecValue::tuple([1.0, 2.0])),
            ],
        );
        let decoded = decode(&value, &Schema::Class("test.Shape"), &reg).unwrap();
        assert_eq!(decoded.as_object().class_id, "test.Rect");
    }

    #[test]
    fn unknown_tags_fail_to_resolve() {
        let reg = registry();
        let value = CodecValue::object("test.Pentagon", [("label", CodecValue::Str("p".into()))]);
        let error = decode(&value, &Schema::Class("test.Shape"), &reg).unwrap_err();
        assert!(matches!(error.kind, UnresolvedClassTag { .. }));
    }

    #[test]
    fn tags_outside_the_expected_family_fail_to_resolve() {
        let reg = registry();
        let value = CodecValue::object(
            "test.Rect",
            [
                ("label", CodecValue::Str("r".into())),
                ("size", CodecValue::tuple([1.0, 2.0])),
            ],
        );
        let error = decode(&value, &Schema::Class("test.Circle"), &reg).unwrap_err();
        assert!(matches!(error.kind, UnresolvedClassTag { .. }));
    }

    #[test]
    fn nested_errors_carry_a_qualified_path() {
        let reg = registry();
        let value = CodecValue::object(
            "test.Rect",
            [
                ("label", CodecValue::Str("r".into())),
                (
                    "size",
                    CodecValue::tuple([CodecValue::Float(1.0), CodecValue::Str("two".into())]),
                ),
            ],
        );
        let error = decode(&value, &Schema::Class("test.Shape"), &reg).unwrap_err();
        assert_eq!(error.path, "size[1]");
        assert_eq!(error.depth, 2);
    }

    #[test]
    fn decode_inverts_encode() {
        let reg = registry();
        let value = CodecValue::object(
            "test.Circle",
            [
                ("label", CodecValue::Str("c".into())),
                ("radius", CodecValue::Float(1.5)),
            ],
        );
        let schema = Schema::Class("test.Shape");
        let encoded = encode(&value, &schema, &reg).unwrap();
        let decoded = decode(&encoded, &schema, &reg).unwrap();
        assert_eq!(decoded, encoded);
    }
}
