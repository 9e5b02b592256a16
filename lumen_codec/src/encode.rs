//! Structural encoding of a raw value tree against a schema template.

use indexmap::IndexMap;

use crate::{
    ClassValue, CodecError,
    CodecErrorKind::{self, *},
    CodecValue, Registry, Schema,
};

/// Validate `value` against `schema` and project it into its encoded form.
///
/// Scalars must match their template exactly (`None` is accepted in place of
/// any scalar), sequences are validated element-wise against the single inner
/// template, tuples must match the template arity exactly, and class nodes
/// are projected onto the merged field schema of the value's concrete class,
/// which must be the expected class or a registered descendant.
pub fn encode(
    value: &CodecValue,
    schema: &Schema,
    registry: &Registry,
) -> Result<CodecValue, CodecError> {
    encode_node(value, schema, registry, "", 0)
}

pub(crate) fn node_error(path: &str, depth: usize, kind: CodecErrorKind) -> CodecError {
    CodecError {
        path: path.to_string(),
        depth,
        kind,
    }
}

pub(crate) fn field_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

/// True if `value` satisfies a scalar template, which also admits `None`.
pub(crate) fn scalar_matches(value: &CodecValue, schema: &Schema) -> bool {
    matches!(
        (value, schema),
        (CodecValue::None, _)
            | (CodecValue::Int(_), Schema::Int)
            | (CodecValue::Float(_), Schema::Float)
            | (CodecValue::Bool(_), Schema::Bool)
            | (CodecValue::Str(_), Schema::Str)
    )
}

fn encode_node(
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
                result.push(encode_node(element, inner, registry, &child, depth + 1)?);
            }
            Ok(CodecValue::Seq(result))
        }
        Schema::Tuple(items) => {
            let elements = match value {
                CodecValue::Tuple(elements) => elements,
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
                result.push(encode_node(element, item, registry, &child, depth + 1)?);
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
            if !registry.is_compatible(&object.class_id, expected) {
                return Err(node_error(
                    path,
                    depth,
                    SchemaMismatch {
                        expected: format!("class {}", expected).into(),
                        actual: format!("class {}", object.class_id).into(),
                    },
                ));
            }
            let merged = registry
                .merged_fields(&object.class_id)
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
                    encode_node(field, field_schema, registry, &child, depth + 1)?,
                );
            }
            Ok(CodecValue::Object(Box::new(ClassValue {
                class_id: object.class_id.clone(),
                fields,
            })))
        }
    }
}
