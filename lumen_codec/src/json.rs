//! Conversion between codec values and JSON documents.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};

use crate::{error::JsonError, ClassValue, CodecValue};

/// Reserved field carrying the concrete class id of an encoded object.
pub const CLASS_TAG_KEY: &str = "__classtype__";

/// Convert a codec value to a JSON value.
///
/// Objects become JSON objects with the reserved [CLASS_TAG_KEY] field;
/// tuples become JSON arrays and therefore re-enter as sequences.
pub fn to_json(value: &CodecValue) -> Result<JsonValue, JsonError> {
    match value {
        CodecValue::None => Ok(JsonValue::Null),
        CodecValue::Int(n) => Ok(JsonValue::Number((*n).into())),
        CodecValue::Float(r) => Number::from_f64(*r)
            .map(JsonValue::Number)
            .ok_or(JsonError::NonFiniteFloat),
        CodecValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        CodecValue::Str(s) => Ok(JsonValue::String(s.clone())),
        CodecValue::Seq(elements) | CodecValue::Tuple(elements) => Ok(JsonValue::Array(
            elements
                .iter()
                .map(to_json)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        CodecValue::Object(object) => {
            let mut map = Map::new();
            map.insert(
                CLASS_TAG_KEY.to_string(),
                JsonValue::String(object.class_id.clone()),
            );
            for (name, field) in &object.fields {
                map.insert(name.clone(), to_json(field)?);
            }
            Ok(JsonValue::Object(map))
        }
    }
}

/// Convert a JSON value to a codec value.
///
/// Every JSON object must carry the [CLASS_TAG_KEY] field; integral numbers
/// become ints and all others floats.
pub fn from_json(value: &JsonValue) -> Result<CodecValue, JsonError> {
    match value {
        JsonValue::Null => Ok(CodecValue::None),
        JsonValue::Bool(b) => Ok(CodecValue::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(CodecValue::Int(i))
            } else if let Some(r) = n.as_f64() {
                Ok(CodecValue::Float(r))
            } else {
                Err(JsonError::UnsupportedNumber(n.to_string()))
            }
        }
        JsonValue::String(s) => Ok(CodecValue::Str(s.clone())),
        JsonValue::Array(elements) => Ok(CodecValue::Seq(
            elements
                .iter()
                .map(from_json)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        JsonValue::Object(map) => {
            let tag = map.get(CLASS_TAG_KEY).ok_or(JsonError::MissingClassTag)?;
            let class_id = tag.as_str().ok_or(JsonError::NonStringClassTag)?;
            let mut fields = IndexMap::new();
            for (name, field) in map {
                if name != CLASS_TAG_KEY {
                    fields.insert(name.clone(), from_json(field)?);
                }
            }
            Ok(CodecValue::Object(Box::new(ClassValue {
                class_id: class_id.to_string(),
                fields,
            })))
        }
    }
}

/// Render a codec value as a pretty-printed JSON document.
pub fn to_json_string(value: &CodecValue) -> Result<String, JsonError> {
    let json = to_json(value)?;
    Ok(serde_json::to_string_pretty(&json).expect("json values always serialize"))
}

/// Parse a JSON document into a codec value.
pub fn from_json_str(s: &str) -> Result<CodecValue, JsonError> {
    let json: JsonValue = serde_json::from_str(s)?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_round_trip_through_json() {
        let value = CodecValue::object(
            "test.Circle",
            [
                ("label", CodecValue::Str("c".into())),
                ("radius", CodecValue::Float(1.5)),
                ("tags", CodecValue::Seq(vec![CodecValue::Int(1)])),
            ],
        );
        let json = to_json(&value).unwrap();
        assert_eq!(json[CLASS_TAG_KEY], "test.Circle");
        let back = from_json(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn tuples_reenter_as_seqs() {
        let value = CodecValue::tuple([1, 2]);
        let json = to_json(&value).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(
            back,
            CodecValue::Seq(vec![CodecValue::Int(1), CodecValue::Int(2)])
        );
    }

    #[test]
    fn json_objects_without_a_tag_are_rejected() {
        let error = from_json_str(r#"{"x": 1}"#).unwrap_err();
        assert!(matches!(error, JsonError::MissingClassTag));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let error = to_json(&CodecValue::Float(f64::NAN)).unwrap_err();
        assert!(matches!(error, JsonError::NonFiniteFloat));
    }

    #[test]
    fn reencoding_a_parsed_document_is_stable() {
        let value = CodecValue::object(
            "test.Shape",
            [("b", CodecValue::Int(2)), ("a", CodecValue::Int(1))],
        );
        let first = to_json_string(&value).unwrap();
        let reparsed = from_json_str(&first).unwrap();
        let second = to_json_string(&reparsed).unwrap();
        assert_eq!(first, second);
    }
}
