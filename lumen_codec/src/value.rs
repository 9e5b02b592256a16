//! Generic JSON-compatible value used as the codec's intermediate form.

use std::fmt;

use indexmap::IndexMap;

use crate::error::ValueTypeError;

/// A dynamically typed value.
///
/// This is the intermediate form between the typed configuration model and a
/// JSON document. Sequences are homogeneous and tuples are fixed-size
/// heterogeneous; the distinction only matters to the schema checks, since
/// both serialize to a JSON array.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecValue {
    /// Represents the lack of a value, e.g. an unset optional field.
    None,
    /// An integer value.
    Int(IntValue),
    /// A float value.
    Float(FloatValue),
    /// A boolean value.
    Bool(bool),
    /// A string value.
    Str(String),
    /// An ordered sequence of values.
    Seq(Vec<CodecValue>),
    /// A fixed-size tuple of values.
    Tuple(Vec<CodecValue>),
    /// A tagged object value holding the fields of a registered class.
    Object(Box<ClassValue>),
}

/// An integer value.
///
/// i64 is wide enough for every scalar the configuration model uses.
pub type IntValue = i64;

/// A float value.
pub type FloatValue = f64;

/// The fields of an object value, tagged with its concrete class id.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassValue {
    /// Fully-qualified identifier of the concrete class.
    pub class_id: String,
    /// Field values, in declaration order.
    pub fields: IndexMap<String, CodecValue>,
}

impl CodecValue {
    /// Construct an object value from a class id and field pairs.
    pub fn object<I, K, V>(class_id: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CodecValue>,
    {
        CodecValue::Object(Box::new(ClassValue {
            class_id: class_id.to_string(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }))
    }

    /// Construct a tuple value.
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CodecValue>,
    {
        CodecValue::Tuple(items.into_iter().map(|v| v.into()).collect())
    }

    /// Return true if the value is `CodecValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, CodecValue::None)
    }

    /// Convert the value to an int, panicking on failure.
    #[track_caller]
    pub fn as_int(&self) -> IntValue {
        match self.try_as_int() {
            Ok(n) => n,
            Err(error) => panic!("{}", error),
        }
    }

    /// Convert the value to an int.
    pub fn try_as_int(&self) -> Result<IntValue, ValueTypeError> {
        if let CodecValue::Int(n) = *self {
            Ok(n)
        } else {
            Err(ValueTypeError {
                expected: "int".into(),
                actual: self.clone(),
            })
        }
    }

    /// Convert the value to a float, panicking on failure.
    #[track_caller]
    pub fn as_float(&self) -> FloatValue {
        match self.try_as_float() {
            Ok(r) => r,
            Err(error) => panic!("{}", error),
        }
    }

    /// Convert the value to a float.
    pub fn try_as_float(&self) -> Result<FloatValue, ValueTypeError> {
        if let CodecValue::Float(r) = *self {
            Ok(r)
        } else {
            Err(ValueTypeError {
                expected: "float".into(),
                actual: self.clone(),
            })
        }
    }

    /// Convert the value to a bool.
    pub fn try_as_bool(&self) -> Result<bool, ValueTypeError> {
        if let CodecValue::Bool(b) = *self {
            Ok(b)
        } else {
            Err(ValueTypeError {
                expected: "bool".into(),
                actual: self.clone(),
            })
        }
    }

    /// Convert the value to a string, panicking on failure.
    #[track_caller]
    pub fn as_str(&self) -> &str {
        match self.try_as_str() {
            Ok(s) => s,
            Err(error) => panic!("{}", error),
        }
    }

    /// Convert the value to a string.
    pub fn try_as_str(&self) -> Result<&str, ValueTypeError> {
        if let CodecValue::Str(s) = self {
            Ok(s)
        } else {
            Err(ValueTypeError {
                expected: "str".into(),
                actual: self.clone(),
            })
        }
    }

    /// Convert the value to a sequence and return its elements, panicking on
    /// failure.
    #[track_caller]
    pub fn as_seq(&self) -> &[CodecValue] {
        match self.try_as_seq() {
            Ok(elements) => elements,
            Err(error) => panic!("{}", error),
        }
    }

    /// Convert the value to a sequence and return its elements.
    pub fn try_as_seq(&self) -> Result<&[CodecValue], ValueTypeError> {
        if let CodecValue::Seq(elements) = self {
            Ok(elements)
        } else {
            Err(ValueTypeError {
                expected: "seq".into(),
                actual: self.clone(),
            })
        }
    }

    /// Convert the value to a tuple and return its elements.
    ///
    /// A sequence is accepted as well, since a decoded JSON document has no
    /// tuple type.
    pub fn try_as_tuple(&self) -> Result<&[CodecValue], ValueTypeError> {
        match self {
            CodecValue::Tuple(elements) | CodecValue::Seq(elements) => Ok(elements),
            _ => Err(ValueTypeError {
                expected: "tuple".into(),
                actual: self.clone(),
            }),
        }
    }

    /// Convert the value to an object, panicking on failure.
    #[track_caller]
    pub fn as_object(&self) -> &ClassValue {
        match self.try_as_object() {
            Ok(object) => object,
            Err(error) => panic!("{}", error),
        }
    }

    /// Convert the value to an object.
    pub fn try_as_object(&self) -> Result<&ClassValue, ValueTypeError> {
        if let CodecValue::Object(object) = self {
            Ok(object)
        } else {
            Err(ValueTypeError {
                expected: "object".into(),
                actual: self.clone(),
            })
        }
    }

    /// A short name for the value's shape, used in error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            CodecValue::None => "none",
            CodecValue::Int(_) => "int",
            CodecValue::Float(_) => "float",
            CodecValue::Bool(_) => "bool",
            CodecValue::Str(_) => "str",
            CodecValue::Seq(_) => "seq",
            CodecValue::Tuple(_) => "tuple",
            CodecValue::Object(_) => "object",
        }
    }
}

impl ClassValue {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&CodecValue> {
        self.fields.get(name)
    }
}

impl fmt::Display for CodecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecValue::None => write!(f, "none"),
            CodecValue::Int(n) => write!(f, "{}", n),
            CodecValue::Float(r) => write!(f, "{}", r),
            CodecValue::Bool(b) => write!(f, "{}", b),
            CodecValue::Str(s) => write!(f, "{:?}", s),
            CodecValue::Seq(elements) => {
                write!(
                    f,
                    "[{}]",
                    elements
                        .iter()
                        .map(|element| format!("{}", element))
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
            CodecValue::Tuple(elements) => {
                write!(
                    f,
                    "({})",
                    elements
                        .iter()
                        .map(|element| format!("{}", element))
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
            CodecValue::Object(object) => {
                write!(
                    f,
                    "{} {{ {} }}",
                    object.class_id,
                    object
                        .fields
                        .iter()
                        .map(|(name, value)| format!("{} = {}", name, value))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl From<()> for CodecValue {
    fn from((): ()) -> Self {
        Self::None
    }
}

macro_rules! value_from_int {
    ($ty:ty) => {
        impl From<$ty> for CodecValue {
            fn from(v: $ty) -> Self {
                Self::Int(v.into())
            }
        }
    };
}

value_from_int!(i8);
value_from_int!(u8);
value_from_int!(i16);
value_from_int!(u16);
value_from_int!(i32);
value_from_int!(u32);
value_from_int!(i64);

impl From<usize> for CodecValue {
    fn from(v: usize) -> Self {
        Self::Int(v as IntValue)
    }
}

impl From<f32> for CodecValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for CodecValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for CodecValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for CodecValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for CodecValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl<T: Into<CodecValue>> From<Option<T>> for CodecValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::None,
        }
    }
}

impl<T: Into<CodecValue>> From<Vec<T>> for CodecValue {
    fn from(v: Vec<T>) -> Self {
        Self::Seq(v.into_iter().map(|v| v.into()).collect())
    }
}

impl<T: Into<CodecValue> + Clone> From<&[T]> for CodecValue {
    fn from(v: &[T]) -> Self {
        Self::Seq(v.iter().map(|v| v.clone().into()).collect())
    }
}
