//! The four shapes a parameter value can take.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::ops::Index;

use crate::params::Parameters;
use crate::scalar::{Scalar, Symbol};

/// Returned by reads of missing keys.
pub(crate) static ABSENT: Value = Value::Absent;

/// A parameter value. Nested mappings are always [`Parameters`], so no raw
/// mapping is ever reachable through this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Parameters),
    /// Nothing/null. Also what reads of missing keys return.
    Absent,
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_params(&self) -> Option<&Parameters> {
        match self {
            Value::Mapping(params) => Some(params),
            _ => None,
        }
    }

    pub fn as_params_mut(&mut self) -> Option<&mut Parameters> {
        match self {
            Value::Mapping(params) => Some(params),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Text(text)) => Some(text),
            Value::Scalar(Scalar::Symbol(sym)) => Some(sym.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    /// Truthiness as the decoding layer sees it: `Absent` and `false` are
    /// the only falsy values.
    pub(crate) fn is_truthy(&self) -> bool {
        !matches!(self, Value::Absent | Value::Scalar(Scalar::Bool(false)))
    }

    /// Sets the permitted marker on every tree reachable from this value.
    pub(crate) fn mark_permitted(&mut self) {
        match self {
            Value::Mapping(params) => params.permit_all_in_place(),
            Value::Sequence(items) => items.iter_mut().for_each(Value::mark_permitted),
            Value::Scalar(_) | Value::Absent => {}
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Mapping(params) => params.get(key),
            _ => &ABSENT,
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, idx: usize) -> &Value {
        match self {
            Value::Sequence(items) => items.get(idx).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(Scalar::Text(text.to_string()))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(Scalar::Text(text))
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Scalar(Scalar::Symbol(sym))
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Scalar(Scalar::Bool(flag))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no numeric representation and become opaque.
    fn from(n: f64) -> Self {
        match serde_json::Number::from_f64(n) {
            Some(num) => Value::Scalar(Scalar::Number(num)),
            None => Value::Scalar(Scalar::Opaque("f64".to_string())),
        }
    }
}

impl From<Parameters> for Value {
    fn from(params: Parameters) -> Self {
        Value::Mapping(params)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Absent => serializer.serialize_unit(),
            Value::Mapping(params) => params.serialize(serializer),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Scalar(scalar) => match scalar {
                Scalar::Text(text) => serializer.serialize_str(text),
                Scalar::Symbol(sym) => serializer.serialize_str(sym.as_str()),
                Scalar::Number(n) => n.serialize(serializer),
                Scalar::Bool(flag) => serializer.serialize_bool(*flag),
                Scalar::Date(date) => serializer.collect_str(date),
                Scalar::DateTime(ts) => serializer.serialize_str(&ts.to_rfc3339()),
                Scalar::Stream(bytes) => serializer.serialize_bytes(bytes),
                Scalar::Upload(file) => {
                    let mut map = serializer.serialize_map(Some(2))?;
                    map.serialize_entry("original_filename", &file.original_filename)?;
                    map.serialize_entry("content_type", &file.content_type)?;
                    map.end()
                }
                Scalar::Opaque(type_name) => serializer.collect_str(&format_args!("#<{type_name}>")),
            },
        }
    }
}
