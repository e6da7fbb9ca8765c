//! Scalar kinds and the permitted-scalar whitelist.
//!
//! Only a closed set of atomic kinds may pass a scalar declaration. Anything
//! else that arrives as an atom (an arbitrary object handed over by the
//! decoding layer) is stored verbatim as [`Scalar::Opaque`] and never passes.

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fmt;
use std::path::PathBuf;

use crate::value::Value;

/// A symbolic name. Behaves exactly like its text form wherever it is used
/// as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// Handle to a file received as part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_filename: String,
    pub content_type: Option<String>,
    /// Where the decoding layer spooled the upload.
    pub path: PathBuf,
}

/// An atomic value as handed over by the decoding layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Symbol(Symbol),
    /// Integer or arbitrary-precision decimal.
    Number(serde_json::Number),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// Binary stream contents.
    Stream(Bytes),
    Upload(UploadedFile),
    /// Any other object; carries only its type name. Never permitted.
    Opaque(String),
}

impl Scalar {
    /// Short name of the kind, used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Symbol(_) => "symbol",
            Scalar::Number(_) => "number",
            Scalar::Bool(_) => "bool",
            Scalar::Date(_) => "date",
            Scalar::DateTime(_) => "datetime",
            Scalar::Stream(_) => "stream",
            Scalar::Upload(_) => "upload",
            Scalar::Opaque(_) => "opaque",
        }
    }
}

/// Whether `value` belongs to the permitted atomic kinds.
///
/// `Absent` counts: a declared key explicitly sent as null is kept as null.
pub fn is_permitted_scalar(value: &Value) -> bool {
    match value {
        Value::Absent => true,
        Value::Scalar(Scalar::Opaque(_)) => false,
        Value::Scalar(_) => true,
        Value::Sequence(_) | Value::Mapping(_) => false,
    }
}

/// Whether `value` is a sequence of permitted scalars. Empty sequences pass.
pub fn is_array_of_permitted_scalars(value: &Value) -> bool {
    match value {
        Value::Sequence(items) => items.iter().all(is_permitted_scalar),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;

    #[test]
    fn test_whitelisted_kinds_pass() {
        let upload = UploadedFile {
            original_filename: "avatar.png".to_string(),
            content_type: Some("image/png".to_string()),
            path: PathBuf::from("/tmp/upload-1"),
        };
        let date = NaiveDate::from_ymd_opt(1564, 4, 26).expect("valid date");
        let values = vec![
            Value::from("text"),
            Value::from(Symbol::new("sym")),
            Value::Absent,
            Value::from(42),
            Value::from(1.5),
            Value::from(true),
            Value::Scalar(Scalar::Date(date)),
            Value::Scalar(Scalar::Stream(Bytes::from_static(b"\x00\x01"))),
            Value::Scalar(Scalar::Upload(upload)),
        ];

        for value in &values {
            assert!(is_permitted_scalar(value), "{value:?} should be permitted");
        }
    }

    #[test]
    fn test_structures_and_opaque_objects_fail() {
        assert!(!is_permitted_scalar(&Value::Scalar(Scalar::Opaque(
            "Object".to_string()
        ))));
        assert!(!is_permitted_scalar(&Value::Sequence(vec![])));
        assert!(!is_permitted_scalar(&Value::Mapping(Parameters::new())));
    }

    #[test]
    fn test_array_of_scalars() {
        assert!(is_array_of_permitted_scalars(&Value::Sequence(vec![])));
        assert!(is_array_of_permitted_scalars(&Value::Sequence(vec![
            Value::from(1),
            Value::from("two"),
        ])));
        assert!(!is_array_of_permitted_scalars(&Value::Sequence(vec![
            Value::from(1),
            Value::Sequence(vec![Value::from(1)]),
        ])));
        assert!(!is_array_of_permitted_scalars(&Value::Sequence(vec![
            Value::Mapping(Parameters::new())
        ])));
        assert!(!is_array_of_permitted_scalars(&Value::from("solo")));
    }
}
