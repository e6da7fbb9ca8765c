//! Build parameter trees from decoded request bodies.
//!
//! Every nested object is wrapped into an unpermitted [`Parameters`] up front,
//! so later reads never have to rewrite the tree.

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::error::{ParamsError, ParamsResult};
use crate::params::Parameters;
use crate::scalar::Scalar;
use crate::value::Value;

/// Maximum nesting depth for objects/arrays in a request body
const MAX_DEPTH: usize = 32;

impl Parameters {
    /// Wrap a decoded JSON body. The root must be an object.
    ///
    /// # Errors
    /// Returns [`ParamsError::InvalidInput`] if:
    /// - The root is not an object
    /// - Nesting depth exceeds MAX_DEPTH (32)
    pub fn from_json(body: Json) -> ParamsResult<Self> {
        match body {
            Json::Object(map) => wrap_object(map, 0),
            other => Err(ParamsError::InvalidInput(format!(
                "request body must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl TryFrom<Json> for Value {
    type Error = ParamsError;

    fn try_from(json: Json) -> ParamsResult<Self> {
        convert(json, 0)
    }
}

fn wrap_object(map: Map<String, Json>, depth: usize) -> ParamsResult<Parameters> {
    let mut entries = IndexMap::with_capacity(map.len());
    for (key, val) in map {
        entries.insert(key, convert(val, depth + 1)?);
    }
    Ok(Parameters::from_parts(entries, false))
}

fn convert(value: Json, depth: usize) -> ParamsResult<Value> {
    if depth > MAX_DEPTH {
        return Err(ParamsError::InvalidInput(format!(
            "parameters nested too deep (max {MAX_DEPTH} levels)"
        )));
    }

    Ok(match value {
        Json::Object(map) => Value::Mapping(wrap_object(map, depth)?),
        Json::Array(items) => Value::Sequence(
            items
                .into_iter()
                .map(|v| convert(v, depth + 1))
                .collect::<ParamsResult<Vec<_>>>()?,
        ),
        Json::String(text) => Value::Scalar(Scalar::Text(text)),
        Json::Number(n) => Value::Scalar(Scalar::Number(n)),
        Json::Bool(flag) => Value::Scalar(Scalar::Bool(flag)),
        Json::Null => Value::Absent,
    })
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Object(_) => "object",
        Json::Array(_) => "array",
        Json::String(_) => "string",
        Json::Number(_) => "number",
        Json::Bool(_) => "boolean",
        Json::Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_objects_are_wrapped() {
        let params = Parameters::from_json(json!({
            "book": {
                "authors": [{"name": "William Shakespeare"}],
                "details": {"pages": 200}
            }
        }))
        .unwrap();

        assert!(params["book"].as_params().is_some());
        assert!(params["book"]["details"].as_params().is_some());
        assert!(params["book"]["authors"][0].as_params().is_some());
        assert_eq!(params["book"]["details"]["pages"].as_i64(), Some(200));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let params = Parameters::from_json(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_null_becomes_absent() {
        let params = Parameters::from_json(json!({"person": null})).unwrap();
        assert!(params.contains_key("person"));
        assert!(params["person"].is_absent());
    }

    #[test]
    fn test_decimal_precision_is_kept() {
        let body: Json =
            serde_json::from_str(r#"{"price": 12345678901234567890.123456789}"#).unwrap();
        let params = Parameters::from_json(body).unwrap();
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"price":12345678901234567890.123456789}"#
        );
    }

    #[test]
    fn test_root_must_be_object() {
        for body in [json!([1, 2]), json!("id"), json!(null)] {
            let err = Parameters::from_json(body).unwrap_err();
            assert!(matches!(err, ParamsError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_depth_limit() {
        let mut value = json!({"leaf": true});
        for _ in 0..35 {
            value = json!({"nested": value});
        }

        let err = Parameters::from_json(value).unwrap_err();
        assert!(err.to_string().contains("too deep"));
    }

    #[test]
    fn test_depth_limit_counts_arrays() {
        let mut value = json!(1);
        for _ in 0..40 {
            value = json!([value]);
        }
        assert!(Parameters::from_json(json!({"deep": value})).is_err());
    }
}
