//! Presence checks for top-level keys.

use crate::error::{ParamsError, ParamsResult};
use crate::params::Parameters;
use crate::scalar::Scalar;
use crate::value::Value;

/// Absent, whitespace-only text, empty mapping and empty sequence all count
/// as empty.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Absent => true,
        Value::Scalar(Scalar::Text(text)) => text.trim().is_empty(),
        Value::Mapping(params) => params.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Scalar(_) => false,
    }
}

impl Parameters {
    /// The value under `key`, which must be present and non-empty.
    ///
    /// # Errors
    /// [`ParamsError::ParameterMissing`] naming `key` otherwise.
    pub fn require(&self, key: impl AsRef<str>) -> ParamsResult<&Value> {
        let key = key.as_ref();
        let value = self.get(key);
        if is_blank(value) {
            return Err(ParamsError::missing(key));
        }
        Ok(value)
    }

    /// Checks every key in order and returns their values. The receiver is
    /// left as it was; keys that were not required stay available.
    ///
    /// # Errors
    /// [`ParamsError::ParameterMissing`] naming the first failing key.
    pub fn require_all<I>(&self, keys: I) -> ParamsResult<Vec<&Value>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        keys.into_iter().map(|key| self.require(key)).collect()
    }
}
