//! Filter specifications: which keys, and which value shapes, may pass.
//!
//! A specification is a list of [`Declaration`]s. Build one in code with the
//! builder methods, or parse the textual form of permit arguments, a JSON
//! list mixing bare keys and objects:
//!
//! ```text
//! ["id", {"tags": []}, {"book": ["title", {"authors": ["name"]}]}]
//! ```
//!
//! - `"id"`: scalar declaration
//! - `{"tags": []}`: array of scalars
//! - `{"book": "title"}`, `{"book": [...]}`, `{"book": {...}}`: nested

use serde::Deserialize;
use serde_json::Value as Json;
use std::str::FromStr;

use crate::error::{ParamsError, ParamsResult};
use crate::key::normalize_key;

/// One entry of a filter specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// The key passes when its value is a permitted scalar. Indexed siblings
    /// (`key(1i)`) pass under the same rule.
    Scalar(String),
    /// The key passes when its value is a sequence of permitted scalars.
    ArrayOfScalars(String),
    /// The key's value is filtered recursively against the inner spec.
    Nested(String, FilterSpec),
}

impl Declaration {
    pub fn key(&self) -> &str {
        match self {
            Declaration::Scalar(key)
            | Declaration::ArrayOfScalars(key)
            | Declaration::Nested(key, _) => key,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Json")]
pub struct FilterSpec {
    declarations: Vec<Declaration>,
}

impl FilterSpec {
    /// A spec that permits nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(mut self, key: impl AsRef<str>) -> Self {
        self.push(Declaration::Scalar(normalize_key(key)));
        self
    }

    pub fn array(mut self, key: impl AsRef<str>) -> Self {
        self.push(Declaration::ArrayOfScalars(normalize_key(key)));
        self
    }

    pub fn nested(mut self, key: impl AsRef<str>, spec: FilterSpec) -> Self {
        self.push(Declaration::Nested(normalize_key(key), spec));
        self
    }

    /// Adds a declaration. Repeats are unioned: an identical declaration is
    /// dropped and a second nested declaration for a key extends the first.
    pub fn push(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Nested(key, spec) => {
                let existing = self.declarations.iter_mut().find_map(|d| match d {
                    Declaration::Nested(k, inner) if *k == key => Some(inner),
                    _ => None,
                });
                match existing {
                    Some(inner) => inner.extend(spec),
                    None => self.declarations.push(Declaration::Nested(key, spec)),
                }
            }
            other => {
                if !self.declarations.contains(&other) {
                    self.declarations.push(other);
                }
            }
        }
    }

    /// Unions `other` into this spec.
    pub fn extend(&mut self, other: FilterSpec) {
        for declaration in other.declarations {
            self.push(declaration);
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Every key named at this level, in declaration order.
    pub fn declared_keys(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(Declaration::key)
    }

    pub(crate) fn allows_scalar_array(&self, key: &str) -> bool {
        self.declarations
            .iter()
            .any(|d| matches!(d, Declaration::ArrayOfScalars(k) if k == key))
    }

    /// Parses the JSON form of permit arguments.
    ///
    /// # Errors
    /// [`ParamsError::InvalidFilterSpec`] for numbers, booleans or null
    /// anywhere a key or declaration is expected.
    pub fn from_json(args: &Json) -> ParamsResult<Self> {
        let mut spec = FilterSpec::new();
        parse_into(&mut spec, args)?;
        Ok(spec)
    }
}

fn parse_into(spec: &mut FilterSpec, args: &Json) -> ParamsResult<()> {
    match args {
        Json::String(key) => spec.push(Declaration::Scalar(key.clone())),
        Json::Array(items) => {
            for item in items {
                parse_into(spec, item)?;
            }
        }
        Json::Object(map) => {
            for (key, inner) in map {
                spec.push(parse_entry(key, inner)?);
            }
        }
        other => {
            return Err(ParamsError::InvalidFilterSpec(format!(
                "expected a key, list or object, got {other}"
            )))
        }
    }
    Ok(())
}

/// One `key => inner` pair of a mapping-shaped declaration.
fn parse_entry(key: &str, inner: &Json) -> ParamsResult<Declaration> {
    match inner {
        Json::Array(items) if items.is_empty() => Ok(Declaration::ArrayOfScalars(key.to_string())),
        Json::String(_) | Json::Array(_) | Json::Object(_) => {
            Ok(Declaration::Nested(key.to_string(), FilterSpec::from_json(inner)?))
        }
        other => Err(ParamsError::InvalidFilterSpec(format!(
            "declaration for '{key}' must be a key, list or object, got {other}"
        ))),
    }
}

impl TryFrom<Json> for FilterSpec {
    type Error = ParamsError;

    fn try_from(args: Json) -> ParamsResult<Self> {
        FilterSpec::from_json(&args)
    }
}

impl FromStr for FilterSpec {
    type Err = ParamsError;

    fn from_str(s: &str) -> ParamsResult<Self> {
        let args: Json = serde_json::from_str(s)
            .map_err(|e| ParamsError::InvalidFilterSpec(format!("not valid JSON: {e}")))?;
        FilterSpec::from_json(&args)
    }
}
