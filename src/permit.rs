//! The permit engine.
//!
//! Walks a tree against a [`FilterSpec`] and builds a new, permitted tree
//! holding only what was declared. Values that do not match their
//! declaration are dropped; that is the normal path, not an error.
//!
//! Every declaration reads the original tree, so declarations are
//! independent and their effects union. Result keys follow declaration
//! order.

use indexmap::IndexMap;

use crate::config::PermitConfig;
use crate::error::ParamsResult;
use crate::filter::{Declaration, FilterSpec};
use crate::key::{is_fields_for_index, IndexedKeyMatcher};
use crate::params::Parameters;
use crate::scalar::{is_array_of_permitted_scalars, is_permitted_scalar};
use crate::unpermitted::{report_unpermitted, unpermitted_keys};
use crate::value::Value;

impl Parameters {
    /// Filters this tree against `spec`.
    ///
    /// The result and every tree nested in it are permitted. Top-level keys
    /// that were dropped go to the unpermitted-key action in `config`.
    ///
    /// # Errors
    /// [`ParamsError::UnpermittedParameters`](crate::ParamsError::UnpermittedParameters)
    /// when keys were dropped and the action is `raise`. No partial result
    /// is returned in that case.
    pub fn permit(&self, spec: &FilterSpec, config: &PermitConfig) -> ParamsResult<Parameters> {
        let permitted = permit_tree(self, spec);
        report_unpermitted(unpermitted_keys(self, &permitted, config), config)?;
        Ok(permitted)
    }
}

pub(crate) fn permit_tree(params: &Parameters, spec: &FilterSpec) -> Parameters {
    let mut out = IndexMap::new();

    for declaration in spec.declarations() {
        match declaration {
            Declaration::Scalar(key) => permitted_scalar_filter(params, key, &mut out),
            Declaration::ArrayOfScalars(key) => array_of_scalars_filter(params, key, &mut out),
            Declaration::Nested(key, inner) => nested_filter(params, spec, key, inner, &mut out),
        }
    }

    Parameters::from_parts(out, true)
}

fn permitted_scalar_filter(params: &Parameters, key: &str, out: &mut IndexMap<String, Value>) {
    if let Ok(value) = params.fetch(key) {
        if is_permitted_scalar(value) {
            out.insert(key.to_string(), value.clone());
        } else {
            tracing::trace!(key, "dropped non-scalar value for scalar declaration");
        }
    }

    // born_on(1i), born_on(2i), ... ride along with `born_on`
    let indexed = IndexedKeyMatcher::new(key);
    for (sibling, value) in params.iter() {
        if indexed.matches(sibling) && is_permitted_scalar(value) {
            out.insert(sibling.to_string(), value.clone());
        }
    }
}

fn array_of_scalars_filter(params: &Parameters, key: &str, out: &mut IndexMap<String, Value>) {
    if let Ok(value) = params.fetch(key) {
        if is_array_of_permitted_scalars(value) {
            out.insert(key.to_string(), value.clone());
        } else {
            tracing::trace!(key, "dropped value for array-of-scalars declaration");
        }
    }
}

fn nested_filter(
    params: &Parameters,
    spec: &FilterSpec,
    key: &str,
    inner: &FilterSpec,
    out: &mut IndexMap<String, Value>,
) {
    let value = params.get(key);
    if !value.is_truthy() {
        return;
    }

    match value {
        Value::Sequence(items) => {
            // A sibling `key => []` declaration owns all-scalar arrays.
            if spec.allows_scalar_array(key) && is_array_of_permitted_scalars(value) {
                return;
            }
            let kept = items
                .iter()
                .filter_map(Value::as_params)
                .map(|element| Value::Mapping(permit_tree(element, inner)))
                .collect();
            out.insert(key.to_string(), Value::Sequence(kept));
        }
        Value::Mapping(nested) if is_fields_for(nested) => {
            let mut indexed = IndexMap::with_capacity(nested.len());
            for (index, entry) in nested.iter() {
                if let Value::Mapping(record) = entry {
                    indexed.insert(index.to_string(), Value::Mapping(permit_tree(record, inner)));
                }
            }
            out.insert(key.to_string(), Value::Mapping(Parameters::from_parts(indexed, true)));
        }
        Value::Mapping(nested) => {
            out.insert(key.to_string(), Value::Mapping(permit_tree(nested, inner)));
        }
        Value::Scalar(scalar) => {
            tracing::trace!(key, kind = scalar.kind(), "dropped scalar for nested declaration");
        }
        Value::Absent => {}
    }
}

/// `{"0": {...}, "1": {...}}`, as posted by nested-record forms.
fn is_fields_for(params: &Parameters) -> bool {
    !params.is_empty() && params.keys().all(is_fields_for_index)
}
