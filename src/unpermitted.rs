//! Reporting of top-level keys a permit call dropped.

use crate::config::{PermitConfig, UnpermittedAction};
use crate::error::{ParamsError, ParamsResult};
use crate::params::Parameters;

/// Tracing target of the `log` action's event.
pub const LOG_TARGET: &str = "strong_params::unpermitted";

/// Top-level keys of `input` missing from `permitted`, in input order.
/// Nested keys are never reported, nor are the configured framework keys.
pub fn unpermitted_keys(
    input: &Parameters,
    permitted: &Parameters,
    config: &PermitConfig,
) -> Vec<String> {
    input
        .keys()
        .filter(|key| !config.is_always_permitted(key))
        .filter(|key| !permitted.contains_key(key))
        .map(str::to_string)
        .collect()
}

/// Applies the configured action to a set of unpermitted keys.
///
/// # Errors
/// [`ParamsError::UnpermittedParameters`] when the action is `raise` and
/// `keys` is non-empty.
pub fn report_unpermitted(keys: Vec<String>, config: &PermitConfig) -> ParamsResult<()> {
    if keys.is_empty() {
        return Ok(());
    }

    match config.action_on_unpermitted {
        UnpermittedAction::Disabled => Ok(()),
        UnpermittedAction::Log => {
            tracing::debug!(
                target: LOG_TARGET,
                keys = ?keys,
                "Unpermitted parameters: {}",
                keys.join(", ")
            );
            Ok(())
        }
        UnpermittedAction::Raise => Err(ParamsError::UnpermittedParameters { keys }),
    }
}
