//! Permit configuration.
//!
//! Built once near process start and passed into every `permit` call.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ParamsError;

/// Overrides the unpermitted-key action (`false`, `log` or `raise`).
pub const ACTION_ENV_VAR: &str = "STRONG_PARAMS_ON_UNPERMITTED";
/// Environment name used to pick the default action when no override is set.
pub const ENVIRONMENT_ENV_VAR: &str = "STRONG_PARAMS_ENV";

/// What `permit` does when the input had top-level keys the filter rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ActionSetting")]
pub enum UnpermittedAction {
    /// Drop them silently.
    #[default]
    Disabled,
    /// Drop them and emit a debug event listing them.
    Log,
    /// Fail the permit call with `UnpermittedParameters`.
    Raise,
}

impl FromStr for UnpermittedAction {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "off" | "disabled" => Ok(Self::Disabled),
            "log" => Ok(Self::Log),
            "raise" => Ok(Self::Raise),
            other => Err(ParamsError::InvalidConfig(format!(
                "unknown unpermitted-parameters action '{other}' (expected false, log or raise)"
            ))),
        }
    }
}

/// Serialized form of an action: a name, or `false` to disable.
#[derive(Deserialize)]
#[serde(untagged)]
enum ActionSetting {
    Flag(bool),
    Name(String),
}

impl TryFrom<ActionSetting> for UnpermittedAction {
    type Error = ParamsError;

    fn try_from(setting: ActionSetting) -> Result<Self, Self::Error> {
        match setting {
            ActionSetting::Flag(false) => Ok(Self::Disabled),
            ActionSetting::Flag(true) => Err(ParamsError::InvalidConfig(
                "`true` is not an unpermitted-parameters action (expected false, log or raise)"
                    .to_string(),
            )),
            ActionSetting::Name(name) => name.parse(),
        }
    }
}

impl fmt::Display for UnpermittedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "false",
            Self::Log => "log",
            Self::Raise => "raise",
        })
    }
}

/// Configuration for [`Parameters::permit`](crate::Parameters::permit).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PermitConfig {
    pub action_on_unpermitted: UnpermittedAction,
    /// Top-level keys injected by the routing layer; never reported.
    pub always_permitted: Vec<String>,
}

impl Default for PermitConfig {
    fn default() -> Self {
        Self {
            action_on_unpermitted: UnpermittedAction::Disabled,
            always_permitted: vec!["controller".to_string(), "action".to_string()],
        }
    }
}

impl PermitConfig {
    pub fn with_action(action: UnpermittedAction) -> Self {
        Self {
            action_on_unpermitted: action,
            ..Default::default()
        }
    }

    /// Log in development and test, stay quiet everywhere else.
    pub fn for_environment(name: &str) -> Self {
        let action = match name {
            "development" | "test" => UnpermittedAction::Log,
            _ => UnpermittedAction::Disabled,
        };
        Self::with_action(action)
    }

    /// Reads [`ACTION_ENV_VAR`], falling back to the default for the
    /// environment named by [`ENVIRONMENT_ENV_VAR`].
    ///
    /// # Errors
    /// Returns an error if the action variable holds an unknown action.
    pub fn from_env() -> Result<Self, ParamsError> {
        if let Ok(action) = std::env::var(ACTION_ENV_VAR) {
            return Ok(Self::with_action(action.parse()?));
        }
        let environment = std::env::var(ENVIRONMENT_ENV_VAR).unwrap_or_default();
        Ok(Self::for_environment(&environment))
    }

    pub fn is_always_permitted(&self, key: &str) -> bool {
        self.always_permitted.iter().any(|k| k == key)
    }
}
