//! Engine configuration and environment overrides.
//!
//! Defaults follow the strictest reading of the tree contract: re-parenting
//! is rejected, unregistering an unknown id is a no-op, and `blur` never
//! mutates focus state.
//!
//! | Variable | Values | Field |
//! |----------|--------|-------|
//! | `NAVTREE_REPARENT` | `reject` \| `ignore` | [`NavTreeConfig::reparent_policy`] |
//! | `NAVTREE_UNKNOWN_NODE` | `ignore` \| `error` | [`NavTreeConfig::unknown_node_policy`] |
//! | `NAVTREE_CLEAR_ON_BLUR` | `1/0/true/false/yes/no/on/off` | [`NavTreeConfig::clear_focus_on_blur`] |

use std::env;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const ENV_REPARENT: &str = "NAVTREE_REPARENT";
pub const ENV_UNKNOWN_NODE: &str = "NAVTREE_UNKNOWN_NODE";
pub const ENV_CLEAR_ON_BLUR: &str = "NAVTREE_CLEAR_ON_BLUR";

/// What `register` does when an existing id names a different parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReparentPolicy {
    /// Fail with [`FocusError::Reparent`](crate::FocusError::Reparent) and apply nothing.
    #[default]
    Reject,
    /// Keep the original placement, still apply non-structural options.
    Ignore,
}

impl ReparentPolicy {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Ignore => "ignore",
        }
    }
}

/// What `unregister` does with an id that is not registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnknownNodePolicy {
    #[default]
    Ignore,
    /// Fail with [`FocusError::UnknownNode`](crate::FocusError::UnknownNode).
    Error,
}

impl UnknownNodePolicy {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" => Some(Self::Ignore),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Error => "error",
        }
    }
}

/// Configuration for a [`FocusTree`](crate::FocusTree).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavTreeConfig {
    /// Handling of re-registration under a different parent.
    pub reparent_policy: ReparentPolicy,
    /// Handling of `unregister` for ids that are not registered.
    pub unknown_node_policy: UnknownNodePolicy,
    /// When set, a `blur` naming the current focus also clears it.
    pub clear_focus_on_blur: bool,
}

impl NavTreeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reparent_policy(mut self, policy: ReparentPolicy) -> Self {
        self.reparent_policy = policy;
        self
    }

    #[must_use]
    pub fn with_unknown_node_policy(mut self, policy: UnknownNodePolicy) -> Self {
        self.unknown_node_policy = policy;
        self
    }

    #[must_use]
    pub fn with_clear_focus_on_blur(mut self, enabled: bool) -> Self {
        self.clear_focus_on_blur = enabled;
        self
    }

    /// Parse config from environment variables, dropping diagnostics.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Short human-readable summary for debug overlays.
    #[must_use]
    pub fn summary_short(&self) -> String {
        let blur = if self.clear_focus_on_blur { "clears" } else { "notifies" };
        format!(
            "navtree: reparent={} · unknown={} · blur {blur}",
            self.reparent_policy.as_str(),
            self.unknown_node_policy.as_str()
        )
    }
}

/// Result of parsing configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigParse {
    pub config: NavTreeConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = NavTreeConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_REPARENT) {
        match ReparentPolicy::parse(&value) {
            Some(parsed) => config.reparent_policy = parsed,
            None => errors.push(ConfigError::new(
                "reparent_policy",
                value,
                "expected reject|ignore",
            )),
        }
    }

    if let Some(value) = get(ENV_UNKNOWN_NODE) {
        match UnknownNodePolicy::parse(&value) {
            Some(parsed) => config.unknown_node_policy = parsed,
            None => errors.push(ConfigError::new(
                "unknown_node_policy",
                value,
                "expected ignore|error",
            )),
        }
    }

    if let Some(value) = get(ENV_CLEAR_ON_BLUR) {
        match parse_bool(&value) {
            Some(parsed) => config.clear_focus_on_blur = parsed,
            None => errors.push(ConfigError::new(
                "clear_focus_on_blur",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    ConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
