//! Session configuration and controller options
//!
//! [`SessionConfig`] is what a worker sees for one run. [`ControllerOptions`]
//! tunes the run loop and is built through [`ControllerOptionsBuilder`] or read
//! from the environment.

use std::time::Duration;

use crate::error::{Result, SessionError};

use super::identifiers::ApiKey;

/// Upper bound accepted for iteration caps
pub const MAX_ALLOWED_UNITS: u32 = 1000;

/// Default broadcast buffer for log observers
pub const DEFAULT_LOG_CHANNEL_CAPACITY: usize = 256;

/// Environment variable for the iteration cap without an API key
pub const ENV_MAX_UNITS: &str = "KODEGEN_AGENT_MAX_UNITS";

/// Environment variable for the iteration cap with an API key
pub const ENV_MAX_UNITS_WITH_KEY: &str = "KODEGEN_AGENT_MAX_UNITS_WITH_KEY";

/// Environment variable for the pause between units, in milliseconds
pub const ENV_UNIT_DELAY_MS: &str = "KODEGEN_AGENT_UNIT_DELAY_MS";

// ============================================================================
// Session Config
// ============================================================================

/// Configuration of one session, as handed to the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Agent name
    pub name: String,
    /// Goal the agent pursues
    pub goal: String,
    /// Optional user-supplied API key
    pub api_key: Option<ApiKey>,
}

impl SessionConfig {
    /// Create a session config
    pub fn new(name: impl Into<String>, goal: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            api_key,
        }
    }

    /// Fail fast on an empty name or goal
    ///
    /// # Errors
    /// Returns `SessionError::InvalidConfiguration` naming the missing field
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SessionError::invalid_configuration("agent name is empty"));
        }
        if self.goal.is_empty() {
            return Err(SessionError::invalid_configuration("agent goal is empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Controller Options
// ============================================================================

/// Run loop tuning shared by every session of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Iteration cap for sessions without an API key (`None` = unlimited)
    pub max_units: Option<u32>,
    /// Iteration cap for sessions carrying an API key (`None` = unlimited)
    pub max_units_with_api_key: Option<u32>,
    /// Pause between consecutive units; interrupted by a stop request
    pub unit_delay: Duration,
    /// Broadcast buffer for log observers
    pub log_channel_capacity: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            max_units: None,
            max_units_with_api_key: None,
            unit_delay: Duration::ZERO,
            log_channel_capacity: DEFAULT_LOG_CHANNEL_CAPACITY,
        }
    }
}

impl ControllerOptions {
    /// Create a new builder for `ControllerOptions`
    #[must_use]
    pub fn builder() -> ControllerOptionsBuilder {
        ControllerOptionsBuilder::default()
    }

    /// Read options from `KODEGEN_AGENT_*` environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidConfig` when a variable is not a valid number,
    /// is a zero cap, or exceeds [`MAX_ALLOWED_UNITS`]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut options = Self::default();

        if let Some(raw) = lookup(ENV_MAX_UNITS) {
            options.max_units = Some(parse_units(ENV_MAX_UNITS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_MAX_UNITS_WITH_KEY) {
            options.max_units_with_api_key = Some(parse_units(ENV_MAX_UNITS_WITH_KEY, &raw)?);
        }
        if let Some(raw) = lookup(ENV_UNIT_DELAY_MS) {
            let ms = raw.trim().parse::<u64>().map_err(|e| {
                SessionError::invalid_config(format!("{ENV_UNIT_DELAY_MS}={raw:?}: {e}"))
            })?;
            options.unit_delay = Duration::from_millis(ms);
        }

        Ok(options)
    }

    /// Iteration cap applying to a session with or without an API key
    #[must_use]
    pub const fn unit_cap(&self, has_api_key: bool) -> Option<u32> {
        if has_api_key {
            self.max_units_with_api_key
        } else {
            self.max_units
        }
    }
}

fn parse_units(key: &str, raw: &str) -> Result<u32> {
    let units = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| SessionError::invalid_config(format!("{key}={raw:?}: {e}")))?;
    if units == 0 {
        return Err(SessionError::invalid_config(format!(
            "{key}=0: cap must be at least 1"
        )));
    }
    if units > MAX_ALLOWED_UNITS {
        return Err(SessionError::invalid_config(format!(
            "{key}={units} exceeds maximum allowed: {MAX_ALLOWED_UNITS}"
        )));
    }
    Ok(units)
}

// ============================================================================
// Builder for ControllerOptions
// ============================================================================

/// Builder for `ControllerOptions`
#[derive(Debug, Default)]
pub struct ControllerOptionsBuilder {
    options: ControllerOptions,
}

impl ControllerOptionsBuilder {
    /// Set the iteration cap for sessions without an API key
    ///
    /// # Panics
    /// Panics if units is zero or exceeds 1000
    #[must_use]
    pub fn max_units(mut self, units: u32) -> Self {
        assert!(units > 0, "max_units must be at least 1");
        assert!(
            units <= MAX_ALLOWED_UNITS,
            "max_units {units} exceeds maximum allowed: {MAX_ALLOWED_UNITS}"
        );
        self.options.max_units = Some(units);
        self
    }

    /// Set the iteration cap for sessions carrying an API key
    ///
    /// # Panics
    /// Panics if units is zero or exceeds 1000
    #[must_use]
    pub fn max_units_with_api_key(mut self, units: u32) -> Self {
        assert!(units > 0, "max_units_with_api_key must be at least 1");
        assert!(
            units <= MAX_ALLOWED_UNITS,
            "max_units_with_api_key {units} exceeds maximum allowed: {MAX_ALLOWED_UNITS}"
        );
        self.options.max_units_with_api_key = Some(units);
        self
    }

    /// Set the pause between units
    #[must_use]
    pub const fn unit_delay(mut self, delay: Duration) -> Self {
        self.options.unit_delay = delay;
        self
    }

    /// Set the log observer buffer size
    ///
    /// # Panics
    /// Panics if capacity is zero
    #[must_use]
    pub fn log_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "log_channel_capacity must be greater than zero");
        self.options.log_channel_capacity = capacity;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> ControllerOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_defaults_when_unset() {
        let options = ControllerOptions::from_lookup(lookup(&[])).unwrap();
        assert_eq!(options, ControllerOptions::default());
    }

    #[test]
    fn env_values_are_parsed() {
        let options = ControllerOptions::from_lookup(lookup(&[
            (ENV_MAX_UNITS, "4"),
            (ENV_MAX_UNITS_WITH_KEY, " 50 "),
            (ENV_UNIT_DELAY_MS, "1000"),
        ]))
        .unwrap();
        assert_eq!(options.unit_cap(false), Some(4));
        assert_eq!(options.unit_cap(true), Some(50));
        assert_eq!(options.unit_delay, Duration::from_secs(1));
    }

    #[test]
    fn env_rejects_garbage_and_overflow() {
        let err = ControllerOptions::from_lookup(lookup(&[(ENV_MAX_UNITS, "many")])).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
        let err = ControllerOptions::from_lookup(lookup(&[(ENV_MAX_UNITS_WITH_KEY, "5000")]))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
    }

    #[test]
    fn env_rejects_zero_cap() {
        let err = ControllerOptions::from_lookup(lookup(&[(ENV_MAX_UNITS, "0")])).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
    }

    #[test]
    #[should_panic(expected = "must be at least 1")]
    fn builder_rejects_zero_cap() {
        let _ = ControllerOptions::builder().max_units_with_api_key(0);
    }

    #[test]
    #[should_panic(expected = "exceeds maximum allowed")]
    fn builder_bounds_units() {
        let _ = ControllerOptions::builder().max_units(1001);
    }

    #[test]
    fn config_validation() {
        assert!(SessionConfig::new("Bot", "Write a poem", None).validate().is_ok());
        assert!(matches!(
            SessionConfig::new("", "goal", None).validate(),
            Err(SessionError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SessionConfig::new("Bot", "", None).validate(),
            Err(SessionError::InvalidConfiguration(_))
        ));
        // Only the empty string is rejected
        assert!(SessionConfig::new("  ", "  ", None).validate().is_ok());
    }
}
