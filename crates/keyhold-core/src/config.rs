//! Runtime configuration for a `Db` handle.
//!
//! Configuration is plain data: it can be built in code or loaded from a
//! TOML document. Every field has a default so partial documents are valid.

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use serde::Deserialize;
use thiserror::Error as ThisError;

/// Default cap on primary keys stored under one index value.
pub const DEFAULT_MAX_POSTING_KEYS: usize = 65_535;

/// Default upper bound on a stored record or posting-list payload.
pub const DEFAULT_MAX_VALUE_BYTES: usize = 4 * 1024 * 1024;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config field '{field}' must be greater than zero")]
    Zero { field: &'static str },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Config, err.to_string())
    }
}

///
/// DbConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// Emit `tracing` debug events for planning and scans.
    pub debug: bool,

    /// Maximum primary keys one posting list may hold.
    pub max_posting_keys: usize,

    /// Maximum encoded size accepted when decoding stored values.
    pub max_value_bytes: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_posting_keys: DEFAULT_MAX_POSTING_KEYS,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        }
    }
}

impl DbConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn with_max_posting_keys(mut self, max: usize) -> Self {
        self.max_posting_keys = max;
        self
    }

    #[must_use]
    pub const fn with_max_value_bytes(mut self, max: usize) -> Self {
        self.max_value_bytes = max;
        self
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_posting_keys == 0 {
            return Err(ConfigError::Zero {
                field: "max_posting_keys",
            });
        }
        if self.max_value_bytes == 0 {
            return Err(ConfigError::Zero {
                field: "max_value_bytes",
            });
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{ConfigError, DEFAULT_MAX_VALUE_BYTES, DbConfig};

    #[test]
    fn empty_document_yields_defaults() {
        let config = DbConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, DbConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = DbConfig::from_toml_str("debug = true\nmax_posting_keys = 16\n")
            .expect("partial config");

        assert!(config.debug);
        assert_eq!(config.max_posting_keys, 16);
        assert_eq!(config.max_value_bytes, DEFAULT_MAX_VALUE_BYTES);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = DbConfig::from_toml_str("verbose = true").expect_err("unknown field");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = DbConfig::from_toml_str("max_value_bytes = 0").expect_err("zero limit");
        assert!(matches!(
            err,
            ConfigError::Zero {
                field: "max_value_bytes"
            }
        ));
    }
}
