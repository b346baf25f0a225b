//! Error types and result aliases for rftidy.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by fallible
//!   configuration-loading surfaces
//! - [`ConfigError`]: The single fatal error class of the engine, raised
//!   while building a pipeline and never during document transformation

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

/// Fatal configuration error raised at pipeline construction.
///
/// Document transformation itself never fails: a rule facing a structural
/// precondition it cannot satisfy leaves the node unchanged instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The rule name does not match any registered rule.
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    /// The parameter name is not declared by the rule.
    #[error("rule '{rule}' has no parameter '{parameter}'")]
    UnknownParameter { rule: String, parameter: String },

    /// The parameter value is outside its declared domain.
    #[error(
        "invalid value '{value}' for parameter '{parameter}' of rule '{rule}': \
         accepted values are {accepted}"
    )]
    InvalidParameter {
        rule: String,
        parameter: String,
        value: String,
        accepted: String,
    },

    /// A run-level configuration problem (bad rule spec, inverted selection
    /// window, out-of-range separator width).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Build an [`ConfigError::InvalidParameter`] without the call-site noise
    /// of four `to_string()` conversions.
    #[must_use]
    pub fn invalid_parameter(rule: &str, parameter: &str, value: &str, accepted: &str) -> Self {
        ConfigError::InvalidParameter {
            rule: rule.to_string(),
            parameter: parameter.to_string(),
            value: value.to_string(),
            accepted: accepted.to_string(),
        }
    }

    /// Build an [`ConfigError::UnknownParameter`].
    #[must_use]
    pub fn unknown_parameter(rule: &str, parameter: &str) -> Self {
        ConfigError::UnknownParameter {
            rule: rule.to_string(),
            parameter: parameter.to_string(),
        }
    }
}
