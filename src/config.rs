//! Configuration management for rftidy.
//!
//! This module provides the [`TidyConfig`] struct which controls pipeline
//! behavior: global layout knobs (column separator width, line endings),
//! the optional line selection window, and the list of rule specs to run.
//! Configuration can be loaded from TOML (`rftidy.toml`) or built in code;
//! rule specs use the `Name` or `Name:param=value:param=value` syntax.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scope::SelectionWindow;

// Serde default functions
fn default_space_count() -> usize {
    4
}

/// Line terminator written by rules that fabricate lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        LineEnding::Lf
    }
}

/// Main configuration struct for rftidy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidyConfig {
    /// Number of spaces in a plain column separator (default: 4)
    #[serde(default = "default_space_count")]
    pub space_count: usize,

    /// Line terminator used for fabricated lines (default: lf)
    #[serde(default)]
    pub line_ending: LineEnding,

    /// First source line rules may modify, 1-based (default: unbounded)
    #[serde(default)]
    pub start_line: Option<usize>,

    /// Last source line rules may modify, 1-based (default: unbounded)
    #[serde(default)]
    pub end_line: Option<usize>,

    /// Rule specs to run, in order. Each spec is `Name` or
    /// `Name:param=value:param=value`. Empty means the default pipeline.
    #[serde(default)]
    pub transform: Vec<String>,
}

impl Default for TidyConfig {
    fn default() -> Self {
        TidyConfig {
            space_count: 4,
            line_ending: LineEnding::Lf,
            start_line: None,
            end_line: None,
            transform: Vec::new(),
        }
    }
}

impl TidyConfig {
    /// Maximum reasonable separator width
    const MAX_SPACE_COUNT: usize = 24;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.space_count == 0 {
            return Some("space_count must be at least 1".to_string());
        }
        if self.space_count > Self::MAX_SPACE_COUNT {
            return Some(format!(
                "space_count {} exceeds maximum of {}",
                self.space_count,
                Self::MAX_SPACE_COUNT
            ));
        }
        if self.start_line == Some(0) {
            return Some("start_line is 1-based and must be at least 1".to_string());
        }
        if self.end_line == Some(0) {
            return Some("end_line is 1-based and must be at least 1".to_string());
        }
        if let (Some(start), Some(end)) = (self.start_line, self.end_line) {
            if end < start {
                return Some(format!(
                    "end_line {end} is before start_line {start}"
                ));
            }
        }
        None
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: TidyConfig =
            toml::from_str(contents).context("failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// The selection window configured by `start_line`/`end_line`.
    #[must_use]
    pub fn window(&self) -> SelectionWindow {
        SelectionWindow::new(self.start_line, self.end_line)
    }
}

/// A parsed rule spec: the rule name plus its `param=value` pairs in
/// written order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: String,
    pub params: Vec<(String, String)>,
}

/// Parse a `Name` or `Name:param=value:param=value` rule spec.
///
/// Only the syntax is checked here; whether the name and parameters are
/// known is decided when the rule is built.
pub fn parse_rule_spec(spec: &str) -> Result<RuleSpec, ConfigError> {
    let mut fields = spec.split(':');
    let name = fields.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "invalid transform spec {spec:?}: missing rule name"
        )));
    }
    let mut params = Vec::new();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            return Err(ConfigError::Invalid(format!(
                "invalid transform spec {spec:?}: expected 'param=value', got {field:?}"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "invalid transform spec {spec:?}: empty parameter name"
            )));
        }
        params.push((key.to_string(), value.to_string()));
    }
    Ok(RuleSpec {
        name: name.to_string(),
        params,
    })
}

/// Per-run layout facts handed to every rule: separator width, line
/// terminator, and the selection window.
#[derive(Debug, Clone)]
pub struct FormatContext {
    pub space_count: usize,
    pub line_ending: LineEnding,
    pub window: SelectionWindow,
}

impl FormatContext {
    #[must_use]
    pub fn new(config: &TidyConfig) -> Self {
        FormatContext {
            space_count: config.space_count,
            line_ending: config.line_ending,
            window: config.window(),
        }
    }

    /// A plain column separator of the configured width.
    #[must_use]
    pub fn separator(&self) -> String {
        " ".repeat(self.space_count)
    }

    /// The configured line terminator text.
    #[must_use]
    pub fn eol(&self) -> &'static str {
        self.line_ending.as_str()
    }
}

impl Default for FormatContext {
    fn default() -> Self {
        FormatContext::new(&TidyConfig::default())
    }
}
