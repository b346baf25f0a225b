//! Pipeline construction and execution.
//!
//! A [`Pipeline`] is built once per run from a [`TidyConfig`]: every rule
//! spec is parsed, resolved against the registry, and its parameters
//! validated before any document is touched. A configuration problem is
//! therefore fatal for the whole run, never discovered halfway through a
//! file list. The built pipeline then transforms any number of documents,
//! threading each tree through every rule in order.

use std::fmt;

use crate::config::{parse_rule_spec, FormatContext, TidyConfig};
use crate::error::ConfigError;
use crate::model::Document;
use crate::rules::{walk_document, Rule, RuleKind, DEFAULT_RULES};

/// An ordered list of configured rules plus the layout context they run
/// under.
pub struct Pipeline {
    rules: Vec<Box<dyn Rule>>,
    context: FormatContext,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("rules", &self.rule_names())
            .field("context", &self.context)
            .finish()
    }
}

impl Pipeline {
    /// Build a pipeline from a configuration.
    ///
    /// An empty `transform` list means the full default rule set in default
    /// order. Every parameter of every listed rule is validated here;
    /// nothing is deferred to transform time.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for out-of-range layout values, malformed
    /// rule specs, unknown rule names, and unknown or invalid rule
    /// parameters.
    pub fn new(config: &TidyConfig) -> Result<Self, ConfigError> {
        if let Some(message) = config.validate() {
            return Err(ConfigError::Invalid(message));
        }
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        if config.transform.is_empty() {
            for kind in DEFAULT_RULES {
                rules.push(kind.build(&[])?);
            }
        } else {
            for entry in &config.transform {
                let spec = parse_rule_spec(entry)?;
                let kind = RuleKind::from_name(&spec.name).ok_or_else(|| {
                    ConfigError::UnknownRule {
                        name: spec.name.clone(),
                    }
                })?;
                rules.push(kind.build(&spec.params)?);
            }
        }
        tracing::debug!(rules = rules.len(), "pipeline constructed");
        Ok(Pipeline {
            rules,
            context: FormatContext::new(config),
        })
    }

    /// Registry names of the configured rules, in execution order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// The layout context the pipeline passes to every rule.
    #[must_use]
    pub fn context(&self) -> &FormatContext {
        &self.context
    }

    /// Run every rule over the document, in order.
    ///
    /// Each rule sees the tree exactly as the previous rule left it. The
    /// pipeline may be reused across documents; rules reset their
    /// per-document state at the start of each traversal.
    pub fn transform(&mut self, document: &mut Document) {
        for rule in &mut self.rules {
            tracing::debug!(rule = rule.name(), "running rule");
            walk_document(rule.as_mut(), document, &self.context);
        }
    }
}

/// Build a pipeline from the configuration and run it once over the
/// document.
///
/// # Errors
///
/// Fails only on configuration problems, before the document is touched.
pub fn tidy_document(config: &TidyConfig, document: &mut Document) -> crate::Result<()> {
    let mut pipeline = Pipeline::new(config)?;
    pipeline.transform(document);
    Ok(())
}
