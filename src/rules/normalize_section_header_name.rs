//! Canonical spelling for section headers.

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{Node, Statement, StatementKind};
use crate::rules::{parse_bool, Rewrite, Rule};

const NAME: &str = "NormalizeSectionHeaderName";

/// Rewrites section headers to their canonical `*** Name ***` form.
///
/// Only the header name token is replaced; any trailing data-driven
/// column labels on the header line stay as they are.
#[derive(Debug)]
pub struct NormalizeSectionHeaderName {
    uppercase: bool,
}

impl NormalizeSectionHeaderName {
    #[must_use]
    pub fn new(uppercase: bool) -> Self {
        NormalizeSectionHeaderName { uppercase }
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut rule = NormalizeSectionHeaderName::new(false);
        for (key, value) in params {
            match key.as_str() {
                "uppercase" => rule.uppercase = parse_bool(NAME, "uppercase", value)?,
                _ => return Err(ConfigError::unknown_parameter(NAME, key)),
            }
        }
        Ok(rule)
    }
}

impl Rule for NormalizeSectionHeaderName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite_statement(
        &mut self,
        statement: &mut Statement,
        _context: &FormatContext,
    ) -> Rewrite<Node> {
        let StatementKind::SectionHeader(kind) = statement.kind else {
            return Rewrite::Keep;
        };
        let mut name = format!("*** {} ***", kind.canonical_name());
        if self.uppercase {
            name = name.to_uppercase();
        }
        if let Some(token) = statement.first_data_token_mut() {
            token.text = name;
        }
        Rewrite::Keep
    }
}
