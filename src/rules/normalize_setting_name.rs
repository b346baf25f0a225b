//! Canonical casing for setting names.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{Node, Statement, StatementKind};
use crate::rules::{Rewrite, Rule};

const NAME: &str = "NormalizeSettingName";

static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+"));

/// Panics if the pattern is invalid. The patterns in this module are
/// compile-time constants exercised by tests, so the panic can only fire
/// on a broken build.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

/// Title-cases setting names and collapses stray whitespace inside them,
/// so `force  tags` becomes `Force Tags` and `[ setup ]` becomes `[Setup]`.
///
/// A bracketed name missing its closing bracket is left untouched rather
/// than guessed at.
#[derive(Debug, Default)]
pub struct NormalizeSettingName;

impl NormalizeSettingName {
    #[must_use]
    pub fn new() -> Self {
        NormalizeSettingName
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        if let Some((key, _)) = params.first() {
            return Err(ConfigError::unknown_parameter(NAME, key));
        }
        Ok(NormalizeSettingName)
    }
}

impl Rule for NormalizeSettingName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite_statement(
        &mut self,
        statement: &mut Statement,
        _context: &FormatContext,
    ) -> Rewrite<Node> {
        if !matches!(statement.kind, StatementKind::Setting(_)) {
            return Rewrite::Keep;
        }
        let Some(token) = statement.first_data_token_mut() else {
            return Rewrite::Keep;
        };
        if let Some(normalized) = normalize_setting_text(&token.text) {
            token.text = normalized;
        }
        Rewrite::Keep
    }
}

fn normalize_setting_text(text: &str) -> Option<String> {
    if let Some(inner) = text.strip_prefix('[') {
        let inner = inner.strip_suffix(']')?;
        Some(format!("[{}]", canonical_words(inner)))
    } else {
        Some(canonical_words(text))
    }
}

fn canonical_words(name: &str) -> String {
    let collapsed = WHITESPACE_RUN_RE.replace_all(name.trim(), " ");
    title_case(&collapsed)
}

/// Uppercases each letter that does not follow another letter and
/// lowercases the rest, e.g. `FORCE TAGS` into `Force Tags`.
fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut prev_cased = false;
    for ch in value.chars() {
        if prev_cased {
            result.extend(ch.to_lowercase());
        } else {
            result.extend(ch.to_uppercase());
        }
        prev_cased = ch.is_alphabetic();
    }
    result
}
