//! One assignment sign style per document.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{Document, IfBlock, Node, Statement, StatementKind, TokenKind};
use crate::rules::{Rewrite, Rule};

const NAME: &str = "AssignmentNormalizer";

static TRAILING_SIGN_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s?=$"));

/// Panics if the pattern is invalid. The patterns in this module are
/// compile-time constants exercised by tests, so the panic can only fire
/// on a broken build.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

/// Applies one assignment sign style to every variable definition and
/// keyword call return target.
///
/// With an explicit `equal_sign_type` the configured sign replaces
/// whatever each assignment carries. In the default autodetect mode each
/// document is first scanned on its own: when at least two distinct
/// styles occur, the most frequent wins (first one seen on a tie) and is
/// applied everywhere, while an already uniform document is left alone.
#[derive(Debug)]
pub struct AssignmentNormalizer {
    configured: Option<String>,
    document_sign: Option<String>,
}

impl AssignmentNormalizer {
    /// `sign` is the literal text appended after the closing brace, or
    /// `None` for per-document autodetection.
    #[must_use]
    pub fn new(sign: Option<String>) -> Self {
        AssignmentNormalizer {
            configured: sign,
            document_sign: None,
        }
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut configured = None;
        for (key, value) in params {
            match key.as_str() {
                "equal_sign_type" => configured = parse_equal_sign_type(value)?,
                _ => return Err(ConfigError::unknown_parameter(NAME, key)),
            }
        }
        Ok(AssignmentNormalizer::new(configured))
    }
}

fn parse_equal_sign_type(value: &str) -> Result<Option<String>, ConfigError> {
    match value {
        "remove" => Ok(Some(String::new())),
        "equal_sign" => Ok(Some("=".to_string())),
        "space_and_equal_sign" => Ok(Some(" =".to_string())),
        "autodetect" => Ok(None),
        _ => Err(ConfigError::invalid_parameter(
            NAME,
            "equal_sign_type",
            value,
            "remove, equal_sign, space_and_equal_sign or autodetect",
        )),
    }
}

impl Rule for AssignmentNormalizer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn prepare(&mut self, document: &Document, _context: &FormatContext) {
        self.document_sign = None;
        if self.configured.is_some() {
            return;
        }
        let mut counter: Vec<(String, usize)> = Vec::new();
        for section in &document.sections {
            scan_nodes(&section.body, &mut counter);
        }
        if counter.len() >= 2 {
            self.document_sign = counter
                .into_iter()
                .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
                .map(|(sign, _)| sign);
            if let Some(sign) = &self.document_sign {
                tracing::debug!(sign = sign.as_str(), "assignment sign autodetected");
            }
        }
    }

    fn rewrite_statement(
        &mut self,
        statement: &mut Statement,
        _context: &FormatContext,
    ) -> Rewrite<Node> {
        let Some(sign) = self.configured.as_ref().or(self.document_sign.as_ref()) else {
            return Rewrite::Keep;
        };
        let token = match statement.kind {
            StatementKind::KeywordCall => statement.last_token_of_kind_mut(TokenKind::Assign),
            StatementKind::Variable => statement.tokens_of_kind_mut(TokenKind::Variable).next(),
            _ => None,
        };
        if let Some(token) = token {
            let stripped = TRAILING_SIGN_RE.replace(&token.text, "");
            token.text = format!("{stripped}{sign}");
        }
        Rewrite::Keep
    }
}

fn scan_nodes(nodes: &[Node], counter: &mut Vec<(String, usize)>) {
    for node in nodes {
        match node {
            Node::Statement(statement) => tally_statement(statement, counter),
            Node::Block(block) => scan_nodes(&block.body, counter),
            Node::If(if_block) => scan_if(if_block, counter),
        }
    }
}

fn scan_if(if_block: &IfBlock, counter: &mut Vec<(String, usize)>) {
    scan_nodes(&if_block.body, counter);
    if let Some(orelse) = &if_block.orelse {
        scan_if(orelse, counter);
    }
}

fn tally_statement(statement: &Statement, counter: &mut Vec<(String, usize)>) {
    let token = match statement.kind {
        StatementKind::KeywordCall => statement.tokens_of_kind(TokenKind::Assign).last(),
        StatementKind::Variable => statement.first_token_of_kind(TokenKind::Variable),
        _ => None,
    };
    if let Some(token) = token {
        let sign = assignment_sign(&token.text);
        if let Some(entry) = counter.iter_mut().find(|(seen, _)| *seen == sign) {
            entry.1 += 1;
        } else {
            counter.push((sign, 1));
        }
    }
}

/// Everything after the closing brace of the variable name. A token
/// without a closing brace counts whole, so malformed names still tally
/// deterministically.
fn assignment_sign(text: &str) -> String {
    match text.find('}') {
        Some(index) => text[index + 1..].to_string(),
        None => text.to_string(),
    }
}
