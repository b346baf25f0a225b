//! Rewrite rules and the tree walker that drives them.
//!
//! A rule is a stateful visitor implementing [`Rule`]. The walker owns all
//! recursion: it calls [`Rule::prepare`] once per document, then visits the
//! tree parent-first, offering each node to the matching hook and splicing
//! the returned [`Rewrite`] back into place. Hooks never recurse
//! themselves; when a hook replaces a node, the walker descends into the
//! replacement, so rewrites that fabricate nested structure converge in a
//! single pass.
//!
//! The selection window is enforced here: a node whose span falls outside
//! the window is never offered to a hook, but its children are still
//! walked, since a child may lie inside the window even when its parent
//! straddles it.

pub mod align_variables_section;
pub mod assignment_normalizer;
pub mod discard_empty_sections;
pub mod normalize_new_lines;
pub mod normalize_section_header_name;
pub mod normalize_setting_name;
pub mod remove_empty_settings;
pub mod replace_run_keyword_if;

pub use align_variables_section::AlignVariablesSection;
pub use assignment_normalizer::AssignmentNormalizer;
pub use discard_empty_sections::DiscardEmptySections;
pub use normalize_new_lines::NormalizeNewLines;
pub use normalize_section_header_name::NormalizeSectionHeaderName;
pub use normalize_setting_name::NormalizeSettingName;
pub use remove_empty_settings::RemoveEmptySettings;
pub use replace_run_keyword_if::ReplaceRunKeywordIf;

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{Block, Document, IfBlock, Node, Section, Statement, Token};

/// Outcome of offering a node to a rule hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite<T> {
    /// Leave the node as the hook left it (hooks mutate in place).
    Keep,
    /// Splice this value in where the node was.
    Replace(T),
    /// Drop the node and everything under it.
    Remove,
}

/// A rewrite rule.
///
/// Rules are stateful: anything accumulated while walking one document must
/// be reset in [`Rule::prepare`], which runs before the walk and is also
/// the place for whole-document pre-scans.
pub trait Rule {
    /// Registry name of this rule.
    fn name(&self) -> &'static str;

    /// Reset per-document state and pre-scan the document.
    fn prepare(&mut self, _document: &Document, _context: &FormatContext) {}

    fn rewrite_section(
        &mut self,
        _section: &mut Section,
        _context: &FormatContext,
    ) -> Rewrite<Section> {
        Rewrite::Keep
    }

    fn rewrite_block(&mut self, _block: &mut Block, _context: &FormatContext) -> Rewrite<Node> {
        Rewrite::Keep
    }

    fn rewrite_if(&mut self, _if_block: &mut IfBlock, _context: &FormatContext) -> Rewrite<Node> {
        Rewrite::Keep
    }

    fn rewrite_statement(
        &mut self,
        _statement: &mut Statement,
        _context: &FormatContext,
    ) -> Rewrite<Node> {
        Rewrite::Keep
    }
}

/// Run one rule over a whole document.
pub fn walk_document(rule: &mut dyn Rule, document: &mut Document, context: &FormatContext) {
    rule.prepare(document, context);
    let sections = std::mem::take(&mut document.sections);
    let mut kept = Vec::with_capacity(sections.len());
    for mut section in sections {
        if context.window.is_in_scope(section.span()) {
            match rule.rewrite_section(&mut section, context) {
                Rewrite::Keep => {}
                Rewrite::Replace(replacement) => section = replacement,
                Rewrite::Remove => continue,
            }
        }
        walk_section_children(rule, &mut section, context);
        kept.push(section);
    }
    document.sections = kept;
}

fn walk_section_children(rule: &mut dyn Rule, section: &mut Section, context: &FormatContext) {
    if let Some(header) = &mut section.header {
        visit_slot_statement(rule, header, context);
    }
    walk_nodes(rule, &mut section.body, context);
}

/// Offer a statement that fills a structural slot (a section, block or
/// branch header). Slots cannot be emptied, so `Remove` is ignored and
/// only a statement may replace a statement.
fn visit_slot_statement(rule: &mut dyn Rule, statement: &mut Statement, context: &FormatContext) {
    if !context.window.is_in_scope(statement.span()) {
        return;
    }
    if let Rewrite::Replace(Node::Statement(replacement)) =
        rule.rewrite_statement(statement, context)
    {
        *statement = replacement;
    }
}

fn walk_nodes(rule: &mut dyn Rule, nodes: &mut Vec<Node>, context: &FormatContext) {
    let taken = std::mem::take(nodes);
    let mut kept: Vec<Node> = Vec::with_capacity(taken.len());
    for mut node in taken {
        let rewrite = if context.window.is_in_scope(node.span()) {
            match &mut node {
                Node::Statement(statement) => rule.rewrite_statement(statement, context),
                Node::Block(block) => rule.rewrite_block(block, context),
                Node::If(if_block) => rule.rewrite_if(if_block, context),
            }
        } else {
            Rewrite::Keep
        };
        match rewrite {
            Rewrite::Keep => {
                walk_node_children(rule, &mut node, context);
                kept.push(node);
            }
            Rewrite::Replace(mut replacement) => {
                walk_node_children(rule, &mut replacement, context);
                kept.push(replacement);
            }
            Rewrite::Remove => {}
        }
    }
    *nodes = kept;
}

fn walk_node_children(rule: &mut dyn Rule, node: &mut Node, context: &FormatContext) {
    match node {
        Node::Statement(_) => {}
        Node::Block(block) => {
            visit_slot_statement(rule, &mut block.header, context);
            walk_nodes(rule, &mut block.body, context);
        }
        Node::If(if_block) => walk_if_children(rule, if_block, context),
    }
}

fn walk_if_children(rule: &mut dyn Rule, if_block: &mut IfBlock, context: &FormatContext) {
    visit_slot_statement(rule, &mut if_block.header, context);
    walk_nodes(rule, &mut if_block.body, context);
    if let Some(orelse) = if_block.orelse.take() {
        let mut orelse = *orelse;
        let rewrite = if context.window.is_in_scope(orelse.span()) {
            rule.rewrite_if(&mut orelse, context)
        } else {
            Rewrite::Keep
        };
        match rewrite {
            Rewrite::Remove => {}
            Rewrite::Replace(Node::If(mut replacement)) => {
                walk_if_children(rule, &mut replacement, context);
                if_block.orelse = Some(Box::new(replacement));
            }
            // A branch slot only holds a branch; other replacements are
            // ignored.
            Rewrite::Keep | Rewrite::Replace(_) => {
                walk_if_children(rule, &mut orelse, context);
                if_block.orelse = Some(Box::new(orelse));
            }
        }
    }
    if let Some(mut end) = if_block.end.take() {
        let keep = if context.window.is_in_scope(end.span()) {
            match rule.rewrite_statement(&mut end, context) {
                Rewrite::Keep => true,
                Rewrite::Replace(Node::Statement(replacement)) => {
                    end = replacement;
                    true
                }
                Rewrite::Replace(_) => true,
                Rewrite::Remove => false,
            }
        } else {
            true
        };
        if keep {
            if_block.end = Some(end);
        }
    }
}

/// Every rule known to the registry, in default pipeline order.
///
/// The order is chosen so one run reaches a fixed point: settings are
/// emptied before empty sections are discarded, structure rewrites come
/// before token cosmetics, and whitespace normalization runs last over
/// whatever the earlier rules produced.
pub const DEFAULT_RULES: [RuleKind; 8] = [
    RuleKind::RemoveEmptySettings,
    RuleKind::DiscardEmptySections,
    RuleKind::ReplaceRunKeywordIf,
    RuleKind::AssignmentNormalizer,
    RuleKind::NormalizeSettingName,
    RuleKind::NormalizeSectionHeaderName,
    RuleKind::AlignVariablesSection,
    RuleKind::NormalizeNewLines,
];

/// Identifier of a registered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    RemoveEmptySettings,
    DiscardEmptySections,
    ReplaceRunKeywordIf,
    AssignmentNormalizer,
    NormalizeSettingName,
    NormalizeSectionHeaderName,
    AlignVariablesSection,
    NormalizeNewLines,
}

impl RuleKind {
    /// Registry name, as written in a rule spec.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::RemoveEmptySettings => "RemoveEmptySettings",
            RuleKind::DiscardEmptySections => "DiscardEmptySections",
            RuleKind::ReplaceRunKeywordIf => "ReplaceRunKeywordIf",
            RuleKind::AssignmentNormalizer => "AssignmentNormalizer",
            RuleKind::NormalizeSettingName => "NormalizeSettingName",
            RuleKind::NormalizeSectionHeaderName => "NormalizeSectionHeaderName",
            RuleKind::AlignVariablesSection => "AlignVariablesSection",
            RuleKind::NormalizeNewLines => "NormalizeNewLines",
        }
    }

    /// Look up a rule by its registry name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<RuleKind> {
        DEFAULT_RULES.into_iter().find(|kind| kind.name() == name)
    }

    /// Build the rule with the given `param=value` pairs, validating every
    /// parameter eagerly.
    pub fn build(self, params: &[(String, String)]) -> Result<Box<dyn Rule>, ConfigError> {
        Ok(match self {
            RuleKind::RemoveEmptySettings => Box::new(RemoveEmptySettings::from_params(params)?),
            RuleKind::DiscardEmptySections => Box::new(DiscardEmptySections::from_params(params)?),
            RuleKind::ReplaceRunKeywordIf => Box::new(ReplaceRunKeywordIf::from_params(params)?),
            RuleKind::AssignmentNormalizer => Box::new(AssignmentNormalizer::from_params(params)?),
            RuleKind::NormalizeSettingName => Box::new(NormalizeSettingName::from_params(params)?),
            RuleKind::NormalizeSectionHeaderName => {
                Box::new(NormalizeSectionHeaderName::from_params(params)?)
            }
            RuleKind::AlignVariablesSection => {
                Box::new(AlignVariablesSection::from_params(params)?)
            }
            RuleKind::NormalizeNewLines => Box::new(NormalizeNewLines::from_params(params)?),
        })
    }
}

/// Parse a boolean rule parameter.
pub(crate) fn parse_bool(
    rule: &'static str,
    parameter: &'static str,
    value: &str,
) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" | "1" => Ok(true),
        "false" | "no" | "n" | "f" | "0" => Ok(false),
        _ => Err(ConfigError::invalid_parameter(
            rule,
            parameter,
            value,
            "true or false",
        )),
    }
}

/// Parse a non-negative integer rule parameter.
pub(crate) fn parse_usize(
    rule: &'static str,
    parameter: &'static str,
    value: &str,
) -> Result<usize, ConfigError> {
    value.parse().map_err(|_| {
        ConfigError::invalid_parameter(rule, parameter, value, "a non-negative integer")
    })
}

/// Lowercase a name and strip spaces and underscores, for keyword and
/// setting name comparisons.
#[must_use]
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '_'], "")
}

/// Interleave data tokens with plain separators into a full statement
/// line: `indent + separator`, then the tokens separated by `separator`,
/// then the line terminator.
pub(crate) fn insert_separators(
    indent: &str,
    tokens: Vec<Token>,
    separator_width: usize,
    eol: &str,
) -> Vec<Token> {
    let separator = " ".repeat(separator_width);
    let count = tokens.len();
    let mut out = Vec::with_capacity(count * 2 + 2);
    out.push(Token::separator(format!("{indent}{separator}")));
    for (index, token) in tokens.into_iter().enumerate() {
        out.push(token);
        if index + 1 < count {
            out.push(Token::separator(separator.clone()));
        }
    }
    out.push(Token::eol(eol));
    out
}
