//! Column alignment for variables sections.

use std::collections::{HashMap, HashSet};

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{Node, Section, SectionKind, Statement, StatementKind, Token, TokenKind};
use crate::rules::{parse_usize, Rewrite, Rule};

const NAME: &str = "AlignVariablesSection";

/// Aligns variable definitions so the leading columns line up:
///
/// ```text
/// *** Variables ***
/// ${VAR}            1
/// ${LONGER_NAME}    2
/// &{MULTILINE}      a=b
/// ...               b=c
/// ```
///
/// The first `up_to_column` columns are padded to the widest token in that
/// column, rounded up to a multiple of four; `up_to_column=0` aligns every
/// column. Remaining columns use the flat configured separator, and
/// `min_width` switches the aligned columns to a fixed width instead of
/// the measured one. Rows whose variable sigil is listed in `skip_types`
/// keep their spacing as written.
#[derive(Debug)]
pub struct AlignVariablesSection {
    /// Index of the first column that is not aligned; `None` aligns all.
    boundary: Option<usize>,
    min_width: Option<usize>,
    skip_sigils: HashSet<char>,
}

impl AlignVariablesSection {
    #[must_use]
    pub fn new(up_to_column: usize, min_width: Option<usize>, skip_sigils: HashSet<char>) -> Self {
        AlignVariablesSection {
            boundary: up_to_column.checked_sub(1),
            min_width: min_width.filter(|width| *width > 0),
            skip_sigils,
        }
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut up_to_column = 2;
        let mut min_width = None;
        let mut skip_sigils = HashSet::new();
        for (key, value) in params {
            match key.as_str() {
                "up_to_column" => up_to_column = parse_usize(NAME, "up_to_column", value)?,
                "min_width" => min_width = Some(parse_usize(NAME, "min_width", value)?),
                "skip_types" => skip_sigils = parse_skip_types(value)?,
                _ => return Err(ConfigError::unknown_parameter(NAME, key)),
            }
        }
        Ok(AlignVariablesSection::new(
            up_to_column,
            min_width,
            skip_sigils,
        ))
    }

    fn should_align(&self, statement: &Statement) -> bool {
        let Some(name) = statement.first_token_of_kind(TokenKind::Variable) else {
            return true;
        };
        match name.text.chars().next() {
            Some(sigil) => !self.skip_sigils.contains(&sigil),
            None => true,
        }
    }

    /// Longest token per aligned column across all rows, rounded up to the
    /// next multiple of four. The unbounded measurement deliberately spans
    /// the whole row, trailing tokens included.
    fn build_lookup(&self, slots: &[Slot]) -> HashMap<usize, usize> {
        let mut widths: HashMap<usize, usize> = HashMap::new();
        for slot in slots {
            let Slot::Rows(rows) = slot else {
                continue;
            };
            for row in rows {
                let up_to = self.boundary.unwrap_or(row.len());
                for (index, token) in row.iter().take(up_to).enumerate() {
                    let chars = token.text.chars().count();
                    let entry = widths.entry(index).or_insert(0);
                    *entry = (*entry).max(chars);
                }
            }
        }
        widths
            .into_iter()
            .map(|(index, width)| (index, round_to_four(width)))
            .collect()
    }

    /// Re-emit one variable definition from its per-line rows, merged back
    /// into a single statement.
    fn align_rows(
        &self,
        rows: Vec<Vec<Token>>,
        lookup: &HashMap<usize, usize>,
        context: &FormatContext,
    ) -> Statement {
        let mut tokens: Vec<Token> = Vec::new();
        for mut row in rows {
            if is_blank_row(&row) {
                if let Some(last) = row.last_mut() {
                    last.text = last.text.trim_start_matches([' ', '\t']).to_string();
                }
                tokens.extend(row);
                continue;
            }
            let up_to = self.boundary.unwrap_or(row.len() - 2);
            let mut tail = row.split_off(row.len() - 2).into_iter();
            for (index, token) in row.into_iter().enumerate() {
                let width = self.separator_width(index, up_to, &token, lookup, context);
                tokens.push(token);
                tokens.push(Token::separator(" ".repeat(width)));
            }
            if let Some(mut last) = tail.next() {
                if !last.text.is_empty() {
                    last.text = last.text.trim().to_string();
                }
                tokens.push(last);
            }
            tokens.extend(tail);
        }
        Statement::from_tokens(StatementKind::Variable, tokens)
    }

    fn separator_width(
        &self,
        index: usize,
        up_to: usize,
        token: &Token,
        lookup: &HashMap<usize, usize>,
        context: &FormatContext,
    ) -> usize {
        if index >= up_to {
            return context.space_count;
        }
        let chars = token.text.chars().count();
        if let Some(min_width) = self.min_width {
            return min_width.saturating_sub(chars).max(context.space_count);
        }
        let width = lookup.get(&index).copied().unwrap_or(0);
        width.saturating_sub(chars) + 4
    }
}

impl Rule for AlignVariablesSection {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite_section(
        &mut self,
        section: &mut Section,
        context: &FormatContext,
    ) -> Rewrite<Section> {
        if section.kind != SectionKind::Variables {
            return Rewrite::Keep;
        }
        let has_alignable = section.body.iter().any(|node| {
            let Node::Statement(statement) = node else {
                return false;
            };
            context.window.is_in_scope(statement.span())
                && statement.kind == StatementKind::Variable
                && self.should_align(statement)
        });
        if !has_alignable {
            // Comments and blank lines are still pushed to the left margin
            // even when there is nothing to align against.
            for node in &mut section.body {
                let Some(statement) = node.as_statement_mut() else {
                    continue;
                };
                if context.window.is_in_scope(statement.span())
                    && matches!(
                        statement.kind,
                        StatementKind::EmptyLine | StatementKind::Comment
                    )
                {
                    left_align(statement);
                }
            }
            return Rewrite::Keep;
        }
        let body = std::mem::take(&mut section.body);
        let mut slots: Vec<Slot> = Vec::with_capacity(body.len());
        for node in body {
            match node {
                Node::Statement(mut statement)
                    if context.window.is_in_scope(statement.span()) =>
                {
                    match statement.kind {
                        StatementKind::EmptyLine | StatementKind::Comment => {
                            left_align(&mut statement);
                            slots.push(Slot::Pass(Node::Statement(statement)));
                        }
                        StatementKind::Variable if self.should_align(&statement) => {
                            slots.push(Slot::Rows(statement_rows(statement)));
                        }
                        _ => slots.push(Slot::Pass(Node::Statement(statement))),
                    }
                }
                other => slots.push(Slot::Pass(other)),
            }
        }
        let lookup = self.build_lookup(&slots);
        section.body = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Pass(node) => node,
                Slot::Rows(rows) => Node::Statement(self.align_rows(rows, &lookup, context)),
            })
            .collect();
        Rewrite::Keep
    }
}

/// A section child mid-alignment: either passed through as-is or reshaped
/// into one row of tokens per physical line.
enum Slot {
    Pass(Node),
    Rows(Vec<Vec<Token>>),
}

fn parse_skip_types(value: &str) -> Result<HashSet<char>, ConfigError> {
    let mut sigils = HashSet::new();
    if value.is_empty() {
        return Ok(sigils);
    }
    for name in value.split(',') {
        let sigil = match name {
            "dict" => '&',
            "list" => '@',
            "scalar" => '$',
            _ => {
                return Err(ConfigError::invalid_parameter(
                    NAME,
                    "skip_types",
                    name,
                    "a comma separated list of dict, list and scalar",
                ))
            }
        };
        sigils.insert(sigil);
    }
    Ok(sigils)
}

/// Split a statement into one row per physical line, dropping separators.
/// A row keeps its line terminator; a leading empty variable marker is
/// dropped and a leading argument is trimmed.
fn statement_rows(statement: Statement) -> Vec<Vec<Token>> {
    let mut rows: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    for token in statement.tokens {
        if token.kind == TokenKind::Separator {
            continue;
        }
        let is_eol = token.kind == TokenKind::Eol;
        current.push(token);
        if is_eol {
            rows.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    for row in &mut rows {
        let drop_first = row
            .first()
            .is_some_and(|first| first.kind == TokenKind::Variable && first.text.is_empty());
        if drop_first {
            row.remove(0);
        } else if let Some(first) = row.first_mut() {
            if first.kind == TokenKind::Argument {
                first.text = first.text.trim().to_string();
            }
        }
    }
    rows
}

/// A continuation line with no content of its own: only its terminator is
/// normalized, nothing is re-padded.
fn is_blank_row(row: &[Token]) -> bool {
    if row.len() < 2 {
        return true;
    }
    row.iter().all(|token| {
        matches!(token.kind, TokenKind::Continuation | TokenKind::Eol)
            || token.text.trim().is_empty()
    })
}

fn left_align(statement: &mut Statement) {
    if let Some(token) = statement.tokens.first_mut() {
        token.text = token.text.trim_start_matches([' ', '\t']).to_string();
    }
}

fn round_to_four(width: usize) -> usize {
    match width % 4 {
        0 => width,
        rem => width + 4 - rem,
    }
}
