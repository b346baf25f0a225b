//! Blank-line normalization between sections, test cases and keywords.

use std::collections::VecDeque;

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{
    BlockKind, Document, IfBlock, Node, Section, SettingKind, Statement, StatementKind,
};
use crate::rules::{parse_bool, parse_usize, Rewrite, Rule};
use crate::scope::SelectionWindow;

const NAME: &str = "NormalizeNewLines";

/// Normalizes vertical whitespace across the document.
///
/// Blank lines directly after a section header and at the end of each
/// section, test case and keyword are dropped. Consecutive test cases are
/// separated by `test_case_lines` blank lines, keywords by `keyword_lines`
/// (which follows `test_case_lines` unless set), and sections by
/// `section_lines`. The last section always ends in exactly one blank line.
///
/// Templated suites commonly keep their test rows visually packed, so a
/// document with a `Test Template` setting is not padded between test
/// cases unless `separate_templated_tests` asks for it.
#[derive(Debug)]
pub struct NormalizeNewLines {
    test_case_lines: usize,
    keyword_lines: usize,
    section_lines: usize,
    separate_templated_tests: bool,
    pack_tests: bool,
    section_is_last: VecDeque<bool>,
}

impl NormalizeNewLines {
    #[must_use]
    pub fn new(
        test_case_lines: usize,
        keyword_lines: Option<usize>,
        section_lines: usize,
        separate_templated_tests: bool,
    ) -> Self {
        NormalizeNewLines {
            test_case_lines,
            keyword_lines: keyword_lines.unwrap_or(test_case_lines),
            section_lines,
            separate_templated_tests,
            pack_tests: false,
            section_is_last: VecDeque::new(),
        }
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut test_case_lines = 1;
        let mut keyword_lines = None;
        let mut section_lines = 1;
        let mut separate_templated_tests = false;
        for (key, value) in params {
            match key.as_str() {
                "test_case_lines" => {
                    test_case_lines = parse_usize(NAME, "test_case_lines", value)?;
                }
                "keyword_lines" => {
                    keyword_lines = Some(parse_usize(NAME, "keyword_lines", value)?);
                }
                "section_lines" => {
                    section_lines = parse_usize(NAME, "section_lines", value)?;
                }
                "separate_templated_tests" => {
                    separate_templated_tests =
                        parse_bool(NAME, "separate_templated_tests", value)?;
                }
                _ => return Err(ConfigError::unknown_parameter(NAME, key)),
            }
        }
        Ok(NormalizeNewLines::new(
            test_case_lines,
            keyword_lines,
            section_lines,
            separate_templated_tests,
        ))
    }
}

impl Rule for NormalizeNewLines {
    fn name(&self) -> &'static str {
        NAME
    }

    fn prepare(&mut self, document: &Document, context: &FormatContext) {
        self.pack_tests = !self.separate_templated_tests && is_templated(document);
        self.section_is_last.clear();
        let count = document.sections.len();
        for (index, section) in document.sections.iter().enumerate() {
            if context.window.is_in_scope(section.span()) {
                self.section_is_last.push_back(index + 1 == count);
            }
        }
    }

    fn rewrite_section(
        &mut self,
        section: &mut Section,
        context: &FormatContext,
    ) -> Rewrite<Section> {
        let is_last_section = self.section_is_last.pop_front().unwrap_or(false);

        trim_leading_blanks(&mut section.body, &context.window);
        trim_trailing_blanks(&mut section.body, &context.window);

        let last_block = section
            .body
            .iter()
            .rposition(|node| matches!(node, Node::Block(_)));
        for (index, node) in section.body.iter_mut().enumerate() {
            let Node::Block(block) = node else {
                continue;
            };
            if !context.window.is_in_scope(block.span()) {
                continue;
            }
            trim_leading_blanks(&mut block.body, &context.window);
            trim_trailing_blanks(&mut block.body, &context.window);
            if Some(index) == last_block {
                continue;
            }
            let pad = match block.kind {
                BlockKind::TestCase => {
                    if self.pack_tests {
                        0
                    } else {
                        self.test_case_lines
                    }
                }
                BlockKind::Keyword => self.keyword_lines,
            };
            for _ in 0..pad {
                block
                    .body
                    .push(Node::Statement(Statement::blank_line(context.eol())));
            }
        }

        let section_pad = if is_last_section { 1 } else { self.section_lines };
        for _ in 0..section_pad {
            section
                .body
                .push(Node::Statement(Statement::blank_line(context.eol())));
        }
        Rewrite::Keep
    }
}

/// A suite counts as templated when any `Test Template` setting names a
/// template keyword.
fn is_templated(document: &Document) -> bool {
    document
        .sections
        .iter()
        .any(|section| nodes_have_template(&section.body))
}

fn nodes_have_template(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Statement(statement) => {
            statement.kind == StatementKind::Setting(SettingKind::TestTemplate)
                && statement
                    .data_tokens()
                    .skip(1)
                    .any(|token| !token.text.is_empty())
        }
        Node::Block(block) => nodes_have_template(&block.body),
        Node::If(if_block) => if_has_template(if_block),
    })
}

fn if_has_template(if_block: &IfBlock) -> bool {
    nodes_have_template(&if_block.body)
        || if_block.orelse.as_deref().is_some_and(if_has_template)
}

fn is_blank_statement(node: &Node) -> bool {
    matches!(
        node,
        Node::Statement(statement) if statement.kind == StatementKind::EmptyLine
    )
}

fn trim_leading_blanks(nodes: &mut Vec<Node>, window: &SelectionWindow) {
    while let Some(node) = nodes.first() {
        if is_blank_statement(node) && window.is_in_scope(node.span()) {
            nodes.remove(0);
        } else {
            break;
        }
    }
}

fn trim_trailing_blanks(nodes: &mut Vec<Node>, window: &SelectionWindow) {
    while let Some(node) = nodes.last() {
        if is_blank_statement(node) && window.is_in_scope(node.span()) {
            nodes.pop();
        } else {
            break;
        }
    }
}
