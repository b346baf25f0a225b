//! Removal of sections that carry no content.

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{Node, Section, SectionKind, StatementKind};
use crate::rules::{parse_bool, Rewrite, Rule};

const NAME: &str = "DiscardEmptySections";

/// Removes sections whose body is nothing but blank lines.
///
/// With `allow_only_comments=false`, sections holding only comments are
/// removed as well. The dedicated comments section is exempt from that:
/// its whole point is holding comments, so only a fully blank one goes.
#[derive(Debug)]
pub struct DiscardEmptySections {
    allow_only_comments: bool,
}

impl DiscardEmptySections {
    #[must_use]
    pub fn new(allow_only_comments: bool) -> Self {
        DiscardEmptySections {
            allow_only_comments,
        }
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut rule = DiscardEmptySections::new(true);
        for (key, value) in params {
            match key.as_str() {
                "allow_only_comments" => {
                    rule.allow_only_comments = parse_bool(NAME, "allow_only_comments", value)?;
                }
                _ => return Err(ConfigError::unknown_parameter(NAME, key)),
            }
        }
        Ok(rule)
    }
}

impl Rule for DiscardEmptySections {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite_section(
        &mut self,
        section: &mut Section,
        _context: &FormatContext,
    ) -> Rewrite<Section> {
        let comments_are_content =
            self.allow_only_comments || section.kind == SectionKind::Comments;
        let removable = section.body.iter().all(|node| {
            let Node::Statement(statement) = node else {
                return false;
            };
            match statement.kind {
                StatementKind::EmptyLine => true,
                StatementKind::Comment => !comments_are_content,
                _ => false,
            }
        });
        if removable {
            Rewrite::Remove
        } else {
            Rewrite::Keep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TidyConfig;
    use crate::model::{Block, BlockKind, Document, Statement, Token, TokenKind};
    use crate::rules::walk_document;

    fn section(kind: SectionKind, body: Vec<Node>) -> Section {
        Section::new(kind, Some(Statement::section_header(kind, 1)), body)
    }

    fn blank(line: usize) -> Node {
        Node::Statement(Statement::row(StatementKind::EmptyLine, line, "", vec![]))
    }

    fn comment(line: usize) -> Node {
        Node::Statement(Statement::row(
            StatementKind::Comment,
            line,
            "",
            vec![Token::new(TokenKind::Comment, "# note")],
        ))
    }

    fn run(rule: &mut DiscardEmptySections, document: &mut Document) {
        walk_document(rule, document, &FormatContext::default());
    }

    #[test]
    fn test_blank_only_section_is_removed() {
        let mut document = Document::new(vec![section(
            SectionKind::Settings,
            vec![blank(2), blank(3)],
        )]);
        run(&mut DiscardEmptySections::new(true), &mut document);
        assert!(document.sections.is_empty());
    }

    #[test]
    fn test_header_only_section_is_removed() {
        let mut document = Document::new(vec![section(SectionKind::Variables, vec![])]);
        run(&mut DiscardEmptySections::new(true), &mut document);
        assert!(document.sections.is_empty());
    }

    #[test]
    fn test_comment_only_section_kept_by_default() {
        let mut document = Document::new(vec![section(SectionKind::Variables, vec![comment(2)])]);
        run(&mut DiscardEmptySections::new(true), &mut document);
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn test_comment_only_section_removed_when_disallowed() {
        let mut document = Document::new(vec![section(
            SectionKind::Variables,
            vec![comment(2), blank(3)],
        )]);
        run(&mut DiscardEmptySections::new(false), &mut document);
        assert!(document.sections.is_empty());
    }

    #[test]
    fn test_comments_section_survives_even_when_comments_disallowed() {
        let mut document = Document::new(vec![section(SectionKind::Comments, vec![comment(2)])]);
        run(&mut DiscardEmptySections::new(false), &mut document);
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn test_section_with_block_is_kept() {
        let block = Block::new(
            BlockKind::TestCase,
            Statement::row(
                StatementKind::TestCaseName,
                2,
                "",
                vec![Token::new(TokenKind::TestCaseName, "Test")],
            ),
            vec![Node::Statement(Statement::row(
                StatementKind::KeywordCall,
                3,
                "    ",
                vec![Token::new(TokenKind::Keyword, "No Operation")],
            ))],
        );
        let mut document = Document::new(vec![section(
            SectionKind::TestCases,
            vec![Node::Block(block)],
        )]);
        run(&mut DiscardEmptySections::new(true), &mut document);
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn test_out_of_window_section_is_kept() {
        let mut document = Document::new(vec![
            section(SectionKind::Settings, vec![blank(2)]),
            section_on_lines(SectionKind::Variables, 5, vec![blank(6)]),
        ]);
        let context = FormatContext::new(&TidyConfig {
            start_line: Some(5),
            end_line: Some(6),
            ..Default::default()
        });
        walk_document(&mut DiscardEmptySections::new(true), &mut document, &context);
        assert_eq!(document.sections.len(), 1);
        assert_eq!(document.sections[0].kind, SectionKind::Settings);
    }

    fn section_on_lines(kind: SectionKind, line: usize, body: Vec<Node>) -> Section {
        Section::new(kind, Some(Statement::section_header(kind, line)), body)
    }

    #[test]
    fn test_from_params_rejects_unknown_parameter() {
        let err = DiscardEmptySections::from_params(&[("nope".to_string(), "1".to_string())])
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_from_params_rejects_invalid_bool() {
        let err = DiscardEmptySections::from_params(&[(
            "allow_only_comments".to_string(),
            "maybe".to_string(),
        )])
        .unwrap_err();
        assert!(err.to_string().contains("allow_only_comments"));
        assert!(err.to_string().contains("maybe"));
    }
}
