//! Removal of settings with no value.

use std::collections::HashSet;

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{
    Document, IfBlock, Node, SettingKind, Statement, StatementKind, Token, TokenKind,
};
use crate::rules::{parse_bool, Rewrite, Rule};

const NAME: &str = "RemoveEmptySettings";

/// Which empty settings are eligible for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkMode {
    /// Keep empty settings that overwrite an active suite-level default.
    OverwriteOk,
    /// Remove every empty setting.
    Always,
}

/// Removes settings that name no value.
///
/// In [`WorkMode::OverwriteOk`] an empty local setting whose suite-level
/// counterpart is in force is kept: deleting it would silently re-enable
/// the suite default the author opted out of. Such settings are rewritten
/// to carry an explicit `NONE` value instead, unless `more_explicit` is
/// off, in which case they stay as written.
#[derive(Debug)]
pub struct RemoveEmptySettings {
    work_mode: WorkMode,
    more_explicit: bool,
    active_overrides: HashSet<SettingKind>,
}

impl RemoveEmptySettings {
    #[must_use]
    pub fn new(work_mode: WorkMode, more_explicit: bool) -> Self {
        RemoveEmptySettings {
            work_mode,
            more_explicit,
            active_overrides: HashSet::new(),
        }
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut rule = RemoveEmptySettings::new(WorkMode::OverwriteOk, true);
        for (key, value) in params {
            match key.as_str() {
                "work_mode" => {
                    rule.work_mode = match value.as_str() {
                        "overwrite_ok" => WorkMode::OverwriteOk,
                        "always" => WorkMode::Always,
                        _ => {
                            return Err(ConfigError::invalid_parameter(
                                NAME,
                                "work_mode",
                                value,
                                "overwrite_ok or always",
                            ))
                        }
                    }
                }
                "more_explicit" => {
                    rule.more_explicit = parse_bool(NAME, "more_explicit", value)?;
                }
                _ => return Err(ConfigError::unknown_parameter(NAME, key)),
            }
        }
        Ok(rule)
    }
}

impl Rule for RemoveEmptySettings {
    fn name(&self) -> &'static str {
        NAME
    }

    fn prepare(&mut self, document: &Document, _context: &FormatContext) {
        self.active_overrides.clear();
        if self.work_mode != WorkMode::OverwriteOk {
            return;
        }
        for section in &document.sections {
            collect_suite_overrides(&section.body, &mut self.active_overrides);
        }
    }

    fn rewrite_statement(
        &mut self,
        statement: &mut Statement,
        context: &FormatContext,
    ) -> Rewrite<Node> {
        let StatementKind::Setting(kind) = statement.kind else {
            return Rewrite::Keep;
        };
        if statement.data_len() != 1 {
            return Rewrite::Keep;
        }
        let overrides_active_default = kind.is_local_override()
            && self.work_mode == WorkMode::OverwriteOk
            && self.active_overrides.contains(&kind);
        if !overrides_active_default {
            // TODO: a trailing comment on the removed line is dropped with
            // it; reattach it to a neighbouring statement instead.
            return Rewrite::Remove;
        }
        if self.more_explicit {
            let indent = statement
                .tokens
                .first()
                .filter(|token| token.kind == TokenKind::Separator)
                .map_or_else(String::new, |token| token.text.clone());
            let name = match statement.first_data_token() {
                Some(token) => token.clone(),
                None => return Rewrite::Keep,
            };
            statement.tokens = vec![
                Token::separator(indent),
                name,
                Token::separator(context.separator()),
                Token::new(TokenKind::Argument, "NONE"),
                Token::eol(context.eol()),
            ];
        }
        Rewrite::Keep
    }
}

/// Record which local setting kinds have an active suite-level default,
/// so `[Timeout]` is only protected when `Test Timeout` names a value.
fn collect_suite_overrides(nodes: &[Node], active: &mut HashSet<SettingKind>) {
    for node in nodes {
        match node {
            Node::Statement(statement) => {
                let StatementKind::Setting(kind) = statement.kind else {
                    continue;
                };
                if let Some(local) = kind.local_counterpart() {
                    if statement.data_len() != 1 {
                        active.insert(local);
                    }
                }
            }
            Node::Block(block) => collect_suite_overrides(&block.body, active),
            Node::If(if_block) => collect_if_overrides(if_block, active),
        }
    }
}

fn collect_if_overrides(if_block: &IfBlock, active: &mut HashSet<SettingKind>) {
    collect_suite_overrides(&if_block.body, active);
    if let Some(orelse) = &if_block.orelse {
        collect_if_overrides(orelse, active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TidyConfig;
    use crate::model::{Block, BlockKind, Section, SectionKind};
    use crate::rules::walk_document;

    fn setting(kind: SettingKind, line: usize, indent: &str, cells: Vec<Token>) -> Statement {
        Statement::row(StatementKind::Setting(kind), line, indent, cells)
    }

    fn suite_timeout_row(line: usize, value: Option<&str>) -> Node {
        let mut cells = vec![Token::new(TokenKind::SettingName, "Test Timeout")];
        if let Some(value) = value {
            cells.push(Token::new(TokenKind::Argument, value));
        }
        Node::Statement(setting(SettingKind::TestTimeout, line, "", cells))
    }

    fn document(settings_rows: Vec<Node>, test_rows: Vec<Node>) -> Document {
        let block = Block::new(
            BlockKind::TestCase,
            Statement::row(
                StatementKind::TestCaseName,
                4,
                "",
                vec![Token::new(TokenKind::TestCaseName, "Test")],
            ),
            test_rows,
        );
        Document::new(vec![
            Section::new(
                SectionKind::Settings,
                Some(Statement::section_header(SectionKind::Settings, 1)),
                settings_rows,
            ),
            Section::new(
                SectionKind::TestCases,
                Some(Statement::section_header(SectionKind::TestCases, 3)),
                vec![Node::Block(block)],
            ),
        ])
    }

    fn empty_timeout(line: usize) -> Node {
        Node::Statement(setting(
            SettingKind::Timeout,
            line,
            "    ",
            vec![Token::new(TokenKind::SettingName, "[Timeout]")],
        ))
    }

    fn test_body(document: &Document) -> &[Node] {
        let Node::Block(block) = &document.sections[1].body[0] else {
            panic!("expected block");
        };
        &block.body
    }

    fn run(rule: &mut RemoveEmptySettings, document: &mut Document) {
        walk_document(rule, document, &FormatContext::default());
    }

    #[test]
    fn test_empty_non_override_setting_removed() {
        let library = Node::Statement(setting(
            SettingKind::Library,
            2,
            "",
            vec![Token::new(TokenKind::SettingName, "Library")],
        ));
        let mut document = document(vec![library], vec![]);
        run(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, true),
            &mut document,
        );
        assert!(document.sections[0].body.is_empty());
    }

    #[test]
    fn test_empty_override_with_active_suite_default_becomes_none() {
        let mut document = document(
            vec![suite_timeout_row(2, Some("1 min"))],
            vec![empty_timeout(5)],
        );
        run(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, true),
            &mut document,
        );
        let body = test_body(&document);
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].text(), "    [Timeout]    NONE\n");
    }

    #[test]
    fn test_empty_override_without_suite_default_removed() {
        let mut document = document(vec![], vec![empty_timeout(5)]);
        run(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, true),
            &mut document,
        );
        assert!(test_body(&document).is_empty());
    }

    #[test]
    fn test_empty_suite_timeout_does_not_protect_local_one() {
        let mut document = document(vec![suite_timeout_row(2, None)], vec![empty_timeout(5)]);
        run(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, true),
            &mut document,
        );
        assert!(document.sections[0].body.is_empty());
        assert!(test_body(&document).is_empty());
    }

    #[test]
    fn test_more_explicit_off_keeps_override_as_written() {
        let mut document = document(
            vec![suite_timeout_row(2, Some("1 min"))],
            vec![empty_timeout(5)],
        );
        run(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, false),
            &mut document,
        );
        let body = test_body(&document);
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].text(), "    [Timeout]\n");
    }

    #[test]
    fn test_always_mode_removes_overriding_settings_too() {
        let mut document = document(
            vec![suite_timeout_row(2, Some("1 min"))],
            vec![empty_timeout(5)],
        );
        run(
            &mut RemoveEmptySettings::new(WorkMode::Always, true),
            &mut document,
        );
        assert!(test_body(&document).is_empty());
    }

    #[test]
    fn test_setting_with_value_untouched() {
        let resource = Node::Statement(setting(
            SettingKind::Resource,
            2,
            "",
            vec![
                Token::new(TokenKind::SettingName, "Resource"),
                Token::new(TokenKind::Argument, "common.resource"),
            ],
        ));
        let mut document = document(vec![resource], vec![]);
        run(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, true),
            &mut document,
        );
        assert_eq!(document.sections[0].body.len(), 1);
    }

    #[test]
    fn test_override_set_reset_between_documents() {
        let mut rule = RemoveEmptySettings::new(WorkMode::OverwriteOk, true);
        let mut first = document(
            vec![suite_timeout_row(2, Some("1 min"))],
            vec![empty_timeout(5)],
        );
        run(&mut rule, &mut first);
        assert_eq!(test_body(&first).len(), 1);

        let mut second = document(vec![], vec![empty_timeout(5)]);
        run(&mut rule, &mut second);
        assert!(test_body(&second).is_empty());
    }

    #[test]
    fn test_out_of_window_setting_kept() {
        let library = Node::Statement(setting(
            SettingKind::Library,
            2,
            "",
            vec![Token::new(TokenKind::SettingName, "Library")],
        ));
        let mut document = document(vec![library], vec![]);
        let context = FormatContext::new(&TidyConfig {
            start_line: Some(10),
            end_line: Some(20),
            ..Default::default()
        });
        walk_document(
            &mut RemoveEmptySettings::new(WorkMode::OverwriteOk, true),
            &mut document,
            &context,
        );
        assert_eq!(document.sections[0].body.len(), 1);
    }

    #[test]
    fn test_from_params_rejects_unknown_work_mode() {
        let err =
            RemoveEmptySettings::from_params(&[("work_mode".to_string(), "sometimes".to_string())])
                .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("work_mode"));
        assert!(message.contains("sometimes"));
        assert!(message.contains("overwrite_ok or always"));
    }

    #[test]
    fn test_from_params_parses_both_parameters() {
        let rule = RemoveEmptySettings::from_params(&[
            ("work_mode".to_string(), "always".to_string()),
            ("more_explicit".to_string(), "false".to_string()),
        ])
        .unwrap();
        assert_eq!(rule.work_mode, WorkMode::Always);
        assert!(!rule.more_explicit);
    }
}
