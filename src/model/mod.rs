//! The document tree rules operate on.
//!
//! A [`Document`] owns a list of [`Section`]s; each section owns a header
//! statement and a body of [`Node`]s. A node is a plain [`Statement`], a
//! named [`Block`] (test case or keyword), or an [`IfBlock`] chain. The
//! tree is fully concrete: serializing it back to text is token
//! concatenation and nothing else, so whatever rules leave untouched
//! round-trips byte for byte.

pub mod token;

pub use token::{Token, TokenKind};

/// Kind of a document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Settings,
    Variables,
    TestCases,
    Keywords,
    Comments,
}

impl SectionKind {
    /// Canonical English header name, without decoration.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        match self {
            SectionKind::Settings => "Settings",
            SectionKind::Variables => "Variables",
            SectionKind::TestCases => "Test Cases",
            SectionKind::Keywords => "Keywords",
            SectionKind::Comments => "Comments",
        }
    }
}

/// Kind of a named block inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    TestCase,
    Keyword,
}

/// Kind of a setting statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    // Suite-level settings.
    Library,
    Resource,
    VariablesImport,
    Documentation,
    Metadata,
    SuiteSetup,
    SuiteTeardown,
    TestSetup,
    TestTeardown,
    TestTemplate,
    TestTimeout,
    ForceTags,
    DefaultTags,
    // Bracketed settings inside test cases and keywords.
    Setup,
    Teardown,
    Template,
    Timeout,
    Tags,
    Arguments,
    Return,
}

impl SettingKind {
    /// Whether a test case or keyword may override this setting locally
    /// with an explicit `NONE`.
    #[must_use]
    pub fn is_local_override(self) -> bool {
        matches!(
            self,
            SettingKind::Setup
                | SettingKind::Teardown
                | SettingKind::Template
                | SettingKind::Timeout
                | SettingKind::Tags
        )
    }

    /// The local setting a suite-level default of this kind is overridden
    /// by, if any.
    #[must_use]
    pub fn local_counterpart(self) -> Option<SettingKind> {
        match self {
            SettingKind::TestSetup => Some(SettingKind::Setup),
            SettingKind::TestTeardown => Some(SettingKind::Teardown),
            SettingKind::TestTemplate => Some(SettingKind::Template),
            SettingKind::TestTimeout => Some(SettingKind::Timeout),
            SettingKind::DefaultTags => Some(SettingKind::Tags),
            _ => None,
        }
    }
}

/// Kind of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `*** Settings ***` and friends.
    SectionHeader(SectionKind),
    /// A line holding only whitespace and its terminator.
    EmptyLine,
    /// A line holding only a comment.
    Comment,
    /// A keyword call, with optional assignment targets.
    KeywordCall,
    /// A variable definition row in the variables section.
    Variable,
    /// A suite or bracketed setting.
    Setting(SettingKind),
    /// The header line of a test case block.
    TestCaseName,
    /// The header line of a keyword block.
    KeywordName,
    /// `IF    <condition>`.
    IfHeader,
    /// `ELSE IF    <condition>`.
    ElseIfHeader,
    /// `ELSE`.
    ElseHeader,
    /// `END`.
    End,
}

/// A single logical statement: one source line, or several when joined by
/// continuation markers. Owns every token of those lines, separators and
/// terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub tokens: Vec<Token>,
}

impl Statement {
    #[must_use]
    pub fn from_tokens(kind: StatementKind, tokens: Vec<Token>) -> Self {
        Statement { kind, tokens }
    }

    /// A synthetic blank line with the given terminator.
    #[must_use]
    pub fn blank_line(eol: &str) -> Self {
        Statement {
            kind: StatementKind::EmptyLine,
            tokens: vec![Token::eol(eol)],
        }
    }

    /// Assemble a one-line statement from data cells: optional leading
    /// indent, the cells separated by four-space separators, and a `\n`
    /// terminator, every token stamped with `line`. This is the
    /// convenience surface for front ends (and tests) building trees in
    /// code; layouts needing exact separators are built from raw tokens
    /// instead.
    #[must_use]
    pub fn row(kind: StatementKind, line: usize, indent: &str, cells: Vec<Token>) -> Self {
        let count = cells.len();
        let mut tokens = Vec::with_capacity(count * 2 + 2);
        if !indent.is_empty() {
            tokens.push(Token::on_line(TokenKind::Separator, indent, line));
        }
        for (index, mut cell) in cells.into_iter().enumerate() {
            cell.line = line;
            tokens.push(cell);
            if index + 1 < count {
                tokens.push(Token::on_line(TokenKind::Separator, "    ", line));
            }
        }
        tokens.push(Token::on_line(TokenKind::Eol, "\n", line));
        Statement { kind, tokens }
    }

    /// A `*** Name ***` header line for the given section kind.
    #[must_use]
    pub fn section_header(kind: SectionKind, line: usize) -> Self {
        Statement::row(
            StatementKind::SectionHeader(kind),
            line,
            "",
            vec![Token::new(
                TokenKind::SectionHeader,
                format!("*** {} ***", kind.canonical_name()),
            )],
        )
    }

    /// Data tokens in order, skipping separators, terminators,
    /// continuation markers and comments.
    pub fn data_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| token.is_data())
    }

    /// Number of data tokens.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data_tokens().count()
    }

    #[must_use]
    pub fn first_data_token(&self) -> Option<&Token> {
        self.tokens.iter().find(|token| token.is_data())
    }

    pub fn first_data_token_mut(&mut self) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|token| token.is_data())
    }

    /// Tokens of one kind, in order.
    pub fn tokens_of_kind(&self, kind: TokenKind) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |token| token.kind == kind)
    }

    pub fn tokens_of_kind_mut(&mut self, kind: TokenKind) -> impl Iterator<Item = &mut Token> {
        self.tokens
            .iter_mut()
            .filter(move |token| token.kind == kind)
    }

    #[must_use]
    pub fn first_token_of_kind(&self, kind: TokenKind) -> Option<&Token> {
        self.tokens.iter().find(|token| token.kind == kind)
    }

    pub fn last_token_of_kind_mut(&mut self, kind: TokenKind) -> Option<&mut Token> {
        self.tokens.iter_mut().rev().find(|token| token.kind == kind)
    }

    /// First source line covered by this statement, ignoring synthetic
    /// tokens.
    #[must_use]
    pub fn start_line(&self) -> Option<usize> {
        self.tokens.iter().filter_map(Token::source_line).min()
    }

    /// Last source line covered by this statement, ignoring synthetic
    /// tokens.
    #[must_use]
    pub fn end_line(&self) -> Option<usize> {
        self.tokens.iter().filter_map(Token::source_line).max()
    }

    /// `(start, end)` source line span, or `None` when every token is
    /// synthetic.
    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        Some((self.start_line()?, self.end_line()?))
    }

    pub fn write_text(&self, out: &mut String) {
        for token in &self.tokens {
            out.push_str(&token.text);
        }
    }

    /// Exact source text: the concatenation of every token text.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }
}

/// A named block: a test case or keyword header plus its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub header: Statement,
    pub body: Vec<Node>,
}

impl Block {
    #[must_use]
    pub fn new(kind: BlockKind, header: Statement, body: Vec<Node>) -> Self {
        Block { kind, header, body }
    }

    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        merge_spans(self.header.span(), nodes_span(&self.body))
    }

    pub fn write_text(&self, out: &mut String) {
        self.header.write_text(out);
        for node in &self.body {
            node.write_text(out);
        }
    }
}

/// One branch chain of an `IF` construct. `orelse` points at the next
/// `ELSE IF`/`ELSE` branch; `end` holds the `END` statement and is only
/// present on the outermost branch of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBlock {
    pub header: Statement,
    pub body: Vec<Node>,
    pub orelse: Option<Box<IfBlock>>,
    pub end: Option<Statement>,
}

impl IfBlock {
    #[must_use]
    pub fn new(header: Statement, body: Vec<Node>) -> Self {
        IfBlock {
            header,
            body,
            orelse: None,
            end: None,
        }
    }

    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        let mut span = merge_spans(self.header.span(), nodes_span(&self.body));
        if let Some(orelse) = &self.orelse {
            span = merge_spans(span, orelse.span());
        }
        if let Some(end) = &self.end {
            span = merge_spans(span, end.span());
        }
        span
    }

    pub fn write_text(&self, out: &mut String) {
        self.header.write_text(out);
        for node in &self.body {
            node.write_text(out);
        }
        if let Some(orelse) = &self.orelse {
            orelse.write_text(out);
        }
        if let Some(end) = &self.end {
            end.write_text(out);
        }
    }
}

/// A section body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Statement(Statement),
    Block(Block),
    If(IfBlock),
}

impl Node {
    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            Node::Statement(statement) => statement.span(),
            Node::Block(block) => block.span(),
            Node::If(if_block) => if_block.span(),
        }
    }

    #[must_use]
    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Node::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn as_statement_mut(&mut self) -> Option<&mut Statement> {
        match self {
            Node::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn write_text(&self, out: &mut String) {
        match self {
            Node::Statement(statement) => statement.write_text(out),
            Node::Block(block) => block.write_text(out),
            Node::If(if_block) => if_block.write_text(out),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }
}

/// A document section: optional header statement plus body nodes. The
/// header is `None` only for an implicit leading section of a file that
/// starts with content before any `*** ... ***` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub header: Option<Statement>,
    pub body: Vec<Node>,
}

impl Section {
    #[must_use]
    pub fn new(kind: SectionKind, header: Option<Statement>, body: Vec<Node>) -> Self {
        Section { kind, header, body }
    }

    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        let header_span = self.header.as_ref().and_then(Statement::span);
        merge_spans(header_span, nodes_span(&self.body))
    }

    pub fn write_text(&self, out: &mut String) {
        if let Some(header) = &self.header {
            header.write_text(out);
        }
        for node in &self.body {
            node.write_text(out);
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }
}

/// A whole parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path or other origin label, if known. Only used in diagnostics.
    pub source: Option<String>,
    pub sections: Vec<Section>,
}

impl Document {
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Document {
            source: None,
            sections,
        }
    }

    #[must_use]
    pub fn with_source(sections: Vec<Section>, source: impl Into<String>) -> Self {
        Document {
            source: Some(source.into()),
            sections,
        }
    }

    /// Serialize the whole tree back to text.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            section.write_text(&mut out);
        }
        out
    }
}

fn merge_spans(a: Option<(usize, usize)>, b: Option<(usize, usize)>) -> Option<(usize, usize)> {
    match (a, b) {
        (Some((a_start, a_end)), Some((b_start, b_end))) => {
            Some((a_start.min(b_start), a_end.max(b_end)))
        }
        (Some(span), None) | (None, Some(span)) => Some(span),
        (None, None) => None,
    }
}

fn nodes_span(nodes: &[Node]) -> Option<(usize, usize)> {
    nodes
        .iter()
        .fold(None, |span, node| merge_spans(span, node.span()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword_call(line: usize) -> Statement {
        Statement::from_tokens(
            StatementKind::KeywordCall,
            vec![
                Token::on_line(TokenKind::Separator, "    ", line),
                Token::on_line(TokenKind::Keyword, "Log", line),
                Token::on_line(TokenKind::Separator, "    ", line),
                Token::on_line(TokenKind::Argument, "message", line),
                Token::on_line(TokenKind::Eol, "\n", line),
            ],
        )
    }

    #[test]
    fn test_statement_text_is_token_concatenation() {
        let statement = keyword_call(3);
        assert_eq!(statement.text(), "    Log    message\n");
    }

    #[test]
    fn test_data_tokens_skip_layout_and_comments() {
        let statement = Statement::from_tokens(
            StatementKind::KeywordCall,
            vec![
                Token::separator("    "),
                Token::new(TokenKind::Keyword, "Log"),
                Token::separator("    "),
                Token::new(TokenKind::Argument, "message"),
                Token::separator("    "),
                Token::new(TokenKind::Comment, "# trailing"),
                Token::eol("\n"),
            ],
        );
        let data: Vec<&str> = statement.data_tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(data, ["Log", "message"]);
        assert_eq!(statement.data_len(), 2);
    }

    #[test]
    fn test_statement_span_ignores_synthetic_tokens() {
        let mut statement = keyword_call(7);
        statement.tokens.push(Token::eol("\n"));
        assert_eq!(statement.span(), Some((7, 7)));

        let synthetic = Statement::blank_line("\n");
        assert_eq!(synthetic.span(), None);
    }

    #[test]
    fn test_if_block_span_covers_branches_and_end() {
        let mut if_block = IfBlock::new(
            Statement::from_tokens(
                StatementKind::IfHeader,
                vec![
                    Token::on_line(TokenKind::Separator, "    ", 2),
                    Token::on_line(TokenKind::If, "IF", 2),
                    Token::on_line(TokenKind::Separator, "    ", 2),
                    Token::on_line(TokenKind::Argument, "${cond}", 2),
                    Token::on_line(TokenKind::Eol, "\n", 2),
                ],
            ),
            vec![Node::Statement(keyword_call(3))],
        );
        if_block.orelse = Some(Box::new(IfBlock::new(
            Statement::from_tokens(
                StatementKind::ElseHeader,
                vec![
                    Token::on_line(TokenKind::Separator, "    ", 4),
                    Token::on_line(TokenKind::Else, "ELSE", 4),
                    Token::on_line(TokenKind::Eol, "\n", 4),
                ],
            ),
            vec![Node::Statement(keyword_call(5))],
        )));
        if_block.end = Some(Statement::from_tokens(
            StatementKind::End,
            vec![
                Token::on_line(TokenKind::Separator, "    ", 6),
                Token::on_line(TokenKind::End, "END", 6),
                Token::on_line(TokenKind::Eol, "\n", 6),
            ],
        ));
        assert_eq!(if_block.span(), Some((2, 6)));
    }

    #[test]
    fn test_document_text_reassembles_sections() {
        let header = Statement::from_tokens(
            StatementKind::SectionHeader(SectionKind::TestCases),
            vec![
                Token::on_line(TokenKind::SectionHeader, "*** Test Cases ***", 1),
                Token::on_line(TokenKind::Eol, "\n", 1),
            ],
        );
        let block = Block::new(
            BlockKind::TestCase,
            Statement::from_tokens(
                StatementKind::TestCaseName,
                vec![
                    Token::on_line(TokenKind::TestCaseName, "My Test", 2),
                    Token::on_line(TokenKind::Eol, "\n", 2),
                ],
            ),
            vec![Node::Statement(keyword_call(3))],
        );
        let document = Document::new(vec![Section::new(
            SectionKind::TestCases,
            Some(header),
            vec![Node::Block(block)],
        )]);
        assert_eq!(
            document.text(),
            "*** Test Cases ***\nMy Test\n    Log    message\n"
        );
    }

    #[test]
    fn test_suite_settings_map_to_local_counterparts() {
        assert_eq!(
            SettingKind::TestSetup.local_counterpart(),
            Some(SettingKind::Setup)
        );
        assert_eq!(
            SettingKind::DefaultTags.local_counterpart(),
            Some(SettingKind::Tags)
        );
        assert_eq!(SettingKind::Library.local_counterpart(), None);
        assert!(SettingKind::Timeout.is_local_override());
        assert!(!SettingKind::Documentation.is_local_override());
    }
}
