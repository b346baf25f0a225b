//! Tokens: the smallest addressable text units of a document.
//!
//! Every token carries its semantic kind, its exact source text, and the
//! 1-based source line it was read from (`0` for tokens fabricated by
//! rules). Separators and line terminators are first-class tokens, so
//! concatenating the texts of a statement's tokens reproduces its source
//! text exactly.

/// Semantic kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Inter-column whitespace.
    Separator,
    /// Line terminator, including any trailing whitespace before it.
    Eol,
    /// The `...` continuation marker of a multi-line statement.
    Continuation,
    /// A `# ...` comment.
    Comment,
    /// Positional argument of a keyword call or value of a setting/variable.
    Argument,
    /// Keyword name in a keyword call.
    Keyword,
    /// Assignment target of a keyword call (`${result} =`).
    Assign,
    /// Variable name in a variable-definition row (`${VAR}`).
    Variable,
    /// Name of a setting (`Library`, `[Timeout]`, ...).
    SettingName,
    /// Full section header name (`*** Settings ***`).
    SectionHeader,
    /// Test case name on a test block's header line.
    TestCaseName,
    /// Keyword name on a keyword block's header line.
    KeywordName,
    /// The `IF` control keyword.
    If,
    /// The `ELSE IF` control keyword.
    ElseIf,
    /// The `ELSE` control keyword.
    Else,
    /// The `END` control keyword.
    End,
}

impl TokenKind {
    /// Whether tokens of this kind carry data, as opposed to layout
    /// (separators, line terminators, continuation markers) and comments.
    #[must_use]
    pub fn is_data(self) -> bool {
        !matches!(
            self,
            TokenKind::Separator | TokenKind::Eol | TokenKind::Continuation | TokenKind::Comment
        )
    }
}

/// A `(kind, text, source line)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based source line; `0` marks a synthetic token fabricated by a rule.
    pub line: usize,
}

impl Token {
    /// Create a synthetic token (no source line).
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            line: 0,
        }
    }

    /// Create a token read from the given 1-based source line.
    #[must_use]
    pub fn on_line(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Synthetic separator of the given text.
    #[must_use]
    pub fn separator(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Separator, text)
    }

    /// Synthetic line terminator.
    #[must_use]
    pub fn eol(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Eol, text)
    }

    /// The source line, or `None` for synthetic tokens.
    #[must_use]
    pub fn source_line(&self) -> Option<usize> {
        if self.line == 0 {
            None
        } else {
            Some(self.line)
        }
    }

    /// Whether this token carries data (see [`TokenKind::is_data`]).
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.kind.is_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_token_classification() {
        assert!(TokenKind::Argument.is_data());
        assert!(TokenKind::Keyword.is_data());
        assert!(TokenKind::Variable.is_data());
        assert!(TokenKind::SettingName.is_data());
        assert!(TokenKind::If.is_data());
        assert!(!TokenKind::Separator.is_data());
        assert!(!TokenKind::Eol.is_data());
        assert!(!TokenKind::Continuation.is_data());
        assert!(!TokenKind::Comment.is_data());
    }

    #[test]
    fn test_synthetic_token_has_no_source_line() {
        let token = Token::new(TokenKind::Argument, "NONE");
        assert_eq!(token.line, 0);
        assert_eq!(token.source_line(), None);
    }

    #[test]
    fn test_source_token_reports_line() {
        let token = Token::on_line(TokenKind::Keyword, "Log", 12);
        assert_eq!(token.source_line(), Some(12));
    }
}
