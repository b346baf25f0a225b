//! Flat `Run Keyword If` calls rebuilt as structured `IF` blocks.

use crate::config::FormatContext;
use crate::error::ConfigError;
use crate::model::{IfBlock, Node, Statement, StatementKind, Token, TokenKind};
use crate::rules::{insert_separators, normalize_name, Rewrite, Rule};

const NAME: &str = "ReplaceRunKeywordIf";

/// Rewrites `Run Keyword If` calls into `IF`/`ELSE IF`/`ELSE` blocks.
///
/// The flat argument list is split at the literal `ELSE IF` and `ELSE`
/// markers into branches, each branch becoming a guarded keyword call.
/// `Run Keywords ... AND ...` inside a branch unrolls into one call per
/// joined keyword, and any assignment on the original call is repeated on
/// every generated call. A call that cannot be rewritten safely, for
/// example an `ELSE` with nothing after it, is left exactly as it was.
#[derive(Debug, Default)]
pub struct ReplaceRunKeywordIf;

impl ReplaceRunKeywordIf {
    #[must_use]
    pub fn new() -> Self {
        ReplaceRunKeywordIf
    }

    pub(crate) fn from_params(params: &[(String, String)]) -> Result<Self, ConfigError> {
        if let Some((key, _)) = params.first() {
            return Err(ConfigError::unknown_parameter(NAME, key));
        }
        Ok(ReplaceRunKeywordIf)
    }
}

impl Rule for ReplaceRunKeywordIf {
    fn name(&self) -> &'static str {
        NAME
    }

    fn rewrite_statement(
        &mut self,
        statement: &mut Statement,
        context: &FormatContext,
    ) -> Rewrite<Node> {
        if statement.kind != StatementKind::KeywordCall {
            return Rewrite::Keep;
        }
        let Some(keyword) = statement.first_token_of_kind(TokenKind::Keyword) else {
            return Rewrite::Keep;
        };
        if normalize_name(&keyword.text) != "runkeywordif" {
            return Rewrite::Keep;
        }
        match build_branched(statement, context) {
            Some(if_block) => Rewrite::Replace(Node::If(if_block)),
            None => Rewrite::Keep,
        }
    }
}

/// Build the whole branch chain, or `None` when any branch is malformed.
/// Branches are built from last to first so each one can be linked as the
/// `orelse` of its predecessor; the `END` goes on the outermost branch.
fn build_branched(statement: &Statement, context: &FormatContext) -> Option<IfBlock> {
    let indent = statement
        .tokens
        .first()
        .filter(|token| token.kind == TokenKind::Separator)
        .map_or_else(String::new, |token| token.text.clone());
    let assign: Vec<Token> = statement
        .tokens_of_kind(TokenKind::Assign)
        .cloned()
        .collect();
    let args: Vec<Token> = statement
        .tokens_of_kind(TokenKind::Argument)
        .cloned()
        .collect();
    if args.len() < 2 {
        return None;
    }
    let mut chain: Option<IfBlock> = None;
    for branch in split_on_delimiters(&args, &["ELSE", "ELSE IF"])
        .into_iter()
        .rev()
    {
        let first = branch.first()?;
        let (header, branch_args) = if first.text == "ELSE" {
            if branch.len() < 2 {
                return None;
            }
            (else_header(&indent, context), &branch[1..])
        } else if first.text == "ELSE IF" {
            if branch.len() < 3 {
                return None;
            }
            (
                condition_header(
                    StatementKind::ElseIfHeader,
                    TokenKind::ElseIf,
                    "ELSE IF",
                    &indent,
                    &branch[1],
                    context,
                ),
                &branch[2..],
            )
        } else {
            if branch.len() < 2 {
                return None;
            }
            (
                condition_header(
                    StatementKind::IfHeader,
                    TokenKind::If,
                    "IF",
                    &indent,
                    &branch[0],
                    context,
                ),
                &branch[1..],
            )
        };
        let body = build_branch_calls(branch_args, &assign, &indent, context)?;
        let mut if_block = IfBlock::new(header, body);
        if_block.orelse = chain.take().map(Box::new);
        chain = Some(if_block);
    }
    let mut outer = chain?;
    outer.end = Some(Statement::from_tokens(
        StatementKind::End,
        vec![
            Token::separator(indent),
            Token::new(TokenKind::End, "END"),
            Token::eol(context.eol()),
        ],
    ));
    Some(outer)
}

fn else_header(indent: &str, context: &FormatContext) -> Statement {
    Statement::from_tokens(
        StatementKind::ElseHeader,
        vec![
            Token::separator(indent),
            Token::new(TokenKind::Else, "ELSE"),
            Token::eol(context.eol()),
        ],
    )
}

fn condition_header(
    kind: StatementKind,
    marker_kind: TokenKind,
    marker: &str,
    indent: &str,
    condition: &Token,
    context: &FormatContext,
) -> Statement {
    Statement::from_tokens(
        kind,
        vec![
            Token::separator(indent),
            Token::new(marker_kind, marker),
            Token::separator(context.separator()),
            condition.clone(),
            Token::eol(context.eol()),
        ],
    )
}

/// One branch body: a single call, or one call per keyword when the
/// branch starts with `Run Keywords`.
fn build_branch_calls(
    args: &[Token],
    assign: &[Token],
    indent: &str,
    context: &FormatContext,
) -> Option<Vec<Node>> {
    let first = args.first()?;
    if normalize_name(&first.text) == "runkeywords" {
        let mut calls = Vec::new();
        for slice in split_on_delimiters(args, &["AND"]) {
            // The slice starts with the `Run Keywords` or `AND` marker;
            // at least a keyword name must follow it.
            if slice.len() < 2 {
                return None;
            }
            calls.push(Node::Statement(build_call(
                &slice[1..],
                assign,
                indent,
                context,
            )?));
        }
        Some(calls)
    } else {
        Some(vec![Node::Statement(build_call(
            args, assign, indent, context,
        )?)])
    }
}

/// One generated keyword call, indented one level past the original call.
fn build_call(
    args: &[Token],
    assign: &[Token],
    indent: &str,
    context: &FormatContext,
) -> Option<Statement> {
    let (name, rest) = args.split_first()?;
    let mut tokens: Vec<Token> = assign.to_vec();
    tokens.push(Token::new(TokenKind::Keyword, name.text.clone()));
    tokens.extend(rest.iter().cloned());
    Some(Statement::from_tokens(
        StatementKind::KeywordCall,
        insert_separators(indent, tokens, context.space_count, context.eol()),
    ))
}

/// Slices of `args` split at tokens whose text is one of `delimiters`.
/// Each slice after the first starts with the delimiter that opened it.
fn split_on_delimiters<'a>(args: &'a [Token], delimiters: &[&str]) -> Vec<&'a [Token]> {
    let mut slices = Vec::new();
    let mut previous = 0;
    for (index, token) in args.iter().enumerate() {
        if delimiters.contains(&token.text.as_str()) {
            slices.push(&args[previous..index]);
            previous = index;
        }
    }
    slices.push(&args[previous..]);
    slices
}
