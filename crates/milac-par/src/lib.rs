//! Recursive-descent parser: token stream to abstract syntax tree.
//!
//! The grammar is small enough that every production gets its own method
//! (`parse_program`, `parse_function_decl`, `parse_if_stmt`, ...) rather than
//! a generic combinator layer. Expressions are the one place a loop pulls
//! its weight: `parse_expr` is a precedence-climbing (Pratt) parser driven by
//! the binding-power table in [`expr`].
//!
//! Parse functions return `Option<T>`: a failure reports a diagnostic through
//! [`Handler`] and returns `None`. There is no error recovery — the first
//! syntax error aborts the whole parse, matching the reference front-end's
//! behavior of stopping at the first `SyntaxError`.

pub mod ast;
#[cfg(test)]
mod edge_cases;
mod expr;
mod items;
pub mod printer;
mod stmt;
mod types;

use milac_lex::{Lexer, Token};
use milac_util::{DiagnosticBuilder, DiagnosticCode, Handler, Span, Symbol};

pub use ast::Program;

/// Parses a complete program from source text.
///
/// Returns `None` if parsing failed; a diagnostic describing the failure has
/// already been reported through `handler`.
pub fn parse_program(source: &str, handler: &mut Handler) -> Option<Program> {
    let mut parser = Parser::from_source(source, handler);
    parser.parse_program()
}

/// Recursive-descent parser over a pre-lexed token stream.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    spans: Vec<Span>,
    position: usize,
    handler: &'a mut Handler,
}

impl<'a> Parser<'a> {
    /// Creates a parser from an already-tokenized stream.
    ///
    /// `tokens` and `spans` must have the same length, including a trailing
    /// `Token::Eof` entry.
    pub fn new(tokens: Vec<Token>, spans: Vec<Span>, handler: &'a mut Handler) -> Self {
        Self {
            tokens,
            spans,
            position: 0,
            handler,
        }
    }

    /// Lexes `source` in full and builds a parser over the resulting stream.
    pub fn from_source(source: &str, handler: &'a mut Handler) -> Self {
        let mut tokens = Vec::new();
        let mut spans = Vec::new();
        {
            let mut lexer = Lexer::new(source, &mut *handler);
            loop {
                let token = lexer.next_token();
                let span = lexer.token_span();
                let is_eof = token == Token::Eof;
                tokens.push(token);
                spans.push(span);
                if is_eof {
                    break;
                }
            }
        }
        tracing::debug!(token_count = tokens.len(), "lexed source");
        Self::new(tokens, spans, handler)
    }

    /// Parses the whole token stream as a program: `'program' IDENT ';'
    /// module '.'`.
    pub fn parse_program(&mut self) -> Option<Program> {
        let span_start = self.current_span();

        self.expect(Token::Program)?;
        let name = self.parse_ident()?;
        self.expect(Token::Semicolon)?;

        let mut decls = Vec::new();
        while !self.is_at_end() && self.current_token() != Token::Dot {
            decls.extend(self.parse_top_level_item()?);
        }

        self.expect(Token::Dot)?;

        tracing::debug!(item_count = decls.len(), "parsed program");
        Some(Program {
            name,
            decls,
            span: self.span_from_start(span_start),
        })
    }

    /// Returns the current token without consuming it.
    pub(crate) fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Returns the token `offset` positions ahead of the current one.
    pub(crate) fn peek_token(&self, offset: usize) -> Token {
        self.tokens
            .get(self.position + offset)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.spans.get(self.position).copied().unwrap_or(Span::DUMMY)
    }

    /// Merges `start` with the span of the token just consumed, producing a
    /// span covering everything parsed since `start` was captured.
    pub(crate) fn span_from_start(&self, start: Span) -> Span {
        let end = self.spans.get(self.position.saturating_sub(1)).copied().unwrap_or(start);
        start.merge(end)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    /// Consumes the current token if it equals `expected`, else reports an
    /// "unexpected token" diagnostic and returns `None`.
    pub(crate) fn expect(&mut self, expected: Token) -> Option<()> {
        if self.current_token() == expected {
            self.advance();
            Some(())
        } else {
            self.error(format!(
                "expected {:?}, found {:?}",
                expected,
                self.current_token()
            ));
            None
        }
    }

    /// Consumes the current token if it equals `expected`, returning whether
    /// it matched. Unlike `expect`, a mismatch is not an error.
    pub(crate) fn match_token(&mut self, expected: Token) -> bool {
        if self.current_token() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parses a bare identifier, reporting an error if the current token
    /// isn't one.
    pub(crate) fn parse_ident(&mut self) -> Option<Symbol> {
        match self.current_token() {
            Token::Ident(sym) => {
                self.advance();
                Some(sym)
            },
            other => {
                self.error(format!("expected identifier, found {:?}", other));
                None
            },
        }
    }

    /// Reports a syntax error at the current token's span.
    pub(crate) fn error(&mut self, message: String) {
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_SYNTAX_UNEXPECTED_TOKEN)
            .span(self.current_span())
            .emit(self.handler);
    }

    /// Reports a syntax error tagged as an invalid assignment target.
    pub(crate) fn error_not_an_lvalue(&mut self, span: Span) {
        DiagnosticBuilder::error("left-hand side of ':=' is not a name reference")
            .code(DiagnosticCode::E_SYNTAX_NOT_AN_LVALUE)
            .span(span)
            .emit(self.handler);
    }
}
