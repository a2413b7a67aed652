//! Operator and punctuation lexing.
//!
//! This module handles the operators that need one character of lookahead
//! to disambiguate from their two-character counterparts. Plain
//! single-character punctuation (`+ - * / ( ) { } [ ] , ; ^ '`) is emitted
//! directly by [`super::core`]'s dispatch.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `=`.
    ///
    /// There is no `==` in this grammar — `=` alone is the equality
    /// comparison operator.
    pub fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        Token::Eq
    }

    /// Lexes `!` or `!=`.
    pub fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    /// Lexes `<`, `<=`.
    pub fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    /// Lexes `>`, `>=`.
    pub fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    /// Lexes `|`, `||`.
    pub fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Token::OrOr
        } else {
            Token::Pipe
        }
    }

    /// Lexes `:`, `:=`.
    pub fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Assign
        } else {
            Token::Colon
        }
    }

    /// Lexes `.`, `..`.
    pub fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::DotDot
        } else {
            Token::Dot
        }
    }
}
