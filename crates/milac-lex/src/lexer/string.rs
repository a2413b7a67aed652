//! String literal lexing.
//!
//! Strings are used only for compiler diagnostics — there is no string
//! runtime and no escape sequences. A string runs from `"` to the next
//! `"`; an end of line or end of input before the closing quote is the
//! lexer's only error case.

use crate::token::Token;
use crate::Lexer;
use milac_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes a string literal.
    ///
    /// # Returns
    ///
    /// `Token::String(symbol)` with the literal content between the quotes.
    pub fn lex_string(&mut self) -> Token {
        self.cursor.advance();

        let content_start = self.cursor.position();

        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                self.report_error("unterminated string literal".to_string());
                let content = self.cursor.slice_from(content_start);
                return Token::String(Symbol::intern(content));
            }

            if self.cursor.current_char() == '"' {
                let content = self.cursor.slice_from(content_start);
                self.cursor.advance();
                return Token::String(Symbol::intern(content));
            }

            self.cursor.advance();
        }
    }
}
