//! Comment lexing.
//!
//! This module handles skipping line comments. There is no block comment
//! syntax in this language.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and `#` line comments.
    ///
    /// Called before lexing each token. A comment runs from `#` to the end
    /// of the line (or end of input); after discarding it, whitespace
    /// skipping resumes so runs of comments and blank lines collapse in one
    /// pass.
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                },
                '#' => self.skip_line_comment(),
                _ => return,
            }
        }
    }

    /// Skips from `#` to end of line.
    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milac_util::Handler;

    #[test]
    fn test_skip_whitespace() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("   hello", &mut handler);
        lexer.skip_whitespace_and_comments();
        assert_eq!(
            lexer.next_token(),
            crate::token::Token::Ident(milac_util::Symbol::intern("hello"))
        );
    }

    #[test]
    fn test_skip_line_comment() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("# comment\nhello", &mut handler);
        lexer.skip_whitespace_and_comments();
        assert_eq!(
            lexer.next_token(),
            crate::token::Token::Ident(milac_util::Symbol::intern("hello"))
        );
    }

    #[test]
    fn test_skip_comment_at_eof() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("hello # trailing comment", &mut handler);
        assert_eq!(
            lexer.next_token(),
            crate::token::Token::Ident(milac_util::Symbol::intern("hello"))
        );
        assert_eq!(lexer.next_token(), crate::token::Token::Eof);
    }

    #[test]
    fn test_consecutive_comments() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("# one\n# two\nhello", &mut handler);
        assert_eq!(
            lexer.next_token(),
            crate::token::Token::Ident(milac_util::Symbol::intern("hello"))
        );
    }
}
