//! Numeric literal lexing.
//!
//! Three forms are accepted, all parsed into a signed 32-bit value: a plain
//! decimal run `[0-9]+`, a `$`-prefixed hex run, and an `&`-prefixed octal
//! run. There is no floating-point syntax in this language.

use crate::token::Token;
use crate::unicode::is_digit_in_base;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a plain decimal integer.
    pub fn lex_decimal_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        self.finish_number(self.token_start, 10)
    }

    /// Lexes a `$`-prefixed hex integer, e.g. `$FF`.
    pub fn lex_hex_number(&mut self) -> Token {
        self.cursor.advance();
        let digits_start = self.cursor.position();
        while is_digit_in_base(self.cursor.current_char(), 16) {
            self.cursor.advance();
        }
        self.finish_number(digits_start, 16)
    }

    /// Lexes an `&`-prefixed octal integer, e.g. `&77`.
    pub fn lex_octal_number(&mut self) -> Token {
        self.cursor.advance();
        let digits_start = self.cursor.position();
        while is_digit_in_base(self.cursor.current_char(), 8) {
            self.cursor.advance();
        }
        self.finish_number(digits_start, 8)
    }

    /// Parses the digit run `[digits_start, position)` in the given base
    /// and reports a lexical error on an empty or out-of-range run.
    ///
    /// Parsing goes through `u32` so a hex/octal literal with the high bit
    /// set reinterprets as a negative `i32` instead of being rejected as an
    /// overflow; decimal literals are bounded by `i32::MAX`.
    fn finish_number(&mut self, digits_start: usize, base: u32) -> Token {
        let digits = self.cursor.slice_from(digits_start);

        if digits.is_empty() {
            self.report_error(format!("expected digits after numeric prefix (base {})", base));
            return Token::Invalid(self.cursor.slice_from(self.token_start).to_string());
        }

        if base == 10 {
            return match digits.parse::<i32>() {
                Ok(value) => Token::Number(value),
                Err(_) => {
                    self.report_error(format!("integer literal '{}' out of range", digits));
                    Token::Invalid(digits.to_string())
                },
            };
        }

        match u32::from_str_radix(digits, base) {
            Ok(value) => Token::Number(value as i32),
            Err(_) => {
                self.report_error(format!("integer literal '{}' out of range", digits));
                Token::Invalid(digits.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milac_util::Handler;

    fn lex_num(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.next_token()
    }

    #[test]
    fn test_decimal() {
        assert_eq!(lex_num("0"), Token::Number(0));
        assert_eq!(lex_num("42"), Token::Number(42));
        assert_eq!(lex_num("2147483647"), Token::Number(i32::MAX));
    }

    #[test]
    fn test_hex() {
        assert_eq!(lex_num("$0"), Token::Number(0));
        assert_eq!(lex_num("$FF"), Token::Number(255));
        assert_eq!(lex_num("$ff"), Token::Number(255));
    }

    #[test]
    fn test_hex_high_bit_reinterprets_as_negative() {
        assert_eq!(lex_num("$FFFFFFFF"), Token::Number(-1));
    }

    #[test]
    fn test_octal() {
        assert_eq!(lex_num("&0"), Token::Number(0));
        assert_eq!(lex_num("&77"), Token::Number(63));
        assert_eq!(lex_num("&17"), Token::Number(15));
    }

    #[test]
    fn test_decimal_overflow_reports_error() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("99999999999", &mut handler);
        let token = lexer.next_token();
        assert!(matches!(token, Token::Invalid(_)));
        assert!(handler.has_errors());
    }

    #[test]
    fn test_bare_dollar_reports_error() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("$", &mut handler);
        let token = lexer.next_token();
        assert!(matches!(token, Token::Invalid(_)));
        assert!(handler.has_errors());
    }

    #[test]
    fn test_bare_ampersand_is_not_a_number() {
        assert_eq!(lex_num("&"), Token::Ampersand);
        assert_eq!(lex_num("& foo"), Token::Ampersand);
    }

    #[test]
    fn test_number_followed_by_operator() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("10+20", &mut handler);
        assert_eq!(lexer.next_token(), Token::Number(10));
        assert_eq!(lexer.next_token(), Token::Plus);
        assert_eq!(lexer.next_token(), Token::Number(20));
    }

    #[quickcheck_macros::quickcheck]
    fn prop_decimal_round_trips(value: u32) -> bool {
        let value = (value / 2) as i32; // stay clear of i32::MAX by construction
        lex_num(&value.to_string()) == Token::Number(value)
    }

    #[quickcheck_macros::quickcheck]
    fn prop_hex_round_trips(value: u32) -> bool {
        let source = format!("${:X}", value);
        lex_num(&source) == Token::Number(value as i32)
    }
}
