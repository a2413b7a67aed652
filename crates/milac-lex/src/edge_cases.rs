//! Edge case tests for milac-lex

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};
    use milac_util::Handler;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x");
        assert_eq!(t[0], Token::Ident(milac_util::Symbol::intern("x")));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        let t = lex_all(&format!("var {} : integer;", name));
        assert!(t.contains(&Token::Ident(milac_util::Symbol::intern(&name))));
    }

    #[test]
    fn test_edge_keywords_not_idents() {
        let t = lex_all("begin end if");
        assert_eq!(t[0], Token::Begin);
        assert_eq!(t[1], Token::End);
        assert_eq!(t[2], Token::If);
    }

    #[test]
    fn test_edge_decimal_bounds() {
        let t = lex_all("0 2147483647");
        assert_eq!(t[0], Token::Number(0));
        assert_eq!(t[1], Token::Number(i32::MAX));
    }

    #[test]
    fn test_edge_hex() {
        let t = lex_all("$0 $FF");
        assert_eq!(t[0], Token::Number(0));
        assert_eq!(t[1], Token::Number(255));
    }

    #[test]
    fn test_edge_octal() {
        let t = lex_all("&0 &77");
        assert_eq!(t[0], Token::Number(0));
        assert_eq!(t[1], Token::Number(63));
    }

    #[test]
    fn test_edge_empty_string() {
        let t = lex_all("\"\"");
        if let Token::String(s) = &t[0] {
            assert_eq!(s.as_str(), "");
        } else {
            panic!("expected a string token");
        }
    }

    #[test]
    fn test_edge_all_operators() {
        let t = lex_all("+ - * / = != < > <= >= :=");
        assert!(t.contains(&Token::Plus));
        assert!(t.contains(&Token::NotEq));
        assert!(t.contains(&Token::Assign));
    }

    #[test]
    fn test_edge_all_delimiters() {
        let t = lex_all("( ) { } [ ] , ; : . ..");
        assert!(t.contains(&Token::LParen));
        assert!(t.contains(&Token::DotDot));
    }

    #[test]
    fn test_edge_nested_parens() {
        let t = lex_all("((()))");
        assert_eq!(t.iter().filter(|x| **x == Token::LParen).count(), 3);
    }

    #[test]
    fn test_edge_case_sensitivity() {
        let t = lex_all("Begin begin");
        assert_eq!(t[0], Token::Ident(milac_util::Symbol::intern("Begin")));
        assert_eq!(t[1], Token::Begin);
    }

    #[test]
    fn test_edge_word_operators() {
        let t = lex_all("mod div not and xor");
        assert_eq!(t[0], Token::Mod);
        assert_eq!(t[1], Token::Div);
        assert_eq!(t[2], Token::Not);
        assert_eq!(t[3], Token::And);
        assert_eq!(t[4], Token::Xor);
    }

    #[test]
    fn test_edge_dollar_prefixes_hex_only() {
        let t = lex_all("$1A");
        assert_eq!(t, vec![Token::Number(0x1A)]);
    }

    #[test]
    fn test_edge_ampersand_is_dual_purpose() {
        let t = lex_all("a & 17 &17");
        assert_eq!(t[0], Token::Ident(milac_util::Symbol::intern("a")));
        assert_eq!(t[1], Token::Ampersand);
        assert_eq!(t[2], Token::Number(17));
        assert_eq!(t[3], Token::Number(15));
    }

    #[test]
    fn test_edge_max_decimal_overflow() {
        let t = lex_all("99999999999999");
        assert!(matches!(t[0], Token::Invalid(_)));
    }

    #[test]
    fn test_edge_all_keywords() {
        let t = lex_all(
            "begin end const procedure forward function if then else program while \
             exit var integer for to downto do",
        );
        assert!(t.contains(&Token::Begin));
        assert!(t.contains(&Token::Downto));
        assert!(t.contains(&Token::Exit));
    }

    // ==================== ERROR CASES ====================

    #[test]
    fn test_err_unterminated_string() {
        let mut h = Handler::new();
        let _ = Lexer::new("\"unterminated", &mut h).next_token();
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_invalid_chars() {
        let mut h = Handler::new();
        let mut lex = Lexer::new("@~", &mut h);
        while lex.next_token() != Token::Eof {}
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_bare_dollar() {
        let mut h = Handler::new();
        let mut lex = Lexer::new("$", &mut h);
        while lex.next_token() != Token::Eof {}
        assert!(h.has_errors());
    }

    #[test]
    fn test_edge_consecutive_plus() {
        assert!(lex_all("+++").len() == 3);
    }

    #[test]
    fn test_edge_whitespace_variations() {
        let t = lex_all("begin\tx\n:=\n1");
        assert!(t.contains(&Token::Begin));
        assert!(t.contains(&Token::Number(1)));
    }

    #[test]
    fn test_edge_leading_zeros() {
        assert_eq!(lex_all("007"), vec![Token::Number(7)]);
    }

    #[test]
    fn test_edge_comment_to_end_of_line() {
        let t = lex_all("begin # a trailing remark\nend");
        assert_eq!(t, vec![Token::Begin, Token::End]);
    }

    #[test]
    fn test_edge_comment_at_eof_with_no_trailing_newline() {
        let t = lex_all("begin # no newline after this");
        assert_eq!(t, vec![Token::Begin]);
    }

    proptest::proptest! {
        #[test]
        fn prop_arbitrary_input_never_panics_and_always_reaches_eof(source in ".{0,200}") {
            let mut handler = Handler::new();
            let mut lexer = Lexer::new(&source, &mut handler);
            let mut iterations = 0;
            loop {
                let token = lexer.next_token();
                if token == Token::Eof {
                    break;
                }
                iterations += 1;
                // A single pathological input must not drive the lexer into
                // an infinite loop of zero-width tokens.
                if iterations > source.len() + 1 {
                    panic!("lexer did not make progress on {:?}", source);
                }
            }
        }
    }
}
