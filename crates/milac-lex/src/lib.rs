//! Lexical analysis: source text to token stream.
//!
//! The lexer reads UTF-8 source text through a [`cursor::Cursor`] and yields
//! one [`token::Token`] per call to [`lexer::Lexer::next_token`]. It recognizes
//! identifiers and keywords, decimal/`$`-hex/`&`-octal numeric literals,
//! `"..."` string literals, `#` line comments, and the fixed set of
//! single- and two-character operators described in the token tag set.
//! Lexical errors (only an unterminated string literal today) are reported
//! through the shared [`milac_util::diagnostic`] pipeline rather than by
//! stopping the token stream — the lexer always produces a token, falling
//! back to [`token::Token::Invalid`] when it cannot classify a character.

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod unicode;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::Token;
