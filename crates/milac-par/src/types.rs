//! Type and identifier parsing.
//!
//! The only spellable type is `integer`, so `parse_type` is a one-arm match
//! rather than a dispatch table.

use crate::ast::Type;
use crate::Parser;
use milac_lex::Token;

impl<'a> Parser<'a> {
    /// Parses a type name. Currently always `integer`.
    pub(crate) fn parse_type(&mut self) -> Option<Type> {
        match self.current_token() {
            Token::Integer => {
                self.advance();
                Some(Type::Integer)
            },
            other => {
                self.error(format!("expected a type, found {:?}", other));
                None
            },
        }
    }
}
