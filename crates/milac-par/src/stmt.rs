//! Statement parsing: `if`, `while`, `for`, `exit`, blocks, and bare
//! expression statements (which cover assignment and calls).

use crate::ast::*;
use crate::Parser;
use milac_lex::Token;

impl<'a> Parser<'a> {
    /// Parses `'begin' { statement ';' } 'end'`.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let span_start = self.current_span();
        self.expect(Token::Begin)?;

        let mut stmts = Vec::new();
        while !self.is_at_end() && self.current_token() != Token::End {
            stmts.push(self.parse_stmt()?);
            if self.current_token() != Token::End {
                self.expect(Token::Semicolon)?;
            }
        }

        self.expect(Token::End)?;
        Some(Block {
            stmts,
            span: self.span_from_start(span_start),
        })
    }

    /// Parses either a `begin...end` block or a single statement, wrapping
    /// the latter in `Stmt::Block` so callers always get one `Block`.
    pub(crate) fn parse_stmt_or_block(&mut self) -> Option<Block> {
        if self.current_token() == Token::Begin {
            self.parse_block()
        } else {
            let span_start = self.current_span();
            let stmt = self.parse_stmt()?;
            Some(Block {
                stmts: vec![stmt],
                span: self.span_from_start(span_start),
            })
        }
    }

    /// Parses a single statement (without the trailing `;`).
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current_token() {
            Token::If => self.parse_if_stmt().map(Stmt::If),
            Token::While => self.parse_while_stmt().map(Stmt::While),
            Token::For => self.parse_for_stmt().map(Stmt::For),
            Token::Exit => {
                let span = self.current_span();
                self.advance();
                Some(Stmt::Exit(span))
            },
            Token::Begin => self.parse_block().map(Stmt::Block),
            _ => self.parse_expr().map(Stmt::Expr),
        }
    }

    /// `'if' expression 'then' stmt-or-block [ 'else' stmt-or-block ]`
    fn parse_if_stmt(&mut self) -> Option<IfStmt> {
        let span_start = self.current_span();
        self.expect(Token::If)?;
        let cond = self.parse_expr()?;
        self.expect(Token::Then)?;
        let then_branch = Box::new(Stmt::Block(self.parse_stmt_or_block()?));

        let else_branch = if self.match_token(Token::Else) {
            Some(Box::new(Stmt::Block(self.parse_stmt_or_block()?)))
        } else {
            None
        };

        Some(IfStmt {
            cond,
            then_branch,
            else_branch,
            span: self.span_from_start(span_start),
        })
    }

    /// `'while' expression 'do' stmt-or-block`
    fn parse_while_stmt(&mut self) -> Option<WhileStmt> {
        let span_start = self.current_span();
        self.expect(Token::While)?;
        let cond = self.parse_expr()?;
        self.expect(Token::Do)?;
        let body = Box::new(Stmt::Block(self.parse_stmt_or_block()?));

        Some(WhileStmt {
            cond,
            body,
            span: self.span_from_start(span_start),
        })
    }

    /// `'for' IDENT ':=' expression ('to'|'downto') expression 'do' stmt-or-block`
    fn parse_for_stmt(&mut self) -> Option<ForStmt> {
        let span_start = self.current_span();
        self.expect(Token::For)?;
        let var = self.parse_ident()?;
        self.expect(Token::Assign)?;
        let start = self.parse_expr()?;

        let direction = if self.match_token(Token::To) {
            ForDirection::To
        } else if self.match_token(Token::Downto) {
            ForDirection::Downto
        } else {
            self.error(format!(
                "expected 'to' or 'downto', found {:?}",
                self.current_token()
            ));
            return None;
        };

        let end = self.parse_expr()?;
        self.expect(Token::Do)?;
        let body = Box::new(Stmt::Block(self.parse_stmt_or_block()?));

        Some(ForStmt {
            var,
            start,
            end,
            direction,
            body,
            span: self.span_from_start(span_start),
        })
    }
}
