//! Expression parsing: Pratt precedence climbing.
//!
//! `bp` holds the table from the grammar (higher binds tighter). Assignment
//! is the odd one out: it's right-associative and lower than everything
//! else, so chained assignments (`a := b := c`) group to the right.

use crate::ast::{BinOp, BinaryExpr, CallExpr, Expr};
use crate::Parser;
use milac_lex::Token;

mod bp {
    pub const ASSIGN: u8 = 1;
    pub const OR: u8 = 5;
    pub const AND_XOR: u8 = 10;
    pub const COMPARISON: u8 = 20;
    pub const ADDITIVE: u8 = 30;
    pub const MULTIPLICATIVE: u8 = 40;
    /// Threshold passed to the recursive call parsing a `not` operand: above
    /// every binary operator, so `not` only ever swallows a primary (or a
    /// chain of further `not`s), never a binary expression.
    pub const UNARY_NOT: u8 = 50;
}

impl<'a> Parser<'a> {
    /// Parses a full expression, including a possible `:=` at the top.
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((op, bp, right_assoc)) = self.peek_binop() else {
                break;
            };
            if bp <= min_bp {
                break;
            }

            if op == BinOp::Assign && !matches!(lhs, Expr::Name(..)) {
                self.error_not_an_lvalue(lhs.span());
                return None;
            }

            self.advance();
            let next_min = if right_assoc { bp - 1 } else { bp };
            let rhs = self.parse_expr_bp(next_min)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(BinaryExpr {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
                span,
            });
        }

        Some(lhs)
    }

    /// Maps the current token to `(operator, precedence, right_associative)`
    /// if it names a binary operator.
    fn peek_binop(&self) -> Option<(BinOp, u8, bool)> {
        Some(match self.current_token() {
            Token::Assign => (BinOp::Assign, bp::ASSIGN, true),
            Token::OrOr => (BinOp::Or, bp::OR, false),
            Token::And => (BinOp::And, bp::AND_XOR, false),
            Token::Xor => (BinOp::Xor, bp::AND_XOR, false),
            Token::Eq => (BinOp::Eq, bp::COMPARISON, false),
            Token::NotEq => (BinOp::NotEq, bp::COMPARISON, false),
            Token::Lt => (BinOp::Lt, bp::COMPARISON, false),
            Token::LtEq => (BinOp::LtEq, bp::COMPARISON, false),
            Token::Gt => (BinOp::Gt, bp::COMPARISON, false),
            Token::GtEq => (BinOp::GtEq, bp::COMPARISON, false),
            Token::Plus => (BinOp::Add, bp::ADDITIVE, false),
            Token::Minus => (BinOp::Sub, bp::ADDITIVE, false),
            Token::Star => (BinOp::Mul, bp::MULTIPLICATIVE, false),
            Token::Slash => (BinOp::Div, bp::MULTIPLICATIVE, false),
            Token::Mod => (BinOp::Mod, bp::MULTIPLICATIVE, false),
            Token::Div => (BinOp::Div, bp::MULTIPLICATIVE, false),
            _ => return None,
        })
    }

    /// Parses a primary expression or a `not`-prefixed one.
    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current_token() {
            Token::Not => {
                let span_start = self.current_span();
                self.advance();
                let operand = self.parse_expr_bp(bp::UNARY_NOT)?;
                // `not e` lowers to `e = 0` during IR construction; the
                // parser keeps no separate unary-expression node, since
                // this language has exactly one prefix operator and it is
                // only ever applied to a boolean-valued expression.
                let span = span_start.merge(operand.span());
                Some(Expr::Binary(BinaryExpr {
                    left: Box::new(operand),
                    op: BinOp::Eq,
                    right: Box::new(Expr::Int(0, span)),
                    span,
                }))
            },
            Token::Number(n) => {
                let span = self.current_span();
                self.advance();
                Some(Expr::Int(n, span))
            },
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Some(inner)
            },
            Token::Ident(name) => {
                let span_start = self.current_span();
                self.advance();
                if self.match_token(Token::LParen) {
                    let args = self.parse_arg_list()?;
                    self.expect(Token::RParen)?;
                    let span = self.span_from_start(span_start);
                    Some(Expr::Call(CallExpr {
                        callee: name,
                        args,
                        span,
                    }))
                } else {
                    Some(Expr::Name(name, span_start))
                }
            },
            other => {
                self.error(format!("expected an expression, found {:?}", other));
                None
            },
        }
    }

    /// Parses a comma-separated argument list; empty if the next token is
    /// `)`.
    fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.current_token() == Token::RParen {
            return Some(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        Some(args)
    }
}
