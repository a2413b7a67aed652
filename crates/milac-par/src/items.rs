//! Top-level declaration parsing: functions, procedures, and the
//! `var`/`const`/`begin...end` prelude that makes up the program's main
//! block.
//!
//! A `var-decl-block` or `const-decl-block` expands to several individual
//! [`VarDecl`]/[`ConstDecl`] nodes rather than one block node — the AST has
//! no grouping construct for them, since nothing downstream cares which
//! `var` keyword a declaration came from.

use crate::ast::*;
use crate::Parser;
use milac_lex::Token;

impl<'a> Parser<'a> {
    /// Parses one top-level production: a function, a procedure, or a
    /// `var`/`const` group or `begin...end` block belonging to the
    /// program's main block.
    pub(crate) fn parse_top_level_item(&mut self) -> Option<Vec<TopLevelDecl>> {
        match self.current_token() {
            Token::Function => Some(vec![self.parse_function_decl()?]),
            Token::Procedure => Some(vec![self.parse_procedure_decl()?]),
            Token::Var => Some(
                self.parse_var_decl_block()?
                    .into_iter()
                    .map(TopLevelDecl::Var)
                    .collect(),
            ),
            Token::Const => Some(
                self.parse_const_decl_block()?
                    .into_iter()
                    .map(TopLevelDecl::Const)
                    .collect(),
            ),
            Token::Begin => Some(vec![TopLevelDecl::MainBlock(self.parse_block()?)]),
            other => {
                self.error(format!(
                    "expected a declaration or 'begin', found {:?}",
                    other
                ));
                None
            },
        }
    }

    /// `'function' IDENT '(' param-list ')' ':' type ';' (forward | body)`
    fn parse_function_decl(&mut self) -> Option<TopLevelDecl> {
        let span_start = self.current_span();
        self.expect(Token::Function)?;
        let name = self.parse_ident()?;
        self.expect(Token::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Colon)?;
        let ret_type = self.parse_type()?;
        self.expect(Token::Semicolon)?;

        let prototype = Prototype {
            name,
            params,
            ret_type: Some(ret_type),
            span: self.span_from_start(span_start),
        };

        self.parse_function_tail(prototype)
    }

    /// `'procedure' IDENT '(' param-list ')' ';' (forward | body)`
    fn parse_procedure_decl(&mut self) -> Option<TopLevelDecl> {
        let span_start = self.current_span();
        self.expect(Token::Procedure)?;
        let name = self.parse_ident()?;
        self.expect(Token::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Semicolon)?;

        let prototype = Prototype {
            name,
            params,
            ret_type: None,
            span: self.span_from_start(span_start),
        };

        self.parse_function_tail(prototype)
    }

    /// The part shared by functions and procedures once the prototype has
    /// been parsed: either `forward;` or a full body.
    fn parse_function_tail(&mut self, prototype: Prototype) -> Option<TopLevelDecl> {
        if self.match_token(Token::Forward) {
            self.expect(Token::Semicolon)?;
            return Some(TopLevelDecl::Function(Function {
                prototype,
                locals: Vec::new(),
                consts: Vec::new(),
                body: None,
            }));
        }

        let (locals, consts, body) = self.parse_function_body()?;
        self.expect(Token::Semicolon)?;

        Some(TopLevelDecl::Function(Function {
            prototype,
            locals,
            consts,
            body: Some(body),
        }))
    }

    /// `body := { var-decl-block | const-decl-block } block`
    fn parse_function_body(&mut self) -> Option<(Vec<VarDecl>, Vec<ConstDecl>, Block)> {
        let mut locals = Vec::new();
        let mut consts = Vec::new();

        loop {
            match self.current_token() {
                Token::Var => locals.extend(self.parse_var_decl_block()?),
                Token::Const => consts.extend(self.parse_const_decl_block()?),
                _ => break,
            }
        }

        let block = self.parse_block()?;
        Some((locals, consts, block))
    }

    /// `[ IDENT ':' type { ',' IDENT ':' type } ]`
    fn parse_param_list(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.current_token() == Token::RParen {
            return Some(params);
        }

        loop {
            let name = self.parse_ident()?;
            self.expect(Token::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param { name, ty });
            if !self.match_token(Token::Comma) {
                break;
            }
        }

        Some(params)
    }

    /// `'var' { IDENT ':' type ';' }`
    fn parse_var_decl_block(&mut self) -> Option<Vec<VarDecl>> {
        self.expect(Token::Var)?;
        let mut decls = Vec::new();

        while let Token::Ident(name) = self.current_token() {
            let span_start = self.current_span();
            self.advance();
            self.expect(Token::Colon)?;
            let ty = self.parse_type()?;
            self.expect(Token::Semicolon)?;
            decls.push(VarDecl {
                name,
                ty,
                span: self.span_from_start(span_start),
            });
        }

        Some(decls)
    }

    /// `'const' { IDENT '=' expression ';' }`
    fn parse_const_decl_block(&mut self) -> Option<Vec<ConstDecl>> {
        self.expect(Token::Const)?;
        let mut decls = Vec::new();

        while let Token::Ident(name) = self.current_token() {
            let span_start = self.current_span();
            self.advance();
            self.expect(Token::Eq)?;
            let value = self.parse_expr()?;
            self.expect(Token::Semicolon)?;
            decls.push(ConstDecl {
                name,
                value,
                span: self.span_from_start(span_start),
            });
        }

        Some(decls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milac_util::Handler;

    fn parse_decls(source: &str) -> Vec<TopLevelDecl> {
        let mut handler = Handler::new();
        let full = format!("program Test; {} begin end.", source);
        let mut parser = Parser::from_source(&full, &mut handler);
        let program = parser.parse_program().expect("expected a parsed program");
        assert!(!handler.has_errors(), "unexpected diagnostics for: {}", source);
        program.decls
    }

    #[test]
    fn test_procedure_forward_declaration() {
        let decls = parse_decls("procedure greet(name: integer); forward;");
        match &decls[0] {
            TopLevelDecl::Function(f) => {
                assert!(f.prototype.ret_type.is_none());
                assert!(f.body.is_none());
                assert_eq!(f.prototype.params.len(), 1);
            },
            other => panic!("expected a function decl, got {:?}", other),
        }
    }

    #[test]
    fn test_function_with_body() {
        let decls = parse_decls("function square(n: integer): integer; begin exit end;");
        match &decls[0] {
            TopLevelDecl::Function(f) => {
                assert!(f.prototype.ret_type.is_some());
                assert!(f.body.is_some());
            },
            other => panic!("expected a function decl, got {:?}", other),
        }
    }

    #[test]
    fn test_function_with_locals_and_consts() {
        let decls = parse_decls(
            "function f(): integer; var x: integer; const limit = 10; begin exit end;",
        );
        match &decls[0] {
            TopLevelDecl::Function(f) => {
                assert_eq!(f.locals.len(), 1);
                assert_eq!(f.consts.len(), 1);
            },
            other => panic!("expected a function decl, got {:?}", other),
        }
    }

    #[test]
    fn test_procedure_with_no_params() {
        let decls = parse_decls("procedure greet(); begin exit end;");
        match &decls[0] {
            TopLevelDecl::Function(f) => assert!(f.prototype.params.is_empty()),
            other => panic!("expected a function decl, got {:?}", other),
        }
    }

    #[test]
    fn test_top_level_var_block_expands_to_individual_decls() {
        let decls = parse_decls("var x: integer; y: integer;");
        assert_eq!(decls.len(), 2);
        assert!(matches!(decls[0], TopLevelDecl::Var(_)));
        assert!(matches!(decls[1], TopLevelDecl::Var(_)));
    }

    #[test]
    fn test_top_level_const_block_expands_to_individual_decls() {
        let decls = parse_decls("const a = 1; b = 2;");
        assert_eq!(decls.len(), 2);
        assert!(matches!(decls[0], TopLevelDecl::Const(_)));
    }
}
