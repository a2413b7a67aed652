//! Edge case tests exercising combinations of productions rather than a
//! single grammar rule in isolation.

#[cfg(test)]
mod tests {
    use crate::{parse_program, Program};
    use milac_util::Handler;

    fn parse(source: &str) -> (Option<Program>, Handler) {
        let mut handler = Handler::new();
        let program = parse_program(source, &mut handler);
        (program, handler)
    }

    #[test]
    fn test_edge_empty_program_body() {
        let (program, handler) = parse("program Empty; begin end.");
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_deeply_nested_blocks() {
        let (program, handler) = parse("program Nested; begin begin begin exit end end end.");
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_nested_if_else() {
        let source =
            "program P; begin if a then if b then exit else writeln(1) else writeln(2) end.";
        let (program, handler) = parse(source);
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_dangling_else_binds_to_nearest_if() {
        // `else` attaches to the inner `if b`, not the outer `if a`.
        let source = "program P; begin if a then if b then writeln(1) else writeln(2) end.";
        let (program, _handler) = parse(source);
        let program = program.expect("expected a parsed program");
        let crate::ast::TopLevelDecl::MainBlock(block) = &program.decls[0] else {
            panic!("expected a main block");
        };
        let crate::ast::Stmt::If(outer) = &block.stmts[0] else {
            panic!("expected an if statement");
        };
        assert!(outer.else_branch.is_none());
    }

    #[test]
    fn test_edge_nested_function_calls() {
        let source = "program P; begin writeln(dec(readln())) end.";
        let (program, handler) = parse(source);
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_forward_then_definition() {
        let source = "program P; \
            function helper(x: integer): integer; forward; \
            function helper(x: integer): integer; begin exit end; \
            begin end.";
        let (program, handler) = parse(source);
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_complex_expression_precedence() {
        let source = "program P; var x: integer; begin x := (1 + 2) * 3 - 4 div 2 mod 5 end.";
        let (program, handler) = parse(source);
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_comment_between_tokens() {
        let source = "program P; # entry point\nbegin # nothing to do\nend.";
        let (program, handler) = parse(source);
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_edge_nested_for_loops() {
        let source = "program P; var i: integer; var j: integer; \
            begin for i := 1 to 10 do for j := 10 downto 1 do writeln(i) end.";
        let (program, handler) = parse(source);
        assert!(program.is_some());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_err_missing_semicolon_between_statements() {
        let source = "program P; begin writeln(1) writeln(2) end.";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_missing_program_keyword() {
        let source = "Main; begin end.";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_unclosed_block() {
        let source = "program P; begin writeln(1);";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_unbalanced_parens_in_call() {
        let source = "program P; begin writeln(1 end.";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_for_loop_missing_direction() {
        let source = "program P; var i: integer; begin for i := 1 10 do writeln(i) end.";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_assign_to_non_lvalue_aborts_parse() {
        let source = "program P; begin 1 + 1 := 2 end.";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_stops_at_first_error_no_recovery() {
        // The malformed `var` block should produce exactly the one error
        // that aborts the parse, not a cascade of recovery-driven ones.
        let source = "program P; var x integer; begin end.";
        let (program, handler) = parse(source);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }
}
