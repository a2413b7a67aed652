//! Re-prints a parsed [`Program`] back into source text.
//!
//! This is the other half of the parser's round-trip invariant: for any
//! program the parser accepts, printing its AST and re-parsing the result
//! must yield a structurally equal tree (modulo spans, which are positional
//! and expected to differ). There is no pretty-printing beyond what keeps
//! the grammar unambiguous — no alignment, no line wrapping.

use crate::ast::{
    BinOp, Block, ConstDecl, Expr, ForDirection, ForStmt, Function, IfStmt, Param, Program,
    Prototype, Stmt, TopLevelDecl, Type, VarDecl, WhileStmt,
};

/// Prints a complete program back to Mila source text.
pub fn print_program(program: &Program) -> String {
    let mut out = format!("program {};\n", program.name.as_str());
    for decl in &program.decls {
        print_top_level_decl(decl, &mut out);
    }
    out.push('.');
    out
}

fn print_top_level_decl(decl: &TopLevelDecl, out: &mut String) {
    match decl {
        TopLevelDecl::Function(f) => print_function(f, out),
        TopLevelDecl::Var(v) => print_var_decl(v, out),
        TopLevelDecl::Const(c) => print_const_decl(c, out),
        TopLevelDecl::MainBlock(block) => {
            print_block(block, out);
            out.push(';');
            out.push('\n');
        },
    }
}

fn print_type(ty: Type) -> &'static str {
    match ty {
        Type::Integer => "integer",
    }
}

fn print_var_decl(decl: &VarDecl, out: &mut String) {
    out.push_str(&format!("var {} : {};\n", decl.name.as_str(), print_type(decl.ty)));
}

fn print_const_decl(decl: &ConstDecl, out: &mut String) {
    out.push_str("const ");
    out.push_str(decl.name.as_str());
    out.push_str(" = ");
    print_expr(&decl.value, out);
    out.push_str(";\n");
}

fn print_prototype(proto: &Prototype, out: &mut String) {
    out.push_str(if proto.ret_type.is_some() { "function " } else { "procedure " });
    out.push_str(proto.name.as_str());
    out.push('(');
    for (i, Param { name, ty }) in proto.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("{} : {}", name.as_str(), print_type(*ty)));
    }
    out.push(')');
    if let Some(ret) = proto.ret_type {
        out.push_str(" : ");
        out.push_str(print_type(ret));
    }
}

fn print_function(f: &Function, out: &mut String) {
    print_prototype(&f.prototype, out);
    out.push_str(";\n");
    match &f.body {
        None => out.push_str("forward;\n"),
        Some(body) => {
            for local in &f.locals {
                print_var_decl(local, out);
            }
            for c in &f.consts {
                print_const_decl(c, out);
            }
            print_block(body, out);
            out.push_str(";\n");
        },
    }
}

fn print_block(block: &Block, out: &mut String) {
    out.push_str("begin\n");
    for (i, stmt) in block.stmts.iter().enumerate() {
        if i > 0 {
            out.push_str(";\n");
        }
        print_stmt(stmt, out);
    }
    out.push_str("\nend");
}

fn print_stmt(stmt: &Stmt, out: &mut String) {
    match stmt {
        Stmt::Expr(e) => print_expr(e, out),
        Stmt::If(IfStmt { cond, then_branch, else_branch, .. }) => {
            out.push_str("if ");
            print_expr(cond, out);
            out.push_str(" then ");
            print_stmt(then_branch, out);
            if let Some(else_branch) = else_branch {
                out.push_str(" else ");
                print_stmt(else_branch, out);
            }
        },
        Stmt::While(WhileStmt { cond, body, .. }) => {
            out.push_str("while ");
            print_expr(cond, out);
            out.push_str(" do ");
            print_stmt(body, out);
        },
        Stmt::For(ForStmt { var, start, end, direction, body, .. }) => {
            out.push_str(&format!("for {} := ", var.as_str()));
            print_expr(start, out);
            out.push_str(match direction {
                ForDirection::To => " to ",
                ForDirection::Downto => " downto ",
            });
            print_expr(end, out);
            out.push_str(" do ");
            print_stmt(body, out);
        },
        Stmt::Exit(_) => out.push_str("exit"),
        Stmt::Block(block) => print_block(block, out),
    }
}

fn print_expr(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Int(n, _) => out.push_str(&n.to_string()),
        Expr::Name(name, _) => out.push_str(name.as_str()),
        Expr::Binary(b) => {
            out.push('(');
            print_expr(&b.left, out);
            out.push_str(print_binop(b.op));
            print_expr(&b.right, out);
            out.push(')');
        },
        Expr::Call(call) => {
            out.push_str(call.callee.as_str());
            out.push('(');
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_expr(arg, out);
            }
            out.push(')');
        },
    }
}

fn print_binop(op: BinOp) -> &'static str {
    match op {
        BinOp::Assign => " := ",
        BinOp::Add => " + ",
        BinOp::Sub => " - ",
        BinOp::Mul => " * ",
        BinOp::Div => " div ",
        BinOp::Mod => " mod ",
        BinOp::Eq => " = ",
        BinOp::NotEq => " <> ",
        BinOp::Lt => " < ",
        BinOp::LtEq => " <= ",
        BinOp::Gt => " > ",
        BinOp::GtEq => " >= ",
        BinOp::And => " and ",
        BinOp::Or => " or ",
        BinOp::Xor => " xor ",
    }
}

/// Compares two programs ignoring spans, which are positional and expected
/// to differ once a program has been printed and re-parsed.
pub fn programs_match(a: &Program, b: &Program) -> bool {
    a.name == b.name
        && a.decls.len() == b.decls.len()
        && a.decls.iter().zip(&b.decls).all(|(x, y)| top_level_decls_match(x, y))
}

fn top_level_decls_match(a: &TopLevelDecl, b: &TopLevelDecl) -> bool {
    match (a, b) {
        (TopLevelDecl::Function(x), TopLevelDecl::Function(y)) => functions_match(x, y),
        (TopLevelDecl::Var(x), TopLevelDecl::Var(y)) => x.name == y.name && x.ty == y.ty,
        (TopLevelDecl::Const(x), TopLevelDecl::Const(y)) => {
            x.name == y.name && exprs_match(&x.value, &y.value)
        },
        (TopLevelDecl::MainBlock(x), TopLevelDecl::MainBlock(y)) => blocks_match(x, y),
        _ => false,
    }
}

fn functions_match(a: &Function, b: &Function) -> bool {
    a.prototype.name == b.prototype.name
        && a.prototype.ret_type == b.prototype.ret_type
        && a.prototype.params.len() == b.prototype.params.len()
        && a.prototype
            .params
            .iter()
            .zip(&b.prototype.params)
            .all(|(x, y)| x.name == y.name && x.ty == y.ty)
        && match (&a.body, &b.body) {
            (None, None) => true,
            (Some(x), Some(y)) => blocks_match(x, y),
            _ => false,
        }
}

fn blocks_match(a: &Block, b: &Block) -> bool {
    a.stmts.len() == b.stmts.len() && a.stmts.iter().zip(&b.stmts).all(|(x, y)| stmts_match(x, y))
}

fn stmts_match(a: &Stmt, b: &Stmt) -> bool {
    match (a, b) {
        (Stmt::Expr(x), Stmt::Expr(y)) => exprs_match(x, y),
        (Stmt::If(x), Stmt::If(y)) => {
            exprs_match(&x.cond, &y.cond)
                && stmts_match(&x.then_branch, &y.then_branch)
                && match (&x.else_branch, &y.else_branch) {
                    (None, None) => true,
                    (Some(a), Some(b)) => stmts_match(a, b),
                    _ => false,
                }
        },
        (Stmt::While(x), Stmt::While(y)) => {
            exprs_match(&x.cond, &y.cond) && stmts_match(&x.body, &y.body)
        },
        (Stmt::For(x), Stmt::For(y)) => {
            x.var == y.var
                && x.direction == y.direction
                && exprs_match(&x.start, &y.start)
                && exprs_match(&x.end, &y.end)
                && stmts_match(&x.body, &y.body)
        },
        (Stmt::Exit(_), Stmt::Exit(_)) => true,
        (Stmt::Block(x), Stmt::Block(y)) => blocks_match(x, y),
        _ => false,
    }
}

fn exprs_match(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Int(x, _), Expr::Int(y, _)) => x == y,
        (Expr::Name(x, _), Expr::Name(y, _)) => x == y,
        (Expr::Binary(x), Expr::Binary(y)) => {
            x.op == y.op && exprs_match(&x.left, &y.left) && exprs_match(&x.right, &y.right)
        },
        (Expr::Call(x), Expr::Call(y)) => {
            x.callee == y.callee
                && x.args.len() == y.args.len()
                && x.args.iter().zip(&y.args).all(|(a, b)| exprs_match(a, b))
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milac_util::Handler;
    use proptest::prelude::*;

    fn reparse(source: &str) -> Program {
        let mut handler = Handler::new();
        crate::parse_program(source, &mut handler).expect("printed source must re-parse")
    }

    #[test]
    fn prints_a_trivial_program() {
        let mut handler = Handler::new();
        let program = crate::parse_program("program P; begin end.", &mut handler).unwrap();
        let printed = print_program(&program);
        assert!(printed.starts_with("program P;"));
        assert!(printed.ends_with('.'));
    }

    #[test]
    fn round_trips_a_hand_written_program() {
        let mut handler = Handler::new();
        let source = "program P; var x : integer; const k = 2; \
                      begin x := 1 + k * 3; if x > 0 then writeln(x) else writeln(0) end.";
        let program = crate::parse_program(source, &mut handler).unwrap();
        let printed = print_program(&program);
        let reprinted = reparse(&printed);
        assert!(programs_match(&program, &reprinted));
    }

    fn arb_expr(vars: Vec<&'static str>) -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            (0i32..1000).prop_map(|n| n.to_string()),
            prop::sample::select(vars.clone()).prop_map(|s| s.to_string()),
        ];
        leaf.prop_recursive(3, 16, 4, move |inner| {
            (inner.clone(), inner).prop_map(|(l, r)| format!("({} + {})", l, r))
        })
    }

    proptest! {
        #[test]
        fn round_trips_generated_assignments(
            value_a in arb_expr(vec!["x", "y"]),
            value_b in arb_expr(vec!["x", "y"]),
        ) {
            let source = format!(
                "program P; var x : integer; var y : integer; \
                 begin x := {}; y := {} end.",
                value_a, value_b
            );
            let mut handler = Handler::new();
            let program = match crate::parse_program(&source, &mut handler) {
                Some(p) => p,
                None => return Ok(()),
            };
            let printed = print_program(&program);
            let mut reparse_handler = Handler::new();
            let reprinted = crate::parse_program(&printed, &mut reparse_handler)
                .expect("printed source must re-parse");
            prop_assert!(programs_match(&program, &reprinted));
        }
    }
}
