//! Lowers a parsed program into IR.
//!
//! Follows the parser's own convention: fatal problems are reported
//! through the shared `Handler` and the call returns `None`, rather than
//! threading a `Result` through every helper. `readln`, `writeln`, and
//! `dec` are recognized by name and lowered as intrinsics rather than
//! ordinary calls, since none of them has source-visible declaration.

use milac_par::ast::{
    BinOp as AstBinOp, Block, CallExpr, ConstDecl, Expr, ForDirection, ForStmt, Function, IfStmt,
    Program, Prototype, Stmt, TopLevelDecl, VarDecl, WhileStmt,
};
use milac_util::symbol::{ID_DEC, ID_MAIN, ID_READLN, ID_WRITELN};
use milac_util::{DiagnosticBuilder, DiagnosticCode, FxHashMap, Handler, Span, Symbol};

use crate::builder::Builder;
use crate::mir::{BinOp as IrBinOp, BlockId, CallArg, Module, Operand, SlotId, Terminator};
use crate::symtab::SymbolTable;
use crate::ty::Type;
use crate::verify::verify_function;

/// What a `exit` closes over: the innermost loop (if any), otherwise how
/// the enclosing function returns.
#[derive(Clone, Copy)]
enum ReturnKind {
    Void,
    Slot(SlotId),
    MainZero,
}

#[derive(Clone, Copy)]
struct FuncProto {
    arity: usize,
    return_ty: Type,
    defined: bool,
}

struct Lowerer<'a> {
    handler: &'a mut Handler,
    symtab: SymbolTable,
    functions: FxHashMap<Symbol, FuncProto>,
    loop_exits: Vec<BlockId>,
    return_kind: ReturnKind,
}

/// Lowers a whole program. Returns `None` if any declaration failed to
/// lower or the emitted module failed verification; diagnostics for every
/// failure have already been reported to `handler`.
pub fn lower_program(program: &Program, handler: &mut Handler) -> Option<Module> {
    let mut lowerer = Lowerer {
        handler,
        symtab: SymbolTable::new(),
        functions: FxHashMap::default(),
        loop_exits: Vec::new(),
        return_kind: ReturnKind::Void,
    };
    lowerer.register_prototypes(program);

    let mut module = Module::new();
    let mut top_vars = Vec::new();
    let mut top_consts = Vec::new();
    let mut main_block = None;

    for decl in &program.decls {
        match decl {
            TopLevelDecl::Function(f) => {
                if f.body.is_some() {
                    let ir = lowerer.lower_function(f)?;
                    module.functions.push(ir);
                }
            },
            TopLevelDecl::Var(v) => top_vars.push(v),
            TopLevelDecl::Const(c) => top_consts.push(c),
            TopLevelDecl::MainBlock(b) => main_block = Some(b),
        }
    }

    let main_block = match main_block {
        Some(b) => b,
        None => {
            lowerer.emit(
                DiagnosticCode::E_LOWER_NO_MAIN_BLOCK,
                "program has no main block",
                program.span,
            );
            return None;
        },
    };
    let main_fn = lowerer.lower_main(&top_vars, &top_consts, main_block)?;
    module.functions.push(main_fn);

    if lowerer.handler.has_errors() {
        return None;
    }
    Some(module)
}

impl<'a> Lowerer<'a> {
    fn register_prototypes(&mut self, program: &Program) {
        for decl in &program.decls {
            if let TopLevelDecl::Function(f) = decl {
                self.register_prototype(f);
            }
        }
    }

    fn register_prototype(&mut self, f: &Function) {
        let return_ty = return_type_of(&f.prototype);
        let arity = f.prototype.params.len();
        let defined = f.body.is_some();
        match self.functions.get_mut(&f.prototype.name) {
            Some(existing) => {
                if existing.defined && defined {
                    self.error_redeclaration(f.prototype.name, f.prototype.span);
                }
                existing.defined = existing.defined || defined;
            },
            None => {
                self.functions.insert(f.prototype.name, FuncProto { arity, return_ty, defined });
            },
        }
    }

    fn lower_function(&mut self, f: &Function) -> Option<crate::mir::Function> {
        let _span = tracing::info_span!("lower_function", name = %f.prototype.name).entered();
        let body = f.body.as_ref().expect("caller only lowers defined functions");
        let proto = &f.prototype;
        let return_ty = return_type_of(proto);

        self.symtab.clear();
        let mut builder = Builder::new(proto.name, return_ty);

        let return_slot = match return_ty {
            Type::Void => None,
            Type::Int32 => {
                let slot = builder.add_slot(proto.name, Type::Int32);
                if self.symtab.declare(proto.name, slot, false).is_err() {
                    self.error_redeclaration(proto.name, proto.span);
                    return None;
                }
                Some(slot)
            },
        };
        self.return_kind = match return_slot {
            Some(slot) => ReturnKind::Slot(slot),
            None => ReturnKind::Void,
        };

        for param in &proto.params {
            let slot = builder.add_param(param.name, Type::Int32);
            if self.symtab.declare(param.name, slot, false).is_err() {
                self.error_redeclaration(param.name, proto.span);
                return None;
            }
        }

        for local in &f.locals {
            self.lower_var_decl(&mut builder, local)?;
        }
        for c in &f.consts {
            self.lower_const_decl(&mut builder, c)?;
        }

        self.lower_block(&mut builder, body)?;

        if !builder.is_current_block_terminated() {
            let term = match return_slot {
                None => Terminator::Return(None),
                Some(slot) => {
                    let value = builder.load(slot);
                    Terminator::Return(Some(value))
                },
            };
            builder.terminate(term);
        }

        let function = builder.build();
        self.check_verify(&function, proto.span)?;
        Some(function)
    }

    fn lower_main(
        &mut self,
        vars: &[&VarDecl],
        consts: &[&ConstDecl],
        block: &Block,
    ) -> Option<crate::mir::Function> {
        let _span = tracing::info_span!("lower_function", name = "main").entered();
        self.symtab.clear();
        self.return_kind = ReturnKind::MainZero;
        let mut builder = Builder::new(Symbol::intern("main"), Type::Int32);

        for v in vars {
            self.lower_var_decl(&mut builder, v)?;
        }
        for c in consts {
            self.lower_const_decl(&mut builder, c)?;
        }

        self.lower_block(&mut builder, block)?;

        if !builder.is_current_block_terminated() {
            let zero = builder.const_value(0);
            builder.terminate(Terminator::Return(Some(zero)));
        }

        let function = builder.build();
        self.check_verify(&function, block.span)?;
        Some(function)
    }

    fn lower_var_decl(&mut self, builder: &mut Builder, decl: &VarDecl) -> Option<()> {
        let slot = builder.add_slot(decl.name, Type::Int32);
        if self.symtab.declare(decl.name, slot, false).is_err() {
            self.error_redeclaration(decl.name, decl.span);
            return None;
        }
        let zero = builder.const_value(0);
        builder.store(slot, zero);
        Some(())
    }

    fn lower_const_decl(&mut self, builder: &mut Builder, decl: &ConstDecl) -> Option<()> {
        let value = self.lower_expr(builder, &decl.value)?;
        let slot = builder.add_slot(decl.name, Type::Int32);
        if self.symtab.declare(decl.name, slot, true).is_err() {
            self.error_redeclaration(decl.name, decl.span);
            return None;
        }
        builder.store(slot, value);
        Some(())
    }

    fn lower_block(&mut self, builder: &mut Builder, block: &Block) -> Option<()> {
        for stmt in &block.stmts {
            self.lower_stmt(builder, stmt)?;
        }
        Some(())
    }

    fn lower_stmt(&mut self, builder: &mut Builder, stmt: &Stmt) -> Option<()> {
        match stmt {
            Stmt::Expr(e) => self.lower_expr_stmt(builder, e),
            Stmt::Block(b) => self.lower_block(builder, b),
            Stmt::If(s) => self.lower_if(builder, s),
            Stmt::While(s) => self.lower_while(builder, s),
            Stmt::For(s) => self.lower_for(builder, s),
            Stmt::Exit(_) => self.lower_exit(builder),
        }
    }

    fn lower_if(&mut self, builder: &mut Builder, s: &IfStmt) -> Option<()> {
        let cond = self.lower_expr(builder, &s.cond)?;
        let test = self.test_nonzero(builder, cond);

        let then_block = builder.new_block();
        let else_block = builder.new_block();
        let merge_block = builder.new_block();
        builder.terminate(Terminator::If { cond: test, then_block, else_block });

        builder.set_current_block(then_block);
        self.lower_stmt(builder, &s.then_branch)?;
        builder.terminate(Terminator::Goto { target: merge_block });

        builder.set_current_block(else_block);
        if let Some(else_branch) = &s.else_branch {
            self.lower_stmt(builder, else_branch)?;
        }
        builder.terminate(Terminator::Goto { target: merge_block });

        builder.set_current_block(merge_block);
        Some(())
    }

    fn lower_while(&mut self, builder: &mut Builder, s: &WhileStmt) -> Option<()> {
        let cond_block = builder.new_block();
        let body_block = builder.new_block();
        let exit_block = builder.new_block();

        builder.terminate(Terminator::Goto { target: cond_block });

        builder.set_current_block(cond_block);
        let cond = self.lower_expr(builder, &s.cond)?;
        let test = self.test_nonzero(builder, cond);
        builder.terminate(Terminator::If { cond: test, then_block: body_block, else_block: exit_block });

        builder.set_current_block(body_block);
        self.loop_exits.push(exit_block);
        let result = self.lower_stmt(builder, &s.body);
        self.loop_exits.pop();
        result?;
        if !builder.is_current_block_terminated() {
            builder.terminate(Terminator::Goto { target: cond_block });
        }

        builder.set_current_block(exit_block);
        Some(())
    }

    fn lower_for(&mut self, builder: &mut Builder, s: &ForStmt) -> Option<()> {
        let entry = self.lookup_or_error(s.var, s.span)?;
        if entry.is_constant {
            self.error_assign_to_const(s.var, s.span);
            return None;
        }

        let start = self.lower_expr(builder, &s.start)?;
        builder.store(entry.slot, start);

        let cond_block = builder.new_block();
        let body_block = builder.new_block();
        let exit_block = builder.new_block();
        builder.terminate(Terminator::Goto { target: cond_block });

        builder.set_current_block(cond_block);
        let current = builder.load(entry.slot);
        let bound = self.lower_expr(builder, &s.end)?;
        let cmp = match s.direction {
            ForDirection::To => IrBinOp::Le,
            ForDirection::Downto => IrBinOp::Ge,
        };
        let test = builder.binary(cmp, current, bound);
        builder.terminate(Terminator::If { cond: test, then_block: body_block, else_block: exit_block });

        builder.set_current_block(body_block);
        self.loop_exits.push(exit_block);
        let result = self.lower_stmt(builder, &s.body);
        self.loop_exits.pop();
        result?;

        if !builder.is_current_block_terminated() {
            let step_base = builder.load(entry.slot);
            let one = builder.const_value(1);
            let step_op = match s.direction {
                ForDirection::To => IrBinOp::Add,
                ForDirection::Downto => IrBinOp::Sub,
            };
            let stepped = builder.binary(step_op, step_base, one);
            builder.store(entry.slot, stepped);
            builder.terminate(Terminator::Goto { target: cond_block });
        }

        builder.set_current_block(exit_block);
        Some(())
    }

    /// `exit` breaks the innermost loop if lowering is inside one,
    /// otherwise returns from the enclosing function.
    fn lower_exit(&mut self, builder: &mut Builder) -> Option<()> {
        if let Some(&exit_block) = self.loop_exits.last() {
            builder.terminate(Terminator::Goto { target: exit_block });
            return Some(());
        }
        let term = match self.return_kind {
            ReturnKind::Void => Terminator::Return(None),
            ReturnKind::Slot(slot) => {
                let value = builder.load(slot);
                Terminator::Return(Some(value))
            },
            ReturnKind::MainZero => {
                let zero = builder.const_value(0);
                Terminator::Return(Some(zero))
            },
        };
        builder.terminate(term);
        Some(())
    }

    /// Lowers an expression used as a statement in its own right (the
    /// `Stmt::Expr` arm of [`lower_stmt`]). Unlike [`lower_expr`], a call
    /// that produces no value is not an error here — `writeln`/`readln`/
    /// `dec` and void procedures are only ever written as bare statements,
    /// so this is the common case rather than an exception.
    fn lower_expr_stmt(&mut self, builder: &mut Builder, expr: &Expr) -> Option<()> {
        match expr {
            Expr::Call(c) => self.lower_call(builder, c).map(|_| ()),
            _ => self.lower_expr(builder, expr).map(|_| ()),
        }
    }

    fn lower_expr(&mut self, builder: &mut Builder, expr: &Expr) -> Option<Operand> {
        match expr {
            Expr::Int(n, _) => Some(builder.const_value(*n)),
            Expr::Name(name, span) => {
                let entry = self.lookup_or_error(*name, *span)?;
                Some(builder.load(entry.slot))
            },
            Expr::Binary(b) => {
                if b.op == AstBinOp::Assign {
                    self.lower_assign(builder, &b.left, &b.right)
                } else {
                    let lhs = self.lower_expr(builder, &b.left)?;
                    let rhs = self.lower_expr(builder, &b.right)?;
                    Some(builder.binary(convert_binop(b.op), lhs, rhs))
                }
            },
            Expr::Call(c) => match self.lower_call(builder, c)? {
                Some(value) => Some(value),
                None => {
                    self.error_void_call_as_value(c.callee, c.span);
                    None
                },
            },
        }
    }

    fn lower_assign(&mut self, builder: &mut Builder, lhs: &Expr, rhs: &Expr) -> Option<Operand> {
        let value = self.lower_expr(builder, rhs)?;
        let (name, span) = match lhs {
            Expr::Name(name, span) => (*name, *span),
            _ => unreachable!("parser rejects non-name assignment targets"),
        };
        let entry = self.lookup_or_error(name, span)?;
        if entry.is_constant {
            self.error_assign_to_const(name, span);
            return None;
        }
        builder.store(entry.slot, value);
        Some(value)
    }

    /// Lowers a call expression. The outer `Option` is the usual
    /// fail-with-diagnostic-already-reported convention; the inner `Option`
    /// is the call's own result, which is absent for `writeln`/`readln`/
    /// `dec` and void procedures. Keeping these distinct is what lets
    /// [`lower_expr_stmt`] treat a void call as a successful statement
    /// while [`lower_expr`] still catches one used where a value is
    /// required.
    fn lower_call(&mut self, builder: &mut Builder, call: &CallExpr) -> Option<Option<Operand>> {
        if call.callee == ID_DEC {
            return self.lower_dec(builder, call);
        }
        if call.callee == ID_READLN {
            return self.lower_readln(builder, call);
        }
        if call.callee == ID_WRITELN {
            return self.lower_writeln(builder, call);
        }

        let proto = match self.functions.get(&call.callee) {
            Some(p) => *p,
            None => {
                self.error_unknown_name(call.callee, call.span);
                return None;
            },
        };
        if proto.arity != call.args.len() {
            self.error_arity_mismatch(call.callee, proto.arity, call.args.len(), call.span);
            return None;
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let v = self.lower_expr(builder, arg)?;
            args.push(CallArg::Value(v));
        }
        Some(builder.call(call.callee, args, proto.return_ty != Type::Void))
    }

    fn lower_dec(&mut self, builder: &mut Builder, call: &CallExpr) -> Option<Option<Operand>> {
        if call.args.len() != 1 {
            self.error_arity_mismatch(call.callee, 1, call.args.len(), call.span);
            return None;
        }
        let (name, span) = self.expect_name_arg(&call.args[0])?;
        let entry = self.lookup_or_error(name, span)?;
        if entry.is_constant {
            self.error_assign_to_const(name, span);
            return None;
        }
        let current = builder.load(entry.slot);
        let one = builder.const_value(1);
        let updated = builder.binary(IrBinOp::Sub, current, one);
        builder.store(entry.slot, updated);
        Some(None)
    }

    fn lower_readln(&mut self, builder: &mut Builder, call: &CallExpr) -> Option<Option<Operand>> {
        if call.args.len() != 1 {
            self.error_arity_mismatch(call.callee, 1, call.args.len(), call.span);
            return None;
        }
        let (name, span) = self.expect_name_arg(&call.args[0])?;
        let entry = self.lookup_or_error(name, span)?;
        if entry.is_constant {
            self.error_assign_to_const(name, span);
            return None;
        }
        builder.call(call.callee, vec![CallArg::SlotAddress(entry.slot)], false);
        Some(None)
    }

    fn lower_writeln(&mut self, builder: &mut Builder, call: &CallExpr) -> Option<Option<Operand>> {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let v = self.lower_expr(builder, arg)?;
            args.push(CallArg::Value(v));
        }
        builder.call(call.callee, args, false);
        Some(None)
    }

    fn expect_name_arg(&mut self, expr: &Expr) -> Option<(Symbol, Span)> {
        match expr {
            Expr::Name(n, s) => Some((*n, *s)),
            other => {
                self.error_call_arg_not_lvalue(other.span());
                None
            },
        }
    }

    fn lookup_or_error(&mut self, name: Symbol, span: Span) -> Option<crate::symtab::SymbolEntry> {
        match self.symtab.lookup(name) {
            Some(e) => Some(e),
            None => {
                self.error_unknown_name(name, span);
                None
            },
        }
    }

    fn test_nonzero(&mut self, builder: &mut Builder, value: Operand) -> Operand {
        let zero = builder.const_value(0);
        builder.binary(IrBinOp::Ne, value, zero)
    }

    fn check_verify(&mut self, function: &crate::mir::Function, span: Span) -> Option<()> {
        match verify_function(function) {
            Ok(()) => Some(()),
            Err(e) => {
                self.emit(DiagnosticCode::E_LOWER_VERIFY_FAILED, e.to_string(), span);
                None
            },
        }
    }

    fn emit(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        DiagnosticBuilder::error(message).code(code).span(span).emit(self.handler);
    }

    fn error_unknown_name(&mut self, name: Symbol, span: Span) {
        self.emit(DiagnosticCode::E_LOWER_UNKNOWN_NAME, format!("unknown name: {}", name), span);
    }

    fn error_redeclaration(&mut self, name: Symbol, span: Span) {
        self.emit(DiagnosticCode::E_LOWER_REDECLARATION, format!("redeclaration of {}", name), span);
    }

    fn error_assign_to_const(&mut self, name: Symbol, span: Span) {
        self.emit(
            DiagnosticCode::E_LOWER_ASSIGN_TO_CONST,
            format!("cannot assign to const {}", name),
            span,
        );
    }

    fn error_arity_mismatch(&mut self, callee: Symbol, expected: usize, found: usize, span: Span) {
        self.emit(
            DiagnosticCode::E_LOWER_ARITY_MISMATCH,
            format!("{} expects {} argument(s), found {}", callee, expected, found),
            span,
        );
    }

    fn error_void_call_as_value(&mut self, callee: Symbol, span: Span) {
        self.emit(
            DiagnosticCode::E_LOWER_VOID_CALL_AS_VALUE,
            format!("{} does not return a value", callee),
            span,
        );
    }

    fn error_call_arg_not_lvalue(&mut self, span: Span) {
        self.emit(
            DiagnosticCode::E_SYNTAX_NOT_AN_LVALUE,
            "argument must be a variable name",
            span,
        );
    }
}

fn return_type_of(proto: &Prototype) -> Type {
    if proto.ret_type.is_some() || proto.name == ID_MAIN {
        Type::Int32
    } else {
        Type::Void
    }
}

fn convert_binop(op: AstBinOp) -> IrBinOp {
    match op {
        AstBinOp::Add => IrBinOp::Add,
        AstBinOp::Sub => IrBinOp::Sub,
        AstBinOp::Mul => IrBinOp::Mul,
        AstBinOp::Div => IrBinOp::Div,
        AstBinOp::Mod => IrBinOp::Mod,
        AstBinOp::Eq => IrBinOp::Eq,
        AstBinOp::NotEq => IrBinOp::Ne,
        AstBinOp::Lt => IrBinOp::Lt,
        AstBinOp::LtEq => IrBinOp::Le,
        AstBinOp::Gt => IrBinOp::Gt,
        AstBinOp::GtEq => IrBinOp::Ge,
        AstBinOp::And => IrBinOp::And,
        AstBinOp::Or => IrBinOp::Or,
        AstBinOp::Xor => IrBinOp::Xor,
        AstBinOp::Assign => unreachable!("assignment is handled before reaching convert_binop"),
    }
}
