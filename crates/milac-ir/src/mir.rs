//! The SSA-ish intermediate representation lowering emits into.
//!
//! Values are produced by instructions and numbered per function (`%0`,
//! `%1`, ...); storage slots (`s0`, `s1`, ...) hold locals, parameters, and
//! the function's return value, and are accessed only through explicit
//! `Load`/`Store` — this keeps the "variable" concept of the source language
//! a first-class part of the IR rather than pretending the front-end can
//! already produce phi nodes at join points.

use crate::ty::Type;
use milac_util::{define_idx, IndexVec, Symbol};

define_idx!(BlockId);
define_idx!(SlotId);
define_idx!(ValueId);

/// A complete compilation unit: one IR function per source function or
/// procedure, plus the synthesized `main`.
#[derive(Debug, Default)]
pub struct Module {
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(&self, name: Symbol) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// A named storage slot: a parameter, a local variable, or (for
/// non-procedure functions) the return-value slot.
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: Symbol,
    pub ty: Type,
}

#[derive(Debug)]
pub struct Function {
    pub name: Symbol,
    pub params: Vec<SlotId>,
    pub return_ty: Type,
    pub slots: IndexVec<SlotId, Slot>,
    pub blocks: IndexVec<BlockId, BasicBlock>,
    pub entry_block: BlockId,
    pub value_count: u32,
}

impl Function {
    pub fn new(name: Symbol, return_ty: Type) -> Self {
        Self {
            name,
            params: Vec::new(),
            return_ty,
            slots: IndexVec::new(),
            blocks: IndexVec::new(),
            entry_block: BlockId(0),
            value_count: 0,
        }
    }

    pub fn slot_name(&self, slot: SlotId) -> Symbol {
        self.slots[slot].name
    }
}

#[derive(Debug)]
pub struct BasicBlock {
    pub id: BlockId,
    pub statements: Vec<Statement>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            statements: Vec::new(),
            terminator: Terminator::Unreachable,
        }
    }

    pub fn has_terminator(&self) -> bool {
        !matches!(self.terminator, Terminator::Unreachable)
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    /// `%dest = rvalue`
    Eval { dest: ValueId, rvalue: Rvalue },
    /// `store slot, operand`
    Store { slot: SlotId, value: Operand },
    /// A call whose result (if any) is discarded or bound to `dest`.
    Call {
        dest: Option<ValueId>,
        callee: Symbol,
        args: Vec<CallArg>,
    },
}

/// Most call arguments are plain values; `readln`'s sole argument is passed
/// as a slot address instead of a loaded value (§4.4's special case).
#[derive(Debug, Clone)]
pub enum CallArg {
    Value(Operand),
    SlotAddress(SlotId),
}

#[derive(Debug, Clone)]
pub enum Rvalue {
    Const(i32),
    Load(SlotId),
    Binary(BinOp, Operand, Operand),
}

#[derive(Debug, Clone, Copy)]
pub enum Operand {
    Value(ValueId),
    Const(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone)]
pub enum Terminator {
    /// Placeholder until lowering sets a real terminator; the verifier
    /// rejects any block still carrying this.
    Unreachable,
    Goto { target: BlockId },
    If {
        cond: Operand,
        then_block: BlockId,
        else_block: BlockId,
    },
    Return(Option<Operand>),
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|&slot| format!("{}: {}", self.slots[slot].name, self.slots[slot].ty))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "func {}({}) -> {} {{", self.name, params, self.return_ty)?;
        for (id, block) in self.blocks.iter_enumerated() {
            writeln!(f, "bb{}:", id.0)?;
            for stmt in &block.statements {
                writeln!(f, "    {}", fmt_statement(self, stmt))?;
            }
            writeln!(f, "    {}", fmt_terminator(&block.terminator))?;
        }
        writeln!(f, "}}")
    }
}

fn fmt_operand(op: &Operand) -> String {
    match op {
        Operand::Value(v) => format!("%{}", v.0),
        Operand::Const(n) => n.to_string(),
    }
}

fn fmt_binop(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "add",
        BinOp::Sub => "sub",
        BinOp::Mul => "mul",
        BinOp::Div => "sdiv",
        BinOp::Mod => "srem",
        BinOp::Eq => "eq",
        BinOp::Ne => "ne",
        BinOp::Lt => "lt",
        BinOp::Le => "le",
        BinOp::Gt => "gt",
        BinOp::Ge => "ge",
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::Xor => "xor",
    }
}

fn fmt_statement(func: &Function, stmt: &Statement) -> String {
    match stmt {
        Statement::Eval { dest, rvalue } => {
            let rhs = match rvalue {
                Rvalue::Const(n) => format!("const {}", n),
                Rvalue::Load(slot) => format!("load s{}.{}", slot.0, func.slot_name(*slot)),
                Rvalue::Binary(op, lhs, rhs) => {
                    format!("{} {}, {}", fmt_binop(*op), fmt_operand(lhs), fmt_operand(rhs))
                },
            };
            format!("%{} = {}", dest.0, rhs)
        },
        Statement::Store { slot, value } => {
            format!("store s{}.{}, {}", slot.0, func.slot_name(*slot), fmt_operand(value))
        },
        Statement::Call { dest, callee, args } => {
            let args = args
                .iter()
                .map(|a| match a {
                    CallArg::Value(op) => fmt_operand(op),
                    CallArg::SlotAddress(slot) => format!("&s{}", slot.0),
                })
                .collect::<Vec<_>>()
                .join(", ");
            match dest {
                Some(dest) => format!("%{} = call {}({})", dest.0, callee, args),
                None => format!("call {}({})", callee, args),
            }
        },
    }
}

fn fmt_terminator(term: &Terminator) -> String {
    match term {
        Terminator::Unreachable => "unreachable".to_string(),
        Terminator::Goto { target } => format!("br bb{}", target.0),
        Terminator::If { cond, then_block, else_block } => {
            format!("brif {}, bb{}, bb{}", fmt_operand(cond), then_block.0, else_block.0)
        },
        Terminator::Return(Some(op)) => format!("ret {}", fmt_operand(op)),
        Terminator::Return(None) => "ret".to_string(),
    }
}
