//! Cursor-style IR builder.
//!
//! A `Builder` owns an in-progress [`Function`] and a single insertion
//! point (`current_block`). Lowering never addresses blocks by id except
//! through the builder: it asks for a new block, switches the cursor to
//! it, and emits statements that land in whichever block is current.

use crate::mir::{BasicBlock, BinOp, BlockId, CallArg, Function, Operand, Rvalue, Slot, SlotId, Statement, Terminator, ValueId};
use crate::ty::Type;
use milac_util::Symbol;

pub struct Builder {
    function: Function,
    current_block: BlockId,
}

impl Builder {
    pub fn new(name: Symbol, return_ty: Type) -> Self {
        let mut function = Function::new(name, return_ty);
        let entry = BlockId(0);
        let pushed = function.blocks.push(BasicBlock::new(entry));
        debug_assert_eq!(pushed, entry);
        function.entry_block = entry;
        Self { function, current_block: entry }
    }

    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    pub fn set_current_block(&mut self, block: BlockId) {
        self.current_block = block;
    }

    pub fn is_current_block_terminated(&self) -> bool {
        self.function.blocks[self.current_block].has_terminator()
    }

    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.function.blocks.len() as u32);
        let pushed = self.function.blocks.push(BasicBlock::new(id));
        debug_assert_eq!(pushed, id);
        id
    }

    pub fn add_slot(&mut self, name: Symbol, ty: Type) -> SlotId {
        self.function.slots.push(Slot { name, ty })
    }

    pub fn add_param(&mut self, name: Symbol, ty: Type) -> SlotId {
        let slot = self.add_slot(name, ty);
        self.function.params.push(slot);
        slot
    }

    fn next_value(&mut self) -> ValueId {
        let id = ValueId(self.function.value_count);
        self.function.value_count += 1;
        id
    }

    fn push_statement(&mut self, stmt: Statement) {
        self.function.blocks[self.current_block].statements.push(stmt);
    }

    pub fn const_value(&mut self, n: i32) -> Operand {
        let dest = self.next_value();
        self.push_statement(Statement::Eval { dest, rvalue: Rvalue::Const(n) });
        Operand::Value(dest)
    }

    pub fn load(&mut self, slot: SlotId) -> Operand {
        let dest = self.next_value();
        self.push_statement(Statement::Eval { dest, rvalue: Rvalue::Load(slot) });
        Operand::Value(dest)
    }

    pub fn store(&mut self, slot: SlotId, value: Operand) {
        self.push_statement(Statement::Store { slot, value });
    }

    pub fn binary(&mut self, op: BinOp, lhs: Operand, rhs: Operand) -> Operand {
        let dest = self.next_value();
        self.push_statement(Statement::Eval { dest, rvalue: Rvalue::Binary(op, lhs, rhs) });
        Operand::Value(dest)
    }

    pub fn call(&mut self, callee: Symbol, args: Vec<CallArg>, has_result: bool) -> Option<Operand> {
        let dest = has_result.then(|| self.next_value());
        self.push_statement(Statement::Call { dest, callee, args });
        dest.map(Operand::Value)
    }

    /// Sets the current block's terminator, unless it already has one.
    /// Lowering relies on this to implement the fall-through discipline:
    /// a branch that already ended in an early terminator (e.g. from an
    /// `exit`) must not be re-terminated by the enclosing construct.
    pub fn terminate(&mut self, term: Terminator) {
        if !self.is_current_block_terminated() {
            self.function.blocks[self.current_block].terminator = term;
        }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn build(self) -> Function {
        self.function
    }
}
