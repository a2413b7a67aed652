//! Per-function symbol table mapping a name to its storage slot.
//!
//! Cleared at the start of every function (there is no cross-function
//! scoping in this language): parameters, locals, and the function's own
//! return slot all live in the same flat namespace.

use milac_util::{FxHashMap, Symbol};

use crate::mir::SlotId;

#[derive(Debug, Clone, Copy)]
pub struct SymbolEntry {
    pub slot: SlotId,
    pub is_constant: bool,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<Symbol, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn declare(&mut self, name: Symbol, slot: SlotId, is_constant: bool) -> Result<(), ()> {
        if self.entries.contains_key(&name) {
            return Err(());
        }
        self.entries.insert(name, SymbolEntry { slot, is_constant });
        Ok(())
    }

    pub fn lookup(&self, name: Symbol) -> Option<SymbolEntry> {
        self.entries.get(&name).copied()
    }
}
