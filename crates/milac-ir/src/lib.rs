//! Lowers a parsed program into a typed, block-structured intermediate
//! representation and verifies its structural well-formedness.

pub mod builder;
pub mod error;
pub mod lower;
pub mod mir;
pub mod symtab;
pub mod ty;
pub mod verify;

pub use builder::Builder;
pub use lower::lower_program;
pub use mir::Module;
pub use ty::Type;
