//! Core utilities and foundation types shared by every compiler stage:
//! source locations (`span`), interned identifiers (`symbol`), typed index
//! vectors (`index_vec`), and the diagnostic reporting pipeline
//! (`diagnostic`).
//!
//! Nothing in this crate is stage-specific — `milac-lex`, `milac-par`,
//! `milac-ir`, and `milac-drv` all depend on it for the pieces that would
//! otherwise be duplicated across the pipeline.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
