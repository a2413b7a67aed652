//! Error type for IR well-formedness checks.
//!
//! Lowering itself reports through the shared diagnostic pipeline
//! (`DiagnosticBuilder`/`Handler`), the same way the parser does — a fatal
//! diagnostic means `lower_program` returns `None`, no separate error enum
//! needed. `VerifyError` is the one internal check with no diagnosis-time
//! source span of its own: it names a structural defect in the IR the
//! lowering pass just built, surfaced only if lowering itself has a bug.

use milac_util::Symbol;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("function {function} block bb{block} has no terminator")]
    MissingTerminator { function: Symbol, block: u32 },

    #[error("function {function} block bb{block} branches to nonexistent block bb{target}")]
    DanglingBranchTarget {
        function: Symbol,
        block: u32,
        target: u32,
    },
}

pub type VerifyResult<T> = std::result::Result<T, VerifyError>;
