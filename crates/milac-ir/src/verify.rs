//! Post-lowering structural checks.
//!
//! Runs once per completed function. There is no optimizer downstream to
//! introduce new malformed IR, so this is deliberately narrow: every block
//! must end in a real terminator, and every branch target must name a block
//! that actually exists. No dominance or reachability analysis is needed —
//! nothing in this front-end ever produces unreachable or irreducible
//! control flow to detect.

use crate::error::VerifyError;
use crate::mir::{Function, Terminator};

pub fn verify_function(function: &Function) -> Result<(), VerifyError> {
    let block_count = function.blocks.len() as u32;
    for (id, block) in function.blocks.iter_enumerated() {
        if !block.has_terminator() {
            return Err(VerifyError::MissingTerminator {
                function: function.name,
                block: id.0,
            });
        }

        let targets: Vec<u32> = match &block.terminator {
            Terminator::Goto { target } => vec![target.0],
            Terminator::If { then_block, else_block, .. } => vec![then_block.0, else_block.0],
            Terminator::Return(_) => vec![],
            Terminator::Unreachable => vec![],
        };

        for target in targets {
            if target >= block_count {
                return Err(VerifyError::DanglingBranchTarget {
                    function: function.name,
                    block: id.0,
                    target,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::mir::Terminator;
    use crate::ty::Type;
    use milac_util::Symbol;
    use proptest::prelude::*;

    #[test]
    fn accepts_a_single_terminated_block() {
        let mut builder = Builder::new(Symbol::intern("f"), Type::Void);
        builder.terminate(Terminator::Return(None));
        let function = builder.build();
        assert!(verify_function(&function).is_ok());
    }

    #[test]
    fn rejects_missing_terminator() {
        let builder = Builder::new(Symbol::intern("f"), Type::Void);
        let function = builder.build();
        assert!(matches!(
            verify_function(&function),
            Err(VerifyError::MissingTerminator { .. })
        ));
    }

    #[test]
    fn rejects_dangling_branch_target() {
        let mut builder = Builder::new(Symbol::intern("f"), Type::Void);
        builder.terminate(Terminator::Goto { target: crate::mir::BlockId(9) });
        let function = builder.build();
        assert!(matches!(
            verify_function(&function),
            Err(VerifyError::DanglingBranchTarget { .. })
        ));
    }

    proptest! {
        #[test]
        fn every_lowered_function_in_a_generated_program_verifies(
            depth in 0u8..4,
            upper in 1i32..10,
        ) {
            let mut body = String::from("writeln(i)");
            for n in 0..depth {
                body = format!(
                    "begin if i < {n} then begin {body} end else writeln(i) end",
                    n = n,
                    body = body,
                );
            }
            let source = format!(
                "program P; var i : integer; \
                 begin i := 0; while i < {upper} do begin {body}; i := i + 1 end end.",
                upper = upper,
                body = body,
            );

            let mut handler = milac_util::Handler::new();
            let module = match milac_par::parse_program(&source, &mut handler) {
                Some(program) if !handler.has_errors() => {
                    crate::lower::lower_program(&program, &mut handler)
                },
                _ => None,
            };
            let module = match module {
                Some(m) if !handler.has_errors() => m,
                _ => return Ok(()),
            };

            for function in &module.functions {
                prop_assert!(verify_function(function).is_ok());
            }
        }
    }
}
