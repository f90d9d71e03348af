//! Structural validation for bci programs.
//!
//! Decodes the byte stream into instructions, checks that every jump lands
//! on an instruction boundary, and that the program can terminate. Builds
//! the [`ProgramContext`] (instruction offsets and control-flow edges) that
//! the stack and reachability passes walk.

use crate::error::VerifyError;
use bci_common::{Instruction, Opcode, Program};

/// Control-flow view of a decoded program, shared by later passes.
#[derive(Debug)]
pub struct ProgramContext {
    /// Byte offset of each instruction, ascending.
    pub offsets: Vec<usize>,
    /// Successor instruction indices for each instruction.
    pub successors: Vec<Vec<usize>>,
    /// Whether a fatal structural error occurred (callers should skip later passes).
    pub fatal: bool,
}

impl ProgramContext {
    /// Byte offset of instruction `index`.
    pub fn offset(&self, index: usize) -> usize {
        self.offsets[index]
    }
}

/// Run the structural validation pass.
///
/// Returns the ProgramContext and any errors found. A jump to a
/// non-boundary is fatal since the control-flow graph is then undefined.
pub fn check_structural(program: &Program) -> (ProgramContext, Vec<VerifyError>) {
    let mut errors = Vec::new();
    let offsets = program.offsets();
    let byte_len = program.byte_len();
    let instrs = &program.instructions;
    let mut fatal = false;

    if !instrs.iter().any(|i| *i == Instruction::Stop) {
        errors.push(VerifyError::MissingStop);
    }

    if let Some((last, &at)) = instrs.last().zip(offsets.last()) {
        if !matches!(last.opcode(), Opcode::Stop | Opcode::Jmp) {
            errors.push(VerifyError::FallsOffEnd { at });
        }
    }

    let mut successors = Vec::with_capacity(instrs.len());
    for (index, instr) in instrs.iter().enumerate() {
        let at = offsets[index];
        let mut next = Vec::with_capacity(2);

        let falls_through = !matches!(instr.opcode(), Opcode::Stop | Opcode::Jmp);
        if falls_through && index + 1 < instrs.len() {
            next.push(index + 1);
        }

        if let Some(target) = instr.jump_target() {
            let offset = usize::from(target);
            if offset >= byte_len {
                errors.push(VerifyError::JumpOutOfBounds { at, target });
                fatal = true;
            } else {
                match offsets.binary_search(&offset) {
                    Ok(dest) if !next.contains(&dest) => next.push(dest),
                    Ok(_) => {}
                    Err(_) => {
                        errors.push(VerifyError::MisalignedJump { at, target });
                        fatal = true;
                    }
                }
            }
        }

        successors.push(next);
    }

    let ctx = ProgramContext {
        offsets,
        successors,
        fatal,
    };
    (ctx, errors)
}
