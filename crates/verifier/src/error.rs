//! Verification errors for the bci verifier.
//!
//! Every located error carries the byte offset (`at`) of the instruction it
//! concerns. The verifier collects ALL errors, not just the first.

use bci_common::DecodeError;
use thiserror::Error;

/// Errors found during static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Limits ---
    /// Program exceeds the program store.
    #[error("program too large: {size} bytes (max {max})")]
    ProgramTooLarge { size: usize, max: usize },

    /// LOAD or STORE names a register outside the bank.
    #[error("register {index} out of range at offset {at}")]
    InvalidRegister { at: usize, index: u8 },

    // --- Structural ---
    /// The byte stream does not decode. Fatal: no later pass runs.
    #[error("malformed bytecode: {0}")]
    Malformed(DecodeError),

    /// Jump target lies outside the program.
    #[error("jump target {target} out of bounds at offset {at}")]
    JumpOutOfBounds { at: usize, target: u16 },

    /// Jump target lands inside another instruction's operand bytes.
    #[error("jump target {target} at offset {at} is not an instruction boundary")]
    MisalignedJump { at: usize, target: u16 },

    /// No STOP anywhere in the program.
    #[error("program has no STOP")]
    MissingStop,

    /// Execution can run past the last instruction.
    #[error("last instruction at offset {at} is neither STOP nor JMP")]
    FallsOffEnd { at: usize },

    // --- Stack ---
    /// Instruction needs more values than any path leaves on the stack.
    #[error("stack underflow at offset {at}: needs {needed}, depth {depth}")]
    StackUnderflow {
        at: usize,
        needed: usize,
        depth: usize,
    },

    /// Instruction pushes past the stack capacity.
    #[error("stack overflow at offset {at}: depth {depth} exceeds {capacity}")]
    StackOverflow {
        at: usize,
        depth: usize,
        capacity: usize,
    },

    /// Two control-flow paths reach an instruction with different depths.
    #[error("inconsistent stack depth at offset {at}: {first} vs {second}")]
    InconsistentDepth {
        at: usize,
        first: usize,
        second: usize,
    },

    // --- Reachability ---
    /// Instruction is unreachable from offset 0.
    #[error("unreachable instruction at offset {at}")]
    UnreachableInstruction { at: usize },
}
