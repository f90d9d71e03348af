//! Errors for the bci interpreter.
//!
//! Runtime faults include the byte offset of the faulting instruction's
//! opcode (`at`) for diagnosing malformed programs. Load errors happen
//! before any instruction executes.

use std::io;
use std::path::PathBuf;

use bci_common::Opcode;
use thiserror::Error;

/// Faults raised while executing a program. Every fault halts the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Push onto a full stack.
    #[error("stack overflow in {} at offset {at}", .opcode.mnemonic())]
    StackOverflow { at: usize, opcode: Opcode },

    /// Pop or peek on a stack with too few values.
    #[error("stack underflow in {} at offset {at}", .opcode.mnemonic())]
    StackUnderflow { at: usize, opcode: Opcode },

    /// LOAD or STORE named a register outside the bank.
    #[error("register {index} out of range in {} at offset {at}", .opcode.mnemonic())]
    InvalidRegister { at: usize, opcode: Opcode, index: u8 },

    /// A taken jump pointed outside the loaded program.
    #[error("jump target {target} out of range in {} at offset {at}", .opcode.mnemonic())]
    InvalidJumpTarget { at: usize, opcode: Opcode, target: u16 },

    /// The byte at the instruction pointer is not an opcode.
    #[error("invalid opcode {byte:#04x} at offset {at}")]
    InvalidOpcode { at: usize, byte: u8 },

    /// DIV with a zero divisor.
    #[error("division by zero at offset {at}")]
    DivideByZero { at: usize },

    /// Fetch or operand read ran past the last loaded byte without STOP.
    #[error("unexpected end of program at offset {at}")]
    UnexpectedEndOfProgram { at: usize },

    /// The configured instruction budget ran out before STOP.
    #[error("step budget of {budget} exhausted at offset {at}")]
    StepBudgetExceeded { at: usize, budget: u64 },

    /// PRINT could not write to the output sink.
    #[error("output failed at offset {at}: {message}")]
    Output { at: usize, message: String },
}

impl RuntimeError {
    /// Byte offset of the instruction that faulted.
    pub fn at(&self) -> usize {
        match *self {
            RuntimeError::StackOverflow { at, .. }
            | RuntimeError::StackUnderflow { at, .. }
            | RuntimeError::InvalidRegister { at, .. }
            | RuntimeError::InvalidJumpTarget { at, .. }
            | RuntimeError::InvalidOpcode { at, .. }
            | RuntimeError::DivideByZero { at }
            | RuntimeError::UnexpectedEndOfProgram { at }
            | RuntimeError::StepBudgetExceeded { at, .. }
            | RuntimeError::Output { at, .. } => at,
        }
    }
}

/// Cell-level failures from the stack and register bank. The machine
/// attaches the instruction offset and opcode to turn these into a
/// [`RuntimeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("stack overflow")]
    Overflow,
    #[error("stack underflow")]
    Underflow,
    #[error("register {0} out of range")]
    Register(u8),
}

/// Errors from filling the program store.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytecode file could not be opened.
    #[error("cannot open '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The byte source failed while reading.
    #[error("cannot read program: {0}")]
    Io(#[from] io::Error),

    /// The source holds more bytes than the program buffer.
    #[error("program exceeds capacity of {capacity} bytes")]
    ProgramTooLarge { capacity: usize },
}

/// Either stage of a load-then-run call.
#[derive(Debug, Error)]
pub enum VmError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivideByZero { at: 11 }.to_string(),
            "division by zero at offset 11"
        );
        assert_eq!(
            RuntimeError::StackUnderflow {
                at: 0,
                opcode: Opcode::Pop
            }
            .to_string(),
            "stack underflow in POP at offset 0"
        );
        assert_eq!(
            RuntimeError::InvalidRegister {
                at: 5,
                opcode: Opcode::Store,
                index: 16
            }
            .to_string(),
            "register 16 out of range in STORE at offset 5"
        );
        assert_eq!(
            RuntimeError::InvalidOpcode { at: 2, byte: 0xee }.to_string(),
            "invalid opcode 0xee at offset 2"
        );
        assert_eq!(
            RuntimeError::StepBudgetExceeded { at: 5, budget: 100 }.to_string(),
            "step budget of 100 exhausted at offset 5"
        );
    }

    #[test]
    fn at_reports_offset() {
        let err = RuntimeError::InvalidJumpTarget {
            at: 9,
            opcode: Opcode::Jz,
            target: 500,
        };
        assert_eq!(err.at(), 9);
        assert_eq!(RuntimeError::UnexpectedEndOfProgram { at: 3 }.at(), 3);
    }

    #[test]
    fn load_error_display() {
        assert_eq!(
            LoadError::ProgramTooLarge { capacity: 16 }.to_string(),
            "program exceeds capacity of 16 bytes"
        );
    }

    #[test]
    fn vm_error_is_transparent() {
        let err = VmError::from(RuntimeError::DivideByZero { at: 1 });
        assert_eq!(err.to_string(), "division by zero at offset 1");
    }
}
