//! Error types for the bci assembler.

use thiserror::Error;

/// Errors produced while assembling text into bytecode.
///
/// Every variant carries the 1-based source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode did not have its operand.
    #[error("line {line}: {opcode} expects {expected} argument(s)")]
    MissingArgument {
        line: usize,
        opcode: &'static str,
        expected: usize,
    },

    /// A numeric literal could not be parsed.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A numeric operand does not fit the opcode's immediate.
    #[error("line {line}: operand '{token}' out of range for {opcode}")]
    OutOfRange {
        line: usize,
        opcode: &'static str,
        token: String,
    },
}
