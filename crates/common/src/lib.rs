//! bci common types and bytecode encoding.
//!
//! This crate provides the foundational data structures shared by the
//! interpreter, assembler, and verifier:
//!
//! - [`Opcode`] — the 14 opcodes of the instruction set
//! - [`OperandWidth`] — the 1, 2, and 4-byte immediate widths
//! - [`Instruction`] — a decoded instruction with typed immediate
//! - [`Program`] — a decoded instruction stream
//! - [`DecodeError`] — errors from decoding byte streams
//! - [`limits`] — the machine's fixed capacities

pub mod error;
pub mod instruction;
pub mod limits;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::{Opcode, OperandWidth};
pub use program::Program;
