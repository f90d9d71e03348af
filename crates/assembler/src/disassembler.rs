//! Disassembler: bytecode → canonical assembly text.
//!
//! Output format is flat text, one instruction per line, decimal operands.
//! No indentation, no blank lines.

use std::fmt::Write;

use bci_common::{DecodeError, Program};

/// Disassemble a decoded program into canonical assembly text.
///
/// The output is guaranteed to reassemble to identical bytes.
pub fn disassemble_program(program: &Program) -> String {
    let mut text = String::new();
    for instr in &program.instructions {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{instr}");
    }
    text
}

/// Disassemble with each instruction's byte offset appended as a comment,
/// so jump operands can be matched to their targets by eye.
///
/// The comments are ignored on reassembly.
pub fn listing(bytes: &[u8]) -> Result<String, DecodeError> {
    let program = Program::decode(bytes)?;
    let mut text = String::new();
    for (offset, instr) in program.iter_with_offsets() {
        let _ = writeln!(text, "{:<16}; {offset}", instr.to_string());
    }
    Ok(text)
}
