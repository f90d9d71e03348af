//! bci assembler — bidirectional text ↔ bytecode translation.
//!
//! The assembler is a mechanical 1:1 translation. No labels, no macros:
//! jump operands are byte offsets into the assembled program.
//!
//! # Usage
//!
//! ```
//! use bci_assembler::{assemble, disassemble};
//!
//! let text = "PUSH 42\nPRINT\nSTOP\n";
//! let bytes = assemble(text).unwrap();
//! assert_eq!(bytes, [0x01, 0x2a, 0x00, 0x00, 0x00, 0x0c, 0x0d]);
//! assert_eq!(disassemble(&bytes).unwrap(), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(b)) == b` holds for every byte stream that
//! decodes. The disassembler outputs canonical text; the assembler accepts
//! both canonical and non-canonical input (hex, lowercase, comments).

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::{disassemble_program, listing};
pub use error::AsmError;

use bci_common::{DecodeError, Program};
use lexer::tokenize_line;
use parser::parse_line;

/// Assemble text into a decoded program.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble_program(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        if let Some(instr) = parse_line(&tokens, line_num)? {
            instructions.push(instr);
        }
    }

    Ok(Program::new(instructions))
}

/// Assemble text into bytecode.
pub fn assemble(text: &str) -> Result<Vec<u8>, AsmError> {
    assemble_program(text).map(|program| program.encode())
}

/// Decode bytecode and disassemble it into canonical assembly text.
pub fn disassemble(bytes: &[u8]) -> Result<String, DecodeError> {
    Program::decode(bytes).map(|program| disassemble_program(&program))
}
