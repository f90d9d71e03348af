//! Program representation for bci bytecode.
//!
//! Bytecode files (.bc) are raw concatenations of variable-width
//! instructions with no header. Instruction boundaries are only
//! recoverable by decoding from offset 0.

use crate::error::DecodeError;
use crate::instruction::Instruction;

/// A bci program: a sequence of decoded instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Encode the entire program to bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for instr in &self.instructions {
            instr.encode_into(&mut bytes);
        }
        bytes
    }

    /// Decode a byte slice into a program, walking opcodes from offset 0.
    ///
    /// Fails on the first unknown opcode or truncated immediate.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let instr = Instruction::decode(bytes, offset)?;
            offset += instr.encoded_len();
            instructions.push(instr);
        }

        Ok(Self { instructions })
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.instructions.iter().map(Instruction::encoded_len).sum()
    }

    /// Byte offset of every instruction, in program order.
    pub fn offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.instructions.len());
        let mut offset = 0;
        for instr in &self.instructions {
            offsets.push(offset);
            offset += instr.encoded_len();
        }
        offsets
    }

    /// Iterate over `(byte_offset, instruction)` pairs.
    pub fn iter_with_offsets(&self) -> impl Iterator<Item = (usize, &Instruction)> + '_ {
        self.offsets().into_iter().zip(self.instructions.iter())
    }

    /// Index of the instruction that starts exactly at `offset`, if any.
    pub fn index_at_offset(&self, offset: usize) -> Option<usize> {
        self.offsets().binary_search(&offset).ok()
    }
}
