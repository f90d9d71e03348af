//! Opcode definitions for the bci instruction set.
//!
//! Every instruction starts with one opcode byte. Some opcodes are followed
//! by a little-endian immediate whose width is fixed per opcode
//! (see [`Opcode::operand_width`]).

use crate::error::DecodeError;

/// Width in bytes of an immediate operand.
///
/// Only three widths exist in the encoding, so any other width is
/// unrepresentable.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandWidth {
    /// Register index (unsigned).
    Byte = 1,
    /// Instruction offset (unsigned).
    Word = 2,
    /// Pushed integer literal (signed, two's complement).
    DWord = 4,
}

impl OperandWidth {
    /// Number of bytes occupied in the instruction stream.
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Interpret the first `self.bytes()` bytes of `bytes` as a
    /// little-endian unsigned integer, zero-extended to 32 bits.
    ///
    /// Returns `None` if fewer bytes are available.
    pub fn read_le(self, bytes: &[u8]) -> Option<u32> {
        let raw = bytes.get(..self.bytes())?;
        Some(
            raw.iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
        )
    }
}

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute pins each variant to its byte value in the
/// bytecode format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Do nothing.
    Nop = 0x00,
    /// Push the 4-byte signed immediate.
    Push = 0x01,
    /// Pop and discard TOS.
    Pop = 0x02,
    /// Push the value of register `r` (1-byte immediate). The register keeps its value.
    Load = 0x03,
    /// Pop TOS into register `r` (1-byte immediate).
    Store = 0x04,
    /// Jump to offset `i` (2-byte immediate).
    Jmp = 0x05,
    /// Pop TOS; jump to `i` if it was zero.
    Jz = 0x06,
    /// Pop TOS; jump to `i` if it was nonzero.
    Jnz = 0x07,
    /// S2 + S1 -> TOS.
    Add = 0x08,
    /// S2 - S1 -> TOS.
    Sub = 0x09,
    /// S2 * S1 -> TOS.
    Mul = 0x0a,
    /// S2 / S1 -> TOS, truncating. Division by zero is a runtime fault.
    Div = 0x0b,
    /// Write TOS in decimal followed by a newline, then pop it.
    Print = 0x0c,
    /// Halt the program.
    Stop = 0x0d,
}

/// All valid opcodes, in byte order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 14] = [
    Opcode::Nop,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Load,
    Opcode::Store,
    Opcode::Jmp,
    Opcode::Jz,
    Opcode::Jnz,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Print,
    Opcode::Stop,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Opcode::Nop),
            0x01 => Ok(Opcode::Push),
            0x02 => Ok(Opcode::Pop),
            0x03 => Ok(Opcode::Load),
            0x04 => Ok(Opcode::Store),
            0x05 => Ok(Opcode::Jmp),
            0x06 => Ok(Opcode::Jz),
            0x07 => Ok(Opcode::Jnz),
            0x08 => Ok(Opcode::Add),
            0x09 => Ok(Opcode::Sub),
            0x0a => Ok(Opcode::Mul),
            0x0b => Ok(Opcode::Div),
            0x0c => Ok(Opcode::Print),
            0x0d => Ok(Opcode::Stop),
            _ => Err(DecodeError::UnknownOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Jmp => "JMP",
            Opcode::Jz => "JZ",
            Opcode::Jnz => "JNZ",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Print => "PRINT",
            Opcode::Stop => "STOP",
        }
    }

    /// Width of the immediate that follows this opcode, if any.
    pub fn operand_width(&self) -> Option<OperandWidth> {
        match self {
            Opcode::Push => Some(OperandWidth::DWord),
            Opcode::Load | Opcode::Store => Some(OperandWidth::Byte),
            Opcode::Jmp | Opcode::Jz | Opcode::Jnz => Some(OperandWidth::Word),
            Opcode::Nop
            | Opcode::Pop
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Print
            | Opcode::Stop => None,
        }
    }

    /// Total encoded length: the opcode byte plus its immediate.
    pub fn encoded_len(&self) -> usize {
        1 + self.operand_width().map_or(0, OperandWidth::bytes)
    }

    /// True for opcodes that may overwrite the instruction pointer.
    pub fn is_jump(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Jz | Opcode::Jnz)
    }
}
