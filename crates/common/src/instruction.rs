//! Decoded instructions with typed immediates.
//!
//! An instruction on the wire is one opcode byte followed by zero, one, two,
//! or four bytes of little-endian immediate:
//! ```text
//! PUSH  <n: i32>   01 nn nn nn nn
//! LOAD  <r: u8>    03 rr
//! STORE <r: u8>    04 rr
//! JMP   <i: u16>   05 ii ii
//! JZ    <i: u16>   06 ii ii
//! JNZ   <i: u16>   07 ii ii
//! ```
//! Every other opcode is a single byte.

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A single decoded bci instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Nop,
    Push(i32),
    Pop,
    Load(u8),
    Store(u8),
    Jmp(u16),
    Jz(u16),
    Jnz(u16),
    Add,
    Sub,
    Mul,
    Div,
    Print,
    Stop,
}

impl Instruction {
    /// Build an instruction from its opcode and raw zero-extended immediate.
    ///
    /// The immediate is truncated to the opcode's operand width; for opcodes
    /// without an immediate it is ignored.
    pub fn from_raw(opcode: Opcode, raw: u32) -> Self {
        match opcode {
            Opcode::Nop => Instruction::Nop,
            Opcode::Push => Instruction::Push(raw as i32),
            Opcode::Pop => Instruction::Pop,
            Opcode::Load => Instruction::Load(raw as u8),
            Opcode::Store => Instruction::Store(raw as u8),
            Opcode::Jmp => Instruction::Jmp(raw as u16),
            Opcode::Jz => Instruction::Jz(raw as u16),
            Opcode::Jnz => Instruction::Jnz(raw as u16),
            Opcode::Add => Instruction::Add,
            Opcode::Sub => Instruction::Sub,
            Opcode::Mul => Instruction::Mul,
            Opcode::Div => Instruction::Div,
            Opcode::Print => Instruction::Print,
            Opcode::Stop => Instruction::Stop,
        }
    }

    /// The opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::Push(_) => Opcode::Push,
            Instruction::Pop => Opcode::Pop,
            Instruction::Load(_) => Opcode::Load,
            Instruction::Store(_) => Opcode::Store,
            Instruction::Jmp(_) => Opcode::Jmp,
            Instruction::Jz(_) => Opcode::Jz,
            Instruction::Jnz(_) => Opcode::Jnz,
            Instruction::Add => Opcode::Add,
            Instruction::Sub => Opcode::Sub,
            Instruction::Mul => Opcode::Mul,
            Instruction::Div => Opcode::Div,
            Instruction::Print => Opcode::Print,
            Instruction::Stop => Opcode::Stop,
        }
    }

    /// Number of bytes this instruction occupies in a program.
    pub fn encoded_len(&self) -> usize {
        self.opcode().encoded_len()
    }

    /// Jump target for JMP/JZ/JNZ.
    pub fn jump_target(&self) -> Option<u16> {
        match *self {
            Instruction::Jmp(i) | Instruction::Jz(i) | Instruction::Jnz(i) => Some(i),
            _ => None,
        }
    }

    /// Register operand for LOAD/STORE.
    pub fn register(&self) -> Option<u8> {
        match *self {
            Instruction::Load(r) | Instruction::Store(r) => Some(r),
            _ => None,
        }
    }

    /// Append the encoded bytes of this instruction to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode() as u8);
        match *self {
            Instruction::Push(n) => out.extend_from_slice(&n.to_le_bytes()),
            Instruction::Load(r) | Instruction::Store(r) => out.push(r),
            Instruction::Jmp(i) | Instruction::Jz(i) | Instruction::Jnz(i) => {
                out.extend_from_slice(&i.to_le_bytes())
            }
            _ => {}
        }
    }

    /// Encode this instruction into a fresh byte vector.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut bytes);
        bytes
    }

    /// Decode the instruction that starts at `offset` in `bytes`.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let byte = *bytes
            .get(offset)
            .ok_or(DecodeError::UnexpectedEnd { offset })?;
        let opcode = Opcode::try_from(byte)
            .map_err(|_| DecodeError::InvalidOpcode { offset, byte })?;

        let raw = match opcode.operand_width() {
            Some(width) => width
                .read_le(&bytes[offset + 1..])
                .ok_or(DecodeError::TruncatedOperand { offset, opcode })?,
            None => 0,
        };

        Ok(Self::from_raw(opcode, raw))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Instruction::Push(n) => write!(f, "{mnemonic} {n}"),
            Instruction::Load(r) | Instruction::Store(r) => write!(f, "{mnemonic} {r}"),
            Instruction::Jmp(i) | Instruction::Jz(i) | Instruction::Jnz(i) => {
                write!(f, "{mnemonic} {i}")
            }
            _ => f.write_str(mnemonic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::ALL_OPCODES;

    #[test]
    fn push_is_little_endian() {
        assert_eq!(
            Instruction::Push(0x1234_5678).encode(),
            vec![0x01, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn push_negative_is_twos_complement() {
        assert_eq!(
            Instruction::Push(-1).encode(),
            vec![0x01, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(
            Instruction::decode(&[0x01, 0xf3, 0xff, 0xff, 0xff], 0),
            Ok(Instruction::Push(-13))
        );
    }

    #[test]
    fn jump_target_is_two_bytes() {
        assert_eq!(Instruction::Jnz(0x0102).encode(), vec![0x07, 0x02, 0x01]);
    }

    #[test]
    fn register_is_one_byte() {
        assert_eq!(Instruction::Store(15).encode(), vec![0x04, 0x0f]);
    }

    #[test]
    fn encoded_len_matches_bytes() {
        for &opcode in &ALL_OPCODES {
            let instr = Instruction::from_raw(opcode, 0);
            assert_eq!(instr.encode().len(), instr.encoded_len(), "{opcode:?}");
            assert_eq!(instr.opcode(), opcode);
        }
    }

    #[test]
    fn decode_at_offset() {
        let bytes = [0x00, 0x03, 0x07, 0x0d];
        assert_eq!(Instruction::decode(&bytes, 0), Ok(Instruction::Nop));
        assert_eq!(Instruction::decode(&bytes, 1), Ok(Instruction::Load(7)));
        assert_eq!(Instruction::decode(&bytes, 3), Ok(Instruction::Stop));
    }

    #[test]
    fn decode_rejects_unknown_opcode() {
        assert_eq!(
            Instruction::decode(&[0x00, 0x42], 1),
            Err(DecodeError::InvalidOpcode {
                offset: 1,
                byte: 0x42
            })
        );
    }

    #[test]
    fn decode_past_end() {
        assert_eq!(
            Instruction::decode(&[0x0d], 1),
            Err(DecodeError::UnexpectedEnd { offset: 1 })
        );
    }

    #[test]
    fn decode_rejects_truncated_operand() {
        assert_eq!(
            Instruction::decode(&[0x05, 0x01], 0),
            Err(DecodeError::TruncatedOperand {
                offset: 0,
                opcode: Opcode::Jmp
            })
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(Instruction::Jz(9).jump_target(), Some(9));
        assert_eq!(Instruction::Add.jump_target(), None);
        assert_eq!(Instruction::Load(3).register(), Some(3));
        assert_eq!(Instruction::Push(3).register(), None);
    }

    #[test]
    fn display_matches_assembly() {
        assert_eq!(Instruction::Push(-5).to_string(), "PUSH -5");
        assert_eq!(Instruction::Store(2).to_string(), "STORE 2");
        assert_eq!(Instruction::Jmp(10).to_string(), "JMP 10");
        assert_eq!(Instruction::Print.to_string(), "PRINT");
    }
}
