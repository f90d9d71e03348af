//! Decode errors for bci bytecode streams.

use crate::opcode::Opcode;
use thiserror::Error;

/// Errors that occur while recovering instructions from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Byte does not name any opcode.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// Unknown opcode byte found while walking a stream.
    #[error("invalid opcode {byte:#04x} at offset {offset}")]
    InvalidOpcode { offset: usize, byte: u8 },

    /// The stream ends in the middle of an instruction's immediate.
    #[error("truncated {} operand at offset {offset}", .opcode.mnemonic())]
    TruncatedOperand { offset: usize, opcode: Opcode },

    /// Decoding was asked to start past the last byte.
    #[error("unexpected end of bytecode at offset {offset}")]
    UnexpectedEnd { offset: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_opcode() {
        assert_eq!(
            DecodeError::UnknownOpcode(0x0e).to_string(),
            "unknown opcode: 0x0e"
        );
    }

    #[test]
    fn display_invalid_opcode() {
        assert_eq!(
            DecodeError::InvalidOpcode {
                offset: 7,
                byte: 0xff
            }
            .to_string(),
            "invalid opcode 0xff at offset 7"
        );
    }

    #[test]
    fn display_truncated_operand() {
        assert_eq!(
            DecodeError::TruncatedOperand {
                offset: 3,
                opcode: Opcode::Push
            }
            .to_string(),
            "truncated PUSH operand at offset 3"
        );
    }
}
