//! Parser for bci assembly tokens → instructions.
//!
//! Dispatches on the opcode's operand width: none, a register byte, a
//! jump offset word, or a signed PUSH literal.

use crate::error::AsmError;
use crate::lexer::Token;
use bci_common::opcode::ALL_OPCODES;
use bci_common::{Instruction, Opcode, OperandWidth};

fn lookup_opcode(mnemonic: &str) -> Option<Opcode> {
    ALL_OPCODES
        .iter()
        .find(|op| op.mnemonic() == mnemonic)
        .copied()
}

/// Parse the tokens of a single line into an instruction.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
) -> Result<Option<Instruction>, AsmError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        other => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: other.text(),
            })
        }
    };

    let opcode = lookup_opcode(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let raw = match opcode.operand_width() {
        None => 0,
        Some(width) => {
            let token = args.first().ok_or(AsmError::MissingArgument {
                line: line_num,
                opcode: opcode.mnemonic(),
                expected: 1,
            })?;
            operand(token, opcode, width, line_num)?
        }
    };

    let consumed = usize::from(opcode.operand_width().is_some());
    expect_end(&args[consumed..], line_num)?;

    Ok(Some(Instruction::from_raw(opcode, raw)))
}

/// Range-check a numeric operand against the opcode's immediate and
/// return its raw little-endian bit pattern.
fn operand(
    token: &Token,
    opcode: Opcode,
    width: OperandWidth,
    line_num: usize,
) -> Result<u32, AsmError> {
    let out_of_range = || AsmError::OutOfRange {
        line: line_num,
        opcode: opcode.mnemonic(),
        token: token.text(),
    };

    let raw = match (token, width) {
        (Token::Ident(s), _) => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: s.clone(),
            })
        }
        // PUSH: any i32, or a hex bit pattern up to 0xffffffff.
        (Token::Number(n), OperandWidth::DWord) => i32::try_from(*n).map(|v| v as u32).ok(),
        (Token::Hex(n), OperandWidth::DWord) => u32::try_from(*n).ok(),
        (Token::Number(n), OperandWidth::Byte) => u8::try_from(*n).map(u32::from).ok(),
        (Token::Hex(n), OperandWidth::Byte) => u8::try_from(*n).map(u32::from).ok(),
        (Token::Number(n), OperandWidth::Word) => u16::try_from(*n).map(u32::from).ok(),
        (Token::Hex(n), OperandWidth::Word) => u16::try_from(*n).map(u32::from).ok(),
    };

    raw.ok_or_else(out_of_range)
}

fn expect_end(args: &[Token], line_num: usize) -> Result<(), AsmError> {
    match args.first() {
        None => Ok(()),
        Some(extra) => Err(AsmError::UnexpectedToken {
            line: line_num,
            token: extra.text(),
        }),
    }
}
