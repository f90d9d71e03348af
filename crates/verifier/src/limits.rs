//! Limits checking for bci programs.
//!
//! Enforces the fixed capacities of the machine.

use crate::error::VerifyError;
use bci_common::limits::{PROGRAM_CAPACITY, REGISTER_COUNT};
use bci_common::Program;

/// Check the raw program size. Runs before decoding.
pub fn check_size(bytes: &[u8]) -> Vec<VerifyError> {
    if bytes.len() > PROGRAM_CAPACITY {
        vec![VerifyError::ProgramTooLarge {
            size: bytes.len(),
            max: PROGRAM_CAPACITY,
        }]
    } else {
        Vec::new()
    }
}

/// Check every register operand against the register bank.
pub fn check_registers(program: &Program) -> Vec<VerifyError> {
    program
        .iter_with_offsets()
        .filter_map(|(at, instr)| match instr.register() {
            Some(index) if usize::from(index) >= REGISTER_COUNT => {
                Some(VerifyError::InvalidRegister { at, index })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bci_common::Instruction;

    #[test]
    fn small_program_passes() {
        assert!(check_size(&[0x0d]).is_empty());
        assert!(check_size(&vec![0; PROGRAM_CAPACITY]).is_empty());
    }

    #[test]
    fn oversized_program() {
        let errors = check_size(&vec![0; PROGRAM_CAPACITY + 1]);
        assert_eq!(
            errors,
            vec![VerifyError::ProgramTooLarge {
                size: PROGRAM_CAPACITY + 1,
                max: PROGRAM_CAPACITY
            }]
        );
    }

    #[test]
    fn register_bounds() {
        let program = Program::new(vec![
            Instruction::Load(15),
            Instruction::Store(16),
            Instruction::Load(255),
        ]);
        assert_eq!(
            check_registers(&program),
            vec![
                VerifyError::InvalidRegister { at: 2, index: 16 },
                VerifyError::InvalidRegister { at: 4, index: 255 },
            ]
        );
    }
}
