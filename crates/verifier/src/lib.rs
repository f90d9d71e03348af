//! bci verifier — static analysis for bytecode.
//!
//! The verifier checks a byte stream for correctness BEFORE execution.
//! It collects ALL errors (not just the first) and returns them. It is
//! advisory: the VM enforces every invariant at run time regardless.
//!
//! # Usage
//!
//! ```
//! use bci_common::{Instruction, Program};
//! use bci_verifier::verify;
//!
//! let bytes = Program::new(vec![
//!     Instruction::Push(42),
//!     Instruction::Print,
//!     Instruction::Stop,
//! ])
//! .encode();
//!
//! assert!(verify(&bytes).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Limits** — program size, register operands
//! 2. **Structural** — decoding, jump targets, termination
//! 3. **Stack** — depth underflow, overflow, and merge consistency
//! 4. **Reachability** — dead code detection

pub mod error;
pub mod limits;
pub mod reachability;
pub mod stack;
pub mod structural;

pub use error::VerifyError;

use bci_common::Program;
use log::debug;

/// Verify bytecode for correctness.
///
/// Returns `Ok(())` if the program passes all checks, or
/// `Err(Vec<VerifyError>)` with all errors found.
///
/// A byte stream that does not decode stops verification after the limits
/// check. If the structural pass finds fatal errors (a jump that does not
/// land on an instruction), the control-flow passes are skipped.
pub fn verify(bytes: &[u8]) -> Result<(), Vec<VerifyError>> {
    let mut all_errors = Vec::new();

    // Pass 1a: Size (independent of decoding)
    all_errors.extend(limits::check_size(bytes));

    let program = match Program::decode(bytes) {
        Ok(program) => program,
        Err(err) => {
            all_errors.push(VerifyError::Malformed(err));
            return Err(all_errors);
        }
    };

    all_errors.extend(verify_program(&program));

    debug!(
        "verified {} instructions ({} bytes): {} error(s)",
        program.len(),
        bytes.len(),
        all_errors.len()
    );

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}

/// Run the passes that need a decoded program.
fn verify_program(program: &Program) -> Vec<VerifyError> {
    let mut errors = Vec::new();

    // Pass 1b: Register operands
    errors.extend(limits::check_registers(program));

    // Pass 2: Structural (builds ProgramContext)
    let (ctx, structural_errors) = structural::check_structural(program);
    errors.extend(structural_errors);

    if !ctx.fatal {
        // Pass 3: Stack
        errors.extend(stack::check_stack(&program.instructions, &ctx));

        // Pass 4: Reachability
        errors.extend(reachability::check_reachability(&ctx));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use bci_common::{DecodeError, Instruction, Opcode};

    fn bytes(instrs: Vec<Instruction>) -> Vec<u8> {
        Program::new(instrs).encode()
    }

    #[test]
    fn minimal_valid_program() {
        assert!(verify(&bytes(vec![Instruction::Stop])).is_ok());
    }

    #[test]
    fn empty_program() {
        let errors = verify(&[]).unwrap_err();
        assert_eq!(errors, vec![VerifyError::MissingStop]);
    }

    #[test]
    fn malformed_stops_early() {
        let errors = verify(&[0x0d, 0x01, 0x00]).unwrap_err();
        assert_eq!(
            errors,
            vec![VerifyError::Malformed(DecodeError::TruncatedOperand {
                offset: 1,
                opcode: Opcode::Push
            })]
        );
    }

    #[test]
    fn multiple_errors_collected() {
        // Underflow, bad register, no STOP, falls off the end.
        let errors = verify(&bytes(vec![Instruction::Add, Instruction::Store(20)])).unwrap_err();
        assert!(errors.contains(&VerifyError::MissingStop));
        assert!(errors.contains(&VerifyError::InvalidRegister { at: 1, index: 20 }));
        assert!(errors.contains(&VerifyError::FallsOffEnd { at: 1 }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::StackUnderflow { at: 0, .. })));
    }

    #[test]
    fn fatal_jump_skips_flow_passes() {
        // Unreachable NOP would otherwise be reported.
        let errors = verify(&bytes(vec![
            Instruction::Jmp(200),
            Instruction::Nop,
            Instruction::Stop,
        ]))
        .unwrap_err();
        assert_eq!(
            errors,
            vec![VerifyError::JumpOutOfBounds { at: 0, target: 200 }]
        );
    }
}
