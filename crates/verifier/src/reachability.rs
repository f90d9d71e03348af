//! Reachability analysis for bci programs.
//!
//! Every instruction must be reachable from offset 0. Unreachable
//! instructions are errors.

use crate::error::VerifyError;
use crate::structural::ProgramContext;

/// Run the reachability check.
pub fn check_reachability(ctx: &ProgramContext) -> Vec<VerifyError> {
    let len = ctx.offsets.len();
    if len == 0 {
        return Vec::new();
    }

    let mut reachable = vec![false; len];
    let mut pending = vec![0];
    while let Some(index) = pending.pop() {
        if std::mem::replace(&mut reachable[index], true) {
            continue;
        }
        pending.extend(ctx.successors[index].iter().copied());
    }

    reachable
        .iter()
        .enumerate()
        .filter_map(|(index, &is_reachable)| {
            (!is_reachable).then(|| VerifyError::UnreachableInstruction {
                at: ctx.offset(index),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::check_structural;
    use bci_common::{Instruction, Program};

    fn check(instrs: Vec<Instruction>) -> Vec<VerifyError> {
        let (ctx, _) = check_structural(&Program::new(instrs));
        check_reachability(&ctx)
    }

    #[test]
    fn all_reachable() {
        assert!(check(vec![Instruction::Nop, Instruction::Stop]).is_empty());
    }

    #[test]
    fn code_after_stop() {
        assert_eq!(
            check(vec![Instruction::Stop, Instruction::Push(1), Instruction::Stop]),
            vec![
                VerifyError::UnreachableInstruction { at: 1 },
                VerifyError::UnreachableInstruction { at: 6 },
            ]
        );
    }

    #[test]
    fn skipped_by_jump() {
        // 0: JMP 4   3: NOP   4: STOP
        assert_eq!(
            check(vec![Instruction::Jmp(4), Instruction::Nop, Instruction::Stop]),
            vec![VerifyError::UnreachableInstruction { at: 3 }]
        );
    }

    #[test]
    fn backward_jump_target_reachable() {
        // 0: NOP   1: PUSH 0   6: JZ 12   9: JMP 1   12: STOP
        assert!(check(vec![
            Instruction::Nop,
            Instruction::Push(0),
            Instruction::Jz(12),
            Instruction::Jmp(1),
            Instruction::Stop,
        ])
        .is_empty());
    }

    #[test]
    fn empty_program() {
        assert!(check(vec![]).is_empty());
    }
}
