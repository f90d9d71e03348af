//! Stack depth analysis for bci programs.
//!
//! Abstract interpretation over the control-flow graph: every instruction
//! gets a single stack depth on entry. Paths that merge with different
//! depths are reported, as are underflow and overflow.

use std::collections::VecDeque;

use crate::error::VerifyError;
use crate::structural::ProgramContext;
use bci_common::limits::STACK_CAPACITY;
use bci_common::{Instruction, Opcode};

/// Values an instruction pops, then pushes.
pub fn stack_effect(instr: &Instruction) -> (usize, usize) {
    match instr.opcode() {
        Opcode::Nop | Opcode::Jmp | Opcode::Stop => (0, 0),
        Opcode::Push | Opcode::Load => (0, 1),
        Opcode::Pop | Opcode::Store | Opcode::Jz | Opcode::Jnz | Opcode::Print => (1, 0),
        Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => (2, 1),
    }
}

/// Run the stack depth check from the entry point at depth zero.
pub fn check_stack(instrs: &[Instruction], ctx: &ProgramContext) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    if instrs.is_empty() {
        return errors;
    }

    let mut entry_depth: Vec<Option<usize>> = vec![None; instrs.len()];
    let mut merge_reported = vec![false; instrs.len()];
    let mut worklist = VecDeque::from([0]);
    entry_depth[0] = Some(0);

    while let Some(index) = worklist.pop_front() {
        let Some(depth) = entry_depth[index] else {
            continue;
        };
        let at = ctx.offset(index);
        let (pops, pushes) = stack_effect(&instrs[index]);

        if depth < pops {
            errors.push(VerifyError::StackUnderflow {
                at,
                needed: pops,
                depth,
            });
            continue;
        }
        let after = depth - pops + pushes;
        if after > STACK_CAPACITY {
            errors.push(VerifyError::StackOverflow {
                at,
                depth: after,
                capacity: STACK_CAPACITY,
            });
            continue;
        }

        for &next in &ctx.successors[index] {
            match entry_depth[next] {
                None => {
                    entry_depth[next] = Some(after);
                    worklist.push_back(next);
                }
                Some(first) if first != after && !merge_reported[next] => {
                    merge_reported[next] = true;
                    errors.push(VerifyError::InconsistentDepth {
                        at: ctx.offset(next),
                        first,
                        second: after,
                    });
                }
                Some(_) => {}
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::check_structural;
    use bci_common::Program;

    fn check(instrs: Vec<Instruction>) -> Vec<VerifyError> {
        let program = Program::new(instrs);
        let (ctx, _) = check_structural(&program);
        check_stack(&program.instructions, &ctx)
    }

    #[test]
    fn balanced_arithmetic() {
        assert!(check(vec![
            Instruction::Push(5),
            Instruction::Push(3),
            Instruction::Sub,
            Instruction::Print,
            Instruction::Stop,
        ])
        .is_empty());
    }

    #[test]
    fn pop_on_empty() {
        assert_eq!(
            check(vec![Instruction::Pop, Instruction::Stop]),
            vec![VerifyError::StackUnderflow {
                at: 0,
                needed: 1,
                depth: 0
            }]
        );
    }

    #[test]
    fn binary_op_needs_two() {
        assert_eq!(
            check(vec![Instruction::Push(1), Instruction::Mul, Instruction::Stop]),
            vec![VerifyError::StackUnderflow {
                at: 5,
                needed: 2,
                depth: 1
            }]
        );
    }

    #[test]
    fn push_loop_is_inconsistent() {
        // 0: PUSH 1   5: JMP 0
        assert_eq!(
            check(vec![Instruction::Push(1), Instruction::Jmp(0)]),
            vec![VerifyError::InconsistentDepth {
                at: 0,
                first: 0,
                second: 1
            }]
        );
    }

    #[test]
    fn balanced_loop() {
        // 0: PUSH 3   5: STORE 0   7: LOAD 0   9: PUSH 1   14: SUB
        // 15: STORE 0   17: LOAD 0   19: JNZ 7   22: STOP
        assert!(check(vec![
            Instruction::Push(3),
            Instruction::Store(0),
            Instruction::Load(0),
            Instruction::Push(1),
            Instruction::Sub,
            Instruction::Store(0),
            Instruction::Load(0),
            Instruction::Jnz(7),
            Instruction::Stop,
        ])
        .is_empty());
    }

    #[test]
    fn overflow_past_capacity() {
        let mut instrs = vec![Instruction::Push(0); STACK_CAPACITY + 1];
        instrs.push(Instruction::Stop);
        assert_eq!(
            check(instrs),
            vec![VerifyError::StackOverflow {
                at: STACK_CAPACITY * 5,
                depth: STACK_CAPACITY + 1,
                capacity: STACK_CAPACITY
            }]
        );
    }

    #[test]
    fn effects_cover_all_opcodes() {
        assert_eq!(stack_effect(&Instruction::Div), (2, 1));
        assert_eq!(stack_effect(&Instruction::Jz(0)), (1, 0));
        assert_eq!(stack_effect(&Instruction::Load(0)), (0, 1));
        assert_eq!(stack_effect(&Instruction::Stop), (0, 0));
    }
}
