//! Machine state: program store, stack, registers, instruction pointer.

use std::io::Read;

use bci_common::{Opcode, OperandWidth};

use crate::config::Config;
use crate::error::{CellError, LoadError, RuntimeError};
use crate::registers::Registers;
use crate::stack::Stack;
use crate::store::ProgramStore;

/// How a halted machine stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// STOP executed.
    Stopped,
    /// A fault ended the run.
    Faulted(RuntimeError),
}

/// Execution status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted(Halt),
}

impl Status {
    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running)
    }
}

/// Location of the instruction being executed, used to annotate faults.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site {
    pub(crate) at: usize,
    pub(crate) opcode: Opcode,
}

/// A bci virtual machine.
///
/// Each machine owns all of its state. Create one per run; independent
/// machines can run on separate threads.
#[derive(Debug, Clone)]
pub struct Machine {
    pub(crate) config: Config,
    pub(crate) store: ProgramStore,
    pub(crate) stack: Stack,
    pub(crate) registers: Registers,
    /// Byte offset of the next opcode to fetch.
    pub(crate) ip: usize,
    /// Instructions completed so far.
    pub(crate) steps: u64,
    pub(crate) status: Status,
    pub(crate) site: Site,
}

impl Machine {
    /// Create a zeroed machine with nothing loaded.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: ProgramStore::new(config.program_capacity),
            stack: Stack::new(config.stack_capacity),
            registers: Registers::new(config.register_count),
            ip: 0,
            steps: 0,
            status: Status::Running,
            site: Site {
                at: 0,
                opcode: Opcode::Nop,
            },
        }
    }

    /// Load a program from a byte source, resetting all other state.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<usize, LoadError> {
        let n = self.store.load(reader)?;
        self.reset();
        Ok(n)
    }

    /// Load a program from memory, resetting all other state.
    pub fn load_bytes(&mut self, program: &[u8]) -> Result<usize, LoadError> {
        let n = self.store.load_bytes(program)?;
        self.reset();
        Ok(n)
    }

    /// Return stack, registers, and pointers to their initial state,
    /// keeping the loaded program.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.registers.reset();
        self.ip = 0;
        self.steps = 0;
        self.status = Status::Running;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Byte offset of the next instruction. After a fault, the offset of
    /// the faulting instruction.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Number of instructions executed.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Live stack cells, bottom first.
    pub fn stack(&self) -> &[i32] {
        self.stack.as_slice()
    }

    pub fn registers(&self) -> &[i32] {
        self.registers.as_slice()
    }

    /// The loaded bytecode.
    pub fn program(&self) -> &[u8] {
        self.store.as_slice()
    }

    /// Read an immediate of `width` bytes at the instruction pointer and
    /// advance past it.
    pub(crate) fn read_operand(&mut self, width: OperandWidth) -> Result<u32, RuntimeError> {
        self.store
            .read_integer(&mut self.ip, width)
            .ok_or(RuntimeError::UnexpectedEndOfProgram { at: self.site.at })
    }

    /// Attach the current instruction's location to a cell error.
    pub(crate) fn fault(&self, err: CellError) -> RuntimeError {
        let Site { at, opcode } = self.site;
        match err {
            CellError::Overflow => RuntimeError::StackOverflow { at, opcode },
            CellError::Underflow => RuntimeError::StackUnderflow { at, opcode },
            CellError::Register(index) => RuntimeError::InvalidRegister { at, opcode, index },
        }
    }

    pub(crate) fn push(&mut self, value: i32) -> Result<(), RuntimeError> {
        self.stack.push(value).map_err(|e| self.fault(e))
    }

    pub(crate) fn pop(&mut self) -> Result<i32, RuntimeError> {
        self.stack.pop().map_err(|e| self.fault(e))
    }

    pub(crate) fn top(&self) -> Result<i32, RuntimeError> {
        self.stack.top().map_err(|e| self.fault(e))
    }

    /// Pop the two top values as `(earlier, later)`, checking depth first so
    /// a fault leaves the stack untouched.
    pub(crate) fn pop_pair(&mut self) -> Result<(i32, i32), RuntimeError> {
        self.stack.require(2).map_err(|e| self.fault(e))?;
        let b = self.pop()?;
        let a = self.pop()?;
        Ok((a, b))
    }

    /// Overwrite the instruction pointer with a validated jump target.
    pub(crate) fn jump(&mut self, target: u16) -> Result<(), RuntimeError> {
        if usize::from(target) >= self.store.len() {
            let Site { at, opcode } = self.site;
            return Err(RuntimeError::InvalidJumpTarget { at, opcode, target });
        }
        self.ip = usize::from(target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_is_zeroed() {
        let machine = Machine::new(Config::default());
        assert_eq!(machine.ip(), 0);
        assert_eq!(machine.steps(), 0);
        assert!(machine.stack().is_empty());
        assert_eq!(machine.registers(), &[0; 16]);
        assert!(machine.program().is_empty());
        assert!(machine.status().is_running());
    }

    #[test]
    fn load_resets_state() {
        let mut machine = Machine::new(Config::default());
        machine.load_bytes(&[0x0d]).unwrap();
        machine.stack.push(4).unwrap();
        machine.registers.store(1, 9).unwrap();
        machine.ip = 1;

        machine.load_bytes(&[0x00, 0x0d]).unwrap();
        assert!(machine.stack().is_empty());
        assert_eq!(machine.registers()[1], 0);
        assert_eq!(machine.ip(), 0);
        assert_eq!(machine.program(), &[0x00, 0x0d]);
    }

    #[test]
    fn oversized_program_rejected() {
        let config = Config {
            program_capacity: 4,
            ..Config::default()
        };
        let mut machine = Machine::new(config);
        let err = machine.load_bytes(&[0; 5]).unwrap_err();
        assert!(matches!(err, LoadError::ProgramTooLarge { capacity: 4 }));
    }

    #[test]
    fn pop_pair_preserves_stack_on_underflow() {
        let mut machine = Machine::new(Config::default());
        machine.stack.push(1).unwrap();
        assert!(matches!(
            machine.pop_pair(),
            Err(RuntimeError::StackUnderflow { .. })
        ));
        assert_eq!(machine.stack(), &[1]);
    }

    #[test]
    fn jump_outside_program_rejected() {
        let mut machine = Machine::new(Config::default());
        machine.load_bytes(&[0x05, 0x00, 0x00]).unwrap();
        assert_eq!(machine.jump(2), Ok(()));
        assert_eq!(machine.ip(), 2);
        assert!(matches!(
            machine.jump(3),
            Err(RuntimeError::InvalidJumpTarget { target: 3, .. })
        ));
    }
}
