//! Fetch-decode-execute loop and opcode dispatch.

use std::io::Write;

use bci_common::{Opcode, OperandWidth};
use log::{debug, trace, warn};

use crate::error::RuntimeError;
use crate::machine::{Halt, Machine, Site, Status};

/// What the dispatcher does after an instruction.
enum Flow {
    Continue,
    Stop,
}

impl Machine {
    /// Execute until STOP or a fault. PRINT output is written to `out`.
    ///
    /// With a step budget configured, a program that has not stopped after
    /// that many instructions faults with
    /// [`RuntimeError::StepBudgetExceeded`].
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<(), RuntimeError> {
        while self.step(out)?.is_running() {}
        Ok(())
    }

    /// Execute exactly one instruction and report the resulting status.
    ///
    /// A fault halts the machine, leaves the instruction pointer at the
    /// faulting instruction, and is returned as `Err`. Once halted, further
    /// calls return the same outcome without touching any state.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<Status, RuntimeError> {
        match &self.status {
            Status::Running => {}
            Status::Halted(Halt::Stopped) => return Ok(self.status.clone()),
            Status::Halted(Halt::Faulted(err)) => return Err(err.clone()),
        }

        if let Some(budget) = self.config.step_budget {
            if self.steps >= budget {
                let at = self.ip;
                return Err(self.halt_with(RuntimeError::StepBudgetExceeded { at, budget }));
            }
        }

        let at = self.ip;
        match self.dispatch(out) {
            Ok(Flow::Continue) => {
                self.steps += 1;
            }
            Ok(Flow::Stop) => {
                self.steps += 1;
                self.status = Status::Halted(Halt::Stopped);
                debug!("STOP at offset {at} after {} steps", self.steps);
            }
            Err(err) => return Err(self.halt_with(err)),
        }
        Ok(self.status.clone())
    }

    fn halt_with(&mut self, err: RuntimeError) -> RuntimeError {
        warn!("halting after {} steps: {err}", self.steps);
        self.ip = err.at();
        self.status = Status::Halted(Halt::Faulted(err.clone()));
        err
    }

    /// Fetch the opcode at the instruction pointer, advance past it, and
    /// run its handler.
    fn dispatch<W: Write>(&mut self, out: &mut W) -> Result<Flow, RuntimeError> {
        let at = self.ip;
        let byte = self
            .store
            .byte_at(at)
            .ok_or(RuntimeError::UnexpectedEndOfProgram { at })?;
        let opcode =
            Opcode::try_from(byte).map_err(|_| RuntimeError::InvalidOpcode { at, byte })?;

        self.site = Site { at, opcode };
        self.ip += 1;
        trace!("{at:05} {:<5} sp={}", opcode.mnemonic(), self.stack.len());

        match opcode {
            Opcode::Nop => {}
            Opcode::Push => {
                let n = self.read_operand(OperandWidth::DWord)? as i32;
                self.push(n)?;
            }
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::Load => self.exec_load()?,
            Opcode::Store => self.exec_store()?,
            Opcode::Jmp => {
                let target = self.read_operand(OperandWidth::Word)? as u16;
                self.jump(target)?;
            }
            Opcode::Jz => self.exec_branch(|v| v == 0)?,
            Opcode::Jnz => self.exec_branch(|v| v != 0)?,
            Opcode::Add => self.exec_binary(i32::wrapping_add)?,
            Opcode::Sub => self.exec_binary(i32::wrapping_sub)?,
            Opcode::Mul => self.exec_binary(i32::wrapping_mul)?,
            Opcode::Div => self.exec_div()?,
            Opcode::Print => self.exec_print(out)?,
            Opcode::Stop => return Ok(Flow::Stop),
        }

        Ok(Flow::Continue)
    }

    fn exec_load(&mut self) -> Result<(), RuntimeError> {
        let index = self.read_operand(OperandWidth::Byte)? as u8;
        let value = self.registers.load(index).map_err(|e| self.fault(e))?;
        self.push(value)
    }

    fn exec_store(&mut self) -> Result<(), RuntimeError> {
        let index = self.read_operand(OperandWidth::Byte)? as u8;
        // Validate before popping so a bad index leaves the stack intact.
        self.registers.check(index).map_err(|e| self.fault(e))?;
        let value = self.pop()?;
        self.registers.store(index, value).map_err(|e| self.fault(e))
    }

    /// JZ/JNZ: always pop the condition, jump only if `taken` holds.
    fn exec_branch(&mut self, taken: impl FnOnce(i32) -> bool) -> Result<(), RuntimeError> {
        let target = self.read_operand(OperandWidth::Word)? as u16;
        let value = self.pop()?;
        if taken(value) {
            self.jump(target)?;
        }
        Ok(())
    }

    /// Pop `b` then `a`, push `op(a, b)`. Overflow wraps.
    fn exec_binary(&mut self, op: impl FnOnce(i32, i32) -> i32) -> Result<(), RuntimeError> {
        let (a, b) = self.pop_pair()?;
        self.push(op(a, b))
    }

    fn exec_div(&mut self) -> Result<(), RuntimeError> {
        self.stack.require(2).map_err(|e| self.fault(e))?;
        if self.top()? == 0 {
            return Err(RuntimeError::DivideByZero { at: self.site.at });
        }
        // i32::MIN / -1 wraps to i32::MIN.
        self.exec_binary(i32::wrapping_div)
    }

    fn exec_print<W: Write>(&mut self, out: &mut W) -> Result<(), RuntimeError> {
        let value = self.top()?;
        writeln!(out, "{value}").map_err(|e| RuntimeError::Output {
            at: self.site.at,
            message: e.to_string(),
        })?;
        self.pop()?;
        Ok(())
    }
}
