//! bci virtual machine — executes stack-based bytecode.
//!
//! The machine has:
//! - A program store holding the loaded bytecode (at most 64 KiB)
//! - An operand stack of 256 `i32` cells
//! - A bank of 16 `i32` registers
//! - An instruction pointer walking the program byte by byte
//!
//! Every capacity violation, bad operand, unknown opcode, or division by
//! zero halts the run with a typed [`RuntimeError`] carrying the offset of
//! the faulting instruction.
//!
//! # Usage
//!
//! ```
//! use bci_common::{Instruction, Program};
//!
//! let bytes = Program::new(vec![
//!     Instruction::Push(5),
//!     Instruction::Push(3),
//!     Instruction::Sub,
//!     Instruction::Print,
//!     Instruction::Stop,
//! ])
//! .encode();
//!
//! let mut out = Vec::new();
//! bci_vm::run(&bytes, &mut out).unwrap();
//! assert_eq!(out, b"2\n");
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod machine;
pub mod registers;
pub mod stack;
pub mod store;

pub use config::Config;
pub use error::{LoadError, RuntimeError, VmError};
pub use machine::{Halt, Machine, Status};

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Load `bytecode` into a fresh machine with default capacities and run it
/// to completion, writing PRINT output to `out`.
///
/// Returns the halted machine so callers can inspect its final state.
pub fn run<W: Write>(bytecode: &[u8], out: &mut W) -> Result<Machine, VmError> {
    run_with(bytecode, Config::default(), out)
}

/// Like [`run`], with explicit capacities and step budget.
pub fn run_with<W: Write>(
    bytecode: &[u8],
    config: Config,
    out: &mut W,
) -> Result<Machine, VmError> {
    let mut machine = Machine::new(config);
    machine.load_bytes(bytecode)?;
    machine.run(out)?;
    Ok(machine)
}

/// Open a bytecode file and load it into a fresh machine.
///
/// # Errors
///
/// [`LoadError::Open`] if the file cannot be opened, [`LoadError::Io`] if
/// reading fails, [`LoadError::ProgramTooLarge`] if it does not fit.
pub fn load_file(path: impl AsRef<Path>, config: Config) -> Result<Machine, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut machine = Machine::new(config);
    machine.load(BufReader::new(file))?;
    Ok(machine)
}
