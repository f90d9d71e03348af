//! Fixed capacities of the bci machine.

/// Number of cells in the operand stack.
pub const STACK_CAPACITY: usize = 256;

/// Number of registers addressable by LOAD/STORE.
pub const REGISTER_COUNT: usize = 16;

/// Size of the program buffer in bytes. Every 2-byte jump index is addressable.
pub const PROGRAM_CAPACITY: usize = 65_536;
