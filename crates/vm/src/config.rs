//! Machine configuration: capacities and the optional step budget.

use bci_common::limits::{PROGRAM_CAPACITY, REGISTER_COUNT, STACK_CAPACITY};

/// Capacities and execution bounds for a [`Machine`](crate::Machine).
///
/// The defaults match the fixed sizes of the bytecode format and leave
/// execution unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of live stack cells.
    pub stack_capacity: usize,
    /// Number of registers. Indices are a single byte, so at most 256 are reachable.
    pub register_count: usize,
    /// Size of the program buffer in bytes.
    pub program_capacity: usize,
    /// Maximum number of instructions to execute, or `None` for no limit.
    pub step_budget: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stack_capacity: STACK_CAPACITY,
            register_count: REGISTER_COUNT,
            program_capacity: PROGRAM_CAPACITY,
            step_budget: None,
        }
    }
}

impl Config {
    /// Bound execution to `steps` instructions.
    pub fn with_step_budget(mut self, steps: u64) -> Self {
        self.step_budget = Some(steps);
        self
    }
}
