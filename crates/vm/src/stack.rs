//! Fixed-capacity operand stack.

use crate::error::CellError;

/// Operand stack of `i32` cells. Grows toward higher indices; its length is
/// the stack pointer.
#[derive(Debug, Clone)]
pub struct Stack {
    cells: Vec<i32>,
    capacity: usize,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, failing if the stack is already full.
    pub fn push(&mut self, value: i32) -> Result<(), CellError> {
        if self.cells.len() >= self.capacity {
            return Err(CellError::Overflow);
        }
        self.cells.push(value);
        Ok(())
    }

    /// Pop TOS.
    pub fn pop(&mut self) -> Result<i32, CellError> {
        self.cells.pop().ok_or(CellError::Underflow)
    }

    /// Peek at TOS without popping.
    pub fn top(&self) -> Result<i32, CellError> {
        self.cells.last().copied().ok_or(CellError::Underflow)
    }

    /// Fail unless at least `n` values are live.
    pub fn require(&self, n: usize) -> Result<(), CellError> {
        if self.cells.len() < n {
            Err(CellError::Underflow)
        } else {
            Ok(())
        }
    }

    /// Current stack pointer.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live cells, bottom first.
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
