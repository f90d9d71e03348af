//! Register bank addressed by a one-byte index.

use crate::error::CellError;

/// Fixed-size bank of `i32` registers, all starting at zero.
#[derive(Debug, Clone)]
pub struct Registers {
    cells: Vec<i32>,
}

impl Registers {
    pub fn new(count: usize) -> Self {
        Self {
            cells: vec![0; count],
        }
    }

    /// Fail unless `index` names a register in the bank.
    pub fn check(&self, index: u8) -> Result<(), CellError> {
        if usize::from(index) < self.cells.len() {
            Ok(())
        } else {
            Err(CellError::Register(index))
        }
    }

    /// Read a register. The register keeps its value.
    pub fn load(&self, index: u8) -> Result<i32, CellError> {
        self.cells
            .get(usize::from(index))
            .copied()
            .ok_or(CellError::Register(index))
    }

    /// Overwrite a register.
    pub fn store(&mut self, index: u8, value: i32) -> Result<(), CellError> {
        let cell = self
            .cells
            .get_mut(usize::from(index))
            .ok_or(CellError::Register(index))?;
        *cell = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    /// Zero every register.
    pub fn reset(&mut self) {
        self.cells.fill(0);
    }
}
