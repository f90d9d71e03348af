//! Program store: the bounded, zero-filled byte buffer a program is loaded into.

use std::io::Read;

use bci_common::OperandWidth;
use log::debug;

use crate::error::LoadError;

/// Holds the loaded bytecode. Read-only during execution.
#[derive(Debug, Clone)]
pub struct ProgramStore {
    bytes: Vec<u8>,
    len: usize,
}

impl ProgramStore {
    /// An empty store with `capacity` zeroed bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
            len: 0,
        }
    }

    /// Copy the whole byte source into the store from offset 0.
    ///
    /// Replaces any previously loaded program. A source longer than the
    /// capacity is rejected rather than truncated.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<usize, LoadError> {
        let capacity = self.bytes.len();
        let mut buf = Vec::with_capacity(capacity.min(4096));
        reader
            .take(capacity as u64 + 1)
            .read_to_end(&mut buf)?;
        self.load_bytes(&buf)
    }

    /// Copy `program` into the store from offset 0.
    pub fn load_bytes(&mut self, program: &[u8]) -> Result<usize, LoadError> {
        let capacity = self.bytes.len();
        if program.len() > capacity {
            return Err(LoadError::ProgramTooLarge { capacity });
        }

        self.bytes.fill(0);
        self.bytes[..program.len()].copy_from_slice(program);
        self.len = program.len();
        debug!("loaded {} bytes (capacity {capacity})", self.len);
        Ok(self.len)
    }

    /// Number of loaded bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the buffer.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The loaded bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The byte at `offset`, if it lies inside the loaded program.
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.as_slice().get(offset).copied()
    }

    /// Read a `width`-byte little-endian immediate at `*ip` and advance `*ip`.
    ///
    /// The value is zero-extended; callers reinterpret it for their operand
    /// kind. Returns `None` (leaving `*ip` untouched) if the immediate runs
    /// past the loaded program.
    pub fn read_integer(&self, ip: &mut usize, width: OperandWidth) -> Option<u32> {
        let value = width.read_le(self.as_slice().get(*ip..)?)?;
        *ip += width.bytes();
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_zeroed_and_empty() {
        let store = ProgramStore::new(8);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 8);
        assert_eq!(store.as_slice(), &[] as &[u8]);
        assert_eq!(store.byte_at(0), None);
    }

    #[test]
    fn load_from_reader() {
        let mut store = ProgramStore::new(16);
        let n = store.load(&[0x01u8, 0x02, 0x03][..]).unwrap();
        assert_eq!(n, 3);
        assert_eq!(store.as_slice(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn load_exactly_capacity() {
        let mut store = ProgramStore::new(4);
        assert_eq!(store.load(&[0u8; 4][..]).unwrap(), 4);
    }

    #[test]
    fn oversized_source_is_rejected() {
        let mut store = ProgramStore::new(4);
        let err = store.load(&[0u8; 5][..]).unwrap_err();
        assert!(matches!(err, LoadError::ProgramTooLarge { capacity: 4 }));
        assert!(store.is_empty());
    }

    #[test]
    fn reload_clears_previous_program() {
        let mut store = ProgramStore::new(8);
        store.load_bytes(&[9, 9, 9, 9]).unwrap();
        store.load_bytes(&[1]).unwrap();
        assert_eq!(store.as_slice(), &[1]);
        assert_eq!(store.byte_at(1), None);
    }

    #[test]
    fn read_integer_advances_pointer() {
        let mut store = ProgramStore::new(16);
        store.load_bytes(&[0x2a, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff]).unwrap();
        let mut ip = 0;
        assert_eq!(store.read_integer(&mut ip, OperandWidth::Byte), Some(0x2a));
        assert_eq!(ip, 1);
        assert_eq!(store.read_integer(&mut ip, OperandWidth::Word), Some(0x1234));
        assert_eq!(ip, 3);
        let raw = store.read_integer(&mut ip, OperandWidth::DWord).unwrap();
        assert_eq!(raw as i32, -1);
        assert_eq!(ip, 7);
    }

    #[test]
    fn read_integer_stops_at_loaded_end() {
        let mut store = ProgramStore::new(16);
        store.load_bytes(&[0x01, 0x02]).unwrap();
        let mut ip = 1;
        assert_eq!(store.read_integer(&mut ip, OperandWidth::Word), None);
        assert_eq!(ip, 1);
        let mut ip = 5;
        assert_eq!(store.read_integer(&mut ip, OperandWidth::Byte), None);
    }
}
