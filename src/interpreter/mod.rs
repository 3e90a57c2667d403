pub mod instruction_interpreter;
pub mod tree_interpreter;

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::tape::{BoundsPolicy, TapeConfig, DEBUG_CELLS};

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("data pointer ({pointer}) out of bounds (tape length {length})")]
    OutOfBounds { pointer: isize, length: usize },

    #[error("IO Error")]
    Io(
        #[from]
        std::io::Error,
    ),
}

pub struct Runtime<'io> {
    /// Pointer into the heap
    data_pointer: usize,

    /// Our statically allocated heap
    heap: Vec<u8>,

    config: TapeConfig,

    in_stream: Box<dyn Read + 'io>,
    out_stream: Box<dyn Write + 'io>,
    /// Where `#` and `^` dumps go, stderr unless told otherwise
    debug_stream: Box<dyn Write + 'io>,
}

impl<'io> Runtime<'io> {
    pub fn new(config: TapeConfig, in_stream: Box<dyn Read + 'io>, out_stream: Box<dyn Write + 'io>) -> Self {
        Self {
            data_pointer: 0,
            heap: vec![0; config.length.get()],
            config,
            in_stream,
            out_stream,
            debug_stream: Box::new(io::stderr()),
        }
    }

    pub fn with_debug_stream(mut self, debug_stream: Box<dyn Write + 'io>) -> Self {
        self.debug_stream = debug_stream;
        self
    }
}

impl Runtime<'_> {
    pub fn reset(&mut self) {
        self.heap = vec![0; self.heap.len()];
        self.data_pointer = 0;
    }

    pub fn cells(&self) -> &[u8] {
        &self.heap
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    /// Read one byte from the input stream into the cell at the data pointer
    pub fn read(&mut self) -> Result<(), RuntimeError> {
        self.check_data_pointer()?;
        let mut byte = [0u8];
        let value = loop {
            match self.in_stream.read(&mut byte) {
                Ok(0) => break self.config.eof.value(),
                Ok(_) => break Some(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if let Some(value) = value {
            self.heap[self.data_pointer] = value;
        }
        Ok(())
    }

    /// Write the cell at the data pointer to the output stream
    pub fn write(&mut self) -> Result<(), RuntimeError> {
        self.check_data_pointer()?;
        self.out_stream.write_all(&self.heap[self.data_pointer..=self.data_pointer])?;
        Ok(())
    }

    pub fn add(&mut self, delta: i8) -> Result<(), RuntimeError> {
        self.check_data_pointer()?;
        self.heap[self.data_pointer] = self.heap[self.data_pointer].wrapping_add(delta as u8);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), RuntimeError> {
        self.check_data_pointer()?;
        self.heap[self.data_pointer] = 0;
        Ok(())
    }

    pub fn shift_data_pointer(&mut self, by: isize) -> Result<(), RuntimeError> {
        let length = self.heap.len();
        match self.config.bounds {
            // we don't check that the data pointer is valid on shifts
            // we only check that it's valid once it's read/written to
            BoundsPolicy::Unchecked => {
                self.data_pointer = self.data_pointer.wrapping_add_signed(by);
            }
            BoundsPolicy::Wrap => {
                let next = (self.data_pointer as isize).wrapping_add(by);
                let wrapped = next
                    .checked_rem_euclid(length as isize)
                    .ok_or(RuntimeError::OutOfBounds { pointer: next, length })?;
                self.data_pointer = wrapped as usize;
            }
            BoundsPolicy::Abort => {
                let next = (self.data_pointer as isize).wrapping_add(by);
                if next < 0 || next as usize >= length {
                    return Err(RuntimeError::OutOfBounds { pointer: next, length });
                }
                self.data_pointer = next as usize;
            }
        }
        Ok(())
    }

    /// Dump the first few cells in hex, the way `#` always has
    pub fn debug(&mut self) -> Result<(), RuntimeError> {
        let cells: Vec<String> = self
            .heap
            .iter()
            .take(DEBUG_CELLS)
            .map(|cell| format!("{cell:x}"))
            .collect();
        writeln!(self.debug_stream, "\n#[{}...]", cells.join(","))?;
        Ok(())
    }

    /// Print where the cursor is, the way `^` always has
    pub fn debug_pointer(&mut self) -> Result<(), RuntimeError> {
        writeln!(self.debug_stream, "\n^{}", self.data_pointer)?;
        Ok(())
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> Result<bool, RuntimeError> {
        self.check_data_pointer()?;
        Ok(self.heap[self.data_pointer] == 0)
    }

    pub fn flush(&mut self) -> Result<(), RuntimeError> {
        self.out_stream.flush()?;
        Ok(())
    }

    /// check if the data pointer is within bounds
    fn check_data_pointer(&self) -> Result<(), RuntimeError> {
        if self.data_pointer >= self.heap.len() {
            return Err(RuntimeError::OutOfBounds {
                pointer: self.data_pointer as isize,
                length: self.heap.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::EofPolicy;

    fn config(bounds: BoundsPolicy, eof: EofPolicy) -> TapeConfig {
        TapeConfig {
            bounds,
            eof,
            ..TapeConfig::with_length(4).unwrap()
        }
    }

    #[test]
    fn starts_zeroed_at_first_cell() {
        let runtime = Runtime::new(TapeConfig::with_length(8).unwrap(), Box::new(io::empty()), Box::new(io::sink()));
        assert_eq!(runtime.cells(), &[0; 8]);
        assert_eq!(runtime.data_pointer(), 0);
    }

    #[test]
    fn cells_wrap() {
        let mut runtime = Runtime::new(TapeConfig::with_length(1).unwrap(), Box::new(io::empty()), Box::new(io::sink()));
        runtime.add(-1).unwrap();
        assert_eq!(runtime.cells(), &[255]);
        runtime.add(1).unwrap();
        assert!(runtime.value_is_zero().unwrap());
        runtime.add(127).unwrap();
        runtime.add(127).unwrap();
        runtime.add(3).unwrap();
        assert_eq!(runtime.cells(), &[1]);
    }

    #[test]
    fn eof_policies() {
        for (eof, expected) in [(EofPolicy::Unchanged, 7), (EofPolicy::Zero, 0), (EofPolicy::AllOnes, 255)] {
            let mut runtime = Runtime::new(
                config(BoundsPolicy::Unchecked, eof),
                Box::new(&b"A"[..]),
                Box::new(io::sink()),
            );
            runtime.read().unwrap();
            assert_eq!(runtime.cells()[0], b'A');
            runtime.add(7 - b'A' as i8).unwrap();
            runtime.read().unwrap();
            assert_eq!(runtime.cells()[0], expected, "{eof:?}");
        }
    }

    #[test]
    fn unchecked_only_fails_on_access() {
        let mut runtime = Runtime::new(
            config(BoundsPolicy::Unchecked, EofPolicy::Unchanged),
            Box::new(io::empty()),
            Box::new(io::sink()),
        );
        runtime.shift_data_pointer(-1).unwrap();
        runtime.shift_data_pointer(1).unwrap();
        runtime.add(1).unwrap();

        runtime.shift_data_pointer(4).unwrap();
        assert!(matches!(
            runtime.add(1),
            Err(RuntimeError::OutOfBounds { pointer: 4, length: 4 })
        ));
    }

    #[test]
    fn wrap_policy() {
        let mut runtime = Runtime::new(
            config(BoundsPolicy::Wrap, EofPolicy::Unchanged),
            Box::new(io::empty()),
            Box::new(io::sink()),
        );
        runtime.shift_data_pointer(-1).unwrap();
        assert_eq!(runtime.data_pointer(), 3);
        runtime.shift_data_pointer(6).unwrap();
        assert_eq!(runtime.data_pointer(), 1);
    }

    #[test]
    fn abort_policy() {
        let mut runtime = Runtime::new(
            config(BoundsPolicy::Abort, EofPolicy::Unchanged),
            Box::new(io::empty()),
            Box::new(io::sink()),
        );
        runtime.shift_data_pointer(3).unwrap();
        assert!(matches!(
            runtime.shift_data_pointer(1),
            Err(RuntimeError::OutOfBounds { pointer: 4, length: 4 })
        ));
        assert_eq!(runtime.data_pointer(), 3);
        assert!(matches!(
            runtime.shift_data_pointer(-4),
            Err(RuntimeError::OutOfBounds { pointer: -1, .. })
        ));
    }

    #[test]
    fn write_and_debug_streams() {
        let mut output = vec![];
        let mut dump = vec![];
        {
            let mut runtime = Runtime::new(TapeConfig::with_length(3).unwrap(), Box::new(io::empty()), Box::new(&mut output))
                .with_debug_stream(Box::new(&mut dump));
            runtime.add(10).unwrap();
            runtime.write().unwrap();
            runtime.shift_data_pointer(1).unwrap();
            runtime.add(-1).unwrap();
            runtime.debug().unwrap();
            runtime.debug_pointer().unwrap();
        }
        assert_eq!(output, vec![10]);
        assert_eq!(String::from_utf8(dump).unwrap(), "\n#[a,ff,0...]\n\n^1\n");
    }

    #[test]
    fn reset_clears_tape_and_pointer() {
        let mut runtime = Runtime::new(TapeConfig::with_length(2).unwrap(), Box::new(io::empty()), Box::new(io::sink()));
        runtime.shift_data_pointer(1).unwrap();
        runtime.add(5).unwrap();
        runtime.reset();
        assert_eq!(runtime.cells(), &[0, 0]);
        assert_eq!(runtime.data_pointer(), 0);
    }
}
