//! The runtime contract shared by the C emitter and the interpreters.
//!
//! Cells are 8 bits wide and wrap modulo 256. The tape starts zeroed with the
//! cursor on the first cell.

use std::num::NonZeroUsize;

use clap::ValueEnum;
use thiserror::Error;

/// Tape length of the programs this tool has historically generated
pub const DEFAULT_TAPE_LENGTH: NonZeroUsize = match NonZeroUsize::new(65_535) {
    Some(length) => length,
    None => panic!("tape length must be non-zero"),
};

/// How many cells a `#` debug dump prints
pub const DEBUG_CELLS: usize = 20;

/// What `,` does to the current cell once input is exhausted
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EofPolicy {
    /// Leave the cell as it was
    #[default]
    Unchanged,
    /// Store 0
    Zero,
    /// Store 255 (-1 as a signed cell)
    AllOnes,
}

impl EofPolicy {
    /// The value stored on end of input, if any
    pub fn value(&self) -> Option<u8> {
        match self {
            EofPolicy::Unchanged => None,
            EofPolicy::Zero => Some(0),
            EofPolicy::AllOnes => Some(u8::MAX),
        }
    }
}

/// What happens when the cursor leaves the tape
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BoundsPolicy {
    /// No checks, a raw pointer into a fixed buffer
    #[default]
    Unchecked,
    /// The cursor wraps around modulo the tape length
    Wrap,
    /// Moving off the tape terminates the program
    Abort,
}

/// Signedness of a cell, only visible in generated code
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    #[default]
    Unsigned,
    Signed,
}

impl CellType {
    pub fn c_name(&self) -> &'static str {
        match self {
            CellType::Unsigned => "unsigned char",
            CellType::Signed => "signed char",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeError {
    #[error("the tape needs at least one cell")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeConfig {
    /// A zero length tape has no cell for the cursor to start on
    pub length: NonZeroUsize,
    pub cell: CellType,
    pub eof: EofPolicy,
    pub bounds: BoundsPolicy,
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_TAPE_LENGTH,
            cell: CellType::default(),
            eof: EofPolicy::default(),
            bounds: BoundsPolicy::default(),
        }
    }
}

impl TapeConfig {
    pub fn with_length(length: usize) -> Result<Self, TapeError> {
        let length = NonZeroUsize::new(length).ok_or(TapeError::Empty)?;
        Ok(Self {
            length,
            ..Self::default()
        })
    }
}
