use thiserror::Error;

use crate::lexer::{Instruction, Position};

pub mod matcher;

/// The flat, lexed form of a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// For every instruction index, the index of its loop partner (if it is a `[` or `]`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopTable {
    partners: Vec<Option<usize>>,
}

impl LoopTable {
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.partners.get(index).copied().flatten()
    }

    /// Index of the `]` closing the `[` at `open`
    pub fn close_of(&self, open: usize) -> Option<usize> {
        self.partner(open).filter(|close| *close > open)
    }

    /// Index of the `[` opening the `]` at `close`
    pub fn open_of(&self, close: usize) -> Option<usize> {
        self.partner(close).filter(|open| *open < close)
    }

    /// All loop pairs as `(open, close)`, ordered by open index
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.partners
            .iter()
            .copied()
            .enumerate()
            .filter_map(|(open, partner)| partner.filter(|close| *close > open).map(|close| (open, close)))
    }

    /// Number of loop pairs
    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.iter().all(Option::is_none)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnbalancedLoopError {
    #[error("unmatched `[` at {position}")]
    UnmatchedOpen { position: Position },

    #[error("unmatched `]` at {position}")]
    UnmatchedClose { position: Position },
}

impl UnbalancedLoopError {
    pub fn position(&self) -> Position {
        match self {
            UnbalancedLoopError::UnmatchedOpen { position } => *position,
            UnbalancedLoopError::UnmatchedClose { position } => *position,
        }
    }
}
