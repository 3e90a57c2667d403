use std::fmt;

use clap::ValueEnum;
use thiserror::Error;

pub mod lexer;

/// Which symbols the lexer understands
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Plain brainfuck, only `><+-.,[]` mean anything
    #[default]
    Standard,
    /// Brainfuck plus `_` (clear), `#` (cell dump), `^` (pointer dump), `!` (end) and numeric quantifiers
    Extended,
}

/// Human readable location of a symbol in the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    /// offset within the source in codepoints
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    // `>`: Increment the `data pointer` by one
    MoveRight,
    // `<`: Decrement the `data pointer` by one
    MoveLeft,

    // `+`: Increment the byte at the `data pointer` by one
    Increment,
    // `-`: Decrement the byte at the `data pointer` by one
    Decrement,

    // `.`: Write the byte at the `data pointer` to the `output device`
    Output,
    // `,`: Read the next byte from the `input device` and write it to the `data pointer`
    Input,

    // `[`: If the byte at the `data pointer` is zero, then jump the `instruction pointer` forward to the instruction after the matching `]`
    LoopOpen,
    // `]`: If the byte at the `data pointer` is non-zero then jump the `instruction pointer` back to the instruction after the matching `[`
    LoopClose,

    // `_` (extended): Set the byte at the `data pointer` to zero
    Clear,
    // `#` (extended): Dump the first few cells to the diagnostic stream
    Debug,
    // `^` (extended): Print the position of the `data pointer` to the diagnostic stream
    DebugPointer,
}

impl InstructionKind {
    pub fn symbol(&self) -> char {
        match self {
            InstructionKind::MoveRight => '>',
            InstructionKind::MoveLeft => '<',
            InstructionKind::Increment => '+',
            InstructionKind::Decrement => '-',
            InstructionKind::Output => '.',
            InstructionKind::Input => ',',
            InstructionKind::LoopOpen => '[',
            InstructionKind::LoopClose => ']',
            InstructionKind::Clear => '_',
            InstructionKind::Debug => '#',
            InstructionKind::DebugPointer => '^',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub position: Position,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("quantifier at {position} must be followed by one of `><+-.,`")]
    MisplacedQuantifier { position: Position },

    #[error("quantifier at {position} does not fit in 16 bits")]
    QuantifierTooLarge { position: Position },
}
