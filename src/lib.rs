//! Brainf**k to C compiler, plus interpreters for the same tape contract.

pub mod compiler;
pub mod emitter;
pub mod interpreter;
pub mod lexer;
pub mod optimizer;
pub mod parser;
pub mod tape;
pub mod translator;

pub use compiler::{compile, CompileError, CompileOptions, Compilation};
