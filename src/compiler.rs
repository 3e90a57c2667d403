use std::collections::HashSet;

use thiserror::Error;

use crate::{
    emitter::CEmitter,
    lexer::{lexer::Lexer, Dialect, LexerError, Position},
    optimizer::{optimize, Optimizations},
    parser::{matcher::match_loops, LoopTable, Program, UnbalancedLoopError},
    tape::TapeConfig,
    translator::{translate, OperationTree},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    UnbalancedLoop(#[from] UnbalancedLoopError),
}

impl CompileError {
    pub fn position(&self) -> Position {
        match self {
            CompileError::Lexer(LexerError::MisplacedQuantifier { position })
            | CompileError::Lexer(LexerError::QuantifierTooLarge { position }) => *position,
            CompileError::UnbalancedLoop(e) => e.position(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub tape: TapeConfig,
    pub optimizations: HashSet<Optimizations>,
    pub dialect: Dialect,
    /// Shown in the banner of the generated file
    pub source_name: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            tape: TapeConfig::default(),
            optimizations: Optimizations::defaults(),
            dialect: Dialect::default(),
            source_name: None,
        }
    }
}

/// Everything the front half of the pipeline produces
#[derive(Debug, Clone)]
pub struct Compilation {
    pub program: Program,
    pub loops: LoopTable,
    pub tree: OperationTree,
}

impl Compilation {
    /// Lex, match, translate and optimize `source`
    pub fn new(source: &str, options: &CompileOptions) -> Result<Self, CompileError> {
        let program = Lexer::with_dialect(source, options.dialect).collect_program()?;
        let loops = match_loops(&program)?;
        let coalesce = options.optimizations.contains(&Optimizations::Coalesce);
        let tree = optimize(translate(&program, &loops, coalesce), &options.optimizations);
        Ok(Self { program, loops, tree })
    }

    pub fn emit(&self, options: &CompileOptions) -> String {
        let emitter = CEmitter::new(options.tape);
        match options.source_name.as_deref() {
            Some(name) => emitter.with_source_name(name).emit(&self.tree),
            None => emitter.emit(&self.tree),
        }
    }
}

/// Compile brainfuck source into a C program; nothing is produced on error
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    Ok(Compilation::new(source, options)?.emit(options))
}
