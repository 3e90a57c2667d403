use std::collections::HashSet;

use clap::ValueEnum;

use crate::translator::OperationTree;

use self::{clear_loop::clear_loop, comment_block::comment_block};

pub mod clear_loop;
pub mod comment_block;

#[derive(ValueEnum, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Optimizations {
    /// Fold runs of `+-` and `<>` into a single add or move
    Coalesce,
    /// Drop loops at the start of the program, they can never run
    CommentBlock,
    /// Turn `[-]` style loops into a single clear
    ClearLoop,
}

impl Optimizations {
    pub fn all() -> HashSet<Optimizations> {
        Optimizations::value_variants().iter().copied().collect()
    }

    /// What the generated code has always looked like: runs folded, nothing else
    pub fn defaults() -> HashSet<Optimizations> {
        HashSet::from([Optimizations::Coalesce])
    }
}

/// Run the tree level passes; coalescing already happened during translation
pub fn optimize(mut tree: OperationTree, options: &HashSet<Optimizations>) -> OperationTree {
    if options.contains(&Optimizations::CommentBlock) {
        comment_block(&mut tree);
    }

    if options.contains(&Optimizations::ClearLoop) {
        clear_loop(&mut tree);
    }

    tree
}
