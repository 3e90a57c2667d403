pub mod translator;

pub use translator::translate;

/// A statement of the generated program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Move the cursor by a net offset
    Move(isize),
    /// Add a net delta (mod 256) to the current cell
    Add(i8),
    /// Set the current cell to zero
    Clear,

    Output,
    Input,
    Debug,
    DebugPointer,

    /// Repeat the block while the current cell is non-zero
    Loop(Block),
}

/// A run of operations; loops own their bodies.
///
/// Nesting depth is only limited by memory: walking, dropping, interpreting
/// and emitting all keep their own stack instead of recursing. The derived
/// `Clone`, `Debug` and `PartialEq` still recurse, so keep them to shallow trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub operations: Vec<Operation>,
}

/// The root block is the whole program
pub type OperationTree = Block;

impl Block {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Every operation at any depth, each loop just before its body
    pub fn walk(&self) -> impl Iterator<Item = &Operation> {
        let mut pending: Vec<&Operation> = self.operations.iter().rev().collect();
        std::iter::from_fn(move || {
            let operation = pending.pop()?;
            if let Operation::Loop(body) = operation {
                pending.extend(body.operations.iter().rev());
            }
            Some(operation)
        })
    }

    /// Does any operation (at any depth) satisfy `predicate`?
    pub fn contains(&self, predicate: &dyn Fn(&Operation) -> bool) -> bool {
        self.walk().any(|operation| predicate(operation))
    }

    /// Number of operations including those nested in loops (a loop counts itself too)
    pub fn size(&self) -> usize {
        self.walk().count()
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // flatten nested bodies into one list so dropping never recurses
        let mut pending = std::mem::take(&mut self.operations);
        while let Some(operation) = pending.pop() {
            if let Operation::Loop(mut body) = operation {
                pending.append(&mut body.operations);
            }
        }
    }
}
