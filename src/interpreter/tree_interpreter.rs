use crate::translator::{Block, Operation, OperationTree};

use super::{Runtime, RuntimeError};

pub struct TreeInterpreter {}

/// A block being run and the index of its next operation
struct Frame<'t> {
    operations: &'t [Operation],
    next: usize,
}

impl<'t> Frame<'t> {
    fn new(block: &'t Block) -> Self {
        Self {
            operations: &block.operations,
            next: 0,
        }
    }
}

impl TreeInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn run(&mut self, runtime: &mut Runtime, tree: &OperationTree) -> Result<(), RuntimeError> {
        // the bottom frame is the program itself, which doesn't repeat
        let mut frames = vec![Frame::new(tree)];
        loop {
            let depth = frames.len();
            let Some(frame) = frames.last_mut() else { break };
            let operations = frame.operations;
            match operations.get(frame.next) {
                Some(operation) => {
                    frame.next += 1;
                    match operation {
                        Operation::Move(by) => runtime.shift_data_pointer(*by)?,
                        Operation::Add(delta) => runtime.add(*delta)?,
                        Operation::Clear => runtime.clear()?,
                        Operation::Output => runtime.write()?,
                        Operation::Input => runtime.read()?,
                        Operation::Debug => runtime.debug()?,
                        Operation::DebugPointer => runtime.debug_pointer()?,
                        Operation::Loop(body) => {
                            if !runtime.value_is_zero()? {
                                frames.push(Frame::new(body));
                            }
                        }
                    }
                }
                // end of a loop body with a non-zero cell goes round again
                None if depth > 1 && !runtime.value_is_zero()? => frame.next = 0,
                None => {
                    frames.pop();
                }
            }
        }
        runtime.flush()
    }
}

impl Default for TreeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
