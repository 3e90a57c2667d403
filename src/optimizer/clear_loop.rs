use crate::translator::{Block, Operation};

/// Replace loops that only add an odd delta to the current cell with a clear.
///
/// An odd step visits every residue mod 256, so the loop always reaches zero.
/// Even steps can loop forever and are left alone.
pub fn clear_loop(block: &mut Block) {
    let mut pending = vec![block];
    while let Some(block) = pending.pop() {
        for operation in block.operations.iter_mut() {
            if is_clear_loop(operation) {
                *operation = Operation::Clear;
            } else if let Operation::Loop(body) = operation {
                pending.push(body);
            }
        }
    }
}

fn is_clear_loop(operation: &Operation) -> bool {
    match operation {
        Operation::Loop(body) => matches!(body.operations.as_slice(), [Operation::Add(delta)] if delta % 2 != 0),
        _ => false,
    }
}
