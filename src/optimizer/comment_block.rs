use crate::translator::{Block, Operation};

/// Loops at the very start of the program can be skipped
pub fn comment_block(block: &mut Block) {
    // this block is the high level "program", every cell is still 0 when it
    // starts so any leading `[` jumps straight past its `]`; the cell is still
    // 0 afterwards so the same holds for the loop after it.
    let leading = block
        .operations
        .iter()
        .take_while(|operation| matches!(operation, Operation::Loop(_)))
        .count();
    block.operations.drain(..leading);
}
