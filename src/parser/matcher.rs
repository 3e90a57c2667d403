use crate::lexer::InstructionKind;

use super::{LoopTable, Program, UnbalancedLoopError};

/// Pair up every `[` with its `]` in one left to right pass.
///
/// Pending opens are kept on an explicit stack so a `]` always closes the
/// innermost `[` that is still open.
pub fn match_loops(program: &Program) -> Result<LoopTable, UnbalancedLoopError> {
    let mut partners = vec![None; program.len()];
    let mut pending: Vec<usize> = vec![];

    for (index, instruction) in program.instructions.iter().enumerate() {
        match instruction.kind {
            InstructionKind::LoopOpen => pending.push(index),
            InstructionKind::LoopClose => {
                let open = pending.pop().ok_or(UnbalancedLoopError::UnmatchedClose {
                    position: instruction.position,
                })?;
                partners[open] = Some(index);
                partners[index] = Some(open);
            }
            _ => {}
        }
    }

    // the earliest `[` left open is the one reported
    if let Some(&open) = pending.first() {
        return Err(UnbalancedLoopError::UnmatchedOpen {
            position: program.instructions[open].position,
        });
    }

    Ok(LoopTable { partners })
}
