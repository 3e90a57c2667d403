use crate::{
    lexer::InstructionKind,
    parser::{LoopTable, Program},
};

use super::{Runtime, RuntimeError};

/// Runs the lexed program symbol by symbol, jumping through the loop table.
///
/// Nothing is folded or rewritten here, which makes it the reference the
/// translated code is checked against.
#[derive(Default)]
pub struct InstructionInterpreter {}

impl InstructionInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn run(&mut self, runtime: &mut Runtime, program: &Program, loops: &LoopTable) -> Result<(), RuntimeError> {
        let mut pc = 0;
        while pc < program.len() {
            match program.instructions[pc].kind {
                InstructionKind::MoveRight => runtime.shift_data_pointer(1)?,
                InstructionKind::MoveLeft => runtime.shift_data_pointer(-1)?,
                InstructionKind::Increment => runtime.add(1)?,
                InstructionKind::Decrement => runtime.add(-1)?,
                InstructionKind::Output => runtime.write()?,
                InstructionKind::Input => runtime.read()?,
                InstructionKind::Clear => runtime.clear()?,
                InstructionKind::Debug => runtime.debug()?,
                InstructionKind::DebugPointer => runtime.debug_pointer()?,
                InstructionKind::LoopOpen => {
                    if runtime.value_is_zero()? {
                        // land on the `]`, the ++ below steps past it
                        if let Some(close) = loops.close_of(pc) {
                            pc = close;
                        }
                    }
                }
                InstructionKind::LoopClose => {
                    if !runtime.value_is_zero()? {
                        if let Some(open) = loops.open_of(pc) {
                            pc = open;
                        }
                    }
                }
            }
            pc += 1;
        }
        runtime.flush()
    }
}
