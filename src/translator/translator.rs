use crate::{
    lexer::InstructionKind,
    parser::{LoopTable, Program},
};

use super::{Block, Operation, OperationTree};

/// A run of moves or adds that hasn't been written out yet
#[derive(Debug, Clone, Copy)]
enum Pending {
    Move(isize),
    Add(i8),
}

/// A loop body under construction
struct Frame {
    body: Block,
    /// where the matching `]` is according to the loop table
    close: Option<usize>,
}

pub struct Translator<'a> {
    program: &'a Program,
    loops: &'a LoopTable,
    coalesce: bool,

    pending: Option<Pending>,
    root: Block,
    frames: Vec<Frame>,
}

/// Translate a matched program into an operation tree in a single pass
pub fn translate(program: &Program, loops: &LoopTable, coalesce: bool) -> OperationTree {
    Translator::new(program, loops, coalesce).translate()
}

impl<'a> Translator<'a> {
    pub fn new(program: &'a Program, loops: &'a LoopTable, coalesce: bool) -> Self {
        Self {
            program,
            loops,
            coalesce,
            pending: None,
            root: Block::default(),
            frames: vec![],
        }
    }

    pub fn translate(mut self) -> OperationTree {
        let program = self.program;
        for (index, instruction) in program.instructions.iter().enumerate() {
            match instruction.kind {
                InstructionKind::MoveRight => self.accumulate(Pending::Move(1)),
                InstructionKind::MoveLeft => self.accumulate(Pending::Move(-1)),
                InstructionKind::Increment => self.accumulate(Pending::Add(1)),
                InstructionKind::Decrement => self.accumulate(Pending::Add(-1)),
                InstructionKind::Output => self.push(Operation::Output),
                InstructionKind::Input => self.push(Operation::Input),
                InstructionKind::Clear => self.push(Operation::Clear),
                InstructionKind::Debug => self.push(Operation::Debug),
                InstructionKind::DebugPointer => self.push(Operation::DebugPointer),
                InstructionKind::LoopOpen => {
                    self.flush();
                    self.frames.push(Frame {
                        body: Block::default(),
                        close: self.loops.close_of(index),
                    });
                }
                InstructionKind::LoopClose => {
                    self.flush();
                    if let Some(frame) = self.frames.pop() {
                        debug_assert_eq!(frame.close, Some(index), "loop table doesn't belong to this program");
                        self.current().operations.push(Operation::Loop(frame.body));
                    }
                }
            }
        }

        self.flush();
        // only reachable with a loop table from another program
        while let Some(frame) = self.frames.pop() {
            self.current().operations.push(Operation::Loop(frame.body));
        }

        self.root
    }

    fn current(&mut self) -> &mut Block {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn push(&mut self, operation: Operation) {
        self.flush();
        self.current().operations.push(operation);
    }

    fn accumulate(&mut self, delta: Pending) {
        if !self.coalesce {
            self.flush();
            self.pending = Some(delta);
            return;
        }

        let merged = match (self.pending, delta) {
            (Some(Pending::Move(a)), Pending::Move(b)) => Pending::Move(a + b),
            (Some(Pending::Add(a)), Pending::Add(b)) => Pending::Add(a.wrapping_add(b)),
            _ => {
                self.flush();
                delta
            }
        };
        self.pending = Some(merged);
    }

    /// Write out the pending run; net zero runs leave no trace
    fn flush(&mut self) {
        let operation = match self.pending.take() {
            Some(Pending::Move(0)) | Some(Pending::Add(0)) | None => return,
            Some(Pending::Move(offset)) => Operation::Move(offset),
            Some(Pending::Add(delta)) => Operation::Add(delta),
        };
        self.current().operations.push(operation);
    }
}
