use crate::parser::Program;

use super::{Dialect, Instruction, InstructionKind, LexerError, Position};

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' format / offset within the file (in terms of 'codepoints') */
    pub codepoint_offset: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
    dialect: Dialect,

    /// A quantified instruction and how many more copies of it are owed
    repeat: Option<(Instruction, u16)>,
    halted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Self::with_dialect(chars, Dialect::Standard)
    }

    pub fn with_dialect(chars: &'a str, dialect: Dialect) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            codepoint_offset: 0,

            chars: chars.chars().peekable(),
            dialect,

            repeat: None,
            halted: false,
        }
    }

    fn transform_to_kind(&self, c: char) -> Option<InstructionKind> {
        match c {
            '>' => Some(InstructionKind::MoveRight),
            '<' => Some(InstructionKind::MoveLeft),
            '+' => Some(InstructionKind::Increment),
            '-' => Some(InstructionKind::Decrement),
            '.' => Some(InstructionKind::Output),
            ',' => Some(InstructionKind::Input),
            '[' => Some(InstructionKind::LoopOpen),
            ']' => Some(InstructionKind::LoopClose),
            '_' if self.dialect == Dialect::Extended => Some(InstructionKind::Clear),
            '#' if self.dialect == Dialect::Extended => Some(InstructionKind::Debug),
            '^' if self.dialect == Dialect::Extended => Some(InstructionKind::DebugPointer),
            // everything else is a comment
            _ => None,
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.cur_line,
            column: self.cur_col,
            offset: self.codepoint_offset,
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.cur_line += 1;
            self.cur_col = 1;
        } else {
            self.cur_col += 1;
        }
        self.codepoint_offset += 1;
        Some(c)
    }

    /// Reads the digits of a quantifier starting with `first`
    fn count(&mut self, first: char, position: Position) -> Result<u16, LexerError> {
        let mut digits = String::from(first);
        while let Some(c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(*c);
            self.consume_char();
        }

        digits
            .parse()
            .map_err(|_| LexerError::QuantifierTooLarge { position })
    }

    /// Reads a quantifier starting with `first` and the symbol it applies to.
    ///
    /// `None` means the quantifier was `0` and nothing is emitted.
    fn quantified(&mut self, first: char, position: Position) -> Result<Option<Instruction>, LexerError> {
        let mut position = position;
        let mut count = self.count(first, position)?;

        // comments between the quantifier and its symbol are allowed
        let kind = loop {
            let next = self.position();
            let c = match self.consume_char() {
                Some(c) => c,
                None => return Err(LexerError::MisplacedQuantifier { position }),
            };
            match self.transform_to_kind(c) {
                Some(
                    kind @ (InstructionKind::MoveRight
                    | InstructionKind::MoveLeft
                    | InstructionKind::Increment
                    | InstructionKind::Decrement
                    | InstructionKind::Output
                    | InstructionKind::Input),
                ) => break kind,
                Some(_) => return Err(LexerError::MisplacedQuantifier { position }),
                None if c == '!' => return Err(LexerError::MisplacedQuantifier { position }),
                // a later quantifier replaces the earlier one
                None if c.is_ascii_digit() => {
                    position = next;
                    count = self.count(c, position)?;
                }
                None => continue,
            }
        };

        let instruction = Instruction { kind, position };
        match count {
            0 => Ok(None),
            1 => Ok(Some(instruction)),
            n => {
                self.repeat = Some((instruction, n - 1));
                Ok(Some(instruction))
            }
        }
    }

    /// The next meaningful instruction, `None` once the source is exhausted
    pub fn next_instruction(&mut self) -> Result<Option<Instruction>, LexerError> {
        if let Some((instruction, remaining)) = self.repeat.take() {
            if remaining > 1 {
                self.repeat = Some((instruction, remaining - 1));
            }
            return Ok(Some(instruction));
        }

        if self.halted {
            return Ok(None);
        }

        loop {
            let position = self.position();
            let Some(c) = self.consume_char() else {
                return Ok(None);
            };

            if let Some(kind) = self.transform_to_kind(c) {
                return Ok(Some(Instruction { kind, position }));
            }

            if self.dialect == Dialect::Extended {
                match c {
                    '!' => {
                        self.halted = true;
                        return Ok(None);
                    }
                    '0'..='9' => {
                        if let Some(instruction) = self.quantified(c, position)? {
                            return Ok(Some(instruction));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    pub fn collect_results(&mut self) -> Result<Vec<Instruction>, LexerError> {
        let mut v = vec![];
        while let Some(instruction) = self.next_instruction()? {
            v.push(instruction);
        }
        Ok(v)
    }

    pub fn collect_program(&mut self) -> Result<Program, LexerError> {
        Ok(Program::new(self.collect_results()?))
    }
}
