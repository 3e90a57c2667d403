use crate::{
    tape::{BoundsPolicy, EofPolicy, TapeConfig, DEBUG_CELLS},
    translator::{Operation, OperationTree},
};

const INDENT: &str = "    ";

/// Loops nested deeper than this are indented as if they were at this depth
pub const MAX_INDENT_DEPTH: usize = 32;

/// Renders an operation tree as a standalone C program
pub struct CEmitter<'a> {
    config: TapeConfig,
    source_name: Option<&'a str>,
    out: String,
}

impl<'a> CEmitter<'a> {
    pub fn new(config: TapeConfig) -> Self {
        Self {
            config,
            source_name: None,
            out: String::new(),
        }
    }

    /// Name the source file in the banner comment
    pub fn with_source_name(mut self, source_name: &'a str) -> Self {
        self.source_name = Some(source_name);
        self
    }

    pub fn emit(mut self, tree: &OperationTree) -> String {
        let uses_input = tree.contains(&|operation: &Operation| matches!(operation, Operation::Input));
        let uses_debug = tree.contains(&|operation: &Operation| matches!(operation, Operation::Debug));
        let uses_pointer = tree.contains(&|operation: &Operation| matches!(operation, Operation::DebugPointer));
        let uses_move = self.config.bounds != BoundsPolicy::Unchecked
            && tree.contains(&|operation: &Operation| matches!(operation, Operation::Move(_)));

        self.banner();
        self.out.push_str("#include <stdio.h>\n");
        if uses_move && self.config.bounds == BoundsPolicy::Abort {
            self.out.push_str("#include <stdlib.h>\n");
        }
        self.out.push('\n');

        let cell = self.config.cell.c_name();
        self.out.push_str(&format!("#define TAPE_LENGTH {}\n\n", self.config.length));
        self.out.push_str(&format!("static {cell} mem[TAPE_LENGTH];\n"));
        self.out.push_str(&format!("static {cell} *p;\n\n"));

        if uses_input {
            self.read_helper();
        }
        if uses_debug {
            self.debug_helper();
        }
        if uses_pointer {
            self.pointer_helper();
        }
        if uses_move {
            self.move_helper();
        }

        self.out.push_str("int main(void) {\n");
        self.out.push_str(INDENT);
        self.out.push_str("p = mem;\n");
        self.block(tree);
        self.out.push_str(INDENT);
        self.out.push_str("return 0;\n");
        self.out.push_str("}\n");

        self.out
    }

    fn banner(&mut self) {
        self.out.push_str("/* brainfuck code\n");
        if let Some(name) = self.source_name {
            // keep the comment closed where we close it
            let name = name.replace("*/", "* /");
            self.out.push_str(&format!(" * from the file \"{name}\"\n"));
        }
        self.out.push_str(" * compiled with bfc\n */\n\n");
    }

    fn read_helper(&mut self) {
        let cell = self.config.cell.c_name();
        let store = match self.config.eof {
            EofPolicy::Unchanged => format!("    if (c != EOF) {{\n        *p = ({cell}) c;\n    }}\n"),
            EofPolicy::Zero => format!("    *p = c == EOF ? 0 : ({cell}) c;\n"),
            EofPolicy::AllOnes => format!("    *p = c == EOF ? ({cell}) -1 : ({cell}) c;\n"),
        };
        self.out.push_str("static void bfc_read(void) {\n");
        self.out.push_str("    int c = getchar();\n");
        self.out.push_str(&store);
        self.out.push_str("}\n\n");
    }

    fn debug_helper(&mut self) {
        let cells = DEBUG_CELLS.min(self.config.length.get());
        self.out.push_str("static void bfc_debug(void) {\n");
        self.out.push_str("    int i;\n");
        self.out.push_str("    fputs(\"\\n#[\", stderr);\n");
        self.out.push_str(&format!("    for (i = 0; i < {cells}; i++) {{\n"));
        self.out.push_str("        fprintf(stderr, i ? \",%x\" : \"%x\", (unsigned) (unsigned char) mem[i]);\n");
        self.out.push_str("    }\n");
        self.out.push_str("    fputs(\"...]\\n\", stderr);\n");
        self.out.push_str("}\n\n");
    }

    fn pointer_helper(&mut self) {
        self.out.push_str("static void bfc_pointer(void) {\n");
        self.out.push_str("    fprintf(stderr, \"\\n^%lld\\n\", (long long) (p - mem));\n");
        self.out.push_str("}\n\n");
    }

    fn move_helper(&mut self) {
        let cell = self.config.cell.c_name();
        self.out.push_str(&format!("static {cell} *bfc_move({cell} *cell, long long offset) {{\n"));
        match self.config.bounds {
            BoundsPolicy::Wrap => {
                self.out.push_str("    long long next = ((long long) (cell - mem) + offset) % TAPE_LENGTH;\n");
                self.out.push_str("    if (next < 0) {\n");
                self.out.push_str("        next += TAPE_LENGTH;\n");
                self.out.push_str("    }\n");
            }
            BoundsPolicy::Abort => {
                self.out.push_str("    long long next = (long long) (cell - mem) + offset;\n");
                self.out.push_str("    if (next < 0 || next >= TAPE_LENGTH) {\n");
                self.out.push_str(
                    "        fprintf(stderr, \"data pointer (%lld) out of bounds (tape length %lld)\\n\", next, (long long) TAPE_LENGTH);\n",
                );
                self.out.push_str("        exit(1);\n");
                self.out.push_str("    }\n");
            }
            BoundsPolicy::Unchecked => {
                self.out.push_str("    long long next = (long long) (cell - mem) + offset;\n");
            }
        }
        self.out.push_str("    return mem + next;\n");
        self.out.push_str("}\n\n");
    }

    fn line(&mut self, depth: usize, statement: &str) {
        for _ in 0..depth.min(MAX_INDENT_DEPTH) {
            self.out.push_str(INDENT);
        }
        self.out.push_str(statement);
        self.out.push('\n');
    }

    /// The body of `main`; one iterator per open loop, so the depth is the stack height
    fn block(&mut self, tree: &OperationTree) {
        let mut stack = vec![tree.operations.iter()];
        while let Some(operations) = stack.last_mut() {
            let Some(operation) = operations.next() else {
                stack.pop();
                if !stack.is_empty() {
                    self.line(stack.len(), "}");
                }
                continue;
            };
            let depth = stack.len();
            match operation {
                Operation::Move(offset) => match self.config.bounds {
                    BoundsPolicy::Unchecked => self.line(depth, &format!("p += {offset};")),
                    _ => self.line(depth, &format!("p = bfc_move(p, {offset});")),
                },
                Operation::Add(delta) => self.line(depth, &format!("*p += {delta};")),
                Operation::Clear => self.line(depth, "*p = 0;"),
                Operation::Output => self.line(depth, "putchar(*p);"),
                Operation::Input => self.line(depth, "bfc_read();"),
                Operation::Debug => self.line(depth, "bfc_debug();"),
                Operation::DebugPointer => self.line(depth, "bfc_pointer();"),
                Operation::Loop(body) => {
                    self.line(depth, "while (*p) {");
                    stack.push(body.operations.iter());
                }
            }
        }
    }
}
