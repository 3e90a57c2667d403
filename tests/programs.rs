use {
    bfc::{
        interpreter::{instruction_interpreter::InstructionInterpreter, tree_interpreter::TreeInterpreter, Runtime},
        optimizer::Optimizations,
        tape::{BoundsPolicy, CellType, EofPolicy, TapeConfig},
        CompileOptions, Compilation,
    },
    rstest::rstest,
    rstest_reuse::{apply, template},
    std::{
        collections::HashSet,
        io::{self, Write},
        path::PathBuf,
        process::{Command, Stdio},
    },
};

#[template]
#[rstest]
fn programs(#[files("tests/programs/*.bf")] path: PathBuf) {}

#[apply(programs)]
fn reference_interpreter(path: PathBuf) {
    let example = ExampleProgram::from(path);
    let compilation = Compilation::new(&example.source, &CompileOptions::default()).unwrap();
    let mut output = Vec::new();
    {
        let mut runtime = Runtime::new(
            TapeConfig::default(),
            Box::new(example.input.as_slice()),
            Box::new(&mut output),
        );
        InstructionInterpreter::new()
            .run(&mut runtime, &compilation.program, &compilation.loops)
            .unwrap();
    }
    assert_eq!(output, example.expected_output);
}

#[apply(programs)]
fn tree_interpreter(path: PathBuf) {
    let example = ExampleProgram::from(path);
    for options in option_sets() {
        assert_eq!(
            example.interpret(&options),
            example.expected_output,
            "{:?}",
            options.optimizations
        );
    }
}

#[apply(programs)]
fn generated_c(path: PathBuf) {
    let example = ExampleProgram::from(path);
    for options in option_sets() {
        let Some(output) = example.compile_and_run(&options) else {
            // no C compiler on this machine
            return;
        };
        assert_eq!(output, example.expected_output, "{:?}", options.tape);
    }
}

#[test]
fn unbalanced_file_reports_position() {
    let err = Compilation::new("comment line\n  +[>+<-]]\n", &CompileOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "unmatched `]` at line 2, column 10");
}

/// Default, unoptimized, and everything switched on with the non-default policies
fn option_sets() -> Vec<CompileOptions> {
    vec![
        CompileOptions::default(),
        CompileOptions {
            optimizations: HashSet::new(),
            ..CompileOptions::default()
        },
        CompileOptions {
            tape: TapeConfig {
                cell: CellType::Signed,
                eof: EofPolicy::Zero,
                bounds: BoundsPolicy::Wrap,
                ..TapeConfig::with_length(30_000).unwrap()
            },
            optimizations: Optimizations::all(),
            ..CompileOptions::default()
        },
        CompileOptions {
            tape: TapeConfig {
                eof: EofPolicy::AllOnes,
                bounds: BoundsPolicy::Abort,
                ..TapeConfig::default()
            },
            ..CompileOptions::default()
        },
    ]
}

struct ExampleProgram {
    name: String,
    source: String,
    input: Vec<u8>,
    expected_output: Vec<u8>,
}

impl ExampleProgram {
    fn interpret(&self, options: &CompileOptions) -> Vec<u8> {
        let compilation = Compilation::new(&self.source, options).unwrap();
        let mut output = Vec::new();
        {
            let mut runtime = Runtime::new(options.tape, Box::new(self.input.as_slice()), Box::new(&mut output));
            TreeInterpreter::new().run(&mut runtime, &compilation.tree).unwrap();
        }
        output
    }

    /// Build the generated C with `cc` and run it, `None` if there is no `cc`
    fn compile_and_run(&self, options: &CompileOptions) -> Option<Vec<u8>> {
        let c = Compilation::new(&self.source, options).unwrap().emit(options);

        let dir = std::env::temp_dir().join(format!("bfc-{}-{}", std::process::id(), self.name));
        std::fs::create_dir_all(&dir).unwrap();
        let c_path = dir.join(format!("{}.c", self.name));
        let binary = dir.join(&self.name);
        std::fs::write(&c_path, &c).unwrap();

        let cc = Command::new("cc").arg("-o").arg(&binary).arg(&c_path).output();
        let cc = match cc {
            Ok(cc) => cc,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => panic!("failed to start cc: {e}"),
        };
        assert!(
            cc.status.success(),
            "cc rejected the generated code:\n{}\n{c}",
            String::from_utf8_lossy(&cc.stderr)
        );

        let mut child = Command::new(&binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        child.stdin.take().unwrap().write_all(&self.input).unwrap();
        let run = child.wait_with_output().unwrap();
        assert!(run.status.success());

        std::fs::remove_dir_all(&dir).ok();
        Some(run.stdout)
    }
}

impl From<PathBuf> for ExampleProgram {
    fn from(mut path: PathBuf) -> Self {
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let source = std::fs::read_to_string(&path).unwrap();

        path.set_extension("stdin");
        let input = std::fs::read(&path).unwrap_or_default();

        path.set_extension("stdout");
        let expected_output = std::fs::read(&path).unwrap_or_else(|e| {
            panic!("failed to read expected output file at path {path:?}: {e}")
        });

        ExampleProgram {
            name,
            source,
            input,
            expected_output,
        }
    }
}
