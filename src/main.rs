use std::{
    collections::HashSet,
    fmt::Display,
    io::{self, Write},
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use anyhow::Context;
use bfc::{
    emitter::CEmitter,
    interpreter::{tree_interpreter::TreeInterpreter, Runtime},
    lexer::{lexer::Lexer, Dialect},
    optimizer::{optimize, Optimizations},
    parser::matcher::match_loops,
    tape::{BoundsPolicy, CellType, EofPolicy, TapeConfig, TapeError, DEFAULT_TAPE_LENGTH},
    translator::translate,
    CompileError,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;

/// Brainf**k to C compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to operate on
    #[arg()]
    file: PathBuf,

    /// What to do with the file, `emit` when none are given
    #[arg(value_enum)]
    commands: Vec<Commands>,

    /// Write the generated C here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short = 'O', long, value_enum)]
    optimizations: Vec<Optimizations>,

    #[arg(short, long)]
    all_optimizations: bool,

    /// Emit every `+-<>` on its own
    #[arg(long)]
    no_coalesce: bool,

    #[arg(short, long, default_value_t = DEFAULT_TAPE_LENGTH, value_parser = parse_tape_length)]
    tape_length: NonZeroUsize,

    #[arg(long, value_enum, default_value_t = EofPolicy::Unchanged)]
    eof: EofPolicy,

    #[arg(long, value_enum, default_value_t = BoundsPolicy::Unchecked)]
    bounds: BoundsPolicy,

    #[arg(long, value_enum, default_value_t = CellType::Unsigned)]
    cell: CellType,

    #[arg(long, value_enum, default_value_t = Dialect::Standard)]
    dialect: Dialect,

    /// Report each stage and how long it took on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Commands {
    /// Output the lexed symbols
    Tokens,
    /// Output the matched loop pairs
    Loops,
    /// Output the operation tree
    Tree,

    /// Run the operation tree on stdin/stdout
    Interpret,
    /// Write the generated C
    Emit,
}

fn parse_tape_length(s: &str) -> Result<NonZeroUsize, String> {
    let length = s.parse::<usize>().map_err(|e| e.to_string())?;
    NonZeroUsize::new(length).ok_or_else(|| TapeError::Empty.to_string())
}

/// Stage logging, silent unless `--verbose`
struct Log {
    verbose: bool,
}

impl Log {
    fn stage<T>(&self, name: impl Display, f: impl FnOnce() -> T) -> T {
        if self.verbose {
            eprintln!("{}", format!("Starting {name}").blue());
        }
        let now = Instant::now();
        let result = f();
        if self.verbose {
            eprintln!("{} {:.2?}", format!("Finished {name} in").green(), now.elapsed());
        }
        result
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut commands: HashSet<Commands> = HashSet::from_iter(args.commands);
    if commands.is_empty() {
        commands.insert(Commands::Emit);
    }

    let mut optimizations = Optimizations::defaults();
    optimizations.extend(args.optimizations);
    if args.all_optimizations {
        optimizations.extend(Optimizations::all());
    }
    if args.no_coalesce {
        optimizations.remove(&Optimizations::Coalesce);
    }

    let config = TapeConfig {
        length: args.tape_length,
        cell: args.cell,
        eof: args.eof,
        bounds: args.bounds,
    };
    let log = Log { verbose: args.verbose };
    let source_name = args.file.display().to_string();

    if log.verbose {
        eprintln!("Compiling {source_name}");
    }

    let bytes = std::fs::read(&args.file).with_context(|| format!("failed to read {source_name}"))?;
    // anything that isn't a command is a comment, so invalid UTF-8 can't matter
    let text = String::from_utf8_lossy(&bytes);

    let program = log
        .stage("lexing", || Lexer::with_dialect(&text, args.dialect).collect_program())
        .map_err(CompileError::from)
        .with_context(|| format!("failed to compile {source_name}"))?;

    if commands.contains(&Commands::Tokens) {
        let symbols: String = program.instructions.iter().map(|i| i.kind.symbol()).collect();
        println!("{symbols}");
    }

    let loops = log
        .stage("matching loops", || match_loops(&program))
        .map_err(CompileError::from)
        .with_context(|| format!("failed to compile {source_name}"))?;

    if commands.contains(&Commands::Loops) {
        for (open, close) in loops.pairs() {
            println!(
                "[ {} -> ] {}",
                program.instructions[open].position,
                program.instructions[close].position
            );
        }
    }

    if log.verbose {
        eprintln!("{} {:?}", "Optimizations".blue(), &optimizations);
    }
    let tree = log.stage("translation", || {
        translate(&program, &loops, optimizations.contains(&Optimizations::Coalesce))
    });
    let tree = log.stage("optimizations", || optimize(tree, &optimizations));
    if log.verbose {
        eprintln!("{} {}", "Operation count".green(), tree.size());
    }

    if commands.contains(&Commands::Tree) {
        println!("{:#?}", tree);
    }

    if commands.contains(&Commands::Interpret) {
        let mut runtime = Runtime::new(config, Box::new(io::stdin()), Box::new(io::stdout()));
        log.stage("interpreter", || TreeInterpreter::new().run(&mut runtime, &tree))
            .with_context(|| format!("{source_name} failed while running"))?;
    }

    if commands.contains(&Commands::Emit) {
        let c = log.stage("emitting C", || {
            CEmitter::new(config).with_source_name(&source_name).emit(&tree)
        });

        match &args.output {
            Some(path) => std::fs::write(path, c).with_context(|| format!("failed to write {}", path.display()))?,
            None => io::stdout().write_all(c.as_bytes())?,
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{0:}: {1:#}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}
