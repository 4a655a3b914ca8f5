extern crate clap;

use std::{
    io::{self, BufReader, Write},
    process::ExitCode,
    time::Instant,
};

use bfvm::{
    lexer::{lexer::Lexer, LexerTokenKind},
    machine::io::{ByteInput, DecimalInput, EofPolicy, InputSource},
    Exit, Fault, Machine, HELLO_WORLD, MIN_TAPE_SIZE,
};
use clap::{arg, command, Parser, ValueEnum};
use colored::Colorize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Tape machine for the eight instruction brainf**k language
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to run, the built-in hello world when omitted
    #[arg()]
    file: Option<String>,

    #[arg(short, long, default_value_t = MIN_TAPE_SIZE)]
    tape_size: usize,

    /// Cell the program is written to
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    load_address: isize,

    /// Cell execution starts at, defaults to the load address
    #[arg(short, long, allow_negative_numbers = true)]
    start_address: Option<isize>,

    #[arg(short, long, value_enum, default_value_t = InputMode::Bytes)]
    input_mode: InputMode,

    #[arg(short, long, value_enum, default_value_t = Eof::Zero)]
    eof: Eof,

    /// Give up after this many instructions
    #[arg(short, long)]
    max_steps: Option<u64>,

    /// Print the registers and tape to stderr once the run ends
    #[arg(short, long)]
    dump: bool,

    /// Print the lexed program and exit
    #[arg(long)]
    tokens: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    /// Every byte of stdin is one value
    Bytes,
    /// Whitespace separated integers, clamped to a byte
    Decimal,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Eof {
    Zero,
    Unchanged,
    Fault,
}

impl From<Eof> for EofPolicy {
    fn from(eof: Eof) -> Self {
        match eof {
            Eof::Zero => EofPolicy::Zero,
            Eof::Unchanged => EofPolicy::Unchanged,
            Eof::Fault => EofPolicy::Fault,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Can't read {path:}: {source:}")]
    FileIO { path: String, source: io::Error },

    #[error("Can't write output: {0}")]
    Output(io::Error),

    #[error("{0}")]
    Fault(#[from] Fault),

    #[error("Gave up after {0} steps")]
    StepLimit(u64),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{0:}: {1:}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let source = match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::FileIO {
            path: path.clone(),
            source,
        })?,
        None => HELLO_WORLD.to_string(),
    };

    if args.tokens {
        print_tokens(&mut io::stdout().lock(), &source).map_err(CliError::Output)?;
        return Ok(());
    }

    let stdin = io::stdin();
    match args.input_mode {
        InputMode::Bytes => execute(args, &source, ByteInput::new(stdin)),
        InputMode::Decimal => execute(args, &source, DecimalInput::new(BufReader::new(stdin))),
    }
}

fn execute<I: InputSource>(args: &Args, source: &str, input: I) -> Result<(), CliError> {
    let mut machine = Machine::with_io(args.tape_size, input, io::stdout())
        .with_eof_policy(args.eof.into());
    info!(size = machine.size(), "allocated tape");

    let diagnostics = machine.load(source, args.load_address)?;
    if !diagnostics.is_empty() {
        // the text itself is logged by the machine at debug
        info!(skipped = diagnostics.len(), "ignored non-operation text");
    }

    let start_address = args.start_address.unwrap_or(args.load_address);
    eprintln!("{}", "Starting run".blue());
    let now = Instant::now();
    let result = match args.max_steps {
        Some(max_steps) => machine.run_bounded(start_address, max_steps),
        None => machine.run(start_address).map(|_| Exit::Halted),
    };
    eprintln!();
    eprintln!(
        "{} {} steps in {:.2?}",
        "Finished run with".green(),
        machine.steps(),
        now.elapsed()
    );

    if args.dump {
        eprint!("{}", machine.dump());
    }

    match result? {
        Exit::Halted => Ok(()),
        Exit::StepLimit => Err(CliError::StepLimit(machine.steps())),
    }
}

fn print_tokens(out: &mut impl Write, source: &str) -> io::Result<()> {
    for token in Lexer::new(source).collect() {
        match token {
            LexerTokenKind::Op(op) => write!(out, "{}", op.symbol())?,
            LexerTokenKind::Comment(c) => writeln!(out, "\t\t{}", c.dimmed())?,
            LexerTokenKind::EOF => break,
        }
    }
    writeln!(out)
}
