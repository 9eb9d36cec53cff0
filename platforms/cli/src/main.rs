use clap::{Parser, ValueEnum};
use std::path::Path;
use tmsim::{
    render_tape, Program, ProgramLoader, ProgramManager, RunOptions, Symbol, TraceFormat,
    TuringMachine, TuringMachineError, Verdict,
};
use tracing_subscriber::EnvFilter;

/// Runs a single-tape Turing machine on a word and reports whether it accepts.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tmsim 0110
  tmsim 0110 visualize
  tmsim --program zero-one --format plain 0011 v
  tmsim --program machines/bit-flip.tm --json 101
  tmsim -- -01        (a word starting with '-' goes after '--')")]
struct Cli {
    /// The input word. Each character becomes one tape cell, `_` is the blank.
    /// Put `--` before a word that starts with `-`
    word: String,

    /// Print the configuration before every step when present (any value)
    visualize: Option<String>,

    /// A machine definition file, or the name of a bundled machine
    #[clap(short, long, default_value = "bit-flip")]
    program: String,

    /// Give up after this many steps instead of running until the machine halts
    #[clap(short, long, env = "TMSIM_MAX_STEPS")]
    max_steps: Option<usize>,

    /// How trace lines are rendered
    #[clap(short, long, value_enum, default_value_t = Format::Latex)]
    format: Format,

    /// Print the run report as JSON instead of text
    #[clap(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Plain,
    Latex,
}

impl From<Format> for TraceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Plain => TraceFormat::Plain,
            Format::Latex => TraceFormat::Latex,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let machine = match load_program(&cli.program).and_then(TuringMachine::new) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!(
        machine = machine.name(),
        start = machine.initial_state().name(),
        "machine loaded"
    );

    if let Err(e) = run(&cli, &machine) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Loads a machine from a file when `program` names one, otherwise from the bundled set.
fn load_program(program: &str) -> Result<Program, TuringMachineError> {
    let path = Path::new(program);
    if path.is_file() {
        ProgramLoader::load_program(path)
    } else {
        ProgramManager::get_program_by_name(program)
    }
}

fn run(cli: &Cli, machine: &TuringMachine) -> Result<(), TuringMachineError> {
    let input = Symbol::word(&cli.word);
    let options = RunOptions {
        max_steps: cli.max_steps,
    };
    let visualize = cli.visualize.is_some();
    let format = TraceFormat::from(cli.format);

    if !cli.json {
        println!("input: {}", render_tape(&input));
    }

    let mut trace = Vec::new();
    let mut report = machine.start(&input).run_with(&options, |config| {
        if !visualize {
            return;
        }
        if cli.json {
            trace.push(config.clone());
        } else {
            println!("{}", config.render(format));
        }
    })?;
    report.trace = trace;

    if report.verdict == Verdict::Undecided {
        eprintln!(
            "Machine {} did not halt within {} steps",
            machine.name(),
            report.steps
        );
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| TuringMachineError::ValidationError(e.to_string()))?;
        println!("{json}");
    } else {
        println!("output: {}", render_tape(&report.tape));
        println!("{}", report.accepted());
    }

    Ok(())
}
