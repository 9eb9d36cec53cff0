//! This crate provides the core logic for a single-tape deterministic Turing machine
//! simulator in the style of an introductory theory-of-computation course.
//! It includes modules for defining and validating machines, parsing machine
//! definitions, running them with optional step-by-step traces, and a small set of
//! bundled machines.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod state;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the machine, its definition and per-run types from the machine module.
pub use machine::{Program, Run, RunOptions, RunReport, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the bundled programs.
pub use programs::{bit_flip, ProgramInfo, ProgramManager, PROGRAMS};
pub use state::{Evaluation, State};
pub use tape::Tape;
pub use trace::{render_tape, Configuration, TraceFormat};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, Halt, Step, Symbol, Transition, TuringMachineError, Verdict, BLANK_GLYPH,
    LATEX_BLANK, MAX_PROGRAM_SIZE,
};
