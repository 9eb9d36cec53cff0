//! Machines bundled with the simulator.

use crate::machine::Program;
use crate::parser::parse;
use crate::state::State;
use crate::types::{Direction, Transition, TuringMachineError};

// Embedded machine definitions
const PROGRAM_TEXTS: [&str; 2] = [
    include_str!("../machines/bit-flip.tm"),
    include_str!("../machines/zero-one.tm"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = PROGRAM_TEXTS
        .iter()
        .filter_map(|text| match parse(text) {
            Ok(program) => Some(program),
            Err(e) => {
                tracing::error!(error = %e, "failed to parse bundled program");
                None
            }
        })
        .collect();
}

/// The bit-flip transducer: `q_0` turns every `0` into `1` and every `1` into `0` while
/// moving right, then steps back left off the first blank into the accepting `q_H`.
pub fn bit_flip() -> Program {
    Program::new("bit-flip", "q_0")
        .with_state(State::new("q_0").with_rules([
            Transition::new('0', '1', Direction::Right, "q_0"),
            Transition::new('1', '0', Direction::Right, "q_0"),
            Transition::new('_', '_', Direction::Left, "q_H"),
        ]))
        .with_state(State::accepting("q_H"))
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|program| program.name.clone())
            .collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = PROGRAMS.get(index).ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Program index {} out of range", index))
        })?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            start: program.start.clone(),
            accepting: program
                .accepting_states()
                .into_iter()
                .map(str::to_string)
                .collect(),
            state_count: program.states.len(),
            transition_count: program.transition_count(),
        })
    }

    /// Get the original text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS.get(index).copied().ok_or_else(|| {
            TuringMachineError::ValidationError(format!(
                "Program text index {} out of range",
                index
            ))
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub start: String,
    pub accepting: Vec<String>,
    pub state_count: usize,
    pub transition_count: usize,
}
