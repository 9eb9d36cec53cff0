//! This module provides functions for analyzing machine definitions before execution.
//! Broken definitions (no states, duplicate names, an unknown start state, rules leading
//! to undeclared states) are rejected; unreachable states are only reported.

use crate::machine::Program;
use crate::types::TuringMachineError;
use std::collections::HashSet;

/// Represents the problems that can be found during the analysis of a machine definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the start state is not one of the declared states.
    InvalidStartState(String),
    /// Indicates that rules reference states that are not declared.
    UndefinedNextStates(Vec<String>),
    /// Indicates that the same state name is declared more than once.
    DuplicateStates(Vec<String>),
    /// Indicates structural problems with the definition.
    StructuralError(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UndefinedNextStates(transitions) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::DuplicateStates(states) => TuringMachineError::ValidationError(
                format!("States declared more than once: {:?}", states),
            ),
            AnalysisError::StructuralError(msg) => TuringMachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a machine definition for structural and logical errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` with the first violated check.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    let first_error = [
        check_structure,
        check_duplicate_states,
        check_valid_start_state,
        check_undefined_next_states,
    ]
    .iter()
    .find_map(|check| check(program).err());

    if let Some(error) = first_error {
        return Err(error.into());
    }

    let unreachable = unreachable_states(program);
    if !unreachable.is_empty() {
        tracing::warn!(
            machine = %program.name,
            states = ?unreachable,
            "unreachable states"
        );
    }

    Ok(())
}

/// Checks that the definition declares at least one state.
fn check_structure(program: &Program) -> Result<(), AnalysisError> {
    if program.states.is_empty() {
        return Err(AnalysisError::StructuralError(
            "No states defined".to_string(),
        ));
    }

    Ok(())
}

/// Checks that no state name is declared twice.
fn check_duplicate_states(program: &Program) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = program
        .states
        .iter()
        .filter(|state| !seen.insert(state.name()))
        .map(|state| state.name().to_string())
        .collect();

    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(AnalysisError::DuplicateStates(duplicates));
    }

    Ok(())
}

/// Checks that the start state is declared.
fn check_valid_start_state(program: &Program) -> Result<(), AnalysisError> {
    if program.state(&program.start).is_none() {
        return Err(AnalysisError::InvalidStartState(program.start.clone()));
    }

    Ok(())
}

/// Checks that every rule's destination is a declared state.
fn check_undefined_next_states(program: &Program) -> Result<(), AnalysisError> {
    let defined_states: HashSet<&str> = program.states.iter().map(|state| state.name()).collect();

    let mut undefined_transitions = Vec::new();
    for state in &program.states {
        for rule in state.rules() {
            if !defined_states.contains(rule.next()) {
                undefined_transitions.push(format!(
                    "{}[{}] -> {}",
                    state.name(),
                    rule.read(),
                    rule.next()
                ));
            }
        }
    }

    if !undefined_transitions.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(undefined_transitions));
    }

    Ok(())
}

/// Returns the declared states that cannot be reached from the start state, sorted by name.
pub fn unreachable_states(program: &Program) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.start.as_str()];

    while let Some(name) = queue.pop() {
        if !visited.insert(name) {
            continue;
        }

        if let Some(state) = program.state(name) {
            for rule in state.rules() {
                if !visited.contains(rule.next()) {
                    queue.push(rule.next());
                }
            }
        }
    }

    let mut unreachable: Vec<String> = program
        .states
        .iter()
        .map(|state| state.name())
        .filter(|name| !visited.contains(name))
        .map(str::to_string)
        .collect();
    unreachable.sort();
    unreachable
}
