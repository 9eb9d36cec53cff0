//! This module defines the core data structures and types used throughout the simulator,
//! including tape symbols, head movement, transition rules, step outcomes and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// The glyph used for the blank symbol in every textual tape rendering and in program input.
pub const BLANK_GLYPH: char = '_';
/// The typesetting escape used for the blank symbol in LaTeX traces.
pub const LATEX_BLANK: &str = "\\textvisiblespace";
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// A single tape symbol.
///
/// The alphabet is unrestricted: any string is a valid mark. `Blank` is the reserved
/// sentinel for unwritten cells and can never collide with an input mark, since the
/// input glyph `_` is always read as `Blank`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Symbol {
    /// An unwritten cell.
    Blank,
    /// Any other symbol.
    Mark(String),
}

impl Symbol {
    /// Returns `true` if this is the blank symbol.
    pub fn is_blank(&self) -> bool {
        matches!(self, Symbol::Blank)
    }

    /// Renders the symbol for a LaTeX trace.
    pub fn latex(&self) -> String {
        match self {
            Symbol::Blank => LATEX_BLANK.to_string(),
            Symbol::Mark(mark) => mark.clone(),
        }
    }

    /// Splits a word into one symbol per character.
    pub fn word(input: &str) -> Vec<Symbol> {
        input.chars().map(Symbol::from).collect()
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        if c == BLANK_GLYPH {
            Symbol::Blank
        } else {
            Symbol::Mark(c.to_string())
        }
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        if s.len() == 1 && s.starts_with(BLANK_GLYPH) {
            Symbol::Blank
        } else {
            Symbol::Mark(s.to_string())
        }
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::from(s.as_str())
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Blank => write!(f, "{BLANK_GLYPH}"),
            Symbol::Mark(mark) => f.write_str(mark),
        }
    }
}

/// Represents the possible directions the head can move.
///
/// There is no `Stay`: a rule always moves the head. The "no movement" case only
/// arises when no rule matches, and then the run halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (floored at the first cell).
    Left,
    /// Move the head one position to the right (growing the tape when needed).
    Right,
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Parses `L`/`<` and `R`/`>`. Every other token is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "<" => Ok(Direction::Left),
            "R" | ">" => Ok(Direction::Right),
            other => Err(TuringMachineError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("L"),
            Direction::Right => f.write_str("R"),
        }
    }
}

/// One edge of the control graph: when reading `read`, write `write`, move in
/// `direction` and continue in the state named `next`.
///
/// A transition is immutable once built; its fields are only exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    read: Symbol,
    write: Symbol,
    direction: Direction,
    next: String,
}

impl Transition {
    pub fn new(
        read: impl Into<Symbol>,
        write: impl Into<Symbol>,
        direction: Direction,
        next: impl Into<String>,
    ) -> Self {
        Self {
            read: read.into(),
            write: write.into(),
            direction,
            next: next.into(),
        }
    }

    /// The symbol this rule matches.
    pub fn read(&self) -> &Symbol {
        &self.read
    }

    /// The symbol written over the matched cell.
    pub fn write(&self) -> &Symbol {
        &self.write
    }

    /// The head movement applied after writing.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The name of the destination state.
    pub fn next(&self) -> &str {
        &self.next
    }

    /// Renders the rule as an edge label for a LaTeX trace.
    pub fn latex(&self) -> String {
        format!(
            "{} \\to {}, {}",
            self.read.latex(),
            self.write.latex(),
            self.direction
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}, {}", self.read, self.write, self.direction)
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied and the machine may continue.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

/// Why a machine halted.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The current state is accepting.
    Accept,
    /// No rule matches the current state and symbol (implicit rejection).
    Reject,
    /// The definition is broken, e.g. a rule leads to an unknown state.
    Err(TuringMachineError),
}

/// The outcome of a complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The run ended in an accepting state.
    Accepted,
    /// The run ended because no rule matched.
    Rejected,
    /// The configured step cap was reached before the machine halted.
    Undecided,
}

/// Represents various errors that can occur while defining, loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates a reference to a state that is not part of the machine.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Indicates a movement token outside of {L, R}.
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),
    /// Indicates an error during the parsing of a machine definition.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error during the validation of a machine definition.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
