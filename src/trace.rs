//! Rendering of instantaneous configurations for step-by-step traces.
//!
//! A configuration is written the way it is on the blackboard: the tape contents with
//! the current state's name inserted right before the symbol under the head, so
//! `1q_0010` means the tape holds `1010`, the head is on cell 1 and the machine is in
//! `q_0`.

use crate::types::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a trace line is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    /// Blanks as `_`, no decoration.
    Plain,
    /// Blanks as `\textvisiblespace`, each line wrapped as `$...$\\`.
    #[default]
    Latex,
}

/// An instantaneous description of a running machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: String,
    pub cells: Vec<Symbol>,
    pub head: usize,
}

impl Configuration {
    pub fn render(&self, format: TraceFormat) -> String {
        match format {
            TraceFormat::Plain => self.layout(Symbol::to_string),
            TraceFormat::Latex => format!("${}$\\\\", self.layout(Symbol::latex)),
        }
    }

    fn layout(&self, glyph: impl Fn(&Symbol) -> String) -> String {
        let mut line = String::new();
        for (i, symbol) in self.cells.iter().enumerate() {
            if i == self.head {
                line.push_str(&self.state);
            }
            line.push_str(&glyph(symbol));
        }
        // A head past the last cell only happens on an untouched empty tape.
        if self.head >= self.cells.len() {
            line.push_str(&self.state);
        }
        line
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TraceFormat::Plain))
    }
}

/// Renders tape contents with blanks as `_`.
pub fn render_tape(cells: &[Symbol]) -> String {
    cells.iter().map(Symbol::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tape: &str, head: usize) -> Configuration {
        Configuration {
            state: "q_0".to_string(),
            cells: Symbol::word(tape),
            head,
        }
    }

    #[test]
    fn test_state_inserted_before_head() {
        assert_eq!(config("0110", 0).render(TraceFormat::Plain), "q_00110");
        assert_eq!(config("0110", 2).render(TraceFormat::Plain), "01q_010");
    }

    #[test]
    fn test_latex_rendering() {
        assert_eq!(
            config("10_", 2).render(TraceFormat::Latex),
            "$10q_0\\textvisiblespace$\\\\"
        );
    }

    #[test]
    fn test_empty_tape_shows_state_only() {
        assert_eq!(config("", 0).render(TraceFormat::Plain), "q_0");
    }

    #[test]
    fn test_display_is_plain() {
        assert_eq!(config("1_", 1).to_string(), "1q_0_");
    }

    #[test]
    fn test_render_tape() {
        assert_eq!(render_tape(&Symbol::word("10_")), "10_");
        assert_eq!(render_tape(&[]), "");
    }
}
