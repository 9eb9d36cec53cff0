//! This module defines `State`, a named node of the control graph that maps each
//! readable symbol to the transition taken when that symbol is under the head.

use crate::types::{Symbol, Transition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// What a state does with the symbol under the head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation<'a> {
    /// A rule matches: write, move, and continue in the rule's destination.
    Continue(&'a Transition),
    /// No rule matches. The symbol is left as is, the head does not move and the
    /// run halts without accepting.
    Reject,
}

/// A named state holding at most one transition per read symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    name: String,
    accepting: bool,
    rules: HashMap<Symbol, Transition>,
}

impl State {
    /// Creates a non-accepting state with no rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepting: false,
            rules: HashMap::new(),
        }
    }

    /// Creates an accepting state with no rules.
    pub fn accepting(name: impl Into<String>) -> Self {
        Self {
            accepting: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    /// A state halts the machine exactly when it is accepting.
    pub fn halts(&self) -> bool {
        self.accepting
    }

    /// Inserts the rule for `rule.read()`.
    ///
    /// A second rule for the same read symbol replaces the first (last write wins).
    pub fn add_rule(&mut self, rule: Transition) {
        if let Some(previous) = self.rules.insert(rule.read().clone(), rule) {
            tracing::debug!(state = %self.name, rule = %previous, "rule overwritten");
        }
    }

    /// Inserts every rule in order, as repeated `add_rule` calls.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Transition>) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    /// Builder form of `add_rules`.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Transition>) -> Self {
        self.add_rules(rules);
        self
    }

    /// Looks up the rule for `symbol`.
    pub fn evaluate(&self, symbol: &Symbol) -> Evaluation<'_> {
        match self.rules.get(symbol) {
            Some(rule) => Evaluation::Continue(rule),
            None => Evaluation::Reject,
        }
    }

    /// Returns the rules sorted by read symbol.
    pub fn rules(&self) -> Vec<&Transition> {
        let mut rules: Vec<&Transition> = self.rules.values().collect();
        rules.sort_by(|a, b| a.read().cmp(b.read()));
        rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State {} with rules: ", self.name)?;
        for rule in self.rules() {
            write!(f, "{rule} : ")?;
        }
        Ok(())
    }
}
