//! This module defines the `TuringMachine` struct, an immutable, validated machine
//! definition, and `Run`, the per-invocation context that owns the tape, the head and
//! the current state. A machine can drive any number of runs, including concurrent
//! ones, because nothing run-local is ever stored on it.

use crate::analyzer::analyze;
use crate::state::{Evaluation, State};
use crate::tape::Tape;
use crate::trace::Configuration;
use crate::types::{Halt, Step, Symbol, TuringMachineError, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A machine definition: a set of states and the name of the start state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The name of the machine.
    pub name: String,
    /// The state every run begins in.
    pub start: String,
    /// All states, in declaration order.
    pub states: Vec<State>,
}

impl Program {
    pub fn new(name: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: start.into(),
            states: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Finds a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|state| state.name() == name)
    }

    /// Names of the accepting states, in declaration order.
    pub fn accepting_states(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|state| state.is_accepting())
            .map(State::name)
            .collect()
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(State::rule_count).sum()
    }
}

/// Options for a single run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Maximum number of transitions to apply. `None` runs until the machine halts,
    /// which for a non-halting machine is forever.
    pub max_steps: Option<usize>,
}

/// The result of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub verdict: Verdict,
    /// The state the run ended in (the rejecting state on rejection).
    pub state: String,
    pub tape: Vec<Symbol>,
    pub head: usize,
    /// Number of transitions applied.
    pub steps: usize,
    /// Configurations observed during the run, when tracing was requested.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trace: Vec<Configuration>,
}

impl RunReport {
    /// Returns `true` iff the run ended in an accepting state.
    pub fn accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// A validated single-tape deterministic Turing machine.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    program: Program,
    index: HashMap<String, usize>,
    start: usize,
}

impl TuringMachine {
    /// Creates a machine from a program, rejecting malformed definitions
    /// (missing start state, duplicate states, rules leading to unknown states).
    pub fn new(program: Program) -> Result<Self, TuringMachineError> {
        analyze(&program)?;

        let index: HashMap<String, usize> = program
            .states
            .iter()
            .enumerate()
            .map(|(i, state)| (state.name().to_string(), i))
            .collect();

        let start = *index
            .get(&program.start)
            .ok_or_else(|| TuringMachineError::InvalidState(program.start.clone()))?;

        Ok(Self {
            program,
            index,
            start,
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn name(&self) -> &str {
        &self.program.name
    }

    /// Returns the start state.
    pub fn initial_state(&self) -> &State {
        &self.program.states[self.start]
    }

    /// Begins a fresh run over `input` with the head on the first cell.
    pub fn start(&self, input: &[Symbol]) -> Run<'_> {
        Run {
            machine: self,
            current: self.start,
            tape: Tape::new(input),
            steps: 0,
        }
    }

    /// Runs the machine on `input` until it halts.
    ///
    /// With `trace` set, every configuration the machine passes through is collected
    /// into the report. A machine that never halts never returns.
    pub fn run(&self, input: &[Symbol], trace: bool) -> Result<RunReport, TuringMachineError> {
        let mut configurations = Vec::new();
        let mut report = self.start(input).run_with(&RunOptions::default(), |config| {
            if trace {
                configurations.push(config.clone());
            }
        })?;
        report.trace = configurations;
        Ok(report)
    }

    /// Returns whether the machine accepts `input`.
    pub fn accepts(&self, input: &[Symbol]) -> Result<bool, TuringMachineError> {
        self.run(input, false).map(|report| report.accepted())
    }

    fn state_at(&self, id: usize) -> &State {
        &self.program.states[id]
    }
}

/// The mutable context of one run: current state, tape and head.
#[derive(Debug, Clone)]
pub struct Run<'m> {
    machine: &'m TuringMachine,
    current: usize,
    tape: Tape,
    steps: usize,
}

impl<'m> Run<'m> {
    /// Executes a single step: read the symbol under the head, look up the current
    /// state's rule, write, move and transition.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Halt::Accept)` if the current state is accepting. Nothing is mutated.
    /// * `Step::Halt(Halt::Reject)` if no rule matches. Nothing is mutated.
    /// * `Step::Halt(Halt::Err(_))` if the rule leads to an unknown state.
    pub fn step(&mut self) -> Step {
        let state = self.state();
        if state.halts() {
            return Step::Halt(Halt::Accept);
        }

        let rule = match state.evaluate(self.tape.read()) {
            Evaluation::Continue(rule) => rule,
            Evaluation::Reject => return Step::Halt(Halt::Reject),
        };

        let next = match self.machine.index.get(rule.next()) {
            Some(&next) => next,
            None => {
                return Step::Halt(Halt::Err(TuringMachineError::InvalidState(
                    rule.next().to_string(),
                )))
            }
        };

        tracing::trace!(
            state = state.name(),
            rule = %rule,
            next = rule.next(),
            head = self.tape.head(),
            "step"
        );

        self.tape.write(rule.write().clone());
        self.tape.shift(rule.direction());
        self.current = next;
        self.steps += 1;

        Step::Continue
    }

    /// Runs until the machine halts or the step cap in `options` is reached.
    ///
    /// `observe` sees the configuration before every step, and once more for the
    /// final configuration when the machine accepts.
    pub fn run_with(
        mut self,
        options: &RunOptions,
        mut observe: impl FnMut(&Configuration),
    ) -> Result<RunReport, TuringMachineError> {
        tracing::debug!(
            machine = self.machine.name(),
            input = %self.tape,
            "run started"
        );

        let verdict = loop {
            if let Some(limit) = options.max_steps {
                if self.steps >= limit && !self.state().halts() {
                    break Verdict::Undecided;
                }
            }

            observe(&self.configuration());

            match self.step() {
                Step::Continue => continue,
                Step::Halt(Halt::Accept) => break Verdict::Accepted,
                Step::Halt(Halt::Reject) => break Verdict::Rejected,
                Step::Halt(Halt::Err(e)) => return Err(e),
            }
        };

        tracing::debug!(
            machine = self.machine.name(),
            ?verdict,
            steps = self.steps,
            state = self.state().name(),
            "run halted"
        );

        Ok(self.into_report(verdict))
    }

    /// Returns the current state.
    pub fn state(&self) -> &'m State {
        self.machine.state_at(self.current)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Snapshot of the current configuration.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            state: self.state().name().to_string(),
            cells: self.tape.cells().to_vec(),
            head: self.tape.head(),
        }
    }

    fn into_report(self, verdict: Verdict) -> RunReport {
        RunReport {
            verdict,
            state: self.state().name().to_string(),
            head: self.tape.head(),
            steps: self.steps,
            tape: self.tape.into_cells(),
            trace: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::bit_flip;
    use crate::trace::TraceFormat;
    use crate::types::{Direction, Transition};
    use proptest::prelude::*;

    fn word(input: &str) -> Vec<Symbol> {
        Symbol::word(input)
    }

    fn bit_flip_machine() -> TuringMachine {
        TuringMachine::new(bit_flip()).unwrap()
    }

    /// Moves right over `a`s and accepts on the first blank; has no rule for `b`.
    fn scan_program() -> Program {
        Program::new("scan", "q_0")
            .with_state(State::new("q_0").with_rules([
                Transition::new('a', 'a', Direction::Right, "q_0"),
                Transition::new('_', '_', Direction::Right, "q_acc"),
            ]))
            .with_state(State::accepting("q_acc"))
    }

    fn loop_program() -> Program {
        Program::new("loop", "q_0").with_state(
            State::new("q_0").with_rules([
                Transition::new('_', '_', Direction::Right, "q_0"),
                Transition::new('a', 'a', Direction::Right, "q_0"),
            ]),
        )
    }

    #[test]
    fn test_bit_flip_concrete_scenario() {
        let machine = bit_flip_machine();
        let report = machine.run(&word("0110"), false).unwrap();

        assert!(report.accepted());
        assert_eq!(report.tape, word("1001_"));
        assert_eq!(report.head, 3);
        assert_eq!(report.state, "q_H");
        assert_eq!(report.steps, 5);
        assert!(report.trace.is_empty());
    }

    #[test]
    fn test_bit_flip_trace() {
        let machine = bit_flip_machine();
        let report = machine.run(&word("01"), true).unwrap();

        let lines: Vec<String> = report
            .trace
            .iter()
            .map(|config| config.render(TraceFormat::Plain))
            .collect();

        assert_eq!(lines, vec!["q_001", "1q_01", "10q_0_", "1q_H0_"]);
    }

    #[test]
    fn test_empty_input() {
        let machine = bit_flip_machine();
        let report = machine.run(&[], true).unwrap();

        assert!(report.accepted());
        assert_eq!(report.tape, vec![Symbol::Blank]);
        assert_eq!(report.head, 0);
        assert_eq!(report.trace[0].render(TraceFormat::Plain), "q_0");
    }

    #[test]
    fn test_immediate_rejection_leaves_empty_tape_untouched() {
        let machine = TuringMachine::new(
            Program::new("stuck", "q_0").with_state(State::new("q_0")),
        )
        .unwrap();
        let report = machine.run(&[], false).unwrap();

        assert_eq!(report.verdict, Verdict::Rejected);
        assert!(report.tape.is_empty());
        assert_eq!(report.steps, 0);
    }

    #[test]
    fn test_rejection_keeps_tape_as_last_written() {
        let machine = TuringMachine::new(scan_program()).unwrap();
        let report = machine.run(&word("aab"), true).unwrap();

        assert_eq!(report.verdict, Verdict::Rejected);
        assert!(!report.accepted());
        assert_eq!(report.tape, word("aab"));
        assert_eq!(report.head, 2);
        assert_eq!(report.state, "q_0");
        // No trailing configuration after a rejection.
        assert_eq!(report.trace.len(), 3);
    }

    #[test]
    fn test_blank_can_be_rewritten() {
        let program = Program::new("fill", "q_0")
            .with_state(State::new("q_0").with_rules([
                Transition::new('_', 'x', Direction::Left, "q_1"),
                Transition::new('a', 'a', Direction::Right, "q_0"),
            ]))
            .with_state(State::accepting("q_1"));
        let machine = TuringMachine::new(program).unwrap();

        let report = machine.run(&word("a"), false).unwrap();
        assert_eq!(report.tape, word("ax"));
        assert_eq!(report.head, 0);
    }

    #[test]
    fn test_step_on_accepting_state_does_not_mutate() {
        let program = Program::new("done", "q_H").with_state(State::accepting("q_H"));
        let machine = TuringMachine::new(program).unwrap();
        let mut run = machine.start(&word("1"));

        assert_eq!(run.step(), Step::Halt(Halt::Accept));
        assert_eq!(run.tape().cells(), &word("1")[..]);
        assert_eq!(run.step_count(), 0);
    }

    #[test]
    fn test_single_steps() {
        let machine = bit_flip_machine();
        let mut run = machine.start(&word("1"));

        assert_eq!(run.step(), Step::Continue);
        assert_eq!(run.tape().cells(), &word("0_")[..]);
        assert_eq!(run.tape().head(), 1);
        assert_eq!(run.state().name(), "q_0");

        assert_eq!(run.step(), Step::Continue);
        assert_eq!(run.tape().head(), 0);
        assert_eq!(run.state().name(), "q_H");

        assert_eq!(run.step(), Step::Halt(Halt::Accept));
        assert_eq!(run.step_count(), 2);
    }

    #[test]
    fn test_step_cap_reports_undecided() {
        let machine = TuringMachine::new(loop_program()).unwrap();
        let options = RunOptions {
            max_steps: Some(10),
        };

        let report = machine
            .start(&word("aa"))
            .run_with(&options, |_| {})
            .unwrap();

        assert_eq!(report.verdict, Verdict::Undecided);
        assert_eq!(report.steps, 10);
        assert_eq!(report.tape.len(), 11);
    }

    #[test]
    fn test_step_cap_does_not_hide_acceptance() {
        let machine = bit_flip_machine();
        let options = RunOptions {
            max_steps: Some(3),
        };

        // "01" needs exactly three transitions.
        let report = machine.start(&word("01")).run_with(&options, |_| {}).unwrap();
        assert_eq!(report.verdict, Verdict::Accepted);

        let report = machine.start(&word("011")).run_with(&options, |_| {}).unwrap();
        assert_eq!(report.verdict, Verdict::Undecided);
    }

    #[test]
    fn test_invalid_program_is_rejected_at_construction() {
        let program = Program::new("dangling", "q_0").with_state(
            State::new("q_0").with_rules([Transition::new('a', 'a', Direction::Right, "q_9")]),
        );

        assert!(matches!(
            TuringMachine::new(program),
            Err(TuringMachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_concurrent_runs_share_one_machine() {
        let machine = bit_flip_machine();
        let inputs = ["0", "01", "0110", "111000"];

        let results: Vec<RunReport> = std::thread::scope(|s| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|input| {
                    let machine = &machine;
                    s.spawn(move || machine.run(&word(input), false).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (input, report) in inputs.iter().zip(results) {
            assert_eq!(report, machine.run(&word(input), false).unwrap());
        }
    }

    #[test]
    fn test_report_serialization() {
        let machine = bit_flip_machine();
        let report = machine.run(&word("1"), false).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "accepted");
        assert_eq!(json["tape"], serde_json::json!(["0", "_"]));
        assert!(json.get("trace").is_none());
    }

    fn bits() -> impl Strategy<Value = String> {
        "[01]{0,24}"
    }

    proptest! {
        #[test]
        fn prop_bit_flip_inverts_every_bit(input in bits()) {
            let machine = bit_flip_machine();
            let report = machine.run(&word(&input), false).unwrap();

            let flipped: String = input
                .chars()
                .map(|c| if c == '0' { '1' } else { '0' })
                .collect();

            prop_assert!(report.accepted());
            prop_assert_eq!(report.tape, word(&format!("{flipped}_")));
            prop_assert_eq!(report.head, input.len().saturating_sub(1));
        }

        #[test]
        fn prop_runs_are_deterministic_and_reset(input in bits()) {
            let machine = bit_flip_machine();

            let first = machine.run(&word(&input), true).unwrap();
            let second = machine.run(&word(&input), true).unwrap();
            let fresh = bit_flip_machine().run(&word(&input), true).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &fresh);
        }
    }
}
