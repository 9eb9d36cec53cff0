//! This module provides the parser for machine definitions, utilizing the `pest` crate.
//! It defines the grammar for `.tm` files and functions to parse the input into a `Program`.

use crate::{
    analyzer::analyze,
    machine::Program,
    state::State,
    types::{Direction, Symbol, Transition, TuringMachineError, MAX_PROGRAM_SIZE},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the machine grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Program`.
///
/// The first state block is the start state unless a `start:` section names another
/// one. States listed under `accept:` are accepting; those without a block of their
/// own are added with no rules. The parsed program is validated before being returned.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::ValidationError)` if the program fails validation.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::ValidationError(format!(
            "Program is {} bytes, the limit is {}",
            input.len(),
            MAX_PROGRAM_SIZE
        )));
    }

    let input = input.trim();
    let root = MachineParser::parse(Rule::program, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty program".to_string()))?;

    let program = parse_program(root)?;

    analyze(&program)?;

    Ok(program)
}

/// Parses the top-level sections of a program.
fn parse_program(pair: Pair<Rule>) -> Result<Program, TuringMachineError> {
    let mut name: Option<String> = None;
    let mut start: Option<String> = None;
    let mut accept: Vec<String> = Vec::new();
    let mut states: Option<Vec<State>> = None;
    let mut seen = HashSet::new();
    let eoi = pair.as_span().end_pos();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_string(p)?.trim().to_string()),
            Rule::start => start = Some(parse_inner_string(p)?),
            Rule::accept => {
                accept = p
                    .into_inner()
                    .map(|state| state.as_str().to_string())
                    .collect()
            }
            Rule::rules => states = Some(parse_blocks(p)?),
            _ => {} // EOI
        }
    }

    let name = check_required_rule(name, "name", eoi)?;
    let mut states = check_required_rule(states, "rules", eoi)?;

    for accepting in accept {
        match states.iter_mut().find(|state| state.name() == accepting) {
            Some(state) => state.set_accepting(true),
            None => states.push(State::accepting(accepting)),
        }
    }

    let start = match start {
        Some(start) => start,
        None => states
            .first()
            .map(|state| state.name().to_string())
            .ok_or_else(|| parse_error("No states defined under \"rules:\"", eoi.span(&eoi)))?,
    };

    Ok(Program {
        name,
        start,
        states,
    })
}

/// Parses the state blocks of the `rules:` section, in declaration order.
fn parse_blocks(pair: Pair<Rule>) -> Result<Vec<State>, TuringMachineError> {
    let mut states: Vec<State> = Vec::new();

    for block in pair.into_inner() {
        let span = block.as_span();
        let mut pairs = block.into_inner();
        let mut state = State::new(parse_string(&mut pairs, span)?);

        // Prevent a second block for the same state
        if states.iter().any(|s| s.name() == state.name()) {
            return Err(parse_error(
                &format!("Duplicate state block: {}", state.name()),
                span,
            ));
        }

        for action in pairs {
            state.add_rule(parse_action(action)?);
        }

        states.push(state);
    }

    Ok(states)
}

/// Parses a single action: `read -> write, direction, next`.
///
/// If `write` is omitted the read symbol is written back.
fn parse_action(pair: Pair<Rule>) -> Result<Transition, TuringMachineError> {
    let span = pair.as_span();
    let pairs: Vec<Pair<Rule>> = pair.into_inner().collect();

    let (read, write, direction, next) = match pairs.as_slice() {
        [read, direction, next] => (read, read, direction, next),
        [read, write, direction, next] => (read, write, direction, next),
        _ => return Err(parse_error("Malformed action", span)),
    };

    Ok(Transition::new(
        parse_symbol(read.as_str()),
        parse_symbol(write.as_str()),
        parse_direction(direction)?,
        next.as_str(),
    ))
}

/// Parses a single direction, keeping the span of an unsupported token.
fn parse_direction(pair: &Pair<Rule>) -> Result<Direction, TuringMachineError> {
    pair.as_str().parse::<Direction>().map_err(|_| {
        parse_error(
            &format!("Unsupported direction: {}", pair.as_str()),
            pair.as_span(),
        )
    })
}

/// Parses a symbol, handling quoted and unquoted forms. `_` is the blank.
fn parse_symbol(input: &str) -> Symbol {
    Symbol::from(input.trim_matches('\''))
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> Result<String, TuringMachineError> {
    let span = pair.as_span();
    parse_string(&mut pair.into_inner(), span)
}

/// Extracts the string content from the current `Pair` in a `Pairs` iterator.
fn parse_string(pairs: &mut Pairs<Rule>, span: Span) -> Result<String, TuringMachineError> {
    pairs
        .next()
        .map(|pair| pair.as_str().to_string())
        .ok_or_else(|| parse_error("Expected a value", span))
}

/// Checks if a given section has already been declared.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), TuringMachineError> {
    if !matches!(rule, Rule::name | Rule::start | Rule::accept | Rule::rules) {
        return Ok(());
    };

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks that a mandatory section was declared.
fn check_required_rule<T>(
    value: Option<T>,
    name: &str,
    eoi: Position,
) -> Result<T, TuringMachineError> {
    value.ok_or_else(|| parse_error(&format!("Missing \"{name}:\" declaration"), eoi.span(&eoi)))
}
