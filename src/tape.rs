//! The single tape: a right-growing sequence of symbols and the head position into it.

use crate::types::{Direction, Symbol};
use std::fmt;

static BLANK: Symbol = Symbol::Blank;

/// A tape that is conceptually infinite to the right.
///
/// The head never goes below zero and the tape never shrinks. A right move always
/// leaves a cell under the head: off the last cell it appends one blank, and on an
/// empty tape it materialises both the start cell and the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape holding `input`, with the head on the first cell.
    pub fn new(input: &[Symbol]) -> Self {
        Self {
            cells: input.to_vec(),
            head: 0,
        }
    }

    /// Returns the symbol under the head.
    ///
    /// On an empty tape the head sits one past the end and reads blank without
    /// materialising a cell.
    pub fn read(&self) -> &Symbol {
        self.cells.get(self.head).unwrap_or(&BLANK)
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: Symbol) {
        match self.cells.get_mut(self.head) {
            Some(cell) => *cell = symbol,
            None => self.cells.push(symbol),
        }
    }

    /// Moves the head one cell.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                self.head = self.head.saturating_sub(1);
            }
            Direction::Right => {
                self.head += 1;
                // An empty tape has no cell under the head yet, so it grows by two.
                while self.cells.len() <= self.head {
                    self.cells.push(Symbol::Blank);
                }
            }
        }
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<Symbol> {
        self.cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|symbol| write!(f, "{symbol}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_starts_at_zero() {
        let tape = Tape::new(&Symbol::word("abc"));

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.read(), &Symbol::from('a'));
    }

    #[test]
    fn test_left_at_zero_is_noop() {
        let mut tape = Tape::new(&Symbol::word("ab"));
        tape.shift(Direction::Left);

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_right_at_end_appends_one_blank() {
        let mut tape = Tape::new(&Symbol::word("ab"));
        tape.shift(Direction::Right);
        assert_eq!(tape.len(), 2);

        tape.shift(Direction::Right);
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.read(), &Symbol::Blank);
    }

    #[test]
    fn test_right_inside_tape_does_not_grow() {
        let mut tape = Tape::new(&Symbol::word("abc"));
        tape.shift(Direction::Right);
        tape.shift(Direction::Left);
        tape.shift(Direction::Right);

        assert_eq!(tape.head(), 1);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_empty_tape_reads_blank_without_growing() {
        let tape = Tape::new(&[]);

        assert_eq!(tape.read(), &Symbol::Blank);
        assert!(tape.is_empty());
    }

    #[test]
    fn test_write_on_empty_tape_materialises_cell() {
        let mut tape = Tape::new(&[]);
        tape.write(Symbol::from('x'));

        assert_eq!(tape.cells(), &[Symbol::from('x')]);
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_left_on_empty_tape_is_guarded() {
        let mut tape = Tape::new(&[]);
        tape.shift(Direction::Left);

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), &Symbol::Blank);
    }

    #[test]
    fn test_right_on_empty_tape_keeps_head_inside() {
        let mut tape = Tape::new(&[]);
        tape.shift(Direction::Right);

        assert_eq!(tape.head(), 1);
        assert_eq!(tape.len(), 2);
        assert!(tape.head() < tape.len());
        assert_eq!(tape.cells(), &[Symbol::Blank, Symbol::Blank]);
    }

    #[test]
    fn test_display_renders_blank_glyph() {
        let mut tape = Tape::new(&Symbol::word("01"));
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);

        assert_eq!(tape.to_string(), "01_");
    }
}
