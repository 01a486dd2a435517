//! Bracket matching over a [`TokenSequence`].
use std::fmt::{self, Display};

use super::{
    error::Reason,
    sequence::{Element, TokenSequence},
};

/// The direction of a walk over a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// The bracket left without a partner when a walk in this direction runs off the sequence.
    pub fn unmatched(&self) -> char {
        match self {
            Direction::Backward => ')',
            Direction::Forward => '(',
        }
    }

    /// The next index in this direction, if there is one.
    fn step(&self, index: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Backward => index.checked_sub(1),
            Direction::Forward => Some(index + 1).filter(|&next| next < len),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Direction::Backward => "backward",
            Direction::Forward => "forward",
        })
    }
}

/// Tracks bracket nesting during a walk in one direction.
///
/// Brackets that open towards the walking direction increase the depth, the others decrease it.
/// Nodes never change the depth.
#[derive(Debug, Clone, Copy)]
pub struct BracketScanner {
    direction: Direction,
    depth: isize,
}

impl BracketScanner {
    /// A scanner starting outside of any bracket.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            depth: 0,
        }
    }

    /// A scanner starting on a bracket it still has to find the partner of.
    pub fn entered(direction: Direction) -> Self {
        Self {
            direction,
            depth: 1,
        }
    }

    pub fn visit(&mut self, element: &Element) {
        let (deeper, shallower) = match self.direction {
            Direction::Backward => (element.is_closing_bracket(), element.is_opening_bracket()),
            Direction::Forward => (element.is_opening_bracket(), element.is_closing_bracket()),
        };
        if deeper {
            self.depth += 1;
        } else if shallower {
            self.depth -= 1;
        }
    }

    pub fn depth(&self) -> isize {
        self.depth
    }

    pub fn is_neutral(&self) -> bool {
        self.depth == 0
    }
}

/// Starting on the bracket at `start`, walks in `direction` until the bracket depth returns to
/// zero, and returns the index of the matching bracket.
pub fn scan_to_zero(
    sequence: &TokenSequence,
    start: usize,
    direction: Direction,
) -> Result<usize, Reason> {
    sequence.get(start)?;

    let mut scanner = BracketScanner::entered(direction);
    let mut index = start;
    loop {
        index = direction
            .step(index, sequence.len())
            .ok_or_else(|| unmatched(sequence, start, direction))?;
        scanner.visit(sequence.get(index)?);
        if scanner.is_neutral() {
            return Ok(index);
        }
    }
}

/// Reports the bracket at `index` as having no partner in `direction`.
pub fn unmatched(sequence: &TokenSequence, index: usize, direction: Direction) -> Reason {
    Reason::UnmatchedBracket {
        index,
        direction,
        snippet: sequence.snippet(index),
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::syntax_tree::Expr;

    use super::*;

    #[test]
    fn finds_matching_bracket_forward() {
        let sequence = TokenSequence::from_text("(a(b)c)+d");
        assert_eq!(scan_to_zero(&sequence, 0, Direction::Forward), Ok(6));
        assert_eq!(scan_to_zero(&sequence, 2, Direction::Forward), Ok(4));
    }

    #[test]
    fn finds_matching_bracket_backward() {
        let sequence = TokenSequence::from_text("d+(a(b)c)");
        assert_eq!(scan_to_zero(&sequence, 8, Direction::Backward), Ok(2));
        assert_eq!(scan_to_zero(&sequence, 6, Direction::Backward), Ok(4));
    }

    #[test]
    fn alternate_glyphs_count_as_brackets() {
        let sequence = TokenSequence::from_text("«a)");
        assert_eq!(scan_to_zero(&sequence, 0, Direction::Forward), Ok(2));

        let sequence = TokenSequence::from_text("(a»");
        assert_eq!(scan_to_zero(&sequence, 2, Direction::Backward), Ok(0));
    }

    #[test]
    fn running_off_the_end_is_unmatched() {
        let sequence = TokenSequence::from_text("(2+3*4");
        assert_eq!(
            scan_to_zero(&sequence, 0, Direction::Forward),
            Err(Reason::UnmatchedBracket {
                index: 0,
                direction: Direction::Forward,
                snippet: "(2".to_owned(),
            })
        );

        let sequence = TokenSequence::from_text("2+3)");
        assert_eq!(
            scan_to_zero(&sequence, 3, Direction::Backward),
            Err(Reason::UnmatchedBracket {
                index: 3,
                direction: Direction::Backward,
                snippet: "3)".to_owned(),
            })
        );
    }

    #[test]
    fn nodes_are_opaque() {
        let mut sequence = TokenSequence::from_text("(x)");
        sequence
            .overwrite(1, Element::Node(Expr::operand(")")))
            .unwrap();
        assert_eq!(scan_to_zero(&sequence, 0, Direction::Forward), Ok(2));
    }

    #[test]
    fn start_out_of_range_is_an_invalid_index() {
        let sequence = TokenSequence::from_text("()");
        assert_eq!(
            scan_to_zero(&sequence, 5, Direction::Forward),
            Err(Reason::InvalidIndex { index: 5, len: 2 })
        );
    }

    #[test]
    fn scanner_depth_follows_direction() {
        let mut scanner = BracketScanner::new(Direction::Backward);
        scanner.visit(&Element::Char(')'));
        assert_eq!(scanner.depth(), 1);
        scanner.visit(&Element::Char('('));
        assert!(scanner.is_neutral());

        let mut scanner = BracketScanner::new(Direction::Forward);
        scanner.visit(&Element::Char(')'));
        assert_eq!(scanner.depth(), -1);
    }
}
