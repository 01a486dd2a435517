//! The precedence passes that turn a [`TokenSequence`] into an expression tree.
//!
//! Each pass handles the operators of one rank, loosest first. Whenever an operator of that rank
//! is found at bracket depth zero, both of its operands are wrapped in brackets (synthesised when
//! the input has none), cut out of the sequence and reduced recursively. The operator and its
//! operands are then replaced by a single node.
use std::ops::Range;

use crate::prelude::*;

use super::{
    bracket::{scan_to_zero, unmatched, BracketScanner, Direction},
    error::*,
    normalizer::normalize,
    operator::{Assoc, Operator, Rank},
    sequence::{Element, TokenSequence},
    syntax_tree::{Expr, Term},
};

/// Parses an expression into a tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    reduce(normalize(input)?)
}

/// Runs every precedence pass over a normalized sequence, reducing it to one expression.
pub fn reduce(mut sequence: TokenSequence) -> Result<Expr, ParseError> {
    unwrap_enclosing(&mut sequence).add_stage(Stage::Unwrap)?;

    for rank in Operator::pass_order() {
        Pass::new(&mut sequence, rank).run()?;
    }

    finish(sequence)
}

/// Strips bracket pairs that wrap the entire sequence.
fn unwrap_enclosing(sequence: &mut TokenSequence) -> Result<(), Reason> {
    sequence.trim();
    while sequence.get(0).is_ok_and(Element::is_opening_bracket)
        && scan_to_zero(sequence, 0, Direction::Forward)? == sequence.len() - 1
    {
        let last = sequence.len() - 1;
        sequence.cut(last..last + 1)?;
        sequence.cut(0..1)?;
        sequence.trim();
    }
    Ok(())
}

fn finish(mut sequence: TokenSequence) -> Result<Expr, ParseError> {
    sequence.trim();
    if sequence.is_empty() {
        return failure(Stage::Reduction, Reason::EmptyExpression);
    }

    // Without any node, nothing was reduced and the whole sequence is a single operand.
    if sequence.iter().all(|element| element.as_char().is_some()) {
        return operand(sequence);
    }

    let remaining = sequence.len();
    let mut elements = sequence.into_elements().into_iter();
    match (elements.next(), elements.next()) {
        (Some(Element::Node(expr)), None) => Ok(expr),
        _ => failure(Stage::Reduction, Reason::IncompleteReduction { remaining }),
    }
}

/// Builds an operand with no operator left at bracket depth zero. Every bracket group inside
/// it is reduced on its own, and the text around the groups is kept as written.
fn operand(mut sequence: TokenSequence) -> Result<Expr, ParseError> {
    if let Some((op, index)) = bare_operator(&sequence) {
        return failure(
            Stage::Reduction,
            Reason::MissingOperand {
                operator: op.symbol(),
                index,
                side: Side::Right,
            },
        );
    }

    let mut terms = vec![];
    while let Some(open) = sequence.iter().position(Element::is_opening_bracket) {
        let text = sequence.cut(0..open).add_stage(Stage::Extraction)?;
        if !text.is_empty() {
            terms.push(Term::Text(text.to_string()));
        }
        let close = scan_to_zero(&sequence, 0, Direction::Forward).add_stage(Stage::Extraction)?;
        let group = sequence.cut(0..close + 1).add_stage(Stage::Extraction)?;
        terms.push(Term::Group(reduce(group)?));
    }

    if terms.is_empty() {
        return Ok(Expr::operand(sequence.to_string()));
    }
    if !sequence.is_empty() {
        terms.push(Term::Text(sequence.to_string()));
    }
    let expr = Expr::Juxtaposed(terms);
    debug!("reduced operand {}", expr);
    Ok(expr)
}

/// If the sequence spells nothing but operators, returns the last of them and its index.
fn bare_operator(sequence: &TokenSequence) -> Option<(&'static Operator, usize)> {
    let mut last = None;
    let mut index = 0;
    while index < sequence.len() {
        if sequence.is_space(index) {
            index += 1;
            continue;
        }
        let (op, width) = Operator::find_at(sequence, index)?;
        last = Some((op, index));
        index += width;
    }
    last
}

/// The extent of one operand, and whether it is already wrapped in brackets from the input.
struct Operand {
    span: Range<usize>,
    explicit: bool,
}

struct Pass<'s> {
    sequence: &'s mut TokenSequence,
    rank: Rank,
}

impl<'s> Pass<'s> {
    fn new(sequence: &'s mut TokenSequence, rank: Rank) -> Self {
        Self { sequence, rank }
    }

    fn stage(&self) -> Stage {
        Stage::Pass(self.rank)
    }

    fn run(self) -> Result<(), ParseError> {
        trace!("rank {} pass over `{}`", self.rank, self.sequence);
        match Operator::assoc_of(self.rank) {
            Assoc::Left => self.run_forward(),
            Assoc::Right => self.run_backward(),
        }
    }

    /// Reduces left-associative operators, leftmost first.
    fn run_forward(mut self) -> Result<(), ParseError> {
        let mut open = vec![];
        let mut index = 0;

        while index < self.sequence.len() {
            let element = self.sequence.get(index).add_stage(self.stage())?;

            if element.is_opening_bracket() {
                open.push(index);
            } else if element.is_closing_bracket() {
                if open.pop().is_none() {
                    let reason = unmatched(self.sequence, index, Direction::Backward);
                    return failure(self.stage(), reason);
                }
            } else if open.is_empty() {
                if let Some((op, width)) = Operator::find_at(self.sequence, index) {
                    index = if op.rank() == self.rank && self.is_binary(index, op)? {
                        self.reduce_at(index, op, width)?
                    } else {
                        index + width - 1
                    };
                }
            }
            index += 1;
        }

        match open.last() {
            Some(&index) => failure(
                self.stage(),
                unmatched(self.sequence, index, Direction::Forward),
            ),
            None => Ok(()),
        }
    }

    /// Reduces right-associative operators, rightmost first.
    fn run_backward(mut self) -> Result<(), ParseError> {
        let mut closed = vec![];
        let mut index = self.sequence.len();

        while index > 0 {
            let current = index - 1;
            let element = self.sequence.get(current).add_stage(self.stage())?;
            index = current;

            if element.is_closing_bracket() {
                closed.push(current);
            } else if element.is_opening_bracket() {
                if closed.pop().is_none() {
                    let reason = unmatched(self.sequence, current, Direction::Forward);
                    return failure(self.stage(), reason);
                }
            } else if closed.is_empty() {
                if let Some((op, width)) = Operator::find_ending_at(self.sequence, current) {
                    let start = current + 1 - width;
                    index = if op.rank() == self.rank && self.is_binary(start, op)? {
                        self.reduce_at(start, op, width)?
                    } else {
                        start
                    };
                }
            }
        }

        match closed.last() {
            Some(&index) => failure(
                self.stage(),
                unmatched(self.sequence, index, Direction::Backward),
            ),
            None => Ok(()),
        }
    }

    /// Decides whether the operator at `index` joins two operands. A sign with nothing to
    /// its left belongs to the operand that follows it instead.
    fn is_binary(&self, index: usize, op: &Operator) -> Result<bool, ParseError> {
        if has_left_operand(self.sequence, index) {
            Ok(true)
        } else if op.is_sign() {
            Ok(false)
        } else {
            failure(
                Stage::LeftOperand,
                Reason::MissingOperand {
                    operator: op.symbol(),
                    index,
                    side: Side::Left,
                },
            )
        }
    }

    /// Returns `true` if `op`, spelled at `start`, separates two operands of the current rank.
    fn splits(&self, start: usize, op: &Operator) -> bool {
        op.rank() == self.rank && has_left_operand(self.sequence, start)
    }

    /// Replaces the operator at `index` and both of its operands with a single node.
    /// Returns the index of that node.
    fn reduce_at(
        &mut self,
        index: usize,
        op: &'static Operator,
        width: usize,
    ) -> Result<usize, ParseError> {
        let after = index + width;
        if !has_right_operand(self.sequence, after) {
            return failure(
                Stage::RightOperand,
                Reason::MissingOperand {
                    operator: op.symbol(),
                    index,
                    side: Side::Right,
                },
            );
        }

        let left = self.left_operand(index).add_stage(Stage::LeftOperand)?;
        let right = self.right_operand(after).add_stage(Stage::RightOperand)?;
        let position = left.span.start;
        trace!(
            "'{}' at {} splits `{}` into {:?} and {:?}",
            op,
            index,
            self.sequence,
            left.span,
            right.span
        );

        let (lhs, rhs) = self.extract(left, right).add_stage(Stage::Extraction)?;
        let node = Expr::binary(reduce(lhs)?, op, reduce(rhs)?);
        debug!("reduced {}", node);

        self.sequence
            .overwrite(position, Element::Node(node))
            .add_stage(Stage::Extraction)?;
        Ok(position)
    }

    /// Finds the operand ending just before the operator at `index`.
    fn left_operand(&self, index: usize) -> Result<Operand, Reason> {
        let end = previous_token(self.sequence, index).ok_or(Reason::InvalidIndex {
            index,
            len: self.sequence.len(),
        })?;

        if self.sequence.get(end)?.is_closing_bracket() {
            let start = scan_to_zero(self.sequence, end, Direction::Backward)?;
            if self.is_left_boundary(start) {
                return Ok(Operand {
                    span: start..end + 1,
                    explicit: true,
                });
            }
        }

        let mut scanner = BracketScanner::new(Direction::Backward);
        let mut start = end + 1;
        while start > 0 {
            let candidate = start - 1;
            scanner.visit(self.sequence.get(candidate)?);
            if scanner.depth() < 0 {
                return Err(unmatched(self.sequence, candidate, Direction::Forward));
            }

            if scanner.is_neutral() {
                if let Some((op, width)) = Operator::find_ending_at(self.sequence, candidate) {
                    let op_start = candidate + 1 - width;
                    if self.splits(op_start, op) {
                        break;
                    }
                    start = op_start;
                    continue;
                }
            }
            start = candidate;
        }

        if !scanner.is_neutral() {
            return Err(unmatched(self.sequence, end, Direction::Backward));
        }

        while start < end && self.sequence.is_space(start) {
            start += 1;
        }
        Ok(Operand {
            span: start..end + 1,
            explicit: false,
        })
    }

    /// Finds the operand starting just after an operator that ends before `after`.
    fn right_operand(&self, after: usize) -> Result<Operand, Reason> {
        let start = next_token(self.sequence, after).ok_or(Reason::InvalidIndex {
            index: after,
            len: self.sequence.len(),
        })?;

        if self.sequence.get(start)?.is_opening_bracket() {
            let end = scan_to_zero(self.sequence, start, Direction::Forward)?;
            if self.is_right_boundary(end + 1) {
                return Ok(Operand {
                    span: start..end + 1,
                    explicit: true,
                });
            }
        }

        let mut scanner = BracketScanner::new(Direction::Forward);
        let mut end = start;
        while end < self.sequence.len() {
            scanner.visit(self.sequence.get(end)?);
            if scanner.depth() < 0 {
                return Err(unmatched(self.sequence, end, Direction::Backward));
            }

            if scanner.is_neutral() {
                if let Some((op, width)) = Operator::find_at(self.sequence, end) {
                    if self.splits(end, op) {
                        break;
                    }
                    end += width;
                    continue;
                }
            }
            end += 1;
        }

        if !scanner.is_neutral() {
            return Err(unmatched(self.sequence, start, Direction::Forward));
        }

        while end > start && self.sequence.is_space(end - 1) {
            end -= 1;
        }
        Ok(Operand {
            span: start..end,
            explicit: false,
        })
    }

    /// Returns `true` if nothing before `start` can still belong to an operand starting there.
    fn is_left_boundary(&self, start: usize) -> bool {
        let Some(prev) = previous_token(self.sequence, start) else {
            return true;
        };
        match self.sequence.get(prev) {
            Ok(element) if element.is_opening_bracket() => true,
            Ok(Element::Char(_)) => Operator::find_ending_at(self.sequence, prev)
                .is_some_and(|(op, width)| self.splits(prev + 1 - width, op)),
            _ => false,
        }
    }

    /// Returns `true` if nothing from `end` onwards can still belong to an operand ending there.
    fn is_right_boundary(&self, end: usize) -> bool {
        let Some(next) = next_token(self.sequence, end) else {
            return true;
        };
        match self.sequence.get(next) {
            Ok(element) if element.is_closing_bracket() => true,
            Ok(Element::Char(_)) => Operator::find_at(self.sequence, next)
                .is_some_and(|(op, _)| self.splits(next, op)),
            _ => false,
        }
    }

    /// Wraps implicit operands in synthetic brackets, then cuts both operands out of the
    /// sequence. Only the slot of the operator itself is left behind, at the left operand's
    /// former start.
    fn extract(
        &mut self,
        left: Operand,
        right: Operand,
    ) -> Result<(TokenSequence, TokenSequence), Reason> {
        let mut left_span = left.span;
        let mut right_span = right.span;

        if !right.explicit {
            self.sequence.insert(right_span.end, Element::Char(')'))?;
            self.sequence.insert(right_span.start, Element::Char('('))?;
            right_span.end += 2;
        }
        if !left.explicit {
            self.sequence.insert(left_span.end, Element::Char(')'))?;
            self.sequence.insert(left_span.start, Element::Char('('))?;
            left_span.end += 2;
            right_span.start += 2;
            right_span.end += 2;
        }

        let gap = right_span.start - left_span.end;
        let rhs = self.sequence.cut(right_span)?;
        let lhs = self.sequence.cut(left_span.clone())?;
        self.sequence.cut(left_span.start + 1..left_span.start + gap)?;

        Ok((lhs, rhs))
    }
}

/// The index of the nearest non-space element before `index`.
fn previous_token(sequence: &TokenSequence, index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| !sequence.is_space(i))
}

/// The index of the nearest non-space element at or after `index`.
fn next_token(sequence: &TokenSequence, index: usize) -> Option<usize> {
    (index..sequence.len()).find(|&i| !sequence.is_space(i))
}

/// Returns `true` if an operand ends before the operator spelled at `index`.
fn has_left_operand(sequence: &TokenSequence, index: usize) -> bool {
    let Some(prev) = previous_token(sequence, index) else {
        return false;
    };
    match sequence.get(prev) {
        Ok(Element::Node(_)) => true,
        Ok(element) if element.is_closing_bracket() => true,
        Ok(element) if element.is_opening_bracket() => false,
        Ok(Element::Char(_)) => Operator::find_ending_at(sequence, prev).is_none(),
        Err(_) => false,
    }
}

/// Returns `true` if an operand starts at or after `index`. An operand may begin with signs,
/// as long as something other than an operator follows them.
fn has_right_operand(sequence: &TokenSequence, index: usize) -> bool {
    let Some(next) = next_token(sequence, index) else {
        return false;
    };
    match sequence.get(next) {
        Ok(Element::Node(_)) => true,
        Ok(element) if element.is_closing_bracket() => false,
        Ok(element) if element.is_opening_bracket() => true,
        Ok(Element::Char(_)) => match Operator::find_at(sequence, next) {
            Some((op, width)) => op.is_sign() && has_right_operand(sequence, next + width),
            None => true,
        },
        Err(_) => false,
    }
}
