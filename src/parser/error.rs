//! Error handling for parsing.
use std::fmt;

use thiserror::Error;

use super::{bracket::Direction, operator::Rank};

/// A parsing error, indicating both the parsing stage in which the error was encountered
/// and the cause for the error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason} while {stage}")]
pub struct ParseError {
    stage: Stage,
    reason: Reason,
}

impl ParseError {
    pub fn new(stage: Stage, reason: Reason) -> Self {
        Self { stage, reason }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn reason(&self) -> &Reason {
        &self.reason
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error(
        "there are {excess} more '{}' brackets than '{}' characters in the input",
        .side.brace(),
        .side.opposite().brace()
    )]
    BracketImbalance { excess: usize, side: BracketKind },
    #[error("unmatched '{}' bracket at char {index}, '{snippet}'", .direction.unmatched())]
    UnmatchedBracket {
        index: usize,
        direction: Direction,
        snippet: String,
    },
    #[error("{remaining} elements remain after every precedence pass")]
    IncompleteReduction { remaining: usize },
    #[error("index {index} is out of range for a sequence of length {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("span {start}..{end} is invalid for a sequence of length {len}")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("operator '{operator}' at char {index} has no {side} operand")]
    MissingOperand {
        operator: char,
        index: usize,
        side: Side,
    },
    #[error("empty expression")]
    EmptyExpression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Opening,
    Closing,
}

impl BracketKind {
    pub fn opposite(&self) -> Self {
        match self {
            BracketKind::Opening => BracketKind::Closing,
            BracketKind::Closing => BracketKind::Opening,
        }
    }

    fn brace(&self) -> char {
        match self {
            BracketKind::Opening => '{',
            BracketKind::Closing => '}',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}
impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Rewriting brackets and whitespace in the raw input.
    Normalize,
    /// Removing a bracket pair that wraps the whole sequence.
    Unwrap,
    /// Scanning for the operators of one rank.
    Pass(Rank),
    /// Finding the extent of an operator's left operand.
    LeftOperand,
    /// Finding the extent of an operator's right operand.
    RightOperand,
    /// Cutting both operands out of the sequence and splicing in the node.
    Extraction,
    /// Turning what remains after every pass into a single expression.
    Reduction,
}
impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::Normalize => f.write_str("normalizing the input"),
            Stage::Unwrap => f.write_str("unwrapping enclosing brackets"),
            Stage::Pass(rank) => write!(f, "scanning for rank {} operators", rank),
            Stage::LeftOperand => f.write_str("delimiting a left operand"),
            Stage::RightOperand => f.write_str("delimiting a right operand"),
            Stage::Extraction => f.write_str("extracting operands"),
            Stage::Reduction => f.write_str("reducing the expression"),
        }
    }
}

pub trait AddStage {
    type Annotated;

    fn add_stage(self, stage: Stage) -> Self::Annotated;
}

impl<O> AddStage for Result<O, Reason> {
    type Annotated = Result<O, ParseError>;

    fn add_stage(self, stage: Stage) -> Self::Annotated {
        self.map_err(|reason| ParseError { stage, reason })
    }
}

pub fn failure<R>(stage: Stage, reason: Reason) -> Result<R, ParseError> {
    Err(ParseError::new(stage, reason))
}
