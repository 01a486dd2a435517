//! Converts an expression string into an expression tree.
mod bracket;
mod char_ext;
mod error;
mod normalizer;
mod operator;
mod passes;
mod sequence;
mod syntax_tree;

pub use bracket::{scan_to_zero, BracketScanner, Direction};
pub use error::{BracketKind, ParseError, Reason, Side, Stage};
pub use normalizer::normalize;
pub use operator::{Assoc, Operator, Rank, OPERATORS};
pub use passes::{parse, reduce};
pub use sequence::{Element, TokenSequence};
pub use syntax_tree::{BinExpr, Expr, Term};
