//! Parses expressions written in an ASCIIMath-like notation into trees of binary operators.
pub mod parser;
mod prelude;

pub use parser::{normalize, parse};
