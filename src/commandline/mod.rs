use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(about = "Parses ASCIIMath-like expressions into operator trees")]
pub struct Options {
    #[clap(subcommand)]
    pub operation: Operation,
    #[clap(short, long, default_value_t = 1)]
    pub verbose: usize,
}

#[derive(Debug, Subcommand)]
pub enum Operation {
    /// Parse an expression and print its grouping
    Parse {
        expression: String,
        /// Print the full expression tree instead
        #[clap(short, long)]
        tree: bool,
    },
    /// Print an expression after bracket and whitespace normalization
    Normalize { expression: String },
    /// List the supported operators
    Operators,
}
