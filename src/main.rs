use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use mathops::parser::{self, Operator, ParseError};

use commandline::{Operation, Options};

mod commandline;

fn main() -> Result<ExitCode> {
    let options = Options::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(options.verbose)
        .init()?;

    match options.operation {
        Operation::Parse { expression, tree } => match parser::parse(&expression) {
            Ok(expr) if tree => println!("{:#?}", expr),
            Ok(expr) => println!("{}", expr),
            Err(err) => {
                describe_error(&err, &expression);
                return Ok(ExitCode::FAILURE);
            }
        },
        Operation::Normalize { expression } => match parser::normalize(&expression) {
            Ok(sequence) => println!("{}", sequence),
            Err(err) => {
                describe_error(&err, &expression);
                return Ok(ExitCode::FAILURE);
            }
        },
        Operation::Operators => {
            for op in Operator::all() {
                println!(
                    "{}\t{:<22}\trank {}\t{}\t{}",
                    op.symbol(),
                    op.name(),
                    op.rank(),
                    op.assoc(),
                    op.alias_list().join(" ")
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn describe_error(err: &ParseError, expression: &str) {
    eprintln!("{}", expression);
    eprintln!("Parse failure! {}", err);
}
