pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use environment::{Env, Environment};
pub use error::{ErrorKind, ParseError, RuntimeError, WispError};
pub use evaluator::Evaluator;
pub use parser::Parser;

use std::io::BufRead;

use crate::ast::Expr;
use crate::lexer::Lexer;
use crate::value::Value;

/// Lexes and parses a complete source string into a program.
pub fn parse_program(source: &str) -> Result<Vec<Expr>, ParseError> {
    let lexer = Lexer::new(source.as_bytes());
    Parser::new(lexer).parse_program()
}

/// Parses and evaluates a source string. The result is the value of the last
/// top-level form, or None for an empty program.
pub fn parse_and_run(source: &str) -> Result<Option<Value>, WispError> {
    let program = parse_program(source)?;
    let mut evaluator = Evaluator::new();
    Ok(evaluator.run(&program)?)
}

/// Like [`parse_and_run`], with the `read` builtin wired to `input`.
pub fn parse_and_run_with_input(
    source: &str,
    input: Box<dyn BufRead>,
) -> Result<Option<Value>, WispError> {
    let program = parse_program(source)?;
    let mut evaluator = Evaluator::with_input(input);
    Ok(evaluator.run(&program)?)
}
