//! Interactive arithmetic calculator.
//!
//! An input line goes through [`preprocess::verify`] (whitespace removal, parenthesis
//! check, identifier substitution), then [`calc_engine::parse`] into an [`ast::Node`],
//! then [`evaluator::evaluate`]. [`commands::Session`] wraps the pipeline with the
//! command set and the [`environment::Environment`] it reads from and records into.

pub mod ast;
pub mod calc_engine;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod preprocess;

pub use commands::{Reply, Session};
pub use environment::Environment;
pub use error::CalcError;

/// Evaluates `line` against `env` without recording anything.
pub fn calculate(line: &str, env: &Environment) -> Result<f64, CalcError> {
    let text = preprocess::verify(line, env)?;
    let node = calc_engine::parse(&text)?;
    Ok(evaluator::evaluate(&node)?)
}
