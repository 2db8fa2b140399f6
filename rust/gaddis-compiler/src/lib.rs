//! Gaddis Compiler
//!
//! Front end for the pseudocode language: lexer, parser, AST, the source
//! formatter, and the flowchart extractor. `compile` is the shared entry
//! point used by the interpreter, the flowchart API, and the CLI.

pub mod compiler;
pub mod flowchart;
pub mod formatter;

use compiler::ast::Program;
use compiler::lexer::{self, LexError};
use compiler::parser::{self, ParseError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl CompileError {
    /// The source line the error is anchored to.
    pub fn line(&self) -> usize {
        match self {
            CompileError::Lex(e) => e.line(),
            CompileError::Parse(e) => e.line(),
        }
    }
}

/// Lex and parse a source string into a program.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(tokens)?;
    Ok(program)
}
