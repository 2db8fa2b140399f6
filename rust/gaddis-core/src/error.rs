//! Runtime error taxonomy.
//!
//! Every variant carries the 1-based source line of the statement or
//! expression that failed, except `Stopped`, which is raised by cooperative
//! cancellation and has no source position. The messages here are the exact
//! single-line texts the driver prints after `Error on line N: `.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    // Semantic errors
    #[error("Variable '{name}' has not been declared")]
    UndeclaredVariable { name: String, line: usize },
    #[error("'{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String, line: usize },
    #[error("Cannot assign to constant '{name}'")]
    ConstantAssignment { name: String, line: usize },
    #[error("Module '{name}' has not been defined")]
    UndeclaredModule { name: String, line: usize },
    #[error("Function '{name}' has not been defined")]
    UndeclaredFunction { name: String, line: usize },
    #[error("'{name}' expects {expected} argument(s) but got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("Ref parameter '{name}' requires a variable argument")]
    ReferenceArgument { name: String, line: usize },
    #[error("No 'main' module defined")]
    MissingMain,

    // Type errors
    #[error("{message}")]
    TypeMismatch { message: String, line: usize },

    // Range errors
    #[error("Array index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize, line: usize },
    #[error("Array size must not be negative")]
    NegativeSize { line: usize },
    #[error("Too many initializers for array of size {size}")]
    TooManyInitializers { size: usize, line: usize },
    #[error("substring start index is greater than end index")]
    SubstringBounds { line: usize },

    #[error("Division by zero")]
    DivisionByZero { line: usize },

    #[error("Function '{name}' ended without a Return")]
    MissingReturn { name: String, line: usize },

    #[error("Maximum call depth exceeded")]
    RecursionLimit { line: usize },

    #[error("program stopped by user")]
    Stopped,
}

impl RuntimeError {
    /// Convenience constructor for type errors, which carry free-form text.
    pub fn type_mismatch(message: impl Into<String>, line: usize) -> Self {
        RuntimeError::TypeMismatch {
            message: message.into(),
            line,
        }
    }

    /// The source line the error is anchored to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::UndeclaredVariable { line, .. }
            | RuntimeError::DuplicateDeclaration { line, .. }
            | RuntimeError::ConstantAssignment { line, .. }
            | RuntimeError::UndeclaredModule { line, .. }
            | RuntimeError::UndeclaredFunction { line, .. }
            | RuntimeError::ArgumentCount { line, .. }
            | RuntimeError::ReferenceArgument { line, .. }
            | RuntimeError::TypeMismatch { line, .. }
            | RuntimeError::IndexOutOfBounds { line, .. }
            | RuntimeError::NegativeSize { line }
            | RuntimeError::TooManyInitializers { line, .. }
            | RuntimeError::SubstringBounds { line }
            | RuntimeError::DivisionByZero { line }
            | RuntimeError::MissingReturn { line, .. }
            | RuntimeError::RecursionLimit { line } => Some(*line),
            RuntimeError::MissingMain | RuntimeError::Stopped => None,
        }
    }

    /// Whether this is the cooperative-cancellation signal rather than a
    /// program fault.
    pub fn is_stopped(&self) -> bool {
        matches!(self, RuntimeError::Stopped)
    }
}
