//! Gaddis RT
//!
//! The execution half of the toolchain: variable environments, the
//! tree-walking interpreter with its built-in functions, the host interface
//! the driver implements, and pull-based debug step sessions.

pub mod debug;
pub mod env;
pub mod host;
pub mod interpreter;

use gaddis_compiler::CompileError;
use gaddis_core::RuntimeError;
use std::sync::Arc;
use thiserror::Error;

pub use debug::{DebugSession, SnapshotValue, Step};
pub use host::{render_display_line, CollectHost, Host};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// The source line to report, if the failure has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Compile(e) => Some(e.line()),
            Error::Runtime(e) => e.line(),
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Error::Runtime(e) if e.is_stopped())
    }
}

/// Compile and run `source` to completion against `host`.
pub fn interpret(source: &str, host: &dyn Host) -> Result<(), Error> {
    let program = gaddis_compiler::compile(source)?;
    interpreter::run(&program, host)?;
    Ok(())
}

/// Compile `source` and start a debug step session over it.
pub fn debug(source: &str, host: Arc<dyn Host>) -> Result<DebugSession, Error> {
    let program = gaddis_compiler::compile(source)?;
    Ok(DebugSession::spawn(program, host))
}
