//! Gaddis Core
//!
//! Shared runtime types used across the compiler, interpreter, and CLI:
//! pseudocode values, declared data types, and the runtime error taxonomy.

pub mod error;
pub mod values;

pub use error::RuntimeError;
pub use values::{DataType, Value};
