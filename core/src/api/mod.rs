//! Public API of the interpreter.
//!
//! # Example
//!
//! ```
//! use safeparse_core::api::{ErrorKind, Interpreter};
//!
//! let mut interpreter = Interpreter::new();
//! interpreter.parse("x = [1, 2.5, 's', True, None]").unwrap();
//!
//! let err = interpreter.parse("import os").unwrap_err();
//! assert!(matches!(err.kind, ErrorKind::IllegalSyntax { .. }));
//! assert_eq!(err.to_string(), "l.1: Illegal syntax");
//! ```

pub mod error;
pub mod interpreter;
pub mod options;
pub mod source;


pub use error::{Diagnostic, Error, ErrorKind, Severity};
pub use interpreter::Interpreter;
pub use options::InterpreterOptions;
pub use source::{IntoSource, Reader};
