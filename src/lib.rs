//! Safeparse - a sandboxed interpreter for configuration submissions
//!
//! # Overview
//!
//! Hosts hand untrusted text to an [`Interpreter`]. The text may only bind
//! new names to literals, other names and plugin calls, or call plugins for
//! their effect. Anything else, from operators to imports, is rejected before
//! a single statement runs.
//!
//! # Quick Start
//!
//! ```
//! use safeparse::{CallArgs, Interpreter, NativeFunction, Value};
//!
//! let mut interpreter = Interpreter::new();
//! interpreter.register(NativeFunction::new("double", |args: CallArgs| {
//!     Ok(Value::int(args.int_arg(0)? * 2))
//! }));
//! interpreter.register(
//!     NativeFunction::new("count", |mut args: CallArgs| {
//!         Ok(Value::int(args.require_env()?.len() as i64))
//!     })
//!     .with_env(),
//! );
//!
//! let env = interpreter.parse("y = double(3)\nn = count()").unwrap();
//! assert_eq!(env.get("y"), Some(&Value::int(6)));
//! assert_eq!(env.get("n"), Some(&Value::int(1)));
//! ```
//!
//! # Errors
//!
//! An [`Error`] carries the line of the offending construct when it has one. Use
//! [`render_error_to_string`] to show it with a source snippet.

pub mod error_renderer;

// Re-export public API from safeparse_core
pub use safeparse_core::api::{
    Diagnostic, Error, ErrorKind, Interpreter, InterpreterOptions, IntoSource, Reader, Severity,
};

// Re-export commonly used types
pub use safeparse_core::environment::{self, EnvError, Environment, ProtectedEnv};
pub use safeparse_core::plugins::{
    self, CallArgs, NativeFunction, Plugin, PluginError, PluginRegistry, RegistryError,
};
pub use safeparse_core::validator::AssignmentViolation;
pub use safeparse_core::values::{self, Value};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
