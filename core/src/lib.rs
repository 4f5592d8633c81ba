//! Sandboxed interpreter for configuration submissions.
//!
//! A submission is a short program of name assignments and plugin calls.
//! It is parsed, checked against a closed whitelist of constructs, and
//! evaluated against a persistent [`environment::Environment`] extended with
//! host-registered [`plugins`]. Internal state the interpreter keeps in the
//! environment is hidden from plugins by [`environment::ProtectedEnv`].

pub mod api;
pub mod environment;
pub mod evaluator;
pub mod parser;
pub mod plugins;
pub mod validator;
pub mod values;

pub use api::{Error, ErrorKind, Interpreter, InterpreterOptions};
