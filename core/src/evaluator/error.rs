//! Errors raised while a validated submission runs.
//!
//! Execution stops at the first error. Statements that already completed
//! keep their effect on the environment.

use core::fmt;

use crate::parser::Location;
use crate::plugins::PluginError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionErrorKind {
    /// A node outside the accepted grammar reached the evaluator.
    #[error("Illegal syntax")]
    IllegalSyntax { construct: &'static str },

    /// Names are bound once; later submissions cannot rebind them.
    #[error("Illegal assignment into existing variable {name}")]
    ExistingName { name: String },

    #[error("Unknown plugin {name}")]
    UnknownPlugin { name: String },

    #[error("name '{name}' is not defined")]
    NameResolution { name: String },

    /// The called plugin is a constant.
    #[error("plugin {name} is not callable")]
    NotCallable { name: String },

    #[error("{name}() failed: {error}")]
    Plugin { name: String, error: PluginError },

    /// A list, set or dict used as a set element or dict key.
    #[error("unhashable type: '{type_name}'")]
    Unhashable { type_name: &'static str },

    #[error("{plugin}() got multiple values for keyword argument '{keyword}'")]
    DuplicateKeyword { plugin: String, keyword: String },

    #[error("evaluation depth {depth} exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { depth: usize, max_depth: usize },
}

/// Runtime failure of a submission, located at the offending node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub loc: Location,
}

impl ExecutionError {
    pub fn new(kind: ExecutionErrorKind, loc: &Location) -> Self {
        Self {
            kind,
            loc: loc.clone(),
        }
    }

    pub fn line(&self) -> usize {
        self.loc.line
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l.{}: {}", self.loc.line, self.kind)
    }
}

impl std::error::Error for ExecutionError {}
