//! Public error type returned by [`Interpreter`](super::Interpreter).
//!
//! Errors from each stage (reading the input, parsing, validation and
//! execution) are converted to [`Error`] at the API boundary. The
//! [`Display`](core::fmt::Display) form is `l.{line}: {message}`, or just the
//! message when no line applies.

use core::fmt;

use crate::environment::EnvError;
use crate::evaluator::{ExecutionError, ExecutionErrorKind};
use crate::parser::{Location, ParseError, ParseErrorKind, Span};
use crate::plugins::PluginError;
use crate::validator::{AssignmentViolation, ValidationError, ValidationErrorKind};

/// What went wrong with a submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The text is not well formed.
    #[error("{0}")]
    Syntax(ParseErrorKind),

    /// A well formed construct outside the accepted grammar.
    #[error("Illegal syntax")]
    IllegalSyntax { construct: &'static str },

    #[error("{0}")]
    IllegalAssignment(AssignmentViolation),

    #[error("Unknown plugin {name}")]
    UnknownPlugin { name: String },

    #[error("name '{name}' is not defined")]
    NameResolution { name: String },

    /// A hidden key was touched through the environment view.
    #[error("key '{key}' is protected")]
    ProtectedKey { key: String },

    /// The input could not be read as text.
    #[error("Cannot read the contents of a {type_name} variable: {reason}")]
    Input { type_name: String, reason: String },

    #[error("plugin {name} is not callable")]
    NotCallable { name: String },

    #[error("{name}() failed: {error}")]
    Plugin { name: String, error: PluginError },

    #[error("unhashable type: '{type_name}'")]
    Unhashable { type_name: &'static str },

    #[error("{plugin}() got multiple values for keyword argument '{keyword}'")]
    DuplicateKeyword { plugin: String, keyword: String },

    #[error("nesting depth {depth} exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { depth: usize, max_depth: usize },
}

/// A failed submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    /// 1-based line of the offending construct.
    pub line: Option<usize>,
    /// Byte range of the offending construct in the source.
    pub span: Option<Span>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            line: None,
            span: None,
        }
    }

    fn located(kind: ErrorKind, loc: Location) -> Self {
        Self {
            kind,
            line: Some(loc.line),
            span: Some(loc.span),
        }
    }

    pub(crate) fn input(type_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Input {
            type_name: type_name.into(),
            reason: reason.to_string(),
        })
    }

    /// Convert to a diagnostic for display to users.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help): (&str, Option<String>) = match &self.kind {
            ErrorKind::Syntax(kind) => ("S001", kind.help().map(str::to_string)),
            ErrorKind::IllegalSyntax { construct } => (
                "S002",
                Some(format!(
                    "{} is not allowed here; only assignments and plugin calls are accepted",
                    construct
                )),
            ),
            ErrorKind::IllegalAssignment(violation) => {
                let help = match violation {
                    AssignmentViolation::MultipleTargets => "assign each name in its own statement",
                    AssignmentViolation::NotAName { .. } => "only a plain name can be assigned",
                    AssignmentViolation::PluginName { .. } => "plugin names cannot be reassigned",
                    AssignmentViolation::HiddenName { .. } => {
                        "names starting and ending with '__' are reserved"
                    }
                    AssignmentViolation::ExistingName { .. } => {
                        "a name can only be assigned once; choose a new name"
                    }
                };
                ("S003", Some(help.to_string()))
            }
            ErrorKind::UnknownPlugin { name } => (
                "E001",
                Some(format!("no plugin named '{}' is registered", name)),
            ),
            ErrorKind::NameResolution { .. } => (
                "E002",
                Some("names must be assigned before they are used".to_string()),
            ),
            ErrorKind::ProtectedKey { .. } => ("E003", None),
            ErrorKind::NotCallable { .. } => (
                "E004",
                Some("the plugin is a constant; refer to it without calling it".to_string()),
            ),
            ErrorKind::Plugin { .. } => ("E005", None),
            ErrorKind::Unhashable { .. } => (
                "E006",
                Some("set elements and dict keys cannot be lists, sets or dicts".to_string()),
            ),
            ErrorKind::DuplicateKeyword { .. } => ("E007", None),
            ErrorKind::MaxDepthExceeded { .. } => (
                "E008",
                Some("reduce nesting or split the statement into several assignments".to_string()),
            ),
            ErrorKind::Input { .. } => ("I001", None),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            line: self.line,
            span: self.span.clone(),
            help,
            code: Some(code.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "l.{}: {}", line, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message, without the line prefix.
    pub message: String,

    pub line: Option<usize>,

    pub span: Option<Span>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        let kind = match err.kind {
            ParseErrorKind::MaxDepthExceeded { depth, max_depth } => {
                ErrorKind::MaxDepthExceeded { depth, max_depth }
            }
            kind => ErrorKind::Syntax(kind),
        };
        Error::located(kind, err.loc)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        let kind = match err.kind {
            ValidationErrorKind::IllegalSyntax { construct } => {
                ErrorKind::IllegalSyntax { construct }
            }
            ValidationErrorKind::IllegalAssignment(violation) => {
                ErrorKind::IllegalAssignment(violation)
            }
        };
        Error::located(kind, err.loc)
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        use ExecutionErrorKind as E;

        let kind = match err.kind {
            E::IllegalSyntax { construct } => ErrorKind::IllegalSyntax { construct },
            E::ExistingName { name } => {
                ErrorKind::IllegalAssignment(AssignmentViolation::ExistingName { name })
            }
            E::UnknownPlugin { name } => ErrorKind::UnknownPlugin { name },
            E::NameResolution { name } => ErrorKind::NameResolution { name },
            E::NotCallable { name } => ErrorKind::NotCallable { name },
            E::Plugin {
                error: PluginError::Env(EnvError::ProtectedKey { key }),
                ..
            } => ErrorKind::ProtectedKey { key },
            E::Plugin { name, error } => ErrorKind::Plugin { name, error },
            E::Unhashable { type_name } => ErrorKind::Unhashable { type_name },
            E::DuplicateKeyword { plugin, keyword } => {
                ErrorKind::DuplicateKeyword { plugin, keyword }
            }
            E::MaxDepthExceeded { depth, max_depth } => {
                ErrorKind::MaxDepthExceeded { depth, max_depth }
            }
        };
        Error::located(kind, err.loc)
    }
}
