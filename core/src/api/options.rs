//! Configuration options for the interpreter.

use crate::parser::DEFAULT_MAX_DEPTH;

/// Configuration options for an [`Interpreter`](super::Interpreter).
///
/// # Example
///
/// ```
/// use safeparse_core::api::InterpreterOptions;
///
/// let options = InterpreterOptions { max_depth: 50 };
/// assert_eq!(InterpreterOptions::default().max_depth, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Maximum nesting depth of brackets and calls, enforced both when
    /// parsing and when evaluating.
    ///
    /// Default: 200
    pub max_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
