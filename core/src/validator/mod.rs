//! Whitelist gate between parsing and evaluation.
//!
//! Only two statement forms pass: an assignment of an expression to a single
//! plain name, and a bare call. Expressions are limited to names, scalar
//! literals, list, set and dict literals, and calls to a plain name with
//! positional and `name=value` arguments. Anything else is rejected with the
//! line of the offending construct, before any statement runs.

pub mod error;
pub mod validator;


pub use error::{AssignmentViolation, ValidationError, ValidationErrorKind};
pub use validator::validate;
