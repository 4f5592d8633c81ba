//! Evaluation of validated submissions.
//!
//! A [`Submission`] moves through the [`Phase`]s `Idle`, `PreparingEnvironment`,
//! `Executing`, `Cleanup` and `Done`. While it executes, the environment
//! holds two hidden sentinels (see [`scope`]); calls to plugins that asked
//! for the environment receive it through the keyword added by [`injector`].
//!
//! ## Example
//!
//! ```
//! use safeparse_core::environment::Environment;
//! use safeparse_core::evaluator::execute;
//! use safeparse_core::parser::parse;
//! use safeparse_core::plugins::PluginRegistry;
//! use safeparse_core::values::Value;
//!
//! let module = parse("x = [1, 'a']").unwrap();
//! let mut env = Environment::new();
//! execute(&module, &mut env, &PluginRegistry::new()).unwrap();
//! assert_eq!(env.get("x"), Some(&Value::list([Value::int(1), Value::str("a")])));
//! ```

mod error;
mod eval;
pub mod injector;
pub mod scope;
mod submission;


pub use error::{ExecutionError, ExecutionErrorKind};
pub use eval::Evaluator;
pub use submission::{Phase, Submission};

use crate::environment::Environment;
use crate::parser::{DEFAULT_MAX_DEPTH, Module};
use crate::plugins::PluginRegistry;

/// Run the statements of `module` with the default depth limit.
///
/// `module` is expected to have passed validation.
pub fn execute(
    module: &Module,
    env: &mut Environment,
    registry: &PluginRegistry,
) -> Result<(), ExecutionError> {
    execute_with_max_depth(module, env, registry, DEFAULT_MAX_DEPTH)
}

/// Run the statements of `module`, failing when expressions nest deeper
/// than `max_depth`.
pub fn execute_with_max_depth(
    module: &Module,
    env: &mut Environment,
    registry: &PluginRegistry,
    max_depth: usize,
) -> Result<(), ExecutionError> {
    Submission::new(env, registry)
        .with_max_depth(max_depth)
        .run(module)
}
