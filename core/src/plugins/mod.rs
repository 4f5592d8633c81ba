//! Plugins: host functions and constants that submissions may reference.

mod error;
mod function;
mod registry;

pub use error::{PluginError, RegistryError};
pub use function::{CallArgs, ENV_KEYWORD, NativeFn, NativeFunction};
pub use registry::{Plugin, PluginRegistry};
