//! Hidden sentinel keys present in the environment while a submission runs.

use tracing::trace;

use crate::environment::Environment;
use crate::values::Value;

/// Sentinel marking that no builtins are available to the submission.
pub const NO_BUILTINS_KEY: &str = "__builtins__";

/// Sentinel bound to the environment handle passed to plugins.
pub const ENV_HANDLE_KEY: &str = "__env__";

/// Guard owning the environment for the duration of one submission.
///
/// Entering inserts both sentinels; dropping the guard removes them again,
/// whichever way execution ended.
pub struct SentinelScope<'a> {
    env: &'a mut Environment,
}

impl<'a> SentinelScope<'a> {
    pub fn enter(env: &'a mut Environment) -> Self {
        env.insert(NO_BUILTINS_KEY, Value::Dict(Vec::new()));
        env.insert(ENV_HANDLE_KEY, Value::Environment);
        trace!("sentinels inserted");
        Self { env }
    }

    pub fn env(&self) -> &Environment {
        self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        self.env
    }
}

impl Drop for SentinelScope<'_> {
    fn drop(&mut self) {
        self.env.remove(NO_BUILTINS_KEY);
        self.env.remove(ENV_HANDLE_KEY);
        trace!("sentinels removed");
    }
}
