use crate::environment::EnvError;

/// Failure reported by a plugin function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// An environment operation failed, typically on a protected key.
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown plugin '{name}'")]
    UnknownPlugin { name: String },

    /// Constants carry no name of their own.
    #[error("plugin has no name; pass one explicitly")]
    Unnamed,
}
