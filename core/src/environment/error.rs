/// Failure of an operation through a [`ProtectedEnv`](super::ProtectedEnv).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// The key is reserved for the interpreter.
    #[error("key '{key}' is protected")]
    ProtectedKey { key: String },

    #[error("key '{key}' not found")]
    MissingKey { key: String },

    /// No visible entry is left to pop.
    #[error("environment is empty")]
    Empty,
}

impl EnvError {
    pub(crate) fn protected(key: &str) -> Self {
        EnvError::ProtectedKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn missing(key: &str) -> Self {
        EnvError::MissingKey {
            key: key.to_string(),
        }
    }
}
