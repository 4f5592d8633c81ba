//! The host-facing interpreter.

use tracing::debug;

use super::{Error, InterpreterOptions, IntoSource};
use crate::environment::Environment;
use crate::evaluator::execute_with_max_depth;
use crate::parser::parse_with_max_depth;
use crate::plugins::{NativeFunction, Plugin, PluginRegistry, RegistryError};
use crate::validator::validate;

/// Runs submissions against a persistent environment.
///
/// Each call to [`Interpreter::parse`] reads, parses, validates and executes
/// one submission. Validation covers the whole submission before anything
/// runs, so a rejected submission leaves the environment untouched. A
/// failure during execution keeps the bindings made by earlier statements of
/// the same submission.
///
/// # Example
///
/// ```
/// use safeparse_core::api::Interpreter;
/// use safeparse_core::plugins::{CallArgs, NativeFunction};
/// use safeparse_core::values::Value;
///
/// let mut interpreter = Interpreter::new();
/// interpreter.register(NativeFunction::new("double", |args: CallArgs| {
///     Ok(Value::int(args.int_arg(0)? * 2))
/// }));
///
/// let env = interpreter.parse("y = double(3)").unwrap();
/// assert_eq!(env.get("y"), Some(&Value::int(6)));
///
/// let err = interpreter.parse("y = 1").unwrap_err();
/// assert_eq!(err.to_string(), "l.1: Illegal assignment into existing variable y");
/// ```
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
    registry: PluginRegistry,
    options: InterpreterOptions,
}

impl Interpreter {
    /// Interpreter with an empty environment and no plugins.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: InterpreterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    /// Add a plugin; see [`PluginRegistry::add`].
    pub fn add(
        &mut self,
        plugin: impl Into<Plugin>,
        name: Option<&str>,
    ) -> Result<(), RegistryError> {
        self.registry.add(plugin, name)
    }

    /// Register a function under its own name.
    pub fn register(&mut self, function: NativeFunction) {
        self.registry.register(function);
    }

    /// Run one submission and return the environment it left behind.
    pub fn parse(&mut self, input: impl IntoSource) -> Result<&Environment, Error> {
        let source = input.into_source()?;
        debug!(bytes = source.len(), "parsing submission");

        let module = parse_with_max_depth(&source, self.options.max_depth)?;
        validate(&module, &self.registry)?;
        execute_with_max_depth(
            &module,
            &mut self.env,
            &self.registry,
            self.options.max_depth,
        )?;

        debug!(entries = self.env.len(), "submission applied");
        Ok(&self.env)
    }
}
