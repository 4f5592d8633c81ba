//! Host-supplied bindings available to submissions.

use hashbrown::HashMap;
use tracing::debug;

use super::{NativeFunction, RegistryError};
use crate::values::Value;

/// A registry entry: a callable function or a constant value.
#[derive(Debug, Clone)]
pub enum Plugin {
    Function(NativeFunction),
    Constant(Value),
}

impl Plugin {
    /// Name the plugin carries itself, if any.
    pub fn name(&self) -> Option<&str> {
        self.as_function().map(NativeFunction::name)
    }

    /// The function to invoke when the plugin is called.
    pub fn as_function(&self) -> Option<&NativeFunction> {
        match self {
            Plugin::Function(function) => Some(function),
            Plugin::Constant(value) => value.as_function(),
        }
    }

    /// Whether calls to this plugin receive the environment handle.
    pub fn wants_env(&self) -> bool {
        self.as_function().is_some_and(NativeFunction::wants_env)
    }

    /// Value a reference to the plugin's name evaluates to.
    pub fn to_value(&self) -> Value {
        match self {
            Plugin::Function(function) => Value::Function(function.clone()),
            Plugin::Constant(value) => value.clone(),
        }
    }
}

impl From<NativeFunction> for Plugin {
    fn from(function: NativeFunction) -> Self {
        Plugin::Function(function)
    }
}

impl From<Value> for Plugin {
    fn from(value: Value) -> Self {
        match value {
            Value::Function(function) => Plugin::Function(function),
            other => Plugin::Constant(other),
        }
    }
}

/// Name to plugin bindings. Host controlled; registering a name again
/// replaces the previous binding.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `plugin` under `name`, or under the plugin's own name when `name`
    /// is `None`.
    pub fn add(
        &mut self,
        plugin: impl Into<Plugin>,
        name: Option<&str>,
    ) -> Result<(), RegistryError> {
        let plugin = plugin.into();
        let name = match name.or(plugin.name()) {
            Some(name) => name.to_string(),
            None => return Err(RegistryError::Unnamed),
        };
        self.insert(name, plugin);
        Ok(())
    }

    /// Register a function under its own name.
    pub fn register(&mut self, function: NativeFunction) {
        self.insert(function.name().to_string(), Plugin::Function(function));
    }

    /// Register a function under `name` instead of its own.
    pub fn register_as(&mut self, name: &str, function: NativeFunction) {
        self.insert(name.to_string(), Plugin::Function(function));
    }

    fn insert(&mut self, name: String, plugin: Plugin) {
        debug!(plugin = %name, "registering plugin");
        self.plugins.insert(name, plugin);
    }

    pub fn has(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Plugin, RegistryError> {
        self.plugins
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPlugin {
                name: name.to_string(),
            })
    }

    pub fn remove(&mut self, name: &str) -> Option<Plugin> {
        self.plugins.remove(name)
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::CallArgs;
    use pretty_assertions::assert_eq;

    fn noop(name: &str) -> NativeFunction {
        NativeFunction::new(name, |_: CallArgs| Ok(Value::None))
    }

    #[test]
    fn test_add_derives_name_from_function() {
        let mut registry = PluginRegistry::new();
        registry.add(noop("print"), None).unwrap();
        registry.add(noop("ignored"), Some("alias")).unwrap();

        assert!(registry.has("print"));
        assert!(registry.has("alias"));
        assert!(!registry.has("ignored"));
        assert_eq!(registry.names(), vec!["alias", "print"]);
    }

    #[test]
    fn test_add_constant_needs_a_name() {
        let mut registry = PluginRegistry::new();
        assert_eq!(
            registry.add(Value::int(3), None),
            Err(RegistryError::Unnamed)
        );
        registry.add(Value::int(3), Some("three")).unwrap();

        let plugin = registry.get("three").unwrap();
        assert_eq!(plugin.to_value(), Value::int(3));
        assert!(plugin.as_function().is_none());
        assert!(!plugin.wants_env());
    }

    #[test]
    fn test_function_value_becomes_function_plugin() {
        let mut registry = PluginRegistry::new();
        registry
            .add(Value::Function(noop("ctx").with_env()), None)
            .unwrap();

        let plugin = registry.get("ctx").unwrap();
        assert!(matches!(plugin, Plugin::Function(_)));
        assert!(plugin.wants_env());
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = PluginRegistry::new();
        registry.register(noop("f"));
        registry.register_as("f", noop("g"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("f").unwrap().name(), Some("g"));
    }

    #[test]
    fn test_get_unknown_plugin() {
        let registry = PluginRegistry::new();
        assert_eq!(
            registry.get("print").map(|_| ()),
            Err(RegistryError::UnknownPlugin {
                name: "print".to_string()
            })
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let mut registry = PluginRegistry::new();
        registry.register(noop("a"));
        registry.register(noop("b"));

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(!registry.is_empty());

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.has("b"));
    }
}
