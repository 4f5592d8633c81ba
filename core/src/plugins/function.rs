//! Native plugin functions and the arguments they are called with.

use core::fmt;
use std::rc::Rc;

use super::PluginError;
use crate::environment::ProtectedEnv;
use crate::values::Value;

/// Keyword under which the environment handle is passed to plugins that
/// ask for it.
pub const ENV_KEYWORD: &str = "env";

/// Signature of the Rust closures wrapped by [`NativeFunction`].
pub type NativeFn = dyn Fn(CallArgs<'_>) -> Result<Value, PluginError>;

/// A host function callable from submissions.
///
/// Whether the function receives the environment is fixed when it is built
/// with [`NativeFunction::with_env`]; the interpreter never inspects the
/// closure itself.
///
/// # Example
///
/// ```
/// use safeparse_core::plugins::{CallArgs, NativeFunction};
/// use safeparse_core::values::Value;
///
/// let double = NativeFunction::new("double", |args: CallArgs| {
///     let n = args.int_arg(0)?;
///     Ok(Value::int(n * 2))
/// });
/// assert_eq!(double.name(), "double");
/// assert!(!double.wants_env());
/// ```
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    wants_env: bool,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(CallArgs<'_>) -> Result<Value, PluginError> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            wants_env: false,
            func: Rc::new(func),
        }
    }

    /// Request the environment handle, passed as the `env` keyword.
    pub fn with_env(mut self) -> Self {
        self.wants_env = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wants_env(&self) -> bool {
        self.wants_env
    }

    pub fn call(&self, args: CallArgs<'_>) -> Result<Value, PluginError> {
        (self.func)(args)
    }

    /// Whether both handles wrap the same closure.
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("wants_env", &self.wants_env)
            .finish_non_exhaustive()
    }
}

/// Arguments of one plugin call.
pub struct CallArgs<'a> {
    args: Vec<Value>,
    kwargs: Vec<(String, Value)>,
    env: Option<ProtectedEnv<'a>>,
}

impl<'a> CallArgs<'a> {
    pub fn new(args: Vec<Value>, kwargs: Vec<(String, Value)>) -> Self {
        Self {
            args,
            kwargs,
            env: None,
        }
    }

    pub fn with_env(mut self, env: ProtectedEnv<'a>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn kwargs(&self) -> &[(String, Value)] {
        &self.kwargs
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn env(&self) -> Option<&ProtectedEnv<'a>> {
        self.env.as_ref()
    }

    pub fn env_mut(&mut self) -> Option<&mut ProtectedEnv<'a>> {
        self.env.as_mut()
    }

    /// The environment handle, or an argument error when none was passed.
    pub fn require_env(&mut self) -> Result<&mut ProtectedEnv<'a>, PluginError> {
        self.env
            .as_mut()
            .ok_or_else(|| PluginError::Argument("environment handle not provided".to_string()))
    }

    /// Fail unless exactly `count` positional arguments were passed.
    pub fn expect_arity(&self, count: usize) -> Result<(), PluginError> {
        if self.args.len() != count {
            return Err(PluginError::Argument(format!(
                "expected {} positional argument(s), got {}",
                count,
                self.args.len()
            )));
        }
        Ok(())
    }

    /// Positional argument `index` as an integer.
    pub fn int_arg(&self, index: usize) -> Result<i64, PluginError> {
        match self.args.get(index) {
            Some(Value::Int(n)) => Ok(*n),
            Some(other) => Err(PluginError::Argument(format!(
                "argument {} must be int, not {}",
                index,
                other.type_name()
            ))),
            None => Err(PluginError::Argument(format!(
                "missing positional argument {}",
                index
            ))),
        }
    }
}
