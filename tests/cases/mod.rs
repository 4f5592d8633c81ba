#![allow(dead_code)]

use once_cell::sync::Lazy;
use safeparse::{CallArgs, Interpreter, NativeFunction, PluginError, PluginRegistry, Value};

/// Plugins available to every test case.
pub fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();

    registry.register(NativeFunction::new("double", |args: CallArgs| {
        Ok(Value::int(args.int_arg(0)? * 2))
    }));
    registry.register(NativeFunction::new("collect", |args: CallArgs| {
        let mut items = args.args().to_vec();
        for (key, value) in args.kwargs() {
            items.push(Value::tuple([Value::str(key.as_str()), value.clone()]));
        }
        Ok(Value::list(items))
    }));
    registry.register(NativeFunction::new("fail", |_: CallArgs| {
        Err(PluginError::Failed("boom".to_string()))
    }));
    registry
        .add(Value::int(42), Some("answer"))
        .expect("constant plugin");

    // Plugins below receive the environment handle.
    registry.register(
        NativeFunction::new("ctx", |mut args: CallArgs| {
            Ok(Value::int(args.require_env()?.len() as i64))
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("keys", |mut args: CallArgs| {
            let env = args.require_env()?;
            Ok(Value::list(env.keys().map(Value::str)))
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("get", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            Ok(args.require_env()?.get(&key)?.clone())
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("get_or", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            let default = args.arg(1).cloned().unwrap_or(Value::None);
            Ok(args.require_env()?.get_or(&key, default))
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("has", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            Ok(Value::bool(args.require_env()?.contains_key(&key)))
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("put", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            let value = args.arg(1).cloned().unwrap_or(Value::None);
            args.require_env()?.insert(key, value)?;
            Ok(Value::None)
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("delete", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            Ok(args.require_env()?.remove(&key)?)
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("pop_or", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            let default = args.arg(1).cloned().unwrap_or(Value::None);
            Ok(args.require_env()?.pop_or(&key, default))
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("take", |mut args: CallArgs| {
            let (key, value) = args.require_env()?.pop_last()?;
            Ok(Value::tuple([Value::str(key), value]))
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("setdefault", |mut args: CallArgs| {
            let key = str_arg(&args, 0)?;
            let default = args.arg(1).cloned().unwrap_or(Value::None);
            Ok(args.require_env()?.set_default(&key, default)?.clone())
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("merge", |mut args: CallArgs| {
            let entries = args.kwargs().to_vec();
            args.require_env()?.update(entries);
            Ok(Value::None)
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("wipe", |mut args: CallArgs| {
            args.require_env()?.clear();
            Ok(Value::None)
        })
        .with_env(),
    );
    registry.register(
        NativeFunction::new("show", |mut args: CallArgs| {
            Ok(Value::str(args.require_env()?.to_string()))
        })
        .with_env(),
    );

    registry
}

fn str_arg(args: &CallArgs<'_>, index: usize) -> Result<String, PluginError> {
    match args.arg(index) {
        Some(Value::Str(s)) => Ok(s.clone()),
        _ => Err(PluginError::Argument(format!("argument {} must be str", index))),
    }
}

pub fn interpreter() -> Interpreter {
    Interpreter::new().with_registry(registry())
}

/// Expected outcome of a submission: the environment it leaves, or the
/// error it fails with, both in display form.
pub fn expected(result: Result<&str, &str>) -> Result<String, String> {
    result.map(str::to_string).map_err(str::to_string)
}

/// Run `input` and return the display form of its outcome.
pub fn run(interpreter: &mut Interpreter, input: &str) -> Result<String, String> {
    interpreter
        .parse(input)
        .map(|env| env.to_string())
        .map_err(|err| err.to_string())
}

/// A submission that must be rejected before anything runs.
pub struct RejectionCase {
    pub name: &'static str,
    pub input: &'static str,
    pub error: &'static str,
}

pub static REJECTIONS: Lazy<Vec<RejectionCase>> = Lazy::new(|| {
    vec![
        RejectionCase {
            name: "import",
            input: "import os",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "function_definition",
            input: "def f():\n    return 1",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "loop",
            input: "for i in x:\n    f(i)",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "conditional",
            input: "if a:\n    b = 1",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "binary_operator",
            input: "a = 1\nb = a + 1",
            error: "l.2: Illegal syntax",
        },
        RejectionCase {
            name: "comparison",
            input: "a = 1 < 2",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "attribute_access",
            input: "a = os.environ",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "attribute_callee",
            input: "os.system('rm -rf /')",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "subscript",
            input: "a = b[0]",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "lambda_argument",
            input: "double(lambda: 1)",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "bare_name_statement",
            input: "answer",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "tuple_literal",
            input: "a = (1, 2)",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "nested_in_container",
            input: "a = [1, {'k': b.c}]",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "augmented_assignment",
            input: "a += 1",
            error: "l.1: Illegal syntax",
        },
        RejectionCase {
            name: "multiple_targets",
            input: "a = b = 0",
            error: "l.1: Illegal assignment into multiple targets",
        },
        RejectionCase {
            name: "tuple_target",
            input: "a, b = 0, 1",
            error: "l.1: Illegal assignment into tuple",
        },
        RejectionCase {
            name: "plugin_target",
            input: "double = 1",
            error: "l.1: Illegal assignment into plugin double",
        },
        RejectionCase {
            name: "hidden_target",
            input: "\n\n__env__ = 1",
            error: "l.3: Illegal assignment into double-underscore variable __env__",
        },
    ]
});

/// Declare a test running one submission against [`interpreter`].
///
/// `before` is an optional submission that must succeed first. `result` is
/// the environment after `input` in display form, or the error it fails
/// with. `environment` additionally checks the environment after a failure.
#[macro_export]
macro_rules! test_case {
    (
        $name:ident,
        $(before: $before:expr,)?
        input: $input:expr,
        result: $result:expr
        $(, environment: $environment:expr)?
        $(,)?
    ) => {
        #[test]
        fn $name() {
            let mut interpreter = $crate::cases::interpreter();
            $(
                if let Err(err) = interpreter.parse($before) {
                    panic!("setup submission failed: {}", err);
                }
            )?
            pretty_assertions::assert_eq!(
                $crate::cases::run(&mut interpreter, $input),
                $crate::cases::expected($result),
            );
            $(
                pretty_assertions::assert_eq!(
                    interpreter.environment().to_string(),
                    $environment,
                );
            )?
        }
    };
}
