//! Calling plugins from submissions.

mod cases;

use pretty_assertions::assert_eq;
use safeparse::{CallArgs, ErrorKind, Interpreter, NativeFunction, Value};

test_case!(
    positional_and_keyword_arguments,
    input: "c = collect(1, [2], key='v')",
    result: Ok("{'c': [1, [2], ('key', 'v')]}"),
);

test_case!(
    nested_calls,
    input: "z = double(double(3))",
    result: Ok("{'z': 12}"),
);

test_case!(
    bare_call_statement_binds_nothing,
    input: "double(1)\ncollect()",
    result: Ok("{}"),
);

test_case!(
    plugin_passed_as_argument,
    input: "c = collect(double, answer)",
    result: Ok("{'c': [<plugin double>, 42]}"),
);

test_case!(
    argument_error,
    input: "x = double('a')",
    result: Err("l.1: double() failed: invalid argument: argument 0 must be int, not str"),
);

test_case!(
    unknown_plugin_checked_before_arguments,
    input: "nope(put('side', 1))",
    result: Err("l.1: Unknown plugin nope"),
    environment: "{}",
);

test_case!(
    arguments_evaluated_left_to_right,
    input: "c = collect(put('a', 1), get('a'))",
    result: Ok("{'a': 1, 'c': [None, 1]}"),
);

test_case!(
    env_keyword_supplied_by_caller,
    input: "ctx(env=1)",
    result: Err("l.1: ctx() got multiple values for keyword argument 'env'"),
);

test_case!(
    env_handle_supplied_by_caller,
    input: "ctx(env=__env__)",
    result: Err("l.1: ctx() got multiple values for keyword argument 'env'"),
);

test_case!(
    handle_passed_to_plain_plugin,
    input: "c = collect(env=__env__)",
    result: Ok("{'c': []}"),
);

test_case!(
    env_plugin_inside_container,
    before: "a = 1",
    input: "b = [ctx(), {'n': ctx()}]",
    result: Ok("{'a': 1, 'b': [1, {'n': 1}]}"),
);

#[test]
fn registry_changes_apply_to_later_submissions() {
    let mut interpreter = cases::interpreter();
    assert_eq!(
        cases::run(&mut interpreter, "x = triple(2)"),
        Err("l.1: Unknown plugin triple".to_string())
    );

    interpreter.register(NativeFunction::new("triple", |args: CallArgs| {
        Ok(Value::int(args.int_arg(0)? * 3))
    }));
    assert_eq!(
        cases::run(&mut interpreter, "x = triple(2)"),
        Ok("{'x': 6}".to_string())
    );

    interpreter.registry_mut().remove("triple");
    assert_eq!(
        cases::run(&mut interpreter, "y = triple(2)"),
        Err("l.1: Unknown plugin triple".to_string())
    );
}

#[test]
fn constant_added_under_name() {
    let mut interpreter = Interpreter::new();
    interpreter
        .add(Value::str("prod"), Some("stage"))
        .expect("named constant");
    interpreter.parse("s = [stage]").expect("submission");

    assert_eq!(interpreter.environment().to_string(), "{'s': ['prod']}");
}

#[test]
fn plugin_error_keeps_the_plugin_error() {
    let mut interpreter = cases::interpreter();
    let err = interpreter.parse("\nfail()").unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Plugin { ref name, .. } if name == "fail"));
    assert_eq!(err.line, Some(2));
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("E005"));
}
