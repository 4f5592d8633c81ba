//! End-to-end submissions through the public interpreter.

mod cases;

test_case!(
    literal_list,
    input: r#"x = [1, 2.5, "s", True, None]"#,
    result: Ok("{'x': [1, 2.5, 's', True, None]}"),
);

test_case!(
    plugin_call,
    input: "y = double(3)",
    result: Ok("{'y': 6}"),
);

test_case!(
    unknown_plugin,
    input: r#"print("hi")"#,
    result: Err("l.1: Unknown plugin print"),
    environment: "{}",
);

test_case!(
    chained_assignment,
    input: "a = b = 0",
    result: Err("l.1: Illegal assignment into multiple targets"),
    environment: "{}",
);

test_case!(
    env_plugin_counts_visible_entries,
    before: "a = 1\nb = 2",
    input: "z = ctx()",
    result: Ok("{'a': 1, 'b': 2, 'z': 2}"),
);

test_case!(
    nested_containers,
    input: "a = {'k': [1, {2}], 3: None, 'e': {}}",
    result: Ok("{'a': {'k': [1, {2}], 3: None, 'e': {}}}"),
);

test_case!(
    negative_number_is_an_operator,
    input: "d = -4",
    result: Err("l.1: Illegal syntax"),
);

test_case!(
    names_refer_to_earlier_statements,
    input: indoc::indoc! {"
        a = [1]
        b = {'a': a, 'n': answer}
    "},
    result: Ok("{'a': [1], 'b': {'a': [1], 'n': 42}}"),
);

test_case!(
    undefined_name,
    input: "a = 1\nb = [a, c]",
    result: Err("l.2: name 'c' is not defined"),
    environment: "{'a': 1}",
);

test_case!(
    plugin_failure_reports_plugin,
    input: "x = fail()",
    result: Err("l.1: fail() failed: boom"),
    environment: "{}",
);

test_case!(
    constant_plugin_called,
    input: "x = answer()",
    result: Err("l.1: plugin answer is not callable"),
);

test_case!(
    unhashable_set_element,
    input: "x = {1, [2]}",
    result: Err("l.1: unhashable type: 'list'"),
);

test_case!(
    empty_submission,
    before: "a = 1",
    input: "",
    result: Ok("{'a': 1}"),
);

test_case!(
    comments_and_blank_lines,
    input: indoc::indoc! {"
        # settings
        a = 1

        b = double(a)  # doubled
    "},
    result: Ok("{'a': 1, 'b': 2}"),
);

#[test]
fn syntax_error_is_reported_with_line() {
    let mut interpreter = cases::interpreter();
    let err = interpreter.parse("a = 1\nb = [1,").unwrap_err();

    assert!(matches!(err.kind, safeparse::ErrorKind::Syntax(_)), "{:?}", err);
    assert_eq!(err.line, Some(2));
    assert!(err.to_string().starts_with("l.2: "));
    assert!(interpreter.environment().is_empty());
}

test_case!(
    long_operator_chain_hits_depth_limit,
    input: &format!("x = {}0", "not ".repeat(5_000)),
    result: Err("l.1: nesting depth 201 exceeds maximum of 200 levels"),
    environment: "{}",
);

test_case!(
    integer_outside_i64,
    input: "x = 100000000000000000000",
    result: Err("l.1: invalid number literal '100000000000000000000'"),
);
