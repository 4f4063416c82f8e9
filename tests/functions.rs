/*
 * Calls to host functions.
 */

mod cases;

test_case! {
    name: call,
    input: "upper(s)",
    result: "string",
    value: "STR",
}

test_case! {
    name: call_two_arguments,
    input: "max(n, 10)",
    result: "number",
    value: 10,
}

test_case! {
    name: call_in_expression,
    input: r#"upper(user.name) + "!""#,
    result: "string",
    value: "ADA!",
}

test_case! {
    name: extra_arguments_are_passed,
    input: "max(1, 2, 3)",
    result: "number",
    value: 2,
}

test_case! {
    name: wrong_argument,
    input: "upper(n)",
    result: "string",
    error: "TypeError: require string got number for argument 1",
}

test_case! {
    name: missing_argument,
    input: "max(1)",
    result: "number",
    error: "TypeError: require number got null for argument 2",
}

test_case! {
    name: optional_argument,
    input: "upper(maybe)",
    result: "string",
    error: "TypeError: require string got optional(number) for argument 1",
}

test_case! {
    name: call_non_function,
    input: "n(1)",
    result: "number",
    error: "TypeError: require function got number",
}

test_case! {
    name: call_result_mismatch,
    input: "upper(s)",
    result: "number",
    error: "TypeError: require number got string",
}

#[test]
fn untyped_call_non_function() {
    let values = cases::values();
    let err = typex::eval_untyped("s()", &values, &typex::Value::Undefined).unwrap_err();
    assert_eq!(err.to_string(), r#"TypeError: "str" is not a function"#);
}
