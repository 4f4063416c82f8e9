/*
 * Logical operators, negation and the conditional operator.
 */

mod cases;

test_case! {
    name: and,
    input: "flag && n > 1",
    result: "boolean",
    value: true,
}

test_case! {
    name: or,
    input: "!flag || false",
    result: "boolean",
    value: false,
}

test_case! {
    name: not_string,
    input: "!s",
    result: "boolean",
    value: false,
}

test_case! {
    name: conditional,
    input: r#"flag ? "yes" : "no""#,
    result: "string",
    value: "yes",
}

test_case! {
    name: nested_conditional_is_right_associative,
    input: "n > 5 ? 1 : n > 2 ? 2 : 3",
    result: "number",
    value: 2,
}

test_case! {
    name: conditional_needs_boolean_test,
    input: "n ? 1 : 2",
    result: "number",
    error: "TypeError: require boolean got number",
}

test_case! {
    name: conditional_branches_must_merge,
    input: r#"flag ? 1 : "x""#,
    result: "number",
    error: "TypeError: require number got string",
}

test_case! {
    name: and_needs_booleans,
    input: "n && flag",
    result: "boolean",
    error: "TypeError: require boolean got number",
}

test_case! {
    name: not_needs_primitive,
    input: "!nums",
    result: "boolean",
    error: "TypeError: require boolean, number or string got array(number)",
}

test_case! {
    name: untyped_or_returns_operand,
    input: r#"0 || "fallback""#,
    untyped: "fallback",
}

test_case! {
    name: untyped_and_short_circuits,
    input: "null && missing()",
    untyped: typex::Value::Null,
}
