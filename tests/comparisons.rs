/*
 * Equality and relational operators.
 */

mod cases;

test_case! {
    name: greater_than,
    input: "n > 2",
    result: "boolean",
    value: true,
}

test_case! {
    name: string_ordering,
    input: r#""a" < "b""#,
    result: "boolean",
    value: true,
}

test_case! {
    name: string_equality,
    input: r#"s == "str""#,
    result: "boolean",
    value: true,
}

test_case! {
    name: inequality,
    input: "n != 3",
    result: "boolean",
    value: false,
}

test_case! {
    name: strict_equality,
    input: "n === 3",
    result: "boolean",
    value: true,
}

test_case! {
    name: nullable_compares_with_value,
    input: "maybe == 3",
    result: "boolean",
    value: false,
}

test_case! {
    name: nullable_does_not_merge_with_null,
    input: "maybe == null",
    result: "boolean",
    error: "TypeError: require number got null",
}

test_case! {
    name: arrays_are_not_comparable,
    input: "nums == nums",
    result: "boolean",
    error: "TypeError: require simple got array(number)",
}

test_case! {
    name: mixed_ordering,
    input: "n < s",
    result: "boolean",
    error: "TypeError: require number got string",
}

test_case! {
    name: boolean_ordering,
    input: "flag < true",
    result: "boolean",
    error: "TypeError: require number or string got boolean",
}

test_case! {
    name: untyped_loose_equality,
    input: r#""1" == 1"#,
    untyped: true,
}

test_case! {
    name: untyped_strict_equality,
    input: r#""1" === 1"#,
    untyped: false,
}

test_case! {
    name: untyped_null_equals_undefined,
    input: "null == undefined",
    untyped: true,
}

test_case! {
    name: untyped_strings_compare_by_code_unit,
    input: r#""10" < "9""#,
    untyped: true,
}

test_case! {
    name: untyped_mixed_compare_is_numeric,
    input: r#""10" < 9"#,
    untyped: false,
}
