#![allow(dead_code)]

use std::collections::HashMap;

use typex::{Value, Vm};

/// VM with the bindings shared by the integration tests.
pub fn vm() -> Vm {
    let mut vm = Vm::new();
    vm.set("n", "number", 3).unwrap();
    vm.set("s", "string", "str").unwrap();
    vm.set("flag", "boolean", true).unwrap();
    vm.set("maybe", "optional(number)", Value::Null).unwrap();
    vm.set("nums", "array(number)", vec![1.0, 2.0, 3.0]).unwrap();
    vm.set("words", "array(string)", vec!["a", "b"]).unwrap();
    vm.set(
        "user",
        "object(name: string, age: number, email: optional(string))",
        Value::object([
            ("name", Value::from("Ada")),
            ("age", Value::from(36)),
            ("email", Value::Null),
        ]),
    )
    .unwrap();
    vm.set("upper", "function(string) string", upper()).unwrap();
    vm.set("max", "function(number, number) number", max()).unwrap();
    vm
}

/// The values of [`vm`] without their types, for untyped evaluation.
pub fn values() -> HashMap<String, Value> {
    let vm = vm();
    vm.environment()
        .names()
        .map(|name| (name.to_string(), vm.get(name).unwrap().value().clone()))
        .collect()
}

fn upper() -> Value {
    Value::function("upper", |args: &[Value]| {
        Ok(Value::String(args[0].to_string().to_uppercase()))
    })
}

fn max() -> Value {
    Value::function("max", |args: &[Value]| {
        Ok(Value::Number(args[0].to_number().max(args[1].to_number())))
    })
}

/// Declares one end-to-end test.
///
/// Typed cases evaluate `input` against the result descriptor and compare
/// either the value or the rendered error message. Untyped cases go through
/// `eval_untyped` with the same values and no checks.
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        result: $result:expr,
        value: $value:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let vm = $crate::cases::vm();
            let value = vm.eval($result, $input, &typex::lit(())).unwrap();
            pretty_assertions::assert_eq!(value, typex::Value::from($value));
        }
    };
    (
        name: $name:ident,
        input: $input:expr,
        result: $result:expr,
        error: $error:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let vm = $crate::cases::vm();
            let err = vm.eval($result, $input, &typex::lit(())).unwrap_err();
            pretty_assertions::assert_eq!(err.to_string(), $error);
        }
    };
    (
        name: $name:ident,
        input: $input:expr,
        untyped: $value:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let values = $crate::cases::values();
            let value = typex::eval_untyped($input, &values, &typex::Value::Undefined).unwrap();
            pretty_assertions::assert_eq!(value, typex::Value::from($value));
        }
    };
}
