use core::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::api::{Binding, DescriptorSyntax, ExecutionOptions, Vm, VmOptions, lit};
use crate::errors::{Error, ErrorKind};
use crate::test_utils::init_test_logging;
use crate::types::TypeModel;
use crate::values::Value;

fn to_string_fn() -> Value {
    Value::function("f", |args: &[Value]| {
        Ok(Value::String(args.first().cloned().unwrap_or_default().to_string()))
    })
}

fn compact_vm() -> Vm {
    Vm::with_options(VmOptions {
        descriptor_syntax: DescriptorSyntax::Compact,
        ..VmOptions::default()
    })
}

#[test]
fn test_simple() {
    init_test_logging();
    let vm = compact_vm();
    let empty = lit(());

    assert_eq!(vm.eval("n", "1+1", &empty).unwrap(), Value::Number(2.0));
    assert_eq!(vm.eval("s", r#""a" + "b""#, &empty).unwrap(), Value::from("ab"));

    let err = vm.eval("s", "1+1", &empty).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("require string got number"), "{}", err);
}

#[test]
fn test_object() {
    let mut vm = compact_vm();
    let empty = lit(());

    vm.set(
        "obj",
        "{str:s,num:n}",
        Value::object([("str", Value::from("test")), ("num", Value::from(42))]),
    )
    .unwrap();
    assert_eq!(vm.eval("n", "obj.num", &empty).unwrap(), Value::Number(42.0));
    assert_eq!(vm.eval("s", "obj.str", &empty).unwrap(), Value::from("test"));

    let err = vm.eval("n", "invalid.value", &empty).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Reference);
    assert!(err.message.contains("\"invalid\" not found"));

    let err = vm.eval("n", "obj.invalid", &empty).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Reference);
    assert!(err.message.contains("\"invalid\" not exists in object"));
}

#[test]
fn test_function() {
    let mut vm = compact_vm();
    let empty = lit(());

    vm.set_binding("v", lit(42));
    vm.set("f", "f(n->s)", to_string_fn()).unwrap();

    assert_eq!(vm.eval("s", "f(v)", &empty).unwrap(), Value::from("42"));

    let err = vm.eval("s", "f(true)", &empty).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("require number got boolean"), "{}", err);

    let err = vm.eval("s", "f()", &empty).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("require number got null"), "{}", err);
}

#[test]
fn test_compile() {
    let mut vm = compact_vm();
    vm.set("f", "f(n->s)", to_string_fn()).unwrap();

    let compiled = vm.compile("s", "f(this)", "n").unwrap();
    assert_eq!(compiled.run(&Value::from(5)).unwrap(), Value::from("5"));
    assert_eq!(compiled.run(&Value::from(-1.5)).unwrap(), Value::from("-1.5"));
    assert_eq!(compiled.result_type(), &TypeModel::string());

    let err = vm.compile("s", "this", "n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("require string got number"));
}

#[test]
fn test_compile_checks_once() {
    let calls = Rc::new(Cell::new(0));
    let mut vm = Vm::new();
    let counter = Rc::clone(&calls);
    vm.set(
        "inc",
        "function(number) number",
        Value::function("inc", move |args: &[Value]| {
            counter.set(counter.get() + 1);
            Ok(Value::Number(args[0].to_number() + 1.0))
        }),
    )
    .unwrap();

    let compiled = vm.compile("number", "inc(this) * 2", "number").unwrap();
    let run = compiled.into_fn();
    assert_eq!(run(&Value::from(1)).unwrap(), Value::Number(4.0));
    assert_eq!(run(&Value::from(10)).unwrap(), Value::Number(22.0));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_compiled_run_validates_this() {
    let vm = Vm::new();
    let compiled = vm.compile("number", "this + 1", "number").unwrap();
    let err = compiled.run(&Value::from("1")).unwrap_err();
    assert_eq!(err.message, "Model validation failed");
    // Skipping validation runs with JavaScript semantics.
    assert_eq!(compiled.run_unchecked(&Value::from("1")).unwrap(), Value::from("11"));
}

#[test]
fn test_failed_check_never_calls_host() {
    let calls = Rc::new(Cell::new(0));
    let mut vm = Vm::new();
    let counter = Rc::clone(&calls);
    vm.set(
        "effect",
        "function() number",
        Value::function("effect", move |_: &[Value]| {
            counter.set(counter.get() + 1);
            Ok(Value::Number(1.0))
        }),
    )
    .unwrap();

    assert!(vm.eval("number", "effect() + 'x'", &lit(())).is_err());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_eval_rechecks_result_value() {
    let mut vm = Vm::new();
    // Declared to return a string, actually returns a number.
    vm.set(
        "liar",
        "function() string",
        Value::function("liar", |_: &[Value]| Ok(Value::Number(1.0))),
    )
    .unwrap();

    let err = vm.eval("string", "liar()", &lit(())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.message, "invalid result type");
}

#[test]
fn test_host_error_propagates() {
    let mut vm = Vm::new();
    vm.set(
        "boom",
        "function() number",
        Value::function("boom", |_: &[Value]| Err(Error::runtime("exploded"))),
    )
    .unwrap();
    let err = vm.eval("number", "boom()", &lit(())).unwrap_err();
    assert_eq!(err, Error::runtime("exploded"));
}

#[test]
fn test_set_validates() {
    let mut vm = Vm::new();
    vm.set("x", "number", 1).unwrap();

    let err = vm.set("x", "number", "one").unwrap_err();
    assert_eq!(err.to_string(), "TypeError: Model validation failed");
    // The failed set leaves the old binding in place.
    assert_eq!(vm.get("x").unwrap().value(), &Value::Number(1.0));

    assert!(vm.set("y", "numbr", 1).unwrap_err().is_syntax());
}

#[test]
fn test_get_and_delete() {
    let mut vm = Vm::new();
    vm.set("x", "optional(string)", Value::Null).unwrap();
    assert_eq!(
        vm.get("x").unwrap().model(),
        &TypeModel::nullable(TypeModel::string())
    );

    let removed = vm.delete("x").unwrap();
    assert_eq!(removed.value(), &Value::Null);
    assert!(vm.get("x").is_none());
    assert!(vm.delete("x").is_none());
    assert!(vm.eval("optional(string)", "x", &lit(())).unwrap_err().is_reference());
}

#[test]
fn test_this_binding() {
    let vm = Vm::new();
    let this = Binding::new(
        "object(items: array(number))".parse().unwrap(),
        Value::object([("items", Value::from(vec![3.0, 4.0]))]),
    )
    .unwrap();
    assert_eq!(
        vm.eval("optional(number)", "this.items[1]", &this).unwrap(),
        Value::Number(4.0)
    );
    assert_eq!(
        vm.eval("optional(number)", "this.items[5]", &this).unwrap(),
        Value::Undefined
    );
    assert_eq!(
        vm.eval("number", "this.items[5] ?? 0", &this).unwrap(),
        Value::Number(0.0)
    );
}

#[test]
fn test_object_entry_order_matters() {
    let mut vm = Vm::new();
    let value = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
    vm.set("ab", "object(a: number, b: string)", value.clone()).unwrap();
    vm.set("ba", "object(b: string, a: number)", value).unwrap();

    let err = vm
        .check("boolean", "(true ? ab : ba) == null", "null")
        .unwrap_err();
    assert!(err.message.starts_with("cannot merge incompatible object"), "{}", err);

    assert!(vm.check("object(a: number, b: string)", "ab", "null").is_ok());
    assert!(vm.check("object(a: number, b: string)", "ba", "null").is_err());
}

#[test]
fn test_check_returns_inferred_type() {
    let mut vm = Vm::new();
    vm.set("maybe", "optional(number)", Value::Null).unwrap();
    assert_eq!(
        vm.check("optional(number)", "maybe ?? 1", "null").unwrap(),
        TypeModel::number()
    );
}

#[test]
fn test_expression_tree_input() {
    use crate::parser::{BinaryOp, Expression};

    let vm = Vm::new();
    let expr = Expression::binary(
        BinaryOp::Mul,
        Expression::This,
        Expression::literal(3.0),
    );
    let this = Binding::new(TypeModel::number(), 14).unwrap();
    assert_eq!(vm.eval("number", &expr, &this).unwrap(), Value::Number(42.0));
}

#[test]
fn test_max_depth_from_options() {
    let vm = Vm::with_options(VmOptions {
        execution: ExecutionOptions { max_depth: 8 },
        ..VmOptions::default()
    });
    let source = format!("{}1", "-".repeat(20));
    let err = vm.eval("number", source.as_str(), &lit(())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceExceeded);

    assert_eq!(
        Vm::new().eval("number", source.as_str(), &lit(())).unwrap(),
        Value::Number(1.0)
    );
}

#[test]
fn test_in_tests_array_indices() {
    let mut vm = Vm::new();
    vm.set("nums", "array(number)", vec![5.0, 6.0]).unwrap();
    let empty = lit(());
    assert_eq!(vm.eval("boolean", "0 in nums", &empty).unwrap(), Value::Boolean(true));
    assert_eq!(vm.eval("boolean", "1 in nums", &empty).unwrap(), Value::Boolean(true));
    assert_eq!(vm.eval("boolean", "5 in nums", &empty).unwrap(), Value::Boolean(false));
}

#[test]
fn test_long_prefix_chain_fails_cleanly() {
    let source = format!("{}1", "-".repeat(100_000));
    let err = Vm::new().eval("number", source.as_str(), &lit(())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceExceeded);
    assert!(err.span.is_some());
}
