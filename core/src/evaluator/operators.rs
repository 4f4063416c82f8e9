//! Binary and unary operator semantics on runtime values.
//!
//! Arithmetic is double precision; bitwise operators go through 32-bit two's
//! complement. Mixed operand kinds are coerced the way JavaScript does, which
//! only matters for untyped evaluation since inference rejects them.

use alloc::rc::Rc;
use core::cmp::Ordering;

use crate::errors::Error;
use crate::parser::{BinaryOp, UnaryOp};
use crate::values::{Value, format_number};

pub(crate) fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

pub(crate) fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// Objects, arrays and functions convert to their string form.
fn to_primitive(value: &Value) -> Value {
    if value.is_primitive() {
        value.clone()
    } else {
        Value::String(value.to_string())
    }
}

pub(super) fn eval_unary(op: UnaryOp, value: &Value) -> Value {
    match op {
        UnaryOp::Neg => Value::Number(-value.to_number()),
        UnaryOp::Plus => Value::Number(value.to_number()),
        UnaryOp::Not => Value::Boolean(!value.is_truthy()),
        UnaryOp::BitNot => Value::Number(f64::from(!to_int32(value.to_number()))),
    }
}

/// Evaluates a non-short-circuiting binary operator.
pub(super) fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Error> {
    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::BitAnd | BinaryOp::Shl | BinaryOp::Shr => {
            let l = to_int32(left.to_number());
            let r = to_int32(right.to_number());
            let shift = (r as u32) & 31;
            let n = match op {
                BinaryOp::BitOr => l | r,
                BinaryOp::BitXor => l ^ r,
                BinaryOp::BitAnd => l & r,
                BinaryOp::Shl => l.wrapping_shl(shift),
                _ => l >> shift,
            };
            Value::Number(f64::from(n))
        }
        BinaryOp::UShr => {
            let l = to_uint32(left.to_number());
            let shift = to_uint32(right.to_number()) & 31;
            Value::Number(f64::from(l >> shift))
        }
        BinaryOp::Eq => Value::Boolean(loose_equals(left, right)),
        BinaryOp::Ne => Value::Boolean(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Boolean(strict_equals(left, right)),
        BinaryOp::StrictNe => Value::Boolean(!strict_equals(left, right)),
        BinaryOp::Lt => Value::Boolean(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Gt => Value::Boolean(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Le => Value::Boolean(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Ge => Value::Boolean(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::In => Value::Boolean(contains(left, right)?),
        BinaryOp::Nullish => {
            if left.is_nullish() {
                right.clone()
            } else {
                left.clone()
            }
        }
    };
    Ok(value)
}

fn add(left: &Value, right: &Value) -> Value {
    let left = to_primitive(left);
    let right = to_primitive(right);
    match (&left, &right) {
        (Value::String(l), r) => Value::String(format!("{}{}", l, r)),
        (l, Value::String(r)) => Value::String(format!("{}{}", l, r)),
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// `===`: same kind and same value; composites compare by identity.
pub(crate) fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => l == r,
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Array(l), Value::Array(r)) => Rc::ptr_eq(l, r),
        (Value::Object(l), Value::Object(r)) => Rc::ptr_eq(l, r),
        (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
        _ => false,
    }
}

/// `==` with the usual coercions between numbers, strings and booleans.
pub(crate) fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (l, r) if core::mem::discriminant(l) == core::mem::discriminant(r) => {
            strict_equals(l, r)
        }
        (l, r) if l.is_nullish() || r.is_nullish() => l.is_nullish() && r.is_nullish(),
        (Value::Number(l), Value::String(_)) => *l == right.to_number(),
        (Value::String(_), Value::Number(r)) => left.to_number() == *r,
        (Value::Boolean(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Boolean(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (l, r) if !l.is_primitive() && r.is_primitive() => loose_equals(&to_primitive(l), r),
        (l, r) if l.is_primitive() && !r.is_primitive() => loose_equals(l, &to_primitive(r)),
        _ => false,
    }
}

/// Relational ordering. `None` when either side is `NaN` after conversion.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (to_primitive(left), to_primitive(right)) {
        (Value::String(l), Value::String(r)) => Some(l.encode_utf16().cmp(r.encode_utf16())),
        (l, r) => l.to_number().partial_cmp(&r.to_number()),
    }
}

/// `in`: key presence. Array keys are the valid indices and `length`.
fn contains(needle: &Value, haystack: &Value) -> Result<bool, Error> {
    let key = property_key(needle);
    match haystack {
        Value::Array(items) => Ok(key == "length" || is_index_key(&key, items.len())),
        Value::Object(fields) => Ok(fields.contains_key(key.as_str())),
        other => Err(Error::type_error(format!(
            "cannot use \"in\" to search in {:?}",
            other
        ))),
    }
}

fn property_key(key: &Value) -> String {
    match key {
        Value::Number(n) => format_number(*n),
        other => other.to_string(),
    }
}

/// Reads `object[key]`. Missing properties read as `undefined`.
pub(super) fn get_property(object: &Value, key: &Value) -> Result<Value, Error> {
    if object.is_nullish() {
        return Err(Error::type_error(format!(
            "cannot read properties of {} (reading {:?})",
            object,
            property_key(key)
        )));
    }
    let value = match (object, key) {
        (Value::Array(items), Value::Number(index)) => array_index(*index, items.len())
            .and_then(|i| items.get(i).cloned())
            .unwrap_or_default(),
        (Value::String(s), Value::Number(index)) => array_index(*index, usize::MAX)
            .and_then(|i| char::decode_utf16(s.encode_utf16().skip(i).take(1)).next())
            .and_then(Result::ok)
            .map_or(Value::Undefined, |c| Value::String(c.to_string())),
        (Value::Array(items), _) if property_key(key) == "length" => {
            Value::Number(items.len() as f64)
        }
        (Value::String(s), _) if property_key(key) == "length" => {
            Value::Number(s.encode_utf16().count() as f64)
        }
        (Value::Object(fields), key) => fields
            .get(property_key(key).as_str())
            .cloned()
            .unwrap_or_default(),
        _ => Value::Undefined,
    };
    Ok(value)
}

/// Whether `key` is the canonical spelling of an index below `len`
/// (`"1"`, not `"01"` or `"1.0"`).
fn is_index_key(key: &str, len: usize) -> bool {
    key.parse::<f64>()
        .ok()
        .filter(|index| format_number(*index) == key)
        .and_then(|index| array_index(index, len))
        .is_some()
}

fn array_index(index: f64, len: usize) -> Option<usize> {
    if index >= 0.0 && index.fract() == 0.0 && index < len as f64 {
        Some(index as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_int32_conversion() {
        assert_eq!(to_int32(4_294_967_295.0), -1);
        assert_eq!(to_int32(2_147_483_648.0), -2_147_483_648);
        assert_eq!(to_int32(-1.5), -1);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_uint32(-1.0), 4_294_967_295);
    }

    #[test]
    fn test_bitwise() {
        let eval = |op, l, r| eval_binary(op, &num(l), &num(r)).unwrap();
        assert_eq!(eval(BinaryOp::BitOr, 5.0, 3.0), num(7.0));
        assert_eq!(eval(BinaryOp::BitXor, 5.0, 3.0), num(6.0));
        assert_eq!(eval(BinaryOp::BitAnd, 5.5, 3.0), num(1.0));
        assert_eq!(eval(BinaryOp::Shl, 1.0, 33.0), num(2.0));
        assert_eq!(eval(BinaryOp::Shr, -8.0, 1.0), num(-4.0));
        assert_eq!(eval(BinaryOp::UShr, -1.0, 0.0), num(4_294_967_295.0));
        assert_eq!(eval_unary(UnaryOp::BitNot, &num(0.0)), num(-1.0));
    }

    #[test]
    fn test_remainder_keeps_dividend_sign() {
        let rem = eval_binary(BinaryOp::Rem, &num(-7.0), &num(3.0)).unwrap();
        assert_eq!(rem, num(-1.0));
    }

    #[test]
    fn test_add_concatenates_strings() {
        assert_eq!(add(&"a".into(), &"b".into()), Value::from("ab"));
        assert_eq!(add(&num(1.0), &"2".into()), Value::from("12"));
        assert_eq!(add(&num(1.0), &Value::Boolean(true)), num(2.0));
        assert_eq!(add(&Value::from(vec![1.0, 2.0]), &num(3.0)), Value::from("1,23"));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(!loose_equals(&Value::Null, &num(0.0)));
        assert!(loose_equals(&num(1.0), &"1".into()));
        assert!(loose_equals(&Value::Boolean(true), &num(1.0)));
        assert!(loose_equals(&Value::from(vec![1.0]), &"1".into()));
        assert!(!loose_equals(&num(f64::NAN), &num(f64::NAN)));
    }

    #[test]
    fn test_strict_equality_uses_identity_for_composites() {
        let array = Value::from(vec![1.0]);
        assert!(strict_equals(&array, &array.clone()));
        assert!(!strict_equals(&array, &Value::from(vec![1.0])));
        assert!(!strict_equals(&num(1.0), &"1".into()));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(&num(1.0), &num(2.0)), Some(Ordering::Less));
        assert_eq!(compare(&"b".into(), &"a".into()), Some(Ordering::Greater));
        assert_eq!(compare(&"10".into(), &num(9.0)), Some(Ordering::Greater));
        assert_eq!(compare(&"10".into(), &"9".into()), Some(Ordering::Less));
        assert_eq!(compare(&num(f64::NAN), &num(1.0)), None);
    }

    #[test]
    fn test_in() {
        let haystack = Value::from(vec![5.0, 6.0]);
        assert!(contains(&num(0.0), &haystack).unwrap());
        assert!(contains(&num(1.0), &haystack).unwrap());
        assert!(!contains(&num(5.0), &haystack).unwrap());
        assert!(!contains(&num(0.5), &haystack).unwrap());
        assert!(contains(&"1".into(), &haystack).unwrap());
        assert!(!contains(&"01".into(), &haystack).unwrap());
        assert!(contains(&"length".into(), &haystack).unwrap());
        let object = Value::object([("a", Value::Null)]);
        assert!(contains(&"a".into(), &object).unwrap());
        assert!(contains(&num(1.0), &num(1.0)).unwrap_err().is_type());
    }

    #[test]
    fn test_get_property() {
        let array = Value::from(vec![10.0, 20.0]);
        assert_eq!(get_property(&array, &num(1.0)).unwrap(), num(20.0));
        assert_eq!(get_property(&array, &num(2.0)).unwrap(), Value::Undefined);
        assert_eq!(get_property(&array, &num(0.5)).unwrap(), Value::Undefined);
        assert_eq!(get_property(&array, &"length".into()).unwrap(), num(2.0));
        assert_eq!(get_property(&"héllo".into(), &num(1.0)).unwrap(), Value::from("é"));
        let object = Value::object([("1", Value::from("one"))]);
        assert_eq!(get_property(&object, &num(1.0)).unwrap(), Value::from("one"));
        assert!(get_property(&Value::Null, &"x".into()).unwrap_err().is_type());
    }
}
