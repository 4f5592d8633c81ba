use pretty_assertions::assert_eq;

use crate::plugins::{CallArgs, NativeFunction};
use crate::values::Value;

#[test]
fn test_numbers_compare_across_types() {
    assert_eq!(Value::int(1), Value::bool(true));
    assert_eq!(Value::int(2), Value::float(2.0));
    assert_eq!(Value::float(0.0), Value::bool(false));
    assert_ne!(Value::int(1), Value::str("1"));
    assert_ne!(Value::None, Value::bool(false));
}

#[test]
fn test_list_and_tuple_differ() {
    assert_ne!(Value::list([Value::int(1)]), Value::tuple([Value::int(1)]));
    assert_eq!(
        Value::list([Value::int(1), Value::int(2)]),
        Value::list([Value::int(1), Value::int(2)])
    );
    assert_ne!(
        Value::list([Value::int(1), Value::int(2)]),
        Value::list([Value::int(2), Value::int(1)])
    );
}

#[test]
fn test_set_removes_duplicates_and_ignores_order() {
    let set = Value::set([Value::int(1), Value::bool(true), Value::int(2)]);
    assert_eq!(set.as_sequence().map(|items| items.len()), Some(2));
    assert_eq!(set, Value::set([Value::int(2), Value::int(1)]));
}

#[test]
fn test_dict_repeated_key_keeps_first_position() {
    let dict = Value::dict([
        (Value::str("a"), Value::int(1)),
        (Value::str("b"), Value::int(2)),
        (Value::str("a"), Value::int(3)),
    ]);
    assert_eq!(format!("{}", dict), "{'a': 3, 'b': 2}");
    assert_eq!(dict.get_item(&Value::str("a")), Some(&Value::int(3)));
    assert_eq!(dict.get_item(&Value::str("c")), None);
}

#[test]
fn test_hashable() {
    assert!(Value::int(1).is_hashable());
    assert!(Value::str("x").is_hashable());
    assert!(Value::tuple([Value::int(1), Value::None]).is_hashable());
    assert!(!Value::tuple([Value::list([])]).is_hashable());
    assert!(!Value::list([]).is_hashable());
    assert!(!Value::dict([]).is_hashable());
    assert!(!Value::set([]).is_hashable());
}

fn f_twin() -> NativeFunction {
    NativeFunction::new("f", |_: CallArgs| Ok(Value::None))
}

#[test]
fn test_functions_compare_by_identity() {
    let f = f_twin();
    let g = f_twin();

    assert_eq!(Value::Function(f.clone()), Value::Function(f));
    assert_ne!(Value::Function(g.clone()), Value::Function(f_twin()));
    assert_eq!(Value::Function(g).type_name(), "function");
}

#[test]
fn test_conversions() {
    assert_eq!(Value::from(3i64), Value::int(3));
    assert_eq!(Value::from("s"), Value::str("s"));
    assert_eq!(Value::from(None::<i64>), Value::None);
    assert_eq!(Value::from(Some(true)), Value::bool(true));
    assert_eq!(Value::from(vec![Value::None]).type_name(), "list");
}
