use pretty_assertions::assert_eq;

use crate::environment::{EnvError, Environment, ProtectedEnv};
use crate::values::Value;

fn backing() -> Environment {
    Environment::from([
        ("a", Value::int(1)),
        ("__hidden__", Value::str("secret")),
        ("b", Value::int(2)),
    ])
}

fn keys(env: &Environment) -> Vec<&str> {
    env.keys().collect()
}

#[test]
fn test_hidden_keys_are_not_observable() {
    let mut env = backing();
    let view = ProtectedEnv::new(&mut env);

    assert_eq!(view.len(), 2);
    assert!(!view.is_empty());
    assert!(!view.contains_key("__hidden__"));
    assert!(view.contains_key("a"));
    assert_eq!(view.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
        view.iter().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    assert_eq!(view.to_string(), "ProtectedEnv({'a': 1, 'b': 2})");
}

#[test]
fn test_single_key_operations_reject_hidden_keys() {
    let mut env = backing();
    let mut view = ProtectedEnv::new(&mut env);
    let protected = EnvError::ProtectedKey {
        key: "__hidden__".to_string(),
    };

    assert_eq!(view.get("__hidden__"), Err(protected.clone()));
    assert_eq!(
        view.insert("__hidden__", Value::None),
        Err(protected.clone())
    );
    assert_eq!(view.remove("__hidden__"), Err(protected.clone()));
    assert_eq!(view.pop("__hidden__"), Err(protected.clone()));
    assert_eq!(
        view.set_default("__hidden__", Value::None).map(Value::clone),
        Err(protected.clone())
    );
    assert_eq!(
        view.insert("__new__", Value::None),
        Err(EnvError::ProtectedKey {
            key: "__new__".to_string()
        })
    );

    assert_eq!(env.get("__hidden__"), Some(&Value::str("secret")));
    assert!(!env.contains_key("__new__"));
}

#[test]
fn test_defaults_answer_for_hidden_keys() {
    let mut env = backing();
    let mut view = ProtectedEnv::new(&mut env);

    assert_eq!(view.get_or("__hidden__", Value::int(0)), Value::int(0));
    assert_eq!(view.get_or("a", Value::int(0)), Value::int(1));
    assert_eq!(view.get_or("zzz", Value::None), Value::None);
    assert_eq!(view.pop_or("__hidden__", Value::int(0)), Value::int(0));
    assert_eq!(view.pop_or("b", Value::int(0)), Value::int(2));
    assert_eq!(view.pop_or("b", Value::int(0)), Value::int(0));

    assert_eq!(keys(&env), vec!["a", "__hidden__"]);
}

#[test]
fn test_missing_keys() {
    let mut env = backing();
    let mut view = ProtectedEnv::new(&mut env);
    let missing = EnvError::MissingKey {
        key: "zzz".to_string(),
    };

    assert_eq!(view.get("zzz"), Err(missing.clone()));
    assert_eq!(view.remove("zzz"), Err(missing));
}

#[test]
fn test_writes_through_to_backing_store() {
    let mut env = backing();
    let mut view = ProtectedEnv::new(&mut env);

    assert_eq!(view.insert("c", Value::int(3)), Ok(None));
    assert_eq!(view.insert("a", Value::int(10)), Ok(Some(Value::int(1))));
    assert_eq!(view.set_default("d", Value::int(4)), Ok(&Value::int(4)));
    assert_eq!(view.set_default("d", Value::int(5)), Ok(&Value::int(4)));
    assert_eq!(view.remove("b"), Ok(Value::int(2)));

    assert_eq!(keys(&env), vec!["a", "__hidden__", "c", "d"]);
    assert_eq!(env.get("a"), Some(&Value::int(10)));
}

#[test]
fn test_clear_keeps_hidden_entries() {
    let mut env = backing();
    let mut view = ProtectedEnv::new(&mut env);

    view.clear();
    assert!(view.is_empty());
    assert_eq!(view.len(), 0);
    assert_eq!(keys(&env), vec!["__hidden__"]);
}

#[test]
fn test_update_filters_hidden_keys() {
    let mut env = backing();
    let mut view = ProtectedEnv::new(&mut env);

    view.update([
        ("c", Value::int(3)),
        ("__builtins__", Value::dict([])),
        ("a", Value::int(10)),
    ]);

    assert_eq!(keys(&env), vec!["a", "__hidden__", "b", "c"]);
    assert_eq!(env.get("a"), Some(&Value::int(10)));
}

#[test]
fn test_pop_last_skips_trailing_hidden_entries() {
    let mut env = Environment::from([
        ("a", Value::int(1)),
        ("b", Value::int(2)),
        ("__x__", Value::int(3)),
        ("__y__", Value::int(4)),
    ]);
    let mut view = ProtectedEnv::new(&mut env);

    assert_eq!(view.pop_last(), Ok(("b".to_string(), Value::int(2))));
    assert_eq!(keys(&env), vec!["a", "__x__", "__y__"]);
    assert_eq!(env.get("__y__"), Some(&Value::int(4)));
}

#[test]
fn test_pop_last_interleaved_hidden_entries() {
    let mut env = Environment::from([
        ("__p__", Value::None),
        ("a", Value::int(1)),
        ("__q__", Value::None),
        ("b", Value::int(2)),
        ("__r__", Value::None),
        ("__s__", Value::None),
    ]);
    let mut view = ProtectedEnv::new(&mut env);

    assert_eq!(view.pop_last(), Ok(("b".to_string(), Value::int(2))));
    assert_eq!(view.pop_last(), Ok(("a".to_string(), Value::int(1))));
    assert_eq!(view.pop_last(), Err(EnvError::Empty));

    assert_eq!(keys(&env), vec!["__p__", "__q__", "__r__", "__s__"]);
}

#[test]
fn test_pop_last_on_empty_view() {
    let mut env = Environment::new();
    let mut view = ProtectedEnv::new(&mut env);
    assert_eq!(view.pop_last(), Err(EnvError::Empty));
}

#[test]
fn test_display_self_reference_is_opaque() {
    let mut env = Environment::from([("a", Value::int(0)), ("self", Value::Environment)]);
    let view = ProtectedEnv::new(&mut env);

    assert_eq!(
        view.to_string(),
        "ProtectedEnv({'a': 0, 'self': ProtectedEnv({...})})"
    );
}
