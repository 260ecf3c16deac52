//! Type tests and equality.

use super::{add, expect_arity};
use crate::interpreter::environment::Env;
use crate::value::{self, Value, ValueKind};

pub(super) fn install(env: &Env) {
    add(env, "number?", |args, _| {
        expect_arity!(args, 1, "number?");
        Ok(Value::bool_of(matches!(
            &*args[0].borrow(),
            ValueKind::Number(_)
        )))
    });

    add(env, "string?", |args, _| {
        expect_arity!(args, 1, "string?");
        Ok(Value::bool_of(matches!(
            &*args[0].borrow(),
            ValueKind::Str(_)
        )))
    });

    add(env, "symbol?", |args, _| {
        expect_arity!(args, 1, "symbol?");
        Ok(Value::bool_of(matches!(
            &*args[0].borrow(),
            ValueKind::Symbol(_)
        )))
    });

    // A pair is a cons cell or a non-empty list.
    add(env, "pair?", |args, _| {
        expect_arity!(args, 1, "pair?");
        let is_pair = match &*args[0].borrow() {
            ValueKind::Cons(_, _) => true,
            ValueKind::List(elements) => !elements.is_empty(),
            _ => false,
        };
        Ok(Value::bool_of(is_pair))
    });

    add(env, "list?", |args, _| {
        expect_arity!(args, 1, "list?");
        Ok(Value::bool_of(matches!(
            &*args[0].borrow(),
            ValueKind::List(_)
        )))
    });

    add(env, "null?", |args, _| {
        expect_arity!(args, 1, "null?");
        Ok(Value::bool_of(is_null(&args[0])))
    });

    add(env, "not", |args, _| {
        expect_arity!(args, 1, "not");
        Ok(Value::bool_of(args[0].is_false()))
    });

    add(env, "eq?", |args, _| {
        expect_arity!(args, 2, "eq?");
        Ok(Value::bool_of(value::eq(&args[0], &args[1])))
    });

    add(env, "equal?", |args, _| {
        expect_arity!(args, 2, "equal?");
        Ok(Value::bool_of(value::equal(&args[0], &args[1])))
    });
}

/// True only for the empty list.
pub(super) fn is_null(value: &Value) -> bool {
    match &*value.borrow() {
        ValueKind::List(elements) => elements.is_empty(),
        _ => false,
    }
}
