//! Stream built-ins over cons-stream pairs: the car is an ordinary value,
//! the cdr is a promise forced on demand.

use super::pairs::car_of;
use super::predicates::is_null;
use super::{add, expect_arity};
use crate::interpreter::environment::Env;
use crate::interpreter::error::RuntimeError;
use crate::value::{Value, ValueKind};

pub(super) fn install(env: &Env) {
    env.define("the-empty-stream", Value::empty_list());

    add(env, "stream-car", |args, _| {
        expect_arity!(args, 1, "stream-car");
        car_of(&args[0])
    });

    // Forces the delayed cdr before returning it.
    add(env, "stream-cdr", |args, evaluator| {
        expect_arity!(args, 1, "stream-cdr");
        let cdr = match &*args[0].borrow() {
            ValueKind::Cons(_, cdr) => cdr.clone(),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "first argument to 'stream-cdr' must be a cons, got {}",
                    other.type_name()
                )))
            }
        };
        evaluator.force(&cdr)
    });

    add(env, "stream-null?", |args, _| {
        expect_arity!(args, 1, "stream-null?");
        Ok(Value::bool_of(is_null(&args[0])))
    });
}
