//! Higher-order built-ins and the value-level `and`/`or` fallbacks.

use super::{add, expect_arity};
use crate::interpreter::environment::Env;
use crate::interpreter::error::RuntimeError;
use crate::value::{Value, ValueKind};

pub(super) fn install(env: &Env) {
    // `(apply proc list)`: call proc with the list's elements as arguments.
    add(env, "apply", |args, evaluator| {
        expect_arity!(args, 2, "apply");
        let elements = match &*args[1].borrow() {
            ValueKind::List(elements) => elements.clone(),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "'apply' expected second argument to be a list, got {}",
                    other.type_name()
                )))
            }
        };
        evaluator.call_value(&args[0], &elements)
    });

    // `(map proc list…)`: all lists must have the same length; proc is
    // applied elementwise across them.
    add(env, "map", |args, evaluator| {
        if args.len() < 2 {
            return Err(RuntimeError::arity(format!(
                "'map' has been called with {} arguments; it requires at least 2 arguments",
                args.len()
            )));
        }
        let proc = &args[0];

        let mut rows: Vec<Vec<Value>> = Vec::new();
        for (i, arg) in args[1..].iter().enumerate() {
            match &*arg.borrow() {
                ValueKind::List(elements) => {
                    if i == 0 {
                        rows = elements.iter().map(|e| vec![e.clone()]).collect();
                        continue;
                    }
                    if elements.len() != rows.len() {
                        return Err(RuntimeError::type_error("all lists must have same size"));
                    }
                    for (row, element) in rows.iter_mut().zip(elements) {
                        row.push(element.clone());
                    }
                }
                other => {
                    return Err(RuntimeError::type_error(format!(
                        "'map' expected argument to be a list, got {}",
                        other.type_name()
                    )))
                }
            }
        }

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(evaluator.call_value(proc, &row)?);
        }
        Ok(Value::list(results))
    });

    add(env, "force", |args, evaluator| {
        expect_arity!(args, 1, "force");
        evaluator.force(&args[0])
    });

    // Value-level fallbacks for `and`/`or`. In call position the evaluator
    // short-circuits instead; these see already-evaluated arguments, which
    // is what a higher-order use (through `apply`, `map`) gets.
    add(env, "and", |args, _| {
        let mut last = Value::t();
        for arg in args {
            if arg.is_false() {
                return Ok(Value::f());
            }
            last = arg.clone();
        }
        Ok(last)
    });

    add(env, "or", |args, _| {
        for arg in args {
            if !arg.is_false() {
                return Ok(arg.clone());
            }
        }
        Ok(Value::f())
    });
}
