//! Arithmetic and numeric built-ins.
//!
//! Integer/integer arithmetic stays integer where possible; any float
//! operand, overflow, or inherently non-integral result promotes to float.

use rand::Rng;
use std::cmp::Ordering;

use super::{add, expect_arity, expect_number};
use crate::interpreter::environment::Env;
use crate::interpreter::error::RuntimeError;
use crate::value::{Number, Value};

fn compare(args: &[Value], name: &str) -> Result<Ordering, RuntimeError> {
    expect_arity!(args, 2, name);
    let left = expect_number!(args[0], name);
    let right = expect_number!(args[1], name);
    Ok(left.compare(right))
}

pub(super) fn install(env: &Env) {
    add(env, "+", |args, _| {
        let mut sum = Number::Int(0);
        for arg in args {
            sum = sum.add(expect_number!(arg, "+"));
        }
        Ok(Value::number(sum))
    });

    add(env, "-", |args, _| {
        if args.is_empty() {
            return Err(RuntimeError::arity("'-' requires at least one argument"));
        }
        let first = expect_number!(args[0], "-");
        if args.len() == 1 {
            return Ok(Value::number(first.neg()));
        }
        let mut result = first;
        for arg in &args[1..] {
            result = result.sub(expect_number!(arg, "-"));
        }
        Ok(Value::number(result))
    });

    add(env, "*", |args, _| {
        if args.is_empty() {
            return Err(RuntimeError::arity("'*' requires at least one argument"));
        }
        let mut product = Number::Int(1);
        for arg in args {
            product = product.mul(expect_number!(arg, "*"));
        }
        Ok(Value::number(product))
    });

    add(env, "/", |args, _| {
        if args.is_empty() {
            return Err(RuntimeError::arity("'/' requires at least one argument"));
        }
        let mut result = expect_number!(args[0], "/");
        for arg in &args[1..] {
            result = result.div(expect_number!(arg, "/"));
        }
        Ok(Value::number(result))
    });

    add(env, "remainder", |args, _| {
        expect_arity!(args, 2, "remainder");
        let a = expect_number!(args[0], "remainder");
        let b = expect_number!(args[1], "remainder");
        if a.is_int() && b.is_int() && b.num_eq(Number::Int(0)) {
            return Err(RuntimeError::domain("'remainder' undefined for 0"));
        }
        Ok(Value::number(a.rem(b)))
    });

    add(env, "sqrt", |args, _| {
        expect_arity!(args, 1, "sqrt");
        let n = expect_number!(args[0], "sqrt");
        Ok(Value::float(n.as_f64().sqrt()))
    });

    add(env, "abs", |args, _| {
        expect_arity!(args, 1, "abs");
        let n = expect_number!(args[0], "abs");
        Ok(Value::number(n.abs()))
    });

    add(env, ">", |args, _| {
        Ok(Value::bool_of(compare(args, ">")? == Ordering::Greater))
    });
    add(env, ">=", |args, _| {
        Ok(Value::bool_of(compare(args, ">=")? != Ordering::Less))
    });
    add(env, "<", |args, _| {
        Ok(Value::bool_of(compare(args, "<")? == Ordering::Less))
    });
    add(env, "<=", |args, _| {
        Ok(Value::bool_of(compare(args, "<=")? != Ordering::Greater))
    });
    add(env, "=", |args, _| {
        Ok(Value::bool_of(compare(args, "=")? == Ordering::Equal))
    });

    // `(random n)`: integer in [0, n) for an integer bound, float in [0, n)
    // for a float bound. The generator is seeded at evaluator construction.
    add(env, "random", |args, evaluator| {
        expect_arity!(args, 1, "random");
        let bound = expect_number!(args[0], "random");
        match bound {
            Number::Int(n) => {
                if n <= 0 {
                    return Err(RuntimeError::domain(
                        "'random' requires a positive bound",
                    ));
                }
                Ok(Value::int(evaluator.rng_mut().gen_range(0..n)))
            }
            Number::Float(f) => {
                let unit: f64 = evaluator.rng_mut().gen();
                Ok(Value::float(unit * f))
            }
        }
    });
}
