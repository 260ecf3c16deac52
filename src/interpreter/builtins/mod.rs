//! Built-in procedures, installed into the global frame as first-class
//! values so they can flow through `apply` and `map`.
//!
//! Categories:
//! - **math**: arithmetic, comparison, `remainder`, `sqrt`, `abs`, `random`
//! - **pairs**: `cons`/`list`, accessors (`car`, `cdr`, `c[ad]+r`),
//!   `append`, `length`, `assoc`, `set-car!`/`set-cdr!`
//! - **predicates**: type tests, `null?`, `not`, `eq?`, `equal?`
//! - **higher_order**: `apply`, `map`, `force`, the `and`/`or` fallbacks
//! - **io**: `display`, `newline`, `print`, `error`, `read`
//! - **streams**: `stream-car`, `stream-cdr`, `stream-null?`,
//!   `the-empty-stream`

mod higher_order;
mod io;
mod math;
mod pairs;
mod predicates;
mod streams;

use std::rc::Rc;

use crate::interpreter::environment::Env;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::evaluator::Evaluator;
use crate::value::Value;

pub fn install(env: &Env) {
    math::install(env);
    pairs::install(env);
    predicates::install(env);
    higher_order::install(env);
    io::install(env);
    streams::install(env);
}

pub(crate) fn add(
    env: &Env,
    name: &str,
    func: impl Fn(&[Value], &mut Evaluator) -> Result<Value, RuntimeError> + 'static,
) {
    env.define(name, Value::builtin(name, Rc::new(func)));
}

macro_rules! expect_arity {
    ($args:expr, $n:expr, $name:expr) => {
        if $args.len() != $n {
            return Err($crate::interpreter::error::RuntimeError::arity(format!(
                "'{}' has been called with {} arguments; it requires exactly {} argument{}",
                $name,
                $args.len(),
                $n,
                if $n == 1 { "" } else { "s" }
            )));
        }
    };
}

macro_rules! expect_number {
    ($val:expr, $name:expr) => {
        match &*$val.borrow() {
            $crate::value::ValueKind::Number(n) => *n,
            other => {
                return Err($crate::interpreter::error::RuntimeError::type_error(format!(
                    "all arguments to '{}' must be numbers, got {}",
                    $name,
                    other.type_name()
                )))
            }
        }
    };
}

pub(crate) use expect_arity;
pub(crate) use expect_number;
