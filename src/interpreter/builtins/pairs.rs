//! Pair and list built-ins.
//!
//! A proper list is its own value kind, distinct from a cons cell, so
//! `length` and traversal are cheap while display stays Scheme-like. `cons`
//! onto a list prepends; `cons` onto anything else makes a cons cell.
//! Mutation is in place and visible through every alias of the cell.

use super::{add, expect_arity};
use crate::interpreter::environment::Env;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::evaluator::Evaluator;
use crate::value::{self, Value, ValueKind};

#[derive(Clone, Copy)]
pub(super) enum PairOp {
    Car,
    Cdr,
}

pub(super) fn car_of(value: &Value) -> Result<Value, RuntimeError> {
    match &*value.borrow() {
        ValueKind::Cons(car, _) => Ok(car.clone()),
        ValueKind::List(elements) => elements
            .first()
            .cloned()
            .ok_or_else(|| RuntimeError::domain("cannot call 'car' on an empty list")),
        other => Err(RuntimeError::type_error(format!(
            "'car' expected cons or list value, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn cdr_of(value: &Value) -> Result<Value, RuntimeError> {
    match &*value.borrow() {
        ValueKind::Cons(_, cdr) => Ok(cdr.clone()),
        ValueKind::List(elements) => {
            if elements.is_empty() {
                return Err(RuntimeError::domain("cannot call 'cdr' on an empty list"));
            }
            Ok(Value::list(elements[1..].to_vec()))
        }
        other => Err(RuntimeError::type_error(format!(
            "'cdr' expected cons or list value, got {}",
            other.type_name()
        ))),
    }
}

/// The `c[ad]+r` family is a composition of primitive car/cdr steps applied
/// innermost-first.
fn accessor(
    name: &'static str,
    ops: &'static [PairOp],
) -> impl Fn(&[Value], &mut Evaluator) -> Result<Value, RuntimeError> {
    move |args: &[Value], _: &mut Evaluator| {
        expect_arity!(args, 1, name);
        let mut value = args[0].clone();
        for op in ops {
            value = match op {
                PairOp::Car => car_of(&value)?,
                PairOp::Cdr => cdr_of(&value)?,
            };
        }
        Ok(value)
    }
}

pub(super) fn install(env: &Env) {
    add(env, "cons", |args, _| {
        expect_arity!(args, 2, "cons");
        let car = args[0].clone();
        let cdr = args[1].clone();
        // Prepending onto a list keeps the result a proper list.
        let prepended = match &*cdr.borrow() {
            ValueKind::List(elements) => {
                let mut list = Vec::with_capacity(elements.len() + 1);
                list.push(car.clone());
                list.extend(elements.iter().cloned());
                Some(Value::list(list))
            }
            _ => None,
        };
        Ok(prepended.unwrap_or_else(|| Value::cons_cell(car, cdr)))
    });

    add(env, "list", |args, _| Ok(Value::list(args.to_vec())));

    add(env, "length", |args, _| {
        expect_arity!(args, 1, "length");
        match &*args[0].borrow() {
            ValueKind::List(elements) => Ok(Value::int(elements.len() as i64)),
            other => Err(RuntimeError::type_error(format!(
                "'length' expected list value, got {}",
                other.type_name()
            ))),
        }
    });

    add(env, "append", |args, _| {
        if args.len() < 2 {
            return Err(RuntimeError::arity(format!(
                "'append' has been called with {} arguments; it requires at least 2 arguments",
                args.len()
            )));
        }
        let mut elements = Vec::new();
        for arg in args {
            match &*arg.borrow() {
                ValueKind::List(list) => elements.extend(list.iter().cloned()),
                other => {
                    return Err(RuntimeError::type_error(format!(
                        "'append' expected list value, got {}",
                        other.type_name()
                    )))
                }
            }
        }
        Ok(Value::list(elements))
    });

    use PairOp::{Car, Cdr};
    add(env, "car", accessor("car", &[Car]));
    add(env, "cdr", accessor("cdr", &[Cdr]));
    add(env, "caar", accessor("caar", &[Car, Car]));
    add(env, "cadr", accessor("cadr", &[Cdr, Car]));
    add(env, "cdar", accessor("cdar", &[Car, Cdr]));
    add(env, "cddr", accessor("cddr", &[Cdr, Cdr]));
    add(env, "caddr", accessor("caddr", &[Cdr, Cdr, Car]));
    add(env, "caadr", accessor("caadr", &[Cdr, Car, Car]));
    add(env, "cdadr", accessor("cdadr", &[Cdr, Car, Cdr]));
    add(env, "cdddr", accessor("cdddr", &[Cdr, Cdr, Cdr]));
    add(env, "cadddr", accessor("cadddr", &[Cdr, Cdr, Cdr, Car]));

    add(env, "set-car!", |args, _| {
        expect_arity!(args, 2, "set-car!");
        let new_car = args[1].clone();
        match &mut *args[0].borrow_mut() {
            ValueKind::Cons(car, _) => *car = new_car,
            ValueKind::List(elements) => {
                if elements.is_empty() {
                    return Err(RuntimeError::domain("cannot set-car! on an empty list"));
                }
                elements[0] = new_car;
            }
            other => {
                return Err(RuntimeError::type_error(format!(
                    "first argument to 'set-car!' must be a cons cell or a non-empty list, got {}",
                    other.type_name()
                )))
            }
        }
        Ok(Value::void())
    });

    // `set-cdr!` on a list collapses the shared cell into a cons pair, so
    // the change shows through every alias of the container.
    add(env, "set-cdr!", |args, _| {
        expect_arity!(args, 2, "set-cdr!");
        let new_cdr = args[1].clone();
        let mut kind = args[0].borrow_mut();
        match &mut *kind {
            ValueKind::Cons(_, cdr) => *cdr = new_cdr,
            ValueKind::List(elements) => {
                if elements.is_empty() {
                    return Err(RuntimeError::domain("cannot set-cdr! on an empty list"));
                }
                let car = elements[0].clone();
                *kind = ValueKind::Cons(car, new_cdr);
            }
            other => {
                return Err(RuntimeError::type_error(format!(
                    "first argument to 'set-cdr!' must be a cons cell or a non-empty list, got {}",
                    other.type_name()
                )))
            }
        }
        Ok(Value::void())
    });

    // Scans a table of pairs (two-element lists or cons cells) for a key
    // matching by `equal?`; the table itself may be a list or a cons chain.
    add(env, "assoc", |args, _| {
        expect_arity!(args, 2, "assoc");
        let key = &args[0];
        let table = &args[1];

        fn entry_matches(key: &Value, entry: &Value) -> Result<bool, RuntimeError> {
            match &*entry.borrow() {
                ValueKind::Cons(car, _) => Ok(value::equal(car, key)),
                ValueKind::List(pair) => match pair.first() {
                    Some(car) => Ok(value::equal(car, key)),
                    None => Err(RuntimeError::type_error("non-pair found in list")),
                },
                _ => Err(RuntimeError::type_error("non-pair found in list")),
            }
        }

        match &*table.borrow() {
            ValueKind::List(entries) => {
                for entry in entries {
                    if entry_matches(key, entry)? {
                        return Ok(entry.clone());
                    }
                }
                Ok(Value::f())
            }
            ValueKind::Cons(_, _) => {
                let mut current = table.clone();
                loop {
                    let (entry, next) = match &*current.borrow() {
                        ValueKind::Cons(car, cdr) => (car.clone(), cdr.clone()),
                        _ => break,
                    };
                    if entry_matches(key, &entry)? {
                        return Ok(entry);
                    }
                    current = next;
                }
                Ok(Value::f())
            }
            other => Err(RuntimeError::type_error(format!(
                "'assoc' expected list value, got {}",
                other.type_name()
            ))),
        }
    });
}
