//! Output built-ins, `error`, and the `read` datum reader.

use std::io::BufRead;

use super::{add, expect_arity};
use crate::interpreter::environment::Env;
use crate::interpreter::error::RuntimeError;
use crate::lexer::Lexer;
use crate::token::TokenKind;
use crate::value::{display_string, Number, Value};

pub(super) fn install(env: &Env) {
    // `display` prints strings without their quotes and adds no newline.
    add(env, "display", |args, _| {
        expect_arity!(args, 1, "display");
        print!("{}", display_string(&args[0]));
        Ok(Value::void())
    });

    add(env, "newline", |args, _| {
        expect_arity!(args, 0, "newline");
        println!();
        Ok(Value::void())
    });

    add(env, "print", |args, _| {
        expect_arity!(args, 1, "print");
        println!("{}", args[0]);
        Ok(Value::void())
    });

    add(env, "error", |args, _| {
        if args.is_empty() {
            return Err(RuntimeError::arity(
                "'error' has been called with 0 arguments; it requires at least 1 argument",
            ));
        }
        let message = if args.len() == 1 {
            format!("failed to evaluate: {}", args[0])
        } else {
            format!("failed to evaluate: {}, {}", args[0], args[1])
        };
        Err(RuntimeError::user(message))
    });

    // `(read)`: one datum from the interpreter's input stream, lexed by the
    // evaluator's resident input lexer.
    add(env, "read", |args, evaluator| {
        expect_arity!(args, 0, "read");
        read_datum(evaluator.input_lexer_mut())
    });
}

/// Reads one datum: number, string, symbol, quote abbreviation, or list.
fn read_datum<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Value, RuntimeError> {
    let token = lexer.next_token();
    match token.kind {
        TokenKind::LParen => read_list(lexer),
        TokenKind::RParen => Err(RuntimeError::domain("unexpected ')' while reading")),
        TokenKind::Eof => Err(RuntimeError::domain("unexpected EOF while reading")),
        TokenKind::Invalid => Err(RuntimeError::domain(token.content)),
        TokenKind::Number => Number::parse(&token.content)
            .map(Value::number)
            .ok_or_else(|| {
                RuntimeError::type_error(format!("invalid number literal `{}`", token.content))
            }),
        TokenKind::String => Ok(Value::string(token.content)),
        // `'datum` reads as the two-element list (quote datum).
        TokenKind::Quote => {
            let inner = read_datum(lexer)?;
            Ok(Value::list(vec![Value::symbol("quote"), inner]))
        }
        _ => Ok(Value::symbol(token.content)),
    }
}

fn read_list<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Value, RuntimeError> {
    let mut elements = Vec::new();
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::RParen => return Ok(Value::list(elements)),
            TokenKind::LParen => elements.push(read_list(lexer)?),
            TokenKind::Eof => return Err(RuntimeError::domain("unexpected EOF while reading")),
            TokenKind::Invalid => return Err(RuntimeError::domain(token.content)),
            TokenKind::Number => {
                let number = Number::parse(&token.content).ok_or_else(|| {
                    RuntimeError::type_error(format!(
                        "invalid number literal `{}`",
                        token.content
                    ))
                })?;
                elements.push(Value::number(number));
            }
            TokenKind::String => elements.push(Value::string(token.content)),
            TokenKind::Quote => {
                let inner = read_datum(lexer)?;
                elements.push(Value::list(vec![Value::symbol("quote"), inner]));
            }
            _ => elements.push(Value::symbol(token.content)),
        }
    }
}
