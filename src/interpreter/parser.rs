//! Recursive-descent parser with one token of lookahead.
//!
//! Surface forms are normalized into the core language here: `cond` becomes a
//! right-fold of `if`s, `let` becomes an immediate lambda application, and
//! `(define (f a . r) …)` becomes a `define` of a lambda with a dotted-tail
//! parameter.

use std::io::BufRead;

use crate::ast::{Expr, ExprKind};
use crate::interpreter::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser<R> {
    lexer: Lexer<R>,
    current: Token,
}

impl<R: BufRead> Parser<R> {
    pub fn new(mut lexer: Lexer<R>) -> Self {
        let current = lexer.next_token();
        Self { lexer, current }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Consumes the current token when it matches.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current.kind == kind {
            self.advance();
            return true;
        }
        false
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(&self.current, message)
    }

    /// Lexical errors travel as `Invalid` tokens; surface them wherever the
    /// parser would otherwise misread them.
    fn check_invalid(&self) -> Result<(), ParseError> {
        if self.current.kind == TokenKind::Invalid {
            return Err(self.error(self.current.content.clone()));
        }
        Ok(())
    }

    pub fn parse_program(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut program = Vec::new();
        while !self.eat(TokenKind::Eof) {
            program.push(self.parse_expression()?);
        }
        Ok(program)
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.check_invalid()?;
        match self.current.kind {
            TokenKind::Number => self.parse_number(),
            TokenKind::String => self.parse_string(),
            TokenKind::LParen => self.parse_group(),
            TokenKind::Quote => self.parse_quote(),
            TokenKind::Identifier => {
                let expr = Expr::new(
                    ExprKind::Identifier(self.current.content.clone()),
                    self.current.clone(),
                );
                self.advance();
                Ok(expr)
            }
            TokenKind::True | TokenKind::False => {
                let expr = Expr::new(
                    ExprKind::Bool(self.current.kind == TokenKind::True),
                    self.current.clone(),
                );
                self.advance();
                Ok(expr)
            }
            // Operator tokens outside call position still name builtins.
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Less
            | TokenKind::LessEq
            | TokenKind::Greater
            | TokenKind::GreaterEq
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::Force => {
                let expr = Expr::new(
                    ExprKind::Primitive(self.current.content.clone()),
                    self.current.clone(),
                );
                self.advance();
                Ok(expr)
            }
            TokenKind::Eof => Err(self.error("unexpected EOF")),
            kind => Err(self.error(format!("unexpected token: {}", kind))),
        }
    }

    fn parse_number(&mut self) -> Result<Expr, ParseError> {
        if let Err(e) = self.current.content.parse::<f64>() {
            return Err(self.error(e.to_string()));
        }
        let expr = Expr::new(
            ExprKind::Number(self.current.content.clone()),
            self.current.clone(),
        );
        self.advance();
        Ok(expr)
    }

    fn parse_string(&mut self) -> Result<Expr, ParseError> {
        let expr = Expr::new(
            ExprKind::Str(self.current.content.clone()),
            self.current.clone(),
        );
        self.advance();
        Ok(expr)
    }

    /// Dispatches on the token after `(`.
    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        let lparen = self.current.clone();
        self.advance();
        self.check_invalid()?;
        match self.current.kind {
            TokenKind::Define => self.parse_define(lparen),
            TokenKind::Lambda => self.parse_lambda(lparen),
            TokenKind::Let => self.parse_let(lparen),
            TokenKind::If => self.parse_if(lparen),
            TokenKind::Cond => self.parse_cond(lparen),
            TokenKind::Set => self.parse_set(lparen),
            TokenKind::Begin => self.parse_begin(lparen),
            TokenKind::Delay => self.parse_delay(lparen),
            TokenKind::ConsStream => self.parse_cons_stream(lparen),
            // `()` is the empty list.
            TokenKind::RParen => {
                self.advance();
                Ok(Expr::new(ExprKind::List(Vec::new()), lparen))
            }
            _ => self.parse_call(lparen),
        }
    }

    fn parse_call(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        let operator = self.parse_expression()?;
        let mut operands = Vec::new();
        while self.current.kind != TokenKind::RParen {
            if self.current.kind == TokenKind::Eof {
                return Err(self.error("expected ')' after call expression"));
            }
            operands.push(self.parse_expression()?);
        }
        self.advance();
        Ok(Expr::new(
            ExprKind::Call {
                operator: Box::new(operator),
                operands,
            },
            lparen,
        ))
    }

    fn parse_if(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        let predicate = self.parse_expression()?;
        let consequent = self.parse_expression()?;
        let alternative = if self.current.kind == TokenKind::RParen {
            Expr::void(lparen.clone())
        } else {
            let alternative = self.parse_expression()?;
            if self.current.kind != TokenKind::RParen {
                return Err(self.error("expected ')' after if expression"));
            }
            alternative
        };
        self.advance();
        Ok(Expr::new(
            ExprKind::If {
                predicate: Box::new(predicate),
                consequent: Box::new(consequent),
                alternative: Box::new(alternative),
            },
            lparen,
        ))
    }

    /// Parameter list after its opening paren: identifiers, optionally a
    /// dotted-tail parameter last.
    fn parse_params(&mut self) -> Result<(Vec<String>, Option<String>), ParseError> {
        let mut params = Vec::new();
        let mut rest = None;
        while self.current.kind != TokenKind::RParen {
            if self.current.kind == TokenKind::Dot {
                self.advance();
                if self.current.kind != TokenKind::Identifier {
                    return Err(self.error("expected identifier in parameter list"));
                }
                rest = Some(self.current.content.clone());
                self.advance();
                if self.current.kind != TokenKind::RParen {
                    return Err(self.error("expected ')' after dotted-tail parameter"));
                }
                break;
            }
            if self.current.kind != TokenKind::Identifier {
                return Err(self.error("expected identifier in parameter list"));
            }
            params.push(self.current.content.clone());
            self.advance();
        }
        self.advance();
        Ok((params, rest))
    }

    fn parse_body(&mut self, context: &str) -> Result<Vec<Expr>, ParseError> {
        let mut body = Vec::new();
        while self.current.kind != TokenKind::RParen {
            if self.current.kind == TokenKind::Eof {
                return Err(self.error(format!("expected ')' after {} body", context)));
            }
            body.push(self.parse_expression()?);
        }
        if body.is_empty() {
            return Err(self.error(format!("expected at least one expression in {} body", context)));
        }
        self.advance();
        Ok(body)
    }

    fn parse_define(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        if self.current.kind == TokenKind::LParen {
            // (define (name params... [. rest]) body...)
            self.advance();
            if self.current.kind != TokenKind::Identifier {
                return Err(self.error("expected identifier after '(' in define"));
            }
            let name = self.current.content.clone();
            self.advance();

            let (params, rest) = self.parse_params()?;
            let body = self.parse_body("function")?;

            let lambda = Expr::new(ExprKind::Lambda { params, rest, body }, lparen.clone());
            Ok(Expr::new(
                ExprKind::Define {
                    name,
                    value: Box::new(lambda),
                },
                lparen,
            ))
        } else {
            // (define name value)
            if self.current.kind != TokenKind::Identifier {
                return Err(self.error("expected identifier after define"));
            }
            let name = self.current.content.clone();
            self.advance();

            let value = self.parse_expression()?;
            if self.current.kind != TokenKind::RParen {
                return Err(self.error("expected ')' after define expression"));
            }
            self.advance();
            Ok(Expr::new(
                ExprKind::Define {
                    name,
                    value: Box::new(value),
                },
                lparen,
            ))
        }
    }

    fn parse_lambda(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        if self.current.kind != TokenKind::LParen {
            return Err(self.error("expected '(' after lambda"));
        }
        self.advance();
        let (params, rest) = self.parse_params()?;
        let body = self.parse_body("lambda")?;
        Ok(Expr::new(ExprKind::Lambda { params, rest, body }, lparen))
    }

    /// `(let ((n1 e1) …) body…)` desugars into an immediate lambda call.
    fn parse_let(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        if self.current.kind != TokenKind::LParen {
            return Err(self.error("expected '(' after let"));
        }
        self.advance();

        let mut names = Vec::new();
        let mut inits = Vec::new();
        while self.current.kind != TokenKind::RParen {
            if !self.eat(TokenKind::LParen) {
                return Err(self.error("expected '(' in binding list"));
            }
            if self.current.kind != TokenKind::Identifier {
                return Err(self.error("expected identifier in binding"));
            }
            names.push(self.current.content.clone());
            self.advance();

            inits.push(self.parse_expression()?);
            if !self.eat(TokenKind::RParen) {
                return Err(self.error("expected ')' after binding"));
            }
        }
        self.advance();

        let body = self.parse_body("let")?;
        let lambda = Expr::new(
            ExprKind::Lambda {
                params: names,
                rest: None,
                body,
            },
            lparen.clone(),
        );
        Ok(Expr::new(
            ExprKind::Call {
                operator: Box::new(lambda),
                operands: inits,
            },
            lparen,
        ))
    }

    /// Clause expressions; a multi-expression clause wraps in `begin`.
    fn parse_clause_exprs(&mut self) -> Result<Expr, ParseError> {
        let mut exprs = Vec::new();
        while self.current.kind != TokenKind::RParen {
            if self.current.kind == TokenKind::Eof {
                return Err(self.error("expected ')' after cond clause"));
            }
            exprs.push(self.parse_expression()?);
        }
        if exprs.is_empty() {
            return Err(self.error("expected at least one expression in cond clause"));
        }
        if exprs.len() == 1 {
            Ok(exprs.into_iter().next().unwrap())
        } else {
            let token = exprs[0].token.clone();
            Ok(Expr::new(ExprKind::Begin(exprs), token))
        }
    }

    /// `cond` right-folds its clauses into nested `if`s; a missing `else`
    /// bottoms out at void.
    fn parse_cond(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();

        let mut clauses = Vec::new();
        let mut else_branch = None;
        while self.current.kind != TokenKind::RParen {
            if !self.eat(TokenKind::LParen) {
                return Err(self.error("expected '(' in cond clause"));
            }
            if self.current.kind == TokenKind::Else {
                self.advance();
                else_branch = Some(self.parse_clause_exprs()?);
                if !self.eat(TokenKind::RParen) {
                    return Err(self.error("expected ')' at the end of else clause"));
                }
                break;
            }
            let test = self.parse_expression()?;
            let consequent = self.parse_clause_exprs()?;
            if !self.eat(TokenKind::RParen) {
                return Err(self.error("expected ')' after cond clause"));
            }
            clauses.push((test, consequent));
        }
        if clauses.is_empty() {
            return Err(self.error("expected at least one cond clause"));
        }
        if !self.eat(TokenKind::RParen) {
            return Err(self.error("expected ')' after cond expression"));
        }

        let mut alternative = else_branch.unwrap_or_else(|| Expr::void(lparen.clone()));
        for (test, consequent) in clauses.into_iter().rev() {
            alternative = Expr::new(
                ExprKind::If {
                    predicate: Box::new(test),
                    consequent: Box::new(consequent),
                    alternative: Box::new(alternative),
                },
                lparen.clone(),
            );
        }
        Ok(alternative)
    }

    fn parse_set(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        if self.current.kind != TokenKind::Identifier {
            return Err(self.error("expected identifier after set!"));
        }
        let name = self.current.content.clone();
        self.advance();

        let value = self.parse_expression()?;
        if !self.eat(TokenKind::RParen) {
            return Err(self.error("expected ')' at the end of set expression"));
        }
        Ok(Expr::new(
            ExprKind::Set {
                name,
                value: Box::new(value),
            },
            lparen,
        ))
    }

    fn parse_begin(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        let mut forms = Vec::new();
        while self.current.kind != TokenKind::RParen {
            if self.current.kind == TokenKind::Eof {
                return Err(self.error("expected ')' after begin expression"));
            }
            forms.push(self.parse_expression()?);
        }
        if forms.is_empty() {
            return Err(self.error("expected at least one expression in begin"));
        }
        self.advance();
        Ok(Expr::new(ExprKind::Begin(forms), lparen))
    }

    fn parse_delay(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        let inner = self.parse_expression()?;
        if !self.eat(TokenKind::RParen) {
            return Err(self.error("expected ')' at the end of delay expression"));
        }
        Ok(Expr::new(ExprKind::Delay(Box::new(inner)), lparen))
    }

    fn parse_cons_stream(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        self.advance();
        let car = self.parse_expression()?;
        let cdr = self.parse_expression()?;
        if !self.eat(TokenKind::RParen) {
            return Err(self.error("expected ')' at the end of cons-stream expression"));
        }
        Ok(Expr::new(
            ExprKind::ConsStream {
                car: Box::new(car),
                cdr: Box::new(cdr),
            },
            lparen,
        ))
    }

    fn parse_quote(&mut self) -> Result<Expr, ParseError> {
        let quote = self.current.clone();
        self.advance();
        self.parse_quoted_datum(quote)
    }

    /// The datum after a quote. Numbers and strings are self-evaluating,
    /// names become symbols, and a nested quote canonicalizes into
    /// `(quote datum)` as a two-element list.
    fn parse_quoted_datum(&mut self, quote: Token) -> Result<Expr, ParseError> {
        self.check_invalid()?;
        match self.current.kind {
            TokenKind::LParen => {
                let lparen = self.current.clone();
                self.advance();
                self.parse_quoted_list(lparen)
            }
            TokenKind::Number => self.parse_number(),
            TokenKind::String => self.parse_string(),
            TokenKind::Quote => {
                let inner_quote = self.current.clone();
                self.advance();
                let inner = self.parse_quoted_datum(inner_quote)?;
                Ok(Expr::new(
                    ExprKind::List(vec![
                        Expr::new(ExprKind::Symbol("quote".to_string()), quote.clone()),
                        inner,
                    ]),
                    quote,
                ))
            }
            TokenKind::Eof | TokenKind::RParen => {
                Err(self.error(format!("unexpected token: {}", self.current.kind)))
            }
            _ => {
                let expr = Expr::new(
                    ExprKind::Symbol(self.current.content.clone()),
                    self.current.clone(),
                );
                self.advance();
                Ok(expr)
            }
        }
    }

    fn parse_quoted_list(&mut self, lparen: Token) -> Result<Expr, ParseError> {
        let mut elements = Vec::new();
        loop {
            self.check_invalid()?;
            match self.current.kind {
                TokenKind::RParen => {
                    self.advance();
                    return Ok(Expr::new(ExprKind::List(elements), lparen));
                }
                TokenKind::LParen => {
                    let inner = self.current.clone();
                    self.advance();
                    elements.push(self.parse_quoted_list(inner)?);
                }
                TokenKind::Number => elements.push(self.parse_number()?),
                TokenKind::String => elements.push(self.parse_string()?),
                TokenKind::Quote => {
                    let quote = self.current.clone();
                    self.advance();
                    let inner = self.parse_quoted_datum(quote.clone())?;
                    elements.push(Expr::new(
                        ExprKind::List(vec![
                            Expr::new(ExprKind::Symbol("quote".to_string()), quote.clone()),
                            inner,
                        ]),
                        quote,
                    ));
                }
                TokenKind::Eof => {
                    return Err(self.error(format!("unexpected token: {}", self.current.kind)))
                }
                _ => {
                    elements.push(Expr::new(
                        ExprKind::Symbol(self.current.content.clone()),
                        self.current.clone(),
                    ));
                    self.advance();
                }
            }
        }
    }
}
