//! Line-oriented lexer for the surface syntax.
//!
//! The scanner buffers one line at a time from any [`BufRead`] source and
//! exposes a single operation, [`Lexer::next_token`]. Keeping it stateful and
//! stream-driven (rather than lexing a finished string) lets the `read`
//! builtin re-enter it on the interpreter's input stream mid-evaluation.

use std::io::BufRead;

use crate::token::{Token, TokenKind};

pub struct Lexer<R> {
    reader: R,
    line: String,
    line_no: usize,
    column: usize,
}

fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'
}

/// Token boundaries: whitespace and parentheses.
fn is_delimiter(c: u8) -> bool {
    is_space(c) || c == b'(' || c == b')'
}

fn keyword_kind(content: &str) -> Option<TokenKind> {
    let kind = match content {
        "define" => TokenKind::Define,
        "if" => TokenKind::If,
        "lambda" => TokenKind::Lambda,
        "let" => TokenKind::Let,
        "begin" => TokenKind::Begin,
        "set!" => TokenKind::Set,
        "cond" => TokenKind::Cond,
        "else" => TokenKind::Else,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "delay" => TokenKind::Delay,
        "cons-stream" => TokenKind::ConsStream,
        "force" => TokenKind::Force,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => return None,
    };
    Some(kind)
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            column: 0,
        }
    }

    /// Reads the next line into the buffer. Returns false when the source is
    /// exhausted (or unreadable, which the caller treats the same way).
    fn read_next_line(&mut self) -> bool {
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) | Err(_) => false,
            Ok(_) => {
                while self.line.ends_with('\n') || self.line.ends_with('\r') {
                    self.line.pop();
                }
                self.line_no += 1;
                self.column = 0;
                true
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.line.as_bytes().get(self.column).copied()
    }

    /// A line whose remainder starts with `#lang ` is a host directive and is
    /// skipped like a comment.
    fn at_lang_directive(&self) -> bool {
        self.line[self.column..].starts_with("#lang ")
    }

    /// Advances past whitespace, `;` comments and `#lang` lines until a token
    /// start is in view. Returns false at end of input.
    fn skip_to_token(&mut self) -> bool {
        loop {
            if self.column >= self.line.len() || self.at_lang_directive() {
                if !self.read_next_line() {
                    return false;
                }
                continue;
            }
            let c = self.line.as_bytes()[self.column];
            if is_space(c) {
                self.column += 1;
                continue;
            }
            if c == b';' {
                if !self.read_next_line() {
                    return false;
                }
                continue;
            }
            return true;
        }
    }

    /// Scans digits (optionally a fraction) starting one byte back from the
    /// current column, so a leading sign or dot is part of the token. The
    /// character after the number must be a delimiter.
    fn read_number(&mut self, accept_dot: bool) -> Token {
        let start = self.column - 1;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.column += 1;
        }
        if self.peek() == Some(b'.') {
            if !accept_dot {
                return Token::new(
                    format!(
                        "invalid character '.' in number at line {}, column {}",
                        self.line_no,
                        self.column + 1
                    ),
                    self.line_no,
                    TokenKind::Invalid,
                );
            }
            self.column += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.column += 1;
            }
        }
        if let Some(c) = self.peek() {
            if !is_delimiter(c) {
                return Token::new(
                    format!(
                        "invalid character '{}' after number at line {}, column {}",
                        c as char,
                        self.line_no,
                        self.column + 1
                    ),
                    self.line_no,
                    TokenKind::Invalid,
                );
            }
        }
        Token::new(&self.line[start..self.column], self.line_no, TokenKind::Number)
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.column - 1;
        while self.peek().is_some_and(|c| !is_delimiter(c)) {
            self.column += 1;
        }
        let content = &self.line[start..self.column];
        match keyword_kind(content) {
            Some(kind) => Token::new(content, self.line_no, kind),
            None => Token::new(content, self.line_no, TokenKind::Identifier),
        }
    }

    /// Reads a string body after the opening quote. Strings may span lines;
    /// the line terminator is preserved as `\n`.
    fn read_string(&mut self) -> Token {
        let mut content = String::new();
        let mut start = self.column;
        loop {
            if self.column >= self.line.len() {
                content.push_str(&self.line[start..self.column]);
                if !self.read_next_line() {
                    return Token::new(
                        format!(
                            "unterminated string at line {}, column {}",
                            self.line_no, self.column
                        ),
                        self.line_no,
                        TokenKind::Invalid,
                    );
                }
                content.push('\n');
                start = 0;
                continue;
            }
            if self.line.as_bytes()[self.column] == b'"' {
                break;
            }
            self.column += 1;
        }
        content.push_str(&self.line[start..self.column]);
        self.column += 1;
        Token::new(content, self.line_no, TokenKind::String)
    }

    /// Scans a `#...` atom: `#t`/`#true` and `#f`/`#false` are the boolean
    /// literals, anything else is invalid.
    fn read_sharp(&mut self) -> Token {
        let start = self.column - 1;
        while self.peek().is_some_and(|c| !is_delimiter(c)) {
            self.column += 1;
        }
        let content = &self.line[start..self.column];
        match content {
            "#t" | "#true" => Token::new(content, self.line_no, TokenKind::True),
            "#f" | "#false" => Token::new(content, self.line_no, TokenKind::False),
            _ => Token::new(
                format!(
                    "invalid token after #: {} at line {}, column {}",
                    content,
                    self.line_no,
                    start + 1
                ),
                self.line_no,
                TokenKind::Invalid,
            ),
        }
    }

    pub fn next_token(&mut self) -> Token {
        if !self.skip_to_token() {
            return Token::eof(self.line_no);
        }

        let first = self.line.as_bytes()[self.column];
        self.column += 1;
        let next = self.peek();

        match first {
            b'(' => Token::new("(", self.line_no, TokenKind::LParen),
            b')' => Token::new(")", self.line_no, TokenKind::RParen),
            b'\'' => Token::new("'", self.line_no, TokenKind::Quote),
            b'"' => self.read_string(),
            b'#' => self.read_sharp(),

            // A sign starts a number when a digit follows, an identifier when
            // any other non-delimiter follows, and is a bare operator before
            // a delimiter or end of line.
            b'+' | b'-' => match next {
                Some(c) if c.is_ascii_digit() => self.read_number(true),
                Some(c) if !is_delimiter(c) => self.read_identifier_or_keyword(),
                _ if first == b'+' => Token::new("+", self.line_no, TokenKind::Plus),
                _ => Token::new("-", self.line_no, TokenKind::Minus),
            },

            // `*123` and `/99` are identifiers, never numbers.
            b'*' | b'/' => match next {
                Some(c) if !is_delimiter(c) => self.read_identifier_or_keyword(),
                _ if first == b'*' => Token::new("*", self.line_no, TokenKind::Asterisk),
                _ => Token::new("/", self.line_no, TokenKind::Slash),
            },

            b'<' => {
                if next == Some(b'=') {
                    self.column += 1;
                    Token::new("<=", self.line_no, TokenKind::LessEq)
                } else {
                    Token::new("<", self.line_no, TokenKind::Less)
                }
            }
            b'>' => {
                if next == Some(b'=') {
                    self.column += 1;
                    Token::new(">=", self.line_no, TokenKind::GreaterEq)
                } else {
                    Token::new(">", self.line_no, TokenKind::Greater)
                }
            }

            b'.' => match next {
                Some(c) if c.is_ascii_digit() => self.read_number(false),
                Some(c) if c.is_ascii_alphabetic() => self.read_identifier_or_keyword(),
                _ => Token::new(".", self.line_no, TokenKind::Dot),
            },

            c if c.is_ascii_digit() => self.read_number(true),
            _ => self.read_identifier_or_keyword(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source.as_bytes());
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_operators_and_literals() {
        let input = "\n(define if lambda let begin set! cond else and or square > < >= <= + - * / ' \"hello\" 123 45.67)\n+abc -bcd *cd /de *123 /67 +123 -45.67 #t #f\n. .a a.b\ntrue false\n";
        let expected = vec![
            Token::new("(", 2, TokenKind::LParen),
            Token::new("define", 2, TokenKind::Define),
            Token::new("if", 2, TokenKind::If),
            Token::new("lambda", 2, TokenKind::Lambda),
            Token::new("let", 2, TokenKind::Let),
            Token::new("begin", 2, TokenKind::Begin),
            Token::new("set!", 2, TokenKind::Set),
            Token::new("cond", 2, TokenKind::Cond),
            Token::new("else", 2, TokenKind::Else),
            Token::new("and", 2, TokenKind::And),
            Token::new("or", 2, TokenKind::Or),
            Token::new("square", 2, TokenKind::Identifier),
            Token::new(">", 2, TokenKind::Greater),
            Token::new("<", 2, TokenKind::Less),
            Token::new(">=", 2, TokenKind::GreaterEq),
            Token::new("<=", 2, TokenKind::LessEq),
            Token::new("+", 2, TokenKind::Plus),
            Token::new("-", 2, TokenKind::Minus),
            Token::new("*", 2, TokenKind::Asterisk),
            Token::new("/", 2, TokenKind::Slash),
            Token::new("'", 2, TokenKind::Quote),
            Token::new("hello", 2, TokenKind::String),
            Token::new("123", 2, TokenKind::Number),
            Token::new("45.67", 2, TokenKind::Number),
            Token::new(")", 2, TokenKind::RParen),
            Token::new("+abc", 3, TokenKind::Identifier),
            Token::new("-bcd", 3, TokenKind::Identifier),
            Token::new("*cd", 3, TokenKind::Identifier),
            Token::new("/de", 3, TokenKind::Identifier),
            Token::new("*123", 3, TokenKind::Identifier),
            Token::new("/67", 3, TokenKind::Identifier),
            Token::new("+123", 3, TokenKind::Number),
            Token::new("-45.67", 3, TokenKind::Number),
            Token::new("#t", 3, TokenKind::True),
            Token::new("#f", 3, TokenKind::False),
            Token::new(".", 4, TokenKind::Dot),
            Token::new(".a", 4, TokenKind::Identifier),
            Token::new("a.b", 4, TokenKind::Identifier),
            Token::new("true", 5, TokenKind::True),
            Token::new("false", 5, TokenKind::False),
            Token::eof(5),
        ];
        assert_eq!(lex(input), expected);
    }

    #[test]
    fn test_signs_before_delimiters_are_operators() {
        assert_eq!(
            kinds("(+ 1 2)"),
            vec![
                TokenKind::LParen,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
        // A sign directly before `)` is still the bare operator.
        assert_eq!(
            kinds("(+)"),
            vec![TokenKind::LParen, TokenKind::Plus, TokenKind::RParen, TokenKind::Eof]
        );
        assert_eq!(
            kinds("(*)"),
            vec![TokenKind::LParen, TokenKind::Asterisk, TokenKind::RParen, TokenKind::Eof]
        );
    }

    #[test]
    fn test_dot_forms() {
        let tokens = lex(". .5 .ab");
        assert_eq!(tokens[0].kind, TokenKind::Dot);
        assert_eq!(tokens[1], Token::new(".5", 1, TokenKind::Number));
        assert_eq!(tokens[2], Token::new(".ab", 1, TokenKind::Identifier));
    }

    #[test]
    fn test_invalid_character_after_number() {
        let tokens = lex("123a");
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert!(tokens[0].content.contains("invalid character 'a' after number"));
    }

    #[test]
    fn test_invalid_sharp_atom() {
        let tokens = lex("#garbage");
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert!(tokens[0].content.contains("invalid token after #"));
        assert_eq!(lex("#true")[0].kind, TokenKind::True);
        assert_eq!(lex("#false")[0].kind, TokenKind::False);
    }

    #[test]
    fn test_multi_line_string_keeps_newlines() {
        let tokens = lex("\"ab\ncd\"");
        assert_eq!(tokens[0], Token::new("ab\ncd", 2, TokenKind::String));
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = lex("\"never closed");
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert!(tokens[0].content.contains("unterminated string"));
    }

    #[test]
    fn test_comments_and_lang_directive() {
        let input = "#lang racket/base\n; a comment\n(+ 1 2) ; trailing\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::LParen,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_token_lines_span_input() {
        let tokens = lex("a\nb\n\nc");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_set_bang_is_reserved() {
        let tokens = lex("set! set!x");
        assert_eq!(tokens[0].kind, TokenKind::Set);
        assert_eq!(tokens[1], Token::new("set!x", 1, TokenKind::Identifier));
    }
}
