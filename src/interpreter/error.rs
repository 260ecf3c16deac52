use std::fmt;

use crate::token::Token;

/// A parse failure, carrying the offending token for error reporting.
/// Lexical errors surface here too: the lexer hands the parser an `Invalid`
/// token whose content is the lexical error message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl ParseError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            token: token.clone(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsing error at line {}, got token: `{}` type: {}, error: {}",
            self.token.line, self.token.content, self.token.kind, self.message
        )
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UndefinedIdentifier,
    UnboundAssignment,
    Arity,
    Type,
    Domain,
    User,
    NotCallable,
}

#[derive(Debug, Clone)]
pub struct StackFrame {
    pub name: String,
    pub line: usize,
}

/// A runtime failure bubbling up through the evaluator. Each procedure-call
/// boundary it crosses pushes one stack frame; the raw message of the
/// innermost error is preserved verbatim.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Line of the expression currently blamed; shifts outward to the call
    /// site as the error crosses each frame. 0 until first located.
    pub line: usize,
    pub stack: Vec<StackFrame>,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            line: 0,
            stack: Vec::new(),
        }
    }

    pub fn undefined_identifier(name: &str, line: usize) -> Self {
        let mut err = Self::new(
            ErrorKind::UndefinedIdentifier,
            format!("undefined identifier: `{}` on line {}", name, line),
        );
        err.line = line;
        err
    }

    pub fn unbound_assignment(name: &str) -> Self {
        Self::new(
            ErrorKind::UnboundAssignment,
            format!("cannot set! undefined identifier: `{}`", name),
        )
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Arity, message.into())
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, message.into())
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::User, message.into())
    }

    pub fn not_callable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotCallable, message.into())
    }

    /// Pins the error to a source line if it has none yet.
    pub fn at_line(mut self, line: usize) -> Self {
        if self.line == 0 {
            self.line = line;
        }
        self
    }

    /// Records that the error escaped a call to `name` made at `line`: the
    /// frame keeps the line inside the callee, and the blamed line moves out
    /// to the call site. Frames therefore accumulate innermost-first.
    pub fn in_call(mut self, name: &str, line: usize) -> Self {
        let inside = if self.line == 0 { line } else { self.line };
        self.stack.push(StackFrame {
            name: name.to_string(),
            line: inside,
        });
        self.line = line;
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for frame in &self.stack {
            write!(f, "\n\tat {} (line {})", frame.name, frame.line)?;
        }
        write!(f, "\n\tat main (line {})", self.line)
    }
}

impl std::error::Error for RuntimeError {}

/// Either failure a program can produce end to end.
#[derive(Debug, Clone)]
pub enum WispError {
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl fmt::Display for WispError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WispError::Parse(e) => write!(f, "{}", e),
            WispError::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WispError {}

impl From<ParseError> for WispError {
    fn from(e: ParseError) -> Self {
        WispError::Parse(e)
    }
}

impl From<RuntimeError> for WispError {
    fn from(e: RuntimeError) -> Self {
        WispError::Runtime(e)
    }
}
