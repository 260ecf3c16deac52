use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Structure
    LParen,
    RParen,
    Quote,
    Dot,

    // Literals and identifiers
    Number,
    String,
    Identifier,
    True,
    False,

    // Operators
    Plus,
    Minus,
    Asterisk,
    Slash,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    // Reserved words
    If,
    Define,
    Lambda,
    Let,
    Begin,
    Set,
    Cond,
    Else,
    And,
    Or,
    Not,
    Delay,
    ConsStream,
    Force,

    Eof,
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LParen => "LeftParen",
            TokenKind::RParen => "RightParen",
            TokenKind::Quote => "Quote",
            TokenKind::Dot => "Dot",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Identifier => "Identifier",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::Plus => "Plus",
            TokenKind::Minus => "Minus",
            TokenKind::Asterisk => "Asterisk",
            TokenKind::Slash => "Slash",
            TokenKind::Less => "Less",
            TokenKind::LessEq => "LessEqual",
            TokenKind::Greater => "Greater",
            TokenKind::GreaterEq => "GreaterEqual",
            TokenKind::If => "If",
            TokenKind::Define => "Define",
            TokenKind::Lambda => "Lambda",
            TokenKind::Let => "Let",
            TokenKind::Begin => "Begin",
            TokenKind::Set => "Set!",
            TokenKind::Cond => "Cond",
            TokenKind::Else => "Else",
            TokenKind::And => "And",
            TokenKind::Or => "Or",
            TokenKind::Not => "Not",
            TokenKind::Delay => "Delay",
            TokenKind::ConsStream => "ConsStream",
            TokenKind::Force => "Force",
            TokenKind::Eof => "EOF",
            TokenKind::Invalid => "Invalid",
        };
        write!(f, "{}", name)
    }
}

/// A lexical token with the line it started on. For `Invalid` tokens the
/// content carries the lexer's error message instead of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub content: String,
    pub line: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(content: impl Into<String>, line: usize, kind: TokenKind) -> Self {
        Self {
            content: content.into(),
            line,
            kind,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new("", line, TokenKind::Eof)
    }
}
