use serde::{Deserialize, Serialize};
use std::fmt;

/// Token types for the pseudocode language.
///
/// Multi-word keywords (`End Module`, `End If`, …) are single tokens; the
/// lexer accepts any run of whitespace between their words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    Module,
    EndModule,
    Function,
    EndFunction,
    Call,
    Return,
    Constant,
    Declare,
    Ref,
    Set,
    Display,
    Input,
    If,
    Then,
    Else,
    EndIf,
    Do,
    Until,
    While,
    EndWhile,
    For,
    To,
    EndFor,
    And,
    Or,
    Not,
    Tap,
    Mod,

    // Type keywords
    IntegerType,
    RealType,
    StringType,

    // Literals and identifiers
    Number(f64),
    String(String),
    Identifier(String),

    // Operators
    Assign,       // =
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret, // ^ is reserved; no expression production consumes it

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Module => write!(f, "Module"),
            TokenKind::EndModule => write!(f, "End Module"),
            TokenKind::Function => write!(f, "Function"),
            TokenKind::EndFunction => write!(f, "End Function"),
            TokenKind::Call => write!(f, "Call"),
            TokenKind::Return => write!(f, "Return"),
            TokenKind::Constant => write!(f, "Constant"),
            TokenKind::Declare => write!(f, "Declare"),
            TokenKind::Ref => write!(f, "Ref"),
            TokenKind::Set => write!(f, "Set"),
            TokenKind::Display => write!(f, "Display"),
            TokenKind::Input => write!(f, "Input"),
            TokenKind::If => write!(f, "If"),
            TokenKind::Then => write!(f, "Then"),
            TokenKind::Else => write!(f, "Else"),
            TokenKind::EndIf => write!(f, "End If"),
            TokenKind::Do => write!(f, "Do"),
            TokenKind::Until => write!(f, "Until"),
            TokenKind::While => write!(f, "While"),
            TokenKind::EndWhile => write!(f, "End While"),
            TokenKind::For => write!(f, "For"),
            TokenKind::To => write!(f, "To"),
            TokenKind::EndFor => write!(f, "End For"),
            TokenKind::And => write!(f, "And"),
            TokenKind::Or => write!(f, "Or"),
            TokenKind::Not => write!(f, "Not"),
            TokenKind::Tap => write!(f, "Tap"),
            TokenKind::Mod => write!(f, "Mod"),
            TokenKind::IntegerType => write!(f, "Integer"),
            TokenKind::RealType => write!(f, "Real"),
            TokenKind::StringType => write!(f, "String"),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Equal => write!(f, "=="),
            TokenKind::NotEqual => write!(f, "!="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source spelling, original casing preserved.
    pub lexeme: String,
    /// 1-based line of the token's first character.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}
