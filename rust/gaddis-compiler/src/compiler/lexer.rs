//! Scanner for pseudocode source text.
//!
//! Keywords are case-insensitive and matched longest-first. Multi-word
//! keywords (`End Module`, `End If`, …) allow any run of whitespace between
//! their words, including line breaks, and require a word boundary after the
//! final letter so identifiers like `format` never swallow `For`.

use crate::compiler::tokens::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{ch}'")]
    UnexpectedChar { ch: char, line: usize },
    #[error("Unterminated string")]
    UnterminatedString { line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedChar { line, .. } | LexError::UnterminatedString { line } => *line,
        }
    }
}

/// Keyword phrases, longest first. Multi-word phrases are matched with any
/// whitespace run between the words.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("end function", TokenKind::EndFunction),
    ("end module", TokenKind::EndModule),
    ("end while", TokenKind::EndWhile),
    ("constant", TokenKind::Constant),
    ("function", TokenKind::Function),
    ("end for", TokenKind::EndFor),
    ("declare", TokenKind::Declare),
    ("display", TokenKind::Display),
    ("integer", TokenKind::IntegerType),
    ("end if", TokenKind::EndIf),
    ("module", TokenKind::Module),
    ("return", TokenKind::Return),
    ("string", TokenKind::StringType),
    ("input", TokenKind::Input),
    ("until", TokenKind::Until),
    ("while", TokenKind::While),
    ("call", TokenKind::Call),
    ("else", TokenKind::Else),
    ("real", TokenKind::RealType),
    ("then", TokenKind::Then),
    ("and", TokenKind::And),
    ("for", TokenKind::For),
    ("mod", TokenKind::Mod),
    ("not", TokenKind::Not),
    ("ref", TokenKind::Ref),
    ("set", TokenKind::Set),
    ("tap", TokenKind::Tap),
    ("do", TokenKind::Do),
    ("if", TokenKind::If),
    ("or", TokenKind::Or),
    ("to", TokenKind::To),
];

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Try to match `phrase` at the cursor, case-insensitively, with `\s+`
    /// between words and a word boundary after the last letter. Returns the
    /// number of chars the match spans.
    fn match_phrase(&self, phrase: &str) -> Option<usize> {
        let mut i = self.pos;
        let mut words = phrase.split(' ').peekable();
        while let Some(word) = words.next() {
            for wc in word.chars() {
                let ch = *self.source.get(i)?;
                if !ch.eq_ignore_ascii_case(&wc) {
                    return None;
                }
                i += 1;
            }
            if words.peek().is_some() {
                let mut saw_ws = false;
                while matches!(self.source.get(i), Some(c) if c.is_whitespace()) {
                    i += 1;
                    saw_ws = true;
                }
                if !saw_ws {
                    return None;
                }
            }
        }
        match self.source.get(i) {
            Some(c) if c.is_ascii_alphanumeric() || *c == '_' => None,
            _ => Some(i - self.pos),
        }
    }

    fn match_keyword(&self) -> Option<(TokenKind, usize)> {
        KEYWORDS
            .iter()
            .find_map(|(phrase, kind)| self.match_phrase(phrase).map(|len| (kind.clone(), len)))
    }

    fn read_word(&mut self) -> Token {
        let line = self.line;
        if let Some((kind, len)) = self.match_keyword() {
            let mut lexeme = String::with_capacity(len);
            for _ in 0..len {
                if let Some(ch) = self.advance() {
                    lexeme.push(ch);
                }
            }
            return Token::new(kind, lexeme, line);
        }
        let mut name = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Identifier(name.clone()), name, line)
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        self.advance(); // opening quote
        let mut content = String::new();
        loop {
            match self.current() {
                None | Some('\n') => return Err(LexError::UnterminatedString { line }),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(ch) => {
                    content.push(ch);
                    self.advance();
                }
            }
        }
        let lexeme = format!("\"{}\"", content);
        Ok(Token::new(TokenKind::String(content), lexeme, line))
    }

    fn read_number(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap_or_default());
        }
        if self.current() == Some('.') && matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap_or_default());
            while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap_or_default());
            }
        }
        let value = text.parse::<f64>().unwrap_or(0.0);
        Token::new(TokenKind::Number(value), text, line)
    }

    fn two_char(&mut self, second: char, matched: TokenKind, single: TokenKind) -> Token {
        let line = self.line;
        let first = self.advance().unwrap_or_default();
        if self.current() == Some(second) {
            self.advance();
            Token::new(matched, format!("{}{}", first, second), line)
        } else {
            Token::new(single, first.to_string(), line)
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let ch = self.advance().unwrap_or_default();
        Token::new(kind, ch.to_string(), line)
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.current() {
            match ch {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek() == Some('/') => {
                    while matches!(self.current(), Some(c) if c != '\n') {
                        self.advance();
                    }
                }
                '"' => tokens.push(self.read_string()?),
                '0'..='9' => tokens.push(self.read_number()),
                'a'..='z' | 'A'..='Z' => tokens.push(self.read_word()),
                '=' => tokens.push(self.two_char('=', TokenKind::Equal, TokenKind::Assign)),
                '<' => tokens.push(self.two_char('=', TokenKind::LessEqual, TokenKind::Less)),
                '>' => tokens.push(self.two_char('=', TokenKind::GreaterEqual, TokenKind::Greater)),
                '!' => {
                    let line = self.line;
                    self.advance();
                    if self.current() == Some('=') {
                        self.advance();
                        tokens.push(Token::new(TokenKind::NotEqual, "!=", line));
                    } else {
                        return Err(LexError::UnexpectedChar { ch: '!', line });
                    }
                }
                '+' => tokens.push(self.single(TokenKind::Plus)),
                '-' => tokens.push(self.single(TokenKind::Minus)),
                '*' => tokens.push(self.single(TokenKind::Star)),
                '/' => tokens.push(self.single(TokenKind::Slash)),
                '%' => tokens.push(self.single(TokenKind::Percent)),
                '^' => tokens.push(self.single(TokenKind::Caret)),
                '(' => tokens.push(self.single(TokenKind::LParen)),
                ')' => tokens.push(self.single(TokenKind::RParen)),
                '[' => tokens.push(self.single(TokenKind::LBracket)),
                ']' => tokens.push(self.single(TokenKind::RBracket)),
                ',' => tokens.push(self.single(TokenKind::Comma)),
                other => {
                    return Err(LexError::UnexpectedChar {
                        ch: other,
                        line: self.line,
                    })
                }
            }
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.line));
        Ok(tokens)
    }
}

/// Tokenize a complete source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("source should lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lex_multi_word_keywords() {
        assert_eq!(
            kinds("End Module end   WHILE End\nIf"),
            vec![
                TokenKind::EndModule,
                TokenKind::EndWhile,
                TokenKind::EndIf,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("DECLARE integer WHILE"),
            vec![
                TokenKind::Declare,
                TokenKind::IntegerType,
                TokenKind::While,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_keyword_prefix_stays_identifier() {
        assert_eq!(
            kinds("format force modulo"),
            vec![
                TokenKind::Identifier("format".into()),
                TokenKind::Identifier("force".into()),
                TokenKind::Identifier("modulo".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            kinds("42 3.14"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.14),
                TokenKind::Eof
            ]
        );
        let toks = tokenize("7.5").unwrap();
        assert_eq!(toks[0].lexeme, "7.5");
    }

    #[test]
    fn lex_operators_longest_match() {
        assert_eq!(
            kinds("== = != <= < >= >"),
            vec![
                TokenKind::Equal,
                TokenKind::Assign,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::Less,
                TokenKind::GreaterEqual,
                TokenKind::Greater,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_comments_run_to_end_of_line() {
        assert_eq!(
            kinds("Set x = 1 // this is ignored\nDisplay x"),
            vec![
                TokenKind::Set,
                TokenKind::Identifier("x".into()),
                TokenKind::Assign,
                TokenKind::Number(1.0),
                TokenKind::Display,
                TokenKind::Identifier("x".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_string_literal() {
        let toks = tokenize("Display \"Hello, World!\"").unwrap();
        assert_eq!(toks[1].kind, TokenKind::String("Hello, World!".into()));
        assert_eq!(toks[1].lexeme, "\"Hello, World!\"");
    }

    #[test]
    fn lex_unterminated_string_reports_opening_line() {
        let err = tokenize("Display 1\nDisplay \"oops").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { line: 2 });
    }

    #[test]
    fn lex_unexpected_character() {
        let err = tokenize("Set x = @").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '@', line: 1 });
    }

    #[test]
    fn lex_tracks_lines() {
        let toks = tokenize("Set x = 1\nSet y = 2").unwrap();
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[4].line, 2);
    }

    #[test]
    fn lex_lexeme_preserves_casing() {
        let toks = tokenize("DECLARE Integer Count").unwrap();
        assert_eq!(toks[0].lexeme, "DECLARE");
        assert_eq!(toks[2].lexeme, "Count");
    }
}
