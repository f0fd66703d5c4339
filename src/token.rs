// scans expression text into tokens; never fails

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Number,
    Identifier,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Caret => "^",
            TokenKind::Bang => "!",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub index: usize,
}

/// scan `input` into a token sequence. Whitespace separates tokens and is
/// dropped; any byte that is not a digit, letter, `_`, operator, or
/// whitespace is silently skipped — lenient by design, the parser reports
/// the resulting gap as a missing-operand error downstream.
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c.is_ascii_digit() {
            let start = i;
            let mut seen_dot = false;
            i += 1;
            while i < chars.len()
                && (chars[i].is_ascii_digit() || (chars[i] == '.' && !seen_dot))
            {
                if chars[i] == '.' {
                    seen_dot = true;
                }
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                text: chars[start..i].iter().collect(),
                index: start,
            });
            continue;
        }

        if c.is_alphabetic() {
            let start = i;
            i += 1;
            while i < chars.len()
                && (chars[i].is_alphanumeric() || chars[i] == '_')
            {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Identifier,
                text: chars[start..i].iter().collect(),
                index: start,
            });
            continue;
        }

        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            '!' => Some(TokenKind::Bang),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token {
                kind,
                text: c.to_string(),
                index: i,
            });
            i += 1;
            continue;
        }

        // whitespace, or anything else: skipped without a token
        i += 1;
    }

    tokens
}
