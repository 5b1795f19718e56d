//! Tokenizer for the entity query language

use std::fmt;

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword; keywords are matched case-insensitively by the parser
    Ident(String),
    /// Single-quoted string literal, with `''` unescaped
    Str(String),
    Int(i64),
    /// Positional parameter `?N`
    Param(usize),
    Dot,
    Eq,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "'{}'", s),
            Token::Str(s) => write!(f, "string '{}'", s),
            Token::Int(i) => write!(f, "integer {}", i),
            Token::Param(i) => write!(f, "?{}", i),
            Token::Dot => f.write_str("'.'"),
            Token::Eq => f.write_str("'='"),
        }
    }
}

/// Split query text into tokens
///
/// Returns a description of the offending input on failure.
pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '\'' => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\'')) => {
                            if matches!(chars.peek(), Some((_, '\''))) {
                                chars.next();
                                literal.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some((_, ch)) => literal.push(ch),
                        None => {
                            return Err(format!("unterminated string literal at offset {}", pos))
                        }
                    }
                }
                tokens.push(Token::Str(literal));
            }
            '?' => {
                chars.next();
                let digits = take_while(&mut chars, |ch| ch.is_ascii_digit());
                let index: usize = digits
                    .parse()
                    .map_err(|_| format!("expected parameter position after '?' at offset {}", pos))?;
                if index == 0 {
                    return Err("parameter positions start at ?1".to_string());
                }
                tokens.push(Token::Param(index));
            }
            c if c.is_ascii_digit() || c == '-' => {
                chars.next();
                let rest = take_while(&mut chars, |ch| ch.is_ascii_digit());
                let text = format!("{}{}", c, rest);
                let value: i64 = text
                    .parse()
                    .map_err(|_| format!("invalid integer literal '{}' at offset {}", text, pos))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let word = take_while(&mut chars, |ch| ch.is_alphanumeric() || ch == '_');
                tokens.push(Token::Ident(word));
            }
            other => {
                return Err(format!("unexpected character '{}' at offset {}", other, pos));
            }
        }
    }

    Ok(tokens)
}

fn take_while<I>(chars: &mut std::iter::Peekable<I>, pred: impl Fn(char) -> bool) -> String
where
    I: Iterator<Item = (usize, char)>,
{
    let mut out = String::new();
    while let Some(&(_, ch)) = chars.peek() {
        if !pred(ch) {
            break;
        }
        out.push(ch);
        chars.next();
    }
    out
}
