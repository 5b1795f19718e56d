//! Recursive-descent parser producing a `SelectStatement`
//!
//! Grammar:
//!
//! ```text
//! select     := SELECT alias FROM entity [AS] alias [WHERE comparison (AND comparison)*]
//! comparison := path '=' operand
//! path       := alias '.' attribute ['.' attribute]
//! operand    := string | integer | '?' position
//! ```

use super::lexer::{tokenize, Token};
use crate::errors::{MuseumError, Result};
use crate::model::Value;

/// Parsed `SELECT` statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Alias named in the SELECT clause
    pub projection: String,
    /// Entity name as written in the FROM clause
    pub entity: String,
    /// Range variable declared in the FROM clause
    pub alias: String,
    /// Conjunction of equality comparisons
    pub conditions: Vec<Comparison>,
}

/// `path = operand`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Path segments, starting with the range variable
    pub path: Vec<String>,
    pub operand: Operand,
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Parameter(usize),
}

struct Parser<'q> {
    query: &'q str,
    tokens: Vec<Token>,
    pos: usize,
}

/// Parse query text
///
/// # Errors
///
/// Returns `QueryMalformed` if the text is not a valid statement.
pub fn parse(query: &str) -> Result<SelectStatement> {
    let tokens = tokenize(query).map_err(|reason| malformed(query, reason))?;
    let mut parser = Parser {
        query,
        tokens,
        pos: 0,
    };
    parser.select()
}

fn malformed(query: &str, reason: impl Into<String>) -> MuseumError {
    MuseumError::QueryMalformed {
        query: query.to_string(),
        reason: reason.into(),
    }
}

impl Parser<'_> {
    fn select(&mut self) -> Result<SelectStatement> {
        self.keyword("SELECT")?;
        let projection = self.ident("alias after SELECT")?;
        self.keyword("FROM")?;
        let entity = self.ident("entity name after FROM")?;
        if self.peek_keyword("AS") {
            self.pos += 1;
        }
        let alias = self.ident("range variable after entity name")?;

        let mut conditions = Vec::new();
        if self.peek_keyword("WHERE") {
            self.pos += 1;
            conditions.push(self.comparison()?);
            while self.peek_keyword("AND") {
                self.pos += 1;
                conditions.push(self.comparison()?);
            }
        }

        if let Some(token) = self.tokens.get(self.pos) {
            return Err(self.error(format!("unexpected {} after end of statement", token)));
        }

        Ok(SelectStatement {
            projection,
            entity,
            alias,
            conditions,
        })
    }

    fn comparison(&mut self) -> Result<Comparison> {
        let mut path = vec![self.ident("path in WHERE clause")?];
        while matches!(self.tokens.get(self.pos), Some(Token::Dot)) {
            self.pos += 1;
            path.push(self.ident("attribute after '.'")?);
        }
        if path.len() < 2 {
            return Err(self.error(format!(
                "'{}' must be qualified with an attribute",
                path[0]
            )));
        }

        match self.next() {
            Some(Token::Eq) => {}
            Some(other) => return Err(self.error(format!("expected '=', found {}", other))),
            None => return Err(self.error("expected '=' but the query ended")),
        }

        let operand = match self.next() {
            Some(Token::Str(s)) => Operand::Literal(Value::Text(s)),
            Some(Token::Int(i)) => Operand::Literal(Value::Integer(i)),
            Some(Token::Param(i)) => Operand::Parameter(i),
            Some(other) => {
                return Err(self.error(format!("expected a literal or parameter, found {}", other)))
            }
            None => return Err(self.error("expected a literal or parameter but the query ended")),
        };

        Ok(Comparison { path, operand })
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.tokens.get(self.pos), Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword))
    }

    fn keyword(&mut self, keyword: &str) -> Result<()> {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            let found = self
                .tokens
                .get(self.pos)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "end of query".to_string());
            Err(self.error(format!("expected {}, found {}", keyword, found)))
        }
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(Token::Ident(word)) if !is_reserved(&word) => Ok(word),
            Some(other) => Err(self.error(format!("expected {}, found {}", what, other))),
            None => Err(self.error(format!("expected {} but the query ended", what))),
        }
    }

    fn error(&self, reason: impl Into<String>) -> MuseumError {
        malformed(self.query, reason)
    }
}

fn is_reserved(word: &str) -> bool {
    ["SELECT", "FROM", "WHERE", "AND", "AS"]
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
}
