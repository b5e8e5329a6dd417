//! Named statement arguments (`@title`) rewritten to PostgreSQL's positional
//! placeholders (`$1`) so they can be bound through sqlx.
//!
//! Placeholders inside quoted strings (including `E'...'` and `$tag$...$tag$`
//! forms), quoted identifiers and comments (nested block comments included)
//! are left alone. A name used twice maps to the same position.

use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use crate::error::{AlbumError, Result};

/// A value bound to a named argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Text(String),
    Decimal(Decimal),
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for ArgValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// Ordered set of `name -> value` pairs for one statement.
#[derive(Debug, Clone, Default)]
pub struct NamedArgs {
    args: Vec<(String, ArgValue)>,
}

/// Statement text with positional placeholders, plus values in bind order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub sql: String,
    pub values: Vec<ArgValue>,
}

#[derive(Clone, PartialEq)]
enum Scan {
    Normal,
    SingleQuote,
    /// `E'...'` string, where a backslash escapes the next character
    EscapeString,
    DoubleQuote,
    /// Inside `$tag$ ... $tag$`; holds the full delimiter
    DollarQuote(String),
    LineComment,
    /// Block comments nest; holds the current depth
    BlockComment(usize),
}

impl NamedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.args.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.args.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Replace every `@name` placeholder in `sql` with `$n`.
    ///
    /// Values that the statement never references are dropped.
    pub fn rewrite(&self, sql: &str) -> Result<Rewritten> {
        let mut out = String::with_capacity(sql.len());
        let mut order: Vec<&str> = Vec::new();
        let mut values = Vec::new();
        let mut state = Scan::Normal;
        let mut chars = sql.char_indices().peekable();

        while let Some((i, ch)) = chars.next() {
            let next = chars.peek().map(|&(_, c)| c);
            match &mut state {
                Scan::Normal => match ch {
                    '\'' => {
                        state = Scan::SingleQuote;
                        out.push(ch);
                    }
                    'E' | 'e' if next == Some('\'') && !out.ends_with(is_ident_continue) => {
                        chars.next();
                        state = Scan::EscapeString;
                        out.push(ch);
                        out.push('\'');
                    }
                    '"' => {
                        state = Scan::DoubleQuote;
                        out.push(ch);
                    }
                    '-' if next == Some('-') => {
                        chars.next();
                        state = Scan::LineComment;
                        out.push_str("--");
                    }
                    '/' if next == Some('*') => {
                        chars.next();
                        state = Scan::BlockComment(1);
                        out.push_str("/*");
                    }
                    '$' => match dollar_tag(&sql[i..]) {
                        Some(tag) => {
                            // the tag is ASCII, so its length in chars equals its length in bytes
                            for _ in 1..tag.len() {
                                chars.next();
                            }
                            out.push_str(tag);
                            state = Scan::DollarQuote(tag.to_string());
                        }
                        None => out.push(ch),
                    },
                    '@' if next.is_some_and(is_ident_start) => {
                        let start = i + 1;
                        let mut end = start;
                        while let Some(&(j, c)) = chars.peek() {
                            if !is_ident_continue(c) {
                                break;
                            }
                            end = j + c.len_utf8();
                            chars.next();
                        }

                        let name = &sql[start..end];
                        let position = match order.iter().position(|seen| *seen == name) {
                            Some(idx) => idx + 1,
                            None => {
                                let value = self.get(name).ok_or_else(|| {
                                    AlbumError::MissingNamedArg {
                                        name: name.to_string(),
                                    }
                                })?;
                                order.push(name);
                                values.push(value.clone());
                                order.len()
                            }
                        };
                        out.push('$');
                        out.push_str(&position.to_string());
                    }
                    _ => out.push(ch),
                },
                Scan::SingleQuote => {
                    // '' is an escaped quote: closing then reopening gives the same result
                    out.push(ch);
                    if ch == '\'' {
                        state = Scan::Normal;
                    }
                }
                Scan::EscapeString => {
                    out.push(ch);
                    if ch == '\\' {
                        if let Some((_, escaped)) = chars.next() {
                            out.push(escaped);
                        }
                    } else if ch == '\'' {
                        state = Scan::Normal;
                    }
                }
                Scan::DoubleQuote => {
                    out.push(ch);
                    if ch == '"' {
                        state = Scan::Normal;
                    }
                }
                Scan::DollarQuote(tag) => {
                    if ch == '$' && sql[i..].starts_with(tag.as_str()) {
                        for _ in 1..tag.len() {
                            chars.next();
                        }
                        out.push_str(tag);
                        state = Scan::Normal;
                    } else {
                        out.push(ch);
                    }
                }
                Scan::LineComment => {
                    out.push(ch);
                    if ch == '\n' {
                        state = Scan::Normal;
                    }
                }
                Scan::BlockComment(depth) => {
                    out.push(ch);
                    if ch == '/' && next == Some('*') {
                        chars.next();
                        out.push('*');
                        *depth += 1;
                    } else if ch == '*' && next == Some('/') {
                        chars.next();
                        out.push('/');
                        *depth -= 1;
                        if *depth == 0 {
                            state = Scan::Normal;
                        }
                    }
                }
            }
        }

        Ok(Rewritten { sql: out, values })
    }
}

impl Rewritten {
    /// Build a sqlx query with every value bound in placeholder order.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.values
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| match value {
                ArgValue::Int(v) => query.bind(*v),
                ArgValue::Text(v) => query.bind(v.clone()),
                ArgValue::Decimal(v) => query.bind(*v),
            })
    }
}

/// The `$tag$` delimiter at the start of `rest`, if any. `$1` is a positional
/// parameter, not a delimiter.
fn dollar_tag(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix('$')?;
    let close = body.find('$')?;
    let tag = &body[..close];
    let valid = tag.is_empty()
        || (tag.starts_with(is_ident_start) && tag.chars().all(is_ident_continue));
    valid.then(|| &rest[..close + 2])
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
