//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile `:name` (one non-`/` segment) and `*` (any suffix) patterns
//! - Match concrete paths against a compiled pattern
//! - Extract named segment values, percent-decoded
//!
//! # Design Decisions
//! - `:name` needs at least one character and never crosses `/`
//! - `*` matches any run of characters including `/` and the empty string
//! - Matching is anchored at both ends and case-sensitive

use std::fmt;

use crate::link::Params;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A compiled route pattern such as `/workout/:id` or `/help/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    tokens: Vec<Token>,
}

impl RoutePattern {
    /// Compile a pattern string.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tokens = tokenize(&raw);
        Self { raw, tokens }
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if the pattern contains a `:name` segment or a `*` wildcard.
    pub fn is_dynamic(&self) -> bool {
        self.tokens.iter().any(|t| !matches!(t, Token::Literal(_)))
    }

    /// Check whether the whole path is accepted by this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// The part of `path` consumed by the last `*`, percent-decoded.
    pub fn wildcard_tail(&self, path: &str) -> Option<String> {
        self.bindings(path)?
            .into_iter()
            .filter(|(token, _)| matches!(token, Token::Wildcard))
            .map(|(_, value)| decode(value))
            .last()
    }

    /// Value captured by the first `:name` token, percent-decoded.
    ///
    /// `None` when the path does not match or the pattern has no `:name`.
    pub fn extract_param(&self, path: &str) -> Option<String> {
        self.bindings(path)?
            .into_iter()
            .find(|(token, _)| matches!(token, Token::Param(_)))
            .map(|(_, value)| decode(value))
    }

    /// Every `:name` token mapped to its percent-decoded capture.
    ///
    /// Empty when the path does not match.
    pub fn extract_params(&self, path: &str) -> Params {
        let mut params = Params::new();
        for (token, value) in self.bindings(path).unwrap_or_default() {
            if let Token::Param(name) = token {
                params.insert(name.clone(), decode(value));
            }
        }
        params
    }

    // Dynamic tokens paired with the slice of `path` each one consumed.
    fn bindings<'p>(&self, path: &'p str) -> Option<Vec<(&Token, &'p str)>> {
        let captures = self.captures(path)?;
        let dynamic = self.tokens.iter().filter(|t| !matches!(t, Token::Literal(_)));
        Some(dynamic.zip(captures).collect())
    }

    fn captures<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let mut captures = Vec::new();
        if walk(&self.tokens, path, &mut captures) {
            Some(captures)
        } else {
            None
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                flush(&mut literal, &mut tokens);
                tokens.push(Token::Wildcard);
            }
            ':' if chars.peek().is_some_and(|n| is_name_char(*n)) => {
                flush(&mut literal, &mut tokens);
                let mut name = String::new();
                while let Some(n) = chars.next_if(|n| is_name_char(*n)) {
                    name.push(n);
                }
                tokens.push(Token::Param(name));
            }
            _ => literal.push(c),
        }
    }
    flush(&mut literal, &mut tokens);
    tokens
}

// Matching runs on the encoded path so `%2F` never splits a segment.
// Invalid UTF-8 after decoding keeps the raw capture.
fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn flush(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// Anchored backtracking match; params and wildcards are greedy.
fn walk<'p>(tokens: &[Token], path: &'p str, captures: &mut Vec<&'p str>) -> bool {
    let Some((first, rest)) = tokens.split_first() else {
        return path.is_empty();
    };

    let (limit, min) = match first {
        Token::Literal(lit) => {
            return match path.strip_prefix(lit.as_str()) {
                Some(tail) => walk(rest, tail, captures),
                None => false,
            };
        }
        Token::Param(_) => (path.find('/').unwrap_or(path.len()), 1),
        Token::Wildcard => (path.len(), 0),
    };

    for end in (min..=limit).rev().filter(|i| path.is_char_boundary(*i)) {
        captures.push(&path[..end]);
        if walk(rest, &path[end..], captures) {
            return true;
        }
        captures.pop();
    }
    false
}
