//! Token types shared by the scanner and any downstream parser.
//!
//! [`Token`] is generic over the caller-defined kind enumeration `K`;
//! the end-of-stream sentinel is the one token whose `kind` is `None`.

use std::fmt;

/// One of the scanned tokens.
///
/// Immutable once created; ownership is transferred to the
/// [`ScanResult`](crate::ScanResult) that holds it. All positions are
/// 0-based and relative to the start of the token's line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    /// Token kind, e.g. String, Number, Comma. `None` marks the last
    /// token of a scan (the end-of-stream sentinel).
    pub kind: Option<K>,
    /// The exact source substring the token was derived from, e.g. ","
    /// for Comma. `None` exactly for the sentinel.
    pub lexeme: Option<String>,
    /// Decoded payload, e.g. `Literal::Str("Dog")` for a string token
    /// or `Literal::Number(5.0)` for a number token.
    pub literal: Option<Literal>,
    /// The line number the token is from.
    pub line: u32,
    /// The line position where the token starts.
    pub start: u32,
    /// The line position where the token ends.
    pub end: u32,
}

impl<K> Token<K> {
    /// Returns `true` if this is the end-of-stream sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.kind.is_none()
    }
}

/// A decoded literal value carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Floating-point numeric literal.
    Number(f64),
    /// Integer literal.
    Int(i64),
    /// String literal (after escape processing, if any).
    Str(String),
    /// Boolean literal.
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Str(s) => f.write_str(s),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        Word,
    }

    #[test]
    fn test_sentinel_detection() {
        let sentinel: Token<Kind> = Token {
            kind: None,
            lexeme: None,
            literal: None,
            line: 0,
            start: 0,
            end: 0,
        };
        assert!(sentinel.is_sentinel());

        let word = Token {
            kind: Some(Kind::Word),
            lexeme: Some("dog".into()),
            literal: None,
            line: 0,
            start: 0,
            end: 3,
        };
        assert!(!word.is_sentinel());
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Number(3.5).to_string(), "3.5");
        assert_eq!(Literal::Int(42).to_string(), "42");
        assert_eq!(Literal::Str("dog".into()).to_string(), "dog");
        assert_eq!(Literal::Bool(true).to_string(), "true");
    }
}
