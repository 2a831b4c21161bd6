//! Core parsing engine: token cursor, lookahead primitives, panic-mode
//! error recovery, and syntactic-error accumulation.
//!
//! Errors are collected in order regardless of whether they abort.
//! Only [`Parser::consume`] (and an explicitly returned
//! [`Parser::report`]) aborts the current descent; every other
//! primitive is a pure boolean/lookahead operation with no effect on
//! the error list. A grammar routine can therefore downgrade a
//! potential abort into a soft error — record with `report`, drop the
//! signal, resynchronize with [`Parser::skip`] — so both panic-mode
//! and manual recovery strategies are supported.

use langkit_common::{fail_on_any, CompileError, CompileFailure};
use langkit_scanner::Token;
use thiserror::Error;

/// The grammar entry point supplied per concrete language.
///
/// Grammar routines return `Result<_, Abort>` and propagate the abort
/// signal with `?`; [`Parser::parse`] catches it at the top level.
pub trait Grammar<K: Copy + PartialEq> {
    /// The AST root type this grammar produces.
    type Ast;

    /// Parse the whole token sequence into an AST root.
    fn parse_root(&mut self, tokens: &mut Parser<K>) -> Result<Self::Ast, Abort>;
}

/// The internal unwind signal: an error in the token sequence that
/// doesn't allow building an AST.
///
/// Only the engine creates values of this type (through
/// [`Parser::consume`] and [`Parser::report`]), which guarantees that
/// an aborted parse always carries at least one recorded error.
#[derive(Debug)]
#[must_use = "return the abort signal with `Err(..)` or drop it to record a soft error"]
pub struct Abort(pub(crate) ());

/// One of the parsing errors.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {}: {message}", token.line)]
pub struct SyntacticError<K> {
    /// Token related to the error.
    pub token: Token<K>,
    /// Error text.
    pub message: String,
}

/// The result of a parse: an optional AST root plus any errors
/// collected along the descent.
///
/// Terminal value — never mutated after construction. The AST is
/// absent exactly when the descent was aborted, in which case the
/// error list is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<K, T> {
    /// Parsed AST. `None` when the descent aborted.
    pub ast: Option<T>,
    /// The occurred errors list, in detection order.
    pub errors: Vec<SyntacticError<K>>,
}

impl<K, T> ParseResult<K, T> {
    /// Did any error occur?
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Translate the syntactic errors into uniform [`CompileError`]s.
    ///
    /// Errors on a real token include its lexeme in the message;
    /// errors on the end-of-stream sentinel use the lexeme-less form.
    pub fn compile_errors(&self) -> Vec<CompileError> {
        self.errors
            .iter()
            .map(|e| CompileError {
                message: match &e.token.lexeme {
                    Some(lexeme) => {
                        format!("Syntax error on token '{lexeme}': {}", e.message)
                    }
                    None => format!("Syntax error: {}", e.message),
                },
                start: e.token.start,
                end: e.token.end,
                start_line: e.token.line,
                end_line: e.token.line,
            })
            .collect()
    }

    /// Fail if any error exists in the parse result.
    pub fn ensure_ok(&self) -> Result<(), CompileFailure> {
        fail_on_any(self.compile_errors())
    }
}

/// The generic token parser.
///
/// Each call to [`Parser::parse`] consumes the parser: cursor and
/// accumulator state is private to one invocation, so distinct parses
/// never share mutable state.
pub struct Parser<K> {
    /// The token sequence, ending with the sentinel.
    tokens: Vec<Token<K>>,
    /// Current index into `tokens`. Never moves past the sentinel.
    current: usize,
    /// Syntactic errors recorded so far.
    errors: Vec<SyntacticError<K>>,
}

impl<K: Copy + PartialEq> Parser<K> {
    /// Create a parser over a sentinel-terminated token sequence.
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        debug_assert!(
            tokens.last().is_some_and(Token::is_sentinel),
            "token sequence must end with the end-of-stream sentinel"
        );
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    /// Run the grammar over the tokens and return the parsing result.
    ///
    /// Never fails itself: an aborted descent yields a result with an
    /// absent AST and the (non-empty) accumulated error list.
    pub fn parse<G: Grammar<K>>(mut self, grammar: &mut G) -> ParseResult<K, G::Ast> {
        match grammar.parse_root(&mut self) {
            Ok(ast) => ParseResult {
                ast: Some(ast),
                errors: self.errors,
            },
            Err(Abort(())) => ParseResult {
                ast: None,
                errors: self.errors,
            },
        }
    }

    // ── Token cursor ──────────────────────────────────────────────────

    /// Returns the current token. Total: the sentinel is never
    /// consumed past, so there is always a token under the cursor.
    pub fn peek(&self) -> &Token<K> {
        &self.tokens[self.current]
    }

    /// Returns `true` when all tokens are parsed (the cursor is on
    /// the end-of-stream sentinel).
    pub fn is_complete(&self) -> bool {
        self.peek().is_sentinel()
    }

    /// Returns `true` iff parsing is not complete and the current
    /// token's kind equals `kind`.
    pub fn check(&self, kind: K) -> bool {
        !self.is_complete() && self.peek().kind == Some(kind)
    }

    /// Returns `true` iff the token at `current + offset` has the
    /// given kind. Never fails: `false` past the end of the sequence.
    pub fn check_at(&self, offset: usize, kind: K) -> bool {
        self.current
            .checked_add(offset)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(|t| t.kind == Some(kind))
    }

    /// Returns the offset of the next token with the given kind, or
    /// `None` if no such token remains.
    pub fn next_offset(&self, kind: K) -> Option<usize> {
        (0..self.tokens.len() - self.current).find(|&i| self.check_at(i, kind))
    }

    /// Scans forward treating tokens whose kind is in `allowed` as
    /// transparent. Returns `true` if `kind` is found before any token
    /// outside both sets; the cursor does not move.
    pub fn check_skipping(&self, kind: K, allowed: &[K]) -> bool {
        for i in 0..self.tokens.len() - self.current {
            if self.check_at(i, kind) {
                return true;
            }
            if allowed.iter().any(|&k| self.check_at(i, k)) {
                continue;
            }
            break;
        }
        false
    }

    /// Returns `true` iff the next `count` tokens all have the given
    /// kind.
    pub fn check_repeated(&self, kind: K, count: usize) -> bool {
        (0..count).all(|i| self.check_at(i, kind))
    }

    /// Returns `true` iff the next tokens match the given kind
    /// sequence positionally.
    pub fn check_sequence(&self, kinds: &[K]) -> bool {
        kinds.iter().enumerate().all(|(i, &k)| self.check_at(i, k))
    }

    /// If the current token's kind is among the given kinds, consume
    /// exactly one token and return `true`; otherwise no state change.
    pub fn match_any(&mut self, kinds: &[K]) -> bool {
        if kinds.iter().any(|&k| self.check(k)) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume tokens while their kind is in the given set. Trivially
    /// succeeds when nothing matches — never an error.
    pub fn skip(&mut self, kinds: &[K]) {
        while self.match_any(kinds) {}
    }

    /// Consume the next token of the specified kind, or record a
    /// syntactic error and signal the abort.
    ///
    /// This is the sole built-in mechanism by which a malformed
    /// construct aborts the remaining parse: propagate the signal with
    /// `?` and it unwinds every grammar routine up to
    /// [`Parser::parse`].
    pub fn consume(&mut self, kind: K, message: &str) -> Result<Token<K>, Abort> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        Err(self.report(message))
    }

    /// Record a syntactic error at the current token and return the
    /// abort signal.
    ///
    /// The caller chooses the recovery strategy: return the signal
    /// with `Err(..)` for panic-mode unwinding, or drop it and
    /// resynchronize with [`Parser::skip`] for a soft error.
    pub fn report(&mut self, message: impl Into<String>) -> Abort {
        let token = self.peek().clone();
        self.errors.push(SyntacticError {
            token,
            message: message.into(),
        });
        Abort(())
    }

    /// Consume one token unconditionally and return it. A no-op at the
    /// end of the stream: the cursor never moves past the sentinel.
    pub fn advance(&mut self) -> &Token<K> {
        if !self.is_complete() {
            self.current += 1;
        }
        self.previous()
    }

    /// Consume `count` tokens and return the last consumed.
    pub fn advance_by(&mut self, count: usize) -> &Token<K> {
        for _ in 0..count {
            self.advance();
        }
        self.previous()
    }

    /// Returns the token just consumed.
    ///
    /// # Panics
    ///
    /// Panics at the very start of the sequence — guard with
    /// [`Parser::has_previous`].
    pub fn previous(&self) -> &Token<K> {
        &self.tokens[self.current - 1]
    }

    /// Returns `true` when a previously consumed token exists.
    pub fn has_previous(&self) -> bool {
        self.current > 0
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
