//! Core scanning engine: character cursor, line/position bookkeeping,
//! token emission, and lexical-error accumulation.
//!
//! The engine tracks two coordinate systems at once: an absolute cursor
//! into the decoded character buffer (used to slice lexemes) and a
//! line-relative cursor plus line counter (used for human-facing
//! position reporting). It does **not** decide what a newline is — the
//! [`Classifier`] must call [`Scanner::mark_next_line`] whenever it
//! consumes a character it treats as ending a line. Omitting that call
//! makes later position reports misattribute line numbers; this is a
//! caller contract, not an engine-enforced invariant.

use langkit_common::{fail_on_any, CompileError, CompileFailure};
use thiserror::Error;

use crate::token::{Literal, Token};

/// The classification hook supplied per concrete language.
///
/// [`Scanner::scan`] offers every consumed character to `try_process`.
/// The routine either recognises the character — consuming further
/// input through the scanner's primitives and emitting zero or more
/// tokens — and returns `true`, or returns `false` to have the engine
/// record a lexical error spanning exactly that character.
pub trait Classifier<K> {
    /// Process one character, or report it as unrecognised.
    fn try_process(&mut self, scanner: &mut Scanner<K>, next: char) -> bool;
}

impl<K, F> Classifier<K> for F
where
    F: FnMut(&mut Scanner<K>, char) -> bool,
{
    fn try_process(&mut self, scanner: &mut Scanner<K>, next: char) -> bool {
        self(scanner, next)
    }
}

/// A lexical error: a character the classifier could not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ScanError {
    /// The line position where the error starts.
    pub start: u32,
    /// The line position where the error ends.
    pub end: u32,
    /// The line the error is on.
    pub line: u32,
    /// The error text.
    pub message: String,
}

/// The result of a scan: the token sequence plus any errors collected.
///
/// Terminal value — never mutated after construction. The token
/// sequence is always non-empty and ends with the sentinel token.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult<K> {
    /// The scanned tokens, ending with the end-of-stream sentinel.
    pub tokens: Vec<Token<K>>,
    /// Errors that occurred while scanning.
    pub errors: Vec<ScanError>,
}

impl<K> ScanResult<K> {
    /// Did any error occur?
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Translate the lexical errors into uniform [`CompileError`]s.
    pub fn compile_errors(&self) -> Vec<CompileError> {
        self.errors
            .iter()
            .map(|e| CompileError {
                message: format!("Syntax error: {}", e.message),
                start: e.start,
                end: e.end,
                start_line: e.line,
                end_line: e.line,
            })
            .collect()
    }

    /// Fail if any error exists in the scan result.
    pub fn ensure_ok(&self) -> Result<(), CompileFailure> {
        fail_on_any(self.compile_errors())
    }
}

/// The generic character scanner.
///
/// Each call to [`Scanner::scan`] consumes the scanner: cursor and
/// accumulator state is private to one invocation, so distinct scans
/// never share mutable state.
pub struct Scanner<K> {
    /// The decoded input characters.
    chars: Vec<char>,
    /// Absolute index where the current token started.
    start_abs: usize,
    /// Absolute index of the next character to consume.
    current_abs: usize,
    /// Line-relative position where the current token started.
    start_rel: u32,
    /// Line-relative position of the cursor.
    current_rel: u32,
    /// Current line number (0-based).
    line: u32,
    /// Tokens emitted so far.
    tokens: Vec<Token<K>>,
    /// Lexical errors recorded so far.
    errors: Vec<ScanError>,
}

impl<K> Scanner<K> {
    /// Create a scanner over the given input.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            start_abs: 0,
            current_abs: 0,
            start_rel: 0,
            current_rel: 0,
            line: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Run the scanner to completion and return the scanning result.
    ///
    /// While input remains: mark the current position as the token
    /// start, consume one character, and offer it to the classifier.
    /// An unrecognised character records one [`ScanError`] and scanning
    /// continues — the engine never aborts early. On completion the
    /// end-of-stream sentinel is appended at the final cursor position.
    pub fn scan(mut self, classifier: &mut impl Classifier<K>) -> ScanResult<K> {
        while !self.is_complete() {
            self.start_abs = self.current_abs;
            self.start_rel = self.current_rel;
            let next = self.advance();
            if !classifier.try_process(&mut self, next) {
                self.errors.push(ScanError {
                    start: self.start_rel,
                    end: self.current_rel,
                    line: self.line,
                    message: format!("Unknown character '{next}'."),
                });
            }
        }

        self.tokens.push(Token {
            kind: None,
            lexeme: None,
            literal: None,
            line: self.line,
            start: self.start_rel,
            end: self.current_rel,
        });

        ScanResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    // ── Cursor primitives ─────────────────────────────────────────────

    /// Returns `true` when the character at `current + offset` equals
    /// `expected`. Never fails: `false` past the end of input.
    pub fn check(&self, offset: usize, expected: char) -> bool {
        self.check_with(offset, |c| c == expected)
    }

    /// Returns `true` when the character at `current + offset`
    /// satisfies the predicate. Never fails: `false` past the end of
    /// input.
    pub fn check_with(&self, offset: usize, predicate: impl Fn(char) -> bool) -> bool {
        let at = self
            .current_abs
            .checked_add(offset)
            .and_then(|i| self.chars.get(i));
        match at {
            Some(&c) => predicate(c),
            None => false,
        }
    }

    /// Consume and return the next character.
    ///
    /// # Panics
    ///
    /// Panics if called after input exhaustion — a caller error, not a
    /// recoverable condition. Check [`Scanner::is_complete`] first.
    pub fn advance(&mut self) -> char {
        self.current_rel += 1;
        let next = self.chars[self.current_abs];
        self.current_abs += 1;
        next
    }

    /// Consume the next character only if it satisfies the predicate.
    ///
    /// Returns `false`, consuming nothing, when the predicate fails or
    /// input is exhausted.
    pub fn advance_if(&mut self, predicate: impl Fn(char) -> bool) -> bool {
        if self.is_complete() {
            return false;
        }
        if !predicate(self.chars[self.current_abs]) {
            return false;
        }
        self.current_abs += 1;
        self.current_rel += 1;
        true
    }

    /// Signal that the next line starts here: increments the line
    /// counter and resets the line-relative cursor to zero.
    ///
    /// Must be called by the classifier exactly when it consumes a
    /// character it treats as ending a line (LF, CR LF, or any
    /// language-specific convention) — required for correct positions
    /// in error messages.
    pub fn mark_next_line(&mut self) {
        self.line += 1;
        self.current_rel = 0;
    }

    /// Returns `true` when the whole input has been consumed.
    pub fn is_complete(&self) -> bool {
        self.current_abs >= self.chars.len()
    }

    // ── Token emission ────────────────────────────────────────────────

    /// Append a token at the current coordinates. Its lexeme is the
    /// exact substring from the marked token start to the cursor.
    pub fn emit_token(&mut self, kind: K) {
        self.emit(kind, None);
    }

    /// Append a token carrying a decoded literal value.
    pub fn emit_literal(&mut self, kind: K, literal: Literal) {
        self.emit(kind, Some(literal));
    }

    fn emit(&mut self, kind: K, literal: Option<Literal>) {
        let lexeme = self.current_lexeme();
        self.tokens.push(Token {
            kind: Some(kind),
            lexeme: Some(lexeme),
            literal,
            line: self.line,
            start: self.start_rel,
            end: self.current_rel,
        });
    }

    /// Returns the substring scanned in the current iteration without
    /// emitting — for routines that need the raw text to decide on a
    /// literal value first.
    pub fn current_lexeme(&self) -> String {
        self.chars[self.start_abs..self.current_abs].iter().collect()
    }
}

// ── Character classes ─────────────────────────────────────────────────

/// Returns `true` if the character is an ASCII digit.
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` if the character is an ASCII word letter.
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
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
        Number,
    }

    /// Classifier for a word/number toy language: letters and digits
    /// form tokens, spaces are skipped, `\n` advances the line.
    fn classify(scanner: &mut Scanner<Kind>, next: char) -> bool {
        match next {
            ' ' | '\t' => true,
            '\n' => {
                scanner.mark_next_line();
                true
            }
            c if is_alpha(c) => {
                while scanner.advance_if(is_alpha) {}
                scanner.emit_token(Kind::Word);
                true
            }
            c if is_digit(c) => {
                while scanner.advance_if(is_digit) {}
                let value: f64 = scanner.current_lexeme().parse().unwrap();
                scanner.emit_literal(Kind::Number, Literal::Number(value));
                true
            }
            _ => false,
        }
    }

    fn scan(input: &str) -> ScanResult<Kind> {
        Scanner::new(input).scan(&mut classify)
    }

    #[test]
    fn test_empty_input_yields_only_sentinel() {
        let result = scan("");
        assert_eq!(result.tokens.len(), 1);
        assert!(result.tokens[0].is_sentinel());
        assert_eq!(result.tokens[0].lexeme, None);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_last_token_is_always_sentinel() {
        for input in ["", "dog", "a b c", "1 2\n3", "###"] {
            let result = scan(input);
            assert!(result.tokens.last().unwrap().is_sentinel(), "input {input:?}");
        }
    }

    #[test]
    fn test_word_token_lexeme_and_positions() {
        let result = scan("dog cat");
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Some(Kind::Word), Some(Kind::Word), None]);
        assert_eq!(result.tokens[0].lexeme.as_deref(), Some("dog"));
        assert_eq!(result.tokens[0].start, 0);
        assert_eq!(result.tokens[0].end, 3);
        assert_eq!(result.tokens[1].lexeme.as_deref(), Some("cat"));
        assert_eq!(result.tokens[1].start, 4);
        assert_eq!(result.tokens[1].end, 7);
    }

    #[test]
    fn test_number_literal_decoded() {
        let result = scan("42");
        assert_eq!(result.tokens[0].literal, Some(Literal::Number(42.0)));
        assert_eq!(result.tokens[0].lexeme.as_deref(), Some("42"));
    }

    #[test]
    fn test_mark_next_line_resets_relative_position() {
        let result = scan("ab\ncd");
        assert_eq!(result.tokens[0].line, 0);
        assert_eq!(result.tokens[0].start, 0);
        assert_eq!(result.tokens[1].line, 1);
        assert_eq!(result.tokens[1].start, 0);
        assert_eq!(result.tokens[1].end, 2);
    }

    #[test]
    fn test_unknown_character_records_error_and_continues() {
        let result = scan("a#b");
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Some(Kind::Word), Some(Kind::Word), None]);
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.message, "Unknown character '#'.");
        assert_eq!(error.start, 1);
        assert_eq!(error.end, 2);
        assert_eq!(error.line, 0);
    }

    #[test]
    fn test_every_unknown_character_reported_independently() {
        let result = scan("#a#\n#");
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[2].line, 1);
        assert_eq!(result.errors[2].start, 0);
    }

    #[test]
    fn test_tokens_match_scan_of_valid_portions_alone() {
        let with_bad = scan("dog # cat");
        let clean = scan("dog  cat");
        let bad_kinds: Vec<_> = with_bad.tokens.iter().map(|t| t.kind).collect();
        let clean_kinds: Vec<_> = clean.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(bad_kinds, clean_kinds);
        assert_eq!(with_bad.errors.len(), 1);
        assert!(clean.errors.is_empty());
    }

    #[test]
    fn test_check_past_end_is_false() {
        let scanner: Scanner<Kind> = Scanner::new("ab");
        assert!(scanner.check(0, 'a'));
        assert!(scanner.check(1, 'b'));
        assert!(!scanner.check(2, 'c'));
        assert!(!scanner.check(1000, 'a'));
        assert!(!scanner.check_with(usize::MAX - 10, |_| true));
    }

    #[test]
    fn test_check_total_after_cursor_moves() {
        // A moved cursor plus a huge offset must not overflow the
        // index arithmetic or wrap back into the buffer.
        let mut scanner: Scanner<Kind> = Scanner::new("abc");
        scanner.advance();
        scanner.advance();
        assert!(scanner.check(0, 'c'));
        assert!(!scanner.check(usize::MAX - 1, 'a'));
        assert!(!scanner.check_with(usize::MAX, |_| true));
    }

    #[test]
    fn test_advance_if_at_end_consumes_nothing() {
        let mut scanner: Scanner<Kind> = Scanner::new("");
        assert!(!scanner.advance_if(|_| true));
        assert!(scanner.is_complete());
    }

    #[test]
    fn test_advance_if_failing_predicate_consumes_nothing() {
        let mut scanner: Scanner<Kind> = Scanner::new("a");
        assert!(!scanner.advance_if(is_digit));
        assert!(scanner.advance_if(is_alpha));
        assert!(scanner.is_complete());
    }

    #[test]
    #[should_panic]
    fn test_advance_past_end_panics() {
        let mut scanner: Scanner<Kind> = Scanner::new("");
        scanner.advance();
    }

    #[test]
    fn test_token_start_positions_non_decreasing_per_line() {
        let result = scan("a bb ccc\nd ee");
        let mut last_line = 0;
        let mut last_start = 0;
        for token in &result.tokens {
            if token.line == last_line {
                assert!(token.start >= last_start);
            } else {
                assert!(token.line > last_line);
            }
            last_line = token.line;
            last_start = token.start;
        }
    }

    #[test]
    fn test_compile_errors_translation() {
        let result = scan("a?b");
        let errors = result.compile_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Syntax error: Unknown character '?'.");
        assert_eq!(errors[0].start, 1);
        assert_eq!(errors[0].end, 2);
        assert_eq!(errors[0].start_line, 0);
        assert_eq!(errors[0].end_line, 0);
    }

    #[test]
    fn test_ensure_ok() {
        assert!(scan("dog").ensure_ok().is_ok());
        let failure = scan("a # b #").ensure_ok().unwrap_err();
        assert_eq!(failure.errors.len(), 2);
        assert_eq!(
            failure.to_string(),
            "Syntax error: Unknown character '#'.\nSyntax error: Unknown character '#'."
        );
    }

    #[test]
    fn test_multi_byte_characters_count_as_one_position() {
        let mut unknown = Vec::new();
        let mut classify = |scanner: &mut Scanner<Kind>, next: char| match next {
            'é' | 'ß' => {
                scanner.emit_token(Kind::Word);
                true
            }
            _ => {
                unknown.push(next);
                false
            }
        };
        let result = Scanner::new("éß").scan(&mut classify);
        assert_eq!(result.tokens[0].start, 0);
        assert_eq!(result.tokens[0].end, 1);
        assert_eq!(result.tokens[1].start, 1);
        assert_eq!(result.tokens[1].end, 2);
        assert!(unknown.is_empty());
    }
}
