use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An error that happened at compile time.
///
/// This is the uniform shape every engine-local error (lexical or
/// syntactic) is translated into before it reaches the caller. All
/// positions are 0-based and relative to the start of their line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    /// Human-readable error message.
    pub message: String,
    /// Line position where the error starts.
    pub start: u32,
    /// Line position where the error ends.
    pub end: u32,
    /// Line number where the error starts.
    pub start_line: u32,
    /// Line number where the error ends.
    pub end_line: u32,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Aggregate failure carrying a non-empty list of [`CompileError`]s.
///
/// The display message is the newline-joined concatenation of the
/// individual messages, preserving original order.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CompileFailure {
    /// The errors that caused the failure, in the order they occurred.
    pub errors: Vec<CompileError>,
    message: String,
}

impl CompileFailure {
    /// Consume the error list to build the failure with a readable message.
    pub fn new(errors: Vec<CompileError>) -> Self {
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { errors, message }
    }
}

/// Fail if the passed list contains any error.
///
/// This is strictly a caller-facing convenience for fail-fast behavior
/// at the pipeline boundary; neither engine requires it.
pub fn fail_on_any(errors: Vec<CompileError>) -> Result<(), CompileFailure> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CompileFailure::new(errors))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
