//! Uniform compile diagnostics for the langkit engines.
//!
//! Both the scanner and the parser record their own error shapes while
//! they run; this crate defines the single [`CompileError`] shape those
//! are translated into for presentation, plus the opt-in
//! [`fail_on_any`] boundary for callers who want all-or-nothing
//! behavior instead of an error list.

mod diagnostic;

pub use diagnostic::{fail_on_any, CompileError, CompileFailure};
