//! Generic token parser: converts a token stream into an AST.
//!
//! The engine drives a caller-supplied recursive-descent [`Grammar`]
//! over a sentinel-terminated token sequence (conventionally the
//! `tokens` of a [`langkit_scanner::ScanResult`]), collecting every
//! syntactic error along the descent instead of stopping at the first.
//! A failed [`Parser::consume`] aborts the whole descent through the
//! [`Abort`] signal threaded back with `?`; [`Parser::parse`] catches
//! it at the top and always returns a well-formed [`ParseResult`].

pub mod parser;

pub use parser::{Abort, Grammar, ParseResult, Parser, SyntacticError};
