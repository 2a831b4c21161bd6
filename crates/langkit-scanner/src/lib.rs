//! Generic character scanner: converts source text into a token stream.
//!
//! The engine knows nothing about any concrete lexical grammar. A
//! caller-supplied [`Classifier`] decides what each character means and
//! drives token emission through the scanner's cursor primitives;
//! unrecognized characters become [`ScanError`]s and scanning continues
//! with the next character, so a single pass always yields a complete,
//! sentinel-terminated token sequence.

pub mod scanner;
pub mod token;

pub use scanner::{is_alpha, is_digit, Classifier, ScanError, ScanResult, Scanner};
pub use token::{Literal, Token};
