//! # abnf
//!
//! An ABNF (RFC 5234) grammar compiler and matcher.
//!
//! Compiles a grammar text into a tree of combinator nodes and matches
//! input strings (or pre-tokenized sequences) against a chosen entry
//! rule. Two small extensions over the RFC: single-quoted string
//! literals match case-sensitively (double-quoted ones stay
//! case-insensitive, per the RFC), and `=/` continues a previously
//! defined rule with further alternatives across lines.
//!
//! ```text
//! greeting = hello [", " name] "!"
//! hello    = "hello" / "hi"
//! name     = 1*ALPHA
//! ALPHA    = %x41-5A / %x61-7A
//! ```
//!
//! Matching is first-match alternation with greedy bounded repetition
//! and no backtracking across sequence siblings; the order of
//! alternatives in the grammar source is semantically significant.

pub mod abnf;

pub use abnf::{compile, compile_source, CompileError, Grammar, Hooks, Parsed, SyntaxError};
