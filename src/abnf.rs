//! Main module for ABNF library functionality
//!
//!     Compilation runs: grammar text → [source] (tokens grouped by rule
//!     name, via [lexing]) → [grammar] phase one (rule stubs + name
//!     index) → [resolver] phase two (combinator trees, expanding numeric
//!     literals through [literals]) → a [grammar::Grammar] queried with
//!     `test` (match-length probe) or `parse` (tree-walk with visitor
//!     hooks from [node]).

pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod lexing;
pub mod literals;
pub mod node;
pub mod resolver;
pub mod source;
pub mod testing;

pub use error::{CompileError, SyntaxError};
pub use grammar::{Grammar, Parsed, Rule, RuleId, RuleInfo};
pub use node::{Hooks, Node, RuleMatch};
pub use source::{Source, Token};

/// Compile grammar text; the first rule in source order is the entry
/// rule unless `entry` names another one.
pub fn compile(text: &str, entry: Option<&str>) -> Result<Grammar, CompileError> {
    Grammar::compile(text, "<grammar>", entry)
}

/// Like [`compile`], recording the path grammar text was loaded from so
/// diagnostics can point back at the file.
pub fn compile_source(text: &str, path: &str, entry: Option<&str>) -> Result<Grammar, CompileError> {
    Grammar::compile(text, path, entry)
}
