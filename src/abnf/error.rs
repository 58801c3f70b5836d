//! Error types for grammar compilation
//!
//! Match failure is not represented here: `test`/`parse` return `None`,
//! because failing to match is an expected, frequent outcome that callers
//! probe for cheaply. The types below are reserved for a grammar text that
//! cannot be compiled at all.

use std::fmt;

use crate::abnf::source::Token;

/// A malformed grammar text: degenerate input, an unterminated group,
/// or a `=/` continuation of a rule that was never defined.
///
/// Positions are zero-based; display through the diagnostics module
/// renders them one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Set when the failure is a specific-token mismatch; rendered as a
    /// ", expected 'X'" suffix.
    pub expected: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            expected: None,
        }
    }

    /// Position the error at an existing token.
    pub fn at_token(message: impl Into<String>, token: &Token) -> Self {
        Self::new(message, token.line, token.column)
    }

    /// Augment with the token that was expected at this position.
    pub fn expected(mut self, token: impl Into<String>) -> Self {
        self.expected = Some(token.into());
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(tok) => write!(f, "{}, expected '{}'", self.message, tok),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Errors that abort a `compile` call; no partial grammar is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Malformed grammar text
    Syntax(SyntaxError),
    /// A rule body references a name absent from the registry
    UndefinedRule {
        name: String,
        line: usize,
        column: usize,
    },
}

impl CompileError {
    /// Zero-based (line, column) of the offending token, for the caret
    /// diagnostic collaborator.
    pub fn position(&self) -> (usize, usize) {
        match self {
            CompileError::Syntax(err) => (err.line, err.column),
            CompileError::UndefinedRule { line, column, .. } => (*line, *column),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(err) => write!(f, "{}", err),
            CompileError::UndefinedRule { name, .. } => {
                write!(f, "rule '{}' is never defined", name)
            }
        }
    }
}

impl std::error::Error for CompileError {}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        CompileError::Syntax(err)
    }
}
