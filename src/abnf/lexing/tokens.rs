//! Fragment definitions for the ABNF grammar notation
//!
//! This module defines all the fragments that can be produced by the
//! grammar scanner. The fragments are defined using the logos derive macro
//! for efficient tokenization. The notation is RFC 5234 ABNF plus two
//! extensions: single-quoted case-sensitive string literals and the `=/`
//! incremental-alternative marker.

use logos::Logos;
use serde::Serialize;

/// All fragment categories in an ABNF grammar line
///
/// Whitespace between fragments is consumed by the lexer and never
/// emitted. Comments are emitted here and dropped by the scanner, so the
/// scanner keeps one obvious place where they disappear.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[logos(skip r"[ \t\r]+")]
pub enum Fragment {
    // Comment runs from ';' to end of line
    #[regex(r";[^\n]*")]
    Comment,

    // Incremental alternative: continues a previously defined rule.
    // Must be declared before '=' so the two never shadow each other.
    #[token("=/")]
    Continue,

    #[token("=")]
    Define,

    #[token("/")]
    Alternative,

    #[token("(")]
    GroupOpen,
    #[token(")")]
    GroupClose,
    #[token("[")]
    OptionOpen,
    #[token("]")]
    OptionClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,

    // Repetition counts: bare digits, 'N*', '*N', 'N*M', or a bare '*'
    #[regex(r"[0-9]*\*[0-9]*")]
    #[regex(r"[0-9]+")]
    Repeat,

    // Rule names: letters/digits/hyphen, optionally wrapped in angle
    // brackets. RFC 5234 rule names always start with a letter.
    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*>")]
    #[regex(r"[a-zA-Z][a-zA-Z0-9-]*")]
    RuleName,

    // Numeric literal: '%' + base marker + digit groups separated by '.'
    // (concatenation) or '-' (range). Digit validity per base is checked
    // at expansion time so the error can carry a precise message.
    #[regex(r"%[bBdDxX][0-9a-fA-F]+([.\-][0-9a-fA-F]+)*")]
    Numeric,

    // Double-quoted strings match case-insensitively (RFC behavior)
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    QuotedInsensitive,

    // Single-quoted strings match case-sensitively (extension)
    #[regex(r"'([^'\\\n]|\\.)*'")]
    QuotedSensitive,
}

impl Fragment {
    /// True for the two quoted-string categories.
    pub fn is_quoted(self) -> bool {
        matches!(self, Fragment::QuotedInsensitive | Fragment::QuotedSensitive)
    }

    /// True for fragments that never appear inside a rule body group
    /// (the definition markers themselves).
    pub fn is_definition_marker(self) -> bool {
        matches!(self, Fragment::Define | Fragment::Continue)
    }
}
