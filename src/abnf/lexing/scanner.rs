//! Per-line fragment scanning
//!
//! This is the entry point where grammar lines become fragment streams.
//! The scanner is a pure function of (line, line index): it owns no state
//! between calls, and every fragment it returns carries its character
//! offset within the line so diagnostics can point at it.

use logos::Logos;

use crate::abnf::error::SyntaxError;
use crate::abnf::lexing::tokens::Fragment;

/// One raw fragment of a grammar line: the category, the raw text, and
/// the zero-based character offset of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    pub kind: Fragment,
    pub text: String,
    pub column: usize,
}

/// Scan one line of grammar text into fragments.
///
/// Comments are dropped here; whitespace is consumed by the lexer and
/// never surfaces. An unrecognizable character fails with a SyntaxError
/// positioned at the offending column.
pub fn scan_line(line: &str, line_index: usize) -> Result<Vec<RawFragment>, SyntaxError> {
    let mut lexer = Fragment::lexer(line);
    let mut fragments = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        // logos spans are byte offsets; diagnostics want character offsets
        let column = line[..span.start].chars().count();
        match result {
            Ok(Fragment::Comment) => {}
            Ok(kind) => fragments.push(RawFragment {
                kind,
                text: lexer.slice().to_string(),
                column,
            }),
            Err(()) => {
                return Err(SyntaxError::new(
                    format!("unexpected character '{}'", lexer.slice()),
                    line_index,
                    column,
                ));
            }
        }
    }

    Ok(fragments)
}
