//! Lexer
//!
//!     This module turns grammar lines into fragment streams. Fragment
//!     categories are defined with the logos derive macro in [tokens];
//!     [scanner] runs the generated lexer over one line at a time and
//!     converts byte spans into character offsets.
//!
//!     The scanner is deliberately line-oriented: every construct of the
//!     ABNF notation fits on one line (comments end at the line break,
//!     quoted strings cannot span lines), and rule continuation across
//!     lines is a token-stream concern handled by [source](crate::abnf::source),
//!     not a lexing one.

pub mod scanner;
pub mod tokens;

pub use scanner::{scan_line, RawFragment};
pub use tokens::Fragment;
