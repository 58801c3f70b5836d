//! Grammar source handling
//!
//!     Splits grammar text into lines, scans each line, tags every token
//!     with its (line, column) position, and groups the flat token
//!     sequence into per-rule-name ordered groups. This is the first of
//!     the two compilation phases described in [grammar](crate::abnf::grammar):
//!     after this module runs, every rule name the grammar defines is
//!     known, so rule bodies may reference each other in any order.
//!
//! Continuation handling
//!
//!     A `=/` marker does not open a new group. It is rewritten as an
//!     injected `/` alternation token appended to the already-existing
//!     group for that name, which makes `rule = a` + `rule =/ b` resolve
//!     identically to `rule = a / b`.

use std::collections::HashMap;

use serde::Serialize;

use crate::abnf::error::SyntaxError;
use crate::abnf::lexing::{scan_line, Fragment};

/// One grammar token: category, whitespace-trimmed raw text, and its
/// zero-based source position. Tokens are created once during lexing and
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: Fragment,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Length of the raw text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The ordered token group for one rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    /// Original-case display name (bracket decoration stripped)
    pub name: String,
    /// Case-folded lookup key
    pub key: String,
    /// Line index of the first definition, for diagnostics
    pub line: usize,
    /// Body tokens, `=`/`=/` markers excluded, continuations merged
    pub tokens: Vec<Token>,
}

/// Owns the grammar text, its split lines, and the token groups keyed by
/// rule name. Built once per `compile` call.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: String,
    pub text: String,
    pub lines: Vec<String>,
    groups: Vec<RuleGroup>,
}

/// Strip optional `<...>` decoration from a rule name.
fn strip_brackets(name: &str) -> &str {
    name.strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(name)
}

impl Source {
    /// Build a Source from grammar text.
    ///
    /// Fails with a SyntaxError when fewer than 3 tokens result (a
    /// degenerate grammar: the smallest well-formed one is `name = body`),
    /// when body tokens appear before any rule definition, or when a `=/`
    /// continuation references a name with no prior definition.
    pub fn build(text: &str, path: &str) -> Result<Source, SyntaxError> {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();

        let mut tokens = Vec::new();
        for (line_index, line) in lines.iter().enumerate() {
            for fragment in scan_line(line, line_index)? {
                tokens.push(Token {
                    kind: fragment.kind,
                    text: fragment.text,
                    line: line_index,
                    column: fragment.column,
                });
            }
        }

        if tokens.len() < 3 {
            return Err(SyntaxError::new("incomplete grammar", 0, 0));
        }

        let groups = group_rules(&tokens)?;
        Ok(Source {
            path: path.to_string(),
            text: text.to_string(),
            lines,
            groups,
        })
    }

    /// Token groups in first-definition order. The first group is the
    /// default entry rule.
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }
}

/// Single left-to-right scan pairing each token with its successor.
///
/// Successor `=` starts a new group keyed by the current token's name;
/// successor `=/` appends an injected `/` token to the existing group;
/// otherwise the current token joins the active group unless it is itself
/// a definition marker.
fn group_rules(tokens: &[Token]) -> Result<Vec<RuleGroup>, SyntaxError> {
    let mut groups: Vec<RuleGroup> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut active: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        match tokens.get(i + 1).map(|t| t.kind) {
            Some(Fragment::Define) => {
                let name = strip_brackets(&token.text).to_string();
                let key = name.to_ascii_lowercase();
                let index = match by_key.get(&key) {
                    // Redefinition with plain '=': latest definition wins,
                    // the group keeps its place in entry order
                    Some(&index) => {
                        groups[index].tokens.clear();
                        index
                    }
                    None => {
                        groups.push(RuleGroup {
                            name,
                            key: key.clone(),
                            line: token.line,
                            tokens: Vec::new(),
                        });
                        by_key.insert(key, groups.len() - 1);
                        groups.len() - 1
                    }
                };
                active = Some(index);
            }
            Some(Fragment::Continue) => {
                let key = strip_brackets(&token.text).to_ascii_lowercase();
                let Some(&index) = by_key.get(&key) else {
                    return Err(SyntaxError::at_token(
                        format!("'=/' continues rule '{}' which has no prior definition", token.text),
                        token,
                    ));
                };
                // The continuation becomes an ordinary alternative of the
                // existing group
                let marker = &tokens[i + 1];
                groups[index].tokens.push(Token {
                    kind: Fragment::Alternative,
                    text: "/".to_string(),
                    line: marker.line,
                    column: marker.column,
                });
                active = Some(index);
            }
            _ => {
                if token.kind.is_definition_marker() {
                    continue;
                }
                let Some(index) = active else {
                    return Err(SyntaxError::at_token("expected a rule definition", token)
                        .expected("="));
                };
                groups[index].tokens.push(token.clone());
            }
        }
    }

    Ok(groups)
}
