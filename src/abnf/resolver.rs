//! Rule body resolution
//!
//!     Recursive-descent compiler turning one rule's flat token list into
//!     a combinator tree. Runs as phase two of compilation: the registry
//!     index already contains every rule name, so references resolve the
//!     same way regardless of declaration order, including mutual
//!     recursion.
//!
//! Singleton collapsing
//!
//!     A sequence of one element is used unwrapped, and an alternation of
//!     one alternative is used unwrapped. This keeps trees shallow and is
//!     relied on by structural inspection downstream: `r = rule1` resolves
//!     to a bare reference node, never a one-element Or/And wrapper.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::abnf::error::{CompileError, SyntaxError};
use crate::abnf::grammar::RuleId;
use crate::abnf::lexing::Fragment;
use crate::abnf::literals;
use crate::abnf::node::Node;
use crate::abnf::source::Token;

/// `N*`, `*M`, `N*M`, or a bare `*`; bare digits are handled separately.
static REPEAT_BOUNDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*)\*([0-9]*)$").expect("repetition pattern"));

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Last consumed token, for positioning run-out-of-input errors.
    fn last(&self) -> Option<&'a Token> {
        self.tokens.last()
    }
}

/// Resolve one rule's token list against the registry index.
pub fn resolve(
    tokens: &[Token],
    index: &HashMap<String, RuleId>,
) -> Result<Node, CompileError> {
    let mut cursor = Cursor { tokens, pos: 0 };
    let node = resolve_alternation(&mut cursor, index, None)?;
    debug_assert!(cursor.peek().is_none());
    Ok(node)
}

/// Resolve alternatives until `terminator` (or end of input when None).
///
/// Within one alternation level a bare `/` closes the current sequence
/// and opens the next alternative.
fn resolve_alternation(
    cursor: &mut Cursor<'_>,
    index: &HashMap<String, RuleId>,
    terminator: Option<Fragment>,
) -> Result<Node, CompileError> {
    let mut alternatives: Vec<Node> = Vec::new();
    let mut sequence: Vec<Node> = Vec::new();

    loop {
        let Some(token) = cursor.peek() else {
            if let Some(term) = terminator {
                let err = match cursor.last() {
                    Some(last) => SyntaxError::at_token("unterminated group", last),
                    None => SyntaxError::new("unterminated group", 0, 0),
                };
                return Err(err.expected(closing_text(term)).into());
            }
            break;
        };

        match token.kind {
            kind if Some(kind) == terminator => {
                cursor.next();
                break;
            }
            Fragment::GroupClose | Fragment::OptionClose => {
                // A close bracket that doesn't match the open one
                let err = SyntaxError::at_token(
                    format!("unexpected '{}'", token.text),
                    token,
                );
                let err = match terminator {
                    Some(term) => err.expected(closing_text(term)),
                    None => err,
                };
                return Err(err.into());
            }
            Fragment::Alternative => {
                let token = cursor.next().expect("peeked");
                alternatives.push(close_sequence(sequence, token)?);
                sequence = Vec::new();
            }
            _ => sequence.push(resolve_element(cursor, index)?),
        }
    }

    let Some(last) = cursor.last() else {
        return Err(SyntaxError::new("rule has an empty body", 0, 0).into());
    };
    alternatives.push(close_sequence(sequence, last)?);

    Ok(collapse(alternatives, Node::Or))
}

/// Wrap accumulated sub-rules in an And only when more than one exists;
/// an empty alternative is malformed.
fn close_sequence(sequence: Vec<Node>, at: &Token) -> Result<Node, CompileError> {
    if sequence.is_empty() {
        return Err(SyntaxError::at_token("expected an element", at).into());
    }
    Ok(collapse(sequence, Node::And))
}

fn collapse(mut nodes: Vec<Node>, wrap: fn(Vec<Node>) -> Node) -> Node {
    if nodes.len() == 1 {
        nodes.pop().expect("length checked")
    } else {
        wrap(nodes)
    }
}

fn closing_text(terminator: Fragment) -> &'static str {
    match terminator {
        Fragment::OptionClose => "]",
        _ => ")",
    }
}

/// Resolve one element: a group, an optional, a literal, a repetition
/// wrapping the next element, or a rule-name reference.
fn resolve_element(
    cursor: &mut Cursor<'_>,
    index: &HashMap<String, RuleId>,
) -> Result<Node, CompileError> {
    let token = cursor.next().expect("caller peeked");

    match token.kind {
        Fragment::GroupOpen => resolve_alternation(cursor, index, Some(Fragment::GroupClose)),
        Fragment::OptionOpen => {
            let inner = resolve_alternation(cursor, index, Some(Fragment::OptionClose))?;
            Ok(Node::Optional(Box::new(inner)))
        }
        Fragment::QuotedInsensitive => Ok(Node::Literal {
            text: unquote(&token.text),
            fold_case: true,
        }),
        Fragment::QuotedSensitive => Ok(Node::Literal {
            text: unquote(&token.text),
            fold_case: false,
        }),
        Fragment::Numeric => Ok(literals::expand(token)?),
        Fragment::Repeat => {
            let (min, max) = repeat_bounds(token)?;
            if cursor.peek().is_none() {
                return Err(SyntaxError::at_token(
                    "repetition count without an element to repeat",
                    token,
                )
                .into());
            }
            let inner = resolve_element(cursor, index)?;
            Ok(Node::Repeat {
                min,
                max,
                inner: Box::new(inner),
            })
        }
        // Everything else is a rule-name reference
        _ => {
            let name = strip_brackets(&token.text);
            match index.get(&name.to_ascii_lowercase()) {
                Some(&id) => Ok(Node::Rule(id)),
                None => Err(CompileError::UndefinedRule {
                    name: name.to_string(),
                    line: token.line,
                    column: token.column,
                }),
            }
        }
    }
}

fn strip_brackets(name: &str) -> &str {
    name.strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(name)
}

/// Parse a repetition-count token into {min, max}; `max: None` is
/// unbounded.
fn repeat_bounds(token: &Token) -> Result<(u32, Option<u32>), CompileError> {
    let parse = |digits: &str| -> Result<u32, CompileError> {
        digits.parse().map_err(|_| {
            SyntaxError::at_token(
                format!("repetition count '{}' out of range", digits),
                token,
            )
            .into()
        })
    };

    if let Some(captures) = REPEAT_BOUNDS.captures(&token.text) {
        let min = match &captures[1] {
            "" => 0,
            digits => parse(digits)?,
        };
        let max = match &captures[2] {
            "" => None,
            digits => Some(parse(digits)?),
        };
        Ok((min, max))
    } else {
        // Bare digits: exactly N repetitions
        let n = parse(&token.text)?;
        Ok((n, Some(n)))
    }
}

/// Strip the outer quotes and resolve backslash escapes.
fn unquote(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                text.push(escaped);
            }
        } else {
            text.push(c);
        }
    }
    text
}
