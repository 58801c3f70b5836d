//! Combinator tree and matching semantics
//!
//!     The resolver compiles every rule body into a tree of the six node
//!     kinds below. Matching is a fresh top-down evaluation per call with
//!     an explicit (input, index) cursor threaded through return values;
//!     no state survives between calls and nothing is mutated, so
//!     independent matches against one compiled grammar can run
//!     concurrently on shared trees.
//!
//! Failure is a value
//!
//!     `test`/`parse` return `None` on a failed match. Sequence,
//!     alternation and repetition evaluation pass failures around as
//!     ordinary values; nothing in this module returns an error.
//!
//! Semantics
//!
//!     - Literal: consumes its own length on exact (or ASCII case-folded)
//!       equality.
//!     - And: every child must match at increasing offsets; the result is
//!       the sum of child lengths. No backtracking across siblings.
//!     - Or: first match in declaration order wins, not the longest one;
//!       alternative order in the grammar source is semantically
//!       significant.
//!     - Optional: the child's length, or zero. Never fails.
//!     - Repeat: greedy up to max; fails below min. A zero-length child
//!       match counts as one non-advancing iteration and stops the loop,
//!       so rules that can match empty never spin.
//!     - Rule: delegates through the registry by id. Recursion between
//!       rules is resolved here at traversal time, never by instantiating
//!       nodes twice.

use std::collections::HashMap;

use serde::Serialize;

use crate::abnf::grammar::{Rule, RuleId};

/// One node of a compiled rule body.
///
/// Sequences own their sub-nodes; a `Rule` node owns only a registry id,
/// which is what makes forward and mutual recursion representable in an
/// acyclic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node {
    /// Reference to another rule, resolved through the registry
    Rule(RuleId),
    /// Alternation: first matching child wins
    Or(Vec<Node>),
    /// Sequence: all children must match consecutively
    And(Vec<Node>),
    /// Matches its child or the empty string
    Optional(Box<Node>),
    /// Greedy bounded repetition; `max: None` is unbounded
    Repeat {
        min: u32,
        max: Option<u32>,
        inner: Box<Node>,
    },
    /// String literal; `fold_case` selects ASCII case-insensitive
    /// comparison (double-quoted strings) over exact comparison
    /// (single-quoted strings and numeric literals)
    Literal { text: String, fold_case: bool },
}

/// Input sequence abstraction.
///
/// A grammar matches either a plain string, where a literal consumes one
/// position per character, or a pre-tokenized sequence, where a literal
/// consumes exactly one element equal to the whole literal.
pub trait Matchable {
    fn len(&self) -> usize;

    /// Match `text` at `at`, returning the number of elements consumed.
    fn literal(&self, at: usize, text: &str, fold_case: bool) -> Option<usize>;

    /// The matched input between `at` and `at + len`, for parse hooks.
    fn excerpt(&self, at: usize, len: usize) -> String;
}

/// Character-sequence input for plain strings.
pub struct CharInput(Vec<char>);

impl CharInput {
    pub fn new(input: &str) -> Self {
        CharInput(input.chars().collect())
    }
}

impl Matchable for CharInput {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn literal(&self, at: usize, text: &str, fold_case: bool) -> Option<usize> {
        let mut consumed = 0;
        for expected in text.chars() {
            let got = *self.0.get(at + consumed)?;
            let matches = if fold_case {
                got.eq_ignore_ascii_case(&expected)
            } else {
                got == expected
            };
            if !matches {
                return None;
            }
            consumed += 1;
        }
        Some(consumed)
    }

    fn excerpt(&self, at: usize, len: usize) -> String {
        self.0[at..at + len].iter().collect()
    }
}

/// Token-sequence input: each literal consumes exactly one element.
pub struct TokenInput<'a>(pub &'a [&'a str]);

impl Matchable for TokenInput<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn literal(&self, at: usize, text: &str, fold_case: bool) -> Option<usize> {
        let element = *self.0.get(at)?;
        let matches = if fold_case {
            element.eq_ignore_ascii_case(text)
        } else {
            element == text
        };
        matches.then_some(1)
    }

    fn excerpt(&self, at: usize, len: usize) -> String {
        self.0[at..at + len].concat()
    }
}

/// Everything a post-visit hook learns about one matched rule.
pub struct RuleMatch<'a, T> {
    /// Original-case rule name
    pub rule: &'a str,
    /// The matched input slice
    pub text: String,
    /// Values produced by hooks of nested rules, in match order
    pub values: Vec<T>,
    /// Result of the rule's pre-visit hook, when one is registered
    pub entered: Option<T>,
}

type EnterHook<T> = Box<dyn Fn(&str) -> T>;
type MatchHook<T> = Box<dyn Fn(RuleMatch<'_, T>) -> T>;

/// Visitor hooks for `parse`, keyed by normalized rule name.
///
/// The pre-visit hook fires before descending into a rule; the post-visit
/// hook fires with the rule's match and produces the single value that
/// replaces the rule's nested values. Rules without hooks pass their
/// nested values through untouched, so the core never knows what shape
/// callers build.
pub struct Hooks<T> {
    enter: HashMap<String, EnterHook<T>>,
    matched: HashMap<String, MatchHook<T>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Hooks<T> {
    pub fn new() -> Self {
        Hooks {
            enter: HashMap::new(),
            matched: HashMap::new(),
        }
    }

    /// Register a pre-visit hook for `rule` (case-insensitive).
    pub fn on_enter(mut self, rule: &str, hook: impl Fn(&str) -> T + 'static) -> Self {
        self.enter
            .insert(rule.to_ascii_lowercase(), Box::new(hook));
        self
    }

    /// Register a post-visit hook for `rule` (case-insensitive).
    pub fn on_match(mut self, rule: &str, hook: impl Fn(RuleMatch<'_, T>) -> T + 'static) -> Self {
        self.matched
            .insert(rule.to_ascii_lowercase(), Box::new(hook));
        self
    }
}

/// Probe rule `id` at `at`, returning the consumed length.
pub(crate) fn test_rule<I: Matchable>(
    rules: &[Rule],
    id: RuleId,
    input: &I,
    at: usize,
) -> Option<usize> {
    rules[id].node.test_at(rules, input, at)
}

/// Parse rule `id` at `at`, firing its hooks.
pub(crate) fn parse_rule<I: Matchable, T>(
    rules: &[Rule],
    id: RuleId,
    input: &I,
    at: usize,
    hooks: &Hooks<T>,
) -> Option<(usize, Vec<T>)> {
    let rule = &rules[id];
    let entered = hooks.enter.get(&rule.key).map(|hook| hook(&rule.name));
    let (len, values) = rule.node.parse_at(rules, input, at, hooks)?;
    match hooks.matched.get(&rule.key) {
        Some(hook) => {
            let value = hook(RuleMatch {
                rule: &rule.name,
                text: input.excerpt(at, len),
                values,
                entered,
            });
            Some((len, vec![value]))
        }
        None => Some((len, values)),
    }
}

impl Node {
    /// Match-length probe: consumed length on success, `None` on failure.
    pub(crate) fn test_at<I: Matchable>(
        &self,
        rules: &[Rule],
        input: &I,
        at: usize,
    ) -> Option<usize> {
        match self {
            Node::Rule(id) => test_rule(rules, *id, input, at),
            Node::Or(alternatives) => alternatives
                .iter()
                .find_map(|alt| alt.test_at(rules, input, at)),
            Node::And(sequence) => {
                let mut len = 0;
                for node in sequence {
                    len += node.test_at(rules, input, at + len)?;
                }
                Some(len)
            }
            Node::Optional(inner) => Some(inner.test_at(rules, input, at).unwrap_or(0)),
            Node::Repeat { min, max, inner } => {
                let mut len = 0;
                let mut count: u32 = 0;
                loop {
                    if Some(count) == *max {
                        break;
                    }
                    match inner.test_at(rules, input, at + len) {
                        // Zero-length match: one non-advancing iteration,
                        // then stop
                        Some(0) => {
                            count += 1;
                            break;
                        }
                        Some(n) => {
                            len += n;
                            count += 1;
                        }
                        None => break,
                    }
                }
                (count >= *min).then_some(len)
            }
            Node::Literal { text, fold_case } => input.literal(at, text, *fold_case),
        }
    }

    /// Tree-walk with visitor hooks; same control flow as `test_at`, but
    /// every node also accumulates the values its matched rules produce.
    pub(crate) fn parse_at<I: Matchable, T>(
        &self,
        rules: &[Rule],
        input: &I,
        at: usize,
        hooks: &Hooks<T>,
    ) -> Option<(usize, Vec<T>)> {
        match self {
            Node::Rule(id) => parse_rule(rules, *id, input, at, hooks),
            Node::Or(alternatives) => alternatives
                .iter()
                .find_map(|alt| alt.parse_at(rules, input, at, hooks)),
            Node::And(sequence) => {
                let mut len = 0;
                let mut values = Vec::new();
                for node in sequence {
                    let (n, mut nested) = node.parse_at(rules, input, at + len, hooks)?;
                    len += n;
                    values.append(&mut nested);
                }
                Some((len, values))
            }
            Node::Optional(inner) => {
                Some(inner.parse_at(rules, input, at, hooks).unwrap_or((0, Vec::new())))
            }
            Node::Repeat { min, max, inner } => {
                let mut len = 0;
                let mut count: u32 = 0;
                let mut values = Vec::new();
                loop {
                    if Some(count) == *max {
                        break;
                    }
                    match inner.parse_at(rules, input, at + len, hooks) {
                        Some((0, mut nested)) => {
                            values.append(&mut nested);
                            count += 1;
                            break;
                        }
                        Some((n, mut nested)) => {
                            len += n;
                            values.append(&mut nested);
                            count += 1;
                        }
                        None => break,
                    }
                }
                (count >= *min).then_some((len, values))
            }
            Node::Literal { text, fold_case } => input
                .literal(at, text, *fold_case)
                .map(|len| (len, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str, fold_case: bool) -> Node {
        Node::Literal {
            text: text.to_string(),
            fold_case,
        }
    }

    fn test(node: &Node, input: &str) -> Option<usize> {
        node.test_at(&[], &CharInput::new(input), 0)
    }

    #[test]
    fn literal_consumes_its_own_length() {
        assert_eq!(test(&lit("abc", false), "abcdef"), Some(3));
        assert_eq!(test(&lit("abc", false), "abX"), None);
    }

    #[test]
    fn case_folding_is_per_quote_style() {
        assert_eq!(test(&lit("TeSt", false), "test"), None);
        assert_eq!(test(&lit("TeSt", false), "TeSt"), Some(4));
        assert_eq!(test(&lit("test", true), "TEST"), Some(4));
    }

    #[test]
    fn sequence_sums_child_lengths() {
        let node = Node::And(vec![lit("a", false), lit("bc", false)]);
        assert_eq!(test(&node, "abc"), Some(3));
        assert_eq!(test(&node, "a"), None);
    }

    #[test]
    fn alternation_is_first_match_not_longest() {
        let node = Node::Or(vec![lit("a", false), lit("ab", false)]);
        assert_eq!(test(&node, "ab"), Some(1));
    }

    #[test]
    fn optional_never_fails() {
        let node = Node::Optional(Box::new(lit("x", false)));
        assert_eq!(test(&node, "x"), Some(1));
        assert_eq!(test(&node, "y"), Some(0));
    }

    #[test]
    fn repetition_is_greedy_and_bounded() {
        let node = Node::Repeat {
            min: 2,
            max: Some(3),
            inner: Box::new(lit("a", false)),
        };
        assert_eq!(test(&node, "a"), None);
        assert_eq!(test(&node, "aa"), Some(2));
        assert_eq!(test(&node, "aaa"), Some(3));
        assert_eq!(test(&node, "aaaa"), Some(3));
    }

    #[test]
    fn unbounded_repetition_matches_empty() {
        let node = Node::Repeat {
            min: 0,
            max: None,
            inner: Box::new(lit("a", false)),
        };
        assert_eq!(test(&node, ""), Some(0));
        assert_eq!(test(&node, "aaaa"), Some(4));
    }

    #[test]
    fn zero_length_child_does_not_spin() {
        // *( ["a"] ) — the optional matches empty forever
        let node = Node::Repeat {
            min: 0,
            max: None,
            inner: Box::new(Node::Optional(Box::new(lit("a", false)))),
        };
        assert_eq!(test(&node, "aab"), Some(2));
        assert_eq!(test(&node, "b"), Some(0));
    }

    #[test]
    fn zero_length_iteration_still_counts_toward_min() {
        let node = Node::Repeat {
            min: 1,
            max: None,
            inner: Box::new(Node::Optional(Box::new(lit("a", false)))),
        };
        assert_eq!(test(&node, "b"), Some(0));
    }

    #[test]
    fn token_input_consumes_one_element_per_literal() {
        let node = Node::And(vec![lit("GET", false), lit("/index", false)]);
        let input = TokenInput(&["GET", "/index"]);
        assert_eq!(node.test_at(&[], &input, 0), Some(2));

        let wrong = TokenInput(&["GET", "/other"]);
        assert_eq!(node.test_at(&[], &wrong, 0), None);
    }

    #[test]
    fn char_excerpt_rebuilds_the_slice() {
        let input = CharInput::new("hello");
        assert_eq!(input.excerpt(1, 3), "ell");
    }
}
