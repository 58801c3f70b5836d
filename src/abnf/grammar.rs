//! Compiled grammars
//!
//!     Two-phase construction over the Source's token groups. Phase one
//!     builds one rule stub per group and the complete name→id index;
//!     phase two resolves every body against that index. The separation is
//!     what makes forward references and mutual recursion between rules
//!     legal: by the time any body resolves, every name is known.
//!
//!     A compiled Grammar is immutable. `test` and `parse` are pure
//!     functions of (tree, input, index), so independent matches can run
//!     concurrently against one shared Grammar.

use std::collections::HashMap;

use serde::Serialize;

use crate::abnf::error::{CompileError, SyntaxError};
use crate::abnf::node::{parse_rule, test_rule, CharInput, Hooks, Node, TokenInput};
use crate::abnf::resolver;
use crate::abnf::source::Source;

/// Registry index of a rule; bodies reference rules by id, never by copy.
pub type RuleId = usize;

/// One named rule: original-case display name, case-folded lookup key,
/// defining line, and its resolved combinator tree.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub key: String,
    pub line: usize,
    pub node: Node,
}

/// Rule listing entry for tooling output.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub name: String,
    /// One-based defining line
    pub line: usize,
}

/// Successful `parse` outcome: consumed length plus the values produced
/// by the registered hooks, in match order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub length: usize,
    pub values: Vec<T>,
}

/// A compiled ABNF grammar with a chosen entry rule.
#[derive(Debug, Clone)]
pub struct Grammar {
    source: Source,
    rules: Vec<Rule>,
    index: HashMap<String, RuleId>,
    entry: RuleId,
}

impl Grammar {
    /// Compile grammar text. When `entry` is omitted, the first rule in
    /// source order becomes the entry rule.
    pub fn compile(text: &str, path: &str, entry: Option<&str>) -> Result<Grammar, CompileError> {
        let source = Source::build(text, path)?;

        // Phase one: the full index exists before any body resolves
        let index: HashMap<String, RuleId> = source
            .groups()
            .iter()
            .enumerate()
            .map(|(id, group)| (group.key.clone(), id))
            .collect();

        // Phase two: resolve every body against the index
        let mut rules = Vec::with_capacity(source.groups().len());
        for group in source.groups() {
            if group.tokens.is_empty() {
                return Err(SyntaxError::new(
                    format!("rule '{}' has an empty body", group.name),
                    group.line,
                    0,
                )
                .into());
            }
            let node = resolver::resolve(&group.tokens, &index)?;
            rules.push(Rule {
                name: group.name.clone(),
                key: group.key.clone(),
                line: group.line,
                node,
            });
        }

        let entry = match entry {
            Some(name) => *index.get(&name.to_ascii_lowercase()).ok_or_else(|| {
                CompileError::UndefinedRule {
                    name: name.to_string(),
                    line: 0,
                    column: 0,
                }
            })?,
            None => 0,
        };

        Ok(Grammar {
            source,
            rules,
            index,
            entry,
        })
    }

    /// Probe the entry rule against a string: longest matched prefix
    /// length in characters, or `None` when the match fails.
    pub fn test(&self, input: &str) -> Option<usize> {
        let input = CharInput::new(input);
        test_rule(&self.rules, self.entry, &input, 0)
    }

    /// Probe the entry rule against a pre-tokenized sequence: each
    /// literal consumes exactly one element.
    pub fn test_tokens(&self, tokens: &[&str]) -> Option<usize> {
        let input = TokenInput(tokens);
        test_rule(&self.rules, self.entry, &input, 0)
    }

    /// Tree-walk the entry rule with visitor hooks.
    pub fn parse<T>(&self, input: &str, hooks: &Hooks<T>) -> Option<Parsed<T>> {
        let input = CharInput::new(input);
        let (length, values) = parse_rule(&self.rules, self.entry, &input, 0, hooks)?;
        Some(Parsed { length, values })
    }

    /// Like [`parse`](Self::parse), over a pre-tokenized sequence.
    pub fn parse_tokens<T>(&self, tokens: &[&str], hooks: &Hooks<T>) -> Option<Parsed<T>> {
        let input = TokenInput(tokens);
        let (length, values) = parse_rule(&self.rules, self.entry, &input, 0, hooks)?;
        Some(Parsed { length, values })
    }

    /// The entry rule's original-case name.
    pub fn entry_name(&self) -> &str {
        &self.rules[self.entry].name
    }

    /// Look up a rule's resolved tree by name (case-insensitive).
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        let id = *self.index.get(&name.to_ascii_lowercase())?;
        Some(&self.rules[id])
    }

    /// Registry id for a rule name, for structural tree inspection.
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    /// All rules in first-definition order, for tooling output.
    pub fn rule_infos(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|rule| RuleInfo {
                name: rule.name.clone(),
                line: rule.line + 1,
            })
            .collect()
    }

    /// The owning Source, for the diagnostics collaborator.
    pub fn source(&self) -> &Source {
        &self.source
    }
}
