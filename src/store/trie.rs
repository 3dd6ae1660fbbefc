//! Arena-backed label trie.
//!
//! Nodes live in a single `Vec` and refer to their children by index. Keys are
//! whole labels, inserted from the TLD inward, so a hostname is matched by
//! walking its labels right to left. A wildcard rule `*.ck` is stored as the
//! child `*` under `ck`.

use std::collections::HashMap;

use crate::types::{Rule, RuleKind, Section};

/// Label under which wildcard rules are stored
pub(crate) const WILDCARD_LABEL: &str = "*";

pub(crate) const ROOT: usize = 0;

/// Rule terminating at a trie node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub kind: RuleKind,
    pub section: Section,
}

#[derive(Debug, Default)]
struct Node {
    children: HashMap<Box<str>, usize>,
    entry: Option<Entry>,
}

/// Result of inserting a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insert {
    /// Node had no rule
    Added,
    /// Node held a lower-precedence rule, which was replaced
    Replaced(Entry),
    /// Node already held an equal or higher-precedence rule
    Kept,
}

#[derive(Debug)]
pub(crate) struct LabelTrie {
    nodes: Vec<Node>,
}

impl LabelTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub fn insert(&mut self, rule: &Rule) -> Insert {
        let mut node = ROOT;
        for label in rule.labels.iter().rev() {
            node = self.child_or_insert(node, label);
        }
        if rule.kind == RuleKind::Wildcard {
            node = self.child_or_insert(node, WILDCARD_LABEL);
        }

        let entry = Entry {
            kind: rule.kind,
            section: rule.section,
        };
        match self.nodes[node].entry {
            None => {
                self.nodes[node].entry = Some(entry);
                Insert::Added
            }
            Some(existing) if entry.kind.precedence() > existing.kind.precedence() => {
                self.nodes[node].entry = Some(entry);
                Insert::Replaced(existing)
            }
            Some(_) => Insert::Kept,
        }
    }

    fn child_or_insert(&mut self, node: usize, label: &str) -> usize {
        if let Some(&child) = self.nodes[node].children.get(label) {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(Node::default());
        self.nodes[node].children.insert(label.into(), child);
        child
    }

    #[inline]
    pub fn child(&self, node: usize, label: &str) -> Option<usize> {
        self.nodes[node].children.get(label).copied()
    }

    #[inline]
    pub fn entry(&self, node: usize) -> Option<Entry> {
        self.nodes[node].entry
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
