//! Immutable Public Suffix List rule store.
//!
//! The store is built once from a ruleset and never mutated afterwards, so a
//! single `Arc<RuleStore>` can serve any number of threads without locking.
//!
//! ## Example
//!
//! ```
//! use psl_engine_r::store::RuleStore;
//!
//! let store = RuleStore::parse("uk\nco.uk\n*.ck\n!www.ck").unwrap();
//!
//! assert_eq!(store.longest_match(&["shop", "co", "uk"]).len, 2);
//! assert_eq!(store.longest_match(&["a", "b", "ck"]).len, 2);   // wildcard
//! assert_eq!(store.longest_match(&["www", "ck"]).len, 1);      // exception
//! ```

mod trie;

use std::path::Path;

use log::{debug, info};

use crate::error::{PslError, Result};
use crate::parser::{parse_rules, parse_rules_from_file};
use crate::types::{Rule, RuleKind, Section, SuffixMatch};

use trie::{Insert, LabelTrie, ROOT, WILDCARD_LABEL};

/// Indexed PSL ruleset supporting longest-match suffix lookup
#[derive(Debug)]
pub struct RuleStore {
    trie: LabelTrie,
    icann_rules: usize,
    private_rules: usize,
}

impl RuleStore {
    /// Build a store from parsed rules.
    ///
    /// Fails with [`PslError::EmptyRuleSet`] when `rules` is empty.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
        let mut trie = LabelTrie::new();
        let mut icann_rules = 0usize;
        let mut private_rules = 0usize;

        let mut count = |section: Section, delta: isize| {
            let counter = match section {
                Section::Icann => &mut icann_rules,
                Section::Private => &mut private_rules,
            };
            *counter = counter.saturating_add_signed(delta);
        };

        for rule in rules {
            match trie.insert(&rule) {
                Insert::Added => count(rule.section, 1),
                Insert::Replaced(old) => {
                    debug!("Rule '{}' overrides an earlier rule at the same position", rule);
                    count(old.section, -1);
                    count(rule.section, 1);
                }
                Insert::Kept => {
                    debug!("Rule '{}' shadowed by an earlier rule at the same position", rule)
                }
            }
        }

        if icann_rules + private_rules == 0 {
            return Err(PslError::EmptyRuleSet);
        }

        info!(
            "Loaded {} PSL rules ({} ICANN, {} private, {} trie nodes)",
            icann_rules + private_rules,
            icann_rules,
            private_rules,
            trie.node_count()
        );

        Ok(Self {
            trie,
            icann_rules,
            private_rules,
        })
    }

    /// Parse PSL text and build a store from it.
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(parse_rules(text)?)
    }

    /// Read a PSL file (e.g. `public_suffix_list.dat`) and build a store from it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(parse_rules_from_file(path)?)
    }

    /// Find the public suffix of a label sequence.
    ///
    /// `labels` is ordered most-significant last, e.g. `["www", "example", "co", "uk"]`.
    /// When no rule applies, the rightmost label alone is returned as an
    /// unlisted suffix (the PSL's implicit `*` rule).
    pub fn longest_match(&self, labels: &[&str]) -> SuffixMatch {
        let mut best = SuffixMatch::unlisted(labels.len());
        let mut node = ROOT;

        for (depth, label) in labels.iter().rev().enumerate() {
            let exact = self.trie.child(node, label);
            let exact_entry = exact.and_then(|child| self.trie.entry(child));

            match exact_entry {
                Some(entry) if entry.kind == RuleKind::Exception => {
                    // `!www.ck`: the suffix is the rule without its leftmost label
                    return SuffixMatch {
                        len: depth,
                        kind: Some(RuleKind::Exception),
                        section: Some(entry.section),
                    };
                }
                Some(entry) => {
                    best = SuffixMatch {
                        len: depth + 1,
                        kind: Some(entry.kind),
                        section: Some(entry.section),
                    };
                }
                None => {}
            }

            // Wildcard at this position consumes the label and outranks a normal rule
            if let Some(entry) = self
                .trie
                .child(node, WILDCARD_LABEL)
                .and_then(|star| self.trie.entry(star))
            {
                best = SuffixMatch {
                    len: depth + 1,
                    kind: Some(entry.kind),
                    section: Some(entry.section),
                };
            }

            match exact {
                Some(child) => node = child,
                None => break,
            }
        }

        best
    }

    /// Total number of indexed rules
    pub fn len(&self) -> usize {
        self.icann_rules + self.private_rules
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of indexed rules in a section
    pub fn count(&self, section: Section) -> usize {
        match section {
            Section::Icann => self.icann_rules,
            Section::Private => self.private_rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
// ===BEGIN ICANN DOMAINS===
com
uk
co.uk
jp
kawasaki.jp
*.kawasaki.jp
!city.kawasaki.jp
*.foo
!bar.foo
// ===END ICANN DOMAINS===
// ===BEGIN PRIVATE DOMAINS===
blogspot.co.uk
// ===END PRIVATE DOMAINS===
";

    fn store() -> RuleStore {
        RuleStore::parse(RULES).unwrap()
    }

    #[test]
    fn test_empty_rule_set_rejected() {
        assert!(matches!(RuleStore::new(Vec::new()), Err(PslError::EmptyRuleSet)));
        assert!(matches!(
            RuleStore::parse("// nothing here"),
            Err(PslError::EmptyRuleSet)
        ));
    }

    #[test]
    fn test_counts() {
        let store = store();
        assert_eq!(store.len(), 10);
        assert_eq!(store.count(Section::Icann), 9);
        assert_eq!(store.count(Section::Private), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_normal_longest_match() {
        let store = store();
        let m = store.longest_match(&["www", "example", "co", "uk"]);
        assert_eq!(m.len, 2);
        assert_eq!(m.kind, Some(RuleKind::Normal));
        assert!(m.is_icann());

        let m = store.longest_match(&["example", "com"]);
        assert_eq!(m.len, 1);
    }

    #[test]
    fn test_private_rule_wins_when_longer() {
        let store = store();
        let m = store.longest_match(&["me", "blogspot", "co", "uk"]);
        assert_eq!(m.len, 3);
        assert!(m.is_private());
    }

    #[test]
    fn test_wildcard_consumes_one_label() {
        let store = store();
        let m = store.longest_match(&["shop", "x", "kawasaki", "jp"]);
        assert_eq!(m.len, 3);
        assert_eq!(m.kind, Some(RuleKind::Wildcard));
    }

    #[test]
    fn test_normal_rule_under_wildcard_parent() {
        let store = store();
        // kawasaki.jp is also a normal rule; with no extra label the wildcard cannot apply
        let m = store.longest_match(&["kawasaki", "jp"]);
        assert_eq!(m.len, 2);
        assert_eq!(m.kind, Some(RuleKind::Normal));
    }

    #[test]
    fn test_exception_strips_leftmost_label() {
        let store = store();
        let m = store.longest_match(&["www", "city", "kawasaki", "jp"]);
        assert_eq!(m.len, 2);
        assert_eq!(m.kind, Some(RuleKind::Exception));

        let m = store.longest_match(&["bar", "foo"]);
        assert_eq!(m.len, 1);
        assert_eq!(m.kind, Some(RuleKind::Exception));
    }

    #[test]
    fn test_wildcard_without_parent_rule() {
        let store = store();
        let m = store.longest_match(&["baz", "foo"]);
        assert_eq!(m.len, 2);
        assert_eq!(m.kind, Some(RuleKind::Wildcard));

        // "foo" alone has no rule of its own: implicit default
        let m = store.longest_match(&["foo"]);
        assert_eq!(m.len, 1);
        assert!(!m.is_listed());
    }

    #[test]
    fn test_unlisted_falls_back_to_rightmost_label() {
        let store = store();
        let m = store.longest_match(&["localhost"]);
        assert_eq!(m.len, 1);
        assert_eq!(m.kind, None);
        assert!(!m.is_listed());

        let m = store.longest_match(&["my", "example", "internal"]);
        assert_eq!(m.len, 1);
        assert!(!m.is_listed());
    }

    #[test]
    fn test_empty_labels() {
        let store = store();
        let m = store.longest_match(&[]);
        assert_eq!(m.len, 0);
        assert!(!m.is_listed());
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleStore>();
    }
}
