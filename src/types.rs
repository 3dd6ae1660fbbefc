use std::fmt;

use serde::Serialize;

/// Section of the Public Suffix List a rule was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Delegated by ICANN (`// ===BEGIN ICANN DOMAINS===`)
    Icann,
    /// Submitted by private registries (`// ===BEGIN PRIVATE DOMAINS===`)
    Private,
}

/// Kind of a PSL rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Literal suffix: `co.uk`
    Normal,
    /// Any single label in front of the suffix: `*.ck`
    Wildcard,
    /// Carve-out from a wildcard: `!www.ck`
    Exception,
}

impl RuleKind {
    /// Precedence at a single trie position, higher wins
    pub(crate) fn precedence(self) -> u8 {
        match self {
            RuleKind::Normal => 0,
            RuleKind::Wildcard => 1,
            RuleKind::Exception => 2,
        }
    }
}

/// One parsed PSL entry.
///
/// `labels` holds the literal labels of the rule, most-significant last,
/// without the `*.` or `!` markers: `*.kawasaki.jp` is stored as
/// `["kawasaki", "jp"]` with [`RuleKind::Wildcard`], and `!city.kawasaki.jp`
/// as `["city", "kawasaki", "jp"]` with [`RuleKind::Exception`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub labels: Vec<String>,
    pub kind: RuleKind,
    pub section: Section,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RuleKind::Normal => {}
            RuleKind::Wildcard => f.write_str("*.")?,
            RuleKind::Exception => f.write_str("!")?,
        }
        f.write_str(&self.labels.join("."))
    }
}

/// Outcome of a longest-match query against the rule store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch {
    /// Number of trailing labels forming the public suffix
    pub len: usize,
    /// Kind of the winning rule; `None` when the implicit `*` default won
    pub kind: Option<RuleKind>,
    /// Section of the winning rule; `None` when the implicit `*` default won
    pub section: Option<Section>,
}

impl SuffixMatch {
    /// The implicit default rule: the rightmost label alone is the suffix.
    pub(crate) fn unlisted(label_count: usize) -> Self {
        Self {
            len: label_count.min(1),
            kind: None,
            section: None,
        }
    }

    /// Whether an actual listed rule produced this match
    pub fn is_listed(&self) -> bool {
        self.section.is_some()
    }

    pub fn is_icann(&self) -> bool {
        self.section == Some(Section::Icann)
    }

    pub fn is_private(&self) -> bool {
        self.section == Some(Section::Private)
    }
}

/// Structural breakdown of a hostname or email address.
///
/// Fields that could not be derived are empty strings, so the record always
/// serializes to the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// The caller's input, trimmed
    pub input: String,
    /// Normalized hostname
    pub hostname: String,
    /// Public suffix plus one label (eTLD+1)
    pub registered_domain: String,
    /// Labels in front of the registered domain
    pub subdomain: String,
    /// Effective TLD
    pub public_suffix: String,
    /// Rightmost label of the public suffix
    pub top_level_domain: String,
    /// The registered domain's own label
    pub domain_without_suffix: String,
    pub is_valid: bool,
    #[serde(rename = "isICANN")]
    pub is_icann: bool,
    pub is_private: bool,
}

impl Classification {
    /// Whether a registrable boundary was found
    pub fn has_registered_domain(&self) -> bool {
        !self.registered_domain.is_empty()
    }
}
