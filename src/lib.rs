//! PSL Engine - Public Suffix List domain classification for Rust
//!
//! This library splits an arbitrary hostname or email address into its
//! structural parts using the Public Suffix List:
//! - Registered domain (eTLD+1)
//! - Subdomain
//! - Public suffix (eTLD) and top-level label
//! - ICANN vs. private-registry suffixes
//! - Wildcard (`*.ck`) and exception (`!www.ck`) rules
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use psl_engine_r::{Resolver, RuleStore};
//!
//! let list = "
//! // ===BEGIN ICANN DOMAINS===
//! com
//! uk
//! co.uk
//! // ===END ICANN DOMAINS===
//! ";
//!
//! // Build the rule store once, share it read-only
//! let store = Arc::new(RuleStore::parse(list).unwrap());
//! let resolver = Resolver::new(store);
//!
//! let parts = resolver.classify("support@subdomain.techcorp.co.uk").unwrap();
//! assert_eq!(parts.registered_domain, "techcorp.co.uk");
//! assert_eq!(parts.subdomain, "subdomain");
//! assert_eq!(parts.public_suffix, "co.uk");
//!
//! assert!(!resolver.is_valid_domain("test@localhost"));
//! ```
//!
//! # Input Normalization
//!
//! | Input | Hostname |
//! |-------|----------|
//! | `john@billing.acmecompany.com` | `billing.acmecompany.com` |
//! | `HTTPS://Shop.Example.COM:8080/path?q=1` | `shop.example.com` |
//! | `  Example.ORG  ` | `example.org` |
//!
//! # Rule Syntax
//!
//! The standard `public_suffix_list.dat` format is read as-is:
//!
//! | Rule | Kind |
//! |------|------|
//! | `co.uk` | Normal |
//! | `*.kawasaki.jp` | Wildcard |
//! | `!city.kawasaki.jp` | Exception |
//! | `// ===BEGIN PRIVATE DOMAINS===` | Section marker |

pub mod error;
pub mod normalize;
pub mod parser;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use error::{PslError, PslErrorKind, Result};
pub use normalize::{normalize_host, split_labels};
pub use parser::{parse_rules, parse_rules_from_file};
pub use resolver::{Resolver, ResolverOptions, DEFAULT_CACHE_SIZE};
pub use store::RuleStore;
pub use types::{Classification, Rule, RuleKind, Section, SuffixMatch};
