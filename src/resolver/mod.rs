//! Domain resolver module.
//!
//! Turns raw caller input into a [`Classification`] using a shared
//! [`RuleStore`], with strict accessors for callers that need a registrable
//! domain or a listed public suffix.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, trace};
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{PslError, Result};
use crate::normalize::{normalize_host, split_labels};
use crate::store::RuleStore;
use crate::types::Classification;

/// Suggested LRU cache size for callers that enable caching
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Resolver builder options.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// LRU cache size for classification results; 0 disables the cache
    pub cache_size: usize,
}

impl ResolverOptions {
    /// Create new resolver options (no cache).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }
}

/// Classifies hostnames and email addresses against a PSL rule store.
pub struct Resolver {
    store: Arc<RuleStore>,
    cache: Option<Mutex<LruCache<String, Classification>>>,
}

impl Resolver {
    /// Create a resolver without a result cache.
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self::with_options(store, ResolverOptions::default())
    }

    /// Create a resolver with explicit options.
    pub fn with_options(store: Arc<RuleStore>, options: ResolverOptions) -> Self {
        let cache = NonZeroUsize::new(options.cache_size).map(|size| Mutex::new(LruCache::new(size)));
        Self { store, cache }
    }

    /// The rule store backing this resolver
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Classify an email address or hostname.
    ///
    /// Only fails with [`PslError::EmptyInput`]; hostnames without a
    /// registrable domain come back with `is_valid == false`.
    pub fn classify(&self, raw: &str) -> Result<Classification> {
        let hostname = normalize_host(raw)?;
        let input = raw.trim().to_string();

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.lock().get(&hostname) {
                return Ok(Classification {
                    input,
                    ..cached.clone()
                });
            }
        }

        let classification = self.classify_hostname(&hostname);

        if let Some(cache) = &self.cache {
            cache.lock().put(hostname, classification.clone());
        }

        Ok(Classification {
            input,
            ..classification
        })
    }

    /// Classify an already-normalized hostname.
    ///
    /// `input` is left empty in the returned record.
    pub fn classify_hostname(&self, hostname: &str) -> Classification {
        let mut result = Classification {
            hostname: hostname.to_string(),
            ..Default::default()
        };

        let labels = split_labels(hostname);
        if labels.iter().any(|label| label.is_empty()) {
            trace!("Hostname '{}' has an empty label", hostname);
            return result;
        }

        let matched = self.store.longest_match(&labels);
        if matched.len == 0 {
            return result;
        }

        let count = labels.len();
        let suffix_start = count - matched.len;

        result.public_suffix = labels[suffix_start..].join(".");
        result.top_level_domain = labels[count - 1].to_string();
        result.is_icann = matched.is_icann();
        result.is_private = matched.is_private();

        if suffix_start > 0 {
            let domain_start = suffix_start - 1;
            result.domain_without_suffix = labels[domain_start].to_string();
            result.registered_domain = labels[domain_start..].join(".");
            result.subdomain = labels[..domain_start].join(".");
        }

        result.is_valid = matched.is_listed() && result.has_registered_domain();

        trace!(
            "Classified '{}': suffix '{}', registered domain '{}', valid {}",
            hostname,
            result.public_suffix,
            result.registered_domain,
            result.is_valid
        );

        result
    }

    /// Registered domain (eTLD+1) of an email address or hostname.
    ///
    /// Fails with [`PslError::NoRegisteredDomain`] when the input has no
    /// registrable boundary under a listed suffix.
    pub fn registered_domain(&self, raw: &str) -> Result<String> {
        let classification = self.classify(raw)?;
        if !classification.is_valid {
            return Err(PslError::NoRegisteredDomain(classification.hostname));
        }
        Ok(classification.registered_domain)
    }

    /// Public suffix (eTLD) of an email address or hostname.
    ///
    /// Fails with [`PslError::NoPublicSuffixDetermined`] when no suffix could
    /// be derived and [`PslError::UnlistedSuffix`] when only the implicit
    /// default rule applied.
    pub fn public_suffix(&self, raw: &str) -> Result<String> {
        let classification = self.classify(raw)?;
        if classification.public_suffix.is_empty() {
            return Err(PslError::NoPublicSuffixDetermined(classification.hostname));
        }
        if !classification.is_icann && !classification.is_private {
            return Err(PslError::UnlistedSuffix(classification.hostname));
        }
        Ok(classification.public_suffix)
    }

    /// Whether the input contains a registrable domain under a listed suffix.
    pub fn is_valid_domain(&self, raw: &str) -> bool {
        self.classify(raw).map(|c| c.is_valid).unwrap_or(false)
    }

    /// Registered domains of many inputs.
    ///
    /// Entries that fail to resolve are skipped. With `unique_only`, each
    /// domain is returned once, in order of first occurrence.
    pub fn resolve_many<I, S>(&self, raws: I, unique_only: bool) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut domains = Vec::new();

        for raw in raws {
            let raw = raw.as_ref();
            match self.registered_domain(raw) {
                Ok(domain) => {
                    if unique_only && !seen.insert(domain.clone()) {
                        continue;
                    }
                    domains.push(domain);
                }
                Err(e) => debug!("Skipping '{}': {}", raw, e),
            }
        }

        domains
    }

    /// Number of cached classifications (0 when caching is disabled)
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map(|cache| cache.lock().len()).unwrap_or(0)
    }

    /// Drop all cached classifications.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}
