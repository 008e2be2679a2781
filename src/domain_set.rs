//! Domain set aggregation.

use std::collections::BTreeSet;
use std::fmt;

use crate::classify::classify_line;
use crate::pattern::normalize;
use crate::ruleset::{RuleSpec, SourceType};
use crate::CanonicalPattern;

/// A deduplicated, deterministically ordered set of canonical patterns.
///
/// Every distinct `(domain, kind)` pair is kept, so one domain may appear
/// under two kinds when sources disagree. Iteration is sorted by domain
/// string, then by [`MatchKind`](crate::MatchKind) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    patterns: BTreeSet<CanonicalPattern>,
}

impl DomainSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pattern. Returns `false` if it was already present.
    pub fn insert(&mut self, pattern: CanonicalPattern) -> bool {
        self.patterns.insert(pattern)
    }

    /// Check if a `(domain, kind)` pair is present.
    pub fn contains(&self, pattern: &CanonicalPattern) -> bool {
        self.patterns.contains(pattern)
    }

    /// Get the number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate in output order.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalPattern> {
        self.patterns.iter()
    }
}

impl Extend<CanonicalPattern> for DomainSet {
    fn extend<I: IntoIterator<Item = CanonicalPattern>>(&mut self, iter: I) {
        self.patterns.extend(iter);
    }
}

impl FromIterator<CanonicalPattern> for DomainSet {
    fn from_iter<I: IntoIterator<Item = CanonicalPattern>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DomainSet {
    type Item = &'a CanonicalPattern;
    type IntoIter = std::collections::btree_set::Iter<'a, CanonicalPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

/// Line counters collected while building a [`DomainSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Lines seen, including comments and blanks
    pub lines: usize,
    /// Comment and blank lines
    pub comments: usize,
    /// Lines that produced a new pattern
    pub accepted: usize,
    /// Lines that produced a pattern already in the set
    pub duplicates: usize,
    /// Lines rejected by the classifier or the normalizer
    pub dropped: usize,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines: {} accepted, {} duplicates, {} dropped, {} comments",
            self.lines, self.accepted, self.duplicates, self.dropped, self.comments
        )
    }
}

/// Incrementally builds a [`DomainSet`] from source documents.
pub struct DomainSetBuilder {
    source_type: SourceType,
    set: DomainSet,
    stats: BuildStats,
}

impl DomainSetBuilder {
    /// Create a builder for sources of the given type.
    pub fn new(source_type: SourceType) -> Self {
        Self {
            source_type,
            set: DomainSet::new(),
            stats: BuildStats::default(),
        }
    }

    /// Create a builder for a rule's declared source type.
    pub fn for_rule(rule: &RuleSpec) -> Self {
        Self::new(rule.source_type)
    }

    /// Add one source document.
    pub fn add_document(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.add_line(line);
        }
        self
    }

    /// Add one raw source line.
    pub fn add_line(&mut self, line: &str) {
        self.stats.lines += 1;

        let classified = classify_line(line, self.source_type);
        let Some((candidate, kind)) = classified.candidate() else {
            if classified.is_rejected() {
                log::trace!("dropped line {:?}: {:?}", line, classified);
                self.stats.dropped += 1;
            } else {
                self.stats.comments += 1;
            }
            return;
        };

        match normalize(candidate, kind) {
            Ok(pattern) => {
                if self.set.insert(pattern) {
                    self.stats.accepted += 1;
                } else {
                    self.stats.duplicates += 1;
                }
            }
            Err(e) => {
                log::trace!("dropped line {:?}: {}", line, e);
                self.stats.dropped += 1;
            }
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Number of lines dropped so far.
    pub fn dropped(&self) -> usize {
        self.stats.dropped
    }

    /// Finish building.
    pub fn finish(self) -> (DomainSet, BuildStats) {
        (self.set, self.stats)
    }
}

/// Build a [`DomainSet`] from all source documents of one rule.
///
/// Document boundaries are insignificant: a pattern appearing in several
/// documents collapses into one entry, and the result does not depend on
/// document order.
pub fn build<S: AsRef<str>>(documents: &[S], rule: &RuleSpec) -> DomainSet {
    build_with_stats(documents, rule).0
}

/// Like [`build`], also returning the line counters.
pub fn build_with_stats<S: AsRef<str>>(documents: &[S], rule: &RuleSpec) -> (DomainSet, BuildStats) {
    let mut builder = DomainSetBuilder::for_rule(rule);
    for doc in documents {
        builder.add_document(doc.as_ref());
    }
    builder.finish()
}
