//! rejectgen - convert third-party domain block-lists into proxy and DNS
//! rejection formats.
//!
//! Source lists are either AdBlock filter syntax or plain domain lists.
//! Every line is classified, normalized into a [`CanonicalPattern`] and
//! collected into a sorted, deduplicated [`DomainSet`]. Two emitters render
//! the set:
//!
//! - **Clash rule provider** (`<prefix>-clash_reject_hostnames.yaml`):
//!   `+.domain` for subtrees, bare `domain` for exact hosts and globs
//! - **DNS rejection list** (`<prefix>-rejection-unbound_dns.conf`):
//!   `||domain^` lines, only when the rule's `exclude_action` is `IGNORE`
//!
//! # Quick Start
//!
//! ```
//! use rejectgen::converter::{DnsRejectionEmitter, RuleProviderEmitter};
//! use rejectgen::ruleset::{ExcludeAction, RuleSpec, SourceType};
//!
//! let rule = RuleSpec::new(
//!     "ads",
//!     vec!["https://example.com/filter.txt".to_string()],
//!     SourceType::Adblock,
//!     "ads",
//!     ExcludeAction::Ignore,
//! );
//!
//! let set = rejectgen::build(&["||ads.example.com^\nplain.example.net"], &rule);
//! assert_eq!(
//!     RuleProviderEmitter::emit(&set),
//!     vec!["+.ads.example.com", "plain.example.net"]
//! );
//! assert_eq!(
//!     DnsRejectionEmitter::emit(&set, rule.exclude_action),
//!     vec!["||ads.example.com^", "||plain.example.net^"]
//! );
//! ```
//!
//! # Line Classification
//!
//! For AdBlock sources, the first matching shape wins:
//! 1. `||domain^` - domain and all subdomains (glob if it contains `*`)
//! 2. `|http://host/...` - exact host
//! 3. `host|` - exact host
//! 4. bare tokens - exact host (glob if `*`), dropped if they carry `/`,
//!    `:` or `?`
//!
//! Plain domain sources pass every line through. Malformed lines are
//! dropped and counted in [`BuildStats`].

mod error;
mod match_kind;

pub mod classify;
pub mod converter;
pub mod domain_set;
pub mod generator;
pub mod pattern;
pub mod remote;
pub mod ruleset;

// Re-export core types
pub use error::{Error, PatternError, Result};
pub use match_kind::MatchKind;
pub use pattern::CanonicalPattern;

pub use domain_set::{build, build_with_stats, BuildStats, DomainSet, DomainSetBuilder};

pub use classify::{classify_line, Classified, RejectReason};

pub use ruleset::{ExcludeAction, RuleListConfig, RuleSpec, SourceType};

pub use generator::{Generator, RuleArtifacts, RuleOutcome, RunReport};

pub use remote::{DocumentFetcher, FileFetcher, HttpFetcher};
