//! DNS rejection list emitter.

use std::collections::HashSet;

use crate::ruleset::ExcludeAction;
use crate::{CanonicalPattern, DomainSet, MatchKind};

/// Emits AdGuard/unbound style `||domain^` rejection lines.
///
/// The format has no exact-host form, so `ExactHost` and `SubtreeSuffix`
/// both become `||domain^`. Wildcard globs pass through unchanged unless
/// they carry the rule-provider `+.` marker, which is rewritten to
/// `||glob^`. A domain present under both kinds is written once.
pub struct DnsRejectionEmitter;

impl DnsRejectionEmitter {
    /// Emit one line per distinct mapped entry, in set order, or nothing
    /// unless the rule's exclude action is `IGNORE`.
    pub fn emit(set: &DomainSet, exclude_action: ExcludeAction) -> Vec<String> {
        if !exclude_action.emits_dns_rejection() {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        set.iter()
            .map(Self::emit_pattern)
            .filter(|line| seen.insert(line.clone()))
            .collect()
    }

    /// Emit a single pattern.
    pub fn emit_pattern(pattern: &CanonicalPattern) -> String {
        let domain = pattern.domain();
        match pattern.kind() {
            MatchKind::SubtreeSuffix | MatchKind::ExactHost | MatchKind::Opaque => {
                format!("||{}^", domain)
            }
            MatchKind::WildcardPattern => match domain.strip_prefix("+.") {
                Some(glob) => format!("||{}^", glob),
                None => domain.to_string(),
            },
        }
    }

    /// Render emitted lines as file content: newline-joined, no trailing
    /// newline.
    pub fn render(lines: &[String]) -> String {
        lines.join("\n")
    }
}
