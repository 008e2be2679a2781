//! Canonical domain patterns.

use std::fmt;

use crate::error::PatternError;
use crate::MatchKind;

/// A normalized domain pattern.
///
/// The domain is lowercase and never carries a scheme, path, port, query or
/// `^` anchor. Subtree patterns are stored without their leading dot.
///
/// # Leading-dot convention
/// - `example.com` - exact host
/// - `.example.com` - `example.com` and all of its subdomains
///
/// ```
/// use rejectgen::{CanonicalPattern, MatchKind};
///
/// let p = CanonicalPattern::from_dotted(".Ads.Example.com").unwrap();
/// assert_eq!(p.domain(), "ads.example.com");
/// assert_eq!(p.kind(), MatchKind::SubtreeSuffix);
/// assert_eq!(p.to_dotted(), ".ads.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalPattern {
    // Field order gives the (domain, kind-rank) sort key.
    domain: String,
    kind: MatchKind,
}

impl CanonicalPattern {
    /// Normalize a domain candidate into a canonical pattern.
    pub fn new(candidate: &str, kind: MatchKind) -> Result<Self, PatternError> {
        normalize(candidate, kind)
    }

    /// Parse the leading-dot form: `.d` is a subtree, anything else exact.
    pub fn from_dotted(s: &str) -> Result<Self, PatternError> {
        normalize(s, MatchKind::ExactHost)
    }

    /// Render the leading-dot form.
    pub fn to_dotted(&self) -> String {
        match self.kind {
            MatchKind::SubtreeSuffix => format!(".{}", self.domain),
            _ => self.domain.clone(),
        }
    }

    /// The stored domain string.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The match kind.
    pub fn kind(&self) -> MatchKind {
        self.kind
    }
}

impl fmt::Display for CanonicalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

/// Normalize a classified candidate.
///
/// A leading `.` (or the rule-provider `+.` marker) turns any non-wildcard
/// kind into [`MatchKind::SubtreeSuffix`] and is removed from the stored
/// domain. Wildcard globs are kept verbatim apart from lowercasing.
pub fn normalize(candidate: &str, kind: MatchKind) -> Result<CanonicalPattern, PatternError> {
    if candidate.is_empty() {
        return Err(PatternError::Empty);
    }
    if candidate.chars().any(char::is_whitespace) {
        return Err(PatternError::Whitespace(candidate.to_string()));
    }

    let lower = candidate.to_lowercase();
    let (domain, kind) = match kind {
        MatchKind::WildcardPattern => (lower.as_str(), kind),
        _ => match strip_subtree_marker(&lower) {
            Some(rest) => (rest, MatchKind::SubtreeSuffix),
            None => (lower.as_str(), kind),
        },
    };

    if domain.is_empty() {
        return Err(PatternError::Empty);
    }
    if !is_valid_for(domain, kind) {
        return Err(PatternError::InvalidHostname(candidate.to_string()));
    }

    Ok(CanonicalPattern {
        domain: domain.to_string(),
        kind,
    })
}

fn strip_subtree_marker(s: &str) -> Option<&str> {
    s.strip_prefix("+.").or_else(|| s.strip_prefix('.'))
}

fn is_hostname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Control characters, a stray BOM and U+FFFD (from lossy UTF-8 decoding)
/// would make the YAML payload unparseable.
fn is_forbidden_char(c: char) -> bool {
    c.is_control() || c == '\u{feff}' || c == '\u{fffd}'
}

/// Every label is non-empty and does not start or end with `-`.
fn has_valid_labels(domain: &str) -> bool {
    domain
        .split('.')
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

fn is_valid_for(domain: &str, kind: MatchKind) -> bool {
    if domain.chars().any(is_forbidden_char) {
        return false;
    }
    match kind {
        MatchKind::ExactHost | MatchKind::SubtreeSuffix => {
            domain.chars().all(is_hostname_char) && has_valid_labels(domain)
        }
        MatchKind::WildcardPattern => {
            let glob = domain.strip_prefix("+.").unwrap_or(domain);
            glob.chars().any(|c| c.is_ascii_alphanumeric())
                && glob.chars().all(|c| is_hostname_char(c) || c == '*')
        }
        MatchKind::Opaque => !domain.contains(&['/', ':', '?', '^'][..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase() {
        let p = normalize("Ads.EXAMPLE.com", MatchKind::ExactHost).unwrap();
        assert_eq!(p.domain(), "ads.example.com");
        assert_eq!(p.kind(), MatchKind::ExactHost);
    }

    #[test]
    fn test_leading_dot_becomes_subtree() {
        let p = normalize(".example.com", MatchKind::ExactHost).unwrap();
        assert_eq!(p.domain(), "example.com");
        assert_eq!(p.kind(), MatchKind::SubtreeSuffix);

        let p = normalize("+.example.com", MatchKind::Opaque).unwrap();
        assert_eq!(p.domain(), "example.com");
        assert_eq!(p.kind(), MatchKind::SubtreeSuffix);

        let p = normalize(".example.com", MatchKind::SubtreeSuffix).unwrap();
        assert_eq!(p.domain(), "example.com");
        assert_eq!(p.kind(), MatchKind::SubtreeSuffix);
    }

    #[test]
    fn test_dotted_round_trip() {
        for s in [".example.com", "example.com", ".a.b.c.example.org"] {
            let p = CanonicalPattern::from_dotted(s).unwrap();
            assert_eq!(p.to_dotted(), s);
            assert_eq!(CanonicalPattern::from_dotted(&p.to_dotted()).unwrap(), p);
        }

        let subtree = CanonicalPattern::new("example.com", MatchKind::SubtreeSuffix).unwrap();
        assert_eq!(subtree.to_dotted(), ".example.com");
        assert_eq!(
            CanonicalPattern::from_dotted(&subtree.to_dotted()).unwrap(),
            subtree
        );
    }

    #[test]
    fn test_wildcard_kept_verbatim() {
        let p = normalize("AD*.Example.com", MatchKind::WildcardPattern).unwrap();
        assert_eq!(p.domain(), "ad*.example.com");
        assert_eq!(p.kind(), MatchKind::WildcardPattern);

        let p = normalize("+.ad*.example.com", MatchKind::WildcardPattern).unwrap();
        assert_eq!(p.domain(), "+.ad*.example.com");
        assert_eq!(p.kind(), MatchKind::WildcardPattern);
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert_eq!(normalize("", MatchKind::ExactHost), Err(PatternError::Empty));
        assert_eq!(normalize(".", MatchKind::ExactHost), Err(PatternError::Empty));
        assert_eq!(normalize("+.", MatchKind::Opaque), Err(PatternError::Empty));
        assert!(matches!(
            normalize("0.0.0.0 ads.example.com", MatchKind::Opaque),
            Err(PatternError::Whitespace(_))
        ));
        assert!(matches!(
            normalize("a.com\tb.com", MatchKind::ExactHost),
            Err(PatternError::Whitespace(_))
        ));
    }

    #[test]
    fn test_rejects_non_hostname_characters() {
        for bad in ["a.com^$third-party", "a.com|", "a*.com", "..a.com", "a.com/x"] {
            assert!(
                normalize(bad, MatchKind::ExactHost).is_err(),
                "{bad} should be rejected"
            );
        }
        assert!(normalize("a.com^", MatchKind::SubtreeSuffix).is_err());
        assert!(normalize("a.com/x", MatchKind::WildcardPattern).is_err());
        assert!(normalize("a.com:443", MatchKind::Opaque).is_err());
        assert!(normalize("*.*", MatchKind::WildcardPattern).is_err());
        assert!(normalize("*.bar.com", MatchKind::Opaque).is_ok());
        assert!(normalize("under_score.example.com", MatchKind::ExactHost).is_ok());
    }

    #[test]
    fn test_untrimmed_candidates_rejected() {
        for bad in [" foo.com", "bar.com ", " baz.com"] {
            assert!(matches!(
                normalize(bad, MatchKind::ExactHost),
                Err(PatternError::Whitespace(_))
            ));
        }
    }

    #[test]
    fn test_rejects_control_and_replacement_characters() {
        for bad in [
            "bad\u{7}bell.com",
            "\u{0}evil",
            "\u{feff}foo.com",
            "caf\u{fffd}.com",
            "esc\u{1b}.com",
        ] {
            assert!(
                matches!(
                    normalize(bad, MatchKind::Opaque),
                    Err(PatternError::InvalidHostname(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert!(normalize("*.b\u{0}r.com", MatchKind::WildcardPattern).is_err());
        assert!(normalize("caf\u{e9}.com", MatchKind::Opaque).is_ok());
    }

    #[test]
    fn test_rejects_malformed_labels() {
        for bad in ["a..com", "-x.com", "x-.com", "x.com.", "x.-com"] {
            assert!(
                normalize(bad, MatchKind::ExactHost).is_err(),
                "{bad} should be rejected"
            );
            assert!(normalize(bad, MatchKind::SubtreeSuffix).is_err());
        }
        assert!(normalize("a-b.x-y.com", MatchKind::ExactHost).is_ok());
        assert!(normalize("xn--80ak6aa92e.com", MatchKind::ExactHost).is_ok());
    }

    #[test]
    fn test_display_uses_dotted_form() {
        let p = normalize("x.com", MatchKind::SubtreeSuffix).unwrap();
        assert_eq!(p.to_string(), ".x.com");
    }
}
