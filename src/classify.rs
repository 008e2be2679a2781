//! Source line classification.
//!
//! [`classify_line`] is a single ordered dispatch: the first shape a line
//! satisfies decides its category. The order is:
//!
//! 1. `domain` sources: every line passes through as [`MatchKind::Opaque`]
//! 2. `||body^`: block the domain and all subdomains (or a glob if `*`)
//! 3. `|http://host/...` / `|https://host/...`: the exact host
//! 4. `host|` / `host|^`: the exact host
//! 5. anything else: rejected if it carries `/`, `:` or `?`, otherwise a
//!    plain host (or a glob if `*`)
//!
//! Comments, blanks, exception rules and element-hiding rules never reach
//! the dispatch.

use crate::ruleset::SourceType;
use crate::MatchKind;

/// Why a line was rejected by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Carries a URL path, port or query (`/`, `:`, `?`)
    NotAHostname,
    /// `@@` exception rule
    Exception,
    /// Element-hiding or scriptlet rule (`##`, `#@#`, ...)
    Cosmetic,
    /// Anchor with nothing after it
    EmptyBody,
}

/// Category of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    /// Blank line, comment or list header
    Comment,
    /// Line from a `domain` source, taken verbatim
    Passthrough(&'a str),
    /// `||body^`; `wildcard` is set when the body carries a `*`
    BlockSubdomains { body: &'a str, wildcard: bool },
    /// `|http://host...`
    AnchoredPrefix(&'a str),
    /// `host|` or `host|^`
    AnchoredSuffix(&'a str),
    /// A bare host token; `wildcard` is set when it carries a `*`
    Plain { host: &'a str, wildcard: bool },
    /// Not a domain rule
    Rejected(RejectReason),
}

impl<'a> Classified<'a> {
    /// The domain candidate and its match kind, if the line is a rule.
    pub fn candidate(&self) -> Option<(&'a str, MatchKind)> {
        match *self {
            Classified::Comment | Classified::Rejected(_) => None,
            Classified::Passthrough(line) => Some((line, MatchKind::Opaque)),
            Classified::BlockSubdomains { body, wildcard } => Some((
                body,
                if wildcard {
                    MatchKind::WildcardPattern
                } else {
                    MatchKind::SubtreeSuffix
                },
            )),
            Classified::AnchoredPrefix(host) | Classified::AnchoredSuffix(host) => {
                Some((host, MatchKind::ExactHost))
            }
            Classified::Plain { host, wildcard } => Some((
                host,
                if wildcard {
                    MatchKind::WildcardPattern
                } else {
                    MatchKind::ExactHost
                },
            )),
        }
    }

    /// Whether the line was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Classified::Rejected(_))
    }
}

/// Check if a trimmed line is blank or a comment.
pub fn is_comment_line(line: &str, source_type: SourceType) -> bool {
    if line.is_empty() || line.starts_with('!') || line.starts_with('#') {
        return true;
    }
    // `[Adblock Plus 2.0]` style list headers
    source_type == SourceType::Adblock && line.starts_with('[') && line.ends_with(']')
}

/// Classify one raw source line.
pub fn classify_line(raw: &str, source_type: SourceType) -> Classified<'_> {
    let line = raw.trim();
    if is_comment_line(line, source_type) {
        return Classified::Comment;
    }

    if source_type == SourceType::Domain {
        return Classified::Passthrough(line);
    }

    if line.starts_with("@@") {
        return Classified::Rejected(RejectReason::Exception);
    }
    if is_cosmetic(line) {
        return Classified::Rejected(RejectReason::Cosmetic);
    }

    if let Some(rest) = line.strip_prefix("||") {
        let body = rest.strip_suffix('^').unwrap_or(rest);
        if body.is_empty() {
            return Classified::Rejected(RejectReason::EmptyBody);
        }
        return Classified::BlockSubdomains {
            body,
            wildcard: body.contains('*'),
        };
    }

    if let Some(rest) = line
        .strip_prefix("|http://")
        .or_else(|| line.strip_prefix("|https://"))
    {
        let end = rest.find(&['/', ':', '|', '^'][..]).unwrap_or(rest.len());
        let host = &rest[..end];
        if host.is_empty() {
            return Classified::Rejected(RejectReason::EmptyBody);
        }
        return Classified::AnchoredPrefix(host);
    }

    let suffix_anchored = line
        .strip_suffix("|^")
        .or_else(|| line.strip_suffix('|'));
    if let Some(host) = suffix_anchored {
        if host.is_empty() {
            return Classified::Rejected(RejectReason::EmptyBody);
        }
        return Classified::AnchoredSuffix(host);
    }

    if line.contains(&['/', ':', '?'][..]) {
        return Classified::Rejected(RejectReason::NotAHostname);
    }

    let host = line.strip_suffix('^').unwrap_or(line);
    if host.is_empty() {
        return Classified::Rejected(RejectReason::EmptyBody);
    }
    Classified::Plain {
        host,
        wildcard: host.contains('*'),
    }
}

fn is_cosmetic(line: &str) -> bool {
    ["##", "#@#", "#?#", "#$#", "#%#"]
        .iter()
        .any(|marker| line.contains(marker))
}
