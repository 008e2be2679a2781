//! Clash rule-provider payload emitter.

use serde::Deserialize;

use crate::{CanonicalPattern, DomainSet, MatchKind, Result};

/// Rule provider payload structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderPayload {
    #[serde(default)]
    pub payload: Vec<String>,
}

impl ProviderPayload {
    /// Wrap a list of emitted patterns.
    pub fn new(payload: Vec<String>) -> Self {
        Self { payload }
    }

    /// Parse a payload from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Render as a `domain` behavior provider file.
    ///
    /// Every entry is written as a single-quoted scalar on its own line,
    /// in payload order:
    ///
    /// ```text
    /// payload:
    ///   - '+.ads.example.com'
    ///   - 'plain.example.net'
    /// ```
    pub fn to_yaml(&self) -> String {
        if self.payload.is_empty() {
            return "payload: []\n".to_string();
        }

        let mut out = String::with_capacity(16 + self.payload.iter().map(|p| p.len() + 7).sum::<usize>());
        out.push_str("payload:\n");
        for entry in &self.payload {
            out.push_str("  - '");
            out.push_str(&entry.replace('\'', "''"));
            out.push_str("'\n");
        }
        out
    }
}

/// Emits Clash `domain` behavior patterns.
///
/// | Kind | Output |
/// |---|---|
/// | `SubtreeSuffix` | `+.domain` |
/// | `ExactHost` | `domain` |
/// | `WildcardPattern` | glob verbatim |
/// | `Opaque` | `domain` |
pub struct RuleProviderEmitter;

impl RuleProviderEmitter {
    /// Emit one pattern string per set entry, in set order.
    pub fn emit(set: &DomainSet) -> Vec<String> {
        set.iter().map(Self::emit_pattern).collect()
    }

    /// Emit a single pattern.
    pub fn emit_pattern(pattern: &CanonicalPattern) -> String {
        match pattern.kind() {
            MatchKind::SubtreeSuffix => format!("+.{}", pattern.domain()),
            MatchKind::ExactHost | MatchKind::WildcardPattern | MatchKind::Opaque => {
                pattern.domain().to_string()
            }
        }
    }

    /// Emit and wrap into a payload.
    pub fn payload(set: &DomainSet) -> ProviderPayload {
        ProviderPayload::new(Self::emit(set))
    }
}
