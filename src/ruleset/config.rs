//! Rule list configuration types.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Declared format of a rule's source documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    /// AdBlock filter syntax (`||domain^`, `|http://...`, plain hosts)
    Adblock,
    /// Plain domain list, every line passed through
    Domain,
}

impl SourceType {
    /// Get the config string of this source type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Adblock => "adblock",
            SourceType::Domain => "domain",
        }
    }

    /// Parse a source type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "adblock" => Some(SourceType::Adblock),
            "domain" => Some(SourceType::Domain),
            _ => None,
        }
    }
}

/// What the DNS rejection output does for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExcludeAction {
    /// `IGNORE`: emit the DNS rejection list
    Ignore,
    /// Any other value, or unset: emit nothing
    #[default]
    Disabled,
}

impl ExcludeAction {
    /// Parse an exclude action from a string (case-insensitive).
    ///
    /// Returns `Disabled` for anything other than `IGNORE`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "IGNORE" => ExcludeAction::Ignore,
            _ => ExcludeAction::Disabled,
        }
    }

    /// Whether the DNS rejection emitter produces output.
    pub fn emits_dns_rejection(&self) -> bool {
        matches!(self, ExcludeAction::Ignore)
    }
}

/// One URL or a list of URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UrlList {
    One(String),
    Many(Vec<String>),
}

impl UrlList {
    /// Flatten into a vector of non-empty, trimmed URLs.
    pub fn into_vec(self) -> Vec<String> {
        let urls = match self {
            UrlList::One(url) => vec![url],
            UrlList::Many(urls) => urls,
        };
        urls.into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect()
    }
}

/// A validated rule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    /// Display name
    pub name: String,
    /// Source document locations, fetched and concatenated in order
    pub urls: Vec<String>,
    /// Declared source format
    pub source_type: SourceType,
    /// Output file name prefix
    pub file_prefix: String,
    /// DNS rejection gate
    pub exclude_action: ExcludeAction,
}

impl RuleSpec {
    /// Create a new RuleSpec.
    pub fn new(
        name: impl Into<String>,
        urls: Vec<String>,
        source_type: SourceType,
        file_prefix: impl Into<String>,
        exclude_action: ExcludeAction,
    ) -> Self {
        Self {
            name: name.into(),
            urls,
            source_type,
            file_prefix: file_prefix.into(),
            exclude_action,
        }
    }

    /// File name of the rule-provider payload.
    pub fn provider_file_name(&self) -> String {
        format!("{}-clash_reject_hostnames.yaml", self.file_prefix)
    }

    /// File name of the DNS rejection list.
    pub fn dns_file_name(&self) -> String {
        format!("{}-rejection-unbound_dns.conf", self.file_prefix)
    }
}

/// A rule entry as written in the config file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRuleSpec {
    pub name: Option<String>,
    pub url: Option<UrlList>,
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    pub file_prefix: Option<String>,
    pub exclude_action: Option<String>,
}

impl RawRuleSpec {
    /// Validate into a [`RuleSpec`]. `index` is the entry's position in the
    /// config and only used for error reporting.
    pub fn validate(self, index: usize) -> Result<RuleSpec> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_default();

        let invalid = |reason: &str| Error::InvalidRuleSpec {
            index,
            name: if name.is_empty() {
                "<unnamed>".to_string()
            } else {
                name.clone()
            },
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("missing `name`"));
        }

        let urls = self.url.map(UrlList::into_vec).unwrap_or_default();
        if urls.is_empty() {
            return Err(invalid("missing `url`"));
        }

        let source_type = match self.source_type.as_deref() {
            None => return Err(invalid("missing `type`")),
            Some(t) => SourceType::parse(t)
                .ok_or_else(|| invalid(&format!("unknown type `{}`", t)))?,
        };

        let file_prefix = self.file_prefix.unwrap_or_default().trim().to_string();
        if file_prefix.is_empty() {
            return Err(invalid("missing `file_prefix`"));
        }
        if file_prefix.contains(&['/', '\\'][..]) || file_prefix == ".." {
            return Err(invalid("`file_prefix` must not contain path separators"));
        }

        let exclude_action = self
            .exclude_action
            .as_deref()
            .map(ExcludeAction::from_str_lossy)
            .unwrap_or_default();

        Ok(RuleSpec {
            name,
            urls,
            source_type,
            file_prefix,
            exclude_action,
        })
    }
}

/// The top-level config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleListConfig {
    #[serde(default)]
    pub rules_list: Vec<RawRuleSpec>,
}

impl RuleListConfig {
    /// Load a config file. `.yaml`/`.yml` files are parsed as YAML, anything
    /// else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_lowercase().as_str(), "yaml" | "yml"))
            .unwrap_or(false);

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse a JSON config.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a YAML config.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate every entry. Valid entries are returned in config order,
    /// invalid ones as errors alongside them.
    pub fn validate(self) -> (Vec<RuleSpec>, Vec<Error>) {
        let mut specs = Vec::new();
        let mut errors = Vec::new();

        for (index, raw) in self.rules_list.into_iter().enumerate() {
            match raw.validate(index) {
                Ok(spec) => specs.push(spec),
                Err(e) => errors.push(e),
            }
        }

        (specs, errors)
    }
}
