//! Rule list configuration.
//!
//! A config file lists rules (`rules_list`); each rule names its source
//! URLs, their declared format and the output file prefix. Entries are
//! validated one by one so a broken entry only skips itself.

mod config;

pub use config::{ExcludeAction, RawRuleSpec, RuleListConfig, RuleSpec, SourceType, UrlList};
