//! Per-rule generation pipeline: fetch, build, emit, write.

use std::fs;
use std::path::{Path, PathBuf};

use crate::converter::{DnsRejectionEmitter, RuleProviderEmitter};
use crate::domain_set::{build_with_stats, BuildStats};
use crate::remote::{all_empty, fetch_documents, DocumentFetcher};
use crate::ruleset::{RuleListConfig, RuleSpec};
use crate::{DomainSet, Error, Result};

/// Rendered output files of one rule, before they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArtifacts {
    /// Content of `<prefix>-clash_reject_hostnames.yaml`
    pub provider_yaml: String,
    /// Content of `<prefix>-rejection-unbound_dns.conf`
    pub dns_conf: String,
    /// Number of patterns in the domain set
    pub pattern_count: usize,
    /// Number of DNS rejection lines
    pub dns_count: usize,
}

impl RuleArtifacts {
    /// Render both outputs from a built domain set.
    pub fn render(set: &DomainSet, rule: &RuleSpec) -> Self {
        let payload = RuleProviderEmitter::payload(set);
        let dns_lines = DnsRejectionEmitter::emit(set, rule.exclude_action);
        Self {
            provider_yaml: payload.to_yaml(),
            dns_conf: DnsRejectionEmitter::render(&dns_lines),
            pattern_count: set.len(),
            dns_count: dns_lines.len(),
        }
    }

    /// Write both files into `output_dir`, returning their paths.
    pub fn write_to(&self, output_dir: &Path, rule: &RuleSpec) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(output_dir)?;

        let provider_path = output_dir.join(rule.provider_file_name());
        fs::write(&provider_path, &self.provider_yaml)?;
        log::info!(
            "Generated {:?} with {} rules.",
            provider_path,
            self.pattern_count
        );

        let dns_path = output_dir.join(rule.dns_file_name());
        fs::write(&dns_path, &self.dns_conf)?;
        log::info!("Generated {:?} with {} rules.", dns_path, self.dns_count);

        Ok((provider_path, dns_path))
    }
}

/// Build and render one rule from already-fetched documents.
pub fn render_rule<S: AsRef<str>>(documents: &[S], rule: &RuleSpec) -> (RuleArtifacts, BuildStats) {
    let (set, stats) = build_with_stats(documents, rule);
    (RuleArtifacts::render(&set, rule), stats)
}

/// Result of processing one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Files were written
    Generated {
        name: String,
        pattern_count: usize,
        dns_count: usize,
        stats: BuildStats,
        provider_path: PathBuf,
        dns_path: PathBuf,
    },
    /// Every source document was empty or failed to fetch
    Skipped { name: String },
}

impl RuleOutcome {
    /// The rule's name.
    pub fn name(&self) -> &str {
        match self {
            RuleOutcome::Generated { name, .. } | RuleOutcome::Skipped { name } => name,
        }
    }

    /// Whether files were written.
    pub fn is_generated(&self) -> bool {
        matches!(self, RuleOutcome::Generated { .. })
    }
}

/// Result of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One outcome per valid rule, in config order
    pub outcomes: Vec<RuleOutcome>,
    /// Config entries skipped because they failed validation
    pub invalid: Vec<Error>,
}

impl RunReport {
    /// Number of rules that produced files.
    pub fn generated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_generated()).count()
    }

    /// Number of valid rules skipped for lack of content.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.generated()
    }
}

/// Runs the pipeline for a list of rules.
pub struct Generator<F> {
    fetcher: F,
    output_dir: PathBuf,
}

impl<F: DocumentFetcher> Generator<F> {
    /// Create a generator writing into `output_dir`.
    pub fn new(fetcher: F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    /// Process one rule.
    ///
    /// Fetch failures are not errors; only write failures are.
    pub fn process_rule(&self, rule: &RuleSpec) -> Result<RuleOutcome> {
        log::info!(
            "Processing rule: {} ({})",
            rule.name,
            rule.source_type.as_str()
        );
        if rule.urls.len() > 1 {
            log::info!(
                "Detected {} URLs for {}, merging...",
                rule.urls.len(),
                rule.name
            );
        }

        let documents = fetch_documents(&self.fetcher, &rule.urls);
        if all_empty(&documents) {
            log::warn!("Skipping {} due to empty content.", rule.name);
            return Ok(RuleOutcome::Skipped {
                name: rule.name.clone(),
            });
        }

        let (artifacts, stats) = render_rule(&documents, rule);
        log::info!("{}: {}", rule.name, stats);

        let (provider_path, dns_path) = artifacts.write_to(&self.output_dir, rule)?;
        Ok(RuleOutcome::Generated {
            name: rule.name.clone(),
            pattern_count: artifacts.pattern_count,
            dns_count: artifacts.dns_count,
            stats,
            provider_path,
            dns_path,
        })
    }

    /// Process rules in order. Stops at the first write failure.
    pub fn run(&self, rules: &[RuleSpec]) -> Result<RunReport> {
        let mut report = RunReport::default();
        for rule in rules {
            report.outcomes.push(self.process_rule(rule)?);
        }
        Ok(report)
    }

    /// Validate a config and process its valid entries.
    ///
    /// Invalid entries are logged, skipped and listed in the report.
    pub fn run_config(&self, config: RuleListConfig) -> Result<RunReport> {
        let (rules, invalid) = config.validate();
        for e in &invalid {
            log::error!("Skipping config entry: {}", e);
        }

        let mut report = self.run(&rules)?;
        report.invalid = invalid;
        Ok(report)
    }
}
