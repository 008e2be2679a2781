//! rejectgen: CLI tool for generating Clash rule providers and DNS rejection
//! lists from third-party block-lists.

use clap::{Parser, Subcommand, ValueEnum};
use rejectgen::ruleset::{ExcludeAction, RuleListConfig, RuleSpec, SourceType};
use rejectgen::{FileFetcher, Generator, HttpFetcher, RuleOutcome, RunReport};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rejectgen")]
#[command(author = "Kaitu.io")]
#[command(version)]
#[command(about = "Generate Clash rule providers and DNS rejection lists from block-lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every rule in a config file and generate its outputs
    Generate {
        /// Rule list config (JSON, or YAML by extension)
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, default_value = "generated_rules")]
        output_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert local block-list files into one rule's outputs
    Convert {
        /// Input files, concatenated in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Declared source format
        #[arg(short = 't', long = "type", value_enum, default_value_t = SourceArg::Adblock)]
        source_type: SourceArg,

        /// Output file name prefix
        #[arg(short, long)]
        prefix: String,

        /// Exclude action; `IGNORE` enables the DNS rejection list
        #[arg(short, long, default_value = "IGNORE")]
        exclude_action: String,

        /// Output directory for generated files
        #[arg(short, long, default_value = "generated_rules")]
        output_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Adblock,
    Domain,
}

impl From<SourceArg> for SourceType {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Adblock => SourceType::Adblock,
            SourceArg::Domain => SourceType::Domain,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            config,
            output_dir,
            verbose,
        } => {
            init_logging(verbose);
            generate(&config, output_dir)
        }
        Commands::Convert {
            input,
            source_type,
            prefix,
            exclude_action,
            output_dir,
            verbose,
        } => {
            init_logging(verbose);
            let rule = RuleSpec::new(
                prefix.clone(),
                input.iter().map(|p| p.display().to_string()).collect(),
                source_type.into(),
                prefix,
                ExcludeAction::from_str_lossy(&exclude_action),
            );
            convert(rule, output_dir)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(config: &Path, output_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = RuleListConfig::load(config)?;
    let generator = Generator::new(HttpFetcher::new()?, output_dir);
    let report = generator.run_config(config)?;
    print_report(&report);
    Ok(())
}

fn convert(rule: RuleSpec, output_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let generator = Generator::new(FileFetcher::new(), output_dir);
    let report = generator.run(std::slice::from_ref(&rule))?;
    print_report(&report);
    if report.generated() == 0 {
        return Err(format!("no content read for {}", rule.name).into());
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        match outcome {
            RuleOutcome::Generated {
                name,
                pattern_count,
                dns_count,
                stats,
                provider_path,
                dns_path,
            } => {
                println!(
                    "{}: {} patterns -> {:?}, {} DNS lines -> {:?} ({} dropped)",
                    name, pattern_count, provider_path, dns_count, dns_path, stats.dropped
                );
            }
            RuleOutcome::Skipped { name } => {
                println!("{}: skipped (no content)", name);
            }
        }
    }
    for e in &report.invalid {
        println!("invalid entry: {}", e);
    }
    println!(
        "{} generated, {} skipped, {} invalid",
        report.generated(),
        report.skipped(),
        report.invalid.len()
    );
}
