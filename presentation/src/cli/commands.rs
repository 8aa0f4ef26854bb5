//! CLI command definitions

use annoquorum_domain::{Confidence, ReviewLabel};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable summary
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for annotation-quorum
#[derive(Parser, Debug)]
#[command(name = "annotation-quorum")]
#[command(author, version, about = "Reconcile entity annotations from several extraction sources")]
#[command(long_about = r#"
Annotation Quorum reconciles the entity and relation annotations that several
independent extraction sources produced for the same documents.

Each document goes through:
1. Consensus: observations are grouped and classified as unanimous,
   majority, disputed or conflicting
2. Review: conflicts and promising disputed entities become review tasks
3. Resolution: final annotations, using stored review decisions
4. Export: character-level BIO tags and CoNLL text

Configuration files are loaded from (in priority order):
1. QUORUM_* environment variables
2. --config <path>     Explicit config file
3. ./quorum.toml       Project-level config
4. ~/.config/annotation-quorum/config.toml   Global config

Example:
  annotation-quorum reconcile
  annotation-quorum review list
  annotation-quorum review decide 3 穴位 --reviewer alice
  annotation-quorum apply-reviews
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile every configured document
    Reconcile(ReconcileArgs),

    /// Work through pending review tasks
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Fold reviewed tasks into the review store
    ApplyReviews,

    /// Show configuration file locations and the effective configuration
    ShowConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReconcileArgs {
    /// Glob of documents to reconcile (overrides [input].documents)
    #[arg(value_name = "GLOB")]
    pub documents: Option<String>,

    /// Root of per-source outputs (overrides [input].extractions_dir)
    #[arg(long, value_name = "DIR")]
    pub extractions: Option<PathBuf>,

    /// Directory for result files (overrides [output].directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Reconcile without writing result files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommand {
    /// List pending tasks
    List {
        /// Only tasks skipped often enough to be stale
        #[arg(long)]
        stale: bool,

        /// Show at most this many tasks
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Record a decision for a task
    Decide {
        /// Task id
        task_id: u64,

        /// Entity type label (病名, 症状, 穴位, 治法) or 无效
        label: ReviewLabel,

        /// Reviewer name
        #[arg(long, default_value = "reviewer")]
        reviewer: String,

        /// Reviewer confidence
        #[arg(long, default_value = "high")]
        confidence: Confidence,

        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Leave a task pending for later
    Skip {
        /// Task id
        task_id: u64,
    },

    /// Summarize review progress
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoquorum_domain::EntityType;

    #[test]
    fn test_parse_reconcile_with_overrides() {
        let cli = Cli::try_parse_from([
            "annotation-quorum",
            "-vv",
            "reconcile",
            "corpus/*.txt",
            "--extractions",
            "runs",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.global.verbose, 2);
        let Command::Reconcile(args) = cli.command else {
            panic!("expected reconcile");
        };
        assert_eq!(args.documents.as_deref(), Some("corpus/*.txt"));
        assert_eq!(args.extractions, Some(PathBuf::from("runs")));
        assert!(args.dry_run);
    }

    #[test]
    fn test_parse_review_decide() {
        let cli = Cli::try_parse_from([
            "annotation-quorum",
            "review",
            "decide",
            "3",
            "穴位",
            "--reviewer",
            "alice",
            "--confidence",
            "medium",
            "--output",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.global.output, Some(OutputFormat::Json));
        match cli.command {
            Command::Review(ReviewCommand::Decide {
                task_id,
                label,
                reviewer,
                confidence,
                ..
            }) => {
                assert_eq!(task_id, 3);
                assert_eq!(label, ReviewLabel::Type(EntityType::Acupoint));
                assert_eq!(reviewer, "alice");
                assert_eq!(confidence, Confidence::Medium);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_label_alias() {
        let cli =
            Cli::try_parse_from(["annotation-quorum", "review", "decide", "1", "invalid"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Review(ReviewCommand::Decide {
                label: ReviewLabel::Invalid,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(
            Cli::try_parse_from(["annotation-quorum", "review", "decide", "1", "药物"]).is_err()
        );
    }
}
