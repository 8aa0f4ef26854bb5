//! CLI entrypoint for Annotation Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use annoquorum_application::{
    ApplyReviewsUseCase, AuditLogger, DecisionInput, ExtractionSource, NoProgress,
    ProgressNotifier, ReconcileBatchUseCase, ReconcileDocumentUseCase, ReviewQueue,
    ReviewSessionUseCase, ReviewStore,
};
use annoquorum_infrastructure::{
    ConfigLoader, DocumentLoader, FileConfig, FileExtractionSource, FileOutputFormat,
    JsonResultWriter, JsonReviewQueue, JsonReviewStore, JsonlAuditLogger,
};
use annoquorum_presentation::{
    Cli, Command, ConsoleFormatter, GlobalArgs, OutputFormat, ProgressReporter, ReconcileArgs,
    ReviewCommand,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.global.verbose, cli.global.log_file.as_deref())?;

    info!("Starting Annotation Quorum");

    let config = load_config(&cli.global)?;
    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.global.output.unwrap_or(match config.output.format {
        FileOutputFormat::Text => OutputFormat::Text,
        FileOutputFormat::Json => OutputFormat::Json,
    });

    match cli.command {
        Command::Reconcile(args) => reconcile(args, &cli.global, &config, format).await,
        Command::Review(command) => review(command, &config, format).await,
        Command::ApplyReviews => apply_reviews(&config, format).await,
        Command::ShowConfig => show_config(&cli.global, &config, format),
    }
}

fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_config(global: &GlobalArgs) -> Result<FileConfig> {
    if global.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(global.config.as_ref())
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))
}

fn audit_logger(config: &FileConfig) -> Option<Arc<dyn AuditLogger>> {
    let path = config.output.audit_log.as_ref()?;
    let logger = JsonlAuditLogger::new(path)?;
    info!("Audit log: {}", logger.path().display());
    Some(Arc::new(logger))
}

async fn open_review_state(
    config: &FileConfig,
) -> Result<(Arc<dyn ReviewStore>, Arc<dyn ReviewQueue>)> {
    // A corrupt store or queue is fatal
    let store = JsonReviewStore::open(&config.review.store_file)
        .await
        .context("Failed to open review store")?;
    let queue = JsonReviewQueue::open(&config.review.queue_file, config.review.stale_after_skips)
        .await
        .context("Failed to open review queue")?;
    Ok((Arc::new(store), Arc::new(queue)))
}

async fn reconcile(
    args: ReconcileArgs,
    global: &GlobalArgs,
    config: &FileConfig,
    format: OutputFormat,
) -> Result<()> {
    config.validate()?;

    let pattern = args
        .documents
        .unwrap_or_else(|| config.input.documents.clone());
    let extractions = args
        .extractions
        .unwrap_or_else(|| config.input.extractions_dir.clone());

    let documents = DocumentLoader::new().load_glob(&pattern)?;
    if documents.is_empty() {
        warn!("No documents match {}", pattern);
        bail!("No documents match {}", pattern);
    }

    // === Dependency Injection ===
    let sources: Vec<Arc<dyn ExtractionSource>> =
        FileExtractionSource::for_ids(&extractions, config.sources.ids())
            .into_iter()
            .map(|source| Arc::new(source) as Arc<dyn ExtractionSource>)
            .collect();
    let table = Arc::new(config.reliability_table());
    let (store, queue) = open_review_state(config).await?;

    let mut use_case = ReconcileDocumentUseCase::new(sources, table, store, queue)
        .with_params(config.reconcile_params());
    if !args.dry_run {
        let directory = args
            .output_dir
            .unwrap_or_else(|| config.output.directory.clone());
        use_case = use_case
            .with_writer(Arc::new(JsonResultWriter::new(directory).with_conll(config.output.conll)));
    }
    if let Some(audit) = audit_logger(config) {
        use_case = use_case.with_audit_logger(audit);
    }

    let batch = ReconcileBatchUseCase::new(Arc::new(use_case));

    // Execute with or without progress reporting
    let progress: Box<dyn ProgressNotifier> = if global.quiet || format == OutputFormat::Json {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let report = batch.execute(&documents, progress.as_ref()).await;

    let output = match format {
        OutputFormat::Text => ConsoleFormatter::format_batch(&report),
        OutputFormat::Json => ConsoleFormatter::format_batch_json(&report),
    };
    println!("{}", output);

    if report.has_failures() {
        bail!("{} document(s) failed", report.failures.len());
    }
    Ok(())
}

async fn review(command: ReviewCommand, config: &FileConfig, format: OutputFormat) -> Result<()> {
    let (store, queue) = open_review_state(config).await?;
    let stale_after = config.review.stale_after_skips;
    let session = ReviewSessionUseCase::new(store, queue, stale_after);

    let output = match command {
        ReviewCommand::List { stale, limit } => {
            let mut tasks = if stale {
                session.stale().await?
            } else {
                session.pending().await?
            };
            if let Some(limit) = limit {
                tasks.truncate(limit);
            }
            match format {
                OutputFormat::Text => ConsoleFormatter::format_tasks(&tasks, stale_after),
                OutputFormat::Json => ConsoleFormatter::format_json(&tasks),
            }
        }
        ReviewCommand::Decide {
            task_id,
            label,
            reviewer,
            confidence,
            notes,
        } => {
            let input = DecisionInput::new(task_id, label, reviewer)
                .with_confidence(confidence)
                .with_notes(notes);
            let task = session.decide(input).await?;
            match format {
                OutputFormat::Text => ConsoleFormatter::format_task(&task, stale_after),
                OutputFormat::Json => ConsoleFormatter::format_json(&task),
            }
        }
        ReviewCommand::Skip { task_id } => {
            let task = session.skip(task_id).await?;
            match format {
                OutputFormat::Text => ConsoleFormatter::format_task(&task, stale_after),
                OutputFormat::Json => ConsoleFormatter::format_json(&task),
            }
        }
        ReviewCommand::Report => {
            let (report, statistics) = session.report().await?;
            match format {
                OutputFormat::Text => ConsoleFormatter::format_report(&report, &statistics),
                OutputFormat::Json => ConsoleFormatter::format_json(&serde_json::json!({
                    "report": report,
                    "statistics": statistics,
                })),
            }
        }
    };

    println!("{}", output);
    Ok(())
}

async fn apply_reviews(config: &FileConfig, format: OutputFormat) -> Result<()> {
    let (store, queue) = open_review_state(config).await?;
    let mut use_case = ApplyReviewsUseCase::new(store, queue);
    if let Some(audit) = audit_logger(config) {
        use_case = use_case.with_audit_logger(audit);
    }

    let result = use_case.execute().await?;
    let output = match format {
        OutputFormat::Text => ConsoleFormatter::format_apply(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);
    Ok(())
}

fn show_config(global: &GlobalArgs, config: &FileConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", ConsoleFormatter::format_json(config));
        return Ok(());
    }

    println!("Configuration files (highest priority first):");
    for (label, path) in ConfigLoader::config_sources(global.config.as_ref()) {
        match path {
            Some(path) => println!("  {:<9} {}", format!("{}:", label), path.display()),
            None => println!("  {:<9} (not found)", format!("{}:", label)),
        }
    }
    if global.no_config {
        println!("  (--no-config: defaults only)");
    }

    println!();
    println!("{}", toml::to_string_pretty(config)?);

    if let Err(e) = config.validate() {
        warn!("Configuration is incomplete: {}", e);
        println!("Warning: {}", e);
    }
    Ok(())
}
