//! Console output formatter for reconciliation and review results

use annoquorum_application::{ApplyReviewsOutput, BatchReport, DocumentOutcome, ResolvedDocument};
use annoquorum_domain::{
    Priority, ReviewReport, ReviewStatistics, ReviewTask, TierCounts,
};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Per-document lines plus batch totals
    pub fn format_batch(report: &BatchReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Reconciliation Results"));
        output.push('\n');

        for outcome in &report.outcomes {
            match outcome {
                DocumentOutcome::Resolved(resolved) => {
                    output.push_str(&Self::format_resolved(resolved));
                }
                DocumentOutcome::Skipped { doc_name, reason } => {
                    output.push_str(&format!(
                        "\n{} {} {}\n",
                        "x".red(),
                        doc_name.bold(),
                        format!("skipped: {}", reason).red()
                    ));
                }
            }
        }

        for (doc_name, error) in &report.failures {
            output.push_str(&format!(
                "\n{} {} {}\n",
                "!".red().bold(),
                doc_name.bold(),
                error.to_string().red()
            ));
        }

        output.push_str(&Self::section_header("Totals"));
        output.push_str(&format!(
            "  {} resolved, {} skipped, {} failed\n",
            report.resolved_count().to_string().green(),
            report.skipped_count().to_string().yellow(),
            report.failures.len().to_string().red()
        ));
        output.push_str(&format!(
            "  {} new review task(s)\n",
            report.enqueued_count().to_string().cyan()
        ));

        output.push_str(&Self::footer());
        output
    }

    fn format_resolved(resolved: &ResolvedDocument) -> String {
        let summary = &resolved.summary;
        let mut output = format!(
            "\n{} {}\n",
            "v".green(),
            resolved.doc_name.yellow().bold()
        );

        output.push_str(&format!(
            "  {} {}\n",
            "Entities: ".cyan(),
            Self::tiers(&summary.entity_tiers)
        ));
        output.push_str(&format!(
            "  {} {}\n",
            "Relations:".cyan(),
            Self::tiers(&summary.relation_tiers)
        ));
        output.push_str(&format!(
            "  {} {} entities ({} reviewed), {} relations\n",
            "Final:    ".cyan(),
            summary.final_entities,
            summary.reviewed_entities,
            summary.final_relations
        ));

        if summary.malformed.total() > 0 {
            output.push_str(&format!(
                "  {} {} malformed observation(s) dropped\n",
                "Dropped:  ".cyan(),
                summary.malformed.total()
            ));
        }
        if summary.enqueued_tasks > 0 {
            output.push_str(&format!(
                "  {} {} new task(s)\n",
                "Review:   ".cyan(),
                summary.enqueued_tasks
            ));
        }
        for (source, reason) in &summary.failed_sources {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "Failed:   ".red(),
                source,
                reason.dimmed()
            ));
        }

        output
    }

    fn tiers(counts: &TierCounts) -> String {
        format!(
            "{} unanimous, {} majority, {} disputed, {} conflicts",
            counts.unanimous, counts.majority, counts.disputed, counts.conflicts
        )
    }

    /// Pending tasks, one block each
    pub fn format_tasks(tasks: &[ReviewTask], stale_after_skips: u32) -> String {
        if tasks.is_empty() {
            return format!("{}\n", "No pending review tasks".green());
        }

        let mut output = String::new();
        output.push_str(&Self::header(&format!("Pending Review Tasks ({})", tasks.len())));
        output.push('\n');
        for task in tasks {
            output.push_str(&Self::format_task(task, stale_after_skips));
        }
        output.push_str(&Self::footer());
        output
    }

    pub fn format_task(task: &ReviewTask, stale_after_skips: u32) -> String {
        let priority = match task.priority {
            Priority::High => task.priority.as_str().red().bold(),
            Priority::Medium => task.priority.as_str().yellow(),
        };
        let mut output = format!(
            "\n{} [{}] {} {}\n",
            format!("#{}", task.id).bold(),
            priority,
            task.question,
            format!("({})", task.doc_name).dimmed()
        );

        if task.is_stale(stale_after_skips) {
            output.push_str(&format!(
                "  {}\n",
                format!("stale: skipped {} times", task.skip_count).magenta()
            ));
        }

        if !task.context.highlighted.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Context:".cyan(),
                task.context.highlighted
            ));
        }
        output.push_str(&format!(
            "  {} {}\n",
            "Sentence:".cyan(),
            task.context.full_sentence
        ));

        for (source, opinion) in &task.opinions {
            output.push_str(&format!("    {} {}\n", format!("{}:", source).dimmed(), opinion));
        }
        output.push_str(&format!(
            "  {} {}\n",
            "Options:".cyan(),
            task.options.join(" / ")
        ));

        if let Some(decision) = &task.decision {
            output.push_str(&format!(
                "  {} {} ({}, by {})\n",
                "Decision:".green(),
                decision.label,
                decision.confidence,
                decision.reviewer
            ));
        }
        output
    }

    pub fn format_report(report: &ReviewReport, statistics: &ReviewStatistics) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Review Report"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}/{} ({:.1}%)\n",
            "Completed:".cyan().bold(),
            report.completed_tasks,
            report.total_tasks,
            report.completion_rate * 100.0
        ));

        if !report.label_counts.is_empty() {
            output.push_str(&Self::section_header("Labels"));
            for (label, count) in &report.label_counts {
                output.push_str(&format!("  {:<6} {}\n", label, count));
            }
        }
        if !report.priority_counts.is_empty() {
            output.push_str(&Self::section_header("Priorities"));
            for (priority, count) in &report.priority_counts {
                output.push_str(&format!("  {:<8} {}\n", priority.as_str(), count));
            }
        }
        if !report.reason_counts.is_empty() {
            output.push_str(&Self::section_header("Reasons"));
            for (reason, count) in &report.reason_counts {
                output.push_str(&format!("  {:<14} {}\n", reason.as_str(), count));
            }
        }

        output.push_str(&Self::section_header("Review Store"));
        output.push_str(&format!(
            "  {} reviewed, {} confirmed, {} rejected, {} type corrections\n",
            statistics.total_reviewed,
            statistics.confirmed_entities.to_string().green(),
            statistics.rejected_entities.to_string().red(),
            statistics.type_corrections
        ));

        if !report.recommendations.is_empty() {
            output.push_str(&format!("\n{}\n", "Recommendations:".yellow().bold()));
            for line in &report.recommendations {
                output.push_str(&format!("  * {}\n", line));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_apply(result: &ApplyReviewsOutput) -> String {
        if result.applied_tasks == 0 {
            return format!("{}\n", "No reviewed tasks to apply".yellow());
        }
        format!(
            "{} Applied {} review(s): {} added, {} updated, {} unchanged\n  store now holds {} decisions ({} confirmed, {} rejected)\n",
            "v".green(),
            result.applied_tasks,
            result.merge.added,
            result.merge.updated,
            result.merge.unchanged,
            result.statistics.total_reviewed,
            result.statistics.confirmed_entities,
            result.statistics.rejected_entities
        )
    }

    /// Format any serializable result as JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// JSON view of a batch; failures are rendered as messages
    pub fn format_batch_json(report: &BatchReport) -> String {
        let failures: Vec<_> = report
            .failures
            .iter()
            .map(|(doc_name, error)| json!({"doc_name": doc_name, "error": error.to_string()}))
            .collect();
        Self::format_json(&json!({
            "outcomes": report.outcomes,
            "failures": failures,
            "resolved": report.resolved_count(),
            "skipped": report.skipped_count(),
            "enqueued": report.enqueued_count(),
        }))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
