//! Progress reporting for reconcile runs

use annoquorum_application::ProgressNotifier;
use annoquorum_domain::SourceId;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with a document progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total_documents: usize) {
        let pb = ProgressBar::new(total_documents as u64);
        pb.set_style(Self::batch_style());
        pb.set_prefix("Reconciling");
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_source_complete(&self, document: &str, source: &SourceId, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {} {}", "v".green(), document, source)
            } else {
                format!("{} {} {}", "x".red(), document, source)
            };
            pb.set_message(status);
        });
    }

    fn on_document_complete(&self, document: &str, resolved: bool) {
        self.with_bar(|pb| {
            if !resolved {
                pb.println(format!("  {} {} skipped", "x".red(), document));
            }
            pb.inc(1);
        });
    }

    fn on_batch_complete(&self) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{}", "complete!".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, total_documents: usize) {
        println!(
            "{} {} ({} documents)",
            "->".cyan(),
            "Reconciling".bold(),
            total_documents
        );
    }

    fn on_source_complete(&self, document: &str, source: &SourceId, success: bool) {
        if !success {
            println!("  {} {} {} (failed)", "x".red(), document, source);
        }
    }

    fn on_document_complete(&self, document: &str, resolved: bool) {
        if resolved {
            println!("  {} {}", "v".green(), document);
        } else {
            println!("  {} {} (skipped)", "x".red(), document);
        }
    }

    fn on_batch_complete(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_documents() {
        let reporter = ProgressReporter::new();
        reporter.on_batch_start(2);
        reporter.on_source_complete("卷一", &SourceId::from("a"), true);
        reporter.on_document_complete("卷一", true);
        reporter.on_document_complete("卷二", false);

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|pb| pb.position());
        assert_eq!(position, Some(2));

        reporter.on_batch_complete();
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_events_without_batch_are_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_document_complete("卷一", true);
        reporter.on_batch_complete();
    }
}
