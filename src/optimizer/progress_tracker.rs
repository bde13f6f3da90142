//! # Progress Tracking Module
//!
//! Unifica output JSON e output testuale: una riga per file e una riga
//! di riepilogo a fine batch.

use crate::{
    file_manager::FileManager,
    json_output::JsonMessage,
    optimizer::job::OptimizationJob,
    progress::{BatchSummary, FileFailure, FileResult, ProgressManager},
};
use tracing::error;

/// Reports per-file outcomes and the final summary
pub struct ProgressTracker {
    json_output: bool,
    progress_manager: Option<ProgressManager>,
}

impl ProgressTracker {
    /// Crea un nuovo tracker. The bar is only shown for multi-file text runs.
    pub fn new(json_output: bool, total_files: usize) -> Self {
        let progress_manager = if !json_output && total_files > 1 {
            Some(ProgressManager::new(total_files as u64))
        } else {
            None
        };

        Self {
            json_output,
            progress_manager,
        }
    }

    pub fn start(&self, job: &OptimizationJob, total_files: usize) {
        if self.json_output {
            JsonMessage::Start {
                source: job.source().path.clone(),
                destination: job.destination_dir().to_path_buf(),
                quality: job.quality().map(|q| q.value()),
                total_files,
            }
            .emit();
        }
    }

    pub fn file_completed(&self, result: &FileResult) {
        if self.json_output {
            JsonMessage::file_complete(result).emit();
            return;
        }
        self.print(&format_file_line(result));
        self.advance(&result.source.to_string_lossy());
    }

    pub fn file_failed(&self, failure: &FileFailure) {
        if self.json_output {
            JsonMessage::file_error(failure).emit();
            return;
        }
        error!("{}", failure.error);
        self.print(&format!("[ERROR] {}: {}", failure.source.display(), failure.error));
        self.advance(&failure.source.to_string_lossy());
    }

    /// Finalizza: summary line only when at least one file was optimized
    pub fn finish(&self, summary: &BatchSummary) {
        if let Some(ref manager) = self.progress_manager {
            manager.finish();
        }

        if self.json_output {
            JsonMessage::complete(summary).emit();
        } else if let Some(line) = format_summary(summary) {
            println!("{}", line);
        }
    }

    fn print(&self, line: &str) {
        match self.progress_manager {
            Some(ref manager) => manager.println(line),
            None => println!("{}", line),
        }
    }

    fn advance(&self, message: &str) {
        if let Some(ref manager) = self.progress_manager {
            manager.update(message);
        }
    }
}

/// `photo.jpg [q=80]: 9.77K --> 7.81K`
pub fn format_file_line(result: &FileResult) -> String {
    let quality = result
        .quality
        .map(|q| format!(" [q={}]", q))
        .unwrap_or_default();

    format!(
        "{}{}: {} --> {}",
        result.source.display(),
        quality,
        FileManager::format_size(result.original_size),
        FileManager::format_size(result.optimized_size)
    )
}

/// `None` when nothing was optimized
pub fn format_summary(summary: &BatchSummary) -> Option<String> {
    if summary.files_processed() == 0 {
        return None;
    }

    let mut line = format!(
        "Optimization completed: {} file(s), total gain {} ({:.2}%)",
        summary.files_processed(),
        FileManager::format_delta(summary.total_gain()),
        summary.overall_reduction_percent()
    );
    if !summary.failures().is_empty() {
        line.push_str(&format!(", {} failed", summary.failures().len()));
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizeError;
    use crate::image_processor::Quality;
    use std::path::PathBuf;

    #[test]
    fn test_file_line() {
        let plain = FileResult::new(PathBuf::from("photo.jpg"), PathBuf::from("optimized/photo.jpg"), None, 10_000, 8_000);
        assert_eq!(format_file_line(&plain), "photo.jpg: 9.77K --> 7.81K");

        let reencoded = FileResult::new(
            PathBuf::from("photo.jpg"),
            PathBuf::from("optimized_80/photo.jpg"),
            Some(Quality::new(80).unwrap()),
            2048,
            1024,
        );
        assert_eq!(format_file_line(&reencoded), "photo.jpg [q=80]: 2.00K --> 1.00K");
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(format_summary(&BatchSummary::default()), None);

        let summary = BatchSummary::default()
            .record(
                PathBuf::from("a.jpg"),
                Ok(FileResult::new(PathBuf::from("a.jpg"), PathBuf::from("o/a.jpg"), None, 4096, 2048)),
            )
            .record(PathBuf::from("b.jpg"), Err(OptimizeError::UnsupportedFormat(PathBuf::from("b.jpg"))));

        assert_eq!(
            format_summary(&summary).unwrap(),
            "Optimization completed: 1 file(s), total gain 2.00K (50.00%), 1 failed"
        );
    }

    #[test]
    fn test_only_failures_prints_nothing() {
        let summary = BatchSummary::default()
            .record(PathBuf::from("a.jpg"), Err(OptimizeError::UnsupportedFormat(PathBuf::from("a.jpg"))));
        assert_eq!(format_summary(&summary), None);
    }
}
