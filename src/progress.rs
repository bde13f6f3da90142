//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce i risultati per file e le statistiche del batch.
//!
//! ## Componenti principali:
//! - `FileResult`: risultato di un file ottimizzato (immutabile)
//! - `FileFailure`: file saltato per errore, il batch continua
//! - `BatchSummary`: fold dei risultati, prodotto dal loop del batch
//! - `ProgressManager`: progress bar `indicatif` per le directory
//!
//! ## Esempio:
//! ```rust,ignore
//! let summary = outcomes
//!     .into_iter()
//!     .fold(BatchSummary::default(), |summary, (source, outcome)| summary.record(source, outcome));
//! println!("{} files, gain {}", summary.files_processed(), summary.total_gain());
//! ```

use crate::error::OptimizeError;
use crate::image_processor::Quality;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one successfully optimized file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub quality: Option<Quality>,
    pub original_size: u64,
    pub optimized_size: u64,
    /// `original_size - optimized_size`; negative when the output grew
    pub byte_delta: i64,
}

impl FileResult {
    pub fn new(
        source: PathBuf,
        destination: PathBuf,
        quality: Option<Quality>,
        original_size: u64,
        optimized_size: u64,
    ) -> Self {
        Self {
            source,
            destination,
            quality,
            original_size,
            optimized_size,
            byte_delta: original_size as i64 - optimized_size as i64,
        }
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            (self.byte_delta as f64 / self.original_size as f64) * 100.0
        }
    }
}

/// A file that could not be optimized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: String,
}

impl FileFailure {
    pub fn new(source: PathBuf, error: &OptimizeError) -> Self {
        Self {
            source,
            error: error.to_string(),
        }
    }
}

/// Accumulated results of a batch run
#[derive(Debug, Default, Clone)]
pub struct BatchSummary {
    results: Vec<FileResult>,
    failures: Vec<FileFailure>,
}

impl BatchSummary {
    pub fn with_result(mut self, result: FileResult) -> Self {
        self.results.push(result);
        self
    }

    pub fn with_failure(mut self, failure: FileFailure) -> Self {
        self.failures.push(failure);
        self
    }

    /// Folds one file outcome into the summary
    pub fn record(self, source: PathBuf, outcome: Result<FileResult, OptimizeError>) -> Self {
        match outcome {
            Ok(result) => self.with_result(result),
            Err(e) => self.with_failure(FileFailure::new(source, &e)),
        }
    }

    pub fn results(&self) -> &[FileResult] {
        &self.results
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    pub fn files_processed(&self) -> usize {
        self.results.len()
    }

    /// Sum of every `byte_delta`
    pub fn total_gain(&self) -> i64 {
        self.results.iter().map(|r| r.byte_delta).sum()
    }

    pub fn total_original_size(&self) -> u64 {
        self.results.iter().map(|r| r.original_size).sum()
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        let original = self.total_original_size();
        if original > 0 {
            (self.total_gain() as f64 / original as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Manages the progress bar shown while a directory is processed
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Advance by one file
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Print a line above the bar. Unlike `ProgressBar::println` this
    /// still prints when the bar is hidden (stdout not a terminal).
    pub fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{}", line));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
