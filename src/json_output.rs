//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (`--json`) per l'uso
//! da script o altri processi. Un messaggio per riga su stdout.
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch
//! - `file_complete`: File ottimizzato
//! - `file_error`: File saltato per errore
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore fatale

use crate::progress::{BatchSummary, FileFailure, FileResult};
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        source: PathBuf,
        destination: PathBuf,
        quality: Option<u64>,
        total_files: usize,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        destination: PathBuf,
        quality: Option<u64>,
        original_size: u64,
        optimized_size: u64,
        byte_delta: i64,
        reduction_percent: f64,
    },

    #[serde(rename = "file_error")]
    FileError { path: PathBuf, error: String },

    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        errors: usize,
        total_byte_delta: i64,
        average_reduction: f64,
    },

    #[serde(rename = "error")]
    Error { message: String },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn file_complete(result: &FileResult) -> Self {
        Self::FileComplete {
            path: result.source.clone(),
            destination: result.destination.clone(),
            quality: result.quality.map(|q| q.value()),
            original_size: result.original_size,
            optimized_size: result.optimized_size,
            byte_delta: result.byte_delta,
            reduction_percent: result.reduction_percent(),
        }
    }

    pub fn file_error(failure: &FileFailure) -> Self {
        Self::FileError {
            path: failure.source.clone(),
            error: failure.error.clone(),
        }
    }

    pub fn complete(summary: &BatchSummary) -> Self {
        Self::Complete {
            files_processed: summary.files_processed(),
            errors: summary.failures().len(),
            total_byte_delta: summary.total_gain(),
            average_reduction: summary.overall_reduction_percent(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
