//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Categorie di errori:
//! - `ToolNotFound`: cjpeg/jpegtran mancanti o non eseguibili (fatale)
//! - `InvalidQuality`: qualità negativa (fatale, prima di ogni subprocess)
//! - `DestinationUnavailable`: directory di output non creabile/scrivibile (fatale)
//! - `SourceNotFound`: sorgente inesistente (fatale)
//! - `EncodeFailed` / `TranscodeFailed`: errori per singolo file (il batch continua)
//! - `OutputConflict`: nessun nome di output libero per il file (per singolo file)
//! - `InvalidImage`: il comando `exif` ha ricevuto un file non JPEG
//!
//! ## Esempio:
//! ```rust,ignore
//! if !output.success {
//!     return Err(OptimizeError::TranscodeFailed {
//!         path: source.to_path_buf(),
//!         reason: output.describe_failure(),
//!     });
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for JPEG optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image detection error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Required tool missing: {0}")]
    ToolNotFound(String),

    #[error("Invalid quality {0}: must be a non-negative integer")]
    InvalidQuality(i64),

    #[error("Destination directory unavailable: {}: {reason}", .path.display())]
    DestinationUnavailable { path: PathBuf, reason: String },

    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Encoding failed for {}: {reason}", .path.display())]
    EncodeFailed { path: PathBuf, reason: String },

    #[error("Transcoding failed for {}: {reason}", .path.display())]
    TranscodeFailed { path: PathBuf, reason: String },

    #[error("Output name already used by another file in this run: {}", .0.display())]
    OutputConflict(PathBuf),

    #[error("Invalid jpeg file {}", .0.display())]
    InvalidImage(PathBuf),

    #[error("Metadata read error: {0}")]
    Metadata(String),
}

pub type Result<T> = std::result::Result<T, OptimizeError>;

impl OptimizeError {
    /// Whether the error only concerns the file being processed; the batch
    /// keeps going after these.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::EncodeFailed { .. }
                | Self::TranscodeFailed { .. }
                | Self::UnsupportedFormat(_)
                | Self::OutputConflict(_)
                | Self::Io(_)
                | Self::Image(_)
        )
    }
}
