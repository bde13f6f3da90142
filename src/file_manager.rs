//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Rilevamento del formato tramite magic bytes (mai tramite estensione)
//! - Enumerazione non ricorsiva di una directory filtrata per formato
//! - Formattazione human-readable delle dimensioni (B/K/M/G/T/P)
//! - Calcolo del nome del file di output
//!
//! ## Formati supportati:
//! - **JPEG**: copiato così com'è oppure ricodificato con cjpeg
//! - **BMP**: sempre codificato con cjpeg
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_images(Path::new("/path/to/photos"))?;
//! for file in files {
//!     println!("{} ({})", file.display(), FileManager::format_size(FileManager::file_size(&file).await?));
//! }
//! ```

use crate::error::Result;
use image::ImageFormat;
use std::collections::HashSet;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Image types accepted by the batch pipeline
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Bmp];

const UNITS: &[char] = &['B', 'K', 'M', 'G', 'T', 'P'];

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    /// Detect the image type from the leading bytes of the file.
    ///
    /// Returns `Ok(None)` for files whose content is not a known image type.
    pub fn detect_format(path: &Path) -> Result<Option<ImageFormat>> {
        let file = std::fs::File::open(path)?;
        let reader = image::io::Reader::new(BufReader::new(file)).with_guessed_format()?;
        Ok(reader.format())
    }

    /// Whether the detected type is one the pipeline can process
    pub fn is_supported(format: ImageFormat) -> bool {
        SUPPORTED_FORMATS.contains(&format)
    }

    /// Whether the file content is a JPEG
    pub fn is_jpeg(path: &Path) -> bool {
        matches!(Self::detect_format(path), Ok(Some(ImageFormat::Jpeg)))
    }

    /// List the supported images directly inside `dir`.
    ///
    /// Subdirectories are skipped, not descended into. Order is whatever the
    /// platform's directory listing yields; callers must not rely on it.
    pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();

            if !path.is_file() {
                debug!("Skipping non-file entry: {}", path.display());
                continue;
            }

            match Self::detect_format(path) {
                Ok(Some(format)) if Self::is_supported(format) => files.push(path.to_path_buf()),
                Ok(format) => debug!("Skipping unsupported file {} ({:?})", path.display(), format),
                Err(e) => debug!("Skipping unreadable file {}: {}", path.display(), e),
            }
        }

        Ok(files)
    }

    /// Name of the optimized file inside the destination directory.
    ///
    /// JPEG sources keep their name, anything else is re-encoded and gets `.jpg`.
    pub fn output_file_name(source: &Path, format: ImageFormat) -> PathBuf {
        let name = source.file_name().unwrap_or_default();
        if format == ImageFormat::Jpeg {
            PathBuf::from(name)
        } else {
            PathBuf::from(name).with_extension("jpg")
        }
    }

    /// Output names for one run, aligned with `files`.
    ///
    /// Sources that keep their name (JPEG, or content the detector does not
    /// know) claim first. A renamed source falls back from `<stem>.jpg` to
    /// `<name>.jpg` when the former is taken; `None` when both are taken.
    /// No two entries share a name.
    pub fn plan_output_names(files: &[PathBuf]) -> Vec<Option<PathBuf>> {
        let formats: Vec<ImageFormat> = files
            .iter()
            .map(|file| match Self::detect_format(file) {
                Ok(Some(format)) => format,
                _ => ImageFormat::Jpeg,
            })
            .collect();

        let mut claimed = HashSet::new();
        let mut names = vec![None; files.len()];

        for renamed_pass in [false, true] {
            for (i, file) in files.iter().enumerate() {
                let renamed = formats[i] != ImageFormat::Jpeg;
                if renamed != renamed_pass {
                    continue;
                }

                let mut candidates = vec![Self::output_file_name(file, formats[i])];
                if renamed {
                    let mut full_name = file.file_name().unwrap_or_default().to_os_string();
                    full_name.push(".jpg");
                    candidates.push(PathBuf::from(full_name));
                }

                names[i] = candidates.into_iter().find(|name| claimed.insert(name.clone()));
                if names[i].is_none() {
                    debug!("No free output name for {}", file.display());
                }
            }
        }

        names
    }

    /// Get human-readable file size, e.g. `9.77K`.
    ///
    /// The unit comes from the number of decimal digits (one step per three
    /// digits, capped at `P`), the value is then divided by `1024^unit`. So
    /// 1000 bytes reads `0.98K` and the value never rounds up to `1024.00`
    /// below `P`.
    pub fn format_size(bytes: u64) -> String {
        let digits = bytes.to_string().len();
        let unit_index = ((digits - 1) / 3).min(UNITS.len() - 1);
        let size = bytes as f64 / 1024f64.powi(unit_index as i32);

        format!("{:.2}{}", size, UNITS[unit_index])
    }

    /// Human-readable signed byte delta; negative when the output grew
    pub fn format_delta(delta: i64) -> String {
        if delta < 0 {
            format!("-{}", Self::format_size(delta.unsigned_abs()))
        } else {
            Self::format_size(delta as u64)
        }
    }
}
