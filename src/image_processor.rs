//! # Image Processing Module
//!
//! Questo modulo orchestra i due tool esterni di mozjpeg. Nessuna
//! elaborazione in memoria: tutta la codifica è delegata a `cjpeg` e
//! `jpegtran`.
//!
//! ## Pipeline per file
//!
//! 1. **Encode**: JPEG senza qualità richiesta → copia byte per byte in un file
//!    temporaneo; altrimenti `cjpeg -quality <q> -outfile <tmp> <source>`
//! 2. **Transcode**: `jpegtran -copy none <tmp>`, stdout scritto nella
//!    destinazione finale
//! 3. Il file temporaneo viene rimosso quando `EncodedImage` esce dallo scope,
//!    sia in caso di successo che di errore
//!
//! ## File temporanei
//!
//! Ogni encode alloca un file temporaneo con nome univoco (`tempfile`), quindi
//! più file possono essere elaborati in parallelo senza collisioni.

use crate::error::{OptimizeError, Result};
use crate::file_manager::FileManager;
use crate::platform::{SystemRunner, ToolRunner};
use crate::tool_resolver::Toolchain;
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use tempfile::TempPath;
use tracing::{debug, warn};

/// A validated, non-negative re-encoding quality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u64);

impl Quality {
    /// Rejects negative values before anything else happens. Any
    /// non-negative value is kept; cjpeg owns the upper bound.
    pub fn new(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| OptimizeError::InvalidQuality(value))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of the encode step. Owns the temporary file; dropping it deletes
/// the file.
#[derive(Debug)]
pub struct EncodedImage {
    temp: TempPath,
    /// Detected type of the source
    pub source_format: ImageFormat,
    /// Whether cjpeg ran, as opposed to a plain copy
    pub reencoded: bool,
}

impl EncodedImage {
    pub fn path(&self) -> &Path {
        &self.temp
    }
}

/// Drives cjpeg and jpegtran for single files
pub struct ImageProcessor<R = SystemRunner> {
    toolchain: Toolchain,
    runner: R,
    /// Quality for non-JPEG sources when no override is given
    reencode_quality: u32,
}

impl ImageProcessor<SystemRunner> {
    pub fn new(toolchain: Toolchain, reencode_quality: u32) -> Self {
        Self::with_runner(toolchain, SystemRunner, reencode_quality)
    }
}

impl<R: ToolRunner> ImageProcessor<R> {
    pub fn with_runner(toolchain: Toolchain, runner: R, reencode_quality: u32) -> Self {
        Self {
            toolchain,
            runner,
            reencode_quality,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Produces a temporary JPEG from `source`.
    ///
    /// A JPEG with no quality override is copied unchanged. Anything else
    /// goes through cjpeg.
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the content is not a supported image
    /// - `EncodeFailed` if cjpeg exits non-zero or leaves an empty file
    pub async fn encode(&self, source: &Path, quality: Option<Quality>) -> Result<EncodedImage> {
        let source_format = match FileManager::detect_format(source)? {
            Some(format) if FileManager::is_supported(format) => format,
            _ => return Err(OptimizeError::UnsupportedFormat(source.to_path_buf())),
        };

        let temp = tempfile::Builder::new()
            .prefix("mozjpeg_")
            .suffix(".jpg")
            .tempfile()?
            .into_temp_path();

        let reencoded = source_format != ImageFormat::Jpeg || quality.is_some();
        if reencoded {
            let quality = quality.map_or(u64::from(self.reencode_quality), Quality::value);
            let args = args!["-quality", quality.to_string(), "-outfile", temp.as_os_str(), source];

            let output = self
                .runner
                .run(&self.toolchain.encoder, &args)
                .await
                .map_err(|e| OptimizeError::EncodeFailed {
                    path: source.to_path_buf(),
                    reason: format!("failed to start {}: {}", self.toolchain.encoder.display(), e),
                })?;

            if !output.success {
                warn!("cjpeg failed for {}: {}", source.display(), output.describe_failure());
                return Err(OptimizeError::EncodeFailed {
                    path: source.to_path_buf(),
                    reason: output.describe_failure(),
                });
            }
        } else {
            debug!("Copying {} to {} (lossless mode)", source.display(), temp.display());
            tokio::fs::copy(source, &temp).await?;
        }

        // The temp file already exists (empty) so presence alone proves nothing.
        let written = tokio::fs::metadata(&temp).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(OptimizeError::EncodeFailed {
                path: source.to_path_buf(),
                reason: "encoder produced no output".to_string(),
            });
        }

        Ok(EncodedImage {
            temp,
            source_format,
            reencoded,
        })
    }

    /// Strips metadata with jpegtran and writes the result to `destination`.
    ///
    /// Consumes `encoded`; its temporary file is deleted on every exit path.
    /// Returns the size of the written file.
    pub async fn transcode(&self, encoded: EncodedImage, destination: &Path) -> Result<u64> {
        let args = args!["-copy", "none", encoded.path()];

        let output = self
            .runner
            .run(&self.toolchain.transcoder, &args)
            .await
            .map_err(|e| OptimizeError::TranscodeFailed {
                path: destination.to_path_buf(),
                reason: format!("failed to start {}: {}", self.toolchain.transcoder.display(), e),
            })?;

        if !output.success {
            warn!("jpegtran failed for {}: {}", destination.display(), output.describe_failure());
            return Err(OptimizeError::TranscodeFailed {
                path: destination.to_path_buf(),
                reason: output.describe_failure(),
            });
        }

        if output.stdout.is_empty() {
            return Err(OptimizeError::TranscodeFailed {
                path: destination.to_path_buf(),
                reason: "transcoder produced no output".to_string(),
            });
        }

        tokio::fs::write(destination, &output.stdout).await?;
        debug!("Wrote {} bytes to {}", output.stdout.len(), destination.display());

        Ok(output.stdout.len() as u64)
    }

    /// Encode then transcode `source` into `destination`
    pub async fn optimize(
        &self,
        source: &Path,
        destination: &Path,
        quality: Option<Quality>,
    ) -> Result<u64> {
        let encoded = self.encode(source, quality).await?;
        self.transcode(encoded, destination).await
    }
}
