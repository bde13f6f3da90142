//! # Optimization Job
//!
//! Una `OptimizationJob` viene creata una volta per invocazione a partire
//! dagli argomenti CLI e non cambia più. Le precondizioni (qualità valida,
//! destinazione scrivibile, sorgente esistente) sono verificate qui, prima
//! di qualsiasi elaborazione.

use crate::error::Result;
use crate::image_processor::Quality;
use crate::optimizer::path_resolver::{PathResolver, SourceSpec};
use std::path::{Path, PathBuf};

/// Raw options as given on the command line
#[derive(Debug, Clone, Default)]
pub struct OptimizationRequest {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub quality: Option<i64>,
}

/// Validated, immutable description of one run
#[derive(Debug, Clone)]
pub struct OptimizationJob {
    source: SourceSpec,
    destination_dir: PathBuf,
    quality: Option<Quality>,
}

impl OptimizationJob {
    /// Validates the request in order: quality, destination, source.
    ///
    /// The destination directory exists and is writable once this returns.
    pub async fn prepare(request: &OptimizationRequest) -> Result<Self> {
        let quality = request.quality.map(Quality::new).transpose()?;
        let destination_dir =
            PathResolver::resolve_destination(request.destination.as_deref(), quality).await?;
        let source = PathResolver::resolve_source(request.source.as_deref()).await?;

        Ok(Self {
            source,
            destination_dir,
            quality,
        })
    }

    pub fn source(&self) -> &SourceSpec {
        &self.source
    }

    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizeError;
    use crate::optimizer::path_resolver::SourceKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_valid_request() {
        let dir = TempDir::new().unwrap();
        let request = OptimizationRequest {
            source: Some(dir.path().to_path_buf()),
            destination: Some(dir.path().join("out")),
            quality: Some(75),
        };

        let job = OptimizationJob::prepare(&request).await.unwrap();
        assert_eq!(job.source().kind, SourceKind::Directory);
        assert_eq!(job.destination_dir(), dir.path().join("out"));
        assert_eq!(job.quality().map(Quality::value), Some(75));
    }

    #[tokio::test]
    async fn test_negative_quality_fails_before_destination_is_created() {
        let dir = TempDir::new().unwrap();
        let request = OptimizationRequest {
            source: Some(dir.path().to_path_buf()),
            destination: Some(dir.path().join("out")),
            quality: Some(-3),
        };

        let err = OptimizationJob::prepare(&request).await.unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidQuality(-3)));
        assert!(!dir.path().join("out").exists());
    }
}
