//! # Path Resolution Module
//!
//! Centralizza il calcolo della directory di destinazione e la
//! classificazione della sorgente (file singolo o directory).

use crate::error::{OptimizeError, Result};
use crate::image_processor::Quality;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Whether the run processes one file or a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub path: PathBuf,
}

/// Utility per calcolare i path in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// `optimized_<q>` with a quality override, `optimized` otherwise
    pub fn default_destination(quality: Option<Quality>) -> PathBuf {
        match quality {
            Some(q) => PathBuf::from(format!("optimized_{}", q)),
            None => PathBuf::from("optimized"),
        }
    }

    /// Returns a writable output directory, creating it (one level only)
    /// when it does not exist.
    pub async fn resolve_destination(requested: Option<&Path>, quality: Option<Quality>) -> Result<PathBuf> {
        let path = requested
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::default_destination(quality));

        let unavailable = |path: &Path, reason: &str| OptimizeError::DestinationUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {
                if Self::is_writable(&path) {
                    debug!("Using existing destination {}", path.display());
                    Ok(path)
                } else {
                    Err(unavailable(&path, "directory is not writable"))
                }
            }
            Ok(_) => Err(unavailable(&path, "path exists and is not a directory")),
            Err(_) => {
                tokio::fs::create_dir(&path)
                    .await
                    .map_err(|e| unavailable(&path, &e.to_string()))?;
                info!("Created output directory: {}", path.display());
                Ok(path)
            }
        }
    }

    /// Probe by creating (and immediately dropping) an anonymous file
    fn is_writable(dir: &Path) -> bool {
        tempfile::tempfile_in(dir).is_ok()
    }

    /// Classifies the source; the current directory when none is given.
    ///
    /// A regular file is `File` whatever its extension; its format is
    /// checked later when it is encoded.
    pub async fn resolve_source(source: Option<&Path>) -> Result<SourceSpec> {
        let path = match source {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir()?,
        };

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(SourceSpec {
                kind: SourceKind::File,
                path,
            }),
            Ok(metadata) if metadata.is_dir() => Ok(SourceSpec {
                kind: SourceKind::Directory,
                path,
            }),
            _ => Err(OptimizeError::SourceNotFound(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_destination_names() {
        assert_eq!(PathResolver::default_destination(None), PathBuf::from("optimized"));
        assert_eq!(
            PathResolver::default_destination(Some(Quality::new(80).unwrap())),
            PathBuf::from("optimized_80")
        );
    }

    #[tokio::test]
    async fn test_creates_missing_destination() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("out");

        let resolved = PathResolver::resolve_destination(Some(&requested), None).await.unwrap();
        assert_eq!(resolved, requested);
        assert!(requested.is_dir());

        // Second call reuses the existing directory
        let again = PathResolver::resolve_destination(Some(&requested), None).await.unwrap();
        assert_eq!(again, requested);
    }

    #[tokio::test]
    async fn test_destination_creation_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("a").join("b");

        let err = PathResolver::resolve_destination(Some(&requested), None).await.unwrap_err();
        assert!(matches!(err, OptimizeError::DestinationUnavailable { .. }));
        assert!(!dir.path().join("a").exists());
    }

    #[tokio::test]
    async fn test_destination_that_is_a_file() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("taken");
        std::fs::write(&requested, b"x").unwrap();

        let err = PathResolver::resolve_destination(Some(&requested), None).await.unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[tokio::test]
    async fn test_resolve_source_kinds() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("photo.txt");
        std::fs::write(&file, b"whatever").unwrap();

        let spec = PathResolver::resolve_source(Some(&file)).await.unwrap();
        assert_eq!(spec.kind, SourceKind::File);

        let spec = PathResolver::resolve_source(Some(dir.path())).await.unwrap();
        assert_eq!(spec.kind, SourceKind::Directory);

        let missing = dir.path().join("missing.jpg");
        assert!(matches!(
            PathResolver::resolve_source(Some(&missing)).await,
            Err(OptimizeError::SourceNotFound(p)) if p == missing
        ));
    }

    #[tokio::test]
    async fn test_resolve_source_defaults_to_cwd() {
        let spec = PathResolver::resolve_source(None).await.unwrap();
        assert_eq!(spec.kind, SourceKind::Directory);
        assert_eq!(spec.path, std::env::current_dir().unwrap());
    }
}
