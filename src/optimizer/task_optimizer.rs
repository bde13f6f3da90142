//! # Task Optimizer Module
//!
//! Worker per l'ottimizzazione di singoli file:
//! encode → transcode → misura delle dimensioni.

use crate::{
    error::Result,
    file_manager::FileManager,
    image_processor::{ImageProcessor, Quality},
    platform::ToolRunner,
    progress::FileResult,
};
use std::path::Path;
use tracing::debug;

/// Worker per elaborazione singoli file
pub struct TaskOptimizer<R> {
    image_processor: ImageProcessor<R>,
}

impl<R: ToolRunner> TaskOptimizer<R> {
    pub fn new(image_processor: ImageProcessor<R>) -> Self {
        Self { image_processor }
    }

    pub fn image_processor(&self) -> &ImageProcessor<R> {
        &self.image_processor
    }

    /// Processa un singolo file. `destination` is the full output path,
    /// planned by the batch so that no two files share it.
    pub async fn process_single_file(
        &self,
        source: &Path,
        destination: &Path,
        quality: Option<Quality>,
    ) -> Result<FileResult> {
        let original_size = FileManager::file_size(source).await?;
        debug!("{} -> {}", source.display(), destination.display());

        let optimized_size = self.image_processor.optimize(source, destination, quality).await?;

        Ok(FileResult::new(
            source.to_path_buf(),
            destination.to_path_buf(),
            quality,
            original_size,
            optimized_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fake_toolchain, jpeg_of_size, FakeRunner, BMP_BYTES, JPEG_BYTES};
    use tempfile::TempDir;

    fn task() -> TaskOptimizer<FakeRunner> {
        TaskOptimizer::new(ImageProcessor::with_runner(fake_toolchain(), FakeRunner::new(), 100))
    }

    #[tokio::test]
    async fn test_single_jpeg_result() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        std::fs::write(&source, jpeg_of_size(10_000)).unwrap();
        let out = dir.path().join("optimized");
        std::fs::create_dir(&out).unwrap();

        let result = task()
            .process_single_file(&source, &out.join("photo.jpg"), None)
            .await
            .unwrap();

        assert_eq!(result.destination, out.join("photo.jpg"));
        assert_eq!(result.original_size, 10_000);
        assert_eq!(result.optimized_size, JPEG_BYTES.len() as u64);
        assert_eq!(result.byte_delta, 10_000 - JPEG_BYTES.len() as i64);
        assert!(result.destination.exists());
    }

    #[tokio::test]
    async fn test_bmp_is_encoded_then_transcoded() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("scan.bmp");
        std::fs::write(&source, BMP_BYTES).unwrap();

        let task = task();
        let result = task
            .process_single_file(&source, &dir.path().join("scan.jpg"), None)
            .await
            .unwrap();

        assert!(dir.path().join("scan.jpg").exists());
        assert_eq!(result.original_size, BMP_BYTES.len() as u64);
        assert_eq!(task.image_processor().runner().calls_to("cjpeg").len(), 1);
        assert_eq!(task.image_processor().runner().calls_to("jpegtran").len(), 1);
    }
}
