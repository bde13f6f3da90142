//! # Batch Optimizer
//!
//! Orchestratore principale: prepara il job, enumera la sorgente,
//! elabora i file uno alla volta e produce il `BatchSummary`.
//!
//! I file vengono elaborati in sequenza. Un errore su un file di una
//! directory viene riportato e il batch continua; con un file singolo
//! l'errore viene propagato.

use crate::{
    config::Config,
    error::{OptimizeError, Result},
    file_manager::FileManager,
    image_processor::ImageProcessor,
    optimizer::{
        job::{OptimizationJob, OptimizationRequest},
        path_resolver::SourceKind,
        progress_tracker::ProgressTracker,
        task_optimizer::TaskOptimizer,
    },
    platform::{SystemRunner, ToolRunner},
    progress::{BatchSummary, FileFailure},
    tool_resolver::Toolchain,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Orchestratore del batch
pub struct BatchOptimizer<R = SystemRunner> {
    config: Config,
    task_optimizer: TaskOptimizer<R>,
}

impl BatchOptimizer<SystemRunner> {
    /// `toolchain` must come from `ToolPathResolver::verify`
    pub fn new(config: Config, toolchain: Toolchain) -> Self {
        Self::with_runner(config, toolchain, SystemRunner)
    }
}

impl<R: ToolRunner> BatchOptimizer<R> {
    pub fn with_runner(config: Config, toolchain: Toolchain, runner: R) -> Self {
        let image_processor = ImageProcessor::with_runner(toolchain, runner, config.reencode_quality);
        Self {
            config,
            task_optimizer: TaskOptimizer::new(image_processor),
        }
    }

    pub fn runner(&self) -> &R {
        self.task_optimizer.image_processor().runner()
    }

    /// Esegue il processo di ottimizzazione
    pub async fn run(&self, request: &OptimizationRequest) -> Result<BatchSummary> {
        let job = OptimizationJob::prepare(request).await?;
        self.log_configuration(&job);

        let source = job.source();
        let files: Vec<PathBuf> = match source.kind {
            SourceKind::File => vec![source.path.clone()],
            SourceKind::Directory => FileManager::find_images(&source.path)?,
        };

        let tracker = ProgressTracker::new(self.config.json_output, files.len());
        tracker.start(&job, files.len());

        if files.is_empty() {
            info!("No supported images found in {}", source.path.display());
        }

        let outputs = FileManager::plan_output_names(&files);

        let mut summary = BatchSummary::default();
        for (file, output) in files.into_iter().zip(outputs) {
            let outcome = match output {
                Some(name) => {
                    let destination = job.destination_dir().join(name);
                    self.task_optimizer
                        .process_single_file(&file, &destination, job.quality())
                        .await
                }
                None => Err(OptimizeError::OutputConflict(file.clone())),
            };

            // A single file has nothing to continue with
            let outcome = match outcome {
                Err(e) if source.kind == SourceKind::File || !e.is_per_file() => return Err(e),
                outcome => outcome,
            };

            match &outcome {
                Ok(result) => tracker.file_completed(result),
                Err(e) => {
                    debug!("Skipping {}: {:?}", file.display(), e);
                    tracker.file_failed(&FileFailure::new(file.clone(), e));
                }
            }
            summary = summary.record(file, outcome);
        }

        tracker.finish(&summary);
        Ok(summary)
    }

    fn log_configuration(&self, job: &OptimizationJob) {
        match job.quality() {
            Some(q) => info!("Mode: re-encode with cjpeg at quality {}", q),
            None => info!("Mode: lossless (copy + jpegtran)"),
        }
        info!("Source: {}", job.source().path.display());
        info!("Output directory: {}", job.destination_dir().display());
    }
}
