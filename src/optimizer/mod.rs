//! # Optimizer Module
//!
//! Modulo che separa le responsabilità del comando `optimize` in sottomoduli:
//! - `batch_optimizer`: Orchestratore principale
//! - `job`: Validazione della richiesta (qualità, destinazione, sorgente)
//! - `path_resolver`: Logica di calcolo path centralizzata
//! - `task_optimizer`: Worker per singoli file
//! - `progress_tracker`: Gestione progress unificata (testo o JSON)

pub mod batch_optimizer;
pub mod job;
pub mod path_resolver;
pub mod progress_tracker;
pub mod task_optimizer;

pub use batch_optimizer::BatchOptimizer;
pub use job::{OptimizationJob, OptimizationRequest};
pub use path_resolver::{PathResolver, SourceKind, SourceSpec};
pub use progress_tracker::ProgressTracker;
pub use task_optimizer::TaskOptimizer;
