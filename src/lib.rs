//! # Mozjpeg Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione (file JSON, variabili d'ambiente)
//! - `error`: Tipi di errore custom
//! - `tool_resolver`: Ricerca di `cjpeg` e `jpegtran`
//! - `platform`: Esecuzione dei subprocess (`ToolRunner`)
//! - `file_manager`: Rilevamento formato, discovery e formattazione dimensioni
//! - `image_processor`: Pipeline encode → transcode per singola immagine
//! - `optimizer`: Orchestratore del comando `optimize`
//! - `progress` / `json_output`: Statistiche e output
//! - `metadata`: Comando `exif`
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use mozjpeg_optimizer::{BatchOptimizer, Config, OptimizationRequest, ToolPathResolver};
//!
//! let config = Config::default();
//! let toolchain = ToolPathResolver::from_config(&config).verify(&config.encoder, &config.transcoder)?;
//! let summary = BatchOptimizer::new(config, toolchain).run(&OptimizationRequest::default()).await?;
//! ```

#[macro_use]
pub mod utils;

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod metadata;
pub mod optimizer;
pub mod platform;
pub mod progress;
pub mod tool_resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::OptimizeError;
pub use image_processor::{ImageProcessor, Quality};
pub use metadata::{ExifMetadataReader, MetadataReporter, MetadataTable};
pub use optimizer::{BatchOptimizer, OptimizationRequest};
pub use progress::BatchSummary;
pub use tool_resolver::{ToolPathResolver, Toolchain};
