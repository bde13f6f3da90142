//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con i parametri dei tool esterni
//! - Fornisce validazione dei parametri
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Applica gli override da variabili d'ambiente (`MOZJPEG_DIR`)
//!
//! ## Parametri di configurazione:
//! - `tools_dir`: Directory di installazione di mozjpeg (default: `/opt/mozjpeg/bin`)
//! - `encoder` / `transcoder`: Nomi dei binari (default: `cjpeg` / `jpegtran`)
//! - `search_path`: Cerca i tool anche nel `PATH` (default: true)
//! - `reencode_quality`: Qualità usata per ricodificare formati non JPEG (default: 100)
//! - `json_output`: Output JSON line-delimited (default: false)
//! - `strict`: Exit code non-zero se almeno un file fallisce (default: false)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     tools_dir: PathBuf::from("/usr/local/opt/mozjpeg/bin"),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding `tools_dir`
pub const TOOLS_DIR_ENV: &str = "MOZJPEG_DIR";

/// Configuration for the optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the mozjpeg binaries
    pub tools_dir: PathBuf,
    /// Encoder binary name
    pub encoder: String,
    /// Lossless transcoder binary name
    pub transcoder: String,
    /// Fall back to the system PATH when a tool is not in `tools_dir`
    pub search_path: bool,
    /// Quality used when a non-JPEG source is encoded without an override
    pub reencode_quality: u32,
    /// Output progress and results as JSON for programmatic use
    pub json_output: bool,
    /// Exit non-zero when any file in a batch fails
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools_dir: PathBuf::from("/opt/mozjpeg/bin"),
            encoder: "cjpeg".to_string(),
            transcoder: "jpegtran".to_string(),
            search_path: true,
            reencode_quality: 100,
            json_output: false,
            strict: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.encoder.trim().is_empty() {
            return Err(anyhow::anyhow!("Encoder tool name must not be empty"));
        }

        if self.transcoder.trim().is_empty() {
            return Err(anyhow::anyhow!("Transcoder tool name must not be empty"));
        }

        if self.reencode_quality > 100 {
            return Err(anyhow::anyhow!("Re-encode quality must be between 0 and 100"));
        }

        Ok(())
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mozjpeg-optimizer").join("config.json"))
    }

    /// Load configuration from file, defaults if it does not exist
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit file if given, otherwise the default location,
    /// then apply environment overrides
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(anyhow::anyhow!("Config file does not exist: {}", path.display()));
                }
                Self::from_file(path).await?
            }
            None => match Self::default_path() {
                Some(path) => Self::from_file(&path).await?,
                None => Self::default(),
            },
        };

        if let Some(dir) = std::env::var_os(TOOLS_DIR_ENV) {
            config.apply_tools_dir_override(Some(PathBuf::from(dir)));
        }

        Ok(config)
    }

    /// Replace `tools_dir` when an override is present
    pub fn apply_tools_dir_override(&mut self, tools_dir: Option<PathBuf>) {
        if let Some(dir) = tools_dir {
            debug!("tools_dir overridden: {}", dir.display());
            self.tools_dir = dir;
        }
    }
}
