//! # Mozjpeg Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Caricamento della configurazione e verifica dei tool mozjpeg
//! - Dispatch ai due sottocomandi `optimize` ed `exif`
//!
//! ## Flusso di esecuzione (`optimize`):
//! 1. Carica la configurazione (file JSON, `MOZJPEG_DIR`, flag CLI)
//! 2. Verifica che `cjpeg` e `jpegtran` siano presenti ed eseguibili
//! 3. Istanzia `BatchOptimizer` e avvia il batch
//! 4. Con `--strict` l'exit code è non-zero se almeno un file è fallito
//!
//! ## Esempio di utilizzo:
//! ```bash
//! mozjpeg-optimizer optimize ./photos --q 80 --d ./out --verbose
//! mozjpeg-optimizer exif ./photos/IMG_0001.jpg
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mozjpeg_optimizer::{
    json_output::JsonMessage, BatchOptimizer, BatchSummary, Config, MetadataReporter,
    OptimizationRequest, ToolPathResolver,
};

#[derive(Parser)]
#[command(name = "mozjpeg-optimizer")]
#[command(about = "Optimize JPEG images with the mozjpeg tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Optimize a JPEG/BMP file or every supported image in a directory
    Optimize(OptimizeArgs),

    /// Print the metadata of a JPEG file as a table
    Exif {
        /// JPEG file to inspect
        source: PathBuf,
    },
}

#[derive(Args)]
struct OptimizeArgs {
    /// File or directory to optimize (default: current directory)
    source: Option<PathBuf>,

    /// Re-encode with cjpeg at this quality (omit for lossless optimization)
    #[arg(long = "q", allow_negative_numbers = true)]
    quality: Option<i64>,

    /// Output directory (default: optimized or optimized_<q>)
    #[arg(long = "d")]
    dest: Option<PathBuf>,

    /// Directory containing cjpeg and jpegtran
    #[arg(long)]
    tools_dir: Option<PathBuf>,

    /// Emit newline-delimited JSON events instead of text
    #[arg(long)]
    json: bool,

    /// Exit with an error if any file fails
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Optimize(args) => optimize(cli.config.as_deref(), args).await,
        Command::Exif { source } => exif(&source),
    }
}

async fn optimize(config_path: Option<&Path>, args: OptimizeArgs) -> Result<()> {
    let mut config = Config::load(config_path).await?;
    config.apply_tools_dir_override(args.tools_dir);
    config.json_output |= args.json;
    config.strict |= args.strict;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let json_output = config.json_output;
    let strict = config.strict;
    let request = OptimizationRequest {
        source: args.source,
        destination: args.dest,
        quality: args.quality,
    };

    let summary = match run_batch(config, &request).await {
        Ok(summary) => summary,
        Err(e) => {
            if json_output {
                JsonMessage::error(e.to_string()).emit();
            }
            return Err(e.into());
        }
    };

    if strict && !summary.failures().is_empty() {
        anyhow::bail!("{} file(s) failed to optimize", summary.failures().len());
    }
    Ok(())
}

async fn run_batch(
    config: Config,
    request: &OptimizationRequest,
) -> mozjpeg_optimizer::error::Result<BatchSummary> {
    let toolchain = ToolPathResolver::from_config(&config).verify(&config.encoder, &config.transcoder)?;
    debug!("Using {} and {}", toolchain.encoder.display(), toolchain.transcoder.display());

    BatchOptimizer::new(config, toolchain).run(request).await
}

fn exif(source: &Path) -> Result<()> {
    let table = MetadataReporter::new().report(source)?;
    print!("{}", table.render());
    Ok(())
}
