//! # Platform-specific utilities
//!
//! Questo modulo centralizza l'esecuzione dei tool esterni. Il trait
//! `ToolRunner` è il punto di separazione tra la pipeline e i processi reali:
//! in produzione si usa `SystemRunner` (`tokio::process`), nei test un fake
//! che registra le invocazioni.

use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one external tool invocation
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Exit status plus the tool's own diagnostic text
    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = String::from_utf8_lossy(&self.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        }
    }
}

/// Runs external programs to completion.
///
/// Every call blocks the pipeline until the child exits; there is no timeout.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ToolOutput>;
}

/// Spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ToolOutput> {
        debug!("Running {} {:?}", program.display(), args);

        let start_time = Instant::now();
        let output = Command::new(program).args(args).output().await?;
        debug!("{} finished with {} in {:?}", program.display(), output.status, start_time.elapsed());

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_failure() {
        let output = ToolOutput {
            success: false,
            code: Some(1),
            stdout: Vec::new(),
            stderr: b"Not a JPEG file: starts with 0x42 0x4d\n".to_vec(),
        };
        assert_eq!(
            output.describe_failure(),
            "exit status 1: Not a JPEG file: starts with 0x42 0x4d"
        );

        let killed = ToolOutput { code: None, ..Default::default() };
        assert_eq!(killed.describe_failure(), "terminated by signal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let output = SystemRunner
            .run(Path::new("sh"), &args!["-c", "printf hi; printf oops >&2; exit 3"])
            .await
            .unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, b"hi");
        assert_eq!(output.stderr, b"oops");
    }
}
