//! # Tool Path Resolver
//!
//! This module handles finding the mozjpeg binaries:
//! - The configured installation directory (`/opt/mozjpeg/bin` by default,
//!   `MOZJPEG_DIR` or `--tools-dir` override it)
//! - System-installed tools on the `PATH`

use crate::config::Config;
use crate::error::{OptimizeError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolved, verified paths of the two external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub encoder: PathBuf,
    pub transcoder: PathBuf,
}

/// Tool path resolver
pub struct ToolPathResolver {
    tools_dir: PathBuf,
    search_path: bool,
}

impl ToolPathResolver {
    /// Create a new path resolver
    pub fn new(tools_dir: impl Into<PathBuf>, search_path: bool) -> Self {
        Self {
            tools_dir: tools_dir.into(),
            search_path,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tools_dir.clone(), config.search_path)
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Option<PathBuf> {
        debug!("Resolving tool: {} (tools dir: {:?})", tool_name, self.tools_dir);

        let bundled_path = self.tools_dir.join(Self::executable_name(tool_name));
        if Self::is_executable(&bundled_path) {
            debug!("Using installed tool: {} -> {:?}", tool_name, bundled_path);
            return Some(bundled_path);
        }
        debug!("Not usable: {:?}", bundled_path);

        if self.search_path {
            if let Some(system_path) = self.find_in_system_path(tool_name) {
                debug!("Using system tool as fallback: {} -> {:?}", tool_name, system_path);
                return Some(system_path);
            }
        }

        warn!("Tool not found: {}", tool_name);
        None
    }

    /// Find tool in system PATH
    fn find_in_system_path(&self, tool_name: &str) -> Option<PathBuf> {
        let executable = Self::executable_name(tool_name);
        let path_var = env::var_os("PATH")?;

        env::split_paths(&path_var)
            .map(|dir| dir.join(&executable))
            .find(|path| Self::is_executable(path))
    }

    fn executable_name(tool_name: &str) -> String {
        let extension = if cfg!(windows) { ".exe" } else { "" };
        format!("{}{}", tool_name, extension)
    }

    /// A regular file with an execute bit
    pub fn is_executable(path: &Path) -> bool {
        let Ok(metadata) = std::fs::metadata(path) else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }

    /// Check both tools and return their paths.
    ///
    /// All missing tools are reported in one error so the user can fix them
    /// in a single pass.
    pub fn verify(&self, encoder: &str, transcoder: &str) -> Result<Toolchain> {
        let mut missing_messages = Vec::new();

        let encoder_path = self.check_tool_with_instructions(encoder);
        let transcoder_path = self.check_tool_with_instructions(transcoder);

        if let Err(msg) = &encoder_path {
            missing_messages.push(msg.clone());
        }
        if let Err(msg) = &transcoder_path {
            missing_messages.push(msg.clone());
        }

        match (encoder_path, transcoder_path) {
            (Ok(encoder), Ok(transcoder)) => Ok(Toolchain { encoder, transcoder }),
            _ => Err(OptimizeError::ToolNotFound(missing_messages.join("\n"))),
        }
    }

    /// Check if a tool is available and provide installation instructions if not
    pub fn check_tool_with_instructions(&self, tool_name: &str) -> std::result::Result<PathBuf, String> {
        if let Some(path) = self.resolve_tool(tool_name) {
            return Ok(path);
        }

        let mut message = format!(
            "'{}' not found or not executable in {}",
            tool_name,
            self.tools_dir.display()
        );
        if self.search_path {
            message.push_str(" or in PATH");
        }
        message.push_str(&format!(". {}", Self::install_instructions(tool_name)));
        Err(message)
    }

    fn install_instructions(tool_name: &str) -> String {
        match tool_name {
            "cjpeg" | "jpegtran" => format!(
                "Build mozjpeg (https://github.com/mozilla/mozjpeg) into /opt/mozjpeg, \
                 or set {} to the directory containing {}",
                crate::config::TOOLS_DIR_ENV,
                tool_name
            ),
            _ => format!("Install {} or point --tools-dir at it", tool_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn install_fake_tool(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_verify_finds_both_tools() {
        let dir = TempDir::new().unwrap();
        let cjpeg = install_fake_tool(dir.path(), "cjpeg", 0o755);
        let jpegtran = install_fake_tool(dir.path(), "jpegtran", 0o755);

        let resolver = ToolPathResolver::new(dir.path(), false);
        let toolchain = resolver.verify("cjpeg", "jpegtran").unwrap();
        assert_eq!(toolchain.encoder, cjpeg);
        assert_eq!(toolchain.transcoder, jpegtran);
    }

    #[cfg(unix)]
    #[test]
    fn test_verify_rejects_non_executable() {
        let dir = TempDir::new().unwrap();
        install_fake_tool(dir.path(), "cjpeg", 0o755);
        install_fake_tool(dir.path(), "jpegtran", 0o644);

        let resolver = ToolPathResolver::new(dir.path(), false);
        match resolver.verify("cjpeg", "jpegtran") {
            Err(OptimizeError::ToolNotFound(msg)) => {
                assert!(msg.contains("jpegtran"));
                assert!(!msg.contains("'cjpeg'"));
            }
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_reports_every_missing_tool() {
        let dir = TempDir::new().unwrap();
        let resolver = ToolPathResolver::new(dir.path(), false);

        let err = resolver.verify("cjpeg", "jpegtran").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'cjpeg'"));
        assert!(msg.contains("'jpegtran'"));
        assert!(msg.contains("MOZJPEG_DIR"));
    }

    #[test]
    fn test_directory_is_not_a_tool() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("cjpeg")).unwrap();
        assert!(!ToolPathResolver::is_executable(&dir.path().join("cjpeg")));
    }
}
