//! Model-checking engine seam
//!
//! The engine is an external process: it receives the generated module file
//! as its only argument and prints one `-- specification` line per clause.
//! [`ModelChecker`] abstracts the call so the pipeline can run against any
//! NuSMV-compatible executable, or a canned transcript in tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::{Error, Result};

/// Default engine executable, looked up on `PATH`
pub const DEFAULT_ENGINE: &str = "NuSMV";

/// Default location of the generated module file
pub const DEFAULT_MODULE_PATH: &str = "nusmv.smv";

/// Where the engine lives and where the module is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub executable: PathBuf,
    pub module_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            executable: PathBuf::from(DEFAULT_ENGINE),
            module_path: PathBuf::from(DEFAULT_MODULE_PATH),
        }
    }
}

impl EngineConfig {
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_module_path(mut self, module_path: impl Into<PathBuf>) -> Self {
        self.module_path = module_path.into();
        self
    }
}

/// Anything that can model-check a module file
pub trait ModelChecker {
    /// Check the module at `module` and return the engine's stdout lines
    ///
    /// Blocks until the engine finishes; no timeout is imposed here.
    fn check(&self, module: &Path) -> Result<Vec<String>>;
}

/// NuSMV invoked as a child process
#[derive(Debug, Clone)]
pub struct NuSmv {
    executable: PathBuf,
}

impl NuSmv {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        NuSmv {
            executable: executable.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.executable.clone())
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Default for NuSmv {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl ModelChecker for NuSmv {
    fn check(&self, module: &Path) -> Result<Vec<String>> {
        info!(
            engine = %self.executable.display(),
            module = %module.display(),
            "invoking model checker"
        );

        let output = Command::new(&self.executable)
            .arg(module)
            .output()
            .map_err(|e| {
                Error::EngineInvocationError(format!(
                    "failed to run '{}': {}",
                    self.executable.display(),
                    e
                ))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::EngineInvocationError(format!(
                "'{}' exited with {}: {}",
                self.executable.display(),
                output.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            warn!(engine = %self.executable.display(), stderr = %stderr.trim(), "engine wrote to stderr");
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// Write module text to `path`, replacing any previous file
pub fn write_module(path: &Path, module: &str) -> Result<()> {
    fs::write(path, module)?;
    info!(path = %path.display(), bytes = module.len(), "wrote module");
    Ok(())
}
