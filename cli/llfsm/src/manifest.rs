//! `llfsm.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name searched for when locating a project.
pub const MANIFEST_FILE: &str = "llfsm.toml";

/// The top-level manifest structure for an LLFSM project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlfsmManifest {
    /// Project metadata.
    #[serde(default)]
    pub project: Option<ProjectConfig>,
    /// Arrangement conversion settings.
    #[serde(default)]
    pub arrangement: ArrangementConfig,
    /// JSON output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArrangementConfig {
    /// Directory machine reference paths are resolved against, relative to
    /// the manifest directory.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON written by `--output`.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter, used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LlfsmManifest {
    /// Search upward from `start_dir` for an `llfsm.toml` file, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: LlfsmManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing llfsm.toml")
    }

    /// The configured arrangement base directory, resolved against `project_dir`.
    pub fn base_dir(&self, project_dir: &Path) -> Option<PathBuf> {
        self.arrangement
            .base_dir
            .as_ref()
            .map(|dir| project_dir.join(dir))
    }

    pub fn log_filter(&self) -> Option<&str> {
        self.log.filter.as_deref()
    }
}
