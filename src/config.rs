use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::placement::PlacerKind;

/// A cell generation job, as read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobConfig {
    /// Name used for output artifacts. Defaults to the placement file stem.
    #[serde(default)]
    pub name: Option<String>,
    /// Technology file (TOML).
    pub tech: PathBuf,
    /// Single-row placement file (JSON).
    pub placement: PathBuf,
    /// Requested number of fold levels.
    pub height: usize,
    #[serde(default)]
    pub placer: PlacerKind,
}

impl JobConfig {
    /// The artifact name of this job.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.placement
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cell".to_string())
        })
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        self.tech = base.join(&self.tech);
        self.placement = base.join(&self.placement);
        self
    }
}

/// Reads a job file. Relative paths inside it are resolved against the
/// directory containing the file.
pub fn parse_job_config(path: impl AsRef<Path>) -> Result<JobConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let data: JobConfig = toml::from_str(&contents)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(data.resolve_paths(base))
}
