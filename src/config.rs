//! Configuration for langrepo

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment toggle forcing a rebuild of every media output.
pub const UPDATE_ALL_VAR: &str = "UPDATE_ALL";

/// File names looked up under the data directory when no explicit path is
/// configured.
const DEFAULT_REGISTRY_FILE: &str = "AIATSIS-geography.xlsx";
const DEFAULT_GEOJSON_FILE: &str = "gambay-languages.geojson";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Main configuration for a repository build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the input tree: geography sources plus one folder per
    /// language word list
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Root of the output tree; the repository is built under
    /// `<dist_dir>/repository`
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    /// Authoritative registry workbook (defaults to
    /// `<data_dir>/AIATSIS-geography.xlsx`)
    #[serde(default)]
    pub registry_file: Option<PathBuf>,
    /// Community geojson (defaults to `<data_dir>/gambay-languages.geojson`)
    #[serde(default)]
    pub geojson_file: Option<PathBuf>,
    /// Transcoding configuration
    #[serde(default)]
    pub transcode: TranscodeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            dist_dir: default_dist_dir(),
            registry_file: None,
            geojson_file: None,
            transcode: TranscodeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass rather than playing whack-a-mole.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.data_dir.as_os_str().is_empty() {
            errors.push("data_dir must not be empty".to_string());
        }
        if self.dist_dir.as_os_str().is_empty() {
            errors.push("dist_dir must not be empty".to_string());
        }
        if self.transcode.tool.is_empty() {
            errors.push("transcode tool must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }

    /// Pick up environment overrides. `UPDATE_ALL=true` forces every media
    /// output to be rebuilt regardless of what already exists.
    pub fn apply_env(&mut self) {
        if std::env::var(UPDATE_ALL_VAR).as_deref() == Ok("true") {
            self.transcode.force_rebuild = true;
        }
    }

    /// Registry workbook path, configured or defaulted under the data dir.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_REGISTRY_FILE))
    }

    /// Community geojson path, configured or defaulted under the data dir.
    pub fn geojson_path(&self) -> PathBuf {
        self.geojson_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_GEOJSON_FILE))
    }
}

/// Transcoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeConfig {
    /// External transcoder binary
    pub tool: String,
    /// Rebuild outputs that already exist
    #[serde(default)]
    pub force_rebuild: bool,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            tool: crate::repository::transcode::DEFAULT_TOOL.to_string(),
            force_rebuild: false,
        }
    }
}
