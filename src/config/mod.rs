//! Configuration for the feature pipeline.
//!
//! Paths default to the shelter outcome project layout, with the project root
//! picked from the host operating system.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::writer::OutputFormat;

/// Default batch size for CSV reading
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Environment variable overriding the batch size
pub const BATCH_SIZE_ENV: &str = "SHELTER_BATCH_SIZE";

/// Column names the pipeline reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Row identifier, written as the first output column
    pub index: String,
    /// Free-text age description such as "2 years"
    pub age: String,
    /// Breed description
    pub breed: String,
    /// Derived age in months
    pub age_months: String,
    /// Derived purity flag
    pub pure: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            index: "AnimalID".to_string(),
            age: "AgeuponOutcome".to_string(),
            breed: "Breed".to_string(),
            age_months: "age_months".to_string(),
            pure: "Pure".to_string(),
        }
    }
}

/// Configuration for the `FeaturePipeline`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Project root on macOS
    pub mac_root: PathBuf,
    /// Project root on Linux
    pub linux_root: PathBuf,
    /// Explicit root, used instead of the platform root when set
    pub root: Option<PathBuf>,
    /// Sub-project directory under the root
    pub subproject: String,
    /// Input CSV, relative to the project directory unless absolute
    pub input: PathBuf,
    /// Output file, relative to the project directory unless absolute
    pub output: PathBuf,
    /// Output format; inferred from the output extension when unset
    pub format: Option<OutputFormat>,
    /// Keep rows that carry no age description instead of dropping them
    pub keep_missing_age: bool,
    /// Rows per record batch
    pub batch_size: usize,
    /// Column names
    pub columns: ColumnNames,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            mac_root: PathBuf::from("/Users/rocket/projects/datarobot"),
            linux_root: PathBuf::from("/home/luna/projects/datarobot"),
            root: None,
            subproject: "ShelterAnimalOutcome".to_string(),
            input: PathBuf::from("Data/train.csv"),
            output: PathBuf::from("Data/train2.csv"),
            format: None,
            keep_missing_age: false,
            batch_size: DEFAULT_BATCH_SIZE,
            columns: ColumnNames::default(),
        }
    }
}

impl FeatureConfig {
    /// Load a configuration from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Root directory for the given operating system name
    pub fn root_for_os(&self, os: &str) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        match os {
            "macos" => Ok(self.mac_root.clone()),
            "linux" => Ok(self.linux_root.clone()),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Project directory on the host operating system
    pub fn project_dir(&self) -> Result<PathBuf> {
        self.project_dir_for_os(std::env::consts::OS)
    }

    fn project_dir_for_os(&self, os: &str) -> Result<PathBuf> {
        Ok(self.root_for_os(os)?.join(&self.subproject))
    }

    /// Resolved input path
    pub fn input_path(&self) -> Result<PathBuf> {
        self.resolve_for_os(&self.input, std::env::consts::OS)
    }

    /// Resolved output path
    pub fn output_path(&self) -> Result<PathBuf> {
        self.resolve_for_os(&self.output, std::env::consts::OS)
    }

    // Absolute paths never need a project root, so they work on any platform.
    fn resolve_for_os(&self, relative: &Path, os: &str) -> Result<PathBuf> {
        if relative.is_absolute() {
            return Ok(relative.to_path_buf());
        }
        Ok(self.project_dir_for_os(os)?.join(relative))
    }

    /// Output format, explicit or inferred from the output path
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::from_path(&self.output))
    }

    /// Batch size, honouring the `SHELTER_BATCH_SIZE` override
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        std::env::var(BATCH_SIZE_ENV)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(self.batch_size)
            .max(1)
    }
}
