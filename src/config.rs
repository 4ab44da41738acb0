//! Configuration for the funnel tool.
//!
//! Settings are read from `.funnel/funnel.toml` in the project directory and
//! layered file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [export]
//! file_name = "funnel-export.csv"
//!
//! [view]
//! columns = ["phoneNumber", "city", "persona", "sortingStage"]
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::record::fields;

/// Directory holding per-project funnel settings.
pub const FUNNEL_DIR: &str = ".funnel";

/// Config file name inside [`FUNNEL_DIR`].
pub const CONFIG_FILE: &str = "funnel.toml";

/// Environment override for the export file name.
pub const EXPORT_FILE_ENV: &str = "FUNNEL_EXPORT_FILE";

/// Environment override for the log filter.
pub const LOG_ENV: &str = "FUNNEL_LOG";

/// Export target name that selects standard output.
pub const STDOUT_TARGET: &str = "-";

/// Where `funnel export` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Stdout,
    File(PathBuf),
}

impl std::fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportTarget::Stdout => f.write_str("stdout"),
            ExportTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// CSV export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// File written by `funnel export` when no `--output` is given
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

fn default_export_file_name() -> String {
    "funnel-export.csv".to_string()
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            file_name: default_export_file_name(),
        }
    }
}

/// Table view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSection {
    /// Record fields printed by `funnel view`, in order
    #[serde(default = "default_view_columns")]
    pub columns: Vec<String>,
}

fn default_view_columns() -> Vec<String> {
    [
        fields::PHONE_NUMBER,
        fields::CITY,
        fields::PERSONA,
        fields::SOURCE,
        fields::ACTIVITY_TYPE,
        fields::SORTING_STAGE,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            columns: default_view_columns(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// `tracing` filter directive, e.g. "info" or "funnel=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// The complete funnel.toml structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FunnelToml {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub view: ViewSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl FunnelToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse funnel.toml")
    }

    /// The bottom layer. Sections or keys missing from the file, or the whole
    /// file, fall back to built-in defaults.
    pub fn load_or_default(funnel_dir: &Path) -> Result<Self> {
        let config_path = funnel_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    /// Written by `funnel config init` with every default spelled out.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize funnel.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Problems worth reporting from `funnel config validate`. None of them
    /// stop a command from running.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.export.file_name.trim().is_empty() {
            warnings.push("export.file_name is empty".to_string());
        } else if !self.export.file_name.ends_with(".csv") {
            warnings.push(format!(
                "export.file_name '{}' does not end in .csv",
                self.export.file_name
            ));
        }

        if self.view.columns.is_empty() {
            warnings.push("view.columns is empty; the table will have no columns".to_string());
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            warnings.push(format!(
                "Invalid logging.level '{}': not a valid tracing filter",
                self.logging.level
            ));
        }

        warnings
    }
}

/// Resolved configuration for one invocation. Each getter applies the
/// layering itself, so later layers win only for the setting they name.
#[derive(Debug, Clone)]
pub struct FunnelConfig {
    pub project_dir: PathBuf,
    pub funnel_dir: PathBuf,
    pub toml: FunnelToml,
    /// CLI override: verbose logging
    pub verbose: bool,
    /// CLI override for the export path
    pub cli_output: Option<PathBuf>,
}

impl FunnelConfig {
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let funnel_dir = project_dir.join(FUNNEL_DIR);
        let toml = FunnelToml::load_or_default(&funnel_dir)?;

        Ok(Self {
            project_dir,
            funnel_dir,
            toml,
            verbose: false,
            cli_output: None,
        })
    }

    pub fn with_cli_args(
        project_dir: PathBuf,
        verbose: bool,
        output: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.verbose = verbose;
        config.cli_output = output;
        Ok(config)
    }

    pub fn config_path(&self) -> PathBuf {
        self.funnel_dir.join(CONFIG_FILE)
    }

    /// Export destination (CLI → env → file). `-` at any layer means stdout;
    /// relative paths resolve against the project directory.
    pub fn export_target(&self) -> ExportTarget {
        let path = self
            .cli_output
            .clone()
            .or_else(|| std::env::var(EXPORT_FILE_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(&self.toml.export.file_name));
        if path == Path::new(STDOUT_TARGET) {
            ExportTarget::Stdout
        } else if path.is_absolute() {
            ExportTarget::File(path)
        } else {
            ExportTarget::File(self.project_dir.join(path))
        }
    }

    /// Log filter (verbose flag → env → file).
    pub fn log_filter(&self) -> String {
        if self.verbose {
            return "debug".to_string();
        }
        std::env::var(LOG_ENV).unwrap_or_else(|_| self.toml.logging.level.clone())
    }

    pub fn view_columns(&self) -> &[String] {
        &self.toml.view.columns
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
