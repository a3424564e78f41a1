use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::source::DataSource;

/// Config file picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bioink-dash.json";

/// Where the laboratory sheets live and how the dashboard labels them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory the source files are resolved against.
    pub data_dir: PathBuf,
    /// Per-source file name overrides; absent sources use their default name.
    pub files: BTreeMap<DataSource, String>,
    /// Free-text "last updated" label shown in the sidebar.
    pub last_updated: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: BTreeMap::new(),
            last_updated: None,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        // A relative data_dir is relative to the config file, not the cwd.
        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config)
    }

    /// Full path of the file backing `source`.
    pub fn path_for(&self, source: DataSource) -> PathBuf {
        let name = self
            .files
            .get(&source)
            .map(String::as_str)
            .unwrap_or_else(|| source.default_file_name());
        self.data_dir.join(name)
    }
}

/// Options taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(name = "bioink-dash", version, about)]
pub struct CliArgs {
    /// JSON config file (defaults to `bioink-dash.json` when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the source files are resolved against
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Print the named page as JSON instead of opening a window
    #[arg(long, value_name = "PAGE")]
    pub dump: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration: `--config`, else `bioink-dash.json` in the
    /// working directory when present, else defaults; `--data-dir` overrides.
    pub fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                DashboardConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => DashboardConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = CliArgs::try_parse_from([
            "bioink-dash",
            "--data-dir",
            "lab",
            "--dump",
            "rheology",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("lab")));
        assert_eq!(cli.dump.as_deref(), Some("rheology"));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn no_flags_is_the_default() {
        let cli = CliArgs::try_parse_from(["bioink-dash"]).unwrap();
        assert_eq!(cli, CliArgs::default());
    }

    #[test]
    fn flag_without_value_is_rejected() {
        assert!(CliArgs::try_parse_from(["bioink-dash", "--dump"]).is_err());
        assert!(CliArgs::try_parse_from(["bioink-dash", "--config"]).is_err());
    }

    #[test]
    fn next_flag_is_not_taken_as_a_value() {
        let parsed =
            CliArgs::try_parse_from(["bioink-dash", "--data-dir", "--dump", "rheology"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(CliArgs::try_parse_from(["bioink-dash", "--verbose"]).is_err());
    }

    #[test]
    fn default_file_names_are_used() {
        let config = DashboardConfig {
            data_dir: PathBuf::from("lab"),
            ..Default::default()
        };
        assert_eq!(config.path_for(DataSource::Rheology), PathBuf::from("lab/reo2.xlsx"));
    }

    #[test]
    fn overrides_come_from_json() {
        let json = r#"{ "files": { "viability": "viab.csv" }, "last_updated": "2-02-2026" }"#;
        let config: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.path_for(DataSource::Viability), PathBuf::from("./viab.csv"));
        assert_eq!(config.last_updated.as_deref(), Some("2-02-2026"));
    }
}
