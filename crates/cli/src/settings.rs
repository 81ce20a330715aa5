// CLI settings: optional TOML file overlaid by TOOLONE_* environment variables

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use toolone_core::domain::ToolConfig;

pub const DEFAULT_CONFIG_PATH: &str = "toolone.toml";
pub const DEFAULT_LOG_FILE: &str = "example.log";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// ```toml
/// log_file = "~/toolone/automation.log"
/// log_format = "json"
///
/// [tool]
/// process_name = "ToolOne.exe"
/// recorder_index = 0
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tool: ToolConfig,
    pub log_file: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: ToolConfig::default(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load settings; the file is only required when given explicitly
    ///
    /// Environment keys: `TOOLONE_LOG_FILE`, `TOOLONE_LOG_FORMAT`,
    /// `TOOLONE_TOOL__<FIELD>` (e.g. `TOOLONE_TOOL__PROCESS_NAME`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let required = path.is_some();
        let path = shellexpand::tilde(path.unwrap_or(DEFAULT_CONFIG_PATH)).into_owned();

        let mut settings: Settings = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("TOOLONE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {path}"))?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.log_file = shellexpand::tilde(&settings.log_file).into_owned();
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::default();

        assert_eq!(settings.log_file, "example.log");
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert_eq!(settings.tool, ToolConfig::default());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_file = "tool.log"
log_format = "json"

[tool]
process_name = "ToolOneNG.exe"
recorder_index = 2
window_visible = false
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path().to_str().unwrap())).unwrap();

        assert_eq!(settings.log_file, "tool.log");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.tool.process_name, "ToolOneNG.exe");
        assert_eq!(settings.tool.recorder_index, 2);
        assert!(!settings.tool.window_visible);
        // Unset fields keep their defaults
        assert_eq!(settings.tool.prog_id, "ToolOneNG.Application");
        assert_eq!(settings.tool.platform_index, 0);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let result = Settings::load(Some(missing.to_str().unwrap()));

        assert!(result.is_err());
    }
}
