// Tool Configuration

use serde::Deserialize;

/// Automation ProgID registered by the tool
pub const DEFAULT_PROG_ID: &str = "ToolOneNG.Application";

/// Executable name matched (exactly) by the shutdown fallback
pub const DEFAULT_PROCESS_NAME: &str = "ToolOne.exe";

/// Settings fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// ProgID used to reach the automation server
    pub prog_id: String,
    /// Process name killed when a graceful quit fails
    pub process_name: String,
    /// Whether the tool's main window is shown after connecting
    pub window_visible: bool,
    /// Recorder addressed by all recording operations
    pub recorder_index: usize,
    /// Platform addressed by load/unload/start/stop/pause
    pub platform_index: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            prog_id: DEFAULT_PROG_ID.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            window_visible: true,
            recorder_index: 0,
            platform_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.prog_id, "ToolOneNG.Application");
        assert_eq!(config.process_name, "ToolOne.exe");
        assert!(config.window_visible);
        assert_eq!(config.recorder_index, 0);
        assert_eq!(config.platform_index, 0);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ToolConfig =
            serde_json::from_str(r#"{"window_visible": false, "process_name": "Other.exe"}"#)
                .unwrap();

        assert!(!config.window_visible);
        assert_eq!(config.process_name, "Other.exe");
        assert_eq!(config.prog_id, DEFAULT_PROG_ID);
    }
}
