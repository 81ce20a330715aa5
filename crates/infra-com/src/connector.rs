// COM connector
// Binds the automation port to a registered automation server by ProgID

use toolone_core::port::{AutomationResult, ToolAutomation, ToolConnector};
use tracing::info;

/// Connects to the tool through its COM automation server
pub struct ComConnector {
    prog_id: String,
}

impl ComConnector {
    /// # Example
    /// ```text
    /// let connector = ComConnector::new("ToolOneNG.Application");
    /// let session = connector.connect()?;
    /// ```
    pub fn new(prog_id: impl Into<String>) -> Self {
        Self {
            prog_id: prog_id.into(),
        }
    }

    pub fn prog_id(&self) -> &str {
        &self.prog_id
    }
}

impl ToolConnector for ComConnector {
    fn connect(&self) -> AutomationResult<Box<dyn ToolAutomation>> {
        info!(prog_id = %self.prog_id, "Dispatching automation server");

        #[cfg(windows)]
        {
            let session = crate::session::ComSession::attach(&self.prog_id)?;
            Ok(Box::new(session))
        }

        #[cfg(not(windows))]
        {
            tracing::warn!(prog_id = %self.prog_id, "COM automation is only available on Windows");
            Err(toolone_core::port::AutomationError::Unavailable(format!(
                "{}: COM automation is only available on Windows",
                self.prog_id
            )))
        }
    }
}
