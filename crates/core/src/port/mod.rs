// Port Layer - Interfaces for external dependencies

pub mod automation;
pub mod process;

// Re-exports
pub use automation::{AutomationError, AutomationResult, ToolAutomation, ToolConnector};
pub use process::{ProcessError, ProcessKiller};
