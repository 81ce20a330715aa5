// ToolOne Infrastructure - COM Automation Adapter
// Implements: ToolConnector, ToolAutomation (Windows only)

pub mod connector;
#[cfg(windows)]
mod dispatch;
#[cfg(windows)]
mod session;

pub use connector::ComConnector;
