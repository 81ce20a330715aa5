// ToolOne Core - Controller Logic & Ports
// NO infrastructure dependencies (hexagonal architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::ToolOneControl;
pub use error::{ControlError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
