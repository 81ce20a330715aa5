// Application Layer - Controller and use cases

pub mod control;
pub mod signals;

// Re-exports
pub use control::ToolOneControl;
pub use signals::read_signal_file;
