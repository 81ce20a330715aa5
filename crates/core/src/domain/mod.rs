// Domain Layer - Tool state, recording references and configuration

pub mod config;
pub mod operation;
pub mod recording;
pub mod signals;
pub mod state;

// Re-exports
pub use config::ToolConfig;
pub use operation::Operation;
pub use recording::{SignalRef, StartRecordingOptions, TestRunPlan, TriggerRuleRef};
pub use signals::SignalList;
pub use state::{
    application_name_from_path, ApplicationState, CalibrationState, ProjectInfo,
    RealTimeApplicationInfo,
};
