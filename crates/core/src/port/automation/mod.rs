// Tool Automation Port
// Abstraction over the vendor's automation object model ("ToolOneNG.Application")

pub mod mocks;

use crate::domain::{
    CalibrationState, ProjectInfo, RealTimeApplicationInfo, SignalRef, StartRecordingOptions,
    TriggerRuleRef,
};
use thiserror::Error;

/// Failures raised by the automation server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomationError {
    #[error("Automation server unavailable: {0}")]
    Unavailable(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid tool state: {0}")]
    InvalidState(String),

    #[error("Call to {member} failed: {message}")]
    Call { member: String, message: String },
}

impl AutomationError {
    pub fn call(member: impl Into<String>, message: impl Into<String>) -> Self {
        AutomationError::Call {
            member: member.into(),
            message: message.into(),
        }
    }
}

pub type AutomationResult<T> = std::result::Result<T, AutomationError>;

/// One live session with the tool
///
/// Each method maps onto a single property or method of the object model.
/// Calls block until the server answers. Implementations are not required
/// to be `Send`: COM objects live in the apartment that created them.
pub trait ToolAutomation {
    // Application

    /// `MainWindow.Visible = visible`
    fn set_main_window_visible(&self, visible: bool) -> AutomationResult<()>;

    /// `Version`
    fn version(&self) -> AutomationResult<String>;

    /// `Quit(save_changes)`
    fn quit(&self, save_changes: bool) -> AutomationResult<()>;

    // Project

    /// `ActiveProject` (`None` when no project is open)
    fn active_project(&self) -> AutomationResult<Option<ProjectInfo>>;

    /// `OpenProject(path)`
    fn open_project(&self, path: &str) -> AutomationResult<()>;

    /// `ActiveProject.Save()`
    fn save_project(&self) -> AutomationResult<()>;

    /// `ActiveProject.Close(SaveChanges)`
    fn close_project(&self, save_changes: bool) -> AutomationResult<()>;

    // Experiment

    /// `ActiveExperiment.Name` (`None` when no experiment is active)
    fn active_experiment_name(&self) -> AutomationResult<Option<String>>;

    /// `ActiveProject.Experiments[name].Activate()`
    fn activate_experiment(&self, name: &str) -> AutomationResult<()>;

    // Online calibration

    /// `CalibrationManagement.State`
    fn calibration_state(&self) -> AutomationResult<CalibrationState>;

    /// `CalibrationManagement.StartOnlineCalibration()`
    fn start_online_calibration(&self) -> AutomationResult<()>;

    /// `CalibrationManagement.StopOnlineCalibration()`
    fn stop_online_calibration(&self) -> AutomationResult<()>;

    // Measurement

    /// `MeasurementDataManagement.IsMeasuring`
    fn is_measuring(&self) -> AutomationResult<bool>;

    /// `MeasurementDataManagement.Start()`
    fn start_measuring(&self) -> AutomationResult<()>;

    /// `MeasurementDataManagement.Stop()`
    fn stop_measuring(&self) -> AutomationResult<()>;

    // Platform management

    /// `PlatformManagement.Platforms[platform].RealTimeApplications.Contains(name)`
    fn platform_contains_application(
        &self,
        platform: usize,
        application_name: &str,
    ) -> AutomationResult<bool>;

    /// `PlatformManagement.Platforms[platform].LoadRealtimeApplication(path)`
    fn load_realtime_application(&self, platform: usize, path: &str) -> AutomationResult<()>;

    // Real-time applications of the active experiment

    /// `ActiveExperiment.Platforms.Count`
    fn experiment_platform_count(&self) -> AutomationResult<usize>;

    /// `ActiveExperiment.Platforms[platform].RealTimeApplication` (`None` when nothing is assigned)
    fn realtime_application(
        &self,
        platform: usize,
    ) -> AutomationResult<Option<RealTimeApplicationInfo>>;

    /// `...RealTimeApplication.Unload()`
    fn unload_realtime_application(&self, platform: usize) -> AutomationResult<()>;

    /// `...RealTimeApplication.Start()`
    fn start_realtime_application(&self, platform: usize) -> AutomationResult<()>;

    /// `...RealTimeApplication.Stop()`
    fn stop_realtime_application(&self, platform: usize) -> AutomationResult<()>;

    /// `...RealTimeApplication.Pause()`
    fn pause_realtime_application(&self, platform: usize) -> AutomationResult<()>;

    // Recorders

    /// `MeasurementDataManagement.Recorders[recorder].Name`
    fn recorder_name(&self, recorder: usize) -> AutomationResult<String>;

    /// `Recorders[recorder].StartCondition.Enabled = enabled`
    fn set_start_condition_enabled(&self, recorder: usize, enabled: bool)
        -> AutomationResult<()>;

    /// `MeasurementDataManagement.TriggerRules[name]`
    fn trigger_rule(&self, name: &str) -> AutomationResult<TriggerRuleRef>;

    /// `Recorders[recorder].StartCondition.Trigger = trigger`
    fn set_start_condition_trigger(
        &self,
        recorder: usize,
        trigger: &TriggerRuleRef,
    ) -> AutomationResult<()>;

    /// `Recorders[recorder].Start(WithTrigger, OverwriteExisting)`
    fn start_recorder(&self, recorder: usize, options: StartRecordingOptions)
        -> AutomationResult<()>;

    /// `Recorders[recorder].Stop()`
    fn stop_recorder(&self, recorder: usize) -> AutomationResult<()>;

    /// `Recorders[recorder].LastRecordedFiles`
    fn last_recorded_files(&self, recorder: usize) -> AutomationResult<Vec<String>>;

    /// `MeasurementConfiguration.Signals.Add(name)`
    fn add_measurement_signal(&self, name: &str) -> AutomationResult<SignalRef>;

    /// `Recorders[recorder].Signals.Insert(signal)`
    fn insert_recorder_signal(&self, recorder: usize, signal: &SignalRef)
        -> AutomationResult<()>;
}

/// Factory for tool sessions
///
/// Implementations:
/// - ComConnector: dispatches to a running "ToolOneNG.Application" (Windows)
/// - MockConnector: in-memory simulated tool (tests, `--simulate`)
pub trait ToolConnector: Send + Sync {
    /// Attach to (or launch) the tool
    ///
    /// # Errors
    /// - AutomationError::Unavailable if the automation server cannot be reached
    fn connect(&self) -> AutomationResult<Box<dyn ToolAutomation>>;
}
