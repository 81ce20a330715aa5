// ToolOne Controller - one live automation session plus its lifecycle
//
// Every operation logs what it is about to do, forwards to the automation
// port, and on failure logs and returns the error unchanged. The only local
// recovery is the process kill when a graceful quit fails.

mod platform;
mod recording;


use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::application::signals::read_signal_file;
use crate::domain::{CalibrationState, Operation, SignalList, ToolConfig};
use crate::error::{ControlError, Result};
use crate::port::{
    AutomationError, AutomationResult, ProcessKiller, ToolAutomation, ToolConnector,
};

/// Automation controller for one ToolOne instance
///
/// Owns exactly one session handle. Guard-then-act operations (open
/// project, activate experiment, start/stop calibration, load application)
/// read remote state and then act; another client mutating the tool in
/// between is not detected.
pub struct ToolOneControl {
    connector: Arc<dyn ToolConnector>,
    process_killer: Arc<dyn ProcessKiller>,
    config: ToolConfig,
    tool: Box<dyn ToolAutomation>,
    signals: SignalList,
}

impl ToolOneControl {
    /// Connect to the tool and apply the configured window visibility
    ///
    /// # Errors
    /// - ControlError::Connection if the automation server cannot be reached
    ///
    /// # Example
    /// ```text
    /// let control = ToolOneControl::connect(
    ///     Arc::new(ComConnector::new(DEFAULT_PROG_ID)),
    ///     Arc::new(SysinfoProcessKiller::new()),
    ///     ToolConfig::default(),
    /// )?;
    /// control.open_project(r"C:\projects\demo.CDP")?;
    /// ```
    pub fn connect(
        connector: Arc<dyn ToolConnector>,
        process_killer: Arc<dyn ProcessKiller>,
        config: ToolConfig,
    ) -> Result<Self> {
        info!(prog_id = %config.prog_id, "Connecting to ToolOne...");
        let tool = open_session(connector.as_ref(), config.window_visible)?;

        Ok(Self {
            connector,
            process_killer,
            config,
            tool,
            signals: SignalList::new(),
        })
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Run one automation step, logging and labelling any failure
    fn call<T>(
        &self,
        operation: Operation,
        step: impl FnOnce(&dyn ToolAutomation) -> AutomationResult<T>,
    ) -> Result<T> {
        step(&*self.tool).map_err(|source| {
            error!(error = %source, "Could not {}", operation);
            ControlError::operation(operation, source)
        })
    }

    // ------------------------------------------------------------------
    // Tool
    // ------------------------------------------------------------------

    /// Version string of the running tool
    pub fn version(&self) -> Result<String> {
        info!("Checking ToolOne version...");
        self.call(Operation::CheckVersion, |tool| tool.version())
    }

    /// Quit the tool, killing its process if a graceful quit fails
    ///
    /// If the primary platform reports a loaded application, the real-time
    /// application of every platform in the active experiment is stopped
    /// first. Any failure in that sequence triggers one kill of all
    /// processes named `config.process_name`; the original error is still
    /// returned.
    pub fn close(&self, save_changes: bool) -> Result<()> {
        info!(save_changes = %save_changes, "Closing ToolOne...");

        let result = self.stop_platforms_and_quit(save_changes);
        if let Err(err) = &result {
            error!(
                error = %err,
                "Could not close ToolOne normally. Trying to kill the process..."
            );
            self.kill_tool_process();
        }
        result
    }

    fn stop_platforms_and_quit(&self, save_changes: bool) -> Result<()> {
        let state = self.state_application_on_platform()?;

        if state.is_loaded() {
            self.call(Operation::StopApplication, |tool| {
                let platforms = tool.experiment_platform_count()?;
                for platform in 0..platforms {
                    if tool.realtime_application(platform)?.is_some() {
                        tool.stop_realtime_application(platform)?;
                    } else {
                        debug!(platform = %platform, "No real time application to stop");
                    }
                }
                Ok(())
            })?;
        }

        self.call(Operation::CloseTool, |tool| tool.quit(save_changes))
    }

    fn kill_tool_process(&self) {
        let name = &self.config.process_name;
        match self.process_killer.kill_by_name(name) {
            Ok(killed) => warn!(process = %name, killed = %killed, "ToolOne process killed"),
            Err(e) => error!(process = %name, error = %e, "Could not kill ToolOne process"),
        }
    }

    /// Close the tool, then attach to a fresh instance
    pub fn restart(&mut self, save_changes: bool, window_visible: bool) -> Result<()> {
        info!("Restarting ToolOne tool...");

        self.close(save_changes)
            .and_then(|()| {
                self.tool = open_session(self.connector.as_ref(), window_visible)?;
                self.config.window_visible = window_visible;
                Ok(())
            })
            .inspect_err(|e| error!(error = %e, "Could not restart ToolOne"))
    }

    // ------------------------------------------------------------------
    // Project & experiment
    // ------------------------------------------------------------------

    /// Open `file_path` unless it is already the active project
    pub fn open_project(&self, file_path: &str) -> Result<()> {
        info!(path = %file_path, "Opening project...");

        let opened = self.call(Operation::OpenProject, |tool| {
            match tool.active_project()? {
                Some(project) if project.full_path == file_path => Ok(false),
                _ => tool.open_project(file_path).map(|()| true),
            }
        })?;

        if !opened {
            info!(path = %file_path, "Project is already open");
        }
        Ok(())
    }

    /// Activate `experiment_name` unless it is already active
    pub fn activate_experiment(&self, experiment_name: &str) -> Result<()> {
        info!(experiment = %experiment_name, "Activating experiment...");

        let activated = self.call(Operation::ActivateExperiment, |tool| {
            match tool.active_experiment_name()? {
                Some(current) if current == experiment_name => Ok(false),
                _ => tool.activate_experiment(experiment_name).map(|()| true),
            }
        })?;

        if !activated {
            info!(experiment = %experiment_name, "Experiment is already activated");
        }
        Ok(())
    }

    pub fn current_experiment_name(&self) -> Result<String> {
        info!("Checking the name of the current active experiment...");
        self.call(Operation::GetExperimentName, |tool| {
            tool.active_experiment_name()?
                .ok_or_else(|| AutomationError::NotFound("ActiveExperiment".to_string()))
        })
    }

    pub fn current_project_name(&self) -> Result<String> {
        info!("Checking the name of the current active project...");
        self.call(Operation::GetProjectName, |tool| {
            tool.active_project()?
                .map(|project| project.name)
                .ok_or_else(|| AutomationError::NotFound("ActiveProject".to_string()))
        })
    }

    pub fn save_project(&self) -> Result<()> {
        info!("Saving the project...");
        self.call(Operation::SaveProject, |tool| tool.save_project())
    }

    pub fn close_project(&self, save_changes: bool) -> Result<()> {
        info!(save_changes = %save_changes, "Closing the project...");
        self.call(Operation::CloseProject, |tool| tool.close_project(save_changes))
    }

    // ------------------------------------------------------------------
    // Online calibration
    // ------------------------------------------------------------------

    pub fn online_calibration_state(&self) -> Result<CalibrationState> {
        info!("Getting the current tool state for online calibration...");
        self.call(Operation::GetCalibrationState, |tool| tool.calibration_state())
    }

    /// Start online calibration; no-op unless the tool is offline
    pub fn start_online_calibration(&self) -> Result<()> {
        info!("Starting online calibration...");

        match self.online_calibration_state()? {
            CalibrationState::Offline => self.call(Operation::StartOnlineCalibration, |tool| {
                tool.start_online_calibration()
            }),
            state => {
                debug!(state = %state, "Online calibration not offline, skipping start");
                Ok(())
            }
        }
    }

    /// Stop online calibration; no-op unless calibration is online
    pub fn stop_online_calibration(&self) -> Result<()> {
        info!("Stopping online calibration...");

        match self.online_calibration_state()? {
            CalibrationState::Online => self.call(Operation::StopOnlineCalibration, |tool| {
                tool.stop_online_calibration()
            }),
            state => {
                debug!(state = %state, "Online calibration not online, skipping stop");
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Measurement
    // ------------------------------------------------------------------

    pub fn is_running_measurement(&self) -> Result<bool> {
        info!("Checking if the system measurement is running...");
        self.call(Operation::CheckMeasuring, |tool| tool.is_measuring())
    }

    pub fn start_measuring(&self) -> Result<()> {
        info!("Starting measuring for all devices...");
        self.call(Operation::StartMeasuring, |tool| tool.start_measuring())
    }

    pub fn stop_measuring(&self) -> Result<()> {
        info!("Stopping measuring for all devices...");
        self.call(Operation::StopMeasuring, |tool| tool.stop_measuring())
    }

    // ------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------

    /// Append the signals listed in `path` to this controller's list
    pub fn read_signals_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        read_signal_file(path, &mut self.signals)
    }

    pub fn signals(&self) -> &SignalList {
        &self.signals
    }

    pub fn clear_signals(&mut self) {
        self.signals.clear();
    }
}

/// Connect and set window visibility
fn open_session(
    connector: &dyn ToolConnector,
    window_visible: bool,
) -> Result<Box<dyn ToolAutomation>> {
    connector
        .connect()
        .and_then(|tool| {
            tool.set_main_window_visible(window_visible)?;
            Ok(tool)
        })
        .map_err(|source| {
            error!(error = %source, "Could not connect to ToolOne");
            ControlError::Connection(source)
        })
}
