// Real-time application handling on the platform

use tracing::{error, info};

use super::ToolOneControl;
use crate::domain::{application_name_from_path, ApplicationState, Operation};
use crate::error::Result;
use crate::port::{AutomationResult, ToolAutomation};

impl ToolOneControl {
    /// Load the application at `application_path` unless the platform already has it
    pub fn load_application_from_file(&self, application_path: &str) -> Result<()> {
        info!(path = %application_path, "Loading the application on the Platform...");
        let platform = self.config.platform_index;
        let application_name = application_name_from_path(application_path);

        let loaded = self.call(Operation::LoadApplication, |tool| {
            if tool.platform_contains_application(platform, application_name)? {
                return Ok(false);
            }
            tool.load_realtime_application(platform, application_path)
                .map(|()| true)
        })?;

        if !loaded {
            info!(application = %application_name, "Application is already loaded");
        }
        Ok(())
    }

    /// Unload the platform's application, stopping online calibration first
    ///
    /// The tool faults when unloading while online calibration is active.
    pub fn unload_application_from_platform(&self) -> Result<()> {
        info!("Unloading the application from the Platform...");
        self.stop_online_calibration()?;

        let platform = self.config.platform_index;
        self.call(Operation::UnloadApplication, |tool| {
            tool.unload_realtime_application(platform)
        })
    }

    pub fn start_application_on_platform(&self) -> Result<()> {
        info!("Starting the offline simulation application on the Platform...");
        self.with_realtime_application(Operation::StartApplication, "start", |tool, platform| {
            tool.start_realtime_application(platform)
        })
    }

    pub fn stop_application_on_platform(&self) -> Result<()> {
        info!("Stopping the application currently on the Platform...");
        self.with_realtime_application(Operation::StopApplication, "stop", |tool, platform| {
            tool.stop_realtime_application(platform)
        })
    }

    pub fn pause_application_on_platform(&self) -> Result<()> {
        info!("Pausing the application currently on the Platform...");
        self.with_realtime_application(Operation::PauseApplication, "pause", |tool, platform| {
            tool.pause_realtime_application(platform)
        })
    }

    /// Run `action` on the platform's real-time application, if there is one
    fn with_realtime_application(
        &self,
        operation: Operation,
        verb: &str,
        action: impl FnOnce(&dyn ToolAutomation, usize) -> AutomationResult<()>,
    ) -> Result<()> {
        let platform = self.config.platform_index;

        let acted = self.call(operation, |tool| match tool.realtime_application(platform)? {
            Some(_) => action(tool, platform).map(|()| true),
            None => Ok(false),
        })?;

        if !acted {
            info!("Currently no active real time application available to {}", verb);
        }
        Ok(())
    }

    /// State of the platform's application (0 when nothing is loaded)
    pub fn state_application_on_platform(&self) -> Result<ApplicationState> {
        info!("Getting the state of the application currently on the Platform...");
        let platform = self.config.platform_index;

        self.call(Operation::GetApplicationState, |tool| {
            Ok(tool
                .realtime_application(platform)?
                .map(|app| app.state)
                .unwrap_or(ApplicationState::NOT_LOADED))
        })
    }

    /// Name of the platform's real-time application, if one is assigned
    pub fn current_application_name(&self) -> Result<Option<String>> {
        info!("Checking the name of the current loaded application...");
        let platform = self.config.platform_index;

        self.call(Operation::GetApplicationName, |tool| {
            Ok(tool.realtime_application(platform)?.map(|app| app.name))
        })
    }

    /// Unload then reload the application
    ///
    /// Not transactional: if the reload fails, no application is loaded.
    pub fn restart_application(&self, application_path: &str) -> Result<()> {
        info!(path = %application_path, "Restarting the application on the platform...");

        self.unload_application_from_platform()
            .and_then(|()| self.load_application_from_file(application_path))
            .inspect_err(|e| {
                error!(
                    path = %application_path,
                    error = %e,
                    "Could not restart the application on the platform"
                )
            })
    }
}
