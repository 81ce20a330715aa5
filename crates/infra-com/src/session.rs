// COM session - ToolAutomation over the "ToolOneNG.Application" object model

use std::cell::RefCell;
use std::collections::HashMap;

use toolone_core::domain::{
    ApplicationState, CalibrationState, ProjectInfo, RealTimeApplicationInfo, SignalRef,
    StartRecordingOptions, TriggerRuleRef,
};
use toolone_core::port::{AutomationError, AutomationResult, ToolAutomation};
use tracing::{debug, info};
use windows::core::{BSTR, VARIANT};

use crate::dispatch::{index, text, ComApartment, Dispatch};

/// One automation session, bound to the thread that created it
pub(crate) struct ComSession {
    app: Dispatch,
    // Signals created through `Signals.Add`, keyed by name
    signals: RefCell<HashMap<String, Dispatch>>,
    // Dropped last: every interface above must be released before uninit
    _apartment: ComApartment,
}

impl ComSession {
    pub(crate) fn attach(prog_id: &str) -> AutomationResult<Self> {
        let apartment = ComApartment::enter()?;
        let app = Dispatch::create(prog_id)?;
        info!(prog_id = %prog_id, "Automation server attached");

        Ok(Self {
            app,
            signals: RefCell::new(HashMap::new()),
            _apartment: apartment,
        })
    }

    fn calibration(&self) -> AutomationResult<Dispatch> {
        self.app.object("CalibrationManagement")
    }

    fn measurement(&self) -> AutomationResult<Dispatch> {
        self.app.object("MeasurementDataManagement")
    }

    fn platform(&self, platform: usize) -> AutomationResult<Dispatch> {
        self.app
            .object("PlatformManagement")?
            .object("Platforms")?
            .item_object(index(platform)?, &platform.to_string())
    }

    fn experiment_platform(&self, platform: usize) -> AutomationResult<Dispatch> {
        self.app
            .object("ActiveExperiment")?
            .object("Platforms")?
            .item_object(index(platform)?, &platform.to_string())
    }

    fn realtime_object(&self, platform: usize) -> AutomationResult<Dispatch> {
        self.experiment_platform(platform)?
            .object("RealTimeApplication")
    }

    fn recorder(&self, recorder: usize) -> AutomationResult<Dispatch> {
        self.measurement()?
            .object("Recorders")?
            .item_object(index(recorder)?, &recorder.to_string())
    }

    fn trigger_object(&self, name: &str) -> AutomationResult<Dispatch> {
        self.measurement()?
            .object("TriggerRules")?
            .item_object(text(name), name)
    }

    fn measurement_signals(&self) -> AutomationResult<Dispatch> {
        self.measurement()?
            .object("MeasurementConfiguration")?
            .object("Signals")
    }
}

impl ToolAutomation for ComSession {
    fn set_main_window_visible(&self, visible: bool) -> AutomationResult<()> {
        self.app
            .object("MainWindow")?
            .put("Visible", VARIANT::from(visible))
    }

    fn version(&self) -> AutomationResult<String> {
        self.app.get_string("Version")
    }

    fn quit(&self, save_changes: bool) -> AutomationResult<()> {
        self.app
            .call("Quit", vec![VARIANT::from(save_changes)])
            .map(|_| ())
    }

    fn active_project(&self) -> AutomationResult<Option<ProjectInfo>> {
        match self.app.optional_object("ActiveProject")? {
            Some(project) => Ok(Some(ProjectInfo {
                name: project.get_string("Name")?,
                full_path: project.get_string("FullPath")?,
            })),
            None => Ok(None),
        }
    }

    fn open_project(&self, path: &str) -> AutomationResult<()> {
        self.app.call("OpenProject", vec![text(path)]).map(|_| ())
    }

    fn save_project(&self) -> AutomationResult<()> {
        self.app
            .object("ActiveProject")?
            .call("Save", Vec::new())
            .map(|_| ())
    }

    fn close_project(&self, save_changes: bool) -> AutomationResult<()> {
        self.app
            .object("ActiveProject")?
            .call("Close", vec![VARIANT::from(save_changes)])
            .map(|_| ())
    }

    fn active_experiment_name(&self) -> AutomationResult<Option<String>> {
        match self.app.optional_object("ActiveExperiment")? {
            Some(experiment) => experiment.get_string("Name").map(Some),
            None => Ok(None),
        }
    }

    fn activate_experiment(&self, name: &str) -> AutomationResult<()> {
        self.app
            .object("ActiveProject")?
            .object("Experiments")?
            .item_object(text(name), name)?
            .call("Activate", Vec::new())
            .map(|_| ())
    }

    fn calibration_state(&self) -> AutomationResult<CalibrationState> {
        self.calibration()?
            .get_i32("State")
            .map(CalibrationState::from_raw)
    }

    fn start_online_calibration(&self) -> AutomationResult<()> {
        self.calibration()?
            .call("StartOnlineCalibration", Vec::new())
            .map(|_| ())
    }

    fn stop_online_calibration(&self) -> AutomationResult<()> {
        self.calibration()?
            .call("StopOnlineCalibration", Vec::new())
            .map(|_| ())
    }

    fn is_measuring(&self) -> AutomationResult<bool> {
        self.measurement()?.get_bool("IsMeasuring")
    }

    fn start_measuring(&self) -> AutomationResult<()> {
        self.measurement()?.call("Start", Vec::new()).map(|_| ())
    }

    fn stop_measuring(&self) -> AutomationResult<()> {
        self.measurement()?.call("Stop", Vec::new()).map(|_| ())
    }

    fn platform_contains_application(
        &self,
        platform: usize,
        application_name: &str,
    ) -> AutomationResult<bool> {
        let applications = self.platform(platform)?.object("RealTimeApplications")?;
        let found = applications.call("Contains", vec![text(application_name)])?;
        bool::try_from(&found).map_err(|e| {
            AutomationError::call(format!("{}.Contains", applications.path()), e.to_string())
        })
    }

    fn load_realtime_application(&self, platform: usize, path: &str) -> AutomationResult<()> {
        self.platform(platform)?
            .call("LoadRealtimeApplication", vec![text(path)])
            .map(|_| ())
    }

    fn experiment_platform_count(&self) -> AutomationResult<usize> {
        let count = self
            .app
            .object("ActiveExperiment")?
            .object("Platforms")?
            .get_i32("Count")?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn realtime_application(
        &self,
        platform: usize,
    ) -> AutomationResult<Option<RealTimeApplicationInfo>> {
        let application = match self
            .experiment_platform(platform)?
            .optional_object("RealTimeApplication")?
        {
            Some(application) => application,
            None => return Ok(None),
        };

        Ok(Some(RealTimeApplicationInfo {
            name: application.get_string("Name")?,
            state: ApplicationState(application.get_i32("State")?),
        }))
    }

    fn unload_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.realtime_object(platform)?
            .call("Unload", Vec::new())
            .map(|_| ())
    }

    fn start_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.realtime_object(platform)?
            .call("Start", Vec::new())
            .map(|_| ())
    }

    fn stop_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.realtime_object(platform)?
            .call("Stop", Vec::new())
            .map(|_| ())
    }

    fn pause_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.realtime_object(platform)?
            .call("Pause", Vec::new())
            .map(|_| ())
    }

    fn recorder_name(&self, recorder: usize) -> AutomationResult<String> {
        self.recorder(recorder)?.get_string("Name")
    }

    fn set_start_condition_enabled(&self, recorder: usize, enabled: bool) -> AutomationResult<()> {
        self.recorder(recorder)?
            .object("StartCondition")?
            .put("Enabled", VARIANT::from(enabled))
    }

    fn trigger_rule(&self, name: &str) -> AutomationResult<TriggerRuleRef> {
        self.trigger_object(name)?;
        Ok(TriggerRuleRef::new(name))
    }

    fn set_start_condition_trigger(
        &self,
        recorder: usize,
        trigger: &TriggerRuleRef,
    ) -> AutomationResult<()> {
        let rule = self.trigger_object(trigger.name())?;
        self.recorder(recorder)?
            .object("StartCondition")?
            .put("Trigger", rule.as_variant())
    }

    fn start_recorder(
        &self,
        recorder: usize,
        options: StartRecordingOptions,
    ) -> AutomationResult<()> {
        self.recorder(recorder)?
            .call(
                "Start",
                vec![
                    VARIANT::from(options.with_trigger),
                    VARIANT::from(options.overwrite_existing),
                ],
            )
            .map(|_| ())
    }

    fn stop_recorder(&self, recorder: usize) -> AutomationResult<()> {
        self.recorder(recorder)?.call("Stop", Vec::new()).map(|_| ())
    }

    fn last_recorded_files(&self, recorder: usize) -> AutomationResult<Vec<String>> {
        let files = self.recorder(recorder)?.object("LastRecordedFiles")?;
        let count = files.get_i32("Count")?;

        (0..count)
            .map(|i| {
                let value = files.item(VARIANT::from(i))?;
                BSTR::try_from(&value).map(|s| s.to_string()).map_err(|e| {
                    AutomationError::call(format!("{}[{i}]", files.path()), e.to_string())
                })
            })
            .collect()
    }

    fn add_measurement_signal(&self, name: &str) -> AutomationResult<SignalRef> {
        let signals = self.measurement_signals()?;
        let added = signals.call("Add", vec![text(name)])?;
        if let Some(signal) = signals.wrap(added, &format!("[{name}]"))? {
            self.signals.borrow_mut().insert(name.to_string(), signal);
        }
        debug!(signal = %name, "Signal added to measurement configuration");
        Ok(SignalRef::new(name))
    }

    fn insert_recorder_signal(&self, recorder: usize, signal: &SignalRef) -> AutomationResult<()> {
        let cached = self.signals.borrow_mut().remove(signal.name());
        let object = match cached {
            Some(object) => object,
            None => self
                .measurement_signals()?
                .item_object(text(signal.name()), signal.name())?,
        };

        self.recorder(recorder)?
            .object("Signals")?
            .call("Insert", vec![object.as_variant()])
            .map(|_| ())
    }
}
