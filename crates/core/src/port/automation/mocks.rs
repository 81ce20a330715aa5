// ============================================================================
// Mock Implementations for Testing
// ============================================================================
//
// MockToolOne is a small in-memory stand-in for the tool's object model.
// It keeps just enough state for the controller's guards to be meaningful
// and records every mutating call so tests can assert on call order.

use super::*;
use crate::domain::{application_name_from_path, ApplicationState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const MOCK_VERSION: &str = "ToolOne 24.1 (simulated)";

/// One recorded mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub member: &'static str,
    pub argument: Option<String>,
}

impl std::fmt::Display for MockCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{}({})", self.member, arg),
            None => write!(f, "{}()", self.member),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MockPlatform {
    registered: Vec<String>,
    application: Option<RealTimeApplicationInfo>,
}

#[derive(Debug, Clone, Default)]
struct MockRecorder {
    name: String,
    start_condition_enabled: bool,
    trigger: Option<TriggerRuleRef>,
    recording: bool,
    signals: Vec<String>,
    recorded_files: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    window_visible: bool,
    quit: bool,
    project: Option<ProjectInfo>,
    experiment: Option<String>,
    calibration: i32,
    measuring: bool,
    platforms: Vec<MockPlatform>,
    recorders: Vec<MockRecorder>,
    trigger_rules: Vec<String>,
    configured_signals: Vec<String>,
    calls: Vec<MockCall>,
    failing: Vec<&'static str>,
}

/// Simulated tool session
///
/// Clones share state, so a test can keep one handle while the controller
/// owns another.
#[derive(Clone)]
pub struct MockToolOne {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockToolOne {
    fn default() -> Self {
        Self::new()
    }
}

impl MockToolOne {
    /// A tool with one platform, one recorder and no project open
    pub fn new() -> Self {
        let state = MockState {
            platforms: vec![MockPlatform::default()],
            recorders: vec![MockRecorder {
                name: "Recorder 1".to_string(),
                ..MockRecorder::default()
            }],
            ..MockState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Fixture builders
    // ------------------------------------------------------------------

    pub fn with_project(self, full_path: &str) -> Self {
        self.state().project = Some(project_info(full_path));
        self
    }

    pub fn with_experiment(self, name: &str) -> Self {
        self.state().experiment = Some(name.to_string());
        self
    }

    pub fn with_calibration_state(self, raw: i32) -> Self {
        self.state().calibration = raw;
        self
    }

    pub fn with_platforms(self, count: usize) -> Self {
        self.state().platforms = vec![MockPlatform::default(); count];
        self
    }

    /// Assign a real-time application to `platform` with the given raw state
    pub fn with_application(self, platform: usize, name: &str, state: i32) -> Self {
        {
            let mut st = self.state();
            if st.platforms.len() <= platform {
                st.platforms.resize(platform + 1, MockPlatform::default());
            }
            let slot = &mut st.platforms[platform];
            slot.registered.push(name.to_string());
            slot.application = Some(RealTimeApplicationInfo {
                name: name.to_string(),
                state: ApplicationState(state),
            });
        }
        self
    }

    pub fn with_trigger_rule(self, name: &str) -> Self {
        self.state().trigger_rules.push(name.to_string());
        self
    }

    pub fn with_recorded_file(self, recorder: usize, path: &str) -> Self {
        if let Some(rec) = self.state().recorders.get_mut(recorder) {
            rec.recorded_files.insert(0, path.to_string());
        }
        self
    }

    /// Every call to `member` fails from now on
    pub fn fail_on(&self, member: &'static str) {
        self.state().failing.push(member);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Recorded calls rendered as `Member(arg)` strings
    pub fn call_log(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    pub fn count(&self, member: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.member == member)
            .count()
    }

    /// Index of the first call to `member`
    pub fn position(&self, member: &str) -> Option<usize> {
        self.state().calls.iter().position(|c| c.member == member)
    }

    /// Index of the last call to `member`
    pub fn last_position(&self, member: &str) -> Option<usize> {
        self.state().calls.iter().rposition(|c| c.member == member)
    }

    pub fn is_window_visible(&self) -> bool {
        self.state().window_visible
    }

    pub fn has_quit(&self) -> bool {
        self.state().quit
    }

    pub fn recorder_signals(&self, recorder: usize) -> Vec<String> {
        self.state()
            .recorders
            .get(recorder)
            .map(|r| r.signals.clone())
            .unwrap_or_default()
    }

    /// Names added to `MeasurementConfiguration.Signals`
    pub fn measurement_signals(&self) -> Vec<String> {
        self.state().configured_signals.clone()
    }

    pub fn is_recording(&self, recorder: usize) -> bool {
        self.state()
            .recorders
            .get(recorder)
            .map(|r| r.recording)
            .unwrap_or(false)
    }

    /// Simulate a fresh tool process after `Quit`
    pub fn reopen(&self) {
        let mut st = self.state();
        st.quit = false;
        st.project = None;
        st.experiment = None;
        st.calibration = 0;
        st.measuring = false;
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    /// Record a call, failing if `member` was marked as failing
    fn record(&self, member: &'static str, argument: Option<String>) -> AutomationResult<()> {
        let mut st = self.state();
        st.calls.push(MockCall { member, argument });
        check_failing(&st, member)
    }

    fn check(&self, member: &'static str) -> AutomationResult<()> {
        check_failing(&self.state(), member)
    }
}

fn check_failing(st: &MockState, member: &'static str) -> AutomationResult<()> {
    if st.failing.contains(&member) {
        return Err(AutomationError::call(member, "simulated COM fault"));
    }
    if st.quit {
        return Err(AutomationError::Unavailable(
            "the tool has been shut down".to_string(),
        ));
    }
    Ok(())
}

fn project_info(full_path: &str) -> ProjectInfo {
    let file_name = application_name_from_path(full_path);
    let name = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    ProjectInfo {
        name: name.to_string(),
        full_path: full_path.to_string(),
    }
}

fn platform_mut(st: &mut MockState, platform: usize) -> AutomationResult<&mut MockPlatform> {
    st.platforms
        .get_mut(platform)
        .ok_or_else(|| AutomationError::NotFound(format!("Platforms[{}]", platform)))
}

fn recorder_mut(st: &mut MockState, recorder: usize) -> AutomationResult<&mut MockRecorder> {
    st.recorders
        .get_mut(recorder)
        .ok_or_else(|| AutomationError::NotFound(format!("Recorders[{}]", recorder)))
}

/// Member names as recorded in the call log
pub mod member {
    pub const MAIN_WINDOW_VISIBLE: &str = "MainWindow.Visible";
    pub const VERSION: &str = "Version";
    pub const QUIT: &str = "Quit";
    pub const ACTIVE_PROJECT: &str = "ActiveProject";
    pub const OPEN_PROJECT: &str = "OpenProject";
    pub const SAVE_PROJECT: &str = "ActiveProject.Save";
    pub const CLOSE_PROJECT: &str = "ActiveProject.Close";
    pub const ACTIVE_EXPERIMENT: &str = "ActiveExperiment";
    pub const ACTIVATE_EXPERIMENT: &str = "Experiments.Activate";
    pub const CALIBRATION_STATE: &str = "CalibrationManagement.State";
    pub const START_ONLINE_CALIBRATION: &str = "StartOnlineCalibration";
    pub const STOP_ONLINE_CALIBRATION: &str = "StopOnlineCalibration";
    pub const IS_MEASURING: &str = "MeasurementDataManagement.IsMeasuring";
    pub const START_MEASURING: &str = "MeasurementDataManagement.Start";
    pub const STOP_MEASURING: &str = "MeasurementDataManagement.Stop";
    pub const CONTAINS_APPLICATION: &str = "RealTimeApplications.Contains";
    pub const LOAD_APPLICATION: &str = "LoadRealtimeApplication";
    pub const PLATFORMS: &str = "ActiveExperiment.Platforms";
    pub const REALTIME_APPLICATION: &str = "RealTimeApplication";
    pub const UNLOAD_APPLICATION: &str = "RealTimeApplication.Unload";
    pub const START_APPLICATION: &str = "RealTimeApplication.Start";
    pub const STOP_APPLICATION: &str = "RealTimeApplication.Stop";
    pub const PAUSE_APPLICATION: &str = "RealTimeApplication.Pause";
    pub const RECORDER: &str = "Recorders";
    pub const START_CONDITION_ENABLED: &str = "StartCondition.Enabled";
    pub const TRIGGER_RULES: &str = "TriggerRules";
    pub const START_CONDITION_TRIGGER: &str = "StartCondition.Trigger";
    pub const START_RECORDER: &str = "Recorder.Start";
    pub const STOP_RECORDER: &str = "Recorder.Stop";
    pub const LAST_RECORDED_FILES: &str = "LastRecordedFiles";
    pub const ADD_SIGNAL: &str = "MeasurementConfiguration.Signals.Add";
    pub const INSERT_SIGNAL: &str = "Recorder.Signals.Insert";
}

impl ToolAutomation for MockToolOne {
    fn set_main_window_visible(&self, visible: bool) -> AutomationResult<()> {
        self.record(member::MAIN_WINDOW_VISIBLE, Some(visible.to_string()))?;
        self.state().window_visible = visible;
        Ok(())
    }

    fn version(&self) -> AutomationResult<String> {
        self.check(member::VERSION)?;
        Ok(MOCK_VERSION.to_string())
    }

    fn quit(&self, save_changes: bool) -> AutomationResult<()> {
        self.record(member::QUIT, Some(save_changes.to_string()))?;
        self.state().quit = true;
        Ok(())
    }

    fn active_project(&self) -> AutomationResult<Option<ProjectInfo>> {
        self.check(member::ACTIVE_PROJECT)?;
        Ok(self.state().project.clone())
    }

    fn open_project(&self, path: &str) -> AutomationResult<()> {
        self.record(member::OPEN_PROJECT, Some(path.to_string()))?;
        let mut st = self.state();
        st.project = Some(project_info(path));
        st.experiment = None;
        Ok(())
    }

    fn save_project(&self) -> AutomationResult<()> {
        self.record(member::SAVE_PROJECT, None)?;
        if self.state().project.is_none() {
            return Err(AutomationError::NotFound("ActiveProject".to_string()));
        }
        Ok(())
    }

    fn close_project(&self, save_changes: bool) -> AutomationResult<()> {
        self.record(member::CLOSE_PROJECT, Some(save_changes.to_string()))?;
        let mut st = self.state();
        if st.project.take().is_none() {
            return Err(AutomationError::NotFound("ActiveProject".to_string()));
        }
        st.experiment = None;
        Ok(())
    }

    fn active_experiment_name(&self) -> AutomationResult<Option<String>> {
        self.check(member::ACTIVE_EXPERIMENT)?;
        Ok(self.state().experiment.clone())
    }

    fn activate_experiment(&self, name: &str) -> AutomationResult<()> {
        self.record(member::ACTIVATE_EXPERIMENT, Some(name.to_string()))?;
        let mut st = self.state();
        if st.project.is_none() {
            return Err(AutomationError::NotFound("ActiveProject".to_string()));
        }
        st.experiment = Some(name.to_string());
        Ok(())
    }

    fn calibration_state(&self) -> AutomationResult<CalibrationState> {
        self.check(member::CALIBRATION_STATE)?;
        Ok(CalibrationState::from_raw(self.state().calibration))
    }

    fn start_online_calibration(&self) -> AutomationResult<()> {
        self.record(member::START_ONLINE_CALIBRATION, None)?;
        let mut st = self.state();
        if st.calibration == 1 {
            return Err(AutomationError::InvalidState(
                "online calibration already started".to_string(),
            ));
        }
        st.calibration = 1;
        Ok(())
    }

    fn stop_online_calibration(&self) -> AutomationResult<()> {
        self.record(member::STOP_ONLINE_CALIBRATION, None)?;
        let mut st = self.state();
        if st.calibration == 0 {
            return Err(AutomationError::InvalidState(
                "online calibration not started".to_string(),
            ));
        }
        st.calibration = 0;
        Ok(())
    }

    fn is_measuring(&self) -> AutomationResult<bool> {
        self.check(member::IS_MEASURING)?;
        Ok(self.state().measuring)
    }

    fn start_measuring(&self) -> AutomationResult<()> {
        self.record(member::START_MEASURING, None)?;
        self.state().measuring = true;
        Ok(())
    }

    fn stop_measuring(&self) -> AutomationResult<()> {
        self.record(member::STOP_MEASURING, None)?;
        self.state().measuring = false;
        Ok(())
    }

    fn platform_contains_application(
        &self,
        platform: usize,
        application_name: &str,
    ) -> AutomationResult<bool> {
        self.check(member::CONTAINS_APPLICATION)?;
        let mut st = self.state();
        let slot = platform_mut(&mut st, platform)?;
        Ok(slot.registered.iter().any(|n| n == application_name))
    }

    fn load_realtime_application(&self, platform: usize, path: &str) -> AutomationResult<()> {
        self.record(member::LOAD_APPLICATION, Some(path.to_string()))?;
        let name = application_name_from_path(path).to_string();
        let mut st = self.state();
        let slot = platform_mut(&mut st, platform)?;
        slot.registered.push(name.clone());
        slot.application = Some(RealTimeApplicationInfo {
            name,
            state: ApplicationState(1),
        });
        Ok(())
    }

    fn experiment_platform_count(&self) -> AutomationResult<usize> {
        self.check(member::PLATFORMS)?;
        Ok(self.state().platforms.len())
    }

    fn realtime_application(
        &self,
        platform: usize,
    ) -> AutomationResult<Option<RealTimeApplicationInfo>> {
        self.check(member::REALTIME_APPLICATION)?;
        let mut st = self.state();
        Ok(platform_mut(&mut st, platform)?.application.clone())
    }

    fn unload_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.record(member::UNLOAD_APPLICATION, Some(platform.to_string()))?;
        let mut st = self.state();
        if st.calibration == 1 {
            return Err(AutomationError::call(
                member::UNLOAD_APPLICATION,
                "cannot unload while online calibration is active",
            ));
        }
        let slot = platform_mut(&mut st, platform)?;
        let app = slot
            .application
            .take()
            .ok_or_else(|| AutomationError::NotFound("RealTimeApplication".to_string()))?;
        slot.registered.retain(|n| *n != app.name);
        Ok(())
    }

    fn start_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.record(member::START_APPLICATION, Some(platform.to_string()))?;
        set_application_state(&mut self.state(), platform, 2)
    }

    fn stop_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.record(member::STOP_APPLICATION, Some(platform.to_string()))?;
        set_application_state(&mut self.state(), platform, 1)
    }

    fn pause_realtime_application(&self, platform: usize) -> AutomationResult<()> {
        self.record(member::PAUSE_APPLICATION, Some(platform.to_string()))?;
        set_application_state(&mut self.state(), platform, 3)
    }

    fn recorder_name(&self, recorder: usize) -> AutomationResult<String> {
        self.check(member::RECORDER)?;
        let mut st = self.state();
        Ok(recorder_mut(&mut st, recorder)?.name.clone())
    }

    fn set_start_condition_enabled(
        &self,
        recorder: usize,
        enabled: bool,
    ) -> AutomationResult<()> {
        self.record(member::START_CONDITION_ENABLED, Some(enabled.to_string()))?;
        let mut st = self.state();
        recorder_mut(&mut st, recorder)?.start_condition_enabled = enabled;
        Ok(())
    }

    fn trigger_rule(&self, name: &str) -> AutomationResult<TriggerRuleRef> {
        self.record(member::TRIGGER_RULES, Some(name.to_string()))?;
        let st = self.state();
        if !st.trigger_rules.is_empty() && !st.trigger_rules.iter().any(|r| r == name) {
            return Err(AutomationError::NotFound(format!("TriggerRules[{}]", name)));
        }
        Ok(TriggerRuleRef::new(name))
    }

    fn set_start_condition_trigger(
        &self,
        recorder: usize,
        trigger: &TriggerRuleRef,
    ) -> AutomationResult<()> {
        self.record(
            member::START_CONDITION_TRIGGER,
            Some(trigger.name().to_string()),
        )?;
        let mut st = self.state();
        recorder_mut(&mut st, recorder)?.trigger = Some(trigger.clone());
        Ok(())
    }

    fn start_recorder(
        &self,
        recorder: usize,
        options: StartRecordingOptions,
    ) -> AutomationResult<()> {
        self.record(
            member::START_RECORDER,
            Some(format!(
                "{}, {}",
                options.with_trigger, options.overwrite_existing
            )),
        )?;
        let mut st = self.state();
        let rec = recorder_mut(&mut st, recorder)?;
        if options.with_trigger && (!rec.start_condition_enabled || rec.trigger.is_none()) {
            return Err(AutomationError::InvalidState(
                "start condition has no linked trigger".to_string(),
            ));
        }
        rec.recording = true;
        Ok(())
    }

    fn stop_recorder(&self, recorder: usize) -> AutomationResult<()> {
        self.record(member::STOP_RECORDER, None)?;
        let mut st = self.state();
        let rec = recorder_mut(&mut st, recorder)?;
        if rec.recording {
            rec.recording = false;
            let file = format!(
                "{}_{:03}.mf4",
                rec.name.replace(' ', "_"),
                rec.recorded_files.len() + 1
            );
            rec.recorded_files.insert(0, file);
        }
        Ok(())
    }

    fn last_recorded_files(&self, recorder: usize) -> AutomationResult<Vec<String>> {
        self.check(member::LAST_RECORDED_FILES)?;
        let mut st = self.state();
        Ok(recorder_mut(&mut st, recorder)?.recorded_files.clone())
    }

    fn add_measurement_signal(&self, name: &str) -> AutomationResult<SignalRef> {
        self.record(member::ADD_SIGNAL, Some(name.to_string()))?;
        self.state().configured_signals.push(name.to_string());
        Ok(SignalRef::new(name))
    }

    fn insert_recorder_signal(&self, recorder: usize, signal: &SignalRef) -> AutomationResult<()> {
        self.record(member::INSERT_SIGNAL, Some(signal.name().to_string()))?;
        let mut st = self.state();
        recorder_mut(&mut st, recorder)?
            .signals
            .push(signal.name().to_string());
        Ok(())
    }
}

fn set_application_state(st: &mut MockState, platform: usize, raw: i32) -> AutomationResult<()> {
    let slot = platform_mut(st, platform)?;
    match slot.application.as_mut() {
        Some(app) => {
            app.state = ApplicationState(raw);
            Ok(())
        }
        None => Err(AutomationError::NotFound("RealTimeApplication".to_string())),
    }
}

/// Connector handing out sessions bound to one shared MockToolOne
#[derive(Clone, Default)]
pub struct MockConnector {
    tool: MockToolOne,
    connects: Arc<Mutex<usize>>,
    unavailable: bool,
}

impl MockConnector {
    pub fn new(tool: MockToolOne) -> Self {
        Self {
            tool,
            connects: Arc::new(Mutex::new(0)),
            unavailable: false,
        }
    }

    /// A connector whose server can never be reached
    pub fn new_unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> &MockToolOne {
        &self.tool
    }

    pub fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ToolConnector for MockConnector {
    fn connect(&self) -> AutomationResult<Box<dyn ToolAutomation>> {
        if self.unavailable {
            return Err(AutomationError::Unavailable(
                "ToolOneNG.Application is not registered".to_string(),
            ));
        }
        *self.connects.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        if self.tool.has_quit() {
            self.tool.reopen();
        }
        Ok(Box::new(self.tool.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unload_fails_while_calibrating() {
        let tool = MockToolOne::new()
            .with_application(0, "app.sdf", 1)
            .with_calibration_state(1);

        let err = tool.unload_realtime_application(0).unwrap_err();
        assert!(matches!(err, AutomationError::Call { .. }));
    }

    #[test]
    fn test_fail_on_member() {
        let tool = MockToolOne::new();
        tool.fail_on(member::QUIT);

        assert!(tool.quit(false).is_err());
        assert!(!tool.has_quit());
        assert_eq!(tool.count(member::QUIT), 1);
    }

    #[test]
    fn test_calls_after_quit_are_rejected() {
        let tool = MockToolOne::new();
        tool.quit(false).unwrap();

        assert!(matches!(
            tool.version(),
            Err(AutomationError::Unavailable(_))
        ));
    }

    #[test]
    fn test_stop_recorder_produces_file() {
        let tool = MockToolOne::new();
        tool.start_recorder(0, StartRecordingOptions::default())
            .unwrap();
        tool.stop_recorder(0).unwrap();

        assert_eq!(
            tool.last_recorded_files(0).unwrap(),
            vec!["Recorder_1_001.mf4".to_string()]
        );
    }

    #[test]
    fn test_connector_reopens_after_quit() {
        let connector = MockConnector::new(MockToolOne::new().with_project("C:/p/demo.CDP"));
        let session = connector.connect().unwrap();
        session.quit(false).unwrap();

        let session = connector.connect().unwrap();
        assert_eq!(session.active_project().unwrap(), None);
        assert_eq!(connector.connect_count(), 2);
    }
}
