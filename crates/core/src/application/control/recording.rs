// Measurement recorder configuration and test runs

use tracing::{error, info};

use super::ToolOneControl;
use crate::domain::{Operation, StartRecordingOptions, TestRunPlan, TriggerRuleRef};
use crate::error::{ControlError, Result};

impl ToolOneControl {
    /// Name of the recorder this controller addresses
    pub fn measurement_recorder_name(&self) -> Result<String> {
        info!(recorder = %self.config.recorder_index, "Getting the recorder...");
        let recorder = self.config.recorder_index;
        self.call(Operation::GetRecorder, |tool| tool.recorder_name(recorder))
    }

    /// Enable or disable the recorder's start condition
    pub fn enable_measurement_start_condition(&self, enabled: bool) -> Result<()> {
        info!(
            enabled = %enabled,
            "Setting the start condition option to start measuring after an event occurs..."
        );
        let recorder = self.config.recorder_index;
        self.call(Operation::EnableStartCondition, |tool| {
            tool.set_start_condition_enabled(recorder, enabled)
        })
    }

    /// Resolve the trigger rule named `trigger_rules`
    pub fn set_measurement_trigger_rules(&self, trigger_rules: &str) -> Result<TriggerRuleRef> {
        info!(trigger_rules = %trigger_rules, "Setting the trigger rules...");
        self.call(Operation::SetTriggerRules, |tool| tool.trigger_rule(trigger_rules))
    }

    /// Use `trigger_rule` as the recorder's start trigger
    pub fn link_trigger_rules_with_start_measurement(
        &self,
        trigger_rule: &TriggerRuleRef,
    ) -> Result<()> {
        info!(
            trigger_rule = %trigger_rule.name(),
            "Linking the trigger rules with the start of recording the measurements..."
        );
        let recorder = self.config.recorder_index;
        self.call(Operation::LinkTriggerRules, |tool| {
            tool.set_start_condition_trigger(recorder, trigger_rule)
        })
    }

    /// Start the recorder with the given parameters
    pub fn configure_start_conditions_for_measurement(
        &self,
        options: StartRecordingOptions,
    ) -> Result<()> {
        info!(
            with_trigger = %options.with_trigger,
            overwrite_existing = %options.overwrite_existing,
            "Starting recording the measurements according to the specified parameters..."
        );
        let recorder = self.config.recorder_index;
        self.call(Operation::StartRecording, |tool| {
            tool.start_recorder(recorder, options)
        })
    }

    pub fn stop_recording_measurement(&self) -> Result<()> {
        info!("Stopping recording the measurements...");
        let recorder = self.config.recorder_index;
        self.call(Operation::StopRecording, |tool| tool.stop_recorder(recorder))
    }

    pub fn stop_measuring_measurement(&self) -> Result<()> {
        info!("Stopping measuring...");
        self.call(Operation::StopMeasuring, |tool| tool.stop_measuring())
    }

    /// Hand the loaded signal list to the recorder
    ///
    /// Each entry is added to the measurement configuration (line ending
    /// stripped) and inserted into the recorder's signals. On success the
    /// list is emptied, so the next configuration cycle starts clean.
    ///
    /// # Returns
    /// Number of signals configured
    pub fn set_signals_to_record(&mut self) -> Result<usize> {
        info!(signals = %self.signals.len(), "Configuring signal recording...");
        let recorder = self.config.recorder_index;
        let signals = &self.signals;

        self.call(Operation::ConfigureSignals, |tool| {
            tool.recorder_name(recorder)?;
            for name in signals.names() {
                let signal = tool.add_measurement_signal(name)?;
                tool.insert_recorder_signal(recorder, &signal)?;
            }
            Ok(())
        })?;

        let configured = self.signals.len();
        self.signals.clear();
        Ok(configured)
    }

    /// Arm a test run: application running, calibration online, recorder started
    ///
    /// Steps, in order:
    /// 1. stop online calibration
    /// 2. start the application on the platform
    /// 3. start online calibration
    /// 4. enable/disable the start condition
    /// 5. resolve the trigger rule
    /// 6. link the trigger to the start condition
    /// 7. start the recorder
    pub fn start_running_test(&self, plan: &TestRunPlan) -> Result<()> {
        info!(trigger_rule = %plan.trigger_rule, "Starting test run...");

        self.run_test_sequence(plan)
            .inspect_err(|e| error!(error = %e, "Could not start test run"))
    }

    fn run_test_sequence(&self, plan: &TestRunPlan) -> Result<()> {
        self.stop_online_calibration()?;
        self.start_application_on_platform()?;
        self.start_online_calibration()?;
        self.enable_measurement_start_condition(plan.enable_start_condition)?;
        let trigger = self.set_measurement_trigger_rules(&plan.trigger_rule)?;
        self.link_trigger_rules_with_start_measurement(&trigger)?;
        self.configure_start_conditions_for_measurement(plan.recording)
    }

    /// Stop the recorder, then stop measuring
    pub fn stop_recording_and_measuring(&self) -> Result<()> {
        info!("Stopping test run...");

        self.stop_recording_measurement()
            .and_then(|()| self.stop_measuring_measurement())
            .inspect_err(|e| error!(error = %e, "Could not stop test run"))
    }

    /// Most recent file written by the recorder
    pub fn get_recording_path(&self) -> Result<String> {
        info!("Getting recording path...");
        let recorder = self.config.recorder_index;

        let files = self.call(Operation::GetRecordingPath, |tool| {
            tool.last_recorded_files(recorder)
        })?;

        files.into_iter().next().ok_or_else(|| {
            error!(recorder = %recorder, "Could not get recording path: no recorded files");
            ControlError::NoRecordedFiles(recorder)
        })
    }
}
