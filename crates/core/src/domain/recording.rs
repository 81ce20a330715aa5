// Measurement recording references and options

/// Trigger rule resolved from `MeasurementDataManagement.TriggerRules`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRuleRef(String);

impl TriggerRuleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Signal created in `MeasurementConfiguration.Signals`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRef(String);

impl SignalRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Parameters of `Recorder.Start`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartRecordingOptions {
    pub with_trigger: bool,
    pub overwrite_existing: bool,
}

/// Everything `start_running_test` needs to arm a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunPlan {
    pub enable_start_condition: bool,
    pub trigger_rule: String,
    pub recording: StartRecordingOptions,
}
