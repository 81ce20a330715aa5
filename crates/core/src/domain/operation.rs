// Controller operations (used to label failures)

/// Every operation the controller can report a failure for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    CheckVersion,
    OpenProject,
    ActivateExperiment,
    GetExperimentName,
    GetProjectName,
    GetApplicationName,
    GetCalibrationState,
    StartOnlineCalibration,
    StopOnlineCalibration,
    CheckMeasuring,
    StartMeasuring,
    StopMeasuring,
    SaveProject,
    CloseProject,
    LoadApplication,
    UnloadApplication,
    StartApplication,
    StopApplication,
    PauseApplication,
    GetApplicationState,
    GetRecorder,
    EnableStartCondition,
    SetTriggerRules,
    LinkTriggerRules,
    StartRecording,
    StopRecording,
    ConfigureSignals,
    GetRecordingPath,
    CloseTool,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Operation::Connect => "connect to ToolOne",
            Operation::CheckVersion => "check ToolOne version",
            Operation::OpenProject => "open project",
            Operation::ActivateExperiment => "activate experiment",
            Operation::GetExperimentName => "get the name of current active experiment",
            Operation::GetProjectName => "get the name of current active project",
            Operation::GetApplicationName => "get the name of current loaded application",
            Operation::GetCalibrationState => "get the current tool state for online calibration",
            Operation::StartOnlineCalibration => "start online calibration",
            Operation::StopOnlineCalibration => "stop online calibration",
            Operation::CheckMeasuring => "check system measurement state",
            Operation::StartMeasuring => "start measuring",
            Operation::StopMeasuring => "stop measuring",
            Operation::SaveProject => "save changes of the project",
            Operation::CloseProject => "close the project",
            Operation::LoadApplication => "load the application on the platform",
            Operation::UnloadApplication => "unload the application from the platform",
            Operation::StartApplication => "start the application on the platform",
            Operation::StopApplication => "stop the application on the platform",
            Operation::PauseApplication => "pause the application on the platform",
            Operation::GetApplicationState => "get the state of the application on the platform",
            Operation::GetRecorder => "get the recorder",
            Operation::EnableStartCondition => "set the start condition option",
            Operation::SetTriggerRules => "set the trigger rules",
            Operation::LinkTriggerRules => "link the trigger rules with the start of recording",
            Operation::StartRecording => "start recording the measurements",
            Operation::StopRecording => "stop recording the measurements",
            Operation::ConfigureSignals => "configure signal recording",
            Operation::GetRecordingPath => "get recording path",
            Operation::CloseTool => "close ToolOne normally",
        };
        f.write_str(text)
    }
}
