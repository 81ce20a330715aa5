//! Call Sequencing Integration Tests
//!
//! Guards, ordering and the shutdown fallback, driven through the public
//! controller API against the simulated tool.

use std::io::Write;
use std::sync::Arc;

use toolone_core::domain::{CalibrationState, Operation, ToolConfig};
use toolone_core::port::automation::mocks::{member, MockConnector, MockToolOne};
use toolone_core::port::process::mocks::MockProcessKiller;
use toolone_core::port::AutomationError;
use toolone_core::{ControlError, ToolOneControl};

fn connect(tool: &MockToolOne, killer: &MockProcessKiller) -> ToolOneControl {
    ToolOneControl::connect(
        Arc::new(MockConnector::new(tool.clone())),
        Arc::new(killer.clone()),
        ToolConfig::default(),
    )
    .unwrap()
}

/// Opening the active project again is skipped; a different path opens
#[test]
fn test_open_project_twice() {
    let tool = MockToolOne::new();
    let control = connect(&tool, &MockProcessKiller::new());

    control.open_project(r"D:\work\bench.CDP").unwrap();
    control.open_project(r"D:\work\bench.CDP").unwrap();
    assert_eq!(tool.count(member::OPEN_PROJECT), 1);

    control.open_project(r"D:\work\vehicle.CDP").unwrap();
    assert_eq!(tool.count(member::OPEN_PROJECT), 2);
    assert_eq!(
        tool.call_log()[1..],
        [r"OpenProject(D:\work\bench.CDP)", r"OpenProject(D:\work\vehicle.CDP)"]
    );
}

/// Activating the active experiment is a no-op; another name activates
#[test]
fn test_activate_experiment_twice() {
    let tool = MockToolOne::new()
        .with_project(r"D:\work\bench.CDP")
        .with_experiment("Baseline");
    let control = connect(&tool, &MockProcessKiller::new());

    control.activate_experiment("Baseline").unwrap();
    assert_eq!(tool.count(member::ACTIVATE_EXPERIMENT), 0);

    control.activate_experiment("Sweep").unwrap();
    assert_eq!(tool.count(member::ACTIVATE_EXPERIMENT), 1);
    assert_eq!(control.current_experiment_name().unwrap(), "Sweep");
}

/// Start calibration only reaches the tool when it is offline
#[test]
fn test_start_online_calibration_by_state() {
    let online = MockToolOne::new().with_calibration_state(1);
    connect(&online, &MockProcessKiller::new())
        .start_online_calibration()
        .unwrap();
    assert_eq!(online.count(member::START_ONLINE_CALIBRATION), 0);

    let offline = MockToolOne::new().with_calibration_state(0);
    let control = connect(&offline, &MockProcessKiller::new());
    control.start_online_calibration().unwrap();
    assert_eq!(offline.count(member::START_ONLINE_CALIBRATION), 1);
    assert_eq!(
        control.online_calibration_state().unwrap(),
        CalibrationState::Online
    );
}

/// Unload goes through the calibration stop first, whatever the prior state
#[test]
fn test_unload_after_calibration_stop() {
    for initial in [0, 1] {
        let tool = MockToolOne::new()
            .with_application(0, "bench.sdf", 1)
            .with_calibration_state(initial);
        let control = connect(&tool, &MockProcessKiller::new());

        control.unload_application_from_platform().unwrap();

        assert_eq!(
            control.online_calibration_state().unwrap(),
            CalibrationState::Offline
        );
        assert_eq!(tool.count(member::UNLOAD_APPLICATION), 1);
        if let Some(stop) = tool.position(member::STOP_ONLINE_CALIBRATION) {
            assert!(stop < tool.position(member::UNLOAD_APPLICATION).unwrap());
        }
    }
}

/// Every platform's application is stopped before Quit
#[test]
fn test_close_stops_platforms_before_quit() {
    let tool = MockToolOne::new()
        .with_application(0, "bench.sdf", 2)
        .with_application(1, "plant.sdf", 2)
        .with_application(2, "io.sdf", 3);
    let killer = MockProcessKiller::new();
    let control = connect(&tool, &killer);

    control.close(false).unwrap();

    assert_eq!(
        tool.call_log()[1..],
        [
            "RealTimeApplication.Stop(0)",
            "RealTimeApplication.Stop(1)",
            "RealTimeApplication.Stop(2)",
            "Quit(false)",
        ]
    );
    assert_eq!(killer.call_count(), 0);
}

/// A failing Quit kills the process once and still surfaces the Quit error
#[test]
fn test_close_quit_failure_falls_back_to_kill() {
    let tool = MockToolOne::new().with_application(0, "bench.sdf", 2);
    tool.fail_on(member::QUIT);
    let killer = MockProcessKiller::new();
    let control = connect(&tool, &killer);

    let err = control.close(true).unwrap_err();

    assert_eq!(killer.requested_names(), vec!["ToolOne.exe".to_string()]);
    assert!(tool.position(member::STOP_APPLICATION) < tool.position(member::QUIT));
    match err {
        ControlError::Operation { operation, source } => {
            assert_eq!(operation, Operation::CloseTool);
            assert!(matches!(
                source,
                AutomationError::Call { member: name, .. } if name == "Quit"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A failing platform stop also triggers the fallback, before any Quit
#[test]
fn test_close_stop_failure_falls_back_to_kill() {
    let tool = MockToolOne::new().with_application(0, "bench.sdf", 2);
    tool.fail_on(member::STOP_APPLICATION);
    let killer = MockProcessKiller::new();
    let control = connect(&tool, &killer);

    let err = control.close(false).unwrap_err();

    assert_eq!(err.failed_operation(), Some(Operation::StopApplication));
    assert_eq!(tool.count(member::QUIT), 0);
    assert_eq!(killer.call_count(), 1);
}

/// Signal files append in order, skipping comments and blank lines
#[test]
fn test_signal_file_appends() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "# comment\n\nSignalA\nSignalB\n").unwrap();
    let control_tool = MockToolOne::new();
    let mut control = connect(&control_tool, &MockProcessKiller::new());

    assert_eq!(control.read_signals_from_file(file.path()).unwrap(), 2);
    assert_eq!(control.signals().entries(), ["SignalA\n", "SignalB\n"]);

    control.read_signals_from_file(file.path()).unwrap();
    assert_eq!(
        control.signals().entries(),
        ["SignalA\n", "SignalB\n", "SignalA\n", "SignalB\n"]
    );
}

/// A missing signal file is reported and leaves the list untouched
#[test]
fn test_missing_signal_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut control = connect(&MockToolOne::new(), &MockProcessKiller::new());

    let err = control
        .read_signals_from_file(dir.path().join("signals.txt"))
        .unwrap_err();

    assert!(matches!(err, ControlError::SignalFile { .. }));
    assert!(control.signals().is_empty());
}
