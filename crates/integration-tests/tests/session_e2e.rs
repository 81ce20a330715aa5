//! End-to-End Session Tests
//!
//! A full bench session (project, application, test run, signals, shutdown)
//! against the simulated tool, plus the real system adapters where they can
//! run on any host.

use std::io::Write;
use std::sync::Arc;

use toolone_core::domain::{ApplicationState, StartRecordingOptions, TestRunPlan, ToolConfig};
use toolone_core::port::automation::mocks::{member, MockConnector, MockToolOne, MOCK_VERSION};
use toolone_core::port::process::mocks::MockProcessKiller;
use toolone_core::port::ToolConnector;
use toolone_core::{ControlError, ToolOneControl};
use toolone_infra_system::SysinfoProcessKiller;

#[test]
fn test_full_bench_session() {
    let tool = MockToolOne::new().with_trigger_rule("EngineSpeedAbove1000");
    let connector = MockConnector::new(tool.clone());
    let killer = MockProcessKiller::new();
    let mut control = ToolOneControl::connect(
        Arc::new(connector.clone()),
        Arc::new(killer.clone()),
        ToolConfig::default(),
    )
    .unwrap();

    assert_eq!(control.version().unwrap(), MOCK_VERSION);

    // Project and experiment
    control.open_project(r"C:\bench\Powertrain.CDP").unwrap();
    control.activate_experiment("Warmup").unwrap();
    assert_eq!(control.current_project_name().unwrap(), "Powertrain");
    assert_eq!(control.current_experiment_name().unwrap(), "Warmup");

    // Application on the platform
    control
        .load_application_from_file(r"C:\bench\apps\engine_model.sdf")
        .unwrap();
    assert_eq!(
        control.current_application_name().unwrap().as_deref(),
        Some("engine_model.sdf")
    );

    // Signals
    let mut signals = tempfile::NamedTempFile::new().unwrap();
    write!(signals, "# engine\nEngineSpeed\nTorque\n\n# thermal\nCoolantTemp\n").unwrap();
    control.read_signals_from_file(signals.path()).unwrap();
    assert_eq!(control.set_signals_to_record().unwrap(), 3);
    assert_eq!(
        tool.recorder_signals(0),
        vec!["EngineSpeed", "Torque", "CoolantTemp"]
    );
    assert!(control.signals().is_empty());

    // Test run
    control.start_measuring().unwrap();
    control
        .start_running_test(&TestRunPlan {
            enable_start_condition: true,
            trigger_rule: "EngineSpeedAbove1000".to_string(),
            recording: StartRecordingOptions {
                with_trigger: true,
                overwrite_existing: true,
            },
        })
        .unwrap();
    assert!(tool.is_recording(0));
    assert_eq!(
        control.state_application_on_platform().unwrap(),
        ApplicationState(2)
    );

    control.stop_recording_and_measuring().unwrap();
    assert!(!tool.is_recording(0));
    assert!(!control.is_running_measurement().unwrap());
    assert!(control.get_recording_path().unwrap().ends_with(".mf4"));

    // Shutdown and a fresh instance
    control.restart(true, true).unwrap();
    assert_eq!(connector.connect_count(), 2);
    assert_eq!(tool.count(member::STOP_APPLICATION), 1);
    assert_eq!(tool.count(member::QUIT), 1);
    assert_eq!(killer.call_count(), 0);
    assert!(control.current_project_name().is_err());
}

#[test]
fn test_signals_from_one_cycle_do_not_leak_into_next() {
    let mut first = tempfile::NamedTempFile::new().unwrap();
    writeln!(first, "SignalA").unwrap();
    let mut second = tempfile::NamedTempFile::new().unwrap();
    writeln!(second, "SignalB").unwrap();

    let tool = MockToolOne::new();
    let mut control = ToolOneControl::connect(
        Arc::new(MockConnector::new(tool.clone())),
        Arc::new(MockProcessKiller::new()),
        ToolConfig::default(),
    )
    .unwrap();

    control.read_signals_from_file(first.path()).unwrap();
    control.set_signals_to_record().unwrap();
    control.read_signals_from_file(second.path()).unwrap();
    control.set_signals_to_record().unwrap();

    assert_eq!(tool.measurement_signals(), vec!["SignalA", "SignalB"]);
}

#[test]
fn test_close_fallback_with_system_killer() {
    let tool = MockToolOne::new();
    tool.fail_on(member::QUIT);
    let control = ToolOneControl::connect(
        Arc::new(MockConnector::new(tool)),
        Arc::new(SysinfoProcessKiller::new()),
        ToolConfig {
            process_name: "toolone-integration-no-such-process.exe".to_string(),
            ..ToolConfig::default()
        },
    )
    .unwrap();

    // Nothing matches the name, so the kill finds nothing and the Quit error stands
    let err = control.close(false).unwrap_err();

    assert!(matches!(err, ControlError::Operation { .. }));
    assert!(err.to_string().contains("Quit"));
}

#[cfg(not(windows))]
#[test]
fn test_com_connector_unavailable_off_windows() {
    use toolone_infra_com::ComConnector;

    let connector = ComConnector::new("ToolOneNG.Application");
    assert!(connector.connect().is_err());

    let result = ToolOneControl::connect(
        Arc::new(connector),
        Arc::new(MockProcessKiller::new()),
        ToolConfig::default(),
    );
    assert!(matches!(result, Err(ControlError::Connection(_))));
}
