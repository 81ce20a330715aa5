//! ToolOne CLI - drive a ToolOne instance from the command line
//! Each invocation connects, runs one operation, and exits

mod logging;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};
use tracing::info;

use toolone_core::domain::{StartRecordingOptions, TestRunPlan};
use toolone_core::port::automation::mocks::{MockConnector, MockToolOne};
use toolone_core::port::process::mocks::MockProcessKiller;
use toolone_core::port::{ProcessKiller, ToolConnector};
use toolone_core::{ToolOneControl, VERSION};
use toolone_infra_com::ComConnector;
use toolone_infra_system::SysinfoProcessKiller;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "toolone")]
#[command(about = "ToolOne automation CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML, default: toolone.toml if present)
    #[arg(long)]
    config: Option<String>,

    /// Drive an in-memory simulated tool instead of the COM server
    #[arg(long)]
    simulate: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tool, project and platform status
    Status,

    /// Open a project and optionally activate an experiment
    Open {
        /// Project file path
        project: String,

        /// Experiment to activate after opening
        #[arg(short, long)]
        experiment: Option<String>,
    },

    /// Start or stop online calibration
    Calibration {
        #[command(subcommand)]
        action: CalibrationAction,
    },

    /// Load a real-time application onto the platform
    Load {
        /// Application file path
        path: String,
    },

    /// Unload the platform's real-time application
    Unload,

    /// Unload, then reload a real-time application
    RestartApp {
        /// Application file path
        path: String,
    },

    /// Control the platform's real-time application
    App {
        #[command(subcommand)]
        action: AppAction,
    },

    /// Arm a test run: application started, calibration online, recorder started
    RunTest {
        /// Trigger rule linked to the recorder's start condition
        #[arg(short, long)]
        trigger: String,

        /// Leave the recorder's start condition disabled
        #[arg(long)]
        no_start_condition: bool,

        /// Wait for the trigger before recording
        #[arg(long)]
        with_trigger: bool,

        /// Overwrite existing recording files
        #[arg(long)]
        overwrite: bool,
    },

    /// Stop recording and measuring, then print the recording path
    StopTest,

    /// Configure the recorder with the signals listed in a file
    Signals {
        /// Signal list (one name per line, '#' comments)
        file: PathBuf,
    },

    /// Quit the tool (force-kills it if quitting fails)
    Close {
        /// Save changes before quitting
        #[arg(long)]
        save: bool,
    },

    /// Close the tool and attach to a fresh instance
    Restart {
        /// Save changes before quitting
        #[arg(long)]
        save: bool,

        /// Keep the new instance's main window hidden
        #[arg(long)]
        hidden: bool,
    },
}

#[derive(Subcommand)]
enum CalibrationAction {
    Start,
    Stop,
}

#[derive(Subcommand)]
enum AppAction {
    Start,
    Stop,
    Pause,
}

#[derive(Tabled)]
struct StatusRow {
    property: &'static str,
    value: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let _guard = logging::init_logging(&settings)?;

    info!("ToolOne CLI v{} starting...", VERSION);

    let mut control = connect(&settings, cli.simulate)?;

    match cli.command {
        Commands::Status => print_status(&control),

        Commands::Open {
            project,
            experiment,
        } => {
            control.open_project(&project)?;
            println!("{}", format!("✓ Project {} open", project).green().bold());

            if let Some(experiment) = experiment {
                control.activate_experiment(&experiment)?;
                println!(
                    "{}",
                    format!("✓ Experiment {} active", experiment).green().bold()
                );
            }
        }

        Commands::Calibration { action } => {
            match action {
                CalibrationAction::Start => control.start_online_calibration()?,
                CalibrationAction::Stop => control.stop_online_calibration()?,
            }
            let state = control.online_calibration_state()?;
            println!("{} {}", "Online calibration:".bold(), state);
        }

        Commands::Load { path } => {
            control.load_application_from_file(&path)?;
            println!("{}", format!("✓ Application {} loaded", path).green().bold());
        }

        Commands::Unload => {
            control.unload_application_from_platform()?;
            println!("{}", "✓ Application unloaded".green().bold());
        }

        Commands::RestartApp { path } => {
            control.restart_application(&path)?;
            println!("{}", format!("✓ Application {} reloaded", path).green().bold());
        }

        Commands::App { action } => {
            match action {
                AppAction::Start => control.start_application_on_platform()?,
                AppAction::Stop => control.stop_application_on_platform()?,
                AppAction::Pause => control.pause_application_on_platform()?,
            }
            let state = control.state_application_on_platform()?;
            println!("{} {}", "Application state:".bold(), state);
        }

        Commands::RunTest {
            trigger,
            no_start_condition,
            with_trigger,
            overwrite,
        } => {
            let plan = TestRunPlan {
                enable_start_condition: !no_start_condition,
                trigger_rule: trigger,
                recording: StartRecordingOptions {
                    with_trigger,
                    overwrite_existing: overwrite,
                },
            };
            control.start_running_test(&plan)?;
            println!("{}", "✓ Test run armed".green().bold());
        }

        Commands::StopTest => {
            control.stop_recording_and_measuring()?;
            println!("{}", "✓ Test run stopped".green().bold());

            match control.get_recording_path() {
                Ok(path) => println!("  {} {}", "Recording:".bold(), path),
                Err(e) => println!("  {} {}", "Recording:".bold(), e.to_string().yellow()),
            }
        }

        Commands::Signals { file } => {
            let read = control
                .read_signals_from_file(&file)
                .with_context(|| format!("Failed to read signal list {}", file.display()))?;
            let configured = control.set_signals_to_record()?;
            println!(
                "{}",
                format!("✓ {} of {} signals configured", configured, read)
                    .green()
                    .bold()
            );
        }

        Commands::Close { save } => match control.close(save) {
            Ok(()) => println!("{}", "✓ ToolOne closed".green().bold()),
            Err(e) => {
                println!("{} {}", "✗ Graceful close failed (process kill attempted):".red(), e);
                return Err(e.into());
            }
        },

        Commands::Restart { save, hidden } => {
            control.restart(save, !hidden)?;
            println!("{}", "✓ ToolOne restarted".green().bold());
        }
    }

    Ok(())
}

/// Build the controller over the real COM server or the simulator
fn connect(settings: &Settings, simulate: bool) -> Result<ToolOneControl> {
    let (connector, process_killer): (Arc<dyn ToolConnector>, Arc<dyn ProcessKiller>) =
        if simulate {
            info!("Using simulated ToolOne");
            (
                Arc::new(MockConnector::new(simulated_tool())),
                Arc::new(MockProcessKiller::new()),
            )
        } else {
            (
                Arc::new(ComConnector::new(settings.tool.prog_id.clone())),
                Arc::new(SysinfoProcessKiller::new()),
            )
        };

    ToolOneControl::connect(connector, process_killer, settings.tool.clone())
        .context("Failed to connect to ToolOne")
}

fn simulated_tool() -> MockToolOne {
    MockToolOne::new()
        .with_project(r"C:\ToolOne\Projects\Demo.CDP")
        .with_experiment("Experiment")
        .with_platforms(1)
        .with_application(0, "Demo.sdf", 1)
        .with_trigger_rule("StartTrigger")
}

fn print_status(control: &ToolOneControl) {
    println!("{}", "ToolOne Status".cyan().bold());
    println!();

    let rows = vec![
        StatusRow {
            property: "Version",
            value: describe(control.version()),
        },
        StatusRow {
            property: "Project",
            value: describe(control.current_project_name()),
        },
        StatusRow {
            property: "Experiment",
            value: describe(control.current_experiment_name()),
        },
        StatusRow {
            property: "Online calibration",
            value: describe(control.online_calibration_state()),
        },
        StatusRow {
            property: "Measuring",
            value: describe(control.is_running_measurement()),
        },
        StatusRow {
            property: "Application",
            value: describe(
                control
                    .current_application_name()
                    .map(|name| name.unwrap_or_else(|| "-".to_string())),
            ),
        },
        StatusRow {
            property: "Application state",
            value: describe(control.state_application_on_platform()),
        },
    ];

    println!("{}", Table::new(rows));
}

fn describe<T: std::fmt::Display>(result: toolone_core::Result<T>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(e) => format!("{}", e.to_string().red()),
    }
}
