// Central Error Type for the Controller

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Operation;
use crate::port::AutomationError;

/// Controller-level error type
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Could not connect to ToolOne: {0}")]
    Connection(#[source] AutomationError),

    #[error("Could not {operation}: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: AutomationError,
    },

    #[error("Could not read signals from {}: {source}", path.display())]
    SignalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Recorder {0} has no recorded files")]
    NoRecordedFiles(usize),
}

impl ControlError {
    /// Wrap an automation failure with the operation it interrupted
    pub fn operation(operation: Operation, source: AutomationError) -> Self {
        ControlError::Operation { operation, source }
    }

    /// The operation this error was raised from, if it came from the tool
    pub fn failed_operation(&self) -> Option<Operation> {
        match self {
            ControlError::Operation { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Result type alias using ControlError
pub type Result<T> = std::result::Result<T, ControlError>;
