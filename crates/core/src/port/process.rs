// Process Killer Port
// Last-resort termination of the tool's executable

use thiserror::Error;

/// Process termination errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Process enumeration failed: {0}")]
    Enumeration(String),

    #[error("Failed to kill process {pid} ({name})")]
    KillFailed { pid: u32, name: String },
}

/// Terminates processes by executable name
pub trait ProcessKiller: Send + Sync {
    /// Kill every process whose name is exactly `name`
    ///
    /// # Returns
    /// Number of processes killed (0 when none matched)
    fn kill_by_name(&self, name: &str) -> Result<usize, ProcessError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Mock ProcessKiller recording every requested name
    #[derive(Clone, Default)]
    pub struct MockProcessKiller {
        requested: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MockProcessKiller {
        pub fn new() -> Self {
            Self::default()
        }

        /// A killer whose enumeration always fails
        pub fn new_failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn requested_names(&self) -> Vec<String> {
            self.requested
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        pub fn call_count(&self) -> usize {
            self.requested_names().len()
        }
    }

    impl ProcessKiller for MockProcessKiller {
        fn kill_by_name(&self, name: &str) -> Result<usize, ProcessError> {
            self.requested
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(name.to_string());

            if self.fail {
                return Err(ProcessError::Enumeration("mock enumeration failure".into()));
            }
            Ok(1)
        }
    }
}
