// Process killer implementation
// reason: sysinfo for cross-platform process enumeration
use std::sync::{Arc, Mutex, PoisonError};
use sysinfo::System;
use tracing::{debug, info, warn};

use toolone_core::port::process::{ProcessError, ProcessKiller};

/// Kills processes by exact executable name using sysinfo
pub struct SysinfoProcessKiller {
    system: Arc<Mutex<System>>,
}

impl SysinfoProcessKiller {
    /// Create a new process killer
    ///
    /// # Example
    /// ```text
    /// let killer = SysinfoProcessKiller::new();
    /// killer.kill_by_name("ToolOne.exe")?;
    /// ```
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

impl Default for SysinfoProcessKiller {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessKiller for SysinfoProcessKiller {
    fn kill_by_name(&self, name: &str) -> Result<usize, ProcessError> {
        let mut sys = self.system.lock().unwrap_or_else(PoisonError::into_inner);

        // Process table only; CPU/memory/disk are not needed here
        sys.refresh_processes();

        let mut killed = 0;
        let mut failed = None;

        for process in sys.processes_by_exact_name(name) {
            let pid = process.pid().as_u32();
            if process.kill() {
                info!(pid = %pid, name = %name, "Process killed");
                killed += 1;
            } else {
                warn!(pid = %pid, name = %name, "Process could not be killed");
                failed.get_or_insert(pid);
            }
        }

        debug!(name = %name, killed = %killed, "Kill by name completed");

        match failed {
            Some(pid) if killed == 0 => Err(ProcessError::KillFailed {
                pid,
                name: name.to_string(),
            }),
            _ => Ok(killed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_process() {
        let killer = SysinfoProcessKiller::new();

        let killed = killer
            .kill_by_name("toolone-no-such-process-4c1f.exe")
            .unwrap();

        assert_eq!(killed, 0);
    }
}
