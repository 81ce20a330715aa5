// Signal file loading

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{error, info};

use crate::domain::SignalList;
use crate::error::{ControlError, Result};

/// Append the signals listed in `path` to `signals`
///
/// One signal name per line; lines starting with `#` and blank lines are
/// skipped. Entries keep their line ending until they are handed to the tool.
///
/// # Returns
/// Number of signals appended
///
/// # Errors
/// - ControlError::SignalFile if the file cannot be opened or read
pub fn read_signal_file(path: impl AsRef<Path>, signals: &mut SignalList) -> Result<usize> {
    let path = path.as_ref();
    info!(path = %path.display(), "Reading signals from signals file...");

    let appended = File::open(path)
        .and_then(|file| signals.append_from_reader(BufReader::new(file)))
        .map_err(|source| {
            error!(path = %path.display(), error = %source, "Could not read signals from file");
            ControlError::SignalFile {
                path: path.to_path_buf(),
                source,
            }
        })?;

    info!(
        path = %path.display(),
        appended = %appended,
        total = %signals.len(),
        "Signals loaded"
    );
    Ok(appended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_signal_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# comment\n\nSignalA\nSignalB\n").unwrap();

        let mut signals = SignalList::new();
        let appended = read_signal_file(file.path(), &mut signals).unwrap();

        assert_eq!(appended, 2);
        assert_eq!(signals.entries(), ["SignalA\n", "SignalB\n"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let mut signals = SignalList::new();
        signals.push("Existing\n");
        let result = read_signal_file(&missing, &mut signals);

        assert!(matches!(result, Err(ControlError::SignalFile { .. })));
        assert_eq!(signals.len(), 1, "existing entries are untouched");
    }
}
