// Tool state as reported by the automation server

/// Online calibration state (`CalibrationManagement.State`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    /// Raw 0: calibration not running
    Offline,
    /// Raw 1: calibration running
    Online,
    /// Any other raw value (transitional states)
    Other(i32),
}

impl CalibrationState {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => CalibrationState::Offline,
            1 => CalibrationState::Online,
            other => CalibrationState::Other(other),
        }
    }

    pub fn raw(&self) -> i32 {
        match self {
            CalibrationState::Offline => 0,
            CalibrationState::Online => 1,
            CalibrationState::Other(raw) => *raw,
        }
    }
}

impl std::fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationState::Offline => write!(f, "OFFLINE"),
            CalibrationState::Online => write!(f, "ONLINE"),
            CalibrationState::Other(raw) => write!(f, "STATE_{}", raw),
        }
    }
}

/// State of the real-time application on a platform
///
/// 0 when nothing is loaded; any positive value means an application
/// is loaded (and possibly running).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationState(pub i32);

impl ApplicationState {
    pub const NOT_LOADED: ApplicationState = ApplicationState(0);

    pub fn is_loaded(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Real-time application currently assigned to a platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealTimeApplicationInfo {
    pub name: String,
    pub state: ApplicationState,
}

/// Identity of the active project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub full_path: String,
}

/// Application name the platform registers for a file path
///
/// Final component of the lexically normalized path: empty and `.`
/// segments are dropped and `..` removes the preceding segment. Both `/`
/// and `\\` separate components so tool paths parse the same on every host.
pub fn application_name_from_path(path: &str) -> &str {
    let mut segments = path.split(['/', '\\']).peekable();
    let drive = segments.next_if(|first| is_drive(first));
    let rooted = drive.is_some() || path.starts_with(['/', '\\']);

    let mut parts: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                None if rooted => {}
                _ => parts.push(segment),
            },
            _ => parts.push(segment),
        }
    }

    match parts.last() {
        Some(&last) => last,
        None if rooted => "",
        None => ".",
    }
}

/// `C:` style drive prefix
fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
