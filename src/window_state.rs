// Persisted application state: window geometry and the last chosen theme,
// stored as TOML under the platform data directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::theme::ThemeKind;

const QUALIFIER: &str = "io.inkpad";
const ORGANIZATION: &str = "Inkpad";
const APPLICATION: &str = "inkpad";
const STATE_FILE_NAME: &str = "state.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        WindowGeometry {
            x: 200,
            y: 150,
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppState {
    #[serde(default)]
    pub geometry: WindowGeometry,
    #[serde(default)]
    pub theme: Option<ThemeKind>,
}

pub fn state_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_local_dir().join(STATE_FILE_NAME))
}

pub fn load_state(path: &Path) -> Option<AppState> {
    let contents = fs::read_to_string(path).ok()?;
    match toml::from_str::<AppState>(&contents) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to parse state file");
            None
        }
    }
}

pub fn save_state(path: &Path, state: &AppState) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(state).map_err(io::Error::other)?;
    fs::write(path, toml)
}
