use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::strings::{Strings, StringsOverrides};

const CONFIG_DIR_NAME: &str = "livepreview";
const CONFIG_FILE_NAME: &str = "config.json";
const PROJECT_CONFIG_FILE_NAME: &str = ".livepreview.json";

/// Read-only values the URL builders template into splash and loader URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Base URL the editor's static assets are served from. Ends with `/`.
    pub asset_base_url: String,
    /// Base URL of the static server hosting `pageLoader.html`. Ends with `/`.
    pub static_server_base_url: String,
    /// Broadcast channel the page loader uses to talk back to the editor.
    pub broadcast_channel_id: String,
    pub strings: Strings,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            asset_base_url: String::from("https://phcode.dev/"),
            static_server_base_url: String::from("https://phcode.live/"),
            broadcast_channel_id: String::from("livePreview"),
            strings: Strings::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct PreviewConfigOverrides {
    asset_base_url: Option<String>,
    static_server_base_url: Option<String>,
    broadcast_channel_id: Option<String>,
    strings: Option<StringsOverrides>,
}

impl PreviewConfig {
    /// Build the effective config: defaults, then the global config file, then
    /// the project's `.livepreview.json` when `project_root` is given.
    ///
    /// Missing or malformed files are skipped.
    pub fn load(project_root: Option<&str>) -> Self {
        let mut cfg = Self::default();

        if let Some(global_path) = global_config_path() {
            cfg.apply_file(&global_path, true);
        }

        if let Some(project_path) = project_root.and_then(project_config_path) {
            // Untrusted: may change wording, never where previews load from.
            cfg.apply_file(&project_path, false);
        }

        cfg
    }

    /// Parse a complete config from `path`, with defaults for missing fields.
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
    }

    fn apply_file(&mut self, path: &Path, trusted: bool) {
        let contents = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                log::warn!(
                    "Failed to read live preview config at {}: {}",
                    path.display(),
                    e
                );
                return;
            }
        };
        let overrides = match serde_json::from_str::<PreviewConfigOverrides>(&contents) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Invalid live preview config at {}: {}", path.display(), e);
                return;
            }
        };
        log::debug!("Applying live preview config from {}", path.display());
        self.apply(overrides, trusted, path);
    }

    fn apply(&mut self, overrides: PreviewConfigOverrides, trusted: bool, source: &Path) {
        let location_overridden = overrides.asset_base_url.is_some()
            || overrides.static_server_base_url.is_some()
            || overrides.broadcast_channel_id.is_some();

        if trusted {
            if let Some(v) = overrides.asset_base_url {
                self.asset_base_url = v;
            }
            if let Some(v) = overrides.static_server_base_url {
                self.static_server_base_url = v;
            }
            if let Some(v) = overrides.broadcast_channel_id {
                self.broadcast_channel_id = v;
            }
        } else if location_overridden {
            log::warn!(
                "Project config {} tried to change preview URLs; ignoring (only the global config can)",
                source.display()
            );
        }

        if let Some(strings) = overrides.strings {
            self.strings.apply(strings);
        }
    }
}

/// `.livepreview.json` inside `root`, or `None` when no project is open.
fn project_config_path(root: &str) -> Option<PathBuf> {
    if root.trim().is_empty() {
        return None;
    }
    Some(Path::new(root).join(PROJECT_CONFIG_FILE_NAME))
}

fn global_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }

    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
