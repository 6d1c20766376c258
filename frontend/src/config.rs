//! On-disk configuration: key bindings and the default window scale,
//! loaded from a TOML file resolved via `dirs::config_dir()` unless the
//! caller points `--config` at one directly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::KeyBindingConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub keys: KeyBindingConfig,
}

impl Config {
    /// Loads `path` if given, else the default `dmg/config.toml` under the
    /// platform config directory. Missing files are not an error — the
    /// caller just gets built-in defaults.
    pub fn load(path: Option<&Path>) -> Config {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let Some(resolved) = resolved else {
            return Config::default();
        };

        match std::fs::read_to_string(&resolved) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("config: failed to parse {}: {e}", resolved.display());
                Config::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                log::warn!("config: failed to read {}: {e}", resolved.display());
                Config::default()
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dmg").join("config.toml"))
}
