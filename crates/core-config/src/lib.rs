//! Configuration loading and parsing.
//!
//! `ted.toml` is looked up in the working directory first, then in the
//! platform config directory (`<config_dir>/ted/ted.toml`). A missing or
//! unparseable file falls back to defaults; configuration can never stop
//! the editor from starting. Unknown fields are ignored so the format can
//! grow without breaking older files.
//!
//! Recognized settings:
//!
//! ```toml
//! [editor]
//! tab-width = 8
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

const CONFIG_FILE: &str = "ted.toml";

/// Tab width bounds; values outside are clamped, not rejected.
const MIN_TAB_WIDTH: usize = 1;
const MAX_TAB_WIDTH: usize = 64;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        8
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
}

impl Config {
    /// Tab width with bounds applied.
    pub fn tab_width(&self) -> usize {
        self.file.editor.tab_width.clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH)
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ted").join(CONFIG_FILE);
    }
    PathBuf::from(CONFIG_FILE)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", path = %path.display(), "configuration loaded");
                Ok(Config { file })
            }
            Err(err) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    error = %err,
                    "configuration unparseable, using defaults"
                );
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.tab_width(), 8);
    }

    #[test]
    fn parses_tab_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ted.toml");
        fs::write(&path, "[editor]\ntab-width = 4\n").unwrap();
        let cfg = load_from(Some(path)).unwrap();
        assert_eq!(cfg.tab_width(), 4);
    }

    #[test]
    fn out_of_range_tab_width_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ted.toml");
        fs::write(&path, "[editor]\ntab-width = 0\n").unwrap();
        let cfg = load_from(Some(path)).unwrap();
        assert_eq!(cfg.tab_width(), 1);
    }

    #[test]
    fn parse_errors_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ted.toml");
        fs::write(&path, "[editor\nnot toml").unwrap();
        let cfg = load_from(Some(path)).unwrap();
        assert_eq!(cfg.tab_width(), 8);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ted.toml");
        fs::write(&path, "[editor]\ntab-width = 2\nfuture-knob = true\n").unwrap();
        let cfg = load_from(Some(path)).unwrap();
        assert_eq!(cfg.tab_width(), 2);
    }
}
