//! Centralized configuration paths for hue
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/hue/`
//! - Windows: `%APPDATA%\hue\`

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "hue";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/hue`
///   - Else: `~/.config/hue`
///
/// Windows:
///   - `%APPDATA%\hue`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        // dirs::config_dir() is ~/Library/Application Support on macOS
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/hue/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/hue/themes/`
pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/hue/queries/`, holding `<bundle>/highlights.scm` overrides
pub fn queries_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("queries"))
}

/// `~/.config/hue/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Ensure the logs dir exists, returning it
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory available"))?;
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_config_dir() {
        let Some(base) = config_dir() else {
            return;
        };
        assert!(base.ends_with(APP_DIR));
        assert_eq!(config_file(), Some(base.join("config.yaml")));
        assert_eq!(themes_dir(), Some(base.join("themes")));
        assert_eq!(queries_dir(), Some(base.join("queries")));
        assert_eq!(logs_dir(), Some(base.join("logs")));
    }
}
