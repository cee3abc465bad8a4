//! Settings file persistence
//!
//! `ConfigStore` is the only code that touches `options.json`. Loading never
//! fails: a missing or unreadable file is replaced by compiled defaults, and
//! the repaired record is written back straight away.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::settings::GlobalSettings;
use crate::constants::config::{APP_DIR, FILENAME, TEMP_EXTENSION};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store for `options.json` inside `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults (and rewriting the file) on any failure
    pub fn load(&self) -> GlobalSettings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Settings file not found, creating defaults");
                return self.reset_to_defaults();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read settings file, using defaults");
                return self.reset_to_defaults();
            }
        };

        match GlobalSettings::from_json(&contents) {
            Ok((settings, repaired)) => {
                if !repaired.is_empty() {
                    // Write the repaired record back so every key is present for future edits
                    info!(path = %self.path.display(), repaired = ?repaired, "Filling missing or invalid settings with defaults");
                    self.save_logged(&settings);
                }
                info!(path = %self.path.display(), "Loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Settings file is corrupt, replacing with defaults");
                self.reset_to_defaults()
            }
        }
    }

    /// Write settings as pretty-printed JSON, replacing the file atomically
    pub fn save(&self, settings: &GlobalSettings) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings to JSON")?;

        // Write to a sibling temp file then rename, so a crash never leaves half a file
        let temp_path = self.path.with_extension(format!("json.{TEMP_EXTENSION}"));
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write settings to {}", temp_path.display()))?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temporary settings file");
            }
            return Err(e)
                .with_context(|| format!("Failed to move settings into place at {}", self.path.display()));
        }

        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    fn reset_to_defaults(&self) -> GlobalSettings {
        let settings = GlobalSettings::default();
        self.save_logged(&settings);
        settings
    }

    fn save_logged(&self, settings: &GlobalSettings) {
        if let Err(e) = self.save(settings) {
            error!(error = ?e, "Failed to save settings");
        }
    }
}

/// Directory holding the settings, log and fence files.
/// Parent of the executable; platform config dir or "." as fallbacks.
pub fn install_dir() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => {
            if let Some(dir) = exe.parent() {
                return dir.to_path_buf();
            }
            warn!(exe = %exe.display(), "Executable has no parent directory");
        }
        Err(e) => warn!(error = %e, "Failed to locate running executable"),
    }

    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{FenceColor, Tint};
    use crate::config::LaunchEffect;
    use tempfile::TempDir;

    fn read_back(store: &ConfigStore) -> serde_json::Value {
        let contents = fs::read_to_string(store.path()).expect("settings file should exist");
        serde_json::from_str(&contents).expect("settings file should be valid JSON")
    }

    #[test]
    fn test_roundtrip_every_color_and_effect() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());

        for (color, effect) in FenceColor::ALL.into_iter().zip(LaunchEffect::ALL.into_iter().cycle()) {
            let settings = GlobalSettings {
                selected_color: color,
                launch_effect: effect,
                ..GlobalSettings::default()
            };
            store.save(&settings).unwrap();
            assert_eq!(store.load(), settings);
        }

        for effect in LaunchEffect::ALL {
            let settings = GlobalSettings {
                launch_effect: effect,
                ..GlobalSettings::default()
            };
            store.save(&settings).unwrap();
            assert_eq!(store.load(), settings);
        }
    }

    #[test]
    fn test_roundtrip_tint_boundaries_and_flags() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());

        for tint in [Tint::MIN, Tint::MAX] {
            let settings = GlobalSettings {
                snap_enabled: false,
                tint_value: tint,
                selected_color: FenceColor::Blue,
                log_enabled: true,
                single_click_to_launch: false,
                launch_effect: LaunchEffect::Rotate,
            };
            store.save(&settings).unwrap();
            assert_eq!(store.load(), settings);
        }
    }

    #[test]
    fn test_enums_written_by_name() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let settings = GlobalSettings {
            selected_color: FenceColor::Green,
            launch_effect: LaunchEffect::SlideUp,
            ..GlobalSettings::default()
        };
        store.save(&settings).unwrap();

        let json = read_back(&store);
        assert_eq!(json["selectedColor"], "Green");
        assert_eq!(json["launchEffect"], "SlideUp");
    }

    #[test]
    fn test_missing_file_creates_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        assert!(!store.path().exists());

        let settings = store.load();
        assert_eq!(settings, GlobalSettings::default());
        assert!(store.path().exists());
        assert_eq!(read_back(&store)["tintValue"], 85);
    }

    #[test]
    fn test_corrupt_file_replaced_with_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        fs::write(store.path(), "{ this is not json").unwrap();

        let settings = store.load();
        assert_eq!(settings, GlobalSettings::default());

        // A valid file exists afterwards
        let contents = fs::read_to_string(store.path()).unwrap();
        let (reloaded, repaired) = GlobalSettings::from_json(&contents).unwrap();
        assert_eq!(reloaded, GlobalSettings::default());
        assert!(repaired.is_empty());
    }

    #[test]
    fn test_missing_single_field_keeps_the_others() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let saved = GlobalSettings {
            snap_enabled: false,
            tint_value: Tint::clamped(33),
            selected_color: FenceColor::Black,
            log_enabled: true,
            single_click_to_launch: false,
            launch_effect: LaunchEffect::Bounce,
        };
        let defaults = GlobalSettings::default();

        for key in [
            "snapEnabled",
            "tintValue",
            "selectedColor",
            "logEnabled",
            "singleClickToLaunch",
            "launchEffect",
        ] {
            let mut json = serde_json::to_value(&saved).unwrap();
            json.as_object_mut().unwrap().remove(key);
            fs::write(store.path(), json.to_string()).unwrap();

            let mut expected = saved.clone();
            match key {
                "snapEnabled" => expected.snap_enabled = defaults.snap_enabled,
                "tintValue" => expected.tint_value = defaults.tint_value,
                "selectedColor" => expected.selected_color = defaults.selected_color,
                "logEnabled" => expected.log_enabled = defaults.log_enabled,
                "singleClickToLaunch" => expected.single_click_to_launch = defaults.single_click_to_launch,
                "launchEffect" => expected.launch_effect = defaults.launch_effect,
                _ => unreachable!(),
            }
            assert_eq!(store.load(), expected, "after removing {key}");
        }
    }

    #[test]
    fn test_repaired_fields_written_back() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        fs::write(store.path(), r#"{"tintValue": 20, "selectedColor": "Mauve"}"#).unwrap();

        let settings = store.load();
        assert_eq!(settings.tint_value.percent(), 20);
        assert_eq!(settings.selected_color, FenceColor::Gray);

        let json = read_back(&store);
        assert_eq!(json["tintValue"], 20);
        assert_eq!(json["selectedColor"], "Gray");
        assert_eq!(json["launchEffect"], "Zoom");
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        store.save(&GlobalSettings::default()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![FILENAME.to_string()]);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        // A non-empty directory at the target path cannot be replaced by a file
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("keep"), "").unwrap();

        assert!(store.save(&GlobalSettings::default()).is_err());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![FILENAME.to_string()]);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("deeper"));
        store.save(&GlobalSettings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the directory should be makes the write fail
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = ConfigStore::new(&blocker);

        assert!(store.save(&GlobalSettings::default()).is_err());
        // Loading still succeeds with defaults
        assert_eq!(store.load(), GlobalSettings::default());
    }
}
