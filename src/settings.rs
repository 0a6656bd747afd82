//! Persisted app selection.
//!
//! The selection lives in `$HOME/.macos_app_switcher_settings.json`:
//!
//! ```json
//! { "selected_apps": ["com.example.notes", "com.example.recorder"] }
//! ```
//!
//! An empty selection means "show every app".

use crate::catalog::AppInfo;
use crate::traits::SettingsStore;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of the settings file inside the home directory.
pub const SETTINGS_FILE_NAME: &str = ".macos_app_switcher_settings.json";

/// The user's app selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Bundle ids to show, without duplicates.  Empty shows all apps.
    #[serde(default, deserialize_with = "dedup_ids")]
    selected_apps: Vec<String>,
}

fn dedup_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(dedup(ids))
}

fn dedup(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

impl Settings {
    /// Build settings from a list of bundle ids; later duplicates are
    /// dropped.
    pub fn new(selected: impl IntoIterator<Item = String>) -> Self {
        Self {
            selected_apps: dedup(selected),
        }
    }

    /// Build settings from the settings window's checkboxes.
    ///
    /// `checked[i]` says whether `apps[i]` is ticked.
    pub fn from_checked(apps: &[AppInfo], checked: &[bool]) -> Self {
        Self::new(
            apps.iter()
                .zip(checked)
                .filter(|(_, &on)| on)
                .map(|(app, _)| app.bundle_id.clone()),
        )
    }

    /// Selected bundle ids, in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected_apps
    }

    /// Whether `bundle_id` is selected.
    pub fn is_selected(&self, bundle_id: &str) -> bool {
        self.selected_apps.iter().any(|id| id == bundle_id)
    }

    /// Keep the apps that should appear in the row, in `apps` order.
    ///
    /// An empty selection keeps everything.
    pub fn filter(&self, apps: Vec<AppInfo>) -> Vec<AppInfo> {
        if self.selected_apps.is_empty() {
            return apps;
        }
        apps.into_iter()
            .filter(|app| self.is_selected(&app.bundle_id))
            .collect()
    }
}

/// Errors from loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No settings have been saved yet.
    #[error("{0} does not exist")]
    NotFound(PathBuf),

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// [`SettingsStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$HOME/.macos_app_switcher_settings.json`.
    pub fn in_home() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Self::new(PathBuf::from(home).join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SettingsError::NotFound(self.path.clone())
            } else {
                SettingsError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_err = |source: std::io::Error| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json + "\n").map_err(io_err)
    }
}

/// Load settings from `store`, falling back to "show all apps" on any
/// failure.
pub fn load_or_default(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(s) => {
            info!("loaded selection of {} app(s)", s.selected().len());
            s
        }
        Err(e @ SettingsError::NotFound(_)) => {
            info!("no saved settings ({}), showing all apps", e);
            Settings::default()
        }
        Err(e) => {
            warn!("{}; showing all apps", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str) -> AppInfo {
        AppInfo {
            name: id.into(),
            bundle_id: id.into(),
            icon_path: None,
            path: PathBuf::from(format!("/Applications/{}.app", id)),
        }
    }

    fn ids(apps: &[AppInfo]) -> Vec<&str> {
        apps.iter().map(|a| a.bundle_id.as_str()).collect()
    }

    #[test]
    fn empty_selection_shows_everything() {
        let apps = vec![app("a"), app("b")];
        assert_eq!(ids(&Settings::default().filter(apps)), vec!["a", "b"]);
    }

    #[test]
    fn filter_keeps_scan_order() {
        let s = Settings::new(vec!["c".to_string(), "a".to_string()]);
        let apps = vec![app("a"), app("b"), app("c")];
        assert_eq!(ids(&s.filter(apps)), vec!["a", "c"]);
    }

    #[test]
    fn selection_of_vanished_apps_shows_nothing() {
        let s = Settings::new(vec!["gone".to_string()]);
        assert!(s.filter(vec![app("a")]).is_empty());
    }

    #[test]
    fn duplicates_are_dropped() {
        let s = Settings::new(["a", "b", "a"].map(String::from));
        assert_eq!(s.selected(), ["a", "b"]);
        let parsed: Settings =
            serde_json::from_str(r#"{"selected_apps":["x","x","y"]}"#).unwrap();
        assert_eq!(parsed.selected(), ["x", "y"]);
    }

    #[test]
    fn null_and_missing_selection_parse_as_empty() {
        let a: Settings = serde_json::from_str(r#"{"selected_apps":null}"#).unwrap();
        let b: Settings = serde_json::from_str("{}").unwrap();
        assert!(a.selected().is_empty());
        assert!(b.selected().is_empty());
    }

    #[test]
    fn from_checked_follows_checkboxes() {
        let apps = vec![app("a"), app("b"), app("c")];
        let s = Settings::from_checked(&apps, &[true, false, true]);
        assert_eq!(s.selected(), ["a", "c"]);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(tmp.path().join("nested").join("s.json"));
        let s = Settings::new(vec!["com.example.a".to_string()]);
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"selected_apps\""));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(tmp.path().join("none.json"));
        assert!(matches!(store.load(), Err(SettingsError::NotFound(_))));
        assert_eq!(load_or_default(&store), Settings::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("s.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonSettingsStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));
        assert_eq!(load_or_default(&store), Settings::default());
    }
}
