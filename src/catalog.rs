//! Application enumeration from a directory of `.app` bundles.
//!
//! [`BundleScanner`] implements [`AppSource`] by reading each bundle's
//! `Contents/Info.plist`.  Both XML and binary plists are accepted.

use crate::traits::AppSource;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directory scanned when no config file overrides it.
pub const DEFAULT_APPS_DIR: &str = "/Applications/Transcrib";

/// One launchable application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Display name (`CFBundleName`, or the bundle directory name).
    pub name: String,
    /// Bundle identifier (`CFBundleIdentifier`); unique within a scan.
    pub bundle_id: String,
    /// Path to the `.icns` file, if the bundle declares one.
    pub icon_path: Option<PathBuf>,
    /// Path to the `.app` bundle directory.
    pub path: PathBuf,
}

/// Subset of `Info.plist` keys we care about.
#[derive(Deserialize)]
struct InfoPlist {
    #[serde(rename = "CFBundleName")]
    name: Option<String>,
    #[serde(rename = "CFBundleIdentifier")]
    bundle_id: Option<String>,
    #[serde(rename = "CFBundleIconFile")]
    icon_file: Option<String>,
}

/// Errors from reading a single bundle.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// `Info.plist` is missing or unreadable.
    #[error("cannot read {path}: {source}")]
    Plist {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    /// The bundle has no `CFBundleIdentifier`.
    #[error("{0} has no bundle identifier")]
    MissingBundleId(PathBuf),
}

/// Scans a directory for `.app` bundles.
#[derive(Debug, Clone)]
pub struct BundleScanner {
    dir: PathBuf,
}

impl Default for BundleScanner {
    fn default() -> Self {
        Self::new(DEFAULT_APPS_DIR)
    }
}

impl BundleScanner {
    /// Create a scanner for `dir`.  Nothing is read until
    /// [`apps`](AppSource::apps) is called.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this scanner reads.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Read one bundle's `Info.plist` into an [`AppInfo`].
pub fn read_bundle(bundle: &Path) -> Result<AppInfo, CatalogError> {
    let plist_path = bundle.join("Contents").join("Info.plist");
    let info: InfoPlist = plist::from_file(&plist_path).map_err(|source| CatalogError::Plist {
        path: plist_path.clone(),
        source,
    })?;

    let bundle_id = info
        .bundle_id
        .ok_or_else(|| CatalogError::MissingBundleId(bundle.to_path_buf()))?;

    let name = info.name.unwrap_or_else(|| {
        bundle
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
            .trim_end_matches(".app")
            .to_string()
    });

    let icon_path = info.icon_file.map(|file| {
        let file = if file.ends_with(".icns") {
            file
        } else {
            format!("{}.icns", file)
        };
        bundle.join("Contents").join("Resources").join(file)
    });

    Ok(AppInfo {
        name,
        bundle_id,
        icon_path,
        path: bundle.to_path_buf(),
    })
}

impl AppSource for BundleScanner {
    fn apps(&self) -> Vec<AppInfo> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("cannot list {}: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut bundles: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(".app"))
            })
            .collect();
        bundles.sort();

        let mut seen = HashSet::new();
        let mut apps = Vec::with_capacity(bundles.len());
        for bundle in bundles {
            match read_bundle(&bundle) {
                Ok(app) => {
                    if seen.insert(app.bundle_id.clone()) {
                        apps.push(app);
                    } else {
                        warn!(
                            "skipping {}: duplicate bundle id {}",
                            bundle.display(),
                            app.bundle_id
                        );
                    }
                }
                Err(e) => debug!("skipping bundle: {}", e),
            }
        }
        debug!("found {} app(s) in {}", apps.len(), self.dir.display());
        apps
    }
}
