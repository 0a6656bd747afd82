//! Core traits that decouple the switcher from the operating system.
//!
//! Every concrete backend (the `.app` bundle scanner, `sips`, `open` /
//! `osascript`, the JSON settings file, a test harness, …) implements one of
//! these traits.  The [`AppSwitcher`](crate::switcher::AppSwitcher) only
//! depends on these abstractions.

use crate::catalog::AppInfo;
use crate::icon::IconError;
use crate::settings::{Settings, SettingsError};
use image::RgbaImage;
use std::path::Path;

/// A source of launchable applications.
///
/// # Contract
///
/// * The returned list may be empty.
/// * No two entries share a `bundle_id`.
/// * The order is the display order.
pub trait AppSource {
    /// Enumerate the applications, in display order.
    fn apps(&self) -> Vec<AppInfo>;
}

/// Turns an application's icon file into a square raster.
///
/// Failure is expected and never fatal: the caller falls back to a text
/// label.
pub trait IconRasterizer {
    /// Rasterize the icon at `source` to exactly `size × size` pixels.
    ///
    /// `key` is a stable, filesystem-safe name for any scratch files the
    /// implementation needs (the bundle identifier).
    fn rasterize(&self, source: &Path, key: &str, size: u32) -> Result<RgbaImage, IconError>;
}

/// Performs OS-level side effects on behalf of activated controls.
///
/// Both calls are fire-and-forget: implementations report failures through
/// the log, never to the caller.
pub trait ActionExecutor {
    /// Launch `app`.
    fn launch(&self, app: &AppInfo);

    /// Ask `app` to quit.
    fn quit(&self, app: &AppInfo);
}

/// Persists the user's app selection.
pub trait SettingsStore {
    /// Load the stored settings.
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Replace the stored settings with `settings`.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// What the window should do after a control was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep the window open.
    Stay,
    /// Open the settings window.
    OpenSettings,
    /// Close the window and exit.
    Close,
}

/// A row control that does something when clicked or activated from the
/// keyboard.
///
/// Each control kind implements this itself, so activating the focused
/// control is a single dynamic call.
pub trait Activatable {
    /// Run the control's action once and report what the window should do
    /// next.
    fn activate(&self, executor: &dyn ActionExecutor) -> Outcome;
}
