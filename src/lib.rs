//! **appswitcher** — a single-row application launcher.
//!
//! The switcher scans a directory of `.app` bundles, shows one square button
//! per app (plus a settings button) in a window, and on selection launches
//! the chosen app and asks every other listed app to quit.
//!
//! # Architecture
//!
//! Two pure pieces of logic sit at the core:
//!
//! * [`layout::compute_layout`] — sizes the row's squares to fit a width
//!   budget, never shrinking below a floor.
//! * [`focus::next_focus_index`] — arrow-key focus traversal with
//!   wraparound.
//!
//! [`switcher::AppSwitcher`] is the application context that owns the row
//! and the focus and reacts to [`command::Command`]s.  Everything that
//! touches the operating system sits behind a trait in [`traits`]:
//!
//! * [`traits::AppSource`] — implemented by [`catalog::BundleScanner`].
//! * [`traits::IconRasterizer`] — implemented by [`icon::SipsRasterizer`].
//! * [`traits::ActionExecutor`] — implemented by [`launcher::ProcessLauncher`].
//! * [`traits::SettingsStore`] — implemented by [`settings::JsonSettingsStore`].
//!
//! The GTK window lives in [`ui`] behind the `ui-gtk` feature.

pub mod catalog;
pub mod command;
pub mod config;
pub mod focus;
pub mod icon;
pub mod launcher;
pub mod layout;
pub mod settings;
pub mod switcher;
pub mod traits;
pub mod ui;
