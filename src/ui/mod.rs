//! Window front ends for the switcher.
//!
//! When the `ui-gtk` feature is enabled, [`gtk::run_main_loop`] takes over
//! the main thread and drives the switcher from GTK input events.

#[cfg(feature = "ui-gtk")]
pub mod gtk;
