//! The application context that ties the row, focus, and action executor
//! together.
//!
//! [`AppSwitcher`] owns the row of controls and the keyboard focus, and
//! reacts to [`Command`]s by moving focus or activating controls through the
//! [`Activatable`] trait.  It never touches GTK, so every front end (and every
//! test) drives it the same way.

use crate::catalog::AppInfo;
use crate::command::Command;
use crate::config::Config;
use crate::focus::{next_focus_index, Selectable};
use crate::layout::{compute_layout, Layout, LayoutError};
use crate::traits::{ActionExecutor, Activatable, Outcome};
use log::{debug, info};

/// Key of the settings button.
pub const SETTINGS_KEY: &str = "appswitcher.settings";

/// Possible errors from the switcher.
#[derive(Debug, thiserror::Error)]
pub enum SwitcherError {
    /// A pointer tap named a control that is not in the row.
    #[error("no control at index {index} (row has {len})")]
    NoSuchItem { index: usize, len: usize },

    /// The row could not be sized.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Row control that launches one app.
#[derive(Debug, Clone)]
pub struct AppButton {
    app: AppInfo,
    /// Apps asked to quit after this one launches.
    others: Vec<AppInfo>,
}

impl AppButton {
    pub fn app(&self) -> &AppInfo {
        &self.app
    }
}

impl Selectable for AppButton {
    fn key(&self) -> &str {
        &self.app.bundle_id
    }
}

impl Activatable for AppButton {
    fn activate(&self, executor: &dyn ActionExecutor) -> Outcome {
        info!("launching {}", self.app.name);
        executor.launch(&self.app);
        for other in &self.others {
            executor.quit(other);
        }
        Outcome::Close
    }
}

/// Row control that opens the settings window.
///
/// Not focusable: it is reached by pointer or the `S` key, never by the
/// arrow keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsButton;

impl Selectable for SettingsButton {
    fn key(&self) -> &str {
        SETTINGS_KEY
    }

    fn is_focusable(&self) -> bool {
        false
    }
}

impl Activatable for SettingsButton {
    fn activate(&self, _: &dyn ActionExecutor) -> Outcome {
        Outcome::OpenSettings
    }
}

/// Anything that can sit in the row.
pub trait RowItem: Selectable + Activatable {}

impl<T: Selectable + Activatable> RowItem for T {}

/// Owns the row, the focus, and the executor.
///
/// # Typical usage
///
/// ```ignore
/// let mut switcher = AppSwitcher::new(apps, ProcessLauncher::new(), &config, 1536)?;
/// switcher.handle(Command::Focus(Direction::Right))?;
/// if switcher.handle(Command::Activate)? == Outcome::Close { /* exit */ }
/// ```
pub struct AppSwitcher<X: ActionExecutor> {
    executor: X,
    buttons: Vec<AppButton>,
    settings_button: SettingsButton,
    focused: Option<String>,
    layout: Layout,
    base_size: u32,
    min_size: u32,
    quit_others: bool,
}

impl<X: ActionExecutor> AppSwitcher<X> {
    /// Build the row for `apps` and size it for a `max_width` budget.
    ///
    /// Focus starts on the first app, if there is one.
    pub fn new(
        apps: Vec<AppInfo>,
        executor: X,
        config: &Config,
        max_width: u32,
    ) -> Result<Self, SwitcherError> {
        let mut switcher = Self {
            executor,
            buttons: Vec::new(),
            settings_button: SettingsButton,
            focused: None,
            layout: Layout {
                item_size: config.layout.base_size,
                total_width: 0,
            },
            base_size: config.layout.base_size,
            min_size: config.layout.min_size,
            quit_others: config.quit_others,
        };
        switcher.repopulate(apps, max_width)?;
        Ok(switcher)
    }

    /// Replace the row with buttons for `apps` and recompute the layout.
    ///
    /// Focus resets to the first app.
    pub fn repopulate(&mut self, apps: Vec<AppInfo>, max_width: u32) -> Result<(), SwitcherError> {
        // One extra slot for the settings button.
        let count = u32::try_from(apps.len() + 1).unwrap_or(u32::MAX);
        self.layout = compute_layout(count, self.base_size, max_width, self.min_size)?;

        self.buttons = apps
            .iter()
            .map(|app| AppButton {
                app: app.clone(),
                others: if self.quit_others {
                    apps.iter()
                        .filter(|o| o.bundle_id != app.bundle_id)
                        .cloned()
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect();
        self.focused = self.buttons.first().map(|b| b.key().to_string());

        info!(
            "row: {} app(s), {}px buttons, {}px wide",
            self.buttons.len(),
            self.layout.item_size,
            self.layout.total_width
        );
        Ok(())
    }

    /// Process a single [`Command`] and report what the window should do.
    pub fn handle(&mut self, cmd: Command) -> Result<Outcome, SwitcherError> {
        match cmd {
            Command::Focus(dir) => {
                let next = next_focus_index(&self.buttons, self.focused.as_deref(), dir.delta());
                match next {
                    Some(idx) => {
                        debug!("focus {} -> {}", dir, self.buttons[idx].key());
                        self.focused = Some(self.buttons[idx].key().to_string());
                    }
                    None => debug!("focus {}: no apps", dir),
                }
                Ok(Outcome::Stay)
            }

            Command::Activate => match self.focused_index() {
                Some(idx) => Ok(self.buttons[idx].activate(&self.executor)),
                None => {
                    debug!("activate: nothing focused");
                    Ok(Outcome::Stay)
                }
            },

            Command::ActivateAt(index) => {
                let len = self.len();
                let item = self
                    .item(index)
                    .ok_or(SwitcherError::NoSuchItem { index, len })?;
                debug!("activate {} ({})", index, item.key());
                Ok(item.activate(&self.executor))
            }

            Command::OpenSettings => Ok(self.settings_button.activate(&self.executor)),

            Command::Close => {
                info!("closing without launching");
                Ok(Outcome::Close)
            }
        }
    }

    /// Number of controls in the row, including the settings button.
    pub fn len(&self) -> usize {
        self.buttons.len() + 1
    }

    /// Always `false`: the settings button is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The control at `index`, in display order.
    pub fn item(&self, index: usize) -> Option<&dyn RowItem> {
        match index.cmp(&self.buttons.len()) {
            std::cmp::Ordering::Less => Some(&self.buttons[index]),
            std::cmp::Ordering::Equal => Some(&self.settings_button),
            std::cmp::Ordering::Greater => None,
        }
    }

    /// Every control, in display order.
    pub fn items(&self) -> impl Iterator<Item = &dyn RowItem> {
        (0..self.len()).filter_map(move |i| self.item(i))
    }

    /// The app buttons, in display order.
    pub fn buttons(&self) -> &[AppButton] {
        &self.buttons
    }

    /// Record that the app button at `index` received focus by other means
    /// (Tab traversal, a pointer click).  Returns `false` and leaves focus
    /// unchanged when `index` is not an app button.
    pub fn focus_at(&mut self, index: usize) -> bool {
        match self.buttons.get(index) {
            Some(b) => {
                self.focused = Some(b.key().to_string());
                true
            }
            None => false,
        }
    }

    /// Position of the focused app button.
    pub fn focused_index(&self) -> Option<usize> {
        let key = self.focused.as_deref()?;
        self.buttons.iter().position(|b| b.key() == key)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }
}

//  Tests
