//! GTK4 window that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window                         ("App Switcher", fixed size)
//! └ .switcher-row              (horizontal GtkBox)
//!     ├ .app-button            (icon picture, or the app name as label)
//!     ├ …
//!     └ .settings-button       (not focusable)
//! ```
//!
//! # CSS selectors
//!
//! | Selector             | Targets                                 |
//! |----------------------|-----------------------------------------|
//! | `.switcher-row`      | The row container                       |
//! | `.app-button`        | Every app button                        |
//! | `.app-button:focus`  | The app button holding keyboard focus   |
//! | `.settings-button`   | The settings button at the row's end    |
//!
//! All keyboard input is captured on the window and turned into
//! [`Command`]s for the [`AppSwitcher`]; GTK's own focus chain only decides
//! which widget is drawn focused.

use crate::catalog::AppInfo;
use crate::command::Command;
use crate::config::Config;
use crate::layout::max_row_width;
use crate::settings::{load_or_default, Settings};
use crate::switcher::{AppSwitcher, SwitcherError};
use crate::traits::{ActionExecutor, AppSource, IconRasterizer, Outcome, SettingsStore};
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use image::RgbaImage;
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Display width assumed when GDK reports no monitor.
const FALLBACK_SCREEN_WIDTH: u32 = 1280;

const SETTINGS_ICON: &str = "preferences-system-symbolic";

//  Default CSS

const DEFAULT_CSS: &str = r#"
.switcher-row {
    padding: 0;
}

.app-button,
.settings-button {
    padding: 6px;
    margin: 0;
    border-radius: 8px;
}

.app-button:focus {
    background-color: alpha(@accent_bg_color, 0.35);
}
"#;

/// Errors that prevent the window from opening.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("failed to initialise GTK4: {0}")]
    Init(#[from] glib::BoolError),

    #[error(transparent)]
    Switcher(#[from] SwitcherError),
}

/// Collaborators the window needs besides the action executor.
pub struct Services {
    pub source: Box<dyn AppSource>,
    pub rasterizer: Box<dyn IconRasterizer>,
    pub store: Box<dyn SettingsStore>,
}

/// Everything the signal handlers share.  Lives on the main thread only.
struct Ui<X: ActionExecutor> {
    switcher: AppSwitcher<X>,
    services: Services,
    settings: Settings,
    max_width: u32,
    window: gtk4::Window,
    row: gtk4::Box,
    buttons: Vec<gtk4::Button>,
}

type Shared<X> = Rc<RefCell<Ui<X>>>;

//  Public API

/// Open the switcher window and run the GLib main loop on the **current**
/// (main) thread until the window closes.
pub fn run_main_loop<X: ActionExecutor + 'static>(
    executor: X,
    services: Services,
    config: Config,
    css_path: Option<PathBuf>,
) -> Result<(), UiError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");

    load_css(&css_path);

    let screen_width = screen_width().unwrap_or_else(|| {
        warn!("no monitor reported, assuming {}px", FALLBACK_SCREEN_WIDTH);
        FALLBACK_SCREEN_WIDTH
    });
    let max_width = max_row_width(screen_width, config.layout.screen_width_ratio);
    debug!("screen {}px, row budget {}px", screen_width, max_width);

    let settings = load_or_default(services.store.as_ref());
    let apps = settings.filter(services.source.apps());
    let switcher = AppSwitcher::new(apps, executor, &config, max_width)?;

    //  Window
    let window = gtk4::Window::new();
    window.set_title(Some("App Switcher"));
    window.set_resizable(false);

    let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
    row.add_css_class("switcher-row");
    row.set_halign(gtk4::Align::Center);
    row.set_valign(gtk4::Align::Center);
    window.set_child(Some(&row));

    let ui: Shared<X> = Rc::new(RefCell::new(Ui {
        switcher,
        services,
        settings,
        max_width,
        window: window.clone(),
        row,
        buttons: Vec::new(),
    }));

    rebuild_row(&ui);

    //  Keyboard
    let keys = gtk4::EventControllerKey::new();
    keys.set_propagation_phase(gtk4::PropagationPhase::Capture);
    {
        let ui = Rc::clone(&ui);
        keys.connect_key_pressed(move |_, key, _, _| {
            let Some(cmd) = key.name().and_then(|n| Command::from_key_name(n.as_str())) else {
                return glib::Propagation::Proceed;
            };
            debug!("key {:?} -> {}", key.name(), cmd);
            dispatch(&ui, cmd);
            glib::Propagation::Stop
        });
    }
    window.add_controller(keys);

    //  Main loop
    let main_loop = glib::MainLoop::new(None, false);
    {
        let main_loop = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("window closed");
            main_loop.quit();
            glib::Propagation::Proceed
        });
    }

    window.present();
    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

//  Command dispatch

/// Run `cmd` through the switcher, then act on the outcome with no borrow
/// held (focus changes and window teardown re-enter the handlers).
fn dispatch<X: ActionExecutor + 'static>(ui: &Shared<X>, cmd: Command) {
    let (result, focus) = {
        let mut u = ui.borrow_mut();
        let result = u.switcher.handle(cmd);
        let focus = u
            .switcher
            .focused_index()
            .and_then(|i| u.buttons.get(i).cloned());
        (result, focus)
    };

    match result {
        Ok(Outcome::Stay) => {
            if let Some(button) = focus {
                button.grab_focus();
            }
        }
        Ok(Outcome::OpenSettings) => open_settings(ui),
        Ok(Outcome::Close) => {
            let window = ui.borrow().window.clone();
            window.close();
        }
        Err(e) => error!("command error: {}", e),
    }
}

//  Row

/// Replace the row's widgets with buttons for the switcher's current apps
/// and resize the window to the switcher's layout.
fn rebuild_row<X: ActionExecutor + 'static>(ui: &Shared<X>) {
    let (row, window, apps, layout) = {
        let u = ui.borrow();
        let apps: Vec<AppInfo> = u.switcher.buttons().iter().map(|b| b.app().clone()).collect();
        (u.row.clone(), u.window.clone(), apps, u.switcher.layout())
    };

    while let Some(child) = row.first_child() {
        row.remove(&child);
    }

    let mut buttons = Vec::with_capacity(apps.len());
    for (index, app) in apps.iter().enumerate() {
        let button = app_button(ui.borrow().services.rasterizer.as_ref(), app, layout.item_size);
        connect_click(ui, &button, index);
        connect_focus_tracking(ui, &button, index);
        row.append(&button);
        buttons.push(button);
    }

    let settings = settings_button(layout.item_size);
    connect_click(ui, &settings, apps.len());
    row.append(&settings);

    let size = i32::try_from(layout.item_size).unwrap_or(i32::MAX);
    let width = i32::try_from(layout.total_width).unwrap_or(i32::MAX);
    window.set_default_size(width, size);
    info!("row rebuilt: {} button(s), window {}x{}", buttons.len() + 1, width, size);

    let first = buttons.first().cloned();
    ui.borrow_mut().buttons = buttons;
    if let Some(button) = first {
        button.grab_focus();
    }
}

fn app_button(rasterizer: &dyn IconRasterizer, app: &AppInfo, size: u32) -> gtk4::Button {
    let button = gtk4::Button::new();
    button.add_css_class("app-button");
    let px = i32::try_from(size).unwrap_or(i32::MAX);
    button.set_size_request(px, px);
    button.set_tooltip_text(Some(app.name.as_str()));

    match app
        .icon_path
        .as_deref()
        .map(|path| rasterizer.rasterize(path, &app.bundle_id, size))
    {
        Some(Ok(img)) => button.set_child(Some(&picture(img))),
        Some(Err(e)) => {
            debug!("no icon for {} ({}), using label", app.name, e);
            button.set_label(&app.name);
        }
        None => button.set_label(&app.name),
    }
    button
}

fn settings_button(size: u32) -> gtk4::Button {
    let px = i32::try_from(size).unwrap_or(i32::MAX);
    let image = gtk4::Image::from_icon_name(SETTINGS_ICON);
    image.set_pixel_size(px / 2);

    let button = gtk4::Button::new();
    button.add_css_class("settings-button");
    button.set_child(Some(&image));
    button.set_size_request(px, px);
    button.set_focusable(false);
    button.set_tooltip_text(Some("Settings"));
    button
}

fn picture(img: RgbaImage) -> gtk4::Picture {
    let (w, h) = img.dimensions();
    let stride = w as usize * 4;
    let bytes = glib::Bytes::from_owned(img.into_raw());
    let texture = gdk::MemoryTexture::new(
        w as i32,
        h as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        stride,
    );
    let picture = gtk4::Picture::for_paintable(&texture);
    picture.set_can_shrink(true);
    picture
}

fn connect_click<X: ActionExecutor + 'static>(ui: &Shared<X>, button: &gtk4::Button, index: usize) {
    let ui = Rc::clone(ui);
    button.connect_clicked(move |_| dispatch(&ui, Command::ActivateAt(index)));
}

/// Keep the switcher's focus in step with GTK's when focus moves by Tab or
/// by pointer.
fn connect_focus_tracking<X: ActionExecutor + 'static>(
    ui: &Shared<X>,
    button: &gtk4::Button,
    index: usize,
) {
    let focus = gtk4::EventControllerFocus::new();
    let ui = Rc::clone(ui);
    focus.connect_enter(move |_| {
        // Already borrowed when the switcher itself moved the focus.
        if let Ok(mut u) = ui.try_borrow_mut() {
            u.switcher.focus_at(index);
        }
    });
    button.add_controller(focus);
}

//  Settings window

/// Show one checkbox per installed app; Save persists the selection and
/// repopulates the row.
fn open_settings<X: ActionExecutor + 'static>(ui: &Shared<X>) {
    let (apps, settings, parent) = {
        let u = ui.borrow();
        (u.services.source.apps(), u.settings.clone(), u.window.clone())
    };
    info!("opening settings ({} app(s))", apps.len());

    let win = gtk4::Window::new();
    win.set_title(Some("Settings"));
    win.set_default_size(300, 400);
    win.set_transient_for(Some(&parent));

    let list = gtk4::Box::new(gtk4::Orientation::Vertical, 4);
    list.set_margin_top(8);
    list.set_margin_bottom(8);
    list.set_margin_start(8);
    list.set_margin_end(8);

    // An empty selection shows everything, so every box starts ticked.
    let show_all = settings.selected().is_empty();
    let checks: Vec<gtk4::CheckButton> = apps
        .iter()
        .map(|app| {
            let check = gtk4::CheckButton::with_label(&app.name);
            check.set_active(show_all || settings.is_selected(&app.bundle_id));
            list.append(&check);
            check
        })
        .collect();

    let save = gtk4::Button::with_label("Save");
    list.append(&save);

    let scroller = gtk4::ScrolledWindow::new();
    scroller.set_child(Some(&list));
    win.set_child(Some(&scroller));

    {
        let ui = Rc::clone(ui);
        let win = win.clone();
        save.connect_clicked(move |_| {
            let checked: Vec<bool> = checks.iter().map(|c| c.is_active()).collect();
            save_selection(&ui, Settings::from_checked(&apps, &checked));
            win.close();
        });
    }

    let keys = gtk4::EventControllerKey::new();
    keys.set_propagation_phase(gtk4::PropagationPhase::Capture);
    {
        let win = win.clone();
        keys.connect_key_pressed(move |_, key, _, _| {
            let cmd = key.name().and_then(|n| Command::from_key_name(n.as_str()));
            if cmd != Some(Command::Activate) {
                return glib::Propagation::Proceed;
            }
            if let Some(focused) = GtkWindowExt::focus(&win) {
                focused.activate();
            }
            glib::Propagation::Stop
        });
    }
    win.add_controller(keys);

    win.present();
}

fn save_selection<X: ActionExecutor + 'static>(ui: &Shared<X>, selection: Settings) {
    let result = {
        let mut u = ui.borrow_mut();
        if let Err(e) = u.services.store.save(&selection) {
            warn!("failed to save settings: {}", e);
        }
        let apps = selection.filter(u.services.source.apps());
        u.settings = selection;
        let max_width = u.max_width;
        u.switcher.repopulate(apps, max_width)
    };
    match result {
        Ok(()) => rebuild_row(ui),
        Err(e) => error!("failed to repopulate row: {}", e),
    }
}

//  Display

/// Width of the first monitor, in logical pixels.
fn screen_width() -> Option<u32> {
    let display = gdk::Display::default()?;
    let monitor = display
        .monitors()
        .item(0)?
        .downcast::<gdk::Monitor>()
        .ok()?;
    u32::try_from(monitor.geometry().width()).ok()
}

//  CSS loading

fn load_css(css_path: &Option<PathBuf>) {
    let provider = gtk4::CssProvider::new();

    let css_content = match css_path.as_ref().filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                content
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                DEFAULT_CSS.to_string()
            }
        },
        None => {
            debug!("no user CSS, using built-in default");
            DEFAULT_CSS.to_string()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}
