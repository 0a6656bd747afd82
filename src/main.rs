//! Entry point for **appswitcher**.
//!
//! Loads the optional config file, then hands control to the front end.
//!
//! When the `ui-gtk` feature is enabled the main thread runs the GLib main
//! loop and the process exits when the window closes.  Without the feature,
//! commands are read from stdin one per line instead.

use appswitcher::catalog::BundleScanner;
use appswitcher::config::Config;
use appswitcher::launcher::ProcessLauncher;
use appswitcher::settings::JsonSettingsStore;
use log::info;

/// Resolve the config directory (`$XDG_CONFIG_HOME/appswitcher`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("appswitcher")
}

/// Try to load the config from `$XDG_CONFIG_HOME/appswitcher/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();
    let scanner = BundleScanner::new(&config.apps_dir);
    info!("scanning {}", scanner.dir().display());

    start_ui(config, scanner, ProcessLauncher::new(), JsonSettingsStore::in_home());
}

//  Front ends

#[cfg(feature = "ui-gtk")]
fn start_ui(
    config: Config,
    scanner: BundleScanner,
    launcher: ProcessLauncher,
    store: JsonSettingsStore,
) {
    use appswitcher::icon::SipsRasterizer;
    use appswitcher::ui::gtk::{run_main_loop, Services};

    let services = Services {
        source: Box::new(scanner),
        rasterizer: Box::new(SipsRasterizer::new()),
        store: Box::new(store),
    };
    let css_path = config_dir().join("style.css");
    if let Err(e) = run_main_loop(launcher, services, config, Some(css_path)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Display width assumed when there is no display to ask.
#[cfg(not(feature = "ui-gtk"))]
const HEADLESS_SCREEN_WIDTH: u32 = 1920;

#[cfg(not(feature = "ui-gtk"))]
fn start_ui(
    config: Config,
    scanner: BundleScanner,
    launcher: ProcessLauncher,
    store: JsonSettingsStore,
) {
    use appswitcher::command::Command;
    use appswitcher::layout::max_row_width;
    use appswitcher::settings::load_or_default;
    use appswitcher::switcher::AppSwitcher;
    use appswitcher::traits::{AppSource, Outcome};
    use log::{error, warn};

    let settings = load_or_default(&store);
    let apps = settings.filter(scanner.apps());
    let max_width = max_row_width(HEADLESS_SCREEN_WIDTH, config.layout.screen_width_ratio);
    let mut switcher = match AppSwitcher::new(apps, launcher, &config, max_width) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("running headless, reading commands from stdin");
    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let cmd: Command = match line.parse() {
            Ok(c) => c,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        match switcher.handle(cmd) {
            Ok(Outcome::Stay) => {
                let focused = switcher
                    .focused_index()
                    .map(|i| switcher.buttons()[i].app().name.as_str());
                info!("focused: {}", focused.unwrap_or("<none>"));
            }
            Ok(Outcome::OpenSettings) => {
                warn!("the settings window needs the `ui-gtk` feature");
            }
            Ok(Outcome::Close) => break,
            Err(e) => error!("command error: {}", e),
        }
    }
    info!("exiting");
}
