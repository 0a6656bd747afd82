//! [`ActionExecutor`] implementation that shells out to macOS tools.
//!
//! Apps are launched with `open <bundle>` and asked to quit with
//! `osascript -e 'tell application "<name>" to quit'`.  Each call waits for
//! the tool to return; failures and non-zero exit codes are logged and
//! otherwise ignored.

use crate::catalog::AppInfo;
use crate::traits::ActionExecutor;
use log::{debug, warn};
use std::ffi::OsStr;
use std::process::{Command, Stdio};

/// Launches and quits apps through `open` and `osascript`.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    open: String,
    osascript: String,
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher {
    /// Use `open` and `osascript` from `PATH`.
    pub fn new() -> Self {
        Self {
            open: "open".into(),
            osascript: "osascript".into(),
        }
    }

    /// Override both programs.
    pub fn with_programs(open: impl Into<String>, osascript: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            osascript: osascript.into(),
        }
    }
}

/// AppleScript that asks `name` to quit.
pub fn quit_script(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("tell application \"{}\" to quit", escaped)
}

/// Run `program args…`, log the outcome, and report whether it succeeded.
fn run<I, S>(program: &str, args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    match Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => {
            debug!("{} ok", program);
            true
        }
        Ok(status) => {
            warn!("{} exited with {}", program, status);
            false
        }
        Err(e) => {
            warn!("failed to run {}: {}", program, e);
            false
        }
    }
}

impl ActionExecutor for ProcessLauncher {
    fn launch(&self, app: &AppInfo) {
        debug!("launching {} ({})", app.name, app.path.display());
        run(&self.open, [app.path.as_os_str()]);
    }

    fn quit(&self, app: &AppInfo) {
        debug!("quitting {}", app.name);
        run(&self.osascript, ["-e".to_string(), quit_script(&app.name)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn app() -> AppInfo {
        AppInfo {
            name: "Notes".into(),
            bundle_id: "com.example.notes".into(),
            icon_path: None,
            path: PathBuf::from("/Applications/Transcrib/Notes.app"),
        }
    }

    #[test]
    fn quit_script_quotes_the_name() {
        assert_eq!(quit_script("Notes"), r#"tell application "Notes" to quit"#);
    }

    #[test]
    fn quit_script_escapes_quotes_and_backslashes() {
        assert_eq!(
            quit_script(r#"Say "Hi"\"#),
            r#"tell application "Say \"Hi\"\\" to quit"#
        );
    }

    #[test]
    fn missing_programs_are_swallowed() {
        let l = ProcessLauncher::with_programs("appswitcher-no-open", "appswitcher-no-osascript");
        l.launch(&app());
        l.quit(&app());
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_exit_status() {
        assert!(run("true", ["x"]));
        assert!(!run("false", ["x"]));
        assert!(!run("appswitcher-no-such-tool", ["x"]));
    }
}
