//! Clipboard and "open in app": the only places this tool touches the desktop.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::Browser;
use crate::notice::{self, Style};

/// Current clipboard text, or `""` after telling the user it could not be read.
pub fn read_clipboard() -> String {
    clipboard_text(arboard::Clipboard::new().and_then(|mut cb| cb.get_text()))
}

fn clipboard_text(read: Result<String, arboard::Error>) -> String {
    match read {
        Ok(text) => text,
        Err(e) => {
            debug!("Clipboard read failed: {}", e);
            notice::show(Style::Failure, "Failed to read clipboard content");
            String::new()
        }
    }
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    arboard::Clipboard::new()
        .and_then(|mut cb| cb.set_text(text.to_string()))
        .context("Failed to write clipboard")
}

/// Open `url` in `browser` without waiting for it.
pub fn launch(url: &str, browser: &Browser) {
    let mut command = open_command(url, browser);
    debug!("Launching {:?}", command);
    if let Err(e) = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!("Could not open {} in {}: {}", url, browser.name, e);
    }
}

#[cfg(target_os = "macos")]
fn open_command(url: &str, browser: &Browser) -> Command {
    let mut command = Command::new("open");
    command.args(["-a", browser.app.as_str(), url]);
    command
}

#[cfg(not(target_os = "macos"))]
fn open_command(url: &str, _browser: &Browser) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_clipboard_is_empty_text() {
        assert_eq!(clipboard_text(Err(arboard::Error::ContentNotAvailable)), "");
        assert_eq!(
            clipboard_text(Ok("https://ourworldindata.org/grapher/gdp".into())),
            "https://ourworldindata.org/grapher/gdp"
        );
    }

    #[test]
    fn command_targets_the_url() {
        let browser = Browser {
            name: "Google Chrome".into(),
            app: "/Applications/Google Chrome.app".into(),
        };
        let command = open_command("https://ourworldindata.org", &browser);
        let args: Vec<_> = command.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args.last().map(String::as_str), Some("https://ourworldindata.org"));
        if cfg!(target_os = "macos") {
            assert_eq!(args[..2], ["-a".to_string(), browser.app.clone()]);
        }
    }
}
