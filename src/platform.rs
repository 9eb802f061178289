//! Platform-specific helpers.
//!
//! Config file location and launching an editor differ per OS; everything
//! else in the crate stays platform-agnostic.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(windows)]
const CONFIG_FILE_NAME: &str = "classifier-master.conf";
#[cfg(not(windows))]
const CONFIG_FILE_NAME: &str = ".classifier-master.conf";

/// Location of the global rules file.
///
/// Lives directly in the user's home directory. Falls back to the current
/// directory when no home directory can be determined.
pub fn default_config_path() -> PathBuf {
    let base = dirs::home_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(CONFIG_FILE_NAME)
}

/// Opens `path` with the desktop's default text editor without waiting for it.
pub fn open_in_editor(path: &Path) -> Result<()> {
    let mut command = editor_command(path);
    log::debug!("launching editor: {:?}", command);
    command.spawn().map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn editor_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-t").arg(path);
    command
}

#[cfg(windows)]
fn editor_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", windows)))]
fn editor_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
