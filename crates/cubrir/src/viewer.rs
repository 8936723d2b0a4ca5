//! Report viewer launch

use crate::exec::CommandSpec;
use std::path::Path;

/// Command opening `entry_page` with the host's default application
///
/// The launch is fire-and-forget; the caller spawns this detached and never
/// waits on the viewer.
#[must_use]
pub fn open_command(entry_page: &Path, cwd: &Path) -> CommandSpec {
    #[cfg(target_os = "macos")]
    return CommandSpec::new("open", cwd).arg(entry_page.as_os_str());

    #[cfg(target_os = "windows")]
    return CommandSpec::new("cmd", cwd)
        .args(["/C", "start", ""])
        .arg(entry_page.as_os_str());

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    CommandSpec::new("xdg-open", cwd).arg(entry_page.as_os_str())
}
