//! Platform-specific directory paths.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "inventory";
const APPLICATION: &str = "inventory";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for regenerable data such as logs.
///
/// - Linux: `$XDG_CACHE_HOME/inventory` or `~/.cache/inventory`
/// - macOS: `~/Library/Caches/dev.inventory.inventory`
/// - Windows: `C:\Users\<User>\AppData\Local\inventory\inventory\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the log file of the current run.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
