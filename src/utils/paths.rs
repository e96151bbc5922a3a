//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.project-launcher/.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Project Launcher directory (~/.project-launcher/)
pub fn project_launcher_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".project-launcher"))
}

/// Get the config file path (~/.project-launcher/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(project_launcher_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
