use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "audio-sensor";

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("Unable to determine config directory")
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Storage area for recordings. See `ensure_private_dir` for how it is created.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = dirs::data_dir() {
        return Ok(dir.join(APP_DIR));
    }
    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".local").join("share").join(APP_DIR));
    }
    Err(anyhow!("Unable to determine data directory"))
}

pub fn recording_file(file_name: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join(file_name))
}

/// Create `dir` (and missing parents) readable only by the current user.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::{DirBuilder, Permissions};
        use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

        DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)
            .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        // An existing directory keeps its mode; tighten it.
        std::fs::set_permissions(dir, Permissions::from_mode(0o700))
            .with_context(|| format!("Failed to restrict data directory {:?}", dir))?;
    }

    #[cfg(not(unix))]
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory {:?}", dir))?;

    Ok(())
}
