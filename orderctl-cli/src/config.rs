//! Environment loading
//!
//! `.env` files are read from the current directory first, then
//! `~/.orderctl/.env`. dotenvy never overwrites variables that are already
//! set, so the real environment wins over both files.

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

/// Directory holding user-level orderctl configuration.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".orderctl"))
}

/// Load `.env` files. Returns the paths that were loaded.
pub fn load_dotenv() -> Result<Vec<PathBuf>> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env from current directory");
        loaded.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!(path = %env_file.display(), "Loaded .env from ~/.orderctl");
                    loaded.push(env_file);
                }
                Err(e) => debug!(error = %e, "Failed to load ~/.orderctl/.env"),
            }
        }
    }

    if loaded.is_empty() {
        debug!("No .env files found, using process environment only");
    }

    Ok(loaded)
}
