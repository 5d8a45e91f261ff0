//! Path utilities for strata.
//!
//! All local files live under `~/.strata/`:
//! - `~/.strata/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the strata home directory (`~/.strata/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".strata")
}

/// Returns the default config file path (`~/.strata/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_strata_home() {
        let config = default_config();
        assert!(config.starts_with(home_dir()));
        assert!(config.to_string_lossy().contains(".strata"));
        assert_eq!(config.file_name().unwrap(), "config.toml");
    }
}
