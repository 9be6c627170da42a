//! User settings for nxtype
//!
//! Settings live in `config.toml` inside the config directory:
//!
//! ```toml
//! validation = "batch"   # or "fail-fast"
//! jobs = 8
//! ```
//!
//! # Config Directory Priority
//!
//! 1. `NXTYPE_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/nxtype` (if set)
//! 3. `~/.config/nxtype`
//!
//! A missing file means defaults. Command-line flags override the file.

use anyhow::{Context, Result};
use declarative::{CompileOptions, ValidationMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "NXTYPE_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Get the nxtype config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("nxtype");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("nxtype");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// How attribute errors are reported
    pub validation: ValidationMode,
    /// Number of parallel build jobs
    pub jobs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = CompileOptions::default();
        Self {
            validation: defaults.mode,
            jobs: defaults.jobs,
        }
    }
}

impl Settings {
    /// Load settings from the config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(CONFIG_FILE))
    }

    /// Load settings from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Compile options with command-line overrides applied
    pub fn compile_options(&self, batch: bool, jobs: Option<usize>) -> CompileOptions {
        CompileOptions {
            mode: if batch {
                ValidationMode::Batch
            } else {
                self.validation
            },
            jobs: jobs.unwrap_or(self.jobs).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    /// Run `f` with `key` set to `value`, restoring the previous value after.
    #[allow(unsafe_code)]
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/nxtype", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/nxtype"));
        });
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.validation, ValidationMode::FailFast);
    }

    #[test]
    fn test_load_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "validation = \"batch\"\njobs = 8\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.validation, ValidationMode::Batch);
        assert_eq!(settings.jobs, 8);
    }

    #[test]
    fn test_partial_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "jobs = 2\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.validation, ValidationMode::FailFast);
        assert_eq!(settings.jobs, 2);
    }

    #[test]
    fn test_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "validation = \"lenient\"\n").unwrap();
        assert!(Settings::load_from(&path).is_err());
        fs::write(&path, "colour = \"red\"\n").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let settings = Settings {
            validation: ValidationMode::FailFast,
            jobs: 8,
        };
        let opts = settings.compile_options(true, Some(1));
        assert_eq!(opts.mode, ValidationMode::Batch);
        assert_eq!(opts.jobs, 1);

        let opts = settings.compile_options(false, None);
        assert_eq!(opts.mode, ValidationMode::FailFast);
        assert_eq!(opts.jobs, 8);

        assert_eq!(settings.compile_options(false, Some(0)).jobs, 1);
    }
}
