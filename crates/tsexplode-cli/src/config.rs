//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tsexplode::{ExplodeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for ExplodeError {
    fn from(err: ConfigError) -> Self {
        ExplodeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (tsexplode/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or is invalid
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ExplodeError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("tsexplode/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "tsexplode", "tsexplode") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ExplodeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

/// Reject settings that would produce unusable output unit names.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let explode = config.explode();
    if explode.marker_tag().is_empty() {
        return Err(ConfigError::Validation("marker_tag must not be empty".into()));
    }
    if explode.marker_tag().starts_with('@') {
        return Err(ConfigError::Validation(
            "marker_tag is the tag name without the leading '@'".into(),
        ));
    }

    let output = config.output();
    let separators = ['/', '\\'];
    if output.file_suffix().contains(separators) || output.file_extension().contains(separators) {
        return Err(ConfigError::Validation(
            "file_suffix and file_extension must not contain path separators".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tsexplode::config::EnumMode;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("Failed to write config");
        (dir, path)
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let (_dir, path) = write_config(
            r#"
            [explode]
            enum_mode = "NAME"
            include_doc_comments = true

            [output]
            overwrite = false
            "#,
        );

        let config = load_config(Some(&path)).expect("config should load");
        assert_eq!(config.explode().enum_mode(), EnumMode::Name);
        assert!(config.explode().include_doc_comments());
        assert!(!config.output().overwrite());
        assert_eq!(config.output().indent_width(), 4);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let err = load_config(Some(dir.path().join("absent.toml"))).expect_err("should fail");

        assert!(matches!(err, ExplodeError::Config(ref msg) if msg.starts_with("Missing")));
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, path) = write_config("[explode\nenum_mode = 1");
        let err = load_config(Some(&path)).expect_err("should fail");

        assert!(matches!(err, ExplodeError::Config(ref msg) if msg.starts_with("Failed to parse")));
    }

    #[test]
    fn test_unknown_enum_mode_is_rejected() {
        let (_dir, path) = write_config("[explode]\nenum_mode = \"label\"\n");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_validation() {
        let (_dir, path) = write_config("[explode]\nmarker_tag = \"@document\"\n");
        let err = load_config(Some(&path)).expect_err("should fail");
        assert!(matches!(err, ExplodeError::Config(ref msg) if msg.starts_with("Validation")));

        let (_dir, path) = write_config("[output]\nfile_suffix = \"/doc\"\n");
        assert!(load_config(Some(&path)).is_err());
    }
}
