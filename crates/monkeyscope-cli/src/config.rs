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

use monkeyscope::{MonkeyscopeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for MonkeyscopeError {
    fn from(err: ConfigError) -> Self {
        MonkeyscopeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (monkeyscope/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds invalid values
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MonkeyscopeError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("monkeyscope/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "monkeyscope", "monkeyscope") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, MonkeyscopeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    debug!(config:?; "Configuration loaded");
    Ok(config)
}

/// Parses and validates TOML configuration text.
fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    config
        .style()
        .background_color()
        .map_err(ConfigError::Validation)?;
    if config.layout().max_depth() == 0 {
        return Err(ConfigError::Validation(
            "layout.max_depth must be at least 1".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use monkeyscope::config::AlignStrategy;

    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [align]
            strategy = "cursor"
            fallback_window = 8

            [layout]
            level_step = 120
            max_depth = 40

            [style]
            background_color = "white"
            font_size = 12

            [backend]
            program = "monkey-analyzer"
            args = ["--json"]
            "#,
        )
        .unwrap();

        assert_eq!(config.align().strategy(), AlignStrategy::Cursor);
        assert_eq!(config.align().fallback_window(), 8);
        assert_eq!(config.layout().max_depth(), 40);
        assert_eq!(config.style().font_size(), 12);

        let backend = config.backend().unwrap();
        assert_eq!(backend.program(), "monkey-analyzer");
        assert_eq!(backend.args(), ["--json".to_string()]);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.backend().is_none());
        assert_eq!(config.align().strategy(), AlignStrategy::DeclaredFirst);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_config("[layout\nlevel_step = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_background_color() {
        let err = parse_config("[style]\nbackground_color = \"not-a-color\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_max_depth() {
        assert!(matches!(
            parse_config("[layout]\nmax_depth = 0"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nslot_step = 180").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout().slot_step(), 180.0);
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = load_config(Some("/nonexistent/monkeyscope.toml")).unwrap_err();
        assert!(matches!(err, MonkeyscopeError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }
}
