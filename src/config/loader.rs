// src/config/loader.rs
//! Layered settings loader: defaults, TOML files, then environment

use crate::config::{constants::paths, SimulatorSettings};
use crate::utils::validation::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration validation errors: {}", format_validation(.0))]
    ValidationError(Vec<ValidationError>),

    #[error("IO error: {0}")]
    IoError(String),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Settings loader
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
    required: bool,
}

impl ConfigLoader {
    /// Loader over the default discovery paths, environment included
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            use_environment: true,
            required: false,
        }
    }

    /// Loader over explicit paths; every path must exist
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: true,
            required: true,
        }
    }

    /// Skip `VITALSIM_*` environment overrides
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Load, merge and validate settings
    pub fn load(&self) -> Result<SimulatorSettings, ConfigError> {
        let mut builder = config::Config::builder();

        for path in &self.config_paths {
            if self.required && !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "Adding settings source");
            builder = builder.add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(self.required),
            );
        }

        if self.use_environment {
            builder = builder.add_source(
                config::Environment::with_prefix(paths::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(paths::ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let settings: SimulatorSettings = builder.build()?.try_deserialize()?;
        settings.validate().map_err(ConfigError::ValidationError)?;

        info!(
            sources = self.config_paths.len(),
            history_capacity = settings.registry.history_capacity,
            "Simulator settings loaded"
        );
        Ok(settings)
    }

    /// Validate a single file without loading the environment
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: SimulatorSettings =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        settings.validate().map_err(ConfigError::ValidationError)
    }

    /// Write settings to a TOML file
    pub fn export_config<P: AsRef<Path>>(
        &self,
        settings: &SimulatorSettings,
        path: P,
    ) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(settings)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from(paths::CONFIG_FILE_NAME),
            PathBuf::from(paths::CONFIG_DIR).join(paths::CONFIG_FILE_NAME),
        ]
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
