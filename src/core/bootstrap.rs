//! One-shot configuration bootstrap.
//!
//! Resolves `<user-config-dir>/<app>/`, makes sure it exists, then either
//! creates `<file>.<ext>` empty or loads the file that is already there.
//! An existing file is never rewritten.

use crate::core::store::parse_document;
use crate::domain::model::{BootstrapOutcome, ConfigLocation};
use crate::utils::error::{CcpError, Result};
use crate::utils::validation::{validate_path_component, Validate};
use serde_yaml::Mapping;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;

pub const DEFAULT_APP_NAME: &str = "ccp";
pub const DEFAULT_FILE_NAME: &str = "profiles";
pub const DEFAULT_EXTENSION: &str = "yaml";

#[derive(Debug, Clone)]
pub struct ConfigBootstrap {
    app_name: String,
    file_name: String,
    extension: String,
    base_dir: Option<PathBuf>,
}

/// Result of a successful bootstrap.
#[derive(Debug, Clone)]
pub struct Bootstrapped {
    pub location: ConfigLocation,
    pub document: Mapping,
    pub outcome: BootstrapOutcome,
}

impl ConfigBootstrap {
    pub fn new(app_name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            file_name: file_name.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            base_dir: None,
        }
    }

    /// Use `dir` instead of the platform configuration directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn resolve(&self) -> Result<ConfigLocation> {
        self.validate()?;

        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => dirs::config_dir().ok_or(CcpError::ConfigDirUnavailable)?,
        };

        Ok(ConfigLocation::new(
            base.join(&self.app_name),
            &self.file_name,
            &self.extension,
        ))
    }

    pub fn ensure_dir(&self, location: &ConfigLocation) -> Result<()> {
        if location.dir.is_dir() {
            return Ok(());
        }

        tracing::debug!("Creating config directory {}", location.dir.display());
        fs::create_dir_all(&location.dir).map_err(|source| CcpError::CreateDir {
            path: location.dir.clone(),
            source,
        })
    }

    pub fn run(&self) -> Result<Bootstrapped> {
        let location = self.resolve()?;
        self.ensure_dir(&location)?;

        let outcome = write_if_absent(&location)?;
        let content = fs::read_to_string(&location.file).map_err(|source| CcpError::ReadConfig {
            path: location.file.clone(),
            source,
        })?;
        let document = parse_document(&location.file, &content)?;

        tracing::debug!(
            "Config bootstrap finished: {:?} {} ({} top-level keys)",
            outcome,
            location.file.display(),
            document.len()
        );

        Ok(Bootstrapped {
            location,
            document,
            outcome,
        })
    }
}

impl Default for ConfigBootstrap {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME, DEFAULT_FILE_NAME)
    }
}

impl Validate for ConfigBootstrap {
    fn validate(&self) -> Result<()> {
        validate_path_component("app_name", &self.app_name)?;
        validate_path_component("file_name", &self.file_name)?;
        validate_path_component("extension", &self.extension)
    }
}

// create_new never truncates, so a file that appears concurrently is kept.
fn write_if_absent(location: &ConfigLocation) -> Result<BootstrapOutcome> {
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&location.file)
    {
        Ok(_) => Ok(BootstrapOutcome::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(BootstrapOutcome::Loaded),
        Err(source) => Err(CcpError::WriteConfig {
            path: location.file.clone(),
            source,
        }),
    }
}
