use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcpError {
    #[error("Could not determine the user configuration directory")]
    ConfigDirUnavailable,

    #[error("Failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cant read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cant write config {path}: {source}")]
    WriteConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cant parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Key not found: {key}")]
    MissingKey { key: String },
}

impl CcpError {
    /// Short message for stderr, without the underlying OS error chain.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CcpError::ConfigDirUnavailable => {
                "no user configuration directory is available".to_string()
            }
            CcpError::CreateDir { path, .. } => {
                format!("cannot create config directory {}", path.display())
            }
            CcpError::ReadConfig { path, .. } => format!("cannot read {}", path.display()),
            CcpError::WriteConfig { path, .. } => format!("cannot write {}", path.display()),
            CcpError::Parse { path, .. } => format!("{} is not a valid YAML mapping", path.display()),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CcpError::ConfigDirUnavailable => "Set HOME (or XDG_CONFIG_HOME) and try again",
            CcpError::CreateDir { .. } | CcpError::WriteConfig { .. } => {
                "Check permissions on the configuration directory"
            }
            CcpError::ReadConfig { .. } => "Check that the file is readable",
            CcpError::Parse { .. } => "Fix the YAML syntax or delete the file to start over",
            CcpError::Watch(_) => "Raise the inotify watch limit or run without watching",
            CcpError::InvalidConfigValue { .. } => "Use a plain name without path separators",
            CcpError::MissingKey { .. } => "Run `ccp ssh config show` to list known keys",
        }
    }
}

pub type Result<T> = std::result::Result<T, CcpError>;
