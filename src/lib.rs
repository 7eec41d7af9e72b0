pub mod app;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use app::AppContext;
pub use core::{ConfigBootstrap, ConfigWatcher, ProfileStore};
pub use utils::error::{CcpError, Result};
