pub mod bootstrap;
pub mod store;
pub mod watcher;

pub use crate::domain::model::{BootstrapOutcome, ChangeOp, ConfigChange, ConfigLocation};
pub use crate::domain::ports::{EnvSource, ProcessEnv};
pub use crate::utils::error::Result;
pub use bootstrap::{Bootstrapped, ConfigBootstrap};
pub use store::ProfileStore;
pub use watcher::ConfigWatcher;
