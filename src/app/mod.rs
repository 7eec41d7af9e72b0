#[cfg(feature = "cli")]
pub mod commands;

use crate::core::{BootstrapOutcome, ConfigBootstrap, ConfigLocation, ConfigWatcher, ProfileStore};
use crate::utils::error::{CcpError, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Everything a command needs, built once before dispatch.
#[derive(Debug)]
pub struct AppContext {
    debug: bool,
    location: ConfigLocation,
    outcome: BootstrapOutcome,
    store: ProfileStore,
    watcher: Option<ConfigWatcher>,
}

impl AppContext {
    /// Bootstrap the profiles file and start watching it.
    ///
    /// Bootstrap errors are returned; a watcher that fails to start is only
    /// logged, since every command still works without live reload.
    pub fn init(debug: bool, bootstrap: &ConfigBootstrap) -> Result<Self> {
        let result = bootstrap.run()?;

        if debug {
            println!("Using config file: {}", result.location.file.display());
        }

        let store = ProfileStore::new(&result.location.file, result.document);
        let watcher = match ConfigWatcher::start(store.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!("Config changes will not be picked up: {}", e);
                None
            }
        };

        Ok(Self {
            debug,
            location: result.location,
            outcome: result.outcome,
            store,
            watcher,
        })
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn location(&self) -> &ConfigLocation {
        &self.location
    }

    pub fn outcome(&self) -> BootstrapOutcome {
        self.outcome
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn watcher(&self) -> Option<&ConfigWatcher> {
        self.watcher.as_ref()
    }

    /// In debug mode, print every config change for as long as the process
    /// runs. Must be called from within a tokio runtime.
    pub fn spawn_debug_printer(&self) -> Option<JoinHandle<()>> {
        if !self.debug {
            return None;
        }
        let mut rx = self.watcher.as_ref()?.subscribe();

        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => println!("{}", change),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Missed {} config change notifications", skipped)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }
}

/// Log and print a fatal bootstrap error, then exit with status 1.
pub fn exit_fatal(err: &CcpError) -> ! {
    tracing::error!("{}", err);
    eprintln!("ccp: {}", err.user_friendly_message());
    eprintln!("ccp: {}", err.recovery_suggestion());
    std::process::exit(1)
}
