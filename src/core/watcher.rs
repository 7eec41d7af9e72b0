//! Live reload of the profiles file.
//!
//! The parent directory is watched rather than the file itself so that
//! editors which save by writing a temp file and renaming it over the
//! original keep triggering events. Events for other files are dropped.

use crate::core::store::ProfileStore;
use crate::domain::model::{ChangeOp, ConfigChange};
use crate::utils::error::{CcpError, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

pub struct ConfigWatcher {
    // Dropping the watcher stops the background thread.
    _watcher: RecommendedWatcher,
    tx: broadcast::Sender<ConfigChange>,
}

impl ConfigWatcher {
    pub fn start(store: ProfileStore) -> Result<Self> {
        let path = store.path().to_path_buf();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| CcpError::InvalidConfigValue {
                field: "config_file".to_string(),
                value: path.display().to_string(),
                reason: "Path has no file name".to_string(),
            })?;

        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let event_tx = tx.clone();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    for change in handle_event(&event, &file_name, &store) {
                        tracing::trace!("{}", change);
                        // No subscribers is fine.
                        let _ = event_tx.send(change);
                    }
                }
                Err(e) => tracing::error!("File watcher error: {}", e),
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::debug!("Watching {} for changes", path.display());

        Ok(Self {
            _watcher: watcher,
            tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChange> {
        self.tx.subscribe()
    }
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}

pub fn change_op(kind: &EventKind) -> Option<ChangeOp> {
    match kind {
        EventKind::Create(_) => Some(ChangeOp::Create),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(ChangeOp::Chmod),
        // inotify pairs every From/To with a Both event; the halves suffice.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeOp::Rename),
        EventKind::Modify(_) => Some(ChangeOp::Write),
        EventKind::Remove(_) => Some(ChangeOp::Remove),
        _ => None,
    }
}

// Renaming our file away leaves nothing to read.
fn reloads(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => false,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_)) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Turn a raw event into changes for our file, reloading the store when
/// the content may have changed.
fn handle_event(event: &Event, file_name: &OsString, store: &ProfileStore) -> Vec<ConfigChange> {
    let Some(op) = change_op(&event.kind) else {
        return Vec::new();
    };

    let changes: Vec<ConfigChange> = event
        .paths
        .iter()
        .filter(|p| p.file_name() == Some(file_name.as_os_str()))
        .map(|p| ConfigChange {
            path: p.clone(),
            op,
        })
        .collect();

    if !changes.is_empty() && reloads(&event.kind) {
        if let Err(e) = store.reload() {
            tracing::warn!("Keeping previous config: {}", e);
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use serde_yaml::{Mapping, Value};
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_change_op_mapping() {
        assert_eq!(change_op(&EventKind::Create(CreateKind::File)), Some(ChangeOp::Create));
        assert_eq!(
            change_op(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(ChangeOp::Write)
        );
        assert_eq!(
            change_op(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
            Some(ChangeOp::Chmod)
        );
        assert_eq!(
            change_op(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(ChangeOp::Rename)
        );
        assert_eq!(
            change_op(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            None
        );
        assert_eq!(change_op(&EventKind::Remove(RemoveKind::File)), Some(ChangeOp::Remove));
        assert_eq!(change_op(&EventKind::Access(AccessKind::Read)), None);
    }

    #[test]
    fn test_handle_event_filters_other_files_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.yaml");
        std::fs::write(&path, "work: {}\n").unwrap();
        let store = ProfileStore::with_env(&path, Mapping::new(), HashMap::new());
        let file_name = OsString::from("profiles.yaml");

        let other = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(temp_dir.path().join("other.yaml"));
        assert!(handle_event(&other, &file_name, &store).is_empty());
        assert!(store.keys().is_empty());

        let ours = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.clone());
        let changes = handle_event(&ours, &file_name, &store);
        assert_eq!(
            changes,
            vec![ConfigChange {
                path: path.clone(),
                op: ChangeOp::Write
            }]
        );
        assert_eq!(store.get("work"), Some(Value::Mapping(Mapping::new())));
    }

    #[test]
    fn test_remove_does_not_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.yaml");
        let mut document = Mapping::new();
        document.insert(Value::String("kept".to_string()), Value::Bool(true));
        let store = ProfileStore::with_env(&path, document, HashMap::new());

        let event = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
        let changes = handle_event(&event, &OsString::from("profiles.yaml"), &store);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].op, ChangeOp::Remove);
        assert_eq!(store.get("kept"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_atomic_save_reports_one_rename_and_reloads_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.yaml");
        let tmp = temp_dir.path().join("profiles.yaml.tmp");
        std::fs::write(&path, "saved: true\n").unwrap();
        let store = ProfileStore::with_env(&path, Mapping::new(), HashMap::new());
        let file_name = OsString::from("profiles.yaml");

        // `mv profiles.yaml.tmp profiles.yaml` as delivered by inotify
        let from = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::From)))
            .add_path(tmp.clone());
        let to = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
            .add_path(path.clone());
        let both = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(tmp)
            .add_path(path.clone());

        let changes: Vec<ConfigChange> = [from, to, both]
            .iter()
            .flat_map(|event| handle_event(event, &file_name, &store))
            .collect();

        assert_eq!(
            changes,
            vec![ConfigChange {
                path: path.clone(),
                op: ChangeOp::Rename
            }]
        );
        assert_eq!(store.get("saved"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_renaming_file_away_does_not_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.yaml");
        let mut document = Mapping::new();
        document.insert(Value::String("kept".to_string()), Value::Bool(true));
        let store = ProfileStore::with_env(&path, document, HashMap::new());

        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::From)))
            .add_path(path.clone());
        let changes = handle_event(&event, &OsString::from("profiles.yaml"), &store);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].op, ChangeOp::Rename);
        assert_eq!(store.get("kept"), Some(Value::Bool(true)));
    }
}
