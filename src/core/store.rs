use crate::domain::ports::{env_key, EnvSource, ProcessEnv};
use crate::utils::error::{CcpError, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Parse a profiles document. Empty input is an empty mapping; any other
/// non-mapping root is rejected.
pub fn parse_document(path: &Path, content: &str) -> Result<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(content).map_err(|e| CcpError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(CcpError::Parse {
            path: path.to_path_buf(),
            message: format!("expected a mapping at the document root, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// The loaded profiles document, shared between commands and the watcher.
#[derive(Clone)]
pub struct ProfileStore {
    path: PathBuf,
    document: Arc<RwLock<Mapping>>,
    env: Arc<dyn EnvSource>,
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("path", &self.path)
            .field("keys", &self.read().len())
            .finish()
    }
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>, document: Mapping) -> Self {
        Self::with_env(path, document, ProcessEnv)
    }

    pub fn with_env(
        path: impl Into<PathBuf>,
        document: Mapping,
        env: impl EnvSource + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            document: Arc::new(RwLock::new(document)),
            env: Arc::new(env),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Environment override first, then a dotted, case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.env.var(&env_key(key)) {
            return Some(Value::String(value));
        }

        let document = self.read();
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = lookup(&document, first)?;
        for segment in segments {
            match current {
                Value::Mapping(mapping) => current = lookup(mapping, segment)?,
                _ => return None,
            }
        }
        Some(current.clone())
    }

    pub fn require(&self, key: &str) -> Result<Value> {
        self.get(key).ok_or_else(|| CcpError::MissingKey {
            key: key.to_string(),
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.read()
            .keys()
            .filter_map(|k| match k {
                Value::String(s) => Some(s.clone()),
                other => serde_yaml::to_string(other)
                    .ok()
                    .map(|s| s.trim_end().to_string()),
            })
            .collect()
    }

    /// Re-read the file. On failure the previous document stays in place.
    pub fn reload(&self) -> Result<()> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| CcpError::ReadConfig {
            path: self.path.clone(),
            source,
        })?;
        let document = parse_document(&self.path, &content)?;
        *self.write() = document;
        tracing::debug!("Reloaded {}", self.path.display());
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&*self.read()).map_err(|e| CcpError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    // A writer panicking mid-assignment cannot leave a torn Mapping, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Mapping> {
        self.document.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Mapping> {
        self.document.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn lookup<'a>(mapping: &'a Mapping, segment: &str) -> Option<&'a Value> {
    mapping.iter().find_map(|(k, v)| match k {
        Value::String(s) if s.eq_ignore_ascii_case(segment) => Some(v),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn store_from(yaml: &str, env: HashMap<String, String>) -> ProfileStore {
        let path = PathBuf::from("profiles.yaml");
        let document = parse_document(&path, yaml).unwrap();
        ProfileStore::with_env(path, document, env)
    }

    #[test]
    fn test_parse_empty_and_null_documents() {
        let path = Path::new("profiles.yaml");
        assert!(parse_document(path, "").unwrap().is_empty());
        assert!(parse_document(path, "  \n").unwrap().is_empty());
        assert!(parse_document(path, "~\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        let path = Path::new("profiles.yaml");
        let err = parse_document(path, "- a\n- b\n").unwrap_err();
        assert!(err.to_string().contains("a sequence"));
        assert!(parse_document(path, "just text").is_err());
    }

    #[test]
    fn test_dotted_case_insensitive_lookup() {
        let store = store_from("Work:\n  Host: example.com\n  port: 22\n", HashMap::new());

        assert_eq!(
            store.get("work.host"),
            Some(Value::String("example.com".to_string()))
        );
        assert_eq!(store.get("WORK.PORT"), Some(Value::Number(22.into())));
        assert_eq!(store.get("work.host.extra"), None);
        assert_eq!(store.get("personal"), None);
    }

    #[test]
    fn test_env_overrides_file_value() {
        let mut env = HashMap::new();
        env.insert("WORK_HOST".to_string(), "override.example".to_string());
        let store = store_from("work:\n  host: example.com\n", env);

        assert_eq!(
            store.get("work.host"),
            Some(Value::String("override.example".to_string()))
        );
    }

    #[test]
    fn test_empty_env_value_does_not_override() {
        let mut env = HashMap::new();
        env.insert("WORK_HOST".to_string(), String::new());
        let store = store_from("work:\n  host: example.com\n", env);

        assert_eq!(
            store.get("work.host"),
            Some(Value::String("example.com".to_string()))
        );
    }

    #[test]
    fn test_env_provides_key_missing_from_file() {
        let mut env = HashMap::new();
        env.insert("DEFAULT_PROFILE".to_string(), "work".to_string());
        let store = store_from("", env);

        assert_eq!(
            store.get("default-profile"),
            Some(Value::String("work".to_string()))
        );
        assert!(matches!(
            store.require("missing"),
            Err(CcpError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_reload_keeps_previous_document_on_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.yaml");
        std::fs::write(&path, "a: 1\n").unwrap();
        let store = ProfileStore::with_env(&path, Mapping::new(), HashMap::new());

        store.reload().unwrap();
        assert_eq!(store.keys(), vec!["a".to_string()]);

        std::fs::write(&path, "a: [\n").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get("a"), Some(Value::Number(1.into())));
    }

    #[test]
    fn test_empty_store_renders_as_empty_mapping() {
        let store = store_from("", HashMap::new());
        assert_eq!(store.to_yaml().unwrap().trim(), "{}");
    }
}
