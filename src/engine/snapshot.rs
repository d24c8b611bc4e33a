//! JSON snapshots of the session table
//!
//! Written on clean shutdown and read back on startup when a snapshot path is
//! configured. Each record carries the full session, delayed effects included.

use crate::core::error::{LabError, Result};
use crate::engine::session::Session;
use crate::engine::store::SessionStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    sessions: Vec<Session>,
}

/// Write every live session to `path`, replacing any previous snapshot
pub fn save(store: &SessionStore, path: &Path) -> Result<usize> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        sessions: store.export(),
    };
    let json = serde_json::to_string(&snapshot)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    info!(path = %path.display(), sessions = snapshot.sessions.len(), "Saved session snapshot");
    Ok(snapshot.sessions.len())
}

/// Load a snapshot into `store`; a missing file is not an error
pub fn load(store: &SessionStore, path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let content = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(LabError::Internal(format!(
            "unsupported snapshot version {} in {}",
            snapshot.version,
            path.display()
        )));
    }

    let imported = store.import(snapshot.sessions);
    info!(path = %path.display(), sessions = imported, "Loaded session snapshot");
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::StoreConfig;
    use crate::scenarios::ScenarioCatalog;
    use std::sync::Arc;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(ScenarioCatalog::builtin().unwrap()), StoreConfig::default())
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bias-lab-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_save_and_load() {
        let source = store();
        let view = source.create_session("relationship", "beginner").unwrap();
        source.play_turn(view.session_id, "gift", 3.0).unwrap();

        let path = temp_path("roundtrip");
        assert_eq!(save(&source, &path).unwrap(), 1);

        let target = store();
        assert_eq!(load(&target, &path).unwrap(), 1);
        let restored = target.get_state(view.session_id).unwrap();
        assert_eq!(restored.history.len(), 1);
        assert_eq!(restored.pending_effects, source.get_state(view.session_id).unwrap().pending_effects);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        assert_eq!(load(&store(), &temp_path("missing")).unwrap(), 0);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let path = temp_path("version");
        fs::write(&path, r#"{"version": 99, "sessions": []}"#).unwrap();
        assert!(matches!(load(&store(), &path), Err(LabError::Internal(_))));
        fs::remove_file(&path).ok();
    }
}
