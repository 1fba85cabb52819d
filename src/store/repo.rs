use std::path::{Path, PathBuf};

use crate::error::{AgendaError, Result};
use crate::store::files::FileStore;
use crate::store::index::Index;
use crate::task_id::TaskId;

pub struct Repo {
    pub store: FileStore,
    pub index: Index,
}

impl Repo {
    /// Open an existing .agenda store, auto-rebuilding the index if stale
    /// or missing.
    pub fn open(store_root: &Path) -> Result<Self> {
        let store = FileStore::open(store_root)?;
        let index_path = store.root().join("index.db");
        let mut needs_rebuild = !index_path.exists();
        let index = Index::open(&index_path)?;

        let current_fp = store.fingerprint()?;

        if !needs_rebuild {
            let stored_fp = index.get_fingerprint()?;
            needs_rebuild = stored_fp.as_deref() != Some(current_fp.as_str());
        }

        if needs_rebuild {
            let tasks = store.list_all()?;
            index.rebuild(&tasks)?;
        }

        index.set_fingerprint(&current_fp)?;

        Ok(Self { store, index })
    }

    /// Re-sync the index with the file store after a mutation.
    pub fn refresh_fingerprint(&self) -> Result<()> {
        self.index.set_fingerprint(&self.store.fingerprint()?)
    }

    /// Resolve a user-supplied task ID to a canonical TaskId.
    ///
    /// Resolution strategy:
    /// 1) exact match (full 32-hex id),
    /// 2) unique lowercase-hex prefix match,
    /// 3) otherwise return not-found/ambiguous/invalid errors.
    pub fn resolve_task_id(&self, input: &str) -> Result<TaskId> {
        let existing = self.store.list_ids()?;
        resolve_task_id_input(input, &existing)
    }
}

/// Shared exact-or-prefix resolver for task ID inputs.
pub fn resolve_task_id_input(input: &str, existing_ids: &[TaskId]) -> Result<TaskId> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(AgendaError::InvalidTaskId(
            input.to_string(),
            "task id cannot be empty".into(),
        ));
    }

    let is_hex = raw.bytes().all(|b| b.is_ascii_hexdigit());
    if !is_hex || raw.len() > TaskId::HEX_LEN {
        return Err(AgendaError::InvalidTaskId(
            raw.to_string(),
            format!(
                "expected 1-{} hexadecimal characters",
                TaskId::HEX_LEN
            ),
        ));
    }

    // Exact first
    if raw.len() == TaskId::HEX_LEN {
        let exact = raw
            .parse::<TaskId>()
            .map_err(|e| AgendaError::InvalidTaskId(raw.to_string(), e.to_string()))?;
        if existing_ids.iter().any(|id| id == &exact) {
            return Ok(exact);
        }
        return Err(AgendaError::TaskNotFound(raw.to_string()));
    }

    let prefix = raw.to_ascii_lowercase();
    let mut matches: Vec<TaskId> = existing_ids
        .iter()
        .filter(|id| id.as_str().starts_with(&prefix))
        .cloned()
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Err(AgendaError::TaskNotFound(raw.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(AgendaError::TaskIdAmbiguous(
            raw.to_string(),
            format_task_id_matches(&matches),
        )),
    }
}

fn format_task_id_matches(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Walk up from current directory to find the .agenda root.
pub fn find_store_root() -> Result<PathBuf> {
    let mut dir = std::env::current_dir().map_err(AgendaError::Io)?;
    loop {
        if dir.join(".agenda").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(AgendaError::NotInitialized);
        }
    }
}
