use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::error::{AgendaError, Result};
use crate::model::{Priority, Task};
use crate::store::lock;
use crate::task_id::TaskId;

/// Root of the .agenda directory: one JSON document per task, written
/// synchronously on every mutation.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open an existing .agenda directory.
    pub fn open(store_root: &Path) -> Result<Self> {
        let root = store_root.join(".agenda");
        if !root.join("config.json").exists() {
            return Err(AgendaError::NotInitialized);
        }
        Ok(Self { root })
    }

    /// Initialize a new .agenda directory.
    pub fn init(store_root: &Path) -> Result<Self> {
        let root = store_root.join(".agenda");
        if root.join("config.json").exists() {
            return Err(AgendaError::AlreadyInitialized);
        }

        fs::create_dir_all(root.join("tasks"))?;
        fs::write(root.join("config.json"), r#"{"version": 1}"#)?;

        Ok(Self { root })
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    fn store_lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    pub fn create(
        &self,
        title: String,
        description: Option<String>,
        due_date: NaiveDate,
        priority: Priority,
    ) -> Result<Task> {
        let now = Utc::now();
        let mut task = Task {
            id: TaskId::generate(),
            title,
            description,
            due_date,
            priority,
            done: false,
            created_at: now,
            updated_at: now,
        };
        task.normalize();
        if task.title.is_empty() {
            return Err(AgendaError::EmptyTitle);
        }

        self.write(&task)?;
        Ok(task)
    }

    pub fn read(&self, id: &TaskId) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(AgendaError::TaskNotFound(id.to_string()));
        }
        let data = fs::read_to_string(path)?;
        let task: Task = serde_json::from_str(&data)?;
        Ok(task)
    }

    pub fn write(&self, task: &Task) -> Result<()> {
        let json = serde_json::to_string_pretty(task)?;
        fs::write(self.task_path(&task.id), json)?;
        Ok(())
    }

    pub fn delete(&self, id: &TaskId) -> Result<()> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(AgendaError::TaskNotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Delete every task file. Guarded by the store lock since it touches
    /// multiple files.
    pub fn clear_all(&self) -> Result<usize> {
        let lock_file = lock::acquire_lock(&self.store_lock_path())?;
        let ids = self.list_ids()?;
        for id in &ids {
            fs::remove_file(self.task_path(id))?;
        }
        lock::release_lock(lock_file)?;
        Ok(ids.len())
    }

    /// Replace the entire store contents with the given tasks.
    pub fn replace_all(&self, tasks: &[Task]) -> Result<()> {
        let lock_file = lock::acquire_lock(&self.store_lock_path())?;
        for id in self.list_ids()? {
            fs::remove_file(self.task_path(&id))?;
        }
        for task in tasks {
            self.write(task)?;
        }
        lock::release_lock(lock_file)?;
        Ok(())
    }

    pub fn list_ids(&self) -> Result<Vec<TaskId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.tasks_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json")
                && let Ok(id) = stem.parse::<TaskId>()
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Compute a fingerprint from task file metadata (id, size, mtime).
    /// Cheap (stat calls, no file reads) and detects additions, deletions,
    /// and in-place edits. Uses nanosecond mtime to catch rapid same-size edits.
    pub fn fingerprint(&self) -> Result<String> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.tasks_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json")
                && let Ok(id) = stem.parse::<TaskId>()
            {
                let meta = entry.metadata()?;
                let mtime = meta
                    .modified()?
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_nanos();
                let size = meta.len();
                entries.push((id, size, mtime));
            }
        }
        entries.sort();
        let fp = entries
            .iter()
            .map(|(id, size, mtime)| format!("{id}:{size}:{mtime}"))
            .collect::<Vec<_>>()
            .join(",");
        Ok(fp)
    }

    pub fn read_many(&self, ids: &[TaskId]) -> Result<Vec<Task>> {
        ids.iter().map(|id| self.read(id)).collect()
    }

    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.list_ids()?
            .into_iter()
            .map(|id| self.read(&id))
            .collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
