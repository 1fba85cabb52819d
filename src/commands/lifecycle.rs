use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::repo::Repo;
use crate::task_id::TaskId;

/// Mark a task done. Idempotent: completing an already-done task succeeds
/// without touching the file.
pub fn done(store_root: &Path, id: &TaskId, format: Format) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let mut task = repo.store.read(id)?;

    if !task.done {
        task.done = true;
        task.updated_at = Utc::now();
        repo.store.write(&task)?;
        repo.index.upsert(&task)?;
        repo.refresh_fingerprint()?;
    }

    output::print_task(&task, format)?;
    Ok(())
}
