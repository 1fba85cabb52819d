use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::repo::Repo;
use crate::task_id::TaskId;

pub fn run(store_root: &Path, id: &TaskId, format: Format) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let task = repo.store.read(id)?;
    repo.store.delete(id)?;
    repo.index.remove(id)?;
    repo.refresh_fingerprint()?;

    match format {
        Format::Json => println!(
            "{}",
            serde_json::json!({"deleted": task.id.as_str(), "title": task.title})
        ),
        _ => println!("deleted [{}] {}", output::short_id(&task), task.title),
    }
    Ok(())
}
