use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::repo::Repo;
use crate::task_id::TaskId;

pub fn run(store_root: &Path, id: &TaskId, format: Format) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let task = repo.store.read(id)?;
    output::print_task(&task, format)?;
    Ok(())
}
