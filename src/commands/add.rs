use std::path::Path;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::Priority;
use crate::output::{self, Format};
use crate::store::repo::Repo;

pub fn run(
    store_root: &Path,
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
    priority: Priority,
    format: Format,
) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let task = repo.store.create(title, description, due_date, priority)?;
    repo.index.upsert(&task)?;
    repo.refresh_fingerprint()?;
    output::print_task(&task, format)?;
    Ok(())
}
