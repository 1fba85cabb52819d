use std::path::Path;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::Priority;
use crate::output::{self, Format};
use crate::store::repo::Repo;

pub fn run(
    store_root: &Path,
    date: Option<NaiveDate>,
    priority: Option<Priority>,
    done: Option<bool>,
    format: Format,
) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let ids = repo.index.filtered(date, priority, done)?;
    let tasks = repo.store.read_many(&ids)?;
    output::print_tasks(&tasks, format)?;
    Ok(())
}
