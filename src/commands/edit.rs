use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::error::{AgendaError, Result};
use crate::model::Priority;
use crate::output::{self, Format};
use crate::store::repo::Repo;
use crate::task_id::TaskId;

#[allow(clippy::too_many_arguments)]
pub fn run(
    store_root: &Path,
    id: &TaskId,
    title: Option<String>,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    priority: Option<Priority>,
    format: Format,
) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let mut task = repo.store.read(id)?;

    if let Some(t) = title {
        task.title = t;
    }
    if let Some(d) = description {
        task.description = Some(d);
    }
    if let Some(due) = due_date {
        task.due_date = due;
    }
    if let Some(p) = priority {
        task.priority = p;
    }

    task.normalize();
    if task.title.is_empty() {
        return Err(AgendaError::EmptyTitle);
    }
    task.updated_at = Utc::now();

    repo.store.write(&task)?;
    repo.index.upsert(&task)?;
    repo.refresh_fingerprint()?;
    output::print_task(&task, format)?;
    Ok(())
}
