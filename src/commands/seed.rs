use std::path::Path;

use chrono::{Duration, Utc};

use crate::error::Result;
use crate::model::{Priority, Task};
use crate::output::{self, Format};
use crate::store::repo::Repo;
use crate::task_id::TaskId;

/// Replace the store contents with three example tasks due today,
/// tomorrow, and one week out.
pub fn run(store_root: &Path, format: Format) -> Result<()> {
    let repo = Repo::open(store_root)?;

    let now = Utc::now();
    let today = now.date_naive();
    let samples = [
        (
            "Iterate on the product prototype",
            "Collect teammate feedback and update the interaction notes.",
            today,
            Priority::High,
        ),
        (
            "Weekly team sync",
            "Report this week's progress and agree on next week's goals.",
            today + Duration::days(1),
            Priority::Medium,
        ),
        (
            "Read the industry report",
            "Skim for new trends and write up the highlights.",
            today + Duration::days(7),
            Priority::Low,
        ),
    ];

    let tasks: Vec<Task> = samples
        .into_iter()
        .map(|(title, description, due_date, priority)| Task {
            id: TaskId::generate(),
            title: title.into(),
            description: Some(description.into()),
            due_date,
            priority,
            done: false,
            created_at: now,
            updated_at: now,
        })
        .collect();

    repo.store.replace_all(&tasks)?;
    repo.index.rebuild(&tasks)?;
    repo.refresh_fingerprint()?;

    output::print_tasks(&tasks, format)?;
    Ok(())
}
