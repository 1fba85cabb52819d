use chrono::{NaiveDate, Utc};
use tempfile::tempdir;

use agenda::calendar::{Month, MonthGrid};
use agenda::error::AgendaError;
use agenda::model::{Priority, sort_for_listing};
use agenda::store::files::FileStore;
use agenda::store::repo::Repo;

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

#[test]
fn test_full_workflow() {
    let dir = tempdir().unwrap();

    // Init
    let store = FileStore::init(dir.path()).unwrap();

    // Create tasks spread over two days with mixed priorities
    let review = store
        .create(
            "Review design doc".into(),
            Some("Focus on the storage section".into()),
            date("2026-08-26"),
            Priority::High,
        )
        .unwrap();
    let sync = store
        .create(
            "Team sync".into(),
            None,
            date("2026-08-26"),
            Priority::Medium,
        )
        .unwrap();
    let report = store
        .create(
            "Read industry report".into(),
            None,
            date("2026-09-02"),
            Priority::Low,
        )
        .unwrap();

    // Open builds the index from the files
    let repo = Repo::open(dir.path()).unwrap();

    // Date filter
    let aug26 = repo.index.on_date(date("2026-08-26")).unwrap();
    assert_eq!(aug26.len(), 2);
    assert!(aug26.contains(&review.id));
    assert!(aug26.contains(&sync.id));

    // Priority filter
    let high = repo.index.filtered(None, Some(Priority::High), None).unwrap();
    assert_eq!(high, vec![review.id.clone()]);

    // Conjunction: date + priority
    let both = repo
        .index
        .filtered(Some(date("2026-08-26")), Some(Priority::Medium), None)
        .unwrap();
    assert_eq!(both, vec![sync.id.clone()]);

    // Complete a task; the index follows
    let mut done_task = repo.store.read(&sync.id).unwrap();
    done_task.done = true;
    done_task.updated_at = Utc::now();
    repo.store.write(&done_task).unwrap();
    repo.index.upsert(&done_task).unwrap();

    let completed = repo.index.filtered(None, None, Some(true)).unwrap();
    assert_eq!(completed, vec![sync.id.clone()]);

    // Delete; the file goes away and the index row with it
    repo.store.delete(&report.id).unwrap();
    repo.index.remove(&report.id).unwrap();
    assert!(matches!(
        repo.store.read(&report.id),
        Err(AgendaError::TaskNotFound(_))
    ));
    assert_eq!(repo.index.filtered(None, None, None).unwrap().len(), 2);
}

#[test]
fn test_listing_is_sorted_and_filterable() {
    let dir = tempdir().unwrap();
    let store = FileStore::init(dir.path()).unwrap();

    store
        .create("Later".into(), None, date("2026-09-15"), Priority::Low)
        .unwrap();
    store
        .create("Sooner".into(), None, date("2026-09-01"), Priority::High)
        .unwrap();
    store
        .create("Middle".into(), None, date("2026-09-07"), Priority::Medium)
        .unwrap();

    let repo = Repo::open(dir.path()).unwrap();
    let ids = repo.index.filtered(None, None, None).unwrap();
    let tasks = repo.store.read_many(&ids).unwrap();
    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Sooner", "Middle", "Later"]);

    // The in-memory sort agrees with the index ordering
    let mut shuffled = repo.store.list_all().unwrap();
    sort_for_listing(&mut shuffled);
    assert_eq!(shuffled, tasks);

    // No matches is an empty list, not an error
    let none = repo
        .index
        .filtered(Some(date("2026-12-25")), None, None)
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_prefix_resolution_through_repo() {
    let dir = tempdir().unwrap();
    let store = FileStore::init(dir.path()).unwrap();
    let task = store
        .create("Find me".into(), None, date("2026-08-26"), Priority::Low)
        .unwrap();

    let repo = Repo::open(dir.path()).unwrap();

    // Full id and short prefix both resolve
    let by_full = repo.resolve_task_id(task.id.as_str()).unwrap();
    assert_eq!(by_full, task.id);
    let by_prefix = repo.resolve_task_id(&task.id.as_str()[..8]).unwrap();
    assert_eq!(by_prefix, task.id);

    // Unknown prefix errors
    let missing = repo.resolve_task_id("0000000000");
    assert!(matches!(
        missing,
        Err(AgendaError::TaskNotFound(_)) | Err(AgendaError::TaskIdAmbiguous(_, _))
    ));
}

#[test]
fn test_calendar_reflects_store_state() {
    let dir = tempdir().unwrap();
    let store = FileStore::init(dir.path()).unwrap();

    store
        .create("High on 26th".into(), None, date("2026-08-26"), Priority::High)
        .unwrap();
    let mut finished = store
        .create("Low on 26th".into(), None, date("2026-08-26"), Priority::Low)
        .unwrap();
    finished.done = true;
    store.write(&finished).unwrap();

    let repo = Repo::open(dir.path()).unwrap();
    let tasks = repo.store.list_all().unwrap();
    let grid = MonthGrid::build(
        Month {
            year: 2026,
            month: 8,
        },
        &tasks,
        date("2026-08-01"),
        Some(date("2026-08-26")),
    );

    let cell = grid.cells.iter().find(|c| c.is_selected).unwrap();
    assert_eq!(cell.day, 26);
    assert_eq!(cell.total_tasks(), 2);
    assert_eq!(cell.dominant_priority(), Some(Priority::High));
    assert!(!cell.all_done());

    // The index aggregation agrees with the pure grid
    let marks = repo
        .index
        .day_marks(date("2026-08-01"), date("2026-08-31"))
        .unwrap();
    let total: usize = marks.iter().map(|m| m.count).sum();
    assert_eq!(total, 2);
    assert!(marks.iter().any(|m| m.done));
}

#[test]
fn test_task_files_round_trip_externally() {
    let dir = tempdir().unwrap();
    let store = FileStore::init(dir.path()).unwrap();
    let task = store
        .create(
            "Persist me".into(),
            Some("with a description".into()),
            date("2026-08-26"),
            Priority::Medium,
        )
        .unwrap();

    // Read the on-disk JSON directly, as another tool would
    let raw = std::fs::read_to_string(
        dir.path()
            .join(format!(".agenda/tasks/{}.json", task.id)),
    )
    .unwrap();
    let parsed: agenda::model::Task = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, task);
}
