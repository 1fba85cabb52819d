use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::error::Result;
use crate::model::{Priority, Task};
use crate::task_id::TaskId;

/// Derived SQLite index over the task files. Answers the read-side
/// queries (date/priority filters, per-day calendar marks) and is
/// rebuilt from scratch whenever the file store fingerprint diverges.
pub struct Index {
    conn: Connection,
}

/// One aggregated calendar row: how many done/pending tasks of a given
/// priority fall on a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMarkRow {
    pub date: NaiveDate,
    pub priority: Priority,
    pub done: bool,
    pub count: usize,
}

impl Index {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let idx = Self { conn };
        idx.create_tables()?;
        Ok(idx)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let idx = Self { conn };
        idx.create_tables()?;
        Ok(idx)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                due_date TEXT NOT NULL,
                priority INTEGER NOT NULL,
                done INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
            CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority);
            CREATE INDEX IF NOT EXISTS idx_tasks_done ON tasks(done);
            CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn rebuild(&self, tasks: &[Task]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch("DELETE FROM tasks;")?;

        for task in tasks {
            tx.execute(
                "INSERT INTO tasks (id, title, description, due_date, priority, done, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    task.id, task.title, task.description,
                    task.due_date.to_string(),
                    task.priority.rank(),
                    task.done,
                    task.created_at.to_rfc3339(), task.updated_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn upsert(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO tasks (id, title, description, due_date, priority, done, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id, task.title, task.description,
                task.due_date.to_string(),
                task.priority.rank(),
                task.done,
                task.created_at.to_rfc3339(), task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn remove(&self, id: &TaskId) -> Result<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// IDs matching the conjunction of the given predicates, in listing
    /// order (due date, then creation time, then id). An absent predicate
    /// is a wildcard.
    pub fn filtered(
        &self,
        date: Option<NaiveDate>,
        priority: Option<Priority>,
        done: Option<bool>,
    ) -> Result<Vec<TaskId>> {
        let mut sql = String::from("SELECT id FROM tasks");
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(d) = date {
            clauses.push("due_date = ?");
            values.push(Value::Text(d.to_string()));
        }
        if let Some(p) = priority {
            clauses.push("priority = ?");
            values.push(Value::Integer(p.rank() as i64));
        }
        if let Some(flag) = done {
            clauses.push("done = ?");
            values.push(Value::Integer(flag as i64));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY due_date, created_at, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(values), |row| row.get(0))?
            .collect::<std::result::Result<Vec<TaskId>, _>>()?;
        Ok(ids)
    }

    /// IDs of tasks due on an exact date, in listing order.
    pub fn on_date(&self, date: NaiveDate) -> Result<Vec<TaskId>> {
        self.filtered(Some(date), None, None)
    }

    /// Aggregated calendar rows for an inclusive date range, grouped by
    /// (date, priority, done). Within a day, higher priorities come first.
    pub fn day_marks(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DayMarkRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT due_date, priority, done, COUNT(*) FROM tasks
             WHERE due_date >= ?1 AND due_date <= ?2
             GROUP BY due_date, priority, done
             ORDER BY due_date, priority, done",
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u8>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, usize>(3)?,
            ))
        })?;

        let mut marks = Vec::new();
        for row in rows {
            let (date_text, rank, done, count) = row?;
            let date = date_text.parse::<NaiveDate>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            // Unknown rank would mean a corrupt index row; rebuild fixes it,
            // so surface it as a conversion error rather than guessing.
            let priority = Priority::from_rank(rank).ok_or_else(|| {
                rusqlite::Error::IntegralValueOutOfRange(1, rank as i64)
            })?;
            marks.push(DayMarkRow {
                date,
                priority,
                done,
                count,
            });
        }
        Ok(marks)
    }

    pub fn get_fingerprint(&self) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = 'fingerprint'")?;
        let result = stmt.query_row([], |row| row.get::<_, String>(0));
        match result {
            Ok(fp) => Ok(Some(fp)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_fingerprint(&self, fingerprint: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('fingerprint', ?1)",
            params![fingerprint],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    fn make_task(due: &str, priority: Priority, done: bool) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::generate(),
            title: format!("Task due {due}"),
            description: None,
            due_date: date(due),
            priority,
            done,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rebuild_and_filter_by_date() {
        let idx = Index::open_memory().unwrap();
        let tasks = vec![
            make_task("2026-08-26", Priority::High, false),
            make_task("2026-08-26", Priority::Low, false),
            make_task("2026-08-27", Priority::Medium, false),
        ];
        idx.rebuild(&tasks).unwrap();

        assert_eq!(idx.on_date(date("2026-08-26")).unwrap().len(), 2);
        assert_eq!(idx.on_date(date("2026-08-27")).unwrap().len(), 1);
        assert!(idx.on_date(date("2026-08-28")).unwrap().is_empty());
    }

    #[test]
    fn filters_combine_by_conjunction() {
        let idx = Index::open_memory().unwrap();
        let tasks = vec![
            make_task("2026-08-26", Priority::High, false),
            make_task("2026-08-26", Priority::Low, true),
            make_task("2026-08-27", Priority::High, false),
        ];
        idx.rebuild(&tasks).unwrap();

        // Wildcard matches everything
        assert_eq!(idx.filtered(None, None, None).unwrap().len(), 3);
        // Single predicates
        assert_eq!(
            idx.filtered(None, Some(Priority::High), None).unwrap().len(),
            2
        );
        // Conjunction narrows
        assert_eq!(
            idx.filtered(Some(date("2026-08-26")), Some(Priority::High), None)
                .unwrap()
                .len(),
            1
        );
        // No matches
        assert!(
            idx.filtered(Some(date("2026-08-28")), Some(Priority::High), None)
                .unwrap()
                .is_empty()
        );
        // Done flag participates in the conjunction
        assert_eq!(idx.filtered(None, None, Some(true)).unwrap().len(), 1);
    }

    #[test]
    fn filtered_on_empty_index_returns_nothing() {
        let idx = Index::open_memory().unwrap();
        idx.rebuild(&[]).unwrap();
        assert!(idx.filtered(None, None, None).unwrap().is_empty());
    }

    #[test]
    fn filtered_orders_by_due_date() {
        let idx = Index::open_memory().unwrap();
        let late = make_task("2026-09-02", Priority::Low, false);
        let early = make_task("2026-08-26", Priority::Low, false);
        let mid = make_task("2026-08-30", Priority::Low, false);
        idx.rebuild(&[late.clone(), early.clone(), mid.clone()]).unwrap();

        let ids = idx.filtered(None, None, None).unwrap();
        assert_eq!(ids, vec![early.id, mid.id, late.id]);
    }

    #[test]
    fn upsert_replaces_existing_row() {
        let idx = Index::open_memory().unwrap();
        let mut task = make_task("2026-08-26", Priority::Low, false);
        idx.rebuild(std::slice::from_ref(&task)).unwrap();

        task.done = true;
        idx.upsert(&task).unwrap();

        assert_eq!(idx.filtered(None, None, Some(true)).unwrap(), vec![task.id]);
        assert_eq!(idx.filtered(None, None, None).unwrap().len(), 1);
    }

    #[test]
    fn remove_drops_row() {
        let idx = Index::open_memory().unwrap();
        let task = make_task("2026-08-26", Priority::Low, false);
        idx.rebuild(std::slice::from_ref(&task)).unwrap();
        idx.remove(&task.id).unwrap();
        assert!(idx.filtered(None, None, None).unwrap().is_empty());
    }

    #[test]
    fn day_marks_aggregate_by_date_priority_done() {
        let idx = Index::open_memory().unwrap();
        let tasks = vec![
            make_task("2026-08-26", Priority::High, false),
            make_task("2026-08-26", Priority::High, false),
            make_task("2026-08-26", Priority::High, true),
            make_task("2026-08-27", Priority::Low, false),
            // Outside the queried range
            make_task("2026-09-05", Priority::Medium, false),
        ];
        idx.rebuild(&tasks).unwrap();

        let marks = idx
            .day_marks(date("2026-08-01"), date("2026-08-31"))
            .unwrap();
        assert_eq!(marks.len(), 3);

        assert_eq!(
            marks[0],
            DayMarkRow {
                date: date("2026-08-26"),
                priority: Priority::High,
                done: false,
                count: 2,
            }
        );
        assert_eq!(
            marks[1],
            DayMarkRow {
                date: date("2026-08-26"),
                priority: Priority::High,
                done: true,
                count: 1,
            }
        );
        assert_eq!(marks[2].date, date("2026-08-27"));
        assert_eq!(marks[2].priority, Priority::Low);
    }

    #[test]
    fn fingerprint_round_trips_through_metadata() {
        let idx = Index::open_memory().unwrap();
        assert_eq!(idx.get_fingerprint().unwrap(), None);
        idx.set_fingerprint("abc:1:2").unwrap();
        assert_eq!(idx.get_fingerprint().unwrap().as_deref(), Some("abc:1:2"));
        idx.set_fingerprint("def:3:4").unwrap();
        assert_eq!(idx.get_fingerprint().unwrap().as_deref(), Some("def:3:4"));
    }
}
