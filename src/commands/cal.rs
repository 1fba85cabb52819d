use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::calendar::{Month, MonthGrid};
use crate::error::Result;
use crate::output::{self, Format};
use crate::store::repo::Repo;

/// Render the month calendar. `--date` selects a day (and defaults the
/// displayed month); selecting a day also lists its tasks, mirroring the
/// date filter in `list`.
pub fn run(
    store_root: &Path,
    month: Option<Month>,
    date: Option<NaiveDate>,
    format: Format,
) -> Result<()> {
    let repo = Repo::open(store_root)?;
    let today = Utc::now().date_naive();
    let month = month
        .or_else(|| date.map(Month::containing))
        .unwrap_or_else(|| Month::containing(today));

    let tasks = repo.store.list_all()?;
    let grid = MonthGrid::build(month, &tasks, today, date);

    match format {
        Format::Json => println!("{}", serde_json::to_string(&grid)?),
        _ => {
            print!("{}", output::render_calendar(&grid));
            if let Some(selected) = date {
                println!();
                let ids = repo.index.on_date(selected)?;
                let selected_tasks = repo.store.read_many(&ids)?;
                output::print_tasks(&selected_tasks, format)?;
            }
        }
    }
    Ok(())
}
