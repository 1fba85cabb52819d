use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{Priority, Task};

/// A displayed month, e.g. March 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month is always in 1..=12")
    }

    pub fn last_day(self) -> NaiveDate {
        let day = days_in_month(self.year, self.month);
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .expect("month is always in 1..=12")
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Display label, e.g. "March 2026".
    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    /// Parse "YYYY-MM".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid month '{s}': expected YYYY-MM"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid month '{s}': expected YYYY-MM"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month '{s}': expected YYYY-MM"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("invalid month '{s}': month must be 01-12"));
        }
        Ok(Self { year, month })
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.expect("month is always in 1..=12")
        .pred_opt()
        .expect("day before month start always exists")
        .day()
}

/// Dot indicator for a day cell: tasks of one priority, split by
/// completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayMark {
    pub priority: Priority,
    pub done: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub marks: Vec<DayMark>,
}

impl DayCell {
    pub fn total_tasks(&self) -> usize {
        self.marks.iter().map(|m| m.count).sum()
    }

    pub fn all_done(&self) -> bool {
        !self.marks.is_empty() && self.marks.iter().all(|m| m.done)
    }

    /// Highest-urgency priority among pending marks, falling back to done
    /// marks. None for an empty day.
    pub fn dominant_priority(&self) -> Option<Priority> {
        self.marks
            .iter()
            .filter(|m| !m.done)
            .min_by_key(|m| m.priority.rank())
            .or_else(|| self.marks.iter().min_by_key(|m| m.priority.rank()))
            .map(|m| m.priority)
    }
}

/// Sunday-first month grid: a pure function of (month, task list).
/// Holds no state beyond the month it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: Month,
    pub label: String,
    /// Blank slots before day 1 (weekday offset, Sunday = 0).
    pub leading_blanks: usize,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn build(
        month: Month,
        tasks: &[Task],
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Self {
        let first = month.first_day();
        let leading_blanks = first.weekday().num_days_from_sunday() as usize;
        let days = days_in_month(month.year, month.month);

        let mut cells = Vec::with_capacity(days as usize);
        for day in 1..=days {
            let date = NaiveDate::from_ymd_opt(month.year, month.month, day)
                .expect("day is within the month");
            cells.push(DayCell {
                date,
                day,
                is_today: date == today,
                is_selected: selected == Some(date),
                marks: marks_for_date(tasks, date),
            });
        }

        Self {
            month,
            label: month.label(),
            leading_blanks,
            cells,
        }
    }

    /// Rows of seven slots, None for blanks before/after the month.
    pub fn weeks(&self) -> Vec<Vec<Option<&DayCell>>> {
        let mut slots: Vec<Option<&DayCell>> = vec![None; self.leading_blanks];
        slots.extend(self.cells.iter().map(Some));
        while slots.len() % 7 != 0 {
            slots.push(None);
        }
        slots.chunks(7).map(|chunk| chunk.to_vec()).collect()
    }
}

fn marks_for_date(tasks: &[Task], date: NaiveDate) -> Vec<DayMark> {
    let mut marks = Vec::new();
    for done in [false, true] {
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            let count = tasks
                .iter()
                .filter(|t| t.due_date == date && t.priority == priority && t.done == done)
                .count();
            if count > 0 {
                marks.push(DayMark {
                    priority,
                    done,
                    count,
                });
            }
        }
    }
    marks
}
