use clap::ValueEnum;
use colored::{ColoredString, Colorize};

use crate::calendar::MonthGrid;
use crate::error::Result;
use crate::model::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

/// Colored priority badge, matching the dot colors of the calendar.
pub fn priority_badge(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".green(),
    }
}

fn colored_dot(priority: Priority, done: bool) -> ColoredString {
    let dot = match priority {
        Priority::High => "●".red(),
        Priority::Medium => "●".yellow(),
        Priority::Low => "●".green(),
    };
    if done { dot.dimmed() } else { dot }
}

pub fn short_id(task: &Task) -> &str {
    &task.id.as_str()[..8]
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(task)?),
        Format::Pretty => {
            let title = if task.done {
                task.title.strikethrough().dimmed().to_string()
            } else {
                task.title.clone()
            };
            println!("[{}] {}", short_id(task), title);
            println!(
                "  due: {} | priority: {}{}",
                task.due_date,
                priority_badge(task.priority),
                if task.done { " | done" } else { "" }
            );
            if let Some(ref desc) = task.description {
                println!("  {}", desc);
            }
        }
        Format::Minimal => {
            let title = truncate_title(&task.title, 24);
            println!(
                "{:8} {:10} {:6} {:4} {}",
                short_id(task),
                task.due_date.to_string(),
                task.priority.to_string(),
                if task.done { "done" } else { "-" },
                title
            );
        }
    }
    Ok(())
}

pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() > max_len {
        let truncated: String = title.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}

pub fn print_tasks(tasks: &[Task], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(tasks)?),
        Format::Pretty => {
            if tasks.is_empty() {
                println!("no tasks match");
                return Ok(());
            }
            for task in tasks {
                print_task(task, Format::Pretty)?;
                println!();
            }
        }
        Format::Minimal => {
            println!(
                "{:8} {:10} {:6} {:4} TITLE",
                "ID", "DATE", "PRI", "DONE"
            );
            println!("{}", "-".repeat(56));
            for task in tasks {
                print_task(task, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

/// Text rendering of the month grid: Sunday-first rows, one colored dot
/// per day colored by its most urgent pending priority (dimmed when the
/// whole day is done).
pub fn render_calendar(grid: &MonthGrid) -> String {
    let mut out = String::new();

    // Center the label over the 7 * 4 character grid
    let width: usize = 28;
    let pad = width.saturating_sub(grid.label.len()) / 2;
    out.push_str(&" ".repeat(pad));
    out.push_str(&grid.label);
    out.push('\n');
    out.push_str(" Su  Mo  Tu  We  Th  Fr  Sa\n");

    for week in grid.weeks() {
        for slot in week {
            match slot {
                None => out.push_str("    "),
                Some(cell) => {
                    let day = format!("{:>3}", cell.day);
                    let day = if cell.is_today {
                        day.bold().reversed().to_string()
                    } else if cell.is_selected {
                        day.bold().underline().to_string()
                    } else {
                        day
                    };
                    out.push_str(&day);
                    match cell.dominant_priority() {
                        Some(priority) => {
                            out.push_str(&colored_dot(priority, cell.all_done()).to_string())
                        }
                        None => out.push(' '),
                    }
                }
            }
        }
        out.push('\n');
    }

    out
}
