use std::io;
use std::path::Path;
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, NaiveDate, Utc};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::calendar::{Month, MonthGrid};
use crate::error::Result;
use crate::model::Task;
use crate::store::repo::Repo;

#[derive(Debug, Clone)]
pub struct CalendarTuiConfig {
    pub selected: NaiveDate,
    pub tick_rate: StdDuration,
}

impl Default for CalendarTuiConfig {
    fn default() -> Self {
        Self {
            selected: Utc::now().date_naive(),
            tick_rate: StdDuration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CalendarSnapshot {
    tasks: Vec<Task>,
    last_error: Option<String>,
}

#[derive(Debug, Clone)]
struct CalendarTuiApp {
    month: Month,
    selected: NaiveDate,
    tick_rate: StdDuration,
    help_visible: bool,
    needs_refresh: bool,
    snapshot: CalendarSnapshot,
}

impl CalendarTuiApp {
    fn new(config: CalendarTuiConfig) -> Self {
        Self {
            month: Month::containing(config.selected),
            selected: config.selected,
            tick_rate: config.tick_rate,
            help_visible: false,
            needs_refresh: true,
            snapshot: CalendarSnapshot::default(),
        }
    }

    fn refresh(&mut self, store_root: &Path) {
        match load_snapshot(store_root) {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(err) => self.snapshot.last_error = Some(err.to_string()),
        }
        self.needs_refresh = false;
    }

    /// Keep the selected day inside the displayed month when the month
    /// changes underneath it.
    fn clamp_selected(&mut self) {
        let first = self.month.first_day();
        let last = self.month.last_day();
        if self.selected < first {
            self.selected = first;
        } else if self.selected > last {
            self.selected = last;
        }
    }

    fn move_selected(&mut self, days: i64) {
        self.selected = self.selected + Duration::days(days);
        self.month = Month::containing(self.selected);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        match key.code {
            KeyCode::Char('q') => true,
            KeyCode::Char('r') => {
                self.needs_refresh = true;
                false
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.month = self.month.prev();
                self.clamp_selected();
                false
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.month = self.month.next();
                self.clamp_selected();
                false
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selected(1);
                false
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selected(-1);
                false
            }
            KeyCode::Char('t') => {
                self.selected = Utc::now().date_naive();
                self.month = Month::containing(self.selected);
                false
            }
            KeyCode::Char('?') => {
                self.help_visible = !self.help_visible;
                false
            }
            _ => false,
        }
    }

    fn render(&self, frame: &mut Frame) {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let today = Utc::now().date_naive();
        let grid = MonthGrid::build(self.month, &self.snapshot.tasks, today, Some(self.selected));

        let header = format!(
            "{}  selected={}  tasks={}{}",
            grid.label,
            self.selected,
            self.snapshot.tasks.len(),
            self.snapshot
                .last_error
                .as_ref()
                .map(|err| format!("  last_error={err}"))
                .unwrap_or_default()
        );
        frame.render_widget(
            Paragraph::new(header)
                .block(Block::default().borders(Borders::ALL).title("agenda"))
                .wrap(Wrap { trim: true }),
            vertical[0],
        );

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(vertical[1]);

        frame.render_widget(
            Paragraph::new(grid_text(&grid))
                .block(Block::default().borders(Borders::ALL).title("Calendar")),
            horizontal[0],
        );

        frame.render_widget(
            Paragraph::new(day_panel_text(&self.snapshot.tasks, self.selected))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Tasks on {}", self.selected)),
                )
                .wrap(Wrap { trim: true }),
            horizontal[1],
        );

        frame.render_widget(
            Paragraph::new(
                "q quit | h/l month | j/k day | t today | r refresh | ? help",
            )
            .block(Block::default().borders(Borders::ALL).title("Controls")),
            vertical[2],
        );

        if self.help_visible {
            let popup = centered_rect(70, 50, frame.area());
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(
                    "Calendar controls:\n\n- q: quit\n- h / left: previous month\n- l / right: next month\n- j / down: next day\n- k / up: previous day\n- t: jump to today\n- r: reload tasks from disk\n- ?: toggle this help",
                )
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .wrap(Wrap { trim: true }),
                popup,
            );
        }
    }
}

pub fn run_tui(store_root: &Path, config: CalendarTuiConfig) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = CalendarTuiApp::new(config);
    let run_result = run_loop(store_root, &mut terminal, &mut app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

fn run_loop<B: Backend>(
    store_root: &Path,
    terminal: &mut Terminal<B>,
    app: &mut CalendarTuiApp,
) -> Result<()> {
    app.refresh(store_root);
    let mut last_tick = Instant::now();

    loop {
        terminal
            .draw(|frame| app.render(frame))
            .map_err(|err| std::io::Error::other(err.to_string()))?;

        let timeout = app.tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && app.handle_key(key)
        {
            break;
        }

        if app.needs_refresh || last_tick.elapsed() >= app.tick_rate {
            app.refresh(store_root);
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn load_snapshot(store_root: &Path) -> Result<CalendarSnapshot> {
    let repo = Repo::open(store_root)?;
    Ok(CalendarSnapshot {
        tasks: repo.store.list_all()?,
        last_error: None,
    })
}

/// Plain-text month grid for the calendar pane. The selected day is
/// wrapped in `>` `<`, today in `[` `]`; a trailing dot marks a day with
/// tasks (`•` pending work, `·` everything done).
fn grid_text(grid: &MonthGrid) -> String {
    let mut out = String::new();
    out.push_str("  Su   Mo   Tu   We   Th   Fr   Sa\n");
    for week in grid.weeks() {
        for slot in week {
            match slot {
                None => out.push_str("     "),
                Some(cell) => {
                    let day = if cell.is_selected {
                        format!(">{}<", cell.day)
                    } else if cell.is_today {
                        format!("[{}]", cell.day)
                    } else {
                        cell.day.to_string()
                    };
                    let mark = if cell.total_tasks() == 0 {
                        ' '
                    } else if cell.all_done() {
                        '·'
                    } else {
                        '•'
                    };
                    out.push_str(&format!("{day:>4}{mark}"));
                }
            }
        }
        out.push('\n');
    }
    out
}

fn day_panel_text(tasks: &[Task], selected: NaiveDate) -> String {
    let mut day_tasks: Vec<&Task> = tasks.iter().filter(|t| t.due_date == selected).collect();
    day_tasks.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    if day_tasks.is_empty() {
        return "no tasks on this day".to_string();
    }

    day_tasks
        .iter()
        .map(|t| {
            format!(
                "{} [{}] {}",
                if t.done { "x" } else { " " },
                t.priority,
                t.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::store::files::FileStore;
    use crate::task_id::TaskId;
    use crossterm::event::KeyEvent;
    use ratatui::backend::TestBackend;
    use tempfile::tempdir;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    fn app_at(selected: &str) -> CalendarTuiApp {
        CalendarTuiApp::new(CalendarTuiConfig {
            selected: date(selected),
            tick_rate: StdDuration::from_millis(250),
        })
    }

    fn task_due(due: &str) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::generate(),
            title: "Panel task".into(),
            description: None,
            due_date: date(due),
            priority: Priority::High,
            done: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn month_keys_navigate_and_clamp_selection() {
        let mut app = app_at("2026-08-31");
        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('l')));
        assert_eq!(app.month, Month { year: 2026, month: 9 });
        // August 31 clamps to September's first day
        assert_eq!(app.selected, date("2026-09-01"));

        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('h')));
        assert_eq!(app.month, Month { year: 2026, month: 8 });
        assert_eq!(app.selected, date("2026-08-31"));
    }

    #[test]
    fn day_keys_cross_month_boundaries() {
        let mut app = app_at("2026-08-31");
        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(app.selected, date("2026-09-01"));
        assert_eq!(app.month, Month { year: 2026, month: 9 });

        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('k')));
        assert_eq!(app.selected, date("2026-08-31"));
        assert_eq!(app.month, Month { year: 2026, month: 8 });
    }

    #[test]
    fn today_key_returns_home() {
        let mut app = app_at("2020-01-15");
        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('t')));
        let today = Utc::now().date_naive();
        assert_eq!(app.selected, today);
        assert_eq!(app.month, Month::containing(today));
    }

    #[test]
    fn refresh_and_help_controls_toggle_expected_flags() {
        let mut app = app_at("2026-08-26");
        app.needs_refresh = false;
        app.help_visible = false;

        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('r')));
        assert!(app.needs_refresh);

        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('?')));
        assert!(app.help_visible);

        let _ = app.handle_key(KeyEvent::from(KeyCode::Char('?')));
        assert!(!app.help_visible);
    }

    #[test]
    fn quit_control_returns_true() {
        let mut app = app_at("2026-08-26");
        assert!(app.handle_key(KeyEvent::from(KeyCode::Char('q'))));
    }

    #[test]
    fn grid_text_marks_selected_and_busy_days() {
        let tasks = vec![task_due("2026-08-26")];
        let month = Month { year: 2026, month: 8 };
        let grid = MonthGrid::build(month, &tasks, date("2026-08-10"), Some(date("2026-08-26")));
        let text = grid_text(&grid);
        assert!(text.contains(">26<•"));
        assert!(text.contains("[10]"));
    }

    #[test]
    fn day_panel_lists_selected_day_only() {
        let tasks = vec![task_due("2026-08-26"), task_due("2026-08-27")];
        let text = day_panel_text(&tasks, date("2026-08-26"));
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("Panel task"));

        let empty = day_panel_text(&tasks, date("2026-08-28"));
        assert_eq!(empty, "no tasks on this day");
    }

    #[test]
    fn render_smoke_draws_panels_and_help_overlay() {
        let mut app = app_at("2026-08-26");
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();

        app.help_visible = true;
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn refresh_loads_tasks_from_initialized_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::init(dir.path()).unwrap();
        store
            .create(
                "Snapshot task".into(),
                None,
                date("2026-08-26"),
                Priority::Medium,
            )
            .unwrap();

        let mut app = app_at("2026-08-26");
        app.refresh(dir.path());
        assert_eq!(app.snapshot.tasks.len(), 1);
        assert!(app.snapshot.last_error.is_none());
        assert!(!app.needs_refresh);
    }
}
