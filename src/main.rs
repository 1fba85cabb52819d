use agenda::calendar::Month;
use agenda::model::Priority;
use agenda::output::Format;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "agenda",
    version,
    long_version = agenda::build_info::long_version(),
    about = "Calendar-centric task manager for the command line"
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new .agenda/ store in the current directory
    Init,
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
        /// Task description
        #[arg(long, short)]
        description: Option<String>,
        /// Task priority
        #[arg(long, value_enum, default_value = "medium")]
        priority: Priority,
    },
    /// List and filter tasks (sorted by due date)
    List {
        /// Only tasks due on this exact date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only tasks with this priority (omit for all)
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        done: bool,
        /// Only open tasks
        #[arg(long, conflicts_with = "done")]
        pending: bool,
    },
    /// Display a single task
    Show {
        /// Task ID (full or unique prefix)
        id: String,
    },
    /// Edit task fields
    Edit {
        /// Task ID to edit
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, short)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// New priority
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },
    /// Mark a task as done (idempotent)
    Done {
        /// Task ID to complete
        id: String,
    },
    /// Delete a task by ID
    Delete {
        /// Task ID to delete
        id: String,
    },
    /// Delete all tasks
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Replace the store with example tasks
    Seed,
    /// Render the month calendar
    Cal {
        /// Month to display (YYYY-MM; default: current month)
        #[arg(long)]
        month: Option<Month>,
        /// Select a day (YYYY-MM-DD): highlights it and lists its tasks
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Open the interactive calendar
        #[arg(long)]
        tui: bool,
    },
}

fn run(cli: Cli, format: Format) -> agenda::error::Result<()> {
    // Init is dispatched before store discovery
    if let Commands::Init = cli.command {
        let cwd = std::env::current_dir()?;
        return agenda::commands::init::run(&cwd);
    }

    let root = agenda::store::repo::find_store_root()?;

    let resolve = |input: &str| {
        let repo = agenda::store::repo::Repo::open(&root)?;
        repo.resolve_task_id(input)
    };

    match cli.command {
        Commands::Init => unreachable!(),
        Commands::Add {
            title,
            due,
            description,
            priority,
        } => agenda::commands::add::run(&root, title, description, due, priority, format),
        Commands::List {
            date,
            priority,
            done,
            pending,
        } => {
            let done = match (done, pending) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            agenda::commands::list::run(&root, date, priority, done, format)
        }
        Commands::Show { id } => agenda::commands::show::run(&root, &resolve(&id)?, format),
        Commands::Edit {
            id,
            title,
            description,
            due,
            priority,
        } => agenda::commands::edit::run(
            &root,
            &resolve(&id)?,
            title,
            description,
            due,
            priority,
            format,
        ),
        Commands::Done { id } => agenda::commands::lifecycle::done(&root, &resolve(&id)?, format),
        Commands::Delete { id } => agenda::commands::delete::run(&root, &resolve(&id)?, format),
        Commands::Clear { yes } => agenda::commands::clear::run(&root, yes, format),
        Commands::Seed => agenda::commands::seed::run(&root, format),
        Commands::Cal { month, date, tui } => {
            if tui {
                let config = match date {
                    Some(selected) => agenda::commands::tui::CalendarTuiConfig {
                        selected,
                        ..Default::default()
                    },
                    None => Default::default(),
                };
                agenda::commands::tui::run_tui(&root, config)
            } else {
                agenda::commands::cal::run(&root, month, date, format)
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
