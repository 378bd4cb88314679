use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use jiff::civil::Date;

use crate::{
    countdown::Thresholds,
    models::{
        holiday::HolidayCalendar,
        store::Store,
        task::{Schedule, Task},
    },
    services::{
        TaskLookupError,
        holidays::{
            AddHolidayError, AddHolidayParameters, ImportHolidaysError, ImportHolidaysParameters,
            RemoveHolidayError, RemoveHolidayParameters, add_holiday, import_holidays,
            remove_holiday,
        },
        schedule::{
            PauseTaskError, PauseTaskParameters, ResumeTaskError, ResumeTaskParameters,
            pause_task, resume_task,
        },
        tasks::{
            AddTaskError, AddTaskParameters, CompleteTaskError, CompleteTaskParameters,
            DeleteTaskError, DeleteTaskParameters, ReopenTaskError, ReopenTaskParameters,
            RestoreTaskError, RestoreTaskParameters, UpdateTaskError, UpdateTaskParameters,
            add_task, complete_task, delete_task, reopen_task, restore_task, update_task,
        },
    },
    storage::{Storage, json::JsonFileStorage},
};

mod calendar;
mod countdown;
mod models;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "ritrack",
    about = "A working-day countdown tracker for risk mitigation tasks"
)]
struct Cli {
    /// Evaluate all countdowns as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    as_of: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show bucketed countdown counts and year stats
    Dashboard {
        /// Year to report on (defaults to the current year)
        #[arg(long)]
        year: Option<i16>,
    },

    /// List ongoing tasks with their countdowns
    Ongoing {
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortKey::Created)]
        sort: SortKey,
    },

    /// List completed tasks
    Done {
        /// Only tasks issued in this year
        #[arg(long)]
        year: Option<i16>,
    },

    /// Show deleted tasks
    Trash,

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Issue date the countdown starts from (YYYY-MM-DD)
        #[arg(short, long)]
        issued: Option<String>,

        /// Allotted duration in working days
        #[arg(short, long)]
        duration: Option<i64>,

        /// Identifier of the risk being mitigated
        #[arg(long)]
        risk_id: Option<u32>,

        /// Number of mitigation plans attached
        #[arg(long)]
        mitigations: Option<u32>,

        /// Reference number of the issuing memo
        #[arg(long)]
        reference: Option<String>,

        /// Unit or person that raised the risk
        #[arg(long)]
        initiator: Option<String>,

        /// Person in charge (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        pic: Vec<String>,

        /// Who assigned the task
        #[arg(long)]
        assigned_by: Option<String>,

        /// Free-form remarks
        #[arg(long)]
        remarks: Option<String>,
    },

    /// Edit fields of an existing task
    Update {
        /// Task number or part of the title
        task: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Issue date (YYYY-MM-DD)
        #[arg(short, long)]
        issued: Option<String>,

        /// Allotted duration in working days
        #[arg(short, long)]
        duration: Option<i64>,

        /// Data completeness progress, 0-100
        #[arg(long)]
        progress: Option<u8>,

        #[arg(long)]
        risk_id: Option<u32>,

        #[arg(long)]
        mitigations: Option<u32>,

        #[arg(long)]
        reference: Option<String>,

        #[arg(long)]
        initiator: Option<String>,

        /// Replace the persons in charge (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        pic: Vec<String>,

        #[arg(long)]
        assigned_by: Option<String>,

        #[arg(long)]
        remarks: Option<String>,
    },

    /// Complete a task
    Complete { task: String },

    /// Reopen a completed task
    Reopen { task: String },

    /// Freeze a task's countdown
    Pause {
        /// Task number or part of the title
        task: String,

        /// Backdate the pause to this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        on: Option<String>,
    },

    /// Continue a paused task's countdown
    Resume {
        /// Task number or part of the title
        task: String,

        /// Backdate the resume to this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        on: Option<String>,
    },

    /// Move a task to the trash
    Delete { task: String },

    /// Restore a task from the trash
    Restore { task_number: u64 },

    /// Manage the public-holiday calendar
    #[command(subcommand)]
    Holiday(HolidayCommands),
}

#[derive(Debug, Subcommand)]
enum HolidayCommands {
    /// Record a holiday
    Add {
        /// Holiday date (YYYY-MM-DD)
        date: String,
        /// Holiday name
        name: Option<String>,
    },
    /// Remove a holiday
    Remove {
        /// Holiday date (YYYY-MM-DD)
        date: String,
    },
    /// List holidays for a year
    List {
        /// Year to list (defaults to the current year)
        #[arg(long)]
        year: Option<i16>,
    },
    /// Import a holiday-service JSON export
    Import { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    /// Newest first
    Created,
    /// By issue date
    Issued,
    /// By allotted duration
    Duration,
    /// Most urgent first
    Countdown,
}

fn parse_date_arg(value: &str, flag: &str) -> Date {
    match value.parse::<Date>() {
        Ok(date) => date,
        Err(e) => {
            eprintln!("Error: Invalid {} date '{}': {}", flag, value, e);
            eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
            std::process::exit(1);
        }
    }
}

fn report_lookup_error(error: &TaskLookupError) {
    match error {
        TaskLookupError::TaskNotFound(identifier) => {
            eprintln!("Error: Task '{}' not found", identifier);
        }
        TaskLookupError::AmbiguousTaskName(titles) => {
            eprintln!("Error: Task name is ambiguous. Multiple tasks found:");
            for title in titles {
                eprintln!("  - {}", title);
            }
            eprintln!("\nPlease be more specific or use the task number.");
        }
    }
}

fn render_dashboard(store: &Store, year: i16, today: Date, holidays: &HolidayCalendar) {
    // Ongoing tasks issued in the year; tasks with no issue date have no year
    // and always show up (their countdown is undefined, so they land in the
    // "other" bucket)
    let ongoing: Vec<&Task> = store
        .get_ongoing_tasks()
        .filter(|t| t.issued_on.is_none_or(|d| d.year() == year))
        .collect();

    let counts = countdown::tally(ongoing.iter().copied(), today, holidays);

    ui::render_view_header(&format!("Dashboard {}", year), counts.total);
    if holidays.is_empty() {
        println!(
            "  {}\n",
            "No holidays recorded; only weekends excluded".dimmed()
        );
    }
    ui::render_bucket_chart(&counts);

    let published: Vec<&Task> = store
        .get_completed_tasks()
        .filter(|t| t.issued_on.is_some_and(|d| d.year() == year))
        .collect();
    let total_mitigations: u64 = published
        .iter()
        .filter_map(|t| t.mitigation_plans)
        .map(u64::from)
        .sum();

    println!();
    ui::render_stat("Published tasks", published.len() as u64);
    ui::render_stat("Mitigation plans", total_mitigations);
}

fn main() {
    let cli = Cli::parse();

    // Initialize storage
    let storage_path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ritrack")
        .join("store.json");

    // Create parent directory if it doesn't exist
    if let Some(parent) = storage_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Error: Failed to create data directory: {}", e);
            std::process::exit(1);
        });
    }

    let storage = JsonFileStorage::new(storage_path);

    let mut store = match storage.load() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to load store: {}", e);
            std::process::exit(1);
        }
    };

    // The reference date every countdown is evaluated against. --as-of
    // substitutes a simulated date for the system clock.
    let today = match &cli.as_of {
        Some(value) => parse_date_arg(value, "--as-of"),
        None => jiff::Zoned::now().date(),
    };
    let holidays = store.holiday_calendar();

    match cli.command {
        Some(Commands::Dashboard { year }) => {
            render_dashboard(&store, year.unwrap_or(today.year()), today, &holidays);
        }
        Some(Commands::Ongoing { sort }) => {
            let mut tasks: Vec<&Task> = store.get_ongoing_tasks().collect();

            match sort {
                SortKey::Created => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
                SortKey::Issued => tasks.sort_by_key(|t| (t.issued_on.is_none(), t.issued_on)),
                SortKey::Duration => {
                    tasks.sort_by_key(|t| (t.duration_workdays.is_none(), t.duration_workdays))
                }
                SortKey::Countdown => tasks.sort_by_key(|t| {
                    let value = countdown::remaining_working_days(t, today, &holidays);
                    (value.is_none(), value)
                }),
            }

            if tasks.is_empty() {
                println!("No ongoing tasks");
            } else {
                ui::render_view_header(
                    &format!("Ongoing ({})", today.strftime("%b %d")),
                    tasks.len(),
                );
                for task in tasks {
                    let display =
                        countdown::countdown_display(task, today, &holidays, Thresholds::CANONICAL);
                    ui::render_task_line(task, &display);
                    ui::render_task_meta_line(task, countdown::deadline(task, &holidays));

                    // The canonical resumed countdown clamps at zero; call
                    // out the tasks it would otherwise report as negative
                    if matches!(task.schedule, Schedule::Resumed { .. })
                        && countdown::remaining_working_days_unclamped(task, today, &holidays)
                            .is_some_and(|days| days < 0)
                    {
                        println!("       {}", "over deadline since resuming".red());
                    }
                }
            }
        }
        Some(Commands::Done { year }) => {
            let mut completed: Vec<&Task> = store
                .get_completed_tasks()
                .filter(|t| match year {
                    Some(year) => t.issued_on.is_some_and(|d| d.year() == year),
                    None => true,
                })
                .collect();

            if completed.is_empty() {
                println!("No completed tasks");
            } else {
                // Most recently completed first
                completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

                ui::render_view_header("Done", completed.len());
                for task in completed {
                    println!(
                        "  {}  {}  {}",
                        format!("{:>3}", task.task_number).dimmed(),
                        "✓".dimmed(),
                        task.title.dimmed()
                    );
                    if let Some(completed_at) = task.completed_at {
                        println!(
                            "       {}",
                            format!(
                                "completed {}",
                                ui::format_completion_date(completed_at, today)
                            )
                            .dimmed()
                        );
                    }
                }
            }
        }
        Some(Commands::Trash) => {
            let mut deleted_tasks: Vec<&Task> = store.get_deleted_tasks().collect();

            if deleted_tasks.is_empty() {
                println!("Trash is empty");
            } else {
                deleted_tasks.sort_by_key(|t| t.task_number);
                ui::render_view_header("Trash", deleted_tasks.len());
                for task in deleted_tasks {
                    println!(
                        "  {} {} {}",
                        "•".dimmed(),
                        format!("#{}", task.task_number).dimmed(),
                        task.title.dimmed()
                    );
                }
            }
        }
        Some(Commands::Add {
            title,
            issued,
            duration,
            risk_id,
            mitigations,
            reference,
            initiator,
            pic,
            assigned_by,
            remarks,
        }) => {
            let params = AddTaskParameters {
                title,
                risk_id,
                mitigation_plans: mitigations,
                reference_no: reference,
                initiator,
                pics: pic,
                assigned_by,
                remarks,
                issued_on: issued,
                duration_workdays: duration,
                progress_percent: 0,
            };

            match add_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task added: {}", task.title);
                    println!("  #{}", task.task_number);
                    let display =
                        countdown::countdown_display(&task, today, &holidays, Thresholds::CANONICAL);
                    if let Some(deadline) = countdown::deadline(&task, &holidays) {
                        println!(
                            "  Due {} ({})",
                            ui::format_short_date(deadline),
                            display.text
                        );
                    }
                }
                Err(AddTaskError::InvalidIssueDate(date_str, error)) => {
                    eprintln!("Error: Invalid issue date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
                    std::process::exit(1);
                }
                Err(AddTaskError::InvalidProgress(value)) => {
                    eprintln!("Error: Progress {}% is out of range (0-100)", value);
                    std::process::exit(1);
                }
                Err(AddTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Update {
            task,
            title,
            issued,
            duration,
            progress,
            risk_id,
            mitigations,
            reference,
            initiator,
            pic,
            assigned_by,
            remarks,
        }) => {
            let params = UpdateTaskParameters {
                task_number_or_fuzzy_name: task,
                title,
                risk_id,
                mitigation_plans: mitigations,
                reference_no: reference,
                initiator,
                pics: pic,
                assigned_by,
                remarks,
                issued_on: issued,
                duration_workdays: duration,
                progress_percent: progress,
            };

            match update_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task updated: {}", task.title);
                    println!("  #{}", task.task_number);
                }
                Err(UpdateTaskError::Lookup(e)) => {
                    report_lookup_error(&e);
                    std::process::exit(1);
                }
                Err(UpdateTaskError::InvalidIssueDate(date_str, error)) => {
                    eprintln!("Error: Invalid issue date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
                    std::process::exit(1);
                }
                Err(UpdateTaskError::InvalidProgress(value)) => {
                    eprintln!("Error: Progress {}% is out of range (0-100)", value);
                    std::process::exit(1);
                }
                Err(UpdateTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Complete { task }) => {
            let params = CompleteTaskParameters {
                task_number_or_fuzzy_name: task,
            };

            match complete_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task completed: {}", task.title);
                    println!("  #{}", task.task_number);
                }
                Err(CompleteTaskError::Lookup(e)) => {
                    report_lookup_error(&e);
                    std::process::exit(1);
                }
                Err(CompleteTaskError::TaskAlreadyCompleted(title)) => {
                    eprintln!("Error: Task '{}' is already completed", title);
                    std::process::exit(1);
                }
                Err(CompleteTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Reopen { task }) => {
            let params = ReopenTaskParameters {
                task_number_or_fuzzy_name: task,
            };

            match reopen_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task reopened: {}", task.title);
                    println!("  #{}", task.task_number);
                }
                Err(ReopenTaskError::Lookup(e)) => {
                    report_lookup_error(&e);
                    std::process::exit(1);
                }
                Err(ReopenTaskError::TaskNotCompleted(title)) => {
                    eprintln!("Error: Task '{}' is not completed", title);
                    std::process::exit(1);
                }
                Err(ReopenTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Pause { task, on }) => {
            let params = PauseTaskParameters {
                task_number_or_fuzzy_name: task,
                paused_on: on.map(|value| parse_date_arg(&value, "--on")),
                today,
            };

            match pause_task(&mut store, &storage, &holidays, params) {
                Ok(task) => {
                    println!("✓ Task paused: {}", task.title);
                    let display =
                        countdown::countdown_display(&task, today, &holidays, Thresholds::CANONICAL);
                    println!("  {}", display.text);
                }
                Err(PauseTaskError::Lookup(e)) => {
                    report_lookup_error(&e);
                    std::process::exit(1);
                }
                Err(PauseTaskError::TaskAlreadyPaused(title)) => {
                    eprintln!("Error: Task '{}' is already paused", title);
                    std::process::exit(1);
                }
                Err(PauseTaskError::TaskCompleted(title)) => {
                    eprintln!("Error: Task '{}' is completed; nothing to pause", title);
                    std::process::exit(1);
                }
                Err(PauseTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Resume { task, on }) => {
            let params = ResumeTaskParameters {
                task_number_or_fuzzy_name: task,
                resumed_on: on.map(|value| parse_date_arg(&value, "--on")),
                today,
            };

            match resume_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task resumed: {}", task.title);
                    let display =
                        countdown::countdown_display(&task, today, &holidays, Thresholds::CANONICAL);
                    println!("  {}", display.text);
                }
                Err(ResumeTaskError::Lookup(e)) => {
                    report_lookup_error(&e);
                    std::process::exit(1);
                }
                Err(ResumeTaskError::TaskNotPaused(title)) => {
                    eprintln!("Error: Task '{}' is not paused", title);
                    std::process::exit(1);
                }
                Err(ResumeTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Delete { task }) => {
            let params = DeleteTaskParameters {
                task_number_or_fuzzy_name: task,
            };

            match delete_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task moved to trash: {}", task.title);
                    println!("  Restore with: ritrack restore {}", task.task_number);
                }
                Err(DeleteTaskError::Lookup(e)) => {
                    report_lookup_error(&e);
                    std::process::exit(1);
                }
                Err(DeleteTaskError::TaskAlreadyDeleted(title)) => {
                    eprintln!("Error: Task '{}' is already deleted", title);
                    std::process::exit(1);
                }
                Err(DeleteTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Restore { task_number }) => {
            let params = RestoreTaskParameters { task_number };

            match restore_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task restored: {}", task.title);
                    println!("  #{}", task.task_number);
                }
                Err(RestoreTaskError::TaskNotFound(identifier)) => {
                    eprintln!("Error: Task '{}' not found", identifier);
                    std::process::exit(1);
                }
                Err(RestoreTaskError::TaskNotDeleted(title)) => {
                    eprintln!("Error: Task '{}' is not deleted", title);
                    std::process::exit(1);
                }
                Err(RestoreTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Holiday(HolidayCommands::Add { date, name })) => {
            let params = AddHolidayParameters { date, name };

            match add_holiday(&mut store, &storage, params) {
                Ok(holiday) => {
                    println!(
                        "✓ Holiday recorded: {}{}",
                        ui::format_short_date(holiday.date),
                        holiday
                            .name
                            .map(|n| format!(" ({})", n))
                            .unwrap_or_default()
                    );
                }
                Err(AddHolidayError::InvalidDate(date_str, error)) => {
                    eprintln!("Error: Invalid holiday date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
                    std::process::exit(1);
                }
                Err(AddHolidayError::Storage(e)) => {
                    eprintln!("Error: Failed to save holiday: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Holiday(HolidayCommands::Remove { date })) => {
            let params = RemoveHolidayParameters { date };

            match remove_holiday(&mut store, &storage, params) {
                Ok(date) => {
                    println!("✓ Holiday removed: {}", ui::format_short_date(date));
                }
                Err(RemoveHolidayError::InvalidDate(date_str, error)) => {
                    eprintln!("Error: Invalid holiday date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
                    std::process::exit(1);
                }
                Err(RemoveHolidayError::HolidayNotFound(date)) => {
                    eprintln!("Error: No holiday recorded on {}", date);
                    std::process::exit(1);
                }
                Err(RemoveHolidayError::Storage(e)) => {
                    eprintln!("Error: Failed to save holidays: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Holiday(HolidayCommands::List { year })) => {
            let year = year.unwrap_or(today.year());
            let holidays_in_year: Vec<_> = store.holidays_in_year(year).collect();

            if holidays_in_year.is_empty() {
                println!("No holidays recorded for {}", year);
            } else {
                println!(
                    "\n  {} ({})\n",
                    format!("Holidays {}", year).cyan().bold(),
                    holidays_in_year.len()
                );
                for holiday in holidays_in_year {
                    println!(
                        "  {} {}  {}",
                        "•".green(),
                        ui::format_short_date(holiday.date),
                        holiday.name.as_deref().unwrap_or("").dimmed()
                    );
                }
            }
        }
        Some(Commands::Holiday(HolidayCommands::Import { file })) => {
            let params = ImportHolidaysParameters { path: file };

            match import_holidays(&mut store, &storage, params) {
                Ok(count) => {
                    println!("✓ Imported {} holidays", count);
                }
                Err(ImportHolidaysError::ReadFailed { path, source }) => {
                    eprintln!("Error: Failed to read '{}': {}", path.display(), source);
                    std::process::exit(1);
                }
                Err(ImportHolidaysError::ParseFailed { path, source }) => {
                    eprintln!(
                        "Error: '{}' is not a valid holiday export: {}",
                        path.display(),
                        source
                    );
                    std::process::exit(1);
                }
                Err(ImportHolidaysError::InvalidDate(date_str, error)) => {
                    eprintln!("Error: Invalid holiday date '{}' in export: {}", date_str, error);
                    std::process::exit(1);
                }
                Err(ImportHolidaysError::Storage(e)) => {
                    eprintln!("Error: Failed to save holidays: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            // Default: show the dashboard for the current year
            render_dashboard(&store, today.year(), today, &holidays);
        }
    }
}
