use chrono::Utc;
use clap::{Parser, Subcommand};
use liftlog_core::draft::{clear_draft, restore_draft, save_draft};
use liftlog_core::export::export_history_csv;
use liftlog_core::validate::normalize_workout_date;
use liftlog_core::view::{format_weight, set_summary, top_set_summary, QUICK_PICK_COUNT};
use liftlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Strength training log with top sets and estimated 1RM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout
    Log {
        /// Exercise name
        #[arg(long)]
        exercise: String,

        /// Workout date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// A set as REPSxWEIGHT, e.g. 5x100 (repeatable)
        #[arg(long = "set", value_parser = parse_set_arg)]
        sets: Vec<DraftSet>,

        /// Repeat the sets of the latest session for this exercise
        #[arg(long, conflicts_with = "sets")]
        reuse_last: bool,
    },

    /// Show the latest workout for an exercise
    Latest {
        #[arg(long)]
        exercise: String,
    },

    /// Show workout history and stats for an exercise, newest first
    History {
        #[arg(long)]
        exercise: String,

        /// Maximum sessions to show
        #[arg(long)]
        limit: Option<String>,
    },

    /// List logged exercises, most recent first
    Exercises {
        /// Show every exercise instead of the quick picks
        #[arg(long)]
        all: bool,
    },

    /// Append an exercise's history to a CSV file
    Export {
        #[arg(long)]
        exercise: String,

        /// CSV file to append to
        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        limit: Option<String>,
    },

    /// Work with the unsent workout draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Manage routine templates
    Routine {
        #[command(subcommand)]
        action: RoutineAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Show the current draft
    Show,

    /// Update the draft
    Set {
        #[arg(long)]
        exercise: Option<String>,

        #[arg(long)]
        date: Option<String>,

        /// Replace all rows; REPSxWEIGHT (repeatable)
        #[arg(long = "set", value_parser = parse_set_arg)]
        sets: Vec<DraftSet>,

        /// Append a copy of the last row
        #[arg(long)]
        copy_last: bool,
    },

    /// Log the draft as a workout and clear it
    Submit,

    /// Discard the draft
    Clear,
}

#[derive(Subcommand)]
enum RoutineAction {
    /// List routines
    List,

    /// Show a routine with the latest top set of each exercise
    Show { name: String },

    /// Add or replace a routine
    Add {
        name: String,

        /// Exercises in order
        #[arg(required = true)]
        exercises: Vec<String>,
    },

    /// Remove a routine
    Remove { name: String },
}

fn main() -> eyre::Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    run(cli)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Using data directory {:?}", data_dir);

    let service = WorkoutService::new(FileStore::new(&data_dir), ServiceSettings::from(&config));
    let side_store = FileSideStore::new(data_dir.join("client"));

    match cli.command {
        Commands::Log {
            exercise,
            date,
            sets,
            reuse_last,
        } => cmd_log(&service, exercise, date, sets, reuse_last),
        Commands::Latest { exercise } => cmd_latest(&service, &exercise),
        Commands::History { exercise, limit } => cmd_history(&service, &exercise, limit.as_deref()),
        Commands::Exercises { all } => cmd_exercises(&service, all),
        Commands::Export {
            exercise,
            out,
            limit,
        } => cmd_export(&service, &exercise, &out, limit.as_deref()),
        Commands::Draft { action } => cmd_draft(&service, &side_store, action),
        Commands::Routine { action } => cmd_routine(&service, &side_store, action),
    }
}

/// Parse `5x100`, `5X100` or `5@100` into a form row
fn parse_set_arg(raw: &str) -> std::result::Result<DraftSet, String> {
    let (reps, weight) = raw
        .split_once(['x', 'X', '@'])
        .ok_or_else(|| format!("expected REPSxWEIGHT (e.g. 5x100), got {:?}", raw))?;
    let row = DraftSet::new(reps, weight);
    if row.reps.is_empty() || row.weight.is_empty() {
        return Err(format!("expected REPSxWEIGHT (e.g. 5x100), got {:?}", raw));
    }
    Ok(row)
}

fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

fn load_view(service: &WorkoutService<FileStore>, exercise: &str) -> Result<ViewState> {
    let view = ViewState::new().select_exercise(exercise);
    let latest = service.latest_workout(Some(view.current_exercise()))?;
    Ok(view.with_exercise_data(latest, Vec::new()))
}

fn cmd_log(
    service: &WorkoutService<FileStore>,
    exercise: String,
    date: Option<String>,
    sets: Vec<DraftSet>,
    reuse_last: bool,
) -> Result<()> {
    let mut draft = Draft::blank(today());
    draft.exercise_name = exercise;
    if let Some(date) = date {
        draft.workout_date = date;
    }

    if reuse_last {
        let view = load_view(service, &draft.exercise_name)?;
        if !view.can_reuse_last() {
            return Err(Error::Other(format!(
                "No previous session to reuse for {}",
                view.current_exercise()
            )));
        }
        draft.reset_sets(view.reuse_last_sets());
    } else {
        // No padding row: an empty list must fail the set-count check
        draft.sets = sets;
    }

    let entry = service.log_workout(&draft.to_request(), Utc::now())?;
    println!("✓ Workout logged!");
    print_entry(&entry);
    Ok(())
}

fn cmd_latest(service: &WorkoutService<FileStore>, exercise: &str) -> Result<()> {
    match service.latest_workout(Some(exercise))? {
        Some(entry) => print_entry(&entry),
        None => println!("No workouts logged for {} yet.", sanitize_exercise_name(exercise)),
    }
    Ok(())
}

fn cmd_history(
    service: &WorkoutService<FileStore>,
    exercise: &str,
    limit: Option<&str>,
) -> Result<()> {
    let history = service.workout_history(Some(exercise), limit)?;
    let view = ViewState::new()
        .select_exercise(exercise)
        .with_exercise_data(history.first().cloned(), history);

    if view.history().is_empty() {
        println!("No workouts logged for {} yet.", view.current_exercise());
        return Ok(());
    }

    println!("{}", view.current_exercise());
    for entry in view.history() {
        println!(
            "  {}  top {}  est. 1RM {} kg",
            entry.workout_date,
            top_set_summary(&entry.derived),
            format_weight(entry.derived.est1rm)
        );
        println!("              {}", set_summary(&entry.sets));
    }

    if let Some(stats) = view.stats() {
        println!();
        println!("  Best top set:    {} kg", format_weight(stats.best_top_set_weight));
        println!("  Latest top set:  {} kg", format_weight(stats.latest_top_set_weight));
        println!("  Latest est. 1RM: {} kg", format_weight(stats.latest_est1rm));
        println!("  Sessions:        {}", stats.sessions);
    }
    Ok(())
}

fn cmd_exercises(service: &WorkoutService<FileStore>, all: bool) -> Result<()> {
    let view = ViewState::new().with_exercises(service.list_exercises()?);

    if view.exercises().is_empty() {
        println!("No exercises logged yet.");
        return Ok(());
    }

    let count = if all {
        view.exercises().len()
    } else {
        QUICK_PICK_COUNT
    };
    for entry in view.quick_picks(count) {
        println!("{}", entry.exercise_name);
    }
    Ok(())
}

fn cmd_export(
    service: &WorkoutService<FileStore>,
    exercise: &str,
    out: &Path,
    limit: Option<&str>,
) -> Result<()> {
    let history = service.workout_history(Some(exercise), limit)?;
    let rows = export_history_csv(&history, out)?;

    println!("✓ Exported {} sets from {} sessions", rows, history.len());
    println!("  CSV: {}", out.display());
    Ok(())
}

fn cmd_draft(
    service: &WorkoutService<FileStore>,
    side_store: &FileSideStore,
    action: DraftAction,
) -> Result<()> {
    let mut draft = restore_draft(side_store, today());

    match action {
        DraftAction::Show => print_draft(&draft),
        DraftAction::Set {
            exercise,
            date,
            sets,
            copy_last,
        } => {
            if let Some(exercise) = exercise {
                draft.exercise_name = sanitize_exercise_name(&exercise);
            }
            if let Some(date) = date {
                draft.workout_date =
                    normalize_workout_date(Some(&serde_json::Value::from(date.trim())), today())?;
            }
            if !sets.is_empty() {
                draft.reset_sets(sets);
            }
            if copy_last {
                draft.copy_last_set();
            }
            save_draft(side_store, &draft);
            print_draft(&draft);
        }
        DraftAction::Submit => {
            let entry = service.log_workout(&draft.to_request(), Utc::now())?;
            clear_draft(side_store);
            println!("✓ Draft logged!");
            print_entry(&entry);
        }
        DraftAction::Clear => {
            clear_draft(side_store);
            println!("✓ Draft cleared");
        }
    }
    Ok(())
}

fn cmd_routine(
    service: &WorkoutService<FileStore>,
    side_store: &FileSideStore,
    action: RoutineAction,
) -> Result<()> {
    let mut book = RoutineBook::load(side_store);

    match action {
        RoutineAction::List => {
            if book.is_empty() {
                println!("No routines saved yet.");
            }
            for routine in book.iter() {
                println!("{} ({})", routine.name, routine.exercises.join(", "));
            }
        }
        RoutineAction::Show { name } => {
            let routine = book
                .get(&name)
                .ok_or_else(|| Error::Other(format!("No routine named {}", name)))?;

            println!("{}", routine.name);
            for (i, exercise) in routine.exercises.iter().enumerate() {
                let view = load_view(service, exercise)?;
                let last = match view.latest() {
                    Some(entry) => format!(
                        "last {} on {}",
                        top_set_summary(&entry.derived),
                        entry.workout_date
                    ),
                    None => "not logged yet".to_string(),
                };
                println!("  {}. {}  {}", i + 1, exercise, last);
            }
        }
        RoutineAction::Add { name, exercises } => {
            let routine = book.upsert(&name, &exercises)?.clone();
            book.save(side_store);
            println!("✓ Saved routine {}", routine.name);
        }
        RoutineAction::Remove { name } => {
            if !book.remove(&name) {
                return Err(Error::Other(format!("No routine named {}", name)));
            }
            book.save(side_store);
            println!("✓ Removed routine {}", sanitize_exercise_name(&name));
        }
    }
    Ok(())
}

fn print_entry(entry: &WorkoutEntry) {
    println!("  {} on {}", entry.exercise_name, entry.workout_date);
    println!("  Sets:     {}", set_summary(&entry.sets));
    println!("  Top set:  {}", top_set_summary(&entry.derived));
    println!("  Est. 1RM: {} kg", format_weight(entry.derived.est1rm));
}

fn print_draft(draft: &Draft) {
    let exercise = if draft.exercise_name.is_empty() {
        "(none)"
    } else {
        draft.exercise_name.as_str()
    };
    println!("Exercise: {}", exercise);
    println!("Date:     {}", draft.workout_date);
    for (i, row) in draft.sets.iter().enumerate() {
        println!("  {}. {} x {}", i + 1, row.reps, row.weight);
    }
}
