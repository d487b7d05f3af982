//! Terminal front end for the task list.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use share_todo_lib::commands::{self, CommandCtx, CommandResult};
use share_todo_lib::config::{resolve_data_dir, DATA_DIR_ENV};
use share_todo_lib::logging::init_logging;
use share_todo_lib::share::NO_CATEGORY;
use share_todo_lib::{
    Category, CategoryFilter, FileStore, Settings, ShareError, ShareOutcome, ShareTarget,
    SharedStore, Task, TaskId,
};

/// Local to-do list with category filters and shareable summaries.
#[derive(Parser, Debug)]
#[command(name = "share-todo", version)]
struct Cli {
    /// Directory holding tasks, settings and logs.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show tasks, optionally filtered.
    List {
        #[arg(short, long, default_value = "All")]
        category: CategoryFilter,
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Add a task.
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<Category>,
        #[arg(long)]
        no_category: bool,
    },

    /// Flip a task between pending and completed.
    Toggle { id: TaskId },

    /// Delete a task.
    Delete { id: TaskId },

    /// Print one task, or the whole list, as a share message.
    Share { id: Option<TaskId> },
}

struct TerminalCtx;

impl ShareTarget for TerminalCtx {
    fn share(&self, message: &str) -> Result<ShareOutcome, ShareError> {
        println!("{message}");
        Ok(ShareOutcome::Shared)
    }
}

impl CommandCtx for TerminalCtx {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn main() -> Result<ExitCode> {
    let Cli { data_dir, cmd } = Cli::parse();

    let data_dir = resolve_data_dir(
        data_dir,
        std::env::var(DATA_DIR_ENV).ok(),
        dirs::data_dir(),
    )
    .ok_or_else(|| anyhow!("no data directory; pass --data-dir or set {DATA_DIR_ENV}"))?;

    if let Err(error) = init_logging(&data_dir) {
        eprintln!("logging disabled: {error}");
    }

    let (store, settings) = share_todo_lib::open(&data_dir)
        .with_context(|| format!("failed to open task store in {}", data_dir.display()))?;
    let succeeded = execute_command(&store, &settings, cmd)?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn execute_command(
    store: &SharedStore<FileStore>,
    settings: &Settings,
    command: Command,
) -> Result<bool> {
    match command {
        Command::List { category, search } => {
            let tasks = into_data(commands::visible_tasks(store, category, &search))?;
            print_tasks(&tasks);
        }
        Command::Add {
            title,
            category,
            no_category,
        } => {
            let category = resolve_category(category, no_category, settings);
            match into_data(commands::add_task(store, &title.join(" "), category))? {
                Some(task) => println!("added {}", render_task(&task)),
                None => return Err(anyhow!("task title cannot be empty")),
            }
        }
        Command::Toggle { id } => {
            let tasks = into_data(commands::toggle_task(store, id))?;
            print_tasks(&tasks);
        }
        Command::Delete { id } => {
            let tasks = into_data(commands::delete_task(store, id))?;
            print_tasks(&tasks);
        }
        Command::Share { id: Some(id) } => {
            into_data(commands::share_task(&TerminalCtx, store, id))?;
        }
        Command::Share { id: None } => {
            // An empty list has already been reported through `alert`.
            if !commands::share_all_tasks(&TerminalCtx, store).ok {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn resolve_category(
    category: Option<Category>,
    no_category: bool,
    settings: &Settings,
) -> Option<Category> {
    if no_category {
        return None;
    }
    category.or(settings.default_category)
}

fn into_data<T>(result: CommandResult<T>) -> Result<T> {
    match (result.ok, result.data) {
        (true, Some(data)) => Ok(data),
        _ => Err(anyhow!(result
            .error
            .unwrap_or_else(|| "command failed".to_string()))),
    }
}

fn render_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let category = task.category.map(Category::as_str).unwrap_or(NO_CATEGORY);
    format!("[{mark}] {}  {} ({category})", task.id, task.title)
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        println!("{}", render_task(task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_command() {
        let cli = Cli::parse_from([
            "share-todo",
            "--data-dir",
            "/tmp/todo",
            "list",
            "--category",
            "work",
            "--search",
            "milk",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/todo")));
        match cli.cmd {
            Command::List { category, search } => {
                assert_eq!(category, CategoryFilter::Only(Category::Work));
                assert_eq!(search, "milk");
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn parse_list_defaults_to_everything() {
        let cli = Cli::parse_from(["share-todo", "list"]);
        match cli.cmd {
            Command::List { category, search } => {
                assert_eq!(category, CategoryFilter::All);
                assert!(search.is_empty());
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn parse_add_command_joins_title_words() {
        let cli = Cli::parse_from(["share-todo", "add", "Buy", "Milk", "-c", "Shopping"]);
        match cli.cmd {
            Command::Add {
                title,
                category,
                no_category,
            } => {
                assert_eq!(title.join(" "), "Buy Milk");
                assert_eq!(category, Some(Category::Shopping));
                assert!(!no_category);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_rejects_unknown_category_and_conflicting_flags() {
        assert!(Cli::try_parse_from(["share-todo", "add", "x", "-c", "Errands"]).is_err());
        assert!(
            Cli::try_parse_from(["share-todo", "add", "x", "-c", "Work", "--no-category"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["share-todo", "add"]).is_err());
    }

    #[test]
    fn parse_share_with_and_without_id() {
        match Cli::parse_from(["share-todo", "share"]).cmd {
            Command::Share { id } => assert_eq!(id, None),
            _ => panic!("expected share command"),
        }
        match Cli::parse_from(["share-todo", "share", "42"]).cmd {
            Command::Share { id } => assert_eq!(id, Some(42)),
            _ => panic!("expected share command"),
        }
    }

    #[test]
    fn category_resolution_uses_settings_default() {
        let settings = Settings::default();
        assert_eq!(
            resolve_category(None, false, &settings),
            Some(Category::Work)
        );
        assert_eq!(
            resolve_category(Some(Category::Health), false, &settings),
            Some(Category::Health)
        );
        assert_eq!(resolve_category(None, true, &settings), None);
    }

    #[test]
    fn render_task_marks_completion_and_category() {
        let task = Task {
            id: 7,
            title: "Stretch".to_string(),
            category: None,
            completed: true,
        };
        assert_eq!(render_task(&task), "[x] 7  Stretch (No Category)");
    }

    #[test]
    fn into_data_maps_failures_to_errors() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = share_todo_lib::open(dir.path()).unwrap();
        assert!(into_data(commands::share_all_tasks(&TerminalCtx, &store)).is_err());
        assert!(into_data(commands::load_tasks(&store)).unwrap().is_empty());
    }

    #[test]
    fn sharing_an_empty_list_fails_without_a_second_error() {
        let dir = tempfile::tempdir().unwrap();
        let (store, settings) = share_todo_lib::open(dir.path()).unwrap();
        let share_all = || execute_command(&store, &settings, Command::Share { id: None });
        assert!(!share_all().unwrap());

        let add = Command::Add {
            title: vec!["Walk".to_string()],
            category: None,
            no_category: false,
        };
        assert!(execute_command(&store, &settings, add).unwrap());
        assert!(share_all().unwrap());

        assert!(execute_command(&store, &settings, Command::Share { id: Some(-1) }).is_err());
    }
}
