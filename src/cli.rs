use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::app::{open_tracker, BoxedStore};
use crate::config::{self, Config};
use crate::models::{CollectionKind, Task, TaskId};
use crate::tracker::TaskTracker;
use crate::transfer::{attempt_transfer, TransferOutcome};

#[derive(Parser)]
#[command(name = "tt")]
#[command(about = "To Do / Completed task board with per-task stopwatches", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to To Do
    Add {
        /// Project name
        name: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List tasks (To Do by default)
    List {
        /// List completed tasks instead
        #[arg(long, conflicts_with = "all")]
        completed: bool,

        /// List both columns
        #[arg(long)]
        all: bool,
    },

    /// Change a To Do task
    Edit {
        id: TaskId,

        /// New project name
        name: String,

        /// New description; the current one is kept when omitted
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Move a To Do task to Completed
    Done { id: TaskId },

    /// Delete a task
    Delete {
        id: TaskId,

        /// Delete from Completed instead of To Do
        #[arg(long)]
        completed: bool,
    },

    /// Show or set the dark mode preference
    DarkMode { state: Option<Switch> },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set one configuration value
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

/// Run a subcommand. Returns true when the board should be launched.
pub fn handle_cli(cli: Cli, config: &Config) -> Result<bool> {
    let Some(command) = cli.command else {
        return Ok(true);
    };

    let result = match command {
        Commands::Config { action } => handle_config(action),
        command => {
            let mut tracker = open_tracker(config)?;
            let result = handle_task_command(&mut tracker, command);
            if tracker.is_degraded() {
                eprintln!("Warning: storage unavailable, changes were not saved");
            }
            result
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(false)
}

fn handle_config(action: Option<ConfigAction>) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => config::show_config(),
        ConfigAction::Set { key, value } => config::set_value(&key, &value),
        ConfigAction::Path => {
            println!("{}", config::get_config_path()?.display());
            Ok(())
        }
    }
}

fn handle_task_command(tracker: &mut TaskTracker<BoxedStore>, command: Commands) -> Result<()> {
    match command {
        Commands::Add { name, description } => {
            let task = tracker.create(&name, &description)?;
            println!("✓ Added task {} '{}'", task.id, task.project_name);
        }
        Commands::List { completed, all } => {
            if all || !completed {
                print_collection(tracker, CollectionKind::Pending);
            }
            if all || completed {
                if all {
                    println!();
                }
                print_collection(tracker, CollectionKind::Completed);
            }
        }
        Commands::Edit {
            id,
            name,
            description,
        } => {
            let description = match description {
                Some(description) => description,
                None => tracker
                    .pending()
                    .find(id)
                    .map(|t| t.task_description.clone())
                    .unwrap_or_default(),
            };
            let task = tracker.edit(id, &name, &description)?;
            println!("✓ Updated task {} '{}'", task.id, task.project_name);
        }
        Commands::Done { id } => match attempt_transfer(tracker, id) {
            TransferOutcome::Transferred(task) => {
                println!("✓ Completed task {} '{}'", task.id, task.project_name);
            }
            _ => anyhow::bail!("no To Do task with id {}", id),
        },
        Commands::Delete { id, completed } => {
            let from = if completed {
                CollectionKind::Completed
            } else {
                CollectionKind::Pending
            };
            match tracker.delete(id, from) {
                Some(task) => println!("✓ Deleted task {} '{}'", task.id, task.project_name),
                None => anyhow::bail!("no task {} in {}", id, from.display()),
            }
        }
        Commands::DarkMode { state } => {
            match state {
                Some(Switch::On) => tracker.set_dark_mode(true),
                Some(Switch::Off) => tracker.set_dark_mode(false),
                None => {}
            }
            let label = if tracker.dark_mode() { "on" } else { "off" };
            println!("Dark mode: {}", label);
        }
        Commands::Config { action } => handle_config(action)?,
    }
    Ok(())
}

fn print_collection(tracker: &TaskTracker<BoxedStore>, kind: CollectionKind) {
    let tasks = tracker.collection(kind);
    println!("{} ({})", kind.display(), tasks.len());
    if tasks.is_empty() {
        println!("  (empty)");
        return;
    }
    for task in tasks {
        println!("  {}", format_task_line(task));
    }
}

fn format_task_line(task: &Task) -> String {
    let description = task.task_description.lines().next().unwrap_or_default();
    if description.is_empty() {
        format!("[{}] {}  ({})", task.id, task.project_name, task.timestamp)
    } else {
        format!(
            "[{}] {} - {}  ({})",
            task.id,
            task.project_name,
            truncate(description, 50),
            task.timestamp
        )
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
